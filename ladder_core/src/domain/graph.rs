//! Editor-side ladder graph: the node/edge snapshot handed over per rung.
//! The core only reads it; ids and connector positions are filled in by the editor.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same point moved down by `dy`.
    pub fn shifted(self, dy: f64) -> Self {
        Self { x: self.x, y: self.y + dy }
    }
}

/// One connectable side of a node (handle in editor terms).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    /// Position relative to the owning node
    #[serde(default)]
    pub rel_position: Point,
    /// Absolute canvas position, used for routing
    #[serde(default)]
    pub glb_position: Point,
}

impl Connector {
    pub fn new(id: impl Into<String>, rel_position: Point, glb_position: Point) -> Self {
        Self {
            id: id.into(),
            rel_position,
            glb_position,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ContactVariant {
    /// 常开
    #[default]
    #[serde(rename = "default")]
    Normal,
    /// 常闭
    Negated,
    RisingEdge,
    FallingEdge,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CoilVariant {
    #[default]
    #[serde(rename = "default")]
    Normal,
    Negated,
    RisingEdge,
    FallingEdge,
    /// 置位线圈 (latch)
    Set,
    /// 复位线圈 (unlatch)
    Reset,
}

/// Function / function block instance payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockData {
    /// 指令名, e.g. "TON", "ADD"
    pub type_name: String,
    /// Only function-block instances carry one (e.g. "Timer1")
    #[serde(default)]
    pub instance_name: Option<String>,
    #[serde(default)]
    pub execution_order: u32,
    /// Ordered input pins ("EN", "IN1", ...)
    #[serde(default)]
    pub input_handles: Vec<Connector>,
    /// Ordered output pins ("ENO", "OUT", ...)
    #[serde(default)]
    pub output_handles: Vec<Connector>,
}

impl BlockData {
    pub fn input_handle(&self, id: &str) -> Option<&Connector> {
        self.input_handles.iter().find(|handle| handle.id == id)
    }

    pub fn output_handle(&self, id: &str) -> Option<&Connector> {
        self.output_handles.iter().find(|handle| handle.id == id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariableData {
    /// 绑定的变量名或字面量, written out as the element's expression
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub execution_order: u32,
}

/// Closed set of node kinds produced by the ladder editor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NodeKind {
    LeftRail,
    RightRail,
    Contact {
        #[serde(default)]
        variable: String,
        #[serde(default)]
        variant: ContactVariant,
    },
    Coil {
        #[serde(default)]
        variable: String,
        #[serde(default)]
        variant: CoilVariant,
    },
    Block(BlockData),
    VariableIn(VariableData),
    VariableOut(VariableData),
    /// Branch point; the extra connector leads down into the branch body.
    ParallelOpen { parallel_output: Connector },
    /// Rejoin point; the extra connector receives the branch body.
    ParallelClose { parallel_input: Connector },
    /// Any kind this crate does not know how to export.
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    pub fn is_parallel(&self) -> bool {
        matches!(self, NodeKind::ParallelOpen { .. } | NodeKind::ParallelClose { .. })
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, NodeKind::VariableIn(_) | NodeKind::VariableOut(_))
    }

    /// Tag used in logs and messages.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::LeftRail => "leftRail",
            NodeKind::RightRail => "rightRail",
            NodeKind::Contact { .. } => "contact",
            NodeKind::Coil { .. } => "coil",
            NodeKind::Block(_) => "block",
            NodeKind::VariableIn(_) => "variableIn",
            NodeKind::VariableOut(_) => "variableOut",
            NodeKind::ParallelOpen { .. } => "parallelOpen",
            NodeKind::ParallelClose { .. } => "parallelClose",
            NodeKind::Unknown => "unknown",
        }
    }
}

/// 梯级内的一个元件 (graph vertex)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Editor id, unique inside the rung
    pub id: String,
    /// Local id written to the interchange format; assigned by the editor
    pub numeric_id: u64,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub input_connector: Option<Connector>,
    #[serde(default)]
    pub output_connector: Option<Connector>,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<String>, numeric_id: u64, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            numeric_id,
            position: Point::default(),
            width: 0.0,
            height: 0.0,
            input_connector: None,
            output_connector: None,
            kind,
        }
    }

    pub fn with_geometry(mut self, position: Point, width: f64, height: f64) -> Self {
        self.position = position;
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_input(mut self, connector: Connector) -> Self {
        self.input_connector = Some(connector);
        self
    }

    pub fn with_output(mut self, connector: Connector) -> Self {
        self.output_connector = Some(connector);
        self
    }

    /// Global position of the input side, origin when the editor left it out.
    pub fn input_point(&self) -> Point {
        self.input_connector
            .as_ref()
            .map(|c| c.glb_position)
            .unwrap_or_default()
    }

    /// Global position of the output side, origin when the editor left it out.
    pub fn output_point(&self) -> Point {
        self.output_connector
            .as_ref()
            .map(|c| c.glb_position)
            .unwrap_or_default()
    }
}

/// Directed wire between two connectors. Carries no geometry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_handle: source_handle.into(),
            target: target.into(),
            target_handle: target_handle.into(),
        }
    }
}

/// Association between a variable node and one pin of a block.
/// Input variables feed an input pin; output variables report an output pin.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HandleBinding {
    /// Variable node id
    pub variable: String,
    /// Block node id
    pub block: String,
    /// Pin id on the block
    pub handle: String,
}

/// 梯级: one independent row of ladder logic.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Rung {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub bindings: Vec<HandleBinding>,
    /// Height of the editor viewport, used to stack rungs vertically
    #[serde(default)]
    pub viewport_height: f64,
}

impl Rung {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn binding_for_handle(&self, block: &str, handle: &str) -> Option<&HandleBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.block == block && binding.handle == handle)
    }

    pub fn binding_for_variable(&self, variable: &str) -> Option<&HandleBinding> {
        self.bindings.iter().find(|binding| binding.variable == variable)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PouType {
    #[default]
    Program,
    Function,
    FunctionBlock,
}

impl PouType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PouType::Program => "program",
            PouType::Function => "function",
            PouType::FunctionBlock => "functionBlock",
        }
    }
}

/// 顶层 POU snapshot: what the editor hands over for one export.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LadderProgram {
    /// POU名称
    pub name: String,
    #[serde(default)]
    pub pou_type: PouType,
    #[serde(default)]
    pub rungs: Vec<Rung>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_json_uses_type_tag_and_camel_case_fields() {
        let json = r#"{
            "id": "open-1",
            "numericId": 7,
            "kind": {
                "type": "parallelOpen",
                "parallelOutput": { "id": "output-down", "glbPosition": { "x": 5.0, "y": 10.0 } }
            }
        }"#;

        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.numeric_id, 7);
        match &node.kind {
            NodeKind::ParallelOpen { parallel_output } => {
                assert_eq!(parallel_output.id, "output-down");
                assert_eq!(parallel_output.glb_position, Point::new(5.0, 10.0));
                assert_eq!(parallel_output.rel_position, Point::default());
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert!(node.kind.is_parallel());
    }

    #[test]
    fn unrecognised_kind_becomes_unknown() {
        let json = r#"{ "id": "x", "numericId": 1, "kind": { "type": "comment", "text": "hi" } }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind, NodeKind::Unknown);
    }

    #[test]
    fn variants_default_and_rename() {
        let json = r#"{ "type": "coil", "variable": "Q1", "variant": "set" }"#;
        let kind: NodeKind = serde_json::from_str(json).unwrap();
        assert_eq!(
            kind,
            NodeKind::Coil {
                variable: "Q1".to_string(),
                variant: CoilVariant::Set
            }
        );

        let json = r#"{ "type": "contact", "variable": "I1" }"#;
        let kind: NodeKind = serde_json::from_str(json).unwrap();
        assert_eq!(
            kind,
            NodeKind::Contact {
                variable: "I1".to_string(),
                variant: ContactVariant::Normal
            }
        );
        assert_eq!(
            serde_json::to_string(&ContactVariant::Normal).unwrap(),
            "\"default\""
        );
    }

    #[test]
    fn missing_connectors_fall_back_to_origin() {
        let node = Node::new("c", 1, NodeKind::LeftRail);
        assert_eq!(node.input_point(), Point::default());
        assert_eq!(node.output_point(), Point::default());
    }
}
