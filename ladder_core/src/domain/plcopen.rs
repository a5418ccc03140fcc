//! PLCopen LD body vocabulary (tc6 `body/LD`).
//! Produced by the serializer, consumed by the codecs without further semantic changes.

use serde::Serialize;

use super::graph::{Point, PouType};
use crate::error::{ExportWarning, RungFailure};

/// One resolved upstream reference on an input side.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub ref_local_id: u64,
    /// Only set when the upstream element is a block (names the output pin)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formal_parameter: Option<String>,
    /// Routing polyline, target end first
    pub points: Vec<Point>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPointIn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel_position: Option<Point>,
    pub connections: Vec<Connection>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPointOut {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formal_parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel_position: Option<Point>,
}

/// Absolute placement, already shifted into the rung's band.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EdgeModifier {
    Rising,
    Falling,
}

impl EdgeModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeModifier::Rising => "rising",
            EdgeModifier::Falling => "falling",
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StorageModifier {
    Set,
    Reset,
}

impl StorageModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageModifier::Set => "set",
            StorageModifier::Reset => "reset",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeftPowerRail {
    pub local_id: u64,
    pub geometry: Geometry,
    pub connection_point_out: ConnectionPointOut,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RightPowerRail {
    pub local_id: u64,
    pub geometry: Geometry,
    pub connection_point_in: ConnectionPointIn,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub local_id: u64,
    pub geometry: Geometry,
    pub negated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeModifier>,
    pub connection_point_in: ConnectionPointIn,
    pub connection_point_out: ConnectionPointOut,
    pub variable: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coil {
    pub local_id: u64,
    pub geometry: Geometry,
    pub negated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeModifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageModifier>,
    pub connection_point_in: ConnectionPointIn,
    pub connection_point_out: ConnectionPointOut,
    pub variable: String,
}

/// How a block input pin gets its value.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum InputSource {
    /// Wired to upstream logic
    Connected(ConnectionPointIn),
    /// Bound to a literal / tag through a variable node
    Expression(String),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockInput {
    pub formal_parameter: String,
    pub source: InputSource,
}

impl BlockInput {
    pub fn connections(&self) -> &[Connection] {
        match &self.source {
            InputSource::Connected(point) => &point.connections,
            InputSource::Expression(_) => &[],
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockOutput {
    pub formal_parameter: String,
    pub connection_point_out: ConnectionPointOut,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub local_id: u64,
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,
    pub execution_order_id: u32,
    pub geometry: Geometry,
    pub input_variables: Vec<BlockInput>,
    pub output_variables: Vec<BlockOutput>,
}

impl Block {
    pub fn input(&self, formal_parameter: &str) -> Option<&BlockInput> {
        self.input_variables
            .iter()
            .find(|input| input.formal_parameter == formal_parameter)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InVariable {
    pub local_id: u64,
    pub geometry: Geometry,
    pub negated: bool,
    pub execution_order_id: u32,
    pub connection_point_out: ConnectionPointOut,
    pub expression: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutVariable {
    pub local_id: u64,
    pub geometry: Geometry,
    pub negated: bool,
    pub execution_order_id: u32,
    pub connection_point_in: ConnectionPointIn,
    pub expression: String,
}

/// Flat LD body. Rungs are not represented; they only show up as vertical bands.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LadderBody {
    pub left_power_rails: Vec<LeftPowerRail>,
    pub right_power_rails: Vec<RightPowerRail>,
    pub blocks: Vec<Block>,
    pub contacts: Vec<Contact>,
    pub coils: Vec<Coil>,
    pub in_variables: Vec<InVariable>,
    pub out_variables: Vec<OutVariable>,
}

impl LadderBody {
    /// Move every element of `other` to the end of this body.
    pub fn append(&mut self, mut other: LadderBody) {
        self.left_power_rails.append(&mut other.left_power_rails);
        self.right_power_rails.append(&mut other.right_power_rails);
        self.blocks.append(&mut other.blocks);
        self.contacts.append(&mut other.contacts);
        self.coils.append(&mut other.coils);
        self.in_variables.append(&mut other.in_variables);
        self.out_variables.append(&mut other.out_variables);
    }

    pub fn element_count(&self) -> usize {
        self.left_power_rails.len()
            + self.right_power_rails.len()
            + self.blocks.len()
            + self.contacts.len()
            + self.coils.len()
            + self.in_variables.len()
            + self.out_variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }

    /// Connections on the main input of the element with `local_id`.
    /// Blocks answer with their first connected pin.
    pub fn connections_into(&self, local_id: u64) -> Option<&[Connection]> {
        if let Some(rail) = self.right_power_rails.iter().find(|e| e.local_id == local_id) {
            return Some(&rail.connection_point_in.connections);
        }
        if let Some(contact) = self.contacts.iter().find(|e| e.local_id == local_id) {
            return Some(&contact.connection_point_in.connections);
        }
        if let Some(coil) = self.coils.iter().find(|e| e.local_id == local_id) {
            return Some(&coil.connection_point_in.connections);
        }
        if let Some(var) = self.out_variables.iter().find(|e| e.local_id == local_id) {
            return Some(&var.connection_point_in.connections);
        }
        self.blocks
            .iter()
            .find(|e| e.local_id == local_id)
            .and_then(|block| {
                block
                    .input_variables
                    .iter()
                    .find(|input| matches!(input.source, InputSource::Connected(_)))
            })
            .map(BlockInput::connections)
    }

    /// Geometry of every element, in body order.
    pub fn geometries(&self) -> Vec<Geometry> {
        let mut all = Vec::with_capacity(self.element_count());
        all.extend(self.left_power_rails.iter().map(|e| e.geometry));
        all.extend(self.right_power_rails.iter().map(|e| e.geometry));
        all.extend(self.blocks.iter().map(|e| e.geometry));
        all.extend(self.contacts.iter().map(|e| e.geometry));
        all.extend(self.coils.iter().map(|e| e.geometry));
        all.extend(self.in_variables.iter().map(|e| e.geometry));
        all.extend(self.out_variables.iter().map(|e| e.geometry));
        all
    }

    /// Visit every input side in the body (rails, contacts, coils, block pins, out variables).
    pub fn for_each_point_in_mut(&mut self, mut visit: impl FnMut(&mut ConnectionPointIn)) {
        for rail in &mut self.right_power_rails {
            visit(&mut rail.connection_point_in);
        }
        for contact in &mut self.contacts {
            visit(&mut contact.connection_point_in);
        }
        for coil in &mut self.coils {
            visit(&mut coil.connection_point_in);
        }
        for block in &mut self.blocks {
            for input in &mut block.input_variables {
                if let InputSource::Connected(point) = &mut input.source {
                    visit(point);
                }
            }
        }
        for var in &mut self.out_variables {
            visit(&mut var.connection_point_in);
        }
    }

    /// Visit every output side in the body (rails, contacts, coils, block pins, in variables).
    pub fn for_each_point_out_mut(&mut self, mut visit: impl FnMut(&mut ConnectionPointOut)) {
        for rail in &mut self.left_power_rails {
            visit(&mut rail.connection_point_out);
        }
        for contact in &mut self.contacts {
            visit(&mut contact.connection_point_out);
        }
        for coil in &mut self.coils {
            visit(&mut coil.connection_point_out);
        }
        for block in &mut self.blocks {
            for output in &mut block.output_variables {
                visit(&mut output.connection_point_out);
            }
        }
        for var in &mut self.in_variables {
            visit(&mut var.connection_point_out);
        }
    }
}

/// POU wrapper around the LD body.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LadderPou {
    pub name: String,
    pub pou_type: PouType,
    pub body: LadderBody,
}

/// Result of lowering a rung list. Partial output is always returned.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    pub body: LadderBody,
    pub warnings: Vec<ExportWarning>,
    pub failures: Vec<RungFailure>,
}

impl ExportReport {
    /// No warnings and no dropped rungs.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.failures.is_empty()
    }
}
