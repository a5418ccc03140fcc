/*
Element emitters: one LD element per graph node.
Every emitter reads the node plus its rung context and returns a fresh record;
nothing is written back into the graph.
*/
use crate::domain::graph::{
    BlockData, CoilVariant, Connector, ContactVariant, Node, NodeKind, VariableData,
};
use crate::domain::plcopen::{
    Block, BlockInput, BlockOutput, Coil, Connection, ConnectionPointIn, ConnectionPointOut,
    Contact, EdgeModifier, InVariable, InputSource, LeftPowerRail, OutVariable, RightPowerRail,
    StorageModifier,
};
use crate::error::{ExportWarning, MalformedGraph};

use super::connections::ConnectionBuilder;
use super::offset::Offset;
use super::protocol::PLACEHOLDER_VARIABLE;
use super::topology::RungTopology;

/// Everything an emitter may look at while lowering one rung.
pub struct RungContext<'t, 'a> {
    pub index: usize,
    pub topology: &'t RungTopology<'a>,
    pub connections: ConnectionBuilder<'t, 'a>,
}

impl<'t, 'a> RungContext<'t, 'a> {
    pub fn new(index: usize, topology: &'t RungTopology<'a>, offset: Offset) -> Self {
        Self {
            index,
            topology,
            connections: ConnectionBuilder::new(topology, offset),
        }
    }

    pub fn offset(&self) -> Offset {
        self.connections.offset()
    }

    fn dangling(&self, node: &Node, reference: &str) -> ExportWarning {
        ExportWarning::DanglingReference {
            rung: self.index,
            node: node.id.clone(),
            reference: reference.to_string(),
        }
    }
}

/// An emitted element plus whatever could not be resolved while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitted<T> {
    pub element: T,
    pub warnings: Vec<ExportWarning>,
}

impl<T> Emitted<T> {
    fn clean(element: T) -> Self {
        Self {
            element,
            warnings: Vec::new(),
        }
    }
}

fn point_in(connector: Option<&Connector>, connections: Vec<Connection>) -> ConnectionPointIn {
    ConnectionPointIn {
        rel_position: Some(connector.map(|c| c.rel_position).unwrap_or_default()),
        connections,
    }
}

fn point_out(connector: Option<&Connector>) -> ConnectionPointOut {
    ConnectionPointOut {
        formal_parameter: None,
        rel_position: Some(connector.map(|c| c.rel_position).unwrap_or_default()),
    }
}

fn variable_name(variable: &str) -> String {
    if variable.is_empty() {
        PLACEHOLDER_VARIABLE.to_string()
    } else {
        variable.to_string()
    }
}

pub fn left_rail(node: &Node, cx: &RungContext<'_, '_>) -> LeftPowerRail {
    LeftPowerRail {
        local_id: node.numeric_id,
        geometry: cx.offset().place(node),
        connection_point_out: ConnectionPointOut {
            formal_parameter: Some(String::new()),
            ..point_out(node.output_connector.as_ref())
        },
    }
}

pub fn right_rail(node: &Node, cx: &RungContext<'_, '_>) -> Result<RightPowerRail, MalformedGraph> {
    let connections = cx.connections.for_node(node)?;
    Ok(RightPowerRail {
        local_id: node.numeric_id,
        geometry: cx.offset().place(node),
        connection_point_in: point_in(node.input_connector.as_ref(), connections),
    })
}

pub fn contact(
    node: &Node,
    variable: &str,
    variant: ContactVariant,
    cx: &RungContext<'_, '_>,
) -> Result<Contact, MalformedGraph> {
    let connections = cx.connections.for_node(node)?;
    let edge = match variant {
        ContactVariant::RisingEdge => Some(EdgeModifier::Rising),
        ContactVariant::FallingEdge => Some(EdgeModifier::Falling),
        ContactVariant::Normal | ContactVariant::Negated => None,
    };

    Ok(Contact {
        local_id: node.numeric_id,
        geometry: cx.offset().place(node),
        negated: variant == ContactVariant::Negated,
        edge,
        connection_point_in: point_in(node.input_connector.as_ref(), connections),
        connection_point_out: point_out(node.output_connector.as_ref()),
        variable: variable_name(variable),
    })
}

pub fn coil(
    node: &Node,
    variable: &str,
    variant: CoilVariant,
    cx: &RungContext<'_, '_>,
) -> Result<Coil, MalformedGraph> {
    let connections = cx.connections.for_node(node)?;
    let (edge, storage) = match variant {
        CoilVariant::RisingEdge => (Some(EdgeModifier::Rising), None),
        CoilVariant::FallingEdge => (Some(EdgeModifier::Falling), None),
        CoilVariant::Set => (None, Some(StorageModifier::Set)),
        CoilVariant::Reset => (None, Some(StorageModifier::Reset)),
        CoilVariant::Normal | CoilVariant::Negated => (None, None),
    };

    Ok(Coil {
        local_id: node.numeric_id,
        geometry: cx.offset().place(node),
        negated: variant == CoilVariant::Negated,
        edge,
        storage,
        connection_point_in: point_in(node.input_connector.as_ref(), connections),
        connection_point_out: point_out(node.output_connector.as_ref()),
        variable: variable_name(variable),
    })
}

/// Input pins: wired logic first, then a bound variable as expression.
/// A pin with neither is left out and reported.
pub fn block(
    node: &Node,
    data: &BlockData,
    cx: &RungContext<'_, '_>,
) -> Result<Emitted<Block>, MalformedGraph> {
    let mut warnings = Vec::new();
    let mut input_variables = Vec::with_capacity(data.input_handles.len());

    for handle in &data.input_handles {
        let connections = cx.connections.for_handle(node, handle)?;
        let source = if !connections.is_empty() {
            InputSource::Connected(point_in(Some(handle), connections))
        } else if let Some(expression) = bound_expression(node, handle, cx) {
            InputSource::Expression(expression)
        } else {
            warnings.push(cx.dangling(node, &handle.id));
            continue;
        };
        input_variables.push(BlockInput {
            formal_parameter: handle.id.clone(),
            source,
        });
    }

    let output_variables = data
        .output_handles
        .iter()
        .map(|handle| BlockOutput {
            formal_parameter: handle.id.clone(),
            connection_point_out: point_out(Some(handle)),
        })
        .collect();

    let element = Block {
        local_id: node.numeric_id,
        type_name: data.type_name.clone(),
        instance_name: data.instance_name.clone().filter(|name| !name.is_empty()),
        execution_order_id: data.execution_order,
        geometry: cx.offset().place(node),
        input_variables,
        output_variables,
    };
    Ok(Emitted { element, warnings })
}

fn bound_expression(block: &Node, handle: &Connector, cx: &RungContext<'_, '_>) -> Option<String> {
    let binding = cx.topology.rung().binding_for_handle(&block.id, &handle.id)?;
    match &cx.topology.node(&binding.variable)?.kind {
        NodeKind::VariableIn(data) if !data.name.is_empty() => Some(data.name.clone()),
        _ => None,
    }
}

/// Variables without a name are not exported.
pub fn in_variable(node: &Node, data: &VariableData, cx: &RungContext<'_, '_>) -> Option<InVariable> {
    if data.name.is_empty() {
        return None;
    }
    Some(InVariable {
        local_id: node.numeric_id,
        geometry: cx.offset().place(node),
        negated: false,
        execution_order_id: data.execution_order,
        connection_point_out: point_out(node.output_connector.as_ref()),
        expression: data.name.clone(),
    })
}

/// The single connection cites the bound block pin; without a binding the list stays empty.
pub fn out_variable(
    node: &Node,
    data: &VariableData,
    cx: &RungContext<'_, '_>,
) -> Option<Emitted<OutVariable>> {
    if data.name.is_empty() {
        return None;
    }

    let mut element = OutVariable {
        local_id: node.numeric_id,
        geometry: cx.offset().place(node),
        negated: false,
        execution_order_id: data.execution_order,
        connection_point_in: point_in(node.input_connector.as_ref(), Vec::new()),
        expression: data.name.clone(),
    };

    match bound_pin(node, cx) {
        Some(connection) => {
            element.connection_point_in.connections.push(connection);
            Some(Emitted::clean(element))
        }
        None => {
            let warning = cx.dangling(node, &data.name);
            Some(Emitted {
                element,
                warnings: vec![warning],
            })
        }
    }
}

fn bound_pin(variable: &Node, cx: &RungContext<'_, '_>) -> Option<Connection> {
    let binding = cx.topology.rung().binding_for_variable(&variable.id)?;
    let block = cx.topology.node(&binding.block)?;
    let NodeKind::Block(data) = &block.kind else {
        return None;
    };
    let from = data
        .output_handle(&binding.handle)
        .map(|handle| handle.glb_position)
        .unwrap_or_else(|| block.output_point());

    let offset = cx.offset();
    Some(Connection {
        ref_local_id: block.numeric_id,
        formal_parameter: Some(binding.handle.clone()),
        points: vec![offset.apply(variable.input_point()), offset.apply(from)],
    })
}
