/*
Connection builder: the `connection` list of one input side.
Markers are resolved away; every real source gets its own record with a routing polyline,
target end first.
*/
use crate::domain::graph::{Connector, Node, NodeKind, Point};
use crate::domain::plcopen::Connection;
use crate::error::MalformedGraph;

use super::offset::Offset;
use super::resolver::{self, ResolvedSource};
use super::topology::RungTopology;

pub struct ConnectionBuilder<'t, 'a> {
    topology: &'t RungTopology<'a>,
    offset: Offset,
}

impl<'t, 'a> ConnectionBuilder<'t, 'a> {
    pub fn new(topology: &'t RungTopology<'a>, offset: Offset) -> Self {
        Self { topology, offset }
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Connections arriving at the main input of `target`.
    pub fn for_node(&self, target: &Node) -> Result<Vec<Connection>, MalformedGraph> {
        self.collect(target, None, target.input_point())
    }

    /// Connections arriving at one input pin of a block.
    pub fn for_handle(&self, block: &Node, handle: &Connector) -> Result<Vec<Connection>, MalformedGraph> {
        self.collect(block, Some(&handle.id), handle.glb_position)
    }

    fn collect(
        &self,
        target: &Node,
        connector: Option<&str>,
        at: Point,
    ) -> Result<Vec<Connection>, MalformedGraph> {
        let mut connections = Vec::new();

        for (edge, source) in self.topology.incoming(target, connector) {
            // variable nodes feed pins as expressions, never as wires
            if !is_wire_source(source) {
                continue;
            }
            let resolution = resolver::trace(self.topology, edge, source)?;
            let direct = resolution.path.is_empty();

            for resolved in resolution.sources {
                if !is_wire_source(resolved.node) {
                    continue;
                }
                let pin = if direct {
                    Some(edge.source_handle.as_str())
                } else {
                    resolved.node.output_connector.as_ref().map(|c| c.id.as_str())
                };
                connections.push(self.connection(at, resolved, pin));
            }
        }

        Ok(connections)
    }

    fn connection(&self, at: Point, resolved: ResolvedSource<'_>, pin: Option<&str>) -> Connection {
        let source = resolved.node;
        let (formal_parameter, from) = match (&source.kind, pin) {
            (NodeKind::Block(data), Some(pin)) => {
                let from = data
                    .output_handle(pin)
                    .map(|handle| handle.glb_position)
                    .unwrap_or_else(|| source.output_point());
                (Some(pin.to_string()), from)
            }
            _ => (None, source.output_point()),
        };

        Connection {
            ref_local_id: source.numeric_id,
            formal_parameter,
            points: self.route(at, from, resolved.rail),
        }
    }

    /// Straight two-point wire, or four points through a parallel column.
    fn route(&self, target: Point, source: Point, rail: Option<&Connector>) -> Vec<Point> {
        let points = match rail {
            None => vec![target, source],
            Some(rail) => {
                let x = rail.glb_position.x;
                vec![target, Point::new(x, target.y), Point::new(x, source.y), source]
            }
        };
        points.into_iter().map(|point| self.offset.apply(point)).collect()
    }
}

/// Unknown kinds are never emitted, so nothing may cite them.
fn is_wire_source(node: &Node) -> bool {
    !node.kind.is_variable() && !matches!(node.kind, NodeKind::Unknown)
}
