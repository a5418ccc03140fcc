/*
Rung topology index: petgraph view over one rung's nodes/edges.
Node weights are positions in `rung.nodes`, edge weights positions in `rung.edges`,
so every lookup can be answered in the rung's own (deterministic) order.
*/
use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::domain::graph::{Connector, Edge, Node, NodeKind, Rung};
use crate::error::MalformedGraph;

/// An open marker and the close marker terminating its branch group.
#[derive(Debug, Clone, Copy)]
pub struct MarkerPair<'a> {
    pub open: &'a Node,
    pub close: &'a Node,
}

pub struct RungTopology<'a> {
    rung: &'a Rung,
    graph: DiGraph<usize, usize>,
    index: HashMap<&'a str, NodeIndex>,
    dangling: Vec<&'a Edge>,
}

impl<'a> RungTopology<'a> {
    pub fn build(rung: &'a Rung) -> Self {
        let mut graph = DiGraph::with_capacity(rung.nodes.len(), rung.edges.len());
        let mut index: HashMap<&'a str, NodeIndex> = HashMap::with_capacity(rung.nodes.len());

        // first node wins when the editor produced duplicate ids
        for (pos, node) in rung.nodes.iter().enumerate() {
            index
                .entry(node.id.as_str())
                .or_insert_with(|| graph.add_node(pos));
        }

        let mut dangling = Vec::new();
        for (pos, edge) in rung.edges.iter().enumerate() {
            match (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
                (Some(&from), Some(&to)) => {
                    graph.add_edge(from, to, pos);
                }
                _ => dangling.push(edge),
            }
        }

        Self {
            rung,
            graph,
            index,
            dangling,
        }
    }

    pub fn rung(&self) -> &'a Rung {
        self.rung
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        let rung = self.rung;
        self.index.get(id).map(|&idx| &rung.nodes[self.graph[idx]])
    }

    /// Edges whose endpoints are not part of the rung.
    pub fn dangling_edges(&self) -> &[&'a Edge] {
        &self.dangling
    }

    /// Incoming edges of `node` with their source nodes, in rung edge order.
    /// `connector` restricts the result to edges landing on that connector id.
    pub fn incoming(&self, node: &Node, connector: Option<&str>) -> Vec<(&'a Edge, &'a Node)> {
        self.adjacent(node, Direction::Incoming, |edge| {
            connector.map_or(true, |id| edge.target_handle == id)
        })
    }

    /// Outgoing edges leaving `node` through `connector`, in rung edge order.
    pub fn outgoing(&self, node: &Node, connector: &str) -> Vec<(&'a Edge, &'a Node)> {
        self.adjacent(node, Direction::Outgoing, |edge| edge.source_handle == connector)
    }

    fn adjacent(
        &self,
        node: &Node,
        direction: Direction,
        keep: impl Fn(&Edge) -> bool,
    ) -> Vec<(&'a Edge, &'a Node)> {
        let rung = self.rung;
        let Some(&idx) = self.index.get(node.id.as_str()) else {
            return Vec::new();
        };

        let mut found: Vec<(usize, NodeIndex)> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|e| keep(&rung.edges[*e.weight()]))
            .map(|e| {
                let other = match direction {
                    Direction::Incoming => e.source(),
                    Direction::Outgoing => e.target(),
                };
                (*e.weight(), other)
            })
            .collect();
        // petgraph hands adjacency out newest-first
        found.sort_by_key(|(pos, _)| *pos);

        found
            .into_iter()
            .map(|(pos, other)| (&rung.edges[pos], &rung.nodes[self.graph[other]]))
            .collect()
    }

    /// Pair every open marker with the close marker ending its branch.
    /// Fails when a group is left open, a close has no open, or two opens share one close.
    pub fn pair_markers(&self) -> Result<Vec<MarkerPair<'a>>, MalformedGraph> {
        let mut pairs = Vec::new();
        let mut claimed: HashMap<&'a str, &'a str> = HashMap::new();

        for open in &self.rung.nodes {
            let NodeKind::ParallelOpen { parallel_output } = &open.kind else {
                continue;
            };
            let close = self.branch_end(open, parallel_output)?;
            if let Some(first) = claimed.insert(close.id.as_str(), open.id.as_str()) {
                return Err(MalformedGraph::SharedClose {
                    close: close.id.clone(),
                    first: first.to_string(),
                    second: open.id.clone(),
                });
            }
            pairs.push(MarkerPair { open, close });
        }

        if let Some(close) = self.rung.nodes.iter().find(|node| {
            matches!(node.kind, NodeKind::ParallelClose { .. })
                && !claimed.contains_key(node.id.as_str())
        }) {
            return Err(MalformedGraph::UnmatchedClose {
                close: close.id.clone(),
            });
        }

        Ok(pairs)
    }

    /// Walk the branch body below `open` until it rejoins on a close marker's parallel input.
    /// Nested groups are stepped over through their serial side.
    fn branch_end(&self, open: &'a Node, parallel_output: &Connector) -> Result<&'a Node, MalformedGraph> {
        let unclosed = || MalformedGraph::UnclosedOpen {
            open: open.id.clone(),
        };

        let mut visited: HashSet<&str> = HashSet::new();
        let mut next = self.forward(open, &parallel_output.id);
        loop {
            let (edge, node) = match next.as_slice() {
                [single] => *single,
                _ => return Err(unclosed()),
            };
            if !visited.insert(node.id.as_str()) {
                return Err(MalformedGraph::MarkerCycle {
                    marker: open.id.clone(),
                });
            }

            if let NodeKind::ParallelClose { parallel_input } = &node.kind {
                if edge.target_handle == parallel_input.id {
                    return Ok(node);
                }
            }

            let Some(output) = node.output_connector.as_ref() else {
                return Err(unclosed());
            };
            next = self.forward(node, &output.id);
        }
    }

    /// Outgoing wiring along the logic path; out-variables hanging off a pin are not part of it.
    fn forward(&self, node: &Node, connector: &str) -> Vec<(&'a Edge, &'a Node)> {
        self.outgoing(node, connector)
            .into_iter()
            .filter(|(_, target)| !target.kind.is_variable())
            .collect()
    }
}
