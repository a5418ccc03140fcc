/*
Parallel resolver: turns a parallel marker met while tracing backwards into the real
elements feeding it. Markers never show up in the LD body, so every reference that
lands on one has to be replaced by the elements on the far side of the branch group.
*/
use std::collections::HashSet;

use crate::domain::graph::{Connector, Edge, Node, NodeKind};
use crate::error::{MalformedGraph, MarkerSide};

use super::topology::RungTopology;

/// A real element reached through the marker chain.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSource<'a> {
    pub node: &'a Node,
    /// Parallel connector whose vertical column the wire runs through; `None` routes straight.
    pub rail: Option<&'a Connector>,
}

#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// Deduplicated by node id, serial side before parallel side
    pub sources: Vec<ResolvedSource<'a>>,
    /// Markers walked, in visiting order
    pub path: Vec<&'a Node>,
}

impl<'a> Resolution<'a> {
    fn direct(node: &'a Node) -> Self {
        Self {
            sources: vec![ResolvedSource { node, rail: None }],
            path: Vec::new(),
        }
    }
}

/// Resolve a parallel marker into its real predecessors.
/// A non-marker node resolves to itself.
pub fn resolve<'a>(topology: &RungTopology<'a>, marker: &'a Node) -> Result<Resolution<'a>, MalformedGraph> {
    walk(topology, marker, &[])
}

/// Real elements reaching a target through `edge`, whose upstream end is `source`.
/// Leaving an open marker through its parallel output routes everything through that column.
pub fn trace<'a>(
    topology: &RungTopology<'a>,
    edge: &Edge,
    source: &'a Node,
) -> Result<Resolution<'a>, MalformedGraph> {
    trace_from(topology, edge, source, &[])
}

fn trace_from<'a>(
    topology: &RungTopology<'a>,
    edge: &Edge,
    source: &'a Node,
    trail: &[&'a str],
) -> Result<Resolution<'a>, MalformedGraph> {
    match &source.kind {
        NodeKind::ParallelOpen { parallel_output } if edge.source_handle == parallel_output.id => {
            let mut resolution = walk(topology, source, trail)?;
            for resolved in &mut resolution.sources {
                resolved.rail = Some(parallel_output);
            }
            Ok(resolution)
        }
        kind if kind.is_parallel() => walk(topology, source, trail),
        _ => Ok(Resolution::direct(source)),
    }
}

fn walk<'a>(
    topology: &RungTopology<'a>,
    marker: &'a Node,
    trail: &[&'a str],
) -> Result<Resolution<'a>, MalformedGraph> {
    if trail.contains(&marker.id.as_str()) {
        return Err(MalformedGraph::MarkerCycle {
            marker: marker.id.clone(),
        });
    }
    let mut trail = trail.to_vec();
    trail.push(marker.id.as_str());

    match &marker.kind {
        NodeKind::ParallelOpen { .. } => resolve_open(topology, marker, &trail),
        NodeKind::ParallelClose { parallel_input } => {
            resolve_close(topology, marker, parallel_input, &trail)
        }
        _ => Ok(Resolution::direct(marker)),
    }
}

fn cardinality(marker: &Node, side: MarkerSide, found: usize) -> MalformedGraph {
    MalformedGraph::MarkerCardinality {
        marker: marker.id.clone(),
        side,
        found,
    }
}

/// Open marker: its single predecessor, unwinding consecutive markers.
fn resolve_open<'a>(
    topology: &RungTopology<'a>,
    open: &'a Node,
    trail: &[&'a str],
) -> Result<Resolution<'a>, MalformedGraph> {
    let incoming = topology.incoming(open, None);
    let [(edge, pred)] = incoming.as_slice() else {
        return Err(cardinality(open, MarkerSide::Serial, incoming.len()));
    };

    let upstream = trace_from(topology, edge, *pred, trail)?;
    let mut path = vec![open];
    path.extend(upstream.path);
    Ok(Resolution {
        sources: upstream.sources,
        path,
    })
}

/// Close marker: union of the serial predecessor and the branch body rejoining on the parallel input.
fn resolve_close<'a>(
    topology: &RungTopology<'a>,
    close: &'a Node,
    parallel_input: &'a Connector,
    trail: &[&'a str],
) -> Result<Resolution<'a>, MalformedGraph> {
    let (parallel, serial): (Vec<_>, Vec<_>) = topology
        .incoming(close, None)
        .into_iter()
        .partition(|(edge, _)| edge.target_handle == parallel_input.id);

    let [(serial_edge, serial_pred)] = serial.as_slice() else {
        return Err(cardinality(close, MarkerSide::Serial, serial.len()));
    };
    let [(parallel_edge, parallel_pred)] = parallel.as_slice() else {
        return Err(cardinality(close, MarkerSide::Parallel, parallel.len()));
    };

    let serial_side = trace_from(topology, serial_edge, *serial_pred, trail)?;
    let parallel_side = trace_from(topology, parallel_edge, *parallel_pred, trail)?;

    let mut path = vec![close];
    path.extend(serial_side.path);
    path.extend(parallel_side.path);

    // the whole branch body rejoins through this close's column, nested groups included
    let mut sources = serial_side.sources;
    sources.extend(parallel_side.sources.into_iter().map(|resolved| ResolvedSource {
        rail: Some(parallel_input),
        ..resolved
    }));

    let mut seen: HashSet<&'a str> = HashSet::new();
    sources.retain(|resolved| {
        let node: &'a Node = resolved.node;
        seen.insert(node.id.as_str())
    });

    Ok(Resolution { sources, path })
}
