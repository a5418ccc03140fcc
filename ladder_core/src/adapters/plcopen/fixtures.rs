//! Hand-built rungs shared by the unit tests.
//! Element nodes are 20x20 with the input at the left middle and the output at the right middle;
//! markers are 10 wide with the parallel connector centred.

use crate::domain::graph::{
    BlockData, CoilVariant, Connector, ContactVariant, Edge, HandleBinding, Node, NodeKind, Point,
    Rung, VariableData,
};

pub(crate) const INPUT: &str = "input";
pub(crate) const OUTPUT: &str = "output";
pub(crate) const PARALLEL_OUTPUT: &str = "output-down";
pub(crate) const PARALLEL_INPUT: &str = "input-down";

fn connector(id: &str, node_at: Point, rel_x: f64, rel_y: f64) -> Connector {
    Connector::new(
        id,
        Point::new(rel_x, rel_y),
        Point::new(node_at.x + rel_x, node_at.y + rel_y),
    )
}

fn element(id: &str, local_id: u64, kind: NodeKind, x: f64, y: f64) -> Node {
    let at = Point::new(x, y);
    Node::new(id, local_id, kind)
        .with_geometry(at, 20.0, 20.0)
        .with_input(connector(INPUT, at, 0.0, 10.0))
        .with_output(connector(OUTPUT, at, 20.0, 10.0))
}

pub(crate) fn left_rail(id: &str, local_id: u64, x: f64, y: f64) -> Node {
    let at = Point::new(x, y);
    Node::new(id, local_id, NodeKind::LeftRail)
        .with_geometry(at, 3.0, 40.0)
        .with_output(connector(OUTPUT, at, 3.0, 10.0))
}

pub(crate) fn right_rail(id: &str, local_id: u64, x: f64, y: f64) -> Node {
    let at = Point::new(x, y);
    Node::new(id, local_id, NodeKind::RightRail)
        .with_geometry(at, 3.0, 40.0)
        .with_input(connector(INPUT, at, 0.0, 10.0))
}

pub(crate) fn contact(id: &str, local_id: u64, x: f64, y: f64) -> Node {
    contact_with(id, local_id, ContactVariant::Normal, x, y)
}

pub(crate) fn contact_with(id: &str, local_id: u64, variant: ContactVariant, x: f64, y: f64) -> Node {
    let kind = NodeKind::Contact {
        variable: id.to_uppercase(),
        variant,
    };
    element(id, local_id, kind, x, y)
}

pub(crate) fn coil(id: &str, local_id: u64, x: f64, y: f64) -> Node {
    coil_with(id, local_id, CoilVariant::Normal, x, y)
}

pub(crate) fn coil_with(id: &str, local_id: u64, variant: CoilVariant, x: f64, y: f64) -> Node {
    let kind = NodeKind::Coil {
        variable: id.to_uppercase(),
        variant,
    };
    element(id, local_id, kind, x, y)
}

pub(crate) fn open_marker(id: &str, local_id: u64, x: f64, y: f64) -> Node {
    let at = Point::new(x, y);
    let kind = NodeKind::ParallelOpen {
        parallel_output: connector(PARALLEL_OUTPUT, at, 5.0, 10.0),
    };
    Node::new(id, local_id, kind)
        .with_geometry(at, 10.0, 20.0)
        .with_input(connector(INPUT, at, 0.0, 10.0))
        .with_output(connector(OUTPUT, at, 10.0, 10.0))
}

pub(crate) fn close_marker(id: &str, local_id: u64, x: f64, y: f64) -> Node {
    let at = Point::new(x, y);
    let kind = NodeKind::ParallelClose {
        parallel_input: connector(PARALLEL_INPUT, at, 5.0, 10.0),
    };
    Node::new(id, local_id, kind)
        .with_geometry(at, 10.0, 20.0)
        .with_input(connector(INPUT, at, 0.0, 10.0))
        .with_output(connector(OUTPUT, at, 10.0, 10.0))
}

/// Block 40 wide; pin `i` sits at y + 10 + 20 * i on its side.
pub(crate) fn block(
    id: &str,
    local_id: u64,
    x: f64,
    y: f64,
    type_name: &str,
    inputs: &[&str],
    outputs: &[&str],
) -> Node {
    let at = Point::new(x, y);
    let pins = |names: &[&str], rel_x: f64| -> Vec<Connector> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| connector(name, at, rel_x, 10.0 + 20.0 * i as f64))
            .collect()
    };
    let input_handles = pins(inputs, 0.0);
    let output_handles = pins(outputs, 40.0);
    let rows = inputs.len().max(outputs.len()) as f64;

    let mut node = Node::new(
        id,
        local_id,
        NodeKind::Block(BlockData {
            type_name: type_name.to_string(),
            instance_name: None,
            execution_order: 0,
            input_handles: input_handles.clone(),
            output_handles: output_handles.clone(),
        }),
    )
    .with_geometry(at, 40.0, 20.0 * rows + 20.0);
    node.input_connector = input_handles.into_iter().next();
    node.output_connector = output_handles.into_iter().next();
    node
}

pub(crate) fn variable_in(id: &str, local_id: u64, name: &str, x: f64, y: f64) -> Node {
    let at = Point::new(x, y);
    let kind = NodeKind::VariableIn(VariableData {
        name: name.to_string(),
        execution_order: 0,
    });
    Node::new(id, local_id, kind)
        .with_geometry(at, 30.0, 20.0)
        .with_output(connector(OUTPUT, at, 30.0, 10.0))
}

pub(crate) fn variable_out(id: &str, local_id: u64, name: &str, x: f64, y: f64) -> Node {
    let at = Point::new(x, y);
    let kind = NodeKind::VariableOut(VariableData {
        name: name.to_string(),
        execution_order: 0,
    });
    Node::new(id, local_id, kind)
        .with_geometry(at, 30.0, 20.0)
        .with_input(connector(INPUT, at, 0.0, 10.0))
}

fn connector_id(connector: &Option<Connector>) -> String {
    connector.as_ref().map(|c| c.id.clone()).unwrap_or_default()
}

/// Output side of `from` into the input side of `to`.
pub(crate) fn wire(from: &Node, to: &Node) -> Edge {
    Edge::new(
        &from.id,
        connector_id(&from.output_connector),
        &to.id,
        connector_id(&to.input_connector),
    )
}

/// Output side of `from` into a named pin of `block`.
pub(crate) fn wire_pin(from: &Node, block: &Node, pin: &str) -> Edge {
    Edge::new(&from.id, connector_id(&from.output_connector), &block.id, pin)
}

/// Branch body start: open marker's parallel output into `to`.
pub(crate) fn branch(open: &Node, to: &Node) -> Edge {
    Edge::new(&open.id, PARALLEL_OUTPUT, &to.id, connector_id(&to.input_connector))
}

/// Branch body end: `from` into the close marker's parallel input.
pub(crate) fn rejoin(from: &Node, close: &Node) -> Edge {
    Edge::new(&from.id, connector_id(&from.output_connector), &close.id, PARALLEL_INPUT)
}

pub(crate) fn bind(variable: &Node, block: &Node, handle: &str) -> HandleBinding {
    HandleBinding {
        variable: variable.id.clone(),
        block: block.id.clone(),
        handle: handle.to_string(),
    }
}

pub(crate) fn rung(id: &str, nodes: Vec<Node>, edges: Vec<Edge>, viewport_height: f64) -> Rung {
    Rung {
        id: id.to_string(),
        nodes,
        edges,
        bindings: Vec::new(),
        viewport_height,
    }
}

/// leftRail -> a -> open -> [b | c] -> close -> x -> rightRail
pub(crate) fn scenario_rung() -> Rung {
    let l = left_rail("left", 1, 0.0, 0.0);
    let a = contact("a", 2, 50.0, 0.0);
    let open = open_marker("open", 3, 100.0, 0.0);
    let b = contact("b", 4, 150.0, 0.0);
    let c = contact("c", 5, 150.0, 60.0);
    let close = close_marker("close", 6, 200.0, 0.0);
    let x = coil("x", 7, 250.0, 0.0);
    let r = right_rail("right", 8, 300.0, 0.0);

    let edges = vec![
        wire(&l, &a),
        wire(&a, &open),
        wire(&open, &b),
        branch(&open, &c),
        wire(&b, &close),
        rejoin(&c, &close),
        wire(&close, &x),
        wire(&x, &r),
    ];
    rung("rung-0", vec![l, a, open, b, c, close, x, r], edges, 100.0)
}

/// Two groups back to back: a -> open-1 -> [b1 | c1] -> close-1 -> open-2 -> [b2 | c2] -> close-2 -> x
pub(crate) fn sequential_rung() -> Rung {
    let l = left_rail("left", 1, 0.0, 0.0);
    let a = contact("a", 2, 50.0, 0.0);
    let open_1 = open_marker("open-1", 3, 100.0, 0.0);
    let b1 = contact("b1", 4, 150.0, 0.0);
    let c1 = contact("c1", 5, 150.0, 60.0);
    let close_1 = close_marker("close-1", 6, 200.0, 0.0);
    let open_2 = open_marker("open-2", 7, 250.0, 0.0);
    let b2 = contact("b2", 8, 300.0, 0.0);
    let c2 = contact("c2", 9, 300.0, 60.0);
    let close_2 = close_marker("close-2", 10, 350.0, 0.0);
    let x = coil("x", 11, 400.0, 0.0);
    let r = right_rail("right", 12, 450.0, 0.0);

    let edges = vec![
        wire(&l, &a),
        wire(&a, &open_1),
        wire(&open_1, &b1),
        branch(&open_1, &c1),
        wire(&b1, &close_1),
        rejoin(&c1, &close_1),
        wire(&close_1, &open_2),
        wire(&open_2, &b2),
        branch(&open_2, &c2),
        wire(&b2, &close_2),
        rejoin(&c2, &close_2),
        wire(&close_2, &x),
        wire(&x, &r),
    ];
    rung(
        "rung-seq",
        vec![l, a, open_1, b1, c1, close_1, open_2, b2, c2, close_2, x, r],
        edges,
        100.0,
    )
}

/// A group nested in the branch of another:
/// a -> open-1 -> [ b | open-2 -> [c | d] -> close-2 ] -> close-1 -> x
pub(crate) fn nested_rung() -> Rung {
    let l = left_rail("left", 1, 0.0, 0.0);
    let a = contact("a", 2, 50.0, 0.0);
    let open_1 = open_marker("open-1", 3, 100.0, 0.0);
    let b = contact("b", 4, 150.0, 0.0);
    let open_2 = open_marker("open-2", 5, 150.0, 60.0);
    let c = contact("c", 6, 200.0, 60.0);
    let d = contact("d", 7, 200.0, 120.0);
    let close_2 = close_marker("close-2", 8, 250.0, 60.0);
    let close_1 = close_marker("close-1", 9, 300.0, 0.0);
    let x = coil("x", 10, 350.0, 0.0);
    let r = right_rail("right", 11, 400.0, 0.0);

    let edges = vec![
        wire(&l, &a),
        wire(&a, &open_1),
        wire(&open_1, &b),
        branch(&open_1, &open_2),
        wire(&open_2, &c),
        branch(&open_2, &d),
        wire(&c, &close_2),
        rejoin(&d, &close_2),
        rejoin(&close_2, &close_1),
        wire(&b, &close_1),
        wire(&close_1, &x),
        wire(&x, &r),
    ];
    rung(
        "rung-nested",
        vec![l, a, open_1, b, open_2, c, d, close_2, close_1, x, r],
        edges,
        160.0,
    )
}

/// Two opens sharing one attachment point:
/// a -> open-1 -> open-2 -> [b | c] -> close-2 -> close-1 (with d in open-1's branch) -> x
pub(crate) fn consecutive_opens_rung() -> Rung {
    let l = left_rail("left", 1, 0.0, 0.0);
    let a = contact("a", 2, 50.0, 0.0);
    let open_1 = open_marker("open-1", 3, 100.0, 0.0);
    let open_2 = open_marker("open-2", 4, 120.0, 0.0);
    let b = contact("b", 5, 150.0, 0.0);
    let c = contact("c", 6, 150.0, 60.0);
    let d = contact("d", 7, 150.0, 120.0);
    let close_2 = close_marker("close-2", 8, 200.0, 0.0);
    let close_1 = close_marker("close-1", 9, 220.0, 0.0);
    let x = coil("x", 10, 250.0, 0.0);
    let r = right_rail("right", 11, 300.0, 0.0);

    let edges = vec![
        wire(&l, &a),
        wire(&a, &open_1),
        wire(&open_1, &open_2),
        wire(&open_2, &b),
        branch(&open_2, &c),
        branch(&open_1, &d),
        wire(&b, &close_2),
        rejoin(&c, &close_2),
        wire(&close_2, &close_1),
        rejoin(&d, &close_1),
        wire(&close_1, &x),
        wire(&x, &r),
    ];
    rung(
        "rung-consecutive",
        vec![l, a, open_1, open_2, b, c, d, close_2, close_1, x, r],
        edges,
        160.0,
    )
}

/// Function block with wired and bound pins:
/// left -> EN, a -> IN1, literal "10" bound to IN2, ENO -> x, OUT reported by out-variable q.
pub(crate) fn block_rung() -> Rung {
    let l = left_rail("left", 1, 0.0, 0.0);
    let a = contact("a", 2, 50.0, 0.0);
    let add = block("add", 3, 100.0, 0.0, "ADD", &["EN", "IN1", "IN2"], &["ENO", "OUT"]);
    let literal = variable_in("lit", 4, "10", 40.0, 60.0);
    let x = coil("x", 5, 200.0, 0.0);
    let r = right_rail("right", 6, 250.0, 0.0);
    let q = variable_out("q", 7, "Result", 200.0, 40.0);

    let edges = vec![
        wire(&l, &a),
        Edge::new("left", OUTPUT, "add", "EN"),
        wire_pin(&a, &add, "IN1"),
        Edge::new("add", "ENO", "x", INPUT),
        wire(&x, &r),
        Edge::new("add", "OUT", "q", INPUT),
    ];
    let bindings = vec![bind(&literal, &add, "IN2"), bind(&q, &add, "OUT")];

    let mut rung = rung("rung-block", vec![l, a, add, literal, x, r, q], edges, 120.0);
    rung.bindings = bindings;
    rung
}

/// Same rung with every local id moved up by `base`.
pub(crate) fn renumbered(mut rung: Rung, base: u64) -> Rung {
    for node in &mut rung.nodes {
        node.numeric_id += base;
    }
    rung
}
