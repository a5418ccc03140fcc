//! Export error taxonomy.
//!
//! - `MalformedGraph`: the parallel-marker structure of a rung is broken; only that rung is dropped.
//! - `ExportWarning`: something local could not be resolved; the element or reference is skipped.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which incoming side of a marker an error refers to.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MarkerSide {
    Serial,
    Parallel,
}

impl fmt::Display for MarkerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerSide::Serial => f.write_str("serial"),
            MarkerSide::Parallel => f.write_str("parallel"),
        }
    }
}

#[derive(Debug, Error, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MalformedGraph {
    #[error("parallel marker `{marker}` expects exactly one {side} incoming edge, found {found}")]
    MarkerCardinality {
        marker: String,
        side: MarkerSide,
        found: usize,
    },

    #[error("parallel close `{close}` has no matching parallel open")]
    UnmatchedClose { close: String },

    #[error("parallel open `{open}` is never closed")]
    UnclosedOpen { open: String },

    #[error("parallel close `{close}` is claimed by both `{first}` and `{second}`")]
    SharedClose {
        close: String,
        first: String,
        second: String,
    },

    #[error("parallel marker `{marker}` is reached again while walking its own chain")]
    MarkerCycle { marker: String },
}

#[derive(Debug, Error, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ExportWarning {
    #[error("rung {rung}: `{node}` reference `{reference}` has no upstream edge and no binding")]
    DanglingReference {
        rung: usize,
        node: String,
        reference: String,
    },

    #[error("rung {rung}: node `{node}` has an unknown kind and was skipped")]
    UnknownNodeKind { rung: usize, node: String },

    #[error("rung {rung}: edge `{from}` -> `{to}` references a missing node")]
    DanglingEdge { rung: usize, from: String, to: String },

    #[error("rung {rung}: local id {local_id} is used by more than one node")]
    DuplicateLocalId { rung: usize, local_id: u64 },
}

/// A rung that could not be exported. The remaining rungs are unaffected.
#[derive(Debug, Error, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[error("rung {rung} (`{rung_id}`) failed to export: {error}")]
pub struct RungFailure {
    pub rung: usize,
    pub rung_id: String,
    pub error: MalformedGraph,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_names_the_rung() {
        let failure = RungFailure {
            rung: 2,
            rung_id: "rung-c".to_string(),
            error: MalformedGraph::MarkerCardinality {
                marker: "close-1".to_string(),
                side: MarkerSide::Parallel,
                found: 0,
            },
        };

        assert_eq!(
            failure.to_string(),
            "rung 2 (`rung-c`) failed to export: parallel marker `close-1` expects exactly one parallel incoming edge, found 0"
        );
    }

    #[test]
    fn warnings_serialize_with_kind_tag() {
        let warning = ExportWarning::UnknownNodeKind {
            rung: 0,
            node: "n1".to_string(),
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert_eq!(json, r#"{"kind":"unknownNodeKind","rung":0,"node":"n1"}"#);
    }
}
