//! Ladder diagram export core.
//! Responsibilities: lower editor rung graphs (with parallel branch markers) into the flat
//! PLCopen LD body and encode it.
//! Non-goals: editing, rendering, XML import (handled by upper layers).

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod application;
pub mod error;

pub use domain::{graph, plcopen};
pub use application::service::{ExportOutcome, LadderService};
pub use ports::codec::LadderCodec;
pub use adapters::json::JsonCodec;
pub use adapters::plcopen::{LadderSerializer, PlcOpenConfig, PlcOpenXmlCodec, XmlDialect};
pub use error::{ExportWarning, MalformedGraph, RungFailure};

pub mod snapshot;
