/*
PLCopen TC6 vocabulary shared by the serializer and the XML writer
*/
use serde::{Deserialize, Serialize};

/// Target tool flavour of the exported XML
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XmlDialect {
    /// Full geometry: one rail pair per rung, routing points kept
    #[default]
    OpenPlc,
    /// CODESYS import: shared rails, no routing points
    Codesys,
}

impl XmlDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            XmlDialect::OpenPlc => "openplc",
            XmlDialect::Codesys => "codesys",
        }
    }
}

/// tc6 0201 namespace
pub const PLCOPEN_NAMESPACE: &str = "http://www.plcopen.org/xml/tc6_0201";

/// Output pin name CODESYS expects to be written blank
pub const DEFAULT_OUTPUT_PARAMETER: &str = "OUT";
pub const BLANK_OUTPUT_PARAMETER: &str = "   ";

/// Written when a contact or coil has no variable assigned yet
pub const PLACEHOLDER_VARIABLE: &str = "A";

/// Formal parameter CODESYS expects on the shared left rail
pub const SHARED_RAIL_PARAMETER: &str = "none";
