use anyhow::{Context, Result};

use crate::domain::plcopen::LadderPou;
use crate::ports::codec::LadderCodec;

/// Pretty JSON dump of the lowered POU, for diffing and debugging.
#[derive(Debug, Clone, Default)]
pub struct JsonCodec;

impl LadderCodec for JsonCodec {
    fn encode(&self, pou: &LadderPou) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(pou).with_context(|| format!("Failed to encode POU `{}` as JSON", pou.name))
    }

    fn format_name(&self) -> &'static str {
        "json"
    }
}
