use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::graph::LadderProgram;

/// Load an editor snapshot (JSON) from disk.
pub fn load_program(path: &Path) -> Result<LadderProgram> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ladder snapshot from: {}", path.display()))?;
    parse_program(&content)
        .with_context(|| format!("Failed to parse ladder snapshot JSON from: {}", path.display()))
}

/// Parse an editor snapshot already in memory.
pub fn parse_program(json: &str) -> Result<LadderProgram> {
    let program: LadderProgram = serde_json::from_str(json)?;
    Ok(program)
}
