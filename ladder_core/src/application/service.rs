use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use log::{debug, warn};

use crate::adapters::plcopen::LadderSerializer;
use crate::domain::graph::LadderProgram;
use crate::domain::plcopen::LadderPou;
use crate::error::{ExportWarning, RungFailure};
use crate::ports::LadderCodec;

/// Everything one export produced. Dropped rungs and warnings travel with the bytes.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub pou: LadderPou,
    pub bytes: Vec<u8>,
    pub warnings: Vec<ExportWarning>,
    pub failures: Vec<RungFailure>,
}

/// Application layer use case wrapper around `LadderCodec`.
/// Keeps orchestration (validation, lowering, wrapping) away from adapters.
#[derive(Debug, Clone)]
pub struct LadderService<C: LadderCodec> {
    codec: C,
    serializer: LadderSerializer,
}

impl<C: LadderCodec> LadderService<C> {
    /// Create a new service; lowering follows the codec's settings.
    pub fn new(codec: C) -> Self {
        let serializer = LadderSerializer::from_config(codec.config());
        Self { codec, serializer }
    }

    /// Validate, lower and encode one program.
    pub fn export(&self, program: &LadderProgram) -> Result<ExportOutcome> {
        let mut warnings = validate_program(program)?;

        let report = self.serializer.serialize(&program.rungs);
        warnings.extend(report.warnings);

        let pou = LadderPou {
            name: program.name.clone(),
            pou_type: program.pou_type,
            body: report.body,
        };
        let bytes = self
            .codec
            .encode(&pou)
            .with_context(|| format!("Failed to encode POU `{}` as {}", pou.name, self.codec.format_name()))?;

        debug!(
            "Exported POU `{}` as {}: {} elements, {} warnings, {} failed rungs",
            pou.name,
            self.codec.format_name(),
            pou.body.element_count(),
            warnings.len(),
            report.failures.len()
        );

        Ok(ExportOutcome {
            pou,
            bytes,
            warnings,
            failures: report.failures,
        })
    }

    /// Format name of the codec.
    pub fn format_name(&self) -> &'static str {
        self.codec.format_name()
    }
}

/// Program-level checks. Only a missing name is fatal.
fn validate_program(program: &LadderProgram) -> Result<Vec<ExportWarning>> {
    if program.name.trim().is_empty() {
        bail!("POU name is empty");
    }

    let mut warnings = Vec::new();
    for (index, rung) in program.rungs.iter().enumerate() {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for node in &rung.nodes {
            if !seen.insert(node.numeric_id) && reported.insert(node.numeric_id) {
                let warning = ExportWarning::DuplicateLocalId {
                    rung: index,
                    local_id: node.numeric_id,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }
    Ok(warnings)
}
