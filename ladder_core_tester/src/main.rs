use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ladder_core::snapshot::load_program;
use ladder_core::{ExportOutcome, JsonCodec, LadderCodec, LadderService, PlcOpenXmlCodec};
use log::info;

const DEFAULT_CASE_DIR: &str = "cases";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let case_dir = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CASE_DIR);
    let case_dir = Path::new(case_dir);

    if !case_dir.exists() {
        anyhow::bail!("case dir not found: {}", case_dir.display());
    }

    let out_dir = case_dir.join("exported");
    fs::create_dir_all(&out_dir)?;

    let mut entries: Vec<PathBuf> = fs::read_dir(case_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
                    .unwrap_or(false)
        })
        .collect();
    entries.sort();

    if entries.is_empty() {
        println!("No .json snapshots found in {}", case_dir.display());
        return Ok(());
    }

    for path in entries {
        let file_name = path.file_stem().unwrap_or_default().to_string_lossy().into_owned();
        info!("Loading snapshot {}", path.display());
        let program = match load_program(&path) {
            Ok(program) => program,
            Err(err) => {
                println!("[fail] {}: {:#}", file_name, err);
                continue;
            }
        };

        run_case(&file_name, &out_dir, "openplc", "xml", PlcOpenXmlCodec::openplc(), &program)?;
        run_case(&file_name, &out_dir, "codesys", "xml", PlcOpenXmlCodec::codesys(), &program)?;
        run_case(&file_name, &out_dir, "body", "json", JsonCodec, &program)?;
    }

    Ok(())
}

fn run_case<C: LadderCodec>(
    file_name: &str,
    out_dir: &Path,
    label: &str,
    extension: &str,
    codec: C,
    program: &ladder_core::graph::LadderProgram,
) -> Result<()> {
    let service = LadderService::new(codec);
    match service.export(program) {
        Ok(outcome) => {
            let out_path = out_dir.join(format!("{}_{}.{}", file_name, label, extension));
            fs::write(&out_path, &outcome.bytes)
                .with_context(|| format!("failed to write {}", out_path.display()))?;
            let report_path = out_dir.join(format!("{}_{}.report.json", file_name, label));
            write_report(&report_path, &outcome)?;
            print_summary(file_name, label, service.format_name(), &outcome, &out_path);
        }
        Err(err) => {
            println!("[fail] {} {}: {:#}", file_name, label, err);
        }
    }
    Ok(())
}

fn write_report(path: &Path, outcome: &ExportOutcome) -> Result<()> {
    let report = serde_json::json!({
        "pou": outcome.pou.name,
        "elements": outcome.pou.body.element_count(),
        "warnings": outcome.warnings,
        "failures": outcome.failures,
    });
    let json = serde_json::to_string_pretty(&report)?;
    fs::write(path, json)?;
    Ok(())
}

fn print_summary(file_name: &str, label: &str, format: &str, outcome: &ExportOutcome, out_path: &Path) {
    println!(
        "[ok] {} {} ({}) -> {}",
        file_name,
        label,
        format,
        out_path.display()
    );
    let body = &outcome.pou.body;
    println!(
        "  POU='{}' rails={}/{} blocks={} contacts={} coils={} variables={}/{}",
        outcome.pou.name,
        body.left_power_rails.len(),
        body.right_power_rails.len(),
        body.blocks.len(),
        body.contacts.len(),
        body.coils.len(),
        body.in_variables.len(),
        body.out_variables.len()
    );

    for warning in &outcome.warnings {
        println!("  - warning: {}", warning);
    }
    for failure in &outcome.failures {
        println!("  - dropped: {}", failure);
    }
}
