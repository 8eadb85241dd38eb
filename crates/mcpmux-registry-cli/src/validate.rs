//! `validate` and `validate-all`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mcpmux_registry::{scan_registry, validate_files, validate_scan, RegistryLayout, ValidationReport};

use crate::load_validator;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Descriptor files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Validate the files named on the command line.
pub fn run_validate(args: &ValidateArgs, layout: &RegistryLayout) -> Result<u8> {
    let validator = load_validator(layout)?;
    let report = validate_files(&validator, &args.files);
    Ok(print_report(&report))
}

/// Validate every descriptor in the registry.
pub fn run_validate_all(layout: &RegistryLayout) -> Result<u8> {
    let validator = load_validator(layout)?;
    let scan = scan_registry(layout.servers_dir())
        .with_context(|| format!("cannot scan {}", layout.servers_dir().display()))?;
    let report = validate_scan(&validator, &scan);
    Ok(print_report(&report))
}

fn print_report(report: &ValidationReport) -> u8 {
    for file in &report.files {
        print!("{}", file);
    }
    println!();

    let failed = report.failure_count();
    if failed == 0 {
        println!("All {} file(s) valid", report.files.len());
        0
    } else {
        println!("{} of {} file(s) failed validation", failed, report.files.len());
        1
    }
}
