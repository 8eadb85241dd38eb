//! `check-conflicts`.

use anyhow::{Context, Result};

use mcpmux_registry::{check_conflicts, load_categories, scan_registry, RegistryLayout};

pub fn run_check_conflicts(layout: &RegistryLayout) -> Result<u8> {
    let categories = load_categories(layout.categories_path())?;
    let scan = scan_registry(layout.servers_dir())
        .with_context(|| format!("cannot scan {}", layout.servers_dir().display()))?;
    let report = check_conflicts(&scan, &categories);

    if report.is_clean() {
        println!("No conflicts in {} descriptor(s)", scan.file_count());
        return Ok(0);
    }

    print!("{}", report);
    println!();
    println!(
        "{} conflict(s), {} consistency issue(s), {} unreadable file(s)",
        report.conflict_count(),
        report.consistency.len(),
        report.load_failures.len()
    );
    Ok(1)
}
