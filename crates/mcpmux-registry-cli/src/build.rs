//! `build`: write the registry bundle.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use mcpmux_registry::{write_bundle, BundleBuilder, RegistryLayout, REGISTRY_SCHEMA_VERSION};

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Output file (default: dist/registry-bundle.json under the registry root).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Version string stamped into the bundle.
    #[arg(long, default_value = REGISTRY_SCHEMA_VERSION)]
    pub bundle_version: String,
}

pub fn run_build(args: &BuildArgs, layout: &RegistryLayout) -> Result<u8> {
    let layout = match &args.output {
        Some(output) => layout.clone().with_output_path(output),
        None => layout.clone(),
    };

    let bundle = BundleBuilder::new(args.bundle_version.as_str())
        .build_from_layout(&layout, Utc::now())
        .context("bundle build aborted")?;
    write_bundle(layout.output_path(), &bundle)?;

    println!(
        "Wrote {} server(s), {} categories to {}",
        bundle.servers.len(),
        bundle.categories.len(),
        layout.output_path().display()
    );
    Ok(0)
}
