//! `inventory`: maintainer listing, never fails on findings.

use anyhow::{Context, Result};
use clap::Args;

use mcpmux_registry::{scan_registry, Inventory, RegistryLayout};

#[derive(Args, Debug)]
pub struct InventoryArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

pub fn run_inventory(args: &InventoryArgs, layout: &RegistryLayout) -> Result<u8> {
    let scan = scan_registry(layout.servers_dir())
        .with_context(|| format!("cannot scan {}", layout.servers_dir().display()))?;
    let inventory = Inventory::from_scan(&scan);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inventory)?);
    } else {
        print!("{}", inventory);
    }
    Ok(0)
}
