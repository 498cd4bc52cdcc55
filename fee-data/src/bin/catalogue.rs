use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fee_core::{Catalogue, PropertyType};
use fee_data::CatalogueLoader;

/// Validate a disbursement catalogue CSV, or export the built-in one.
///
/// The CSV file should have the following columns:
/// - id: Stable item identifier (e.g., titles-search)
/// - description: Display text
/// - unit_cost: Price in dollars (e.g., 40.39)
/// - category: standard or free
/// - property_types: `|`-separated list of land, house, unit (may be empty)
/// - gst_included: true if the unit cost already includes GST
#[derive(Parser, Debug)]
#[command(name = "fee-catalogue")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a catalogue CSV file to validate and summarise
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write the catalogue (the loaded file, or the built-in schedule) to this path
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let catalogue = match &args.file {
        Some(path) => {
            println!("Loading catalogue from: {}", path.display());
            CatalogueLoader::load_from_path(path)
                .with_context(|| format!("Failed to load catalogue: {}", path.display()))?
        }
        None => {
            println!("Using the built-in disbursement schedule.");
            Catalogue::standard()
        }
    };

    println!("Catalogue contains {} items.", catalogue.len());
    for property_type in PropertyType::ALL {
        println!(
            "  {:<6} {} items auto-selected",
            property_type.label(),
            catalogue.for_property_type(property_type).count()
        );
    }

    if let Some(export) = &args.export {
        let file = File::create(export)
            .with_context(|| format!("Failed to create: {}", export.display()))?;
        let written = CatalogueLoader::write(&catalogue, file)
            .with_context(|| format!("Failed to write catalogue: {}", export.display()))?;
        println!("Exported {} items to {}.", written, export.display());
    }

    Ok(())
}
