use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use fee_core::Catalogue;
use fee_data::CatalogueLoader;
use fee_ui::config::{AppConfig, ConfigOverrides};
use fee_ui::logging;
use fee_ui::preferences::TomlPreferenceStore;
use fee_ui::Session;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Conveyancing disbursement fee estimator.
///
/// Pick a property type, adjust the selected searches and fees, add your own
/// line items, and print an estimate with GST broken out.
#[derive(Debug, Parser)]
#[command(name = "FeeEstimator", version, about)]
struct Cli {
    /// TOML config file. Defaults to `fee-estimator.toml` when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalogue CSV to price from instead of the built-in schedule.
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// Preferences file that remembers whether the tour was completed.
    #[arg(long)]
    preferences: Option<PathBuf>,

    /// Log filter, e.g. `warn` or `fee_core=debug`. `RUST_LOG` takes precedence.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            catalogue: self.catalogue.clone(),
            preferences: self.preferences.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.config.as_deref(), cli.overrides())
        .context("Failed to load configuration")?;

    logging::init_logging(&config.log_level);
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }
    info!(version = env!("CARGO_PKG_VERSION"), "fee estimator starting");
    debug!(?config, "configuration");

    let catalogue = match &config.catalogue {
        Some(path) => {
            let catalogue = CatalogueLoader::load_from_path(path)
                .with_context(|| format!("Failed to load catalogue: {}", path.display()))?;
            info!(path = %path.display(), items = catalogue.len(), "catalogue loaded");
            catalogue
        }
        None => Catalogue::standard(),
    };

    let preferences = TomlPreferenceStore::new(&config.preferences);
    let mut session = Session::new(&catalogue, preferences)?;

    session.run(io::stdin().lock(), io::stdout().lock())
}
