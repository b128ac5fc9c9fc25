//! Wavefab command-line interface.
//!
//! Build permittivity tensors from TOML device descriptions:
//! ```sh
//! wavefab-cli run device.toml
//! wavefab-cli validate device.toml
//! wavefab-cli materials
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use wavefab_materials::provider::MaterialProvider;

#[derive(Parser)]
#[command(name = "wavefab-cli")]
#[command(about = "Wavefab: photonic device geometry to permittivity grids")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rasterise and assemble a device from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without assembling the domain.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display information about available materials.
    Materials {
        /// Wavelength at which to report refractive indices (nm).
        #[arg(short, long, default_value_t = 1550.0)]
        wavelength: f64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Wavefab Device Builder");
            println!("======================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let domain = runner::run_job(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_archive {
                runner::write_archive(&domain, &out_dir.join("permittivity.json"))?;
            }

            if job.output.save_slices {
                runner::write_slices_csv(&domain, &out_dir)?;
            }

            println!("Assembly complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let records = runner::validate_job(&job)?;
            println!(
                "Configuration is valid: {} ({} shapes)",
                config.display(),
                records.len()
            );
            Ok(())
        }
        Commands::Materials { wavelength } => {
            println!("Available materials at {wavelength} nm:");
            println!();
            for id in wavefab_materials::IDENTIFIERS {
                if let Ok(provider) = wavefab_materials::lookup(id) {
                    let (lo, hi) = provider.wavelength_range();
                    match provider.refractive_index(wavelength) {
                        Ok(n) => println!("  {id:<6} n = {n:.4}  (valid {lo}–{hi} nm)"),
                        Err(e) => println!("  {id:<6} {e}"),
                    }
                }
            }
            Ok(())
        }
    }
}
