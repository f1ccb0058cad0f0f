use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod catalogue;
mod config;
mod dashboard;
mod models;
mod pipeline;
mod store;
mod timeline;

use config::DataPaths;
use models::{Clock, DegreeLevel, Status};

#[derive(Parser)]
#[command(name = "scholarship-timeline")]
#[command(about = "Daily scholarship catalogue and application timeline tracker", long_about = None)]
struct Cli {
    /// Directory holding the catalogue, enriched table and summary
    /// (falls back to SCHOLARSHIP_DATA_DIR, then ./data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the scholarship catalogue
    Produce,
    /// Derive application status for every catalogue entry
    Enrich {
        /// Evaluate as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Run produce then enrich with retries
    Run {
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        retries: u32,
        #[arg(long, default_value_t = 300)]
        retry_delay_secs: u64,
    },
    /// Render the filtered dashboard
    Dashboard {
        /// Degree levels to include (repeatable)
        #[arg(long = "degree", value_enum)]
        degrees: Vec<DegreeLevel>,
        /// Countries or regions to include (repeatable)
        #[arg(long = "country")]
        countries: Vec<String>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Write the dashboard here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn clock_for(today: Option<NaiveDate>) -> Clock {
    match today {
        Some(day) => Clock::frozen_on(day),
        None => Clock::system(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = DataPaths::resolve(cli.data_dir);

    match cli.command {
        Commands::Produce => {
            let count = pipeline::produce(&paths)?;
            println!(
                "Catalogue written: {count} scholarships to {}.",
                paths.catalogue().display()
            );
        }
        Commands::Enrich { today } => {
            let stats = pipeline::enrich(&paths, clock_for(today))?;
            println!(
                "Timeline processed: {} total, {} open, {} upcoming, {} closed.",
                stats.total, stats.currently_open, stats.upcoming_open, stats.closed
            );
        }
        Commands::Run {
            today,
            retries,
            retry_delay_secs,
        } => {
            let policy = pipeline::RetryPolicy {
                retries,
                delay: Duration::from_secs(retry_delay_secs),
            };
            let stats = pipeline::run(&paths, clock_for(today), policy).await?;
            println!(
                "Pipeline complete: {} total, {} open, {} upcoming, {} closed.",
                stats.total, stats.currently_open, stats.upcoming_open, stats.closed
            );
        }
        Commands::Dashboard {
            degrees,
            countries,
            status,
            out,
        } => {
            let filter = dashboard::DashboardFilter {
                degrees,
                countries,
                status,
            };
            let output = dashboard::load(&paths, &filter, Clock::system().today)?;

            match out {
                Some(path) => {
                    store::write_atomic(&path, output.as_bytes())
                        .with_context(|| format!("write dashboard {}", path.display()))?;
                    println!("Dashboard written to {}.", path.display());
                }
                None => print!("{output}"),
            }
        }
    }

    Ok(())
}
