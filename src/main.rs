use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use datalab::analysis::{self, SeasonOptions};
use datalab::app::{ProbeService, resolver};
use datalab::domain::DatabaseKind;
use datalab::infra::{self, DriverConnector, LogFormat, ProcessEnv, WorkspaceLayout};

#[derive(Parser)]
#[command(name = "datalab")]
#[command(author, version, about = "Notebook environment with SQL Server and MariaDB connection recipes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format (text or json)
    #[arg(long, global = true, env = "LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum Database {
    Mssql,
    Mariadb,
    All,
}

impl Database {
    fn kinds(self) -> Vec<DatabaseKind> {
        match self {
            Database::Mssql => vec![DatabaseKind::Mssql],
            Database::Mariadb => vec![DatabaseKind::MariaDb],
            Database::All => vec![DatabaseKind::Mssql, DatabaseKind::MariaDb],
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved connection profile (password masked)
    Profile {
        #[arg(value_enum, default_value = "all")]
        database: Database,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Connect, run SELECT 1 and disconnect
    Check {
        #[arg(value_enum, default_value = "all")]
        database: Database,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Start the notebook server in the foreground
    Notebook,

    /// Create the workspace folder layout
    Init {
        #[arg(default_value = ".")]
        root: PathBuf,
    },

    /// Minimum Number of Individuals per transect, as CSV on stdout
    Mni {
        /// Input CSV file
        input: PathBuf,
    },

    /// Welch t-tests between consecutive field seasons, as CSV on stdout
    Seasons {
        /// Input CSV file
        input: PathBuf,

        #[arg(long, default_value = "Year")]
        season_column: String,

        #[arg(long, default_value = "Pre: Distance spotted")]
        value_column: String,

        #[arg(long, default_value_t = 0.05)]
        alpha: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    let dotenv_path = infra::env::load_dotenv();

    let cli = Cli::parse();
    infra::init_tracing(cli.log_format, cli.verbose);
    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "Loaded environment file");
    }

    match cli.command {
        Commands::Profile { database, json } => {
            for kind in database.kinds() {
                let summary = resolver::resolve(&ProcessEnv, kind)?.summary();
                if json {
                    println!("{}", serde_json::to_string(&summary)?);
                } else {
                    println!("{}: {}", summary.kind, summary.descriptor);
                }
            }
        }
        Commands::Check { database, json } => {
            let service = ProbeService::new(Arc::new(ProcessEnv), Arc::new(DriverConnector));
            let mut failed = false;
            for kind in database.kinds() {
                let report = service.probe(kind).await?;
                failed |= !report.reachable;
                if json {
                    println!("{}", serde_json::to_string(&report)?);
                } else if report.reachable {
                    println!("{}: ok ({} ms)", report.kind, report.elapsed_ms);
                } else {
                    println!(
                        "{}: FAILED {}",
                        report.kind,
                        report.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
            if failed {
                std::process::exit(1);
            }
        }
        Commands::Notebook => {
            let config = resolver::resolve_notebook(&ProcessEnv)?;
            infra::notebook::run(&config).await?;
        }
        Commands::Init { root } => {
            let layout = WorkspaceLayout::new(root);
            for path in layout.scaffold()? {
                println!("created {}", path.display());
            }
        }
        Commands::Mni { input } => {
            let file = File::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let rows = analysis::calculate_mni(BufReader::new(file))?;
            analysis::mni::write_mni(io::stdout().lock(), &rows)?;
        }
        Commands::Seasons {
            input,
            season_column,
            value_column,
            alpha,
        } => {
            let file = File::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let options = SeasonOptions {
                season_column,
                value_column,
                alpha,
            };
            let rows = analysis::compare_consecutive_seasons(BufReader::new(file), &options)?;
            analysis::seasons::write_comparisons(io::stdout().lock(), &rows)?;
        }
    }

    Ok(())
}
