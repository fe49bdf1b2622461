//! groobi - flag new and changed rows between spreadsheet snapshots

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use groobi_lib::changes::normalize;
use groobi_lib::commands::{ChangeOutcome, SelectionFailure};
use groobi_lib::config::Config;
use groobi_lib::excel::{cleanup_orphaned_temp_files, HighlightOutcome};
use groobi_lib::{init_logging, run_detection, server};

#[derive(Parser)]
#[command(name = "groobi")]
#[command(author, version, about = "Highlight rows that changed between the last two snapshot sheets")]
struct Cli {
    /// Config file (default: <config dir>/groobi/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the last two snapshot sheets of a workbook and highlight changes
    Run {
        /// Workbook to process (xlsx)
        file: PathBuf,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to listen on (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Check whether a server is running
    Health {
        /// Base URL of the server (default: http://<bind_addr>)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Remove temp files left behind by interrupted saves
    Cleanup {
        /// Directory containing the workbooks
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Run { file } => run(&file, &config),
        Commands::Serve { bind } => serve(config, bind),
        Commands::Health { url } => health(&config, url),
        Commands::Cleanup { dir } => cleanup(&dir),
    }
}

fn run(file: &Path, config: &Config) -> Result<()> {
    let outcome = run_detection(file, config)
        .with_context(|| format!("Failed to process '{}'", file.display()))?;

    match &outcome {
        ChangeOutcome::FileNotFound => bail!("File not found: {}", file.display()),
        ChangeOutcome::NoComparableSheets { reason } => match reason {
            SelectionFailure::TooFew { found } => {
                println!("Need two snapshot sheets to compare, found {}", found)
            }
            SelectionFailure::Unreadable { message } => {
                println!("Could not read sheet list: {}", message)
            }
        },
        ChangeOutcome::NoCommonColumns => println!("No common columns between the snapshots"),
        ChangeOutcome::AllColumnsNoisy => println!("Every common column changed too much to compare"),
        ChangeOutcome::NoChanges {
            previous_sheet,
            current_sheet,
        } => println!("No changes between '{}' and '{}'", previous_sheet, current_sheet),
        ChangeOutcome::Changed(changed) => {
            println!(
                "{} changed rows in '{}' (compared with '{}'):",
                changed.rows.len(),
                changed.current_sheet,
                changed.previous_sheet
            );
            for row in &changed.rows {
                let cells: Vec<String> = row.cells.iter().map(normalize).collect();
                println!("  row {:>5}: {}", row.physical_row, cells.join(" | "));
            }
            match &changed.highlight {
                HighlightOutcome::Applied { rows, .. } => println!("Highlighted {} rows", rows),
                HighlightOutcome::Skipped { reason } => println!("Highlight skipped: {:?}", reason),
                HighlightOutcome::Failed { message } => println!("Highlight failed: {}", message),
            }
        }
    }

    Ok(())
}

fn serve(mut config: Config, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        config.bind_addr = bind;
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(server::serve(config))?;
    Ok(())
}

fn health(config: &Config, url: Option<String>) -> Result<()> {
    let url = url.unwrap_or_else(|| format!("http://{}", config.bind_addr));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let response = runtime
        .block_on(server::probe_health(&url))
        .with_context(|| format!("Server at {} is not reachable", url))?;

    println!("{}: {}", url, response.status);
    Ok(())
}

fn cleanup(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }

    let removed = cleanup_orphaned_temp_files(dir);
    println!("Removed {} orphaned temp files from {}", removed, dir.display());
    Ok(())
}
