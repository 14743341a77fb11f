//! Command-line interface for ngi-analysis.
//!
//! Available commands:
//!
//! - **show**: Print one project from a JSON snapshot, a run folder or Charon
//! - **import**: Add the projects of a run folder's sample sheet to a JSON snapshot
//! - **list**: List the projects in a JSON snapshot or a run folder
//!
//! ## Usage
//!
//! ```text
//! # Show a project straight from a run folder
//! ngi-analysis show AA-0001 --runfolder /data/171117_ST-E00123_0001_AHXXXXXX
//!
//! # Collect a run folder into a snapshot
//! ngi-analysis import /data/171117_ST-E00123_0001_AHXXXXXX --output projects.json
//!
//! # JSON output for scripting
//! ngi-analysis --format json show AA-0001 --json-file projects.json
//!
//! # Ask Charon
//! ngi-analysis show P1234 --charon-url https://charon.example.org --api-token "$TOKEN"
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::connectors::{CharonConnector, Connector, FileSystemConnector, JsonConnector};

pub mod import;
pub mod list;
pub mod show;

#[derive(Parser)]
#[command(name = "ngi-analysis")]
#[command(version)]
#[command(about = "Manage sequencing project metadata across Charon, JSON snapshots and sample sheets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a single project
    Show(show::ShowArgs),

    /// Import the projects of a run folder into a JSON snapshot
    ///
    /// Each project found in the sample sheet replaces any project of the same
    /// name already in the snapshot, including its sequencing runs from other
    /// run folders.
    Import(import::ImportArgs),

    /// List project names
    List(list::ListArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Local project stores: exactly one of a JSON snapshot or a run folder
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct LocalSource {
    /// JSON snapshot file
    #[arg(long, value_name = "FILE")]
    pub json_file: Option<PathBuf>,

    /// Run folder holding a sample sheet
    #[arg(long, value_name = "DIR")]
    pub runfolder: Option<PathBuf>,
}

impl LocalSource {
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened.
    pub fn open(&self) -> anyhow::Result<Box<dyn Connector>> {
        open_local(self.json_file.as_deref(), self.runfolder.as_deref())
    }
}

/// Build and open a read-only connector over a JSON snapshot or a run folder
///
/// # Errors
///
/// Returns an error if neither store is given or the store cannot be opened.
pub fn open_local(
    json_file: Option<&Path>,
    runfolder: Option<&Path>,
) -> anyhow::Result<Box<dyn Connector>> {
    let mut connector: Box<dyn Connector> = match (json_file, runfolder) {
        (Some(path), _) => Box::new(JsonConnector::new(path, true)),
        (None, Some(path)) => Box::new(FileSystemConnector::new(path)),
        (None, None) => anyhow::bail!("Either --json-file or --runfolder is required"),
    };
    connector.open()?;
    Ok(connector)
}

/// Open a Charon connector
///
/// # Errors
///
/// Returns an error if Charon cannot be reached or rejects the token.
pub fn open_charon(base_url: &str, api_token: &str) -> anyhow::Result<Box<dyn Connector>> {
    let mut connector = CharonConnector::new(base_url, api_token);
    connector.open()?;
    Ok(Box::new(connector))
}
