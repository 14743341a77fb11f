use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::connectors::{Connector, FileSystemConnector, JsonConnector};

#[derive(Args)]
pub struct ImportArgs {
    /// Run folder holding a sample sheet
    #[arg(required = true)]
    pub runfolder: PathBuf,

    /// JSON snapshot to create or update
    #[arg(short, long, required = true, value_name = "FILE")]
    pub output: PathBuf,

    /// Sample sheet file names to look for, in order
    #[arg(long = "samplesheet", value_name = "NAME")]
    pub samplesheet_names: Vec<String>,
}

/// Execute import subcommand
///
/// # Errors
///
/// Returns an error if the sample sheet cannot be read or the snapshot cannot
/// be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ImportArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut source = FileSystemConnector::new(&args.runfolder);
    if !args.samplesheet_names.is_empty() {
        source = source.with_samplesheet_names(args.samplesheet_names.iter().cloned());
    }
    source.open()?;

    let mut target = JsonConnector::new(&args.output, false);
    target.open()?;

    let names = source.project_names()?;
    for name in &names {
        let project = source.get_project(name)?;
        if verbose {
            eprintln!("Importing {name} ({} samples)", project.samples().len());
        }
        target.add_or_replace_project(&project)?;
    }
    target.commit()?;
    target.close()?;
    source.close()?;

    match format {
        OutputFormat::Json => {
            let summary = json!({
                "runfolder": source.runfolder_name(),
                "output": args.output.display().to_string(),
                "projects": names,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            println!(
                "Imported {} project(s) from {} into {}",
                names.len(),
                source.runfolder_name(),
                args.output.display()
            );
            for name in &names {
                println!("  {name}");
            }
        }
    }
    Ok(())
}
