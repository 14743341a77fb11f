use clap::Args;

use crate::cli::{LocalSource, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: LocalSource,
}

/// Execute list subcommand
///
/// # Errors
///
/// Returns an error if the store cannot be opened.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ListArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut connector = args.source.open()?;
    let names = connector.project_names()?;
    connector.close()?;

    if verbose {
        eprintln!("Found {} project(s)", names.len());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Text => {
            for name in &names {
                println!("{name}");
            }
        }
    }
    Ok(())
}
