use clap::Parser;
use tracing_subscriber::EnvFilter;

use ngi_analysis_manager::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("ngi_analysis_manager=debug,info")
    } else {
        EnvFilter::new("ngi_analysis_manager=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Show(args) => {
            cli::show::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Import(args) => {
            cli::import::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::List(args) => {
            cli::list::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
