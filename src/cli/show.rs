use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;

use crate::cli::{open_charon, open_local, OutputFormat};
use crate::core::json::Entity;
use crate::core::library::Library;
use crate::core::project::Project;
use crate::core::sample::Sample;

#[derive(Args)]
pub struct ShowArgs {
    /// Project name
    #[arg(required = true)]
    pub project: String,

    #[command(flatten)]
    pub source: ShowSource,

    /// Charon API token
    #[arg(long, value_name = "TOKEN", requires = "charon_url")]
    pub api_token: Option<String>,
}

/// Exactly one project store
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ShowSource {
    /// JSON snapshot file
    #[arg(long, value_name = "FILE")]
    pub json_file: Option<PathBuf>,

    /// Run folder holding a sample sheet
    #[arg(long, value_name = "DIR")]
    pub runfolder: Option<PathBuf>,

    /// Charon base URL (requires --api-token)
    #[arg(long, value_name = "URL", requires = "api_token")]
    pub charon_url: Option<String>,
}

/// Execute show subcommand
///
/// # Errors
///
/// Returns an error if the store cannot be opened or does not hold the project.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ShowArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut connector = match (&args.source.charon_url, &args.api_token) {
        (Some(url), Some(token)) => open_charon(url, token)?,
        (Some(_), None) => anyhow::bail!("--charon-url requires --api-token"),
        (None, _) => open_local(
            args.source.json_file.as_deref(),
            args.source.runfolder.as_deref(),
        )?,
    };

    let project = connector.get_project(&args.project)?;
    connector.close()?;

    if verbose {
        eprintln!(
            "Loaded project {} with {} samples",
            project.name(),
            project.samples().len()
        );
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&project.to_json())?);
        }
        OutputFormat::Text => print!("{}", render_project(&project)),
    }
    Ok(())
}

/// Indented tree view of a project
pub fn render_project(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project {}", project.name());
    field(&mut out, 1, "status", project.status);
    field(&mut out, 1, "analysis_type", project.analysis_type);
    field(&mut out, 1, "sequencing_facility", project.sequencing_facility);
    field(&mut out, 1, "delivery_status", project.delivery_status);
    for sample in project.samples() {
        render_sample(&mut out, sample);
    }
    out
}

fn render_sample(out: &mut String, sample: &Sample) {
    let _ = writeln!(out, "  Sample {}", sample.name());
    field(out, 2, "sample_id", sample.sample_id.as_deref());
    field(out, 2, "gender", sample.gender);
    field(out, 2, "sample_type", sample.sample_type);
    for relation in sample.relations() {
        let _ = writeln!(
            out,
            "    Relation {} {} {}",
            relation.sample_a(),
            relation.relation_type(),
            relation.sample_b()
        );
    }
    for library in sample.libraries() {
        render_library(out, library);
    }
}

fn render_library(out: &mut String, library: &Library) {
    let _ = writeln!(out, "    Library {}", library.name());
    field(out, 3, "fragment_size", library.fragment_size.as_deref());
    field(out, 3, "fragment_lower", library.fragment_lower.as_deref());
    field(out, 3, "fragment_upper", library.fragment_upper.as_deref());
    for run in library.sequencing_runs() {
        let _ = writeln!(out, "      SequencingRun {}", run.name());
        for lane in run.lanes() {
            let barcodes: Vec<&str> = lane.barcodes().iter().map(|b| b.sequence()).collect();
            if barcodes.is_empty() {
                let _ = writeln!(out, "        Lane {}", lane.number());
            } else {
                let _ = writeln!(out, "        Lane {}: {}", lane.number(), barcodes.join(", "));
            }
        }
    }
}

fn field<T: std::fmt::Display>(out: &mut String, depth: usize, name: &str, value: Option<T>) {
    if let Some(value) = value {
        let _ = writeln!(out, "{:indent$}{name}: {value}", "", indent = depth * 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::{Barcode, Lane, SequencingRun};
    use crate::core::variants::{Gender, Status};

    #[test]
    fn test_render_project() {
        let mut lane = Lane::new("1");
        lane.add_lane_barcode(Barcode::new("ACGT")).unwrap();
        let mut run = SequencingRun::new("RUN1");
        run.add_sequencing_run_lane(lane).unwrap();
        let mut library = Library::new("L1");
        library.fragment_size = Some("364".to_string());
        library.add_library_sequencing_run(run).unwrap();
        let mut sample = Sample::new("S1").with_gender(Gender::Female);
        sample.add_sample_library(library).unwrap();
        let mut project = Project::new("P1");
        project.set_status(Some(Status::Open));
        project.add_project_sample(sample).unwrap();

        let text = render_project(&project);
        let expected = "\
Project P1
  status: open
  Sample S1
    gender: female
    Library L1
      fragment_size: 364
      SequencingRun RUN1
        Lane 1: ACGT
";
        assert_eq!(text, expected);
    }
}
