use std::path::{Path, PathBuf};

use tracing::info;

use crate::connectors::{Connector, ConnectorError, JsonConnector};
use crate::core::project::Project;
use crate::handlers::ModelHandler;
use crate::parsing::samplesheet::{parse_samplesheet_file, SampleSheetError};

/// Sample sheet file names looked for in a run folder, in order
pub const SAMPLESHEET_NAMES: &[&str] = &["SampleSheet.csv"];

/// Name of the in-memory snapshot built from the sample sheet
const SNAPSHOT_NAME: &str = "SampleSheet.json";

/// Read-only connector serving the projects listed in a run folder's sample sheet
#[derive(Debug)]
pub struct FileSystemConnector {
    base_path: PathBuf,
    runfolder_name: String,
    samplesheet_names: Vec<String>,
    samplesheet_path: Option<PathBuf>,
    inner: JsonConnector,
}

impl FileSystemConnector {
    /// The run folder's last path component names the sequencing run.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        let runfolder_name = base_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| base_path.display().to_string());
        let inner = JsonConnector::new(base_path.join(SNAPSHOT_NAME), true);
        Self {
            base_path,
            runfolder_name,
            samplesheet_names: SAMPLESHEET_NAMES.iter().map(ToString::to_string).collect(),
            samplesheet_path: None,
            inner,
        }
    }

    #[must_use]
    pub fn with_samplesheet_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.samplesheet_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_model_handler(mut self, model_handler: Box<dyn ModelHandler>) -> Self {
        self.inner = self.inner.with_model_handler(model_handler);
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn runfolder_name(&self) -> &str {
        &self.runfolder_name
    }

    /// Sample sheet the connector was opened from
    pub fn samplesheet_path(&self) -> Option<&Path> {
        self.samplesheet_path.as_deref()
    }

    /// First candidate sample sheet that exists in the run folder
    ///
    /// # Errors
    ///
    /// Returns `SampleSheetError::NotFound` if none of the candidate names exist.
    pub fn locate_samplesheet(&self) -> Result<PathBuf, SampleSheetError> {
        self.samplesheet_names
            .iter()
            .map(|name| self.base_path.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| SampleSheetError::NotFound {
                path: self.base_path.clone(),
            })
    }
}

impl Connector for FileSystemConnector {
    fn connector_type(&self) -> &'static str {
        "FileSystemConnector"
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn open(&mut self) -> Result<(), ConnectorError> {
        let path = self.locate_samplesheet()?;
        let document = parse_samplesheet_file(&path, &self.runfolder_name)?;
        self.inner.set_document(document)?;
        info!(
            samplesheet = %path.display(),
            runfolder = %self.runfolder_name,
            "Loaded sample sheet"
        );
        self.samplesheet_path = Some(path);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        self.samplesheet_path = None;
        self.inner.close()
    }

    fn get_project(&self, name: &str) -> Result<Project, ConnectorError> {
        self.inner.get_project(name)
    }

    fn project_names(&self) -> Result<Vec<String>, ConnectorError> {
        self.inner.project_names()
    }
}
