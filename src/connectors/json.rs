use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::connectors::{Connector, ConnectorError};
use crate::core::project::Project;
use crate::handlers::{GenericHandler, ModelHandler};

/// Top-level key holding the name-keyed project documents
pub const PROJECTS_KEY: &str = "projects";

/// Connector over a JSON snapshot file of the form `{"projects": {<name>: <project>}}`
#[derive(Debug)]
pub struct JsonConnector {
    path: PathBuf,
    read_only: bool,
    model_handler: Box<dyn ModelHandler>,
    document: Option<Map<String, Value>>,
}

impl JsonConnector {
    pub fn new(path: impl Into<PathBuf>, read_only: bool) -> Self {
        Self {
            path: path.into(),
            read_only,
            model_handler: Box::new(GenericHandler),
            document: None,
        }
    }

    #[must_use]
    pub fn with_model_handler(mut self, model_handler: Box<dyn ModelHandler>) -> Self {
        self.model_handler = model_handler;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory document, if the connector has been opened
    pub fn document(&self) -> Option<&Map<String, Value>> {
        self.document.as_ref()
    }

    /// Replace the in-memory document.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::InvalidDocument` if `document` is not an object
    /// or its `projects` entry is not an object.
    pub(crate) fn set_document(&mut self, document: Value) -> Result<(), ConnectorError> {
        let Value::Object(mut document) = document else {
            return Err(ConnectorError::InvalidDocument(format!(
                "{} does not hold a JSON object",
                self.path.display()
            )));
        };
        match document.get(PROJECTS_KEY) {
            None => {
                document.insert(PROJECTS_KEY.to_string(), Value::Object(Map::new()));
            }
            Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(ConnectorError::InvalidDocument(format!(
                    "'{PROJECTS_KEY}' in {} is not an object",
                    self.path.display()
                )));
            }
        }
        self.document = Some(document);
        Ok(())
    }

    fn projects(&self) -> Option<&Map<String, Value>> {
        self.document
            .as_ref()
            .and_then(|document| document.get(PROJECTS_KEY))
            .and_then(Value::as_object)
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), ConnectorError> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut temp, document)?;
        temp.write_all(b"\n")?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Connector for JsonConnector {
    fn connector_type(&self) -> &'static str {
        "JsonConnector"
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Load the snapshot. A writable connector whose file does not exist yet
    /// starts from an empty document.
    fn open(&mut self) -> Result<(), ConnectorError> {
        if !self.read_only && !self.path.exists() {
            debug!(path = %self.path.display(), "Starting new JSON document");
            self.document = Some(Map::from_iter([(
                PROJECTS_KEY.to_string(),
                Value::Object(Map::new()),
            )]));
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let document: Value = serde_json::from_str(&content)?;
        self.set_document(document)?;
        debug!(
            path = %self.path.display(),
            projects = self.projects().map_or(0, Map::len),
            "Loaded JSON document"
        );
        Ok(())
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        self.document = None;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ConnectorError> {
        self.ensure_writable()?;
        let document = self.document.as_ref().ok_or(ConnectorError::NotOpen {
            connector: self.connector_type(),
        })?;
        self.write_document(document)?;
        info!(path = %self.path.display(), "Committed JSON document");
        Ok(())
    }

    fn get_project(&self, name: &str) -> Result<Project, ConnectorError> {
        let body = self
            .projects()
            .and_then(|projects| projects.get(name))
            .ok_or_else(|| ConnectorError::project_not_found(name))?;
        Ok(self.model_handler.project_from_json(body)?)
    }

    fn add_or_replace_project(&mut self, project: &Project) -> Result<(), ConnectorError> {
        self.ensure_writable()?;
        let connector = self.connector_type();
        let body = self.model_handler.project_to_json(project);
        let projects = self
            .document
            .as_mut()
            .and_then(|document| document.get_mut(PROJECTS_KEY))
            .and_then(Value::as_object_mut)
            .ok_or(ConnectorError::NotOpen { connector })?;
        projects.insert(project.name().to_string(), body);
        Ok(())
    }

    fn project_names(&self) -> Result<Vec<String>, ConnectorError> {
        let projects = self.projects().ok_or(ConnectorError::NotOpen {
            connector: self.connector_type(),
        })?;
        Ok(projects.keys().cloned().collect())
    }
}
