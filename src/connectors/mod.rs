//! Connectors: a uniform open / commit / close / get_project contract over
//! different backing stores.
//!
//! | Connector | Backing store | Writable |
//! |-----------|---------------|----------|
//! | [`JsonConnector`] | a JSON snapshot file `{"projects": {...}}` | unless opened read-only |
//! | [`CharonConnector`] | the Charon LIMS REST API | never |
//! | [`FileSystemConnector`] | a run folder's sample sheet | never |
//!
//! Every mutating operation calls [`Connector::ensure_writable`] before any
//! I/O or state change, so a read-only connector never performs a partial write.

use thiserror::Error;

use crate::core::project::Project;
use crate::core::types::ModelError;
use crate::parsing::samplesheet::SampleSheetError;

pub mod charon;
pub mod filesystem;
pub mod json;

pub use charon::{CharonConnector, HttpResponse, ReqwestSession, Session};
pub use filesystem::FileSystemConnector;
pub use json::JsonConnector;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Project '{name}' could not be found{}", message_suffix(.message))]
    ProjectNotFound {
        name: String,
        message: Option<String>,
    },

    #[error("{connector} is read-only")]
    ReadOnly { connector: &'static str },

    #[error("Charon responded with status code {status} and message {body}")]
    Response { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    #[error("{connector} has not been opened")]
    NotOpen { connector: &'static str },

    #[error("Method {method} is not implemented by {connector}.")]
    NotImplemented {
        method: &'static str,
        connector: &'static str,
    },

    #[error("Invalid JSON document: {0}")]
    InvalidDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    SampleSheet(#[from] SampleSheetError),
}

impl ConnectorError {
    pub fn project_not_found(name: impl Into<String>) -> Self {
        Self::ProjectNotFound {
            name: name.into(),
            message: None,
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_ref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

/// Uniform access to a store of projects
pub trait Connector {
    /// Concrete connector name, used in error messages
    fn connector_type(&self) -> &'static str;

    fn is_read_only(&self) -> bool;

    /// Guard run first by every mutating operation.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::ReadOnly` if the connector is read-only.
    fn ensure_writable(&self) -> Result<(), ConnectorError> {
        if self.is_read_only() {
            Err(ConnectorError::ReadOnly {
                connector: self.connector_type(),
            })
        } else {
            Ok(())
        }
    }

    /// Open the backing store and load whatever the connector serves from it.
    ///
    /// # Errors
    ///
    /// Returns a `ConnectorError` if the store cannot be reached or read.
    fn open(&mut self) -> Result<(), ConnectorError>;

    /// Release the backing store. Uncommitted changes are discarded.
    ///
    /// # Errors
    ///
    /// Returns a `ConnectorError` if releasing the store fails.
    fn close(&mut self) -> Result<(), ConnectorError>;

    /// Persist changes made since `open`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::ReadOnly` on a read-only connector, or
    /// `ConnectorError::NotImplemented` if the connector cannot persist.
    fn commit(&mut self) -> Result<(), ConnectorError> {
        self.ensure_writable()?;
        Err(ConnectorError::NotImplemented {
            method: "commit",
            connector: self.connector_type(),
        })
    }

    /// Look up a project by name and rebuild it through the model handler.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::ProjectNotFound` if the store has no such project.
    fn get_project(&self, name: &str) -> Result<Project, ConnectorError>;

    /// Store `project`, overwriting any project with the same name.
    /// Nothing is persisted until `commit`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::ReadOnly` on a read-only connector, or
    /// `ConnectorError::NotImplemented` if the connector cannot store projects.
    fn add_or_replace_project(&mut self, _project: &Project) -> Result<(), ConnectorError> {
        self.ensure_writable()?;
        Err(ConnectorError::NotImplemented {
            method: "add_or_replace_project",
            connector: self.connector_type(),
        })
    }

    /// Names of all projects the connector can serve.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::NotImplemented` if the store cannot be enumerated.
    fn project_names(&self) -> Result<Vec<String>, ConnectorError> {
        Err(ConnectorError::NotImplemented {
            method: "project_names",
            connector: self.connector_type(),
        })
    }
}
