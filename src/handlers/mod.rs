//! Model handlers select the JSON dialect a connector speaks.
//!
//! - [`GenericHandler`]: the internal dialect used by JSON snapshots and sample sheets
//! - [`CharonHandler`]: the Charon LIMS dialect

use serde_json::Value;

use crate::core::json::Entity;
use crate::core::project::Project;
use crate::core::sample::Sample;
use crate::core::types::ModelError;
use crate::dialect::charon::{from_charon_json, Charon};

/// Converts between a connector's stored documents and entities
pub trait ModelHandler: std::fmt::Debug {
    /// # Errors
    ///
    /// Returns a `ModelError` if the document cannot be turned into a project.
    fn project_from_json(&self, json: &Value) -> Result<Project, ModelError>;

    /// # Errors
    ///
    /// Returns a `ModelError` if the document cannot be turned into a sample.
    fn sample_from_json(&self, json: &Value) -> Result<Sample, ModelError>;

    /// The document stored for a project (without the name-keyed wrapper)
    fn project_to_json(&self, project: &Project) -> Value;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericHandler;

impl ModelHandler for GenericHandler {
    fn project_from_json(&self, json: &Value) -> Result<Project, ModelError> {
        Project::from_json(json)
    }

    fn sample_from_json(&self, json: &Value) -> Result<Sample, ModelError> {
        Sample::from_json(json)
    }

    fn project_to_json(&self, project: &Project) -> Value {
        Value::Object(project.to_body())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CharonHandler;

impl ModelHandler for CharonHandler {
    fn project_from_json(&self, json: &Value) -> Result<Project, ModelError> {
        from_charon_json(json)
    }

    fn sample_from_json(&self, json: &Value) -> Result<Sample, ModelError> {
        from_charon_json(json)
    }

    fn project_to_json(&self, project: &Project) -> Value {
        Value::Object(Charon::new(project).to_json())
    }
}
