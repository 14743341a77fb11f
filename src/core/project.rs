use serde_json::{Map, Value};

use crate::core::json::{push_unique, Entity, JsonReader, JsonRecord};
use crate::core::sample::Sample;
use crate::core::types::{EntityKind, ModelError};
use crate::core::variants::{AnalysisType, DeliveryStatus, SequencingFacility, Status};

/// A sequencing project, the root of the entity graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,

    pub status: Option<Status>,

    pub analysis_type: Option<AnalysisType>,

    pub sequencing_facility: Option<SequencingFacility>,

    pub delivery_status: Option<DeliveryStatus>,

    /// Samples in insertion order, unique by name
    samples: Vec<Sample>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: None,
            analysis_type: None,
            sequencing_facility: None,
            delivery_status: None,
            samples: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.samples.iter().find(|sample| sample.name() == name)
    }

    pub fn set_status(&mut self, status: Option<Status>) {
        self.status = status;
    }

    pub fn set_analysis_type(&mut self, analysis_type: Option<AnalysisType>) {
        self.analysis_type = analysis_type;
    }

    pub fn set_sequencing_facility(&mut self, facility: Option<SequencingFacility>) {
        self.sequencing_facility = facility;
    }

    pub fn set_delivery_status(&mut self, delivery_status: Option<DeliveryStatus>) {
        self.delivery_status = delivery_status;
    }

    /// # Errors
    ///
    /// Returns `ModelError::DuplicateKey` if a sample with the same name exists.
    pub fn add_project_sample(&mut self, sample: Sample) -> Result<(), ModelError> {
        push_unique(Self::KIND, &self.name, &mut self.samples, sample)
    }
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn key(&self) -> &str {
        &self.name
    }

    fn to_body(&self) -> Map<String, Value> {
        JsonRecord::new()
            .scalar("project_name", Some(self.name.as_str()))
            .variant(self.status)
            .variant(self.analysis_type)
            .variant(self.sequencing_facility)
            .variant(self.delivery_status)
            .children("project_samples", &self.samples)
            .build()
    }

    fn from_json(json: &Value) -> Result<Self, ModelError> {
        let reader = JsonReader::new(Self::KIND, json)?;
        let mut project = Self::new(reader.required("project_name")?);
        project.set_status(reader.variant()?);
        project.set_analysis_type(reader.variant()?);
        project.set_sequencing_facility(reader.variant()?);
        project.set_delivery_status(reader.variant()?);
        for sample_json in reader.children("project_samples")? {
            project.add_project_sample(Sample::from_json(sample_json)?)?;
        }
        Ok(project)
    }
}
