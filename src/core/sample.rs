use serde_json::{Map, Value};

use crate::core::json::{push_unique, Entity, JsonReader, JsonRecord};
use crate::core::library::Library;
use crate::core::types::{EntityKind, ModelError};
use crate::core::variants::{Gender, RelationType, SampleType};

/// A biological sample submitted within a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    name: String,

    /// Sample identifier as written in the sample sheet (e.g. `Sample_AA-0001-Sample_1`)
    pub sample_id: Option<String>,

    pub gender: Option<Gender>,

    pub sample_type: Option<SampleType>,

    relations: Vec<SampleRelation>,
    libraries: Vec<Library>,
}

impl Sample {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sample_id: None,
            gender: None,
            sample_type: None,
            relations: Vec::new(),
            libraries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    #[must_use]
    pub fn with_sample_type(mut self, sample_type: SampleType) -> Self {
        self.sample_type = Some(sample_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn relations(&self) -> &[SampleRelation] {
        &self.relations
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// # Errors
    ///
    /// Returns `ModelError::DuplicateKey` if a library with the same name exists.
    pub fn add_sample_library(&mut self, library: Library) -> Result<(), ModelError> {
        push_unique(Self::KIND, &self.name, &mut self.libraries, library)
    }

    /// # Errors
    ///
    /// Returns `ModelError::DuplicateKey` if the same relation is already recorded.
    pub fn add_sample_relation(&mut self, relation: SampleRelation) -> Result<(), ModelError> {
        push_unique(Self::KIND, &self.name, &mut self.relations, relation)
    }
}

impl Entity for Sample {
    const KIND: EntityKind = EntityKind::Sample;

    fn key(&self) -> &str {
        &self.name
    }

    fn to_body(&self) -> Map<String, Value> {
        JsonRecord::new()
            .scalar("sample_name", Some(self.name.as_str()))
            .scalar("sample_id", self.sample_id.as_deref())
            .variant(self.gender)
            .variant(self.sample_type)
            .children("sample_relations", &self.relations)
            .children("sample_libraries", &self.libraries)
            .build()
    }

    fn from_json(json: &Value) -> Result<Self, ModelError> {
        let reader = JsonReader::new(Self::KIND, json)?;
        let mut sample = Self::new(reader.required("sample_name")?);
        sample.sample_id = reader.optional("sample_id")?;
        sample.gender = reader.variant()?;
        sample.sample_type = reader.variant()?;
        for relation_json in reader.children("sample_relations")? {
            sample.add_sample_relation(SampleRelation::from_json(relation_json)?)?;
        }
        for library_json in reader.children("sample_libraries")? {
            sample.add_sample_library(Library::from_json(library_json)?)?;
        }
        Ok(sample)
    }
}

/// A typed link between two samples, referenced by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRelation {
    sample_a: String,
    sample_b: String,
    relation_type: RelationType,
    key: String,
}

impl SampleRelation {
    pub fn new(
        sample_a: impl Into<String>,
        sample_b: impl Into<String>,
        relation_type: RelationType,
    ) -> Self {
        let sample_a = sample_a.into();
        let sample_b = sample_b.into();
        let key = format!("{sample_a}/{sample_b}/{relation_type}");
        Self {
            sample_a,
            sample_b,
            relation_type,
            key,
        }
    }

    /// Relate two existing samples
    pub fn between(sample_a: &Sample, sample_b: &Sample, relation_type: RelationType) -> Self {
        Self::new(sample_a.name(), sample_b.name(), relation_type)
    }

    pub fn sample_a(&self) -> &str {
        &self.sample_a
    }

    pub fn sample_b(&self) -> &str {
        &self.sample_b
    }

    pub fn relation_type(&self) -> RelationType {
        self.relation_type
    }
}

impl Entity for SampleRelation {
    const KIND: EntityKind = EntityKind::SampleRelation;

    fn key(&self) -> &str {
        &self.key
    }

    fn to_body(&self) -> Map<String, Value> {
        JsonRecord::new()
            .scalar("sample_a", Some(self.sample_a.as_str()))
            .scalar("sample_b", Some(self.sample_b.as_str()))
            .variant(Some(self.relation_type))
            .build()
    }

    fn from_json(json: &Value) -> Result<Self, ModelError> {
        let reader = JsonReader::new(Self::KIND, json)?;
        let relation_type = reader
            .variant::<RelationType>()?
            .ok_or(ModelError::MissingField {
                entity: Self::KIND,
                field: "sample_relation_type",
            })?;
        Ok(Self::new(
            reader.required("sample_a")?,
            reader.required("sample_b")?,
            relation_type,
        ))
    }
}
