use thiserror::Error;

/// Kind of entity in the project graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    Sample,
    SampleRelation,
    Library,
    SequencingRun,
    Lane,
    Barcode,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "Project"),
            Self::Sample => write!(f, "Sample"),
            Self::SampleRelation => write!(f, "SampleRelation"),
            Self::Library => write!(f, "Library"),
            Self::SequencingRun => write!(f, "SequencingRun"),
            Self::Lane => write!(f, "Lane"),
            Self::Barcode => write!(f, "Barcode"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Expected type {expected} but {observed} was observed")]
    TypeMismatch {
        expected: EntityKind,
        observed: EntityKind,
    },

    #[error("A {family} object matching the string '{value}' could not be created")]
    UnrecognizedVariant { family: &'static str, value: String },

    #[error("{parent} already contains a child with key '{key}'")]
    DuplicateKey { parent: String, key: String },

    #[error("Required field '{field}' is missing from {entity}")]
    MissingField {
        entity: EntityKind,
        field: &'static str,
    },

    #[error("Invalid JSON for {entity}: {detail}")]
    InvalidJson { entity: EntityKind, detail: String },
}

impl ModelError {
    pub(crate) fn duplicate(parent_kind: EntityKind, parent_key: &str, key: &str) -> Self {
        Self::DuplicateKey {
            parent: format!("{parent_kind} '{parent_key}'"),
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_informative() {
        let err = ModelError::TypeMismatch {
            expected: EntityKind::Sample,
            observed: EntityKind::Library,
        };
        assert_eq!(err.to_string(), "Expected type Sample but Library was observed");

        let err = ModelError::duplicate(EntityKind::Project, "AA-0123", "S1");
        assert!(err.to_string().contains("Project 'AA-0123'"));
        assert!(err.to_string().contains("'S1'"));
    }
}
