use serde_json::{Map, Value};

use crate::core::json::Entity;
use crate::core::project::Project;
use crate::core::sample::Sample;
use crate::core::types::ModelError;

/// An entity with a Charon document representation
pub trait CharonEntity: Entity {
    /// `(generic key, Charon key)` pairs for fields Charon names differently
    const TRANSLATION: &'static [(&'static str, &'static str)];
}

impl CharonEntity for Project {
    const TRANSLATION: &'static [(&'static str, &'static str)] = &[
        ("project_name", "projectid"),
        ("analysis_type", "best_practice_analysis"),
    ];
}

impl CharonEntity for Sample {
    const TRANSLATION: &'static [(&'static str, &'static str)] = &[("sample_name", "sampleid")];
}

/// Parse a Charon document: rename Charon keys to generic keys, then parse generically.
///
/// Fields Charon adds that the model does not know about are ignored.
///
/// # Errors
///
/// Returns a `ModelError` under the same conditions as [`Entity::from_json`].
pub fn from_charon_json<E: CharonEntity>(json: &Value) -> Result<E, ModelError> {
    let Value::Object(map) = json else {
        return E::from_json(json);
    };
    let mut translated = map.clone();
    for (generic, charon) in E::TRANSLATION {
        if let Some(value) = translated.remove(*charon) {
            translated.insert((*generic).to_string(), value);
        }
    }
    E::from_json(&Value::Object(translated))
}

/// Charon view of a generic entity.
///
/// The view serializes the entity body without the outer name-keyed layer.
/// Only the entity's own keys are renamed; nested children keep the generic dialect.
#[derive(Debug, Clone, Copy)]
pub struct Charon<'a, E> {
    entity: &'a E,
}

impl<'a, E: CharonEntity> Charon<'a, E> {
    pub fn new(entity: &'a E) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &'a E {
        self.entity
    }

    pub fn to_json(&self) -> Map<String, Value> {
        let mut body = self.entity.to_body();
        for (generic, charon) in E::TRANSLATION {
            if let Some(value) = body.remove(*generic) {
                body.insert((*charon).to_string(), value);
            }
        }
        body
    }
}
