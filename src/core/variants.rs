//! Tagged variants: closed families of enumerated values resolved from free text.
//!
//! Each family is a plain enum with a static registry of the (lowercase) strings
//! recognized for every variant. Resolution walks the registry in declaration order
//! and the first variant whose description set contains the lowercased input wins,
//! so description sets within a family must not overlap.
//!
//! | Family | JSON key | Canonical values |
//! |--------|----------|------------------|
//! | [`Gender`] | `sample_gender` | unknown, female, male |
//! | [`SampleType`] | `sample_type` | normal, tumor |
//! | [`RelationType`] | `sample_relation_type` | paired, sibling, parent |
//! | [`Status`] | `status` | open, closed, aborted, stale, fresh |
//! | [`AnalysisType`] | `analysis_type` | wgs, rnaseq |
//! | [`SequencingFacility`] | `sequencing_facility` | ngi-u, ngi-s |
//! | [`DeliveryStatus`] | `delivery_status` | not delivered, delivered |

use serde_json::{Map, Value};

use crate::core::types::ModelError;

/// A member of a closed family of variants, each identified by a set of
/// case-insensitive descriptions.
pub trait TaggedVariant: Copy + PartialEq + Sized + 'static {
    /// Family name used in error messages
    const FAMILY: &'static str;

    /// Key under which the variant appears in a serialized entity
    const JSON_KEY: &'static str;

    /// Registered variants in precedence order, with their recognized descriptions.
    /// The first description is the canonical form.
    const REGISTRY: &'static [(Self, &'static [&'static str])];

    /// Resolve a free-text description to a variant.
    ///
    /// A missing description resolves to `None` so optional fields can be read
    /// straight from a JSON object that may lack the key.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnrecognizedVariant` if no registered variant
    /// recognizes the description.
    fn create_instance(description: Option<&str>) -> Result<Option<Self>, ModelError> {
        let Some(description) = description else {
            return Ok(None);
        };
        let needle = description.to_lowercase();
        Self::REGISTRY
            .iter()
            .find(|(_, recognized)| recognized.contains(&needle.as_str()))
            .map(|(variant, _)| Some(*variant))
            .ok_or_else(|| ModelError::UnrecognizedVariant {
                family: Self::FAMILY,
                value: description.to_string(),
            })
    }

    /// Read this family's key from a serialized entity.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnrecognizedVariant` if the value is not a
    /// recognized description string.
    fn from_json(json: &Map<String, Value>) -> Result<Option<Self>, ModelError> {
        match json.get(Self::JSON_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(description)) => Self::create_instance(Some(description)),
            Some(other) => Err(ModelError::UnrecognizedVariant {
                family: Self::FAMILY,
                value: other.to_string(),
            }),
        }
    }

    /// All descriptions recognized for this variant
    fn descriptions(self) -> &'static [&'static str] {
        Self::REGISTRY
            .iter()
            .find(|(variant, _)| *variant == self)
            .map_or(&[], |(_, recognized)| recognized)
    }

    /// Canonical text form, used when serializing
    fn display(self) -> &'static str {
        self.descriptions().first().copied().unwrap_or_default()
    }

    /// The flat `{JSON_KEY: canonical}` mapping merged into the owning entity
    fn to_json(self) -> Map<String, Value> {
        let mut json = Map::new();
        json.insert(
            Self::JSON_KEY.to_string(),
            Value::String(self.display().to_string()),
        );
        json
    }
}

macro_rules! tagged_variant {
    (
        $(#[$meta:meta])*
        $name:ident ($family:literal, $key:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => [$($desc:literal),+ $(,)?] ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl TaggedVariant for $name {
            const FAMILY: &'static str = $family;
            const JSON_KEY: &'static str = $key;
            const REGISTRY: &'static [(Self, &'static [&'static str])] =
                &[ $( (Self::$variant, &[$($desc),+]) ),+ ];
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.display())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::create_instance(Some(s))?.ok_or_else(|| ModelError::UnrecognizedVariant {
                    family: Self::FAMILY,
                    value: s.to_string(),
                })
            }
        }
    };
}

tagged_variant! {
    /// Sample gender
    Gender("Gender", "sample_gender") {
        Unknown => ["unknown"],
        Female => ["female", "f"],
        Male => ["male", "m"],
    }
}

tagged_variant! {
    /// Tissue type of a sample
    SampleType("SampleType", "sample_type") {
        Normal => ["normal", "n"],
        Tumor => ["tumor", "t"],
    }
}

tagged_variant! {
    /// How two samples relate to each other
    RelationType("RelationType", "sample_relation_type") {
        /// Tumor/normal pair from the same individual
        Paired => ["paired"],
        Sibling => ["sibling"],
        Parent => ["parent"],
    }
}

tagged_variant! {
    /// Project status as tracked by the LIMS
    Status("Status", "status") {
        Open => ["open"],
        Closed => ["closed"],
        Aborted => ["aborted"],
        Stale => ["stale"],
        Fresh => ["fresh"],
    }
}

tagged_variant! {
    /// Best-practice analysis a project should go through
    AnalysisType("AnalysisType", "analysis_type") {
        /// Whole genome re-sequencing
        Wgs => ["wgs", "whole_genome_reseq", "whole genome reseq"],
        RnaSeq => ["rnaseq", "rna-seq", "rna_seq"],
    }
}

tagged_variant! {
    /// Facility that produced the sequencing data
    SequencingFacility("SequencingFacility", "sequencing_facility") {
        /// NGI Uppsala
        NgiU => ["ngi-u", "ngiu"],
        /// NGI Stockholm
        NgiS => ["ngi-s", "ngis"],
    }
}

tagged_variant! {
    DeliveryStatus("DeliveryStatus", "delivery_status") {
        NotDelivered => ["not delivered", "not_delivered"],
        Delivered => ["delivered"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn assert_disjoint<V: TaggedVariant>() {
        let mut seen = HashSet::new();
        for (_, descriptions) in V::REGISTRY {
            for description in *descriptions {
                assert_eq!(*description, description.to_lowercase());
                assert!(
                    seen.insert(*description),
                    "{} registers '{}' more than once",
                    V::FAMILY,
                    description
                );
            }
        }
    }

    #[test]
    fn test_registries_are_disjoint() {
        assert_disjoint::<Gender>();
        assert_disjoint::<SampleType>();
        assert_disjoint::<RelationType>();
        assert_disjoint::<Status>();
        assert_disjoint::<AnalysisType>();
        assert_disjoint::<SequencingFacility>();
        assert_disjoint::<DeliveryStatus>();
    }

    #[test]
    fn test_create_instance_is_case_insensitive() {
        assert_eq!(Gender::create_instance(Some("M")).unwrap(), Some(Gender::Male));
        assert_eq!(
            Gender::create_instance(Some("Female")).unwrap(),
            Some(Gender::Female)
        );
        assert_eq!(Status::create_instance(Some("OPEN")).unwrap(), Some(Status::Open));
        assert_eq!(
            DeliveryStatus::create_instance(Some("NOT DELIVERED")).unwrap(),
            Some(DeliveryStatus::NotDelivered)
        );
    }

    #[test]
    fn test_create_instance_none_is_not_an_error() {
        assert_eq!(SampleType::create_instance(None).unwrap(), None);
    }

    #[test]
    fn test_create_instance_unrecognized() {
        let err = SampleType::create_instance(Some("unknown-xyz")).unwrap_err();
        match &err {
            ModelError::UnrecognizedVariant { family, value } => {
                assert_eq!(*family, "SampleType");
                assert_eq!(value, "unknown-xyz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("unknown-xyz"));
    }

    #[test]
    fn test_from_json() {
        let json: Map<String, Value> =
            serde_json::from_str(r#"{"sample_type": "normal", "sample_gender": 3}"#).unwrap();
        assert_eq!(SampleType::from_json(&json).unwrap(), Some(SampleType::Normal));
        assert!(Gender::from_json(&json).is_err());
        assert_eq!(Status::from_json(&Map::new()).unwrap(), None);
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(Gender::Male.display(), "male");
        assert_eq!(AnalysisType::Wgs.to_string(), "wgs");
        assert_eq!(
            SequencingFacility::NgiU.to_json().get("sequencing_facility"),
            Some(&Value::String("ngi-u".to_string()))
        );
        assert_eq!("t".parse::<SampleType>().unwrap(), SampleType::Tumor);
        assert!("x".parse::<RelationType>().is_err());
    }
}
