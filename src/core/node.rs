//! Dynamically typed children.
//!
//! The typed `add_*` methods cannot receive the wrong child type. When the child
//! type is only known at runtime (e.g. while assembling a graph from mixed
//! sources), wrap it in a [`Node`] and use [`Container::attach`], which checks
//! the kind before touching the collection.

use crate::core::json::Entity;
use crate::core::library::{Barcode, Lane, Library, SequencingRun};
use crate::core::project::Project;
use crate::core::sample::{Sample, SampleRelation};
use crate::core::types::{EntityKind, ModelError};

/// Any entity of the project graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Project(Project),
    Sample(Sample),
    SampleRelation(SampleRelation),
    Library(Library),
    SequencingRun(SequencingRun),
    Lane(Lane),
    Barcode(Barcode),
}

impl Node {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Project(_) => EntityKind::Project,
            Self::Sample(_) => EntityKind::Sample,
            Self::SampleRelation(_) => EntityKind::SampleRelation,
            Self::Library(_) => EntityKind::Library,
            Self::SequencingRun(_) => EntityKind::SequencingRun,
            Self::Lane(_) => EntityKind::Lane,
            Self::Barcode(_) => EntityKind::Barcode,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Project(e) => e.key(),
            Self::Sample(e) => e.key(),
            Self::SampleRelation(e) => e.key(),
            Self::Library(e) => e.key(),
            Self::SequencingRun(e) => e.key(),
            Self::Lane(e) => e.key(),
            Self::Barcode(e) => e.key(),
        }
    }
}

macro_rules! impl_from_entity {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for Node {
                fn from(entity: $variant) -> Self {
                    Self::$variant(entity)
                }
            }
        )+
    };
}

impl_from_entity!(Project, Sample, SampleRelation, Library, SequencingRun, Lane, Barcode);

/// An entity holding typed child collections
pub trait Container {
    /// Attach a child to the collection matching its kind.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::TypeMismatch` if this entity has no collection for
    /// the child's kind, or `ModelError::DuplicateKey` if the key is taken.
    /// The entity is unchanged on error.
    fn attach(&mut self, child: Node) -> Result<(), ModelError>;
}

fn mismatch(expected: EntityKind, child: &Node) -> ModelError {
    ModelError::TypeMismatch {
        expected,
        observed: child.kind(),
    }
}

impl Container for Project {
    fn attach(&mut self, child: Node) -> Result<(), ModelError> {
        match child {
            Node::Sample(sample) => self.add_project_sample(sample),
            other => Err(mismatch(EntityKind::Sample, &other)),
        }
    }
}

impl Container for Sample {
    fn attach(&mut self, child: Node) -> Result<(), ModelError> {
        match child {
            Node::Library(library) => self.add_sample_library(library),
            Node::SampleRelation(relation) => self.add_sample_relation(relation),
            other => Err(mismatch(EntityKind::Library, &other)),
        }
    }
}

impl Container for Library {
    fn attach(&mut self, child: Node) -> Result<(), ModelError> {
        match child {
            Node::SequencingRun(run) => self.add_library_sequencing_run(run),
            other => Err(mismatch(EntityKind::SequencingRun, &other)),
        }
    }
}

impl Container for SequencingRun {
    fn attach(&mut self, child: Node) -> Result<(), ModelError> {
        match child {
            Node::Lane(lane) => self.add_sequencing_run_lane(lane),
            other => Err(mismatch(EntityKind::Lane, &other)),
        }
    }
}

impl Container for Lane {
    fn attach(&mut self, child: Node) -> Result<(), ModelError> {
        match child {
            Node::Barcode(barcode) => self.add_lane_barcode(barcode),
            other => Err(mismatch(EntityKind::Barcode, &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variants::RelationType;

    #[test]
    fn test_attach_matching_kind() {
        let mut project = Project::new("P1");
        project.attach(Sample::new("S1").into()).unwrap();
        assert_eq!(project.samples().len(), 1);

        let mut sample = Sample::new("S1");
        sample.attach(Library::new("L1").into()).unwrap();
        sample
            .attach(SampleRelation::new("S1", "S2", RelationType::Sibling).into())
            .unwrap();
        assert_eq!(sample.libraries().len(), 1);
        assert_eq!(sample.relations().len(), 1);
    }

    #[test]
    fn test_attach_wrong_kind_leaves_collection_unchanged() {
        let mut project = Project::new("P1");
        project.attach(Sample::new("S1").into()).unwrap();
        let before = project.samples().len();

        let err = project.attach(Library::new("L1").into()).unwrap_err();
        assert_eq!(
            err,
            ModelError::TypeMismatch {
                expected: EntityKind::Sample,
                observed: EntityKind::Library,
            }
        );
        assert_eq!(project.samples().len(), before);

        let mut lane = Lane::new("1");
        assert!(lane.attach(Lane::new("2").into()).is_err());
        assert!(lane.barcodes().is_empty());

        let mut run = SequencingRun::new("R");
        assert!(run.attach(Barcode::new("ACGT").into()).is_err());
        assert!(run.lanes().is_empty());

        let mut library = Library::new("L1");
        assert!(library.attach(Project::new("P").into()).is_err());
        assert!(library.sequencing_runs().is_empty());
    }

    #[test]
    fn test_node_kind_and_key() {
        let node: Node = Barcode::new("ACGT").into();
        assert_eq!(node.kind(), EntityKind::Barcode);
        assert_eq!(node.key(), "ACGT");
    }
}
