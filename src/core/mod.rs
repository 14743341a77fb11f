//! Core data model for sequencing project metadata.
//!
//! The entity graph is a strict tree:
//!
//! ```text
//! Project → Sample → Library → SequencingRun → Lane → Barcode
//!              └──→ SampleRelation
//! ```
//!
//! - [`Project`], [`Sample`], [`Library`], [`SequencingRun`], [`Lane`], [`Barcode`]:
//!   the entities, each identified by a natural key (name, lane number or sequence)
//! - [`variants`]: tagged enumerated values (gender, status, ...) resolved from free text
//! - [`json`]: conversion to and from the generic JSON dialect
//! - [`node`]: runtime-typed children for kind-checked attachment
//!
//! ## Serialized form
//!
//! Child lists serialize as objects keyed by each child's natural key, and every
//! entity wraps its body under its own key:
//!
//! ```json
//! {"AA-0123": {"project_name": "AA-0123", "status": "open",
//!              "project_samples": {"S1": {"sample_name": "S1"}}}}
//! ```

pub mod json;
pub mod library;
pub mod node;
pub mod project;
pub mod sample;
pub mod types;
pub mod variants;

pub use json::Entity;
pub use library::{Barcode, Lane, Library, SequencingRun};
pub use node::{Container, Node};
pub use project::Project;
pub use sample::{Sample, SampleRelation};
pub use types::{EntityKind, ModelError};
