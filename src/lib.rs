//! # ngi-analysis-manager
//!
//! A library for managing sequencing project metadata at a genomics facility.
//!
//! Project metadata (projects, samples, libraries, sequencing runs, lanes and
//! barcodes) lives in several places: the Charon LIMS, local JSON snapshots,
//! and the sample sheets the sequencers leave in each run folder.
//! `ngi-analysis-manager` models that metadata as one typed entity tree and
//! moves it between those stores.
//!
//! ## Features
//!
//! - **Typed entity tree**: `Project → Sample → Library → SequencingRun → Lane → Barcode`
//! - **Tagged variants**: gender, status, analysis type and friends resolved from free text
//! - **Two JSON dialects**: the generic dialect and Charon's field names
//! - **Connectors**: one open / get / add-or-replace / commit contract over every store
//! - **Sample sheet import**: Illumina `[Data]` tables turned into the same tree
//!
//! ## Example
//!
//! ```rust,no_run
//! use ngi_analysis_manager::connectors::{Connector, FileSystemConnector, JsonConnector};
//!
//! let mut runfolder = FileSystemConnector::new("/data/171117_ST-E00123_0001_AHXXXXXX");
//! runfolder.open().unwrap();
//!
//! let mut snapshot = JsonConnector::new("projects.json", false);
//! snapshot.open().unwrap();
//! for name in runfolder.project_names().unwrap() {
//!     let project = runfolder.get_project(&name).unwrap();
//!     snapshot.add_or_replace_project(&project).unwrap();
//! }
//! snapshot.commit().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Entities, tagged variants and the generic JSON dialect
//! - [`dialect`]: The Charon JSON dialect
//! - [`handlers`]: Dialect selection for connectors
//! - [`parsing`]: Sample sheet parsing
//! - [`connectors`]: JSON file, run folder and Charon stores
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod connectors;
pub mod core;
pub mod dialect;
pub mod handlers;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use connectors::{CharonConnector, Connector, ConnectorError, FileSystemConnector, JsonConnector};
pub use crate::core::types::*;
pub use crate::core::{Barcode, Entity, Lane, Library, Project, Sample, SampleRelation, SequencingRun};
pub use handlers::{CharonHandler, GenericHandler, ModelHandler};
