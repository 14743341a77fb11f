//! JSON dialects of external systems.
//!
//! The generic model knows nothing about dialects. A dialect adapter renames
//! fields at the boundary: on input before generic parsing, on output after
//! generic serialization.
//!
//! | Generic key | Charon key |
//! |-------------|------------|
//! | `project_name` | `projectid` |
//! | `analysis_type` | `best_practice_analysis` |
//! | `sample_name` | `sampleid` |

pub mod charon;

pub use charon::{from_charon_json, Charon, CharonEntity};
