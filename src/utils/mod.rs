//! Shared helpers.

pub mod merge;
