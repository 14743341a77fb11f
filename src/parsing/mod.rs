//! Parsers for instrument-generated files.
//!
//! Currently one format is supported: the Illumina sample sheet.
//!
//! ## Sample sheet layout
//!
//! ```text
//! [Header],,,
//! Date,2017-11-17,,
//! [Data],,,
//! Lane,Sample_ID,Sample_Name,index,Sample_Project,Description
//! 1,Sample_S1,S1,ACGTAC,P1,FRAGMENT_SIZE:364;LIBRARY_NAME:S1_lib
//! ```
//!
//! | Column | Becomes |
//! |--------|---------|
//! | Sample_Project | project name |
//! | Sample_Name / Sample_ID | sample name and id |
//! | Description `LIBRARY_NAME` | library name (required) |
//! | Description `FRAGMENT_SIZE`, `FRAGMENT_LOWER`, `FRAGMENT_UPPER` | library fragment sizes |
//! | Lane | lane number |
//! | index | barcode sequence |
//!
//! The sequencing run is named after the run folder holding the sheet.

pub mod samplesheet;
