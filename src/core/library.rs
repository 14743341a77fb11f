use serde_json::{Map, Value};

use crate::core::json::{push_unique, Entity, JsonReader, JsonRecord};
use crate::core::types::{EntityKind, ModelError};

/// A sequencing library prepared from a sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    name: String,

    /// Mean fragment size, as reported by the lab
    pub fragment_size: Option<String>,

    /// Lower bound of the fragment size distribution
    pub fragment_lower: Option<String>,

    /// Upper bound of the fragment size distribution
    pub fragment_upper: Option<String>,

    sequencing_runs: Vec<SequencingRun>,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fragment_size: None,
            fragment_lower: None,
            fragment_upper: None,
            sequencing_runs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequencing_runs(&self) -> &[SequencingRun] {
        &self.sequencing_runs
    }

    /// # Errors
    ///
    /// Returns `ModelError::DuplicateKey` if a run with the same name exists.
    pub fn add_library_sequencing_run(&mut self, run: SequencingRun) -> Result<(), ModelError> {
        push_unique(Self::KIND, &self.name, &mut self.sequencing_runs, run)
    }
}

impl Entity for Library {
    const KIND: EntityKind = EntityKind::Library;

    fn key(&self) -> &str {
        &self.name
    }

    fn to_body(&self) -> Map<String, Value> {
        JsonRecord::new()
            .scalar("library_name", Some(self.name.as_str()))
            .scalar("fragment_size", self.fragment_size.as_deref())
            .scalar("fragment_lower", self.fragment_lower.as_deref())
            .scalar("fragment_upper", self.fragment_upper.as_deref())
            .children("library_sequencing_runs", &self.sequencing_runs)
            .build()
    }

    fn from_json(json: &Value) -> Result<Self, ModelError> {
        let reader = JsonReader::new(Self::KIND, json)?;
        let mut library = Self::new(reader.required("library_name")?);
        library.fragment_size = reader.optional("fragment_size")?;
        library.fragment_lower = reader.optional("fragment_lower")?;
        library.fragment_upper = reader.optional("fragment_upper")?;
        for run_json in reader.children("library_sequencing_runs")? {
            library.add_library_sequencing_run(SequencingRun::from_json(run_json)?)?;
        }
        Ok(library)
    }
}

/// One sequencing run (run folder) a library was sequenced on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencingRun {
    name: String,
    lanes: Vec<Lane>,
}

impl SequencingRun {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lanes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// # Errors
    ///
    /// Returns `ModelError::DuplicateKey` if the lane number is already present.
    pub fn add_sequencing_run_lane(&mut self, lane: Lane) -> Result<(), ModelError> {
        push_unique(Self::KIND, &self.name, &mut self.lanes, lane)
    }
}

impl Entity for SequencingRun {
    const KIND: EntityKind = EntityKind::SequencingRun;

    fn key(&self) -> &str {
        &self.name
    }

    fn to_body(&self) -> Map<String, Value> {
        JsonRecord::new()
            .scalar("sequencing_run_name", Some(self.name.as_str()))
            .children("sequencing_run_lanes", &self.lanes)
            .build()
    }

    fn from_json(json: &Value) -> Result<Self, ModelError> {
        let reader = JsonReader::new(Self::KIND, json)?;
        let mut run = Self::new(reader.required("sequencing_run_name")?);
        for lane_json in reader.children("sequencing_run_lanes")? {
            run.add_sequencing_run_lane(Lane::from_json(lane_json)?)?;
        }
        Ok(run)
    }
}

/// A flowcell lane, identified by its number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    number: String,
    barcodes: Vec<Barcode>,
}

impl Lane {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            barcodes: Vec::new(),
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn barcodes(&self) -> &[Barcode] {
        &self.barcodes
    }

    /// # Errors
    ///
    /// Returns `ModelError::DuplicateKey` if the barcode is already on this lane.
    pub fn add_lane_barcode(&mut self, barcode: Barcode) -> Result<(), ModelError> {
        push_unique(Self::KIND, &self.number, &mut self.barcodes, barcode)
    }
}

impl Entity for Lane {
    const KIND: EntityKind = EntityKind::Lane;

    fn key(&self) -> &str {
        &self.number
    }

    fn to_body(&self) -> Map<String, Value> {
        JsonRecord::new()
            .scalar("lane_num", Some(self.number.as_str()))
            .children("lane_barcodes", &self.barcodes)
            .build()
    }

    fn from_json(json: &Value) -> Result<Self, ModelError> {
        let reader = JsonReader::new(Self::KIND, json)?;
        let mut lane = Self::new(reader.required("lane_num")?);
        for barcode_json in reader.children("lane_barcodes")? {
            lane.add_lane_barcode(Barcode::from_json(barcode_json)?)?;
        }
        Ok(lane)
    }
}

/// Index sequence identifying a library within a lane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode {
    sequence: String,
}

impl Barcode {
    pub fn new(sequence: impl Into<String>) -> Self {
        Self {
            sequence: sequence.into(),
        }
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }
}

impl Entity for Barcode {
    const KIND: EntityKind = EntityKind::Barcode;

    fn key(&self) -> &str {
        &self.sequence
    }

    fn to_body(&self) -> Map<String, Value> {
        JsonRecord::new()
            .scalar("barcode_sequence", Some(self.sequence.as_str()))
            .build()
    }

    fn from_json(json: &Value) -> Result<Self, ModelError> {
        let reader = JsonReader::new(Self::KIND, json)?;
        Ok(Self::new(reader.required("barcode_sequence")?))
    }
}
