use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::json::JsonRecord;
use crate::utils::merge::merge_json;

/// Line that opens the sample table
pub const DATA_MARKER: &str = "[Data]";

#[derive(Error, Debug)]
pub enum SampleSheetError {
    #[error("No sample sheet could be found in {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Sample sheet {sheet} could not be recognized: {reason}")]
    Format { sheet: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SampleSheetError {
    fn format(sheet: &str, reason: impl Into<String>) -> Self {
        Self::Format {
            sheet: sheet.to_string(),
            reason: reason.into(),
        }
    }
}

/// One row of the `[Data]` table. Columns not listed here are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SampleSheetRow {
    #[serde(rename = "Sample_Name")]
    pub sample_name: String,

    #[serde(rename = "Sample_ID")]
    pub sample_id: String,

    #[serde(rename = "Sample_Project")]
    pub sample_project: String,

    #[serde(rename = "Lane")]
    pub lane: String,

    /// Barcode sequence; empty for lanes without an index
    #[serde(rename = "index")]
    pub index: String,

    /// `;`-separated `KEY:VALUE` pairs describing the library
    #[serde(rename = "Description")]
    pub description: String,
}

/// Parse a sample sheet file into a `{"projects": {...}}` document
///
/// # Errors
///
/// Returns `SampleSheetError::Io` if the file cannot be read, or
/// `SampleSheetError::Format` if the content is not a recognizable sample sheet.
pub fn parse_samplesheet_file(path: &Path, run_name: &str) -> Result<Value, SampleSheetError> {
    let content = std::fs::read_to_string(path)?;
    parse_samplesheet_text(&content, &path.display().to_string(), run_name)
}

/// Parse sample sheet text into a `{"projects": {...}}` document
///
/// `sheet` names the source in error messages.
///
/// # Errors
///
/// Returns `SampleSheetError::Format` if the `[Data]` section is missing or
/// empty, a required column is missing, or a Description cannot be parsed.
pub fn parse_samplesheet_text(
    text: &str,
    sheet: &str,
    run_name: &str,
) -> Result<Value, SampleSheetError> {
    let rows = read_data_rows(text, sheet)?;
    debug!(sheet, rows = rows.len(), "Read sample sheet data section");
    rows_to_json(&rows, sheet, run_name)
}

/// Read the rows of the table following the `[Data]` marker line.
/// A sheet without the marker yields no rows.
///
/// # Errors
///
/// Returns `SampleSheetError::Format` if the table is not valid CSV or lacks
/// a required column.
pub fn read_data_rows(text: &str, sheet: &str) -> Result<Vec<SampleSheetRow>, SampleSheetError> {
    let mut offset = 0;
    let mut data_start = None;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        if line.starts_with(DATA_MARKER) {
            data_start = Some(offset);
            break;
        }
    }
    let Some(start) = data_start else {
        return Ok(Vec::new());
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text[start..].as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| SampleSheetError::format(sheet, e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SampleSheetError::format(sheet, e.to_string()))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row: SampleSheetRow = record
            .deserialize(Some(&headers))
            .map_err(|e| SampleSheetError::format(sheet, e.to_string()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Merge sample sheet rows into the nested generic project structure.
///
/// Every row contributes the path project → sample → library → run → lane →
/// barcode; rows sharing a prefix accumulate under it.
///
/// # Errors
///
/// Returns `SampleSheetError::Format` if there are no rows, or a row's
/// Description is malformed or lacks `LIBRARY_NAME`.
pub fn rows_to_json(
    rows: &[SampleSheetRow],
    sheet: &str,
    run_name: &str,
) -> Result<Value, SampleSheetError> {
    if rows.is_empty() {
        return Err(SampleSheetError::format(
            sheet,
            format!("the expected {DATA_MARKER} section was not found"),
        ));
    }

    let mut projects = Map::new();
    for row in rows {
        let library = parse_description(&row.description)
            .map_err(|reason| SampleSheetError::format(sheet, reason))?;
        let library_name = library.get("library_name").ok_or_else(|| {
            SampleSheetError::format(
                sheet,
                format!(
                    "the LIBRARY_NAME tag could not be parsed from the Description '{}'",
                    row.description
                ),
            )
        })?;
        if row.index.is_empty() {
            warn!(
                sample = %row.sample_name,
                lane = %row.lane,
                "Sample sheet row has no index, lane recorded without barcode"
            );
        }
        merge_json(&mut projects, row_tree(row, library_name, &library, run_name));
    }

    Ok(json!({ "projects": projects }))
}

/// Split a Description into lowercased keys and their values
fn parse_description(description: &str) -> Result<HashMap<String, String>, String> {
    let mut pairs = HashMap::new();
    for pair in description.split(';').filter(|pair| !pair.is_empty()) {
        let mut parts = pair.split(':');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!(
                "malformed KEY:VALUE pair '{pair}' in the Description '{description}'"
            ));
        };
        pairs.insert(key.trim().to_lowercase(), value.trim().to_string());
    }
    Ok(pairs)
}

fn keyed(key: &str, body: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), body);
    Value::Object(map)
}

fn row_tree(
    row: &SampleSheetRow,
    library_name: &str,
    library: &HashMap<String, String>,
    run_name: &str,
) -> Map<String, Value> {
    let mut lane = json!({ "lane_num": row.lane });
    if !row.index.is_empty() {
        lane["lane_barcodes"] = keyed(&row.index, json!({ "barcode_sequence": row.index }));
    }

    let run = json!({
        "sequencing_run_name": run_name,
        "sequencing_run_lanes": keyed(&row.lane, lane),
    });

    let mut library_body = JsonRecord::new()
        .scalar("library_name", Some(library_name))
        .scalar("fragment_size", library.get("fragment_size").map(String::as_str))
        .scalar("fragment_lower", library.get("fragment_lower").map(String::as_str))
        .scalar("fragment_upper", library.get("fragment_upper").map(String::as_str))
        .build();
    library_body.insert("library_sequencing_runs".to_string(), keyed(run_name, run));

    let sample = json!({
        "sample_name": row.sample_name,
        "sample_id": row.sample_id,
        "sample_libraries": keyed(library_name, Value::Object(library_body)),
    });

    let project = json!({
        "project_name": row.sample_project,
        "project_samples": keyed(&row.sample_name, sample),
    });

    let mut tree = Map::new();
    tree.insert(row.sample_project.clone(), project);
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLESHEET: &str = "
[Header],,,,,,,,
IEMFileVersion,1,,,,,,,
Date,2017-11-17,,,,,,,
Workflow,Resequencing - HiSeqX,,,,,,,
,,,,,,,,
[Reads],,,,,,,,
151,,,,,,,,
151,,,,,,,,
,,,,,,,,
[Data],,,,,,,,
Lane,Sample_ID,Sample_Name,Sample_Plate,Sample_Well,I7_Index_ID,index,Sample_Project,Description
1,Sample_AA-0001-Sample_1,AA-0001-Sample_1,,,,ACTGAT,AA-0001,FRAGMENT_SIZE:364;FRAGMENT_LOWER:230;FRAGMENT_UPPER:730;LIBRARY_NAME:AA-0001-Sample_1_2-80988
1,Sample_AA-0001-Sample_2,AA-0001-Sample_2,,,,ATTCCT,AA-0001,FRAGMENT_SIZE:364;FRAGMENT_LOWER:230;FRAGMENT_UPPER:730;LIBRARY_NAME:AA-0001-Sample_2_2-80988
1,Sample_AA-0001-Sample_2,AA-0001-Sample_2,,,,TTAGGC,AA-0001,FRAGMENT_SIZE:364;FRAGMENT_LOWER:230;FRAGMENT_UPPER:730;LIBRARY_NAME:AA-0001-Sample_2_2-80988
2,Sample_AA-0001-Sample_2,AA-0001-Sample_2,,,,ATTCCT,AA-0001,FRAGMENT_SIZE:364;FRAGMENT_LOWER:230;FRAGMENT_UPPER:730;LIBRARY_NAME:AA-0001-Sample_2_2-80988
2,Sample_BB-0002-Sample_1,BB-0002-Sample_1,,,,CGATGT,BB-0002,FRAGMENT_SIZE:364;FRAGMENT_LOWER:230;FRAGMENT_UPPER:730;LIBRARY_NAME:BB-0002-Sample_1_2-80988
4,Sample_CC-0003-Sample_1,CC-0003-Sample_1,,,,,CC-0003,LIBRARY_NAME:CC-0003-Sample_1_2-80988
";

    fn row(lane: &str) -> SampleSheetRow {
        SampleSheetRow {
            sample_name: "S1".to_string(),
            sample_id: "Sample_S1".to_string(),
            sample_project: "P".to_string(),
            lane: lane.to_string(),
            index: "ACGT".to_string(),
            description: "LIBRARY_NAME:L1".to_string(),
        }
    }

    #[test]
    fn test_rows_accumulate_lanes() {
        let json = rows_to_json(&[row("1"), row("2")], "test", "R").unwrap();
        let lanes = json["projects"]["P"]["project_samples"]["S1"]["sample_libraries"]["L1"]
            ["library_sequencing_runs"]["R"]["sequencing_run_lanes"]
            .as_object()
            .unwrap();
        let keys: Vec<&str> = lanes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1", "2"]);
        for lane in lanes.values() {
            let barcodes = lane["lane_barcodes"].as_object().unwrap();
            assert_eq!(barcodes.len(), 1);
            assert!(barcodes.contains_key("ACGT"));
        }
    }

    #[test]
    fn test_parse_samplesheet_text() {
        let json = parse_samplesheet_text(SAMPLESHEET, "SampleSheet.csv", "RUN1").unwrap();
        let sample = &json["projects"]["AA-0001"]["project_samples"]["AA-0001-Sample_2"];
        assert_eq!(sample["sample_id"], json!("Sample_AA-0001-Sample_2"));

        let library = &sample["sample_libraries"]["AA-0001-Sample_2_2-80988"];
        assert_eq!(library["fragment_size"], json!("364"));
        assert_eq!(library["fragment_lower"], json!("230"));
        assert_eq!(library["fragment_upper"], json!("730"));

        let lanes = &library["library_sequencing_runs"]["RUN1"]["sequencing_run_lanes"];
        assert_eq!(
            lanes["1"]["lane_barcodes"],
            json!({
                "ATTCCT": {"barcode_sequence": "ATTCCT"},
                "TTAGGC": {"barcode_sequence": "TTAGGC"}
            })
        );
        assert_eq!(
            lanes["2"]["lane_barcodes"],
            json!({"ATTCCT": {"barcode_sequence": "ATTCCT"}})
        );

        assert_eq!(json["projects"].as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_lane_without_index_has_no_barcodes() {
        let json = parse_samplesheet_text(SAMPLESHEET, "SampleSheet.csv", "RUN1").unwrap();
        let library = &json["projects"]["CC-0003"]["project_samples"]["CC-0003-Sample_1"]
            ["sample_libraries"]["CC-0003-Sample_1_2-80988"];
        assert_eq!(
            library["library_sequencing_runs"]["RUN1"]["sequencing_run_lanes"]["4"],
            json!({"lane_num": "4"})
        );
        assert!(library.get("fragment_size").is_none());
    }

    #[test]
    fn test_missing_data_section() {
        let text = SAMPLESHEET.replace("[Data]", "[Not Data]");
        let err = parse_samplesheet_text(&text, "SampleSheet.csv", "RUN1").unwrap_err();
        assert!(matches!(err, SampleSheetError::Format { .. }));
        assert!(err.to_string().contains("[Data]"));
    }

    #[test]
    fn test_missing_library_name() {
        let text = SAMPLESHEET.replacen("LIBRARY_NAME", "NOT_LIBRARY_NAME", 1);
        let err = parse_samplesheet_text(&text, "SampleSheet.csv", "RUN1").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("LIBRARY_NAME"));
        assert!(message.contains(
            "FRAGMENT_SIZE:364;FRAGMENT_LOWER:230;FRAGMENT_UPPER:730;NOT_LIBRARY_NAME:AA-0001-Sample_1_2-80988"
        ));
        assert!(!message.contains("[Data]"));
    }

    #[test]
    fn test_malformed_description_pair() {
        let mut bad = row("1");
        bad.description = "LIBRARY_NAME:L1;JUNK".to_string();
        let err = rows_to_json(&[bad], "test", "R").unwrap_err();
        assert!(err.to_string().contains("JUNK"));
    }

    #[test]
    fn test_description_pair_with_extra_colon() {
        let mut bad = row("1");
        bad.description = "LIBRARY_NAME:L1:EXTRA".to_string();
        let err = rows_to_json(&[bad], "test", "R").unwrap_err();
        assert!(matches!(err, SampleSheetError::Format { .. }));
        assert!(err.to_string().contains("LIBRARY_NAME:L1:EXTRA"));
    }

    #[test]
    fn test_description_keys_are_case_insensitive() {
        let mut lower = row("1");
        lower.description = "library_name:L1;Fragment_Size:200;".to_string();
        let json = rows_to_json(&[lower], "test", "R").unwrap();
        let library = &json["projects"]["P"]["project_samples"]["S1"]["sample_libraries"]["L1"];
        assert_eq!(library["fragment_size"], json!("200"));
    }

    #[test]
    fn test_missing_column() {
        let text = "[Data]\nLane,Sample_ID,Sample_Name,index,Description\n1,a,b,ACGT,LIBRARY_NAME:x\n";
        let err = parse_samplesheet_text(text, "SampleSheet.csv", "RUN1").unwrap_err();
        assert!(matches!(err, SampleSheetError::Format { .. }));
        assert!(err.to_string().contains("Sample_Project"));
    }

    #[test]
    fn test_empty_data_section() {
        let text = "[Header]\n[Data]\nLane,Sample_ID,Sample_Name,Sample_Project,index,Description\n";
        let err = parse_samplesheet_text(text, "SampleSheet.csv", "RUN1").unwrap_err();
        assert!(err.to_string().contains("[Data]"));
    }
}
