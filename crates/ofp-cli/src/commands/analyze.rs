use ofp_core::analysis::{analyze, load_thresholds};
use ofp_core::extraction::pdftotext::PdftotextExtractor;
use ofp_core::model::{AnalysisRecord, FlightPlanRecord};
use ofp_core::{extract_document, ExtractOptions};
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    threshold_file: Option<PathBuf>,
    runway_heading: Option<f64>,
    output_format: &str,
) -> Result<(), ofp_core::error::OfpError> {
    let config = load_thresholds(threshold_file.as_deref());

    // Determine input type by extension
    let is_json = input_file
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let mut record = if is_json {
        let json_bytes = std::fs::read(&input_file)?;
        record_from_json(&json_bytes)?
    } else {
        let pdf_bytes = std::fs::read(&input_file)?;
        let extractor = PdftotextExtractor::new();
        let outcome =
            extract_document(&pdf_bytes, &extractor, None, ExtractOptions::default())?;
        outcome.extraction.analysis
    };

    if runway_heading.is_some() {
        record.runway_heading = runway_heading;
    }

    let result = analyze(&record, &[], &config);

    match output_format {
        "json" => output::json::print_analysis(&result)?,
        _ => output::table::print_analysis(&result),
    }

    Ok(())
}

/// A JSON input may be an analysis-shaped record or an extraction record;
/// both are all-optional, so key names decide which shape it is.
fn record_from_json(bytes: &[u8]) -> Result<AnalysisRecord, ofp_core::error::OfpError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let looks_extracted = value
        .as_object()
        .is_some_and(|obj| obj.contains_key("flight_number") || obj.contains_key("notams"));
    if looks_extracted {
        let record: FlightPlanRecord = serde_json::from_value(value)?;
        Ok(AnalysisRecord::from_record(&record, None))
    } else {
        Ok(serde_json::from_value(value)?)
    }
}
