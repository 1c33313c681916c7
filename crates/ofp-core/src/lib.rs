//! Extraction and safety-rule analysis for operational flight plan (OFP)
//! documents.
//!
//! The pipeline runs in two halves. Extraction: a [`extraction::DocumentExtractor`]
//! turns document bytes into text, [`parse_flightplan`] turns text into a
//! [`model::FlightPlanRecord`], and the merge engine optionally folds in a
//! secondary record from a [`augment::RemoteExtractor`]. Analysis: a
//! [`model::AnalysisRecord`] plus a [`analysis::ThresholdConfig`] go through
//! the data-quality validator and the threshold analyzer to produce an
//! [`analysis::AnalysisResult`]. Every stage is a pure function of its
//! inputs; only document extraction and the remote call do I/O.

pub mod analysis;
pub mod augment;
pub mod error;
pub mod extraction;
pub mod merge;
pub mod model;
pub mod parsing;

pub use error::OfpError;
pub use parsing::{parse_flightplan, Extraction, ExtractionNotes};

use augment::RemoteExtractor;
use extraction::DocumentExtractor;
use model::{AnalysisRecord, FieldValue, FlightPlanRecord};

/// Knobs for a full document run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Administrative toggle for the secondary extraction channel. Off by
    /// default; even when on, a minimally complete primary record skips it.
    pub augment: bool,
}

/// Result of a full document run: the extraction, how many pages the
/// backend saw, and the non-fatal diagnostic from a failed augmentation.
#[derive(Debug)]
pub struct ExtractOutcome {
    pub extraction: Extraction,
    pub page_count: usize,
    pub augmentation_error: Option<String>,
}

/// Run the whole extraction pipeline over document bytes. Only the text
/// extraction itself can fail; everything downstream is best-effort and
/// lands in the record or the notes.
pub fn extract_document(
    bytes: &[u8],
    extractor: &dyn DocumentExtractor,
    remote: Option<&dyn RemoteExtractor>,
    options: ExtractOptions,
) -> Result<ExtractOutcome, OfpError> {
    let raw = extractor.extract(bytes)?;
    let mut extraction = parse_flightplan(&raw.text);
    let mut augmentation_error = None;

    if let Some(remote) = remote {
        let (record, err) =
            merge::augment_record(extraction.record, &raw.text, remote, options.augment);
        augmentation_error = err.map(|e| e.to_string());
        extraction.analysis = refresh_analysis(&extraction.analysis, &record);
        extraction.record = record;
    }

    Ok(ExtractOutcome {
        extraction,
        page_count: raw.page_count,
        augmentation_error,
    })
}

/// Re-derive the analysis view after a merge changed the record, keeping
/// what only the original extraction knew: the scheduled times, the ground
/// distance, and ambiguous captures the merged record cannot represent.
fn refresh_analysis(previous: &AnalysisRecord, record: &FlightPlanRecord) -> AnalysisRecord {
    let mut next = AnalysisRecord::from_record(record, previous.runway_heading);
    next.time_departure = previous.time_departure.clone();
    next.time_arrival = previous.time_arrival.clone();
    next.ground_distance = previous.ground_distance.clone();

    let pairs: [(&mut FieldValue, &FieldValue); 7] = [
        (&mut next.takeoff_weight, &previous.takeoff_weight),
        (&mut next.landing_weight, &previous.landing_weight),
        (&mut next.zerofuel_weight, &previous.zerofuel_weight),
        (&mut next.trip_fuel, &previous.trip_fuel),
        (&mut next.contingency, &previous.contingency),
        (&mut next.minimum_takeoff_fuel, &previous.minimum_takeoff_fuel),
        (
            &mut next.corrected_minimum_takeoff_fuel,
            &previous.corrected_minimum_takeoff_fuel,
        ),
    ];
    for (slot, prev) in pairs {
        if slot.is_null() && !prev.is_null() {
            *slot = prev.clone();
        }
    }
    next
}
