pub mod fields;
pub mod normalize;
pub mod notams;
pub mod risk;
pub mod values;
pub mod weather;

use crate::model::{AnalysisRecord, FieldValue, FlightPlanRecord, Fuel, Weights};
use fields::ParsedFields;
use serde::{Deserialize, Serialize};
use values::NumericCapture;

/// Record paths the extractor could not resolve, split by why. `missing`
/// means no evidence at all; `ambiguous` means evidence was found but did
/// not parse cleanly. Both sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionNotes {
    pub missing: Vec<String>,
    pub ambiguous: Vec<String>,
}

/// Output of a parse run: the canonical record, the analysis-shaped view of
/// it, and the extraction notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    pub record: FlightPlanRecord,
    pub analysis: AnalysisRecord,
    pub notes: ExtractionNotes,
}

/// Run the full extraction pipeline over raw document text: normalize, then
/// field extractors, then the weather and NOTAM segmenters, then compose.
pub fn parse_flightplan(raw_text: &str) -> Extraction {
    let text = normalize::normalize_text(raw_text);
    let parsed = fields::extract_fields(&text);

    let etops = parsed.etops_alternates.clone().unwrap_or_default();
    let weather = weather::extract_weather(
        &text,
        parsed.departure.as_deref(),
        parsed.destination.as_deref(),
        parsed.avg_wind,
    );
    let notam_set = notams::extract_notams(
        &text,
        parsed.departure.as_deref(),
        parsed.destination.as_deref(),
        &etops,
    );

    let record = FlightPlanRecord {
        flight_number: parsed.callsign.clone(),
        route: parsed.route.clone(),
        departure: parsed.departure.clone(),
        destination: parsed.destination.clone(),
        destination_alternate: parsed.destination_alternate.clone(),
        weights: Weights {
            takeoff_weight: parsed.takeoff_weight.value(),
            landing_weight: parsed.landing_weight.value(),
            zerofuel_weight: parsed.zerofuel_weight.value(),
        },
        fuel: Fuel {
            trip_fuel: parsed.trip_fuel.value(),
            contingency: parsed.contingency.value(),
            minimum_takeoff_fuel: parsed.minimum_takeoff_fuel.value(),
            corrected_minimum_takeoff_fuel: parsed.corrected_minimum_takeoff_fuel.value(),
            block_fuel: parsed.block_fuel.value(),
            taxi: parsed.taxi.value(),
        },
        weather,
        notams: notam_set,
    };

    let notes = notes_for(&parsed, &record);
    let analysis = analysis_view(&parsed, &record);

    Extraction {
        record,
        analysis,
        notes,
    }
}

/// The analysis view keeps what the minimal record drops: the scheduled
/// times, the ground distance, and the missing-vs-ambiguous distinction of
/// each numeric capture.
fn analysis_view(parsed: &ParsedFields, record: &FlightPlanRecord) -> AnalysisRecord {
    let mut analysis = AnalysisRecord::from_record(record, None);
    analysis.time_departure = parsed.time_departure.clone();
    analysis.time_arrival = parsed.time_arrival.clone();
    analysis.ground_distance = field_value(&parsed.ground_distance);
    analysis.takeoff_weight = field_value(&parsed.takeoff_weight);
    analysis.landing_weight = field_value(&parsed.landing_weight);
    analysis.zerofuel_weight = field_value(&parsed.zerofuel_weight);
    analysis.trip_fuel = field_value(&parsed.trip_fuel);
    analysis.contingency = field_value(&parsed.contingency);
    analysis.minimum_takeoff_fuel = field_value(&parsed.minimum_takeoff_fuel);
    analysis.corrected_minimum_takeoff_fuel = field_value(&parsed.corrected_minimum_takeoff_fuel);
    analysis
}

/// Ambiguous captures survive into the analysis record as their raw text so
/// the validator can classify them itself.
fn field_value(cap: &NumericCapture) -> FieldValue {
    match cap {
        NumericCapture::Missing => FieldValue::Null,
        NumericCapture::Ambiguous(raw) => FieldValue::Text(raw.clone()),
        NumericCapture::Value(d) => FieldValue::from_decimal(Some(*d)),
    }
}

fn notes_for(parsed: &ParsedFields, record: &FlightPlanRecord) -> ExtractionNotes {
    let mut notes = ExtractionNotes::default();

    let strings: [(&str, bool); 4] = [
        ("flight_number", record.flight_number.is_none()),
        ("route", record.route.is_none()),
        ("departure", record.departure.is_none()),
        ("destination", record.destination.is_none()),
    ];
    for (path, absent) in strings {
        if absent {
            notes.missing.push(path.to_string());
        }
    }

    let numerics: [(&str, &NumericCapture); 9] = [
        ("weights.takeoff_weight", &parsed.takeoff_weight),
        ("weights.landing_weight", &parsed.landing_weight),
        ("weights.zerofuel_weight", &parsed.zerofuel_weight),
        ("fuel.trip_fuel", &parsed.trip_fuel),
        ("fuel.contingency", &parsed.contingency),
        ("fuel.minimum_takeoff_fuel", &parsed.minimum_takeoff_fuel),
        (
            "fuel.corrected_minimum_takeoff_fuel",
            &parsed.corrected_minimum_takeoff_fuel,
        ),
        ("fuel.block_fuel", &parsed.block_fuel),
        ("fuel.taxi", &parsed.taxi),
    ];
    for (path, cap) in numerics {
        match cap {
            NumericCapture::Missing => notes.missing.push(path.to_string()),
            NumericCapture::Ambiguous(_) => notes.ambiguous.push(path.to_string()),
            NumericCapture::Value(_) => {}
        }
    }

    notes.missing.sort();
    notes.missing.dedup();
    notes.ambiguous.sort();
    notes.ambiguous.dedup();
    notes
}
