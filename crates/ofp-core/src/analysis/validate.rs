use super::thresholds::ThresholdConfig;
use crate::model::{AnalysisRecord, FieldValue, WeatherObservation};
use serde::{Deserialize, Serialize};

/// Outcome of a data-quality pass: field paths with no evidence at all, and
/// field paths whose evidence did not parse cleanly. Both sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub missing: Vec<String>,
    pub ambiguous: Vec<String>,
}

impl DataQualityReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.ambiguous.is_empty()
    }
}

/// Numeric fields the validator always classifies, independent of the
/// configured required list.
const NUMERIC_FIELDS: &[(&str, fn(&AnalysisRecord) -> &FieldValue)] = &[
    ("takeoff_weight", |r| &r.takeoff_weight),
    ("landing_weight", |r| &r.landing_weight),
    ("zerofuel_weight", |r| &r.zerofuel_weight),
    ("ground_distance", |r| &r.ground_distance),
    ("trip_fuel", |r| &r.trip_fuel),
    ("contingency", |r| &r.contingency),
    ("minimum_takeoff_fuel", |r| &r.minimum_takeoff_fuel),
    (
        "corrected_minimum_takeoff_fuel",
        |r| &r.corrected_minimum_takeoff_fuel,
    ),
];

/// Classify every field of the record as present, missing or ambiguous.
///
/// Required fields come from the config and are checked by name; a name the
/// validator does not know counts as missing rather than silently passing.
/// Numeric fields are re-parsed here: text that fails to parse as a number
/// is ambiguous, not missing, because evidence exists.
pub fn validate(record: &AnalysisRecord, config: &ThresholdConfig) -> DataQualityReport {
    let mut report = DataQualityReport::default();

    for name in &config.data_quality.required_fields {
        let present = match name.as_str() {
            "callsign" => record.callsign.is_some(),
            "time_departure" => record.time_departure.is_some(),
            "time_arrival" => record.time_arrival.is_some(),
            "route" => record.route.is_some(),
            "runway_heading" => record.runway_heading.is_some(),
            other => NUMERIC_FIELDS
                .iter()
                .find(|(n, _)| *n == other)
                .is_some_and(|(_, get)| !get(record).is_null()),
        };
        if !present {
            report.missing.push(name.clone());
        }
    }

    for (name, get) in NUMERIC_FIELDS {
        match get(record) {
            FieldValue::Null => report.missing.push((*name).to_string()),
            FieldValue::Number(_) => {}
            FieldValue::Text(_) if get(record).as_f64().is_some() => {}
            FieldValue::Text(_) => report.ambiguous.push((*name).to_string()),
        }
    }

    check_observation(&mut report, "weather.takeoff", record.weather.takeoff.as_ref());
    check_observation(
        &mut report,
        "weather.destination",
        record.weather.destination.as_ref(),
    );

    report.missing.sort();
    report.missing.dedup();
    report.ambiguous.sort();
    report.ambiguous.dedup();
    report
}

/// The analyzer needs wind and temperature for both terminal segments;
/// report them with dotted paths so a consumer can tell which segment and
/// which component is short.
fn check_observation(
    report: &mut DataQualityReport,
    prefix: &str,
    obs: Option<&WeatherObservation>,
) {
    let Some(obs) = obs else {
        report.missing.push(prefix.to_string());
        return;
    };
    let components: [(&str, bool); 3] = [
        ("wind_dir_deg", obs.wind_dir_deg.is_none()),
        ("wind_speed_kt", obs.wind_speed_kt.is_none()),
        ("temperature_c", obs.temperature_c.is_none()),
    ];
    for (component, absent) in components {
        if absent {
            report.missing.push(format!("{prefix}.{component}"));
        }
    }
}
