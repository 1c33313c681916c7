pub mod thresholds;
pub mod validate;

pub use thresholds::{load_thresholds, read_thresholds, DataQualityConfig, ThresholdConfig};
pub use validate::{validate, DataQualityReport};

use crate::model::{AnalysisRecord, WeatherObservation};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One tripped safety rule, with the evidence that tripped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyFlag {
    pub code: String,
    pub severity: String,
    pub reason: String,
    pub details: BTreeMap<String, Value>,
}

/// Snapshot of the inputs an analysis actually used, kept on the result for
/// audit display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSnapshot {
    pub callsign: Option<String>,
    pub time_departure: Option<String>,
    pub time_arrival: Option<String>,
    pub route: Option<String>,
    pub provided_weather: Option<WeatherObservation>,
    pub observations_count: usize,
}

/// Full output of one analysis run. `timestamp_utc` is for audit display
/// only; equality checks on results should exclude it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub flags: Vec<SafetyFlag>,
    pub data_quality: DataQualityReport,
    pub evidence: EvidenceSnapshot,
    pub timestamp_utc: String,
}

/// Perpendicular wind component for a runway: the signed angular difference
/// between wind direction and runway heading is folded into [-180, 180],
/// then |sin| of it scales the wind speed.
pub fn compute_crosswind(wind_dir_deg: f64, wind_speed_kt: f64, runway_heading_deg: f64) -> f64 {
    let angle = ((wind_dir_deg - runway_heading_deg + 180.0).rem_euclid(360.0) - 180.0).abs();
    angle.to_radians().sin().abs() * wind_speed_kt
}

/// Evaluate the deterministic safety rules against a record.
///
/// The crosswind rule runs only when takeoff wind, a runway heading and a
/// clean data-quality report are all present at once; otherwise the reason
/// for skipping is folded into the missing set so callers can tell
/// "rule passed" from "rule undetermined for lack of data".
pub fn analyze(
    record: &AnalysisRecord,
    observations: &[Value],
    config: &ThresholdConfig,
) -> AnalysisResult {
    let mut data_quality = validate(record, config);
    let mut flags = Vec::new();

    let takeoff_wind = record
        .weather
        .takeoff
        .as_ref()
        .and_then(|obs| obs.wind_dir_deg.zip(obs.wind_speed_kt));

    match (takeoff_wind, record.runway_heading) {
        (Some((dir, speed)), Some(heading)) if data_quality.missing.is_empty() => {
            let crosswind = compute_crosswind(f64::from(dir), f64::from(speed), heading);
            if crosswind >= config.crosswind_limit_kt {
                flags.push(crosswind_flag(crosswind, dir, speed, heading, config));
            }
        }
        _ => {
            if takeoff_wind.is_none() {
                data_quality.missing.push("weather.takeoff".to_string());
            }
            if record.runway_heading.is_none() {
                data_quality.missing.push("runway_heading".to_string());
            }
            data_quality.missing.sort();
            data_quality.missing.dedup();
        }
    }

    AnalysisResult {
        flags,
        data_quality,
        evidence: EvidenceSnapshot {
            callsign: record.callsign.clone(),
            time_departure: record.time_departure.clone(),
            time_arrival: record.time_arrival.clone(),
            route: record.route.clone(),
            provided_weather: record.weather.takeoff.clone(),
            observations_count: observations.len(),
        },
        timestamp_utc: Utc::now().to_rfc3339(),
    }
}

fn crosswind_flag(
    crosswind: f64,
    wind_dir_deg: i32,
    wind_speed_kt: i32,
    runway_heading_deg: f64,
    config: &ThresholdConfig,
) -> SafetyFlag {
    let rounded = (crosswind * 10.0).round() / 10.0;
    let mut details = BTreeMap::new();
    details.insert("crosswind_kt".to_string(), Value::from(rounded));
    details.insert(
        "threshold_kt".to_string(),
        Value::from(config.crosswind_limit_kt),
    );
    details.insert("wind_dir_deg".to_string(), Value::from(wind_dir_deg));
    details.insert("wind_speed_kt".to_string(), Value::from(wind_speed_kt));
    details.insert(
        "runway_heading_deg".to_string(),
        Value::from(runway_heading_deg),
    );
    SafetyFlag {
        code: "CROSSWIND".to_string(),
        severity: "HIGH".to_string(),
        reason: format!(
            "Crosswind {rounded:.1} kt >= limit {} kt",
            config.crosswind_limit_kt
        ),
        details,
    }
}
