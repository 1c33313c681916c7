use crate::error::OfpError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Safety limits for the threshold analyzer. Every field has a default so a
/// config file may override any subset and leave the rest alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub crosswind_limit_kt: f64,
    pub wind_speed_threshold_kt: f64,
    pub icing_temp_c: f64,
    pub min_rvr_m: i32,
    pub min_cloud_base_ft: i32,
    pub max_flight_level: i32,
    pub data_quality: DataQualityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataQualityConfig {
    pub required_fields: Vec<String>,
    pub ambiguous_time_tolerance_minutes: i64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        ThresholdConfig {
            crosswind_limit_kt: 20.0,
            wind_speed_threshold_kt: 30.0,
            icing_temp_c: 0.0,
            min_rvr_m: 550,
            min_cloud_base_ft: 200,
            max_flight_level: 450,
            data_quality: DataQualityConfig::default(),
        }
    }
}

impl Default for DataQualityConfig {
    fn default() -> Self {
        DataQualityConfig {
            required_fields: vec![
                "callsign".to_string(),
                "time_departure".to_string(),
                "time_arrival".to_string(),
            ],
            ambiguous_time_tolerance_minutes: 5,
        }
    }
}

/// Load limits from a JSON file, overlaying the defaults. No path, a
/// missing file or unparsable content all yield the documented defaults;
/// analysis never fails for want of a config file.
pub fn load_thresholds(path: Option<&Path>) -> ThresholdConfig {
    match path {
        Some(path) => read_thresholds(path).unwrap_or_default(),
        None => ThresholdConfig::default(),
    }
}

/// Strict variant for config tooling that wants to know why a file was
/// rejected instead of silently running on defaults.
pub fn read_thresholds(path: &Path) -> Result<ThresholdConfig, OfpError> {
    let data = fs::read_to_string(path).map_err(|e| OfpError::ThresholdLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&data).map_err(|e| OfpError::ThresholdLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
