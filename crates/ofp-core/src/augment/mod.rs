pub mod http;

use crate::model::{Alternates, NotamSet};
use crate::parsing::values::parse_number;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Failures of the secondary extraction channel. The merge engine treats
/// every variant the same way (keep the primary record, surface the error
/// as a diagnostic) but callers may want to log them differently.
#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("remote transport failed: {0}")]
    Transport(String),
    #[error("remote returned status {0}")]
    Status(u16),
    #[error("remote payload malformed: {0}")]
    Malformed(String),
    #[error("remote service reported: {0}")]
    Service(String),
}

/// A secondary extraction channel. Implementations take the full document
/// text and return their own best-effort record; the merge engine decides
/// what of it survives.
pub trait RemoteExtractor {
    fn extract_remote(&self, text: &str) -> Result<SecondaryRecord, AugmentError>;

    fn provider_name(&self) -> &str {
        "remote"
    }
}

/// What a secondary channel may report, deliberately looser than
/// [`crate::model::FlightPlanRecord`]: field aliases are accepted, numbers
/// may arrive as JSON numbers or strings, and weather keys are untyped
/// until the merge engine re-keys them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecondaryRecord {
    #[serde(default, alias = "callsign")]
    pub flight_number: Option<String>,
    #[serde(default, alias = "route_text")]
    pub route: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default, alias = "destination_alternates")]
    pub destination_alternate: Option<Alternates>,
    #[serde(default)]
    pub weights: SecondaryWeights,
    #[serde(default)]
    pub fuel: SecondaryFuel,
    #[serde(default)]
    pub weather: BTreeMap<String, Value>,
    #[serde(default)]
    pub notams: NotamSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecondaryWeights {
    #[serde(default, alias = "tow", deserialize_with = "flexible_decimal")]
    pub takeoff_weight: Option<Decimal>,
    #[serde(default, alias = "law", deserialize_with = "flexible_decimal")]
    pub landing_weight: Option<Decimal>,
    #[serde(default, alias = "zfw", deserialize_with = "flexible_decimal")]
    pub zerofuel_weight: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecondaryFuel {
    #[serde(default, deserialize_with = "flexible_decimal")]
    pub trip_fuel: Option<Decimal>,
    #[serde(default, deserialize_with = "flexible_decimal")]
    pub contingency: Option<Decimal>,
    #[serde(default, deserialize_with = "flexible_decimal")]
    pub minimum_takeoff_fuel: Option<Decimal>,
    #[serde(default, deserialize_with = "flexible_decimal")]
    pub corrected_minimum_takeoff_fuel: Option<Decimal>,
    #[serde(default, deserialize_with = "flexible_decimal")]
    pub block_fuel: Option<Decimal>,
    #[serde(default, deserialize_with = "flexible_decimal")]
    pub taxi: Option<Decimal>,
}

/// Accept a decimal from a JSON number, a numeric string (thousands
/// separators tolerated), or null. Anything else degrades to `None` rather
/// than failing the whole payload.
fn flexible_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().ok(),
        Some(Value::String(s)) => parse_number(&s).value(),
        _ => None,
    })
}
