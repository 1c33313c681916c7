use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pseudo airport key used when a weather segment cannot be attributed to a
/// resolved airport code.
pub const GENERIC_AIRPORT_KEY: &str = "GENERIC";

/// A destination alternate: a single airport code or an ordered list of codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alternates {
    One(String),
    Many(Vec<String>),
}

impl Alternates {
    pub fn codes(&self) -> Vec<&str> {
        match self {
            Alternates::One(c) => vec![c.as_str()],
            Alternates::Many(cs) => cs.iter().map(|c| c.as_str()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Alternates::One(c) => c.is_empty(),
            Alternates::Many(cs) => cs.is_empty(),
        }
    }
}

/// Aircraft weight figures in kg. Every key is always serialized; `null`
/// means the figure could not be extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default)]
    pub takeoff_weight: Option<Decimal>,
    #[serde(default)]
    pub landing_weight: Option<Decimal>,
    #[serde(default)]
    pub zerofuel_weight: Option<Decimal>,
}

/// Fuel figures in kg. Same key-presence guarantee as [`Weights`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fuel {
    #[serde(default)]
    pub trip_fuel: Option<Decimal>,
    #[serde(default)]
    pub contingency: Option<Decimal>,
    #[serde(default)]
    pub minimum_takeoff_fuel: Option<Decimal>,
    #[serde(default)]
    pub corrected_minimum_takeoff_fuel: Option<Decimal>,
    #[serde(default)]
    pub block_fuel: Option<Decimal>,
    #[serde(default)]
    pub taxi: Option<Decimal>,
}

/// A single weather observation attached to one airport segment.
///
/// `report` holds the METAR-style SA line and `forecast` the TAF-style FT
/// block when an airport weather block was found; the numeric fields are
/// filled from whichever line yielded them, each independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherObservation {
    #[serde(default, alias = "wind_direction")]
    pub wind_dir_deg: Option<i32>,
    #[serde(default, alias = "wind_speed")]
    pub wind_speed_kt: Option<i32>,
    #[serde(default, alias = "temperature")]
    pub temperature_c: Option<i32>,
    #[serde(default)]
    pub cloud_base_ft: Option<i32>,
    #[serde(default)]
    pub rvr_m: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl WeatherObservation {
    pub fn is_empty(&self) -> bool {
        self == &WeatherObservation::default()
    }
}

/// Per-airport weather: one optional observation per segment role. Segment
/// keys appear in JSON only when evidence exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportWeather {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub takeoff: Option<WeatherObservation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<WeatherObservation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enroute: Option<WeatherObservation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etops: Option<WeatherObservation>,
}

impl AirportWeather {
    pub fn is_empty(&self) -> bool {
        self.takeoff.is_none()
            && self.destination.is_none()
            && self.enroute.is_none()
            && self.etops.is_none()
    }
}

/// Consolidated NOTAMs, bucketed by section. Airport-keyed buckets map an
/// airport code to its ordered entries; `company` and `area` are flat lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotamSet {
    #[serde(default)]
    pub departure: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub destination: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub enroute_alternates: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub etops_alternates: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub company: Vec<String>,
    #[serde(default)]
    pub area: Vec<String>,
}

impl NotamSet {
    pub fn is_empty(&self) -> bool {
        self.departure.is_empty()
            && self.destination.is_empty()
            && self.enroute_alternates.is_empty()
            && self.etops_alternates.is_empty()
            && self.company.is_empty()
            && self.area.is_empty()
    }

    /// All airport-keyed entry lists across the four airport buckets.
    pub fn airports(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.departure
            .iter()
            .chain(self.destination.iter())
            .chain(self.enroute_alternates.iter())
            .chain(self.etops_alternates.iter())
    }
}

/// The canonical extraction output. Every declared key is always present in
/// JSON; consumers may rely on key presence, never on value presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightPlanRecord {
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub departure: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub destination_alternate: Option<Alternates>,
    #[serde(default)]
    pub weights: Weights,
    #[serde(default)]
    pub fuel: Fuel,
    #[serde(default)]
    pub weather: BTreeMap<String, AirportWeather>,
    #[serde(default)]
    pub notams: NotamSet,
}

/// A scalar field as seen by the data-quality validator: absent, numeric, or
/// text that may or may not re-parse as a number. The validator re-parses
/// text values itself rather than trusting upstream classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Numeric view, re-parsing text values with a strict float parse.
    /// Formatted tokens such as `"77,100"` do not count as numeric here;
    /// separator stripping happens once, at extraction capture time.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Null => None,
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn from_decimal(d: Option<Decimal>) -> FieldValue {
        match d.and_then(|d| d.to_f64()) {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Null,
        }
    }
}

/// Weather keyed by segment role rather than airport, as consumed by the
/// threshold analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentWeather {
    #[serde(default)]
    pub takeoff: Option<WeatherObservation>,
    #[serde(default)]
    pub destination: Option<WeatherObservation>,
    #[serde(default)]
    pub enroute: Option<WeatherObservation>,
    #[serde(default)]
    pub etops: Option<WeatherObservation>,
}

/// Input to the data-quality validator and threshold analyzer.
///
/// Distinct from [`FlightPlanRecord`]: it carries the timing fields and the
/// optional runway heading the minimal record omits, and its numeric fields
/// are [`FieldValue`]s so the validator can classify non-numeric text as
/// ambiguous rather than missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default)]
    pub callsign: Option<String>,
    #[serde(default)]
    pub time_departure: Option<String>,
    #[serde(default)]
    pub time_arrival: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub runway_heading: Option<f64>,
    #[serde(default)]
    pub takeoff_weight: FieldValue,
    #[serde(default)]
    pub landing_weight: FieldValue,
    #[serde(default)]
    pub zerofuel_weight: FieldValue,
    #[serde(default)]
    pub ground_distance: FieldValue,
    #[serde(default)]
    pub trip_fuel: FieldValue,
    #[serde(default)]
    pub contingency: FieldValue,
    #[serde(default)]
    pub minimum_takeoff_fuel: FieldValue,
    #[serde(default)]
    pub corrected_minimum_takeoff_fuel: FieldValue,
    #[serde(default)]
    pub weather: SegmentWeather,
}

impl AnalysisRecord {
    /// Fill segment weather slots that are still empty from a record's
    /// airport-keyed weather map. The takeoff slot prefers the departure
    /// airport's entry and falls back to the GENERIC bucket, which counts
    /// as usable evidence; destination likewise.
    pub fn adopt_weather(&mut self, record: &FlightPlanRecord) {
        if self.weather.takeoff.is_none() {
            self.weather.takeoff =
                segment_from_map(&record.weather, record.departure.as_deref(), |aw| {
                    aw.takeoff.clone()
                });
        }
        if self.weather.destination.is_none() {
            self.weather.destination =
                segment_from_map(&record.weather, record.destination.as_deref(), |aw| {
                    aw.destination.clone()
                });
        }
    }

    /// Derive an analysis view from a minimal record. Timing fields are not
    /// part of the minimal record and stay unset.
    pub fn from_record(record: &FlightPlanRecord, runway_heading: Option<f64>) -> AnalysisRecord {
        let mut analysis = AnalysisRecord {
            callsign: record.flight_number.clone(),
            route: record.route.clone(),
            runway_heading,
            takeoff_weight: FieldValue::from_decimal(record.weights.takeoff_weight),
            landing_weight: FieldValue::from_decimal(record.weights.landing_weight),
            zerofuel_weight: FieldValue::from_decimal(record.weights.zerofuel_weight),
            trip_fuel: FieldValue::from_decimal(record.fuel.trip_fuel),
            contingency: FieldValue::from_decimal(record.fuel.contingency),
            minimum_takeoff_fuel: FieldValue::from_decimal(record.fuel.minimum_takeoff_fuel),
            corrected_minimum_takeoff_fuel: FieldValue::from_decimal(
                record.fuel.corrected_minimum_takeoff_fuel,
            ),
            ..AnalysisRecord::default()
        };
        analysis.adopt_weather(record);
        analysis
    }
}

fn segment_from_map(
    weather: &BTreeMap<String, AirportWeather>,
    code: Option<&str>,
    pick: impl Fn(&AirportWeather) -> Option<WeatherObservation>,
) -> Option<WeatherObservation> {
    code.and_then(|c| weather.get(c))
        .and_then(&pick)
        .or_else(|| weather.get(GENERIC_AIRPORT_KEY).and_then(&pick))
}
