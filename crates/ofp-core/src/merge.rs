use crate::augment::{AugmentError, RemoteExtractor, SecondaryRecord};
use crate::model::{AirportWeather, FlightPlanRecord, WeatherObservation, GENERIC_AIRPORT_KEY};
use serde_json::Value;
use std::collections::BTreeMap;

/// A record that already carries identity, routing, trip fuel and takeoff
/// weight does not need a second extraction pass. The notams key is part of
/// the record shape and always present, so it adds no requirement; empty
/// buckets still count as complete.
pub fn is_minimally_complete(record: &FlightPlanRecord) -> bool {
    record.flight_number.is_some()
        && record.route.is_some()
        && record.fuel.trip_fuel.is_some()
        && record.weights.takeoff_weight.is_some()
}

/// Run the secondary channel when the primary record needs it, and fold the
/// result in conservatively. A failed remote call leaves the primary record
/// untouched and surfaces the error as a diagnostic.
pub fn augment_record(
    primary: FlightPlanRecord,
    text: &str,
    remote: &dyn RemoteExtractor,
    enabled: bool,
) -> (FlightPlanRecord, Option<AugmentError>) {
    if !enabled || is_minimally_complete(&primary) {
        return (primary, None);
    }
    match remote.extract_remote(text) {
        Ok(secondary) => (merge(primary, secondary), None),
        Err(e) => (primary, Some(e)),
    }
}

/// Conservative merge: a value the primary extraction found is never
/// overwritten. Weather is add-only per airport and segment; NOTAM buckets
/// are taken from the secondary only when the primary bucket is empty.
pub fn merge(mut primary: FlightPlanRecord, secondary: SecondaryRecord) -> FlightPlanRecord {
    primary.flight_number = primary.flight_number.or(secondary.flight_number);
    primary.route = primary.route.or(secondary.route);
    primary.departure = primary.departure.or(secondary.departure);
    primary.destination = primary.destination.or(secondary.destination);
    primary.destination_alternate = primary
        .destination_alternate
        .or(secondary.destination_alternate);

    let w = &mut primary.weights;
    w.takeoff_weight = w.takeoff_weight.or(secondary.weights.takeoff_weight);
    w.landing_weight = w.landing_weight.or(secondary.weights.landing_weight);
    w.zerofuel_weight = w.zerofuel_weight.or(secondary.weights.zerofuel_weight);

    let f = &mut primary.fuel;
    f.trip_fuel = f.trip_fuel.or(secondary.fuel.trip_fuel);
    f.contingency = f.contingency.or(secondary.fuel.contingency);
    f.minimum_takeoff_fuel = f.minimum_takeoff_fuel.or(secondary.fuel.minimum_takeoff_fuel);
    f.corrected_minimum_takeoff_fuel = f
        .corrected_minimum_takeoff_fuel
        .or(secondary.fuel.corrected_minimum_takeoff_fuel);
    f.block_fuel = f.block_fuel.or(secondary.fuel.block_fuel);
    f.taxi = f.taxi.or(secondary.fuel.taxi);

    let rekeyed = rekey_secondary_weather(
        &secondary.weather,
        primary.departure.as_deref(),
        primary.destination.as_deref(),
    );
    // add-only per airport: an airport already present in the primary is
    // never reached into, even if its segments are incomplete
    for (code, incoming) in rekeyed {
        primary.weather.entry(code).or_insert(incoming);
    }
    primary.weather.retain(|_, aw| !aw.is_empty());

    let n = &mut primary.notams;
    if n.departure.is_empty() {
        n.departure = secondary.notams.departure;
    }
    if n.destination.is_empty() {
        n.destination = secondary.notams.destination;
    }
    if n.enroute_alternates.is_empty() {
        n.enroute_alternates = secondary.notams.enroute_alternates;
    }
    if n.etops_alternates.is_empty() {
        n.etops_alternates = secondary.notams.etops_alternates;
    }
    if n.company.is_empty() {
        n.company = secondary.notams.company;
    }
    if n.area.is_empty() {
        n.area = secondary.notams.area;
    }

    primary
}

/// Secondary weather arrives keyed however the channel saw fit: airport
/// codes, segment names, or segment names over airport maps. Re-key all of
/// it onto airport codes, using the catch-all bucket when a segment cannot
/// be pinned to a resolved airport.
pub fn rekey_secondary_weather(
    weather: &BTreeMap<String, Value>,
    departure: Option<&str>,
    destination: Option<&str>,
) -> BTreeMap<String, AirportWeather> {
    let mut out: BTreeMap<String, AirportWeather> = BTreeMap::new();

    for (key, value) in weather {
        if is_icao(key) {
            if let Some(aw) = airport_weather_from(value) {
                fill_airport_weather(out.entry(key.clone()).or_default(), aw);
            }
            continue;
        }
        let (slot, fallback_code) = match key.to_lowercase().as_str() {
            "takeoff" | "departure" => (Slot::Takeoff, departure),
            "destination" | "arrival" => (Slot::Destination, destination),
            "etops" => (Slot::Etops, None),
            "enroute" | "en-route" => (Slot::Enroute, None),
            _ => continue,
        };

        // segment over an airport map: distribute per airport
        if let Some(map) = value.as_object() {
            if !map.is_empty() && map.keys().all(|k| is_icao(k)) {
                for (code, obs_value) in map {
                    if let Some(obs) = observation_from(obs_value) {
                        set_slot(out.entry(code.clone()).or_default(), slot, obs);
                    }
                }
                continue;
            }
        }
        if let Some(obs) = observation_from(value) {
            let code = fallback_code.unwrap_or(GENERIC_AIRPORT_KEY).to_string();
            set_slot(out.entry(code).or_default(), slot, obs);
        }
    }

    out.retain(|_, aw| !aw.is_empty());
    out
}

#[derive(Clone, Copy)]
enum Slot {
    Takeoff,
    Destination,
    Enroute,
    Etops,
}

fn set_slot(aw: &mut AirportWeather, slot: Slot, obs: WeatherObservation) {
    let target = match slot {
        Slot::Takeoff => &mut aw.takeoff,
        Slot::Destination => &mut aw.destination,
        Slot::Enroute => &mut aw.enroute,
        Slot::Etops => &mut aw.etops,
    };
    if target.is_none() {
        *target = Some(obs);
    }
}

fn fill_airport_weather(target: &mut AirportWeather, incoming: AirportWeather) {
    if let Some(obs) = incoming.takeoff {
        set_slot(target, Slot::Takeoff, obs);
    }
    if let Some(obs) = incoming.destination {
        set_slot(target, Slot::Destination, obs);
    }
    if let Some(obs) = incoming.enroute {
        set_slot(target, Slot::Enroute, obs);
    }
    if let Some(obs) = incoming.etops {
        set_slot(target, Slot::Etops, obs);
    }
}

/// An airport-keyed value is either segment-shaped already or a bare
/// observation, which lands in the enroute slot.
fn airport_weather_from(value: &Value) -> Option<AirportWeather> {
    if let Ok(aw) = serde_json::from_value::<AirportWeather>(value.clone()) {
        if !aw.is_empty() {
            return Some(aw);
        }
    }
    observation_from(value).map(|obs| AirportWeather {
        enroute: Some(obs),
        ..AirportWeather::default()
    })
}

fn observation_from(value: &Value) -> Option<WeatherObservation> {
    serde_json::from_value::<WeatherObservation>(value.clone())
        .ok()
        .filter(|obs| !obs.is_empty())
}

fn is_icao(key: &str) -> bool {
    key.len() == 4 && key.chars().all(|c| c.is_ascii_uppercase())
}
