use crate::model::{AirportWeather, WeatherObservation, GENERIC_AIRPORT_KEY};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

macro_rules! re {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

// Airport weather blocks: an `ICAO/...` header line followed by indented
// report lines, as laid out by the briefing package.
re!(
    AIRPORT_BLOCK_RE,
    r"(?m)^([A-Z]{4})/[^\n]*\n((?:[ \t]{2,}[^\n]*\n?)+)"
);
re!(METAR_RE, r"\bSA\s+([0-9]{6}[\s\S]*?)=");
re!(TAF_RE, r"\bF[TC]\s+([0-9]{6}[\s\S]*?)=");

re!(WIND_KT_RE, r"\b(\d{3})(\d{2,3})(?:G\d{2,3})?KT\b");
re!(WIND_SLASH_RE, r"\b(\d{1,3})/(\d{1,3})\b");
re!(TEMP_DEW_RE, r"\b(M?\d{2})/(?:M?\d{2})\b");
re!(CLOUD_BASE_RE, r"\b(?:BKN|OVC|VV)(\d{3})\b");
re!(RVR_RE, r"\bR\d{2}[LCR]?/[PM]?(\d{4})");

// Labeled prose segments used by some layouts instead of raw reports.
re!(
    SEGMENT_HEAD_RE,
    r"(?im)^\s*(takeoff|departure|destination|arrival|enroute|en-route|etops)\s+weather\b[^\n]*\n"
);
re!(FIELD_WIND_RE, r"(?i)\bwind[:\s]+(\d{1,3})\s*/\s*(\d{1,3})");
re!(FIELD_WIND_DIR_RE, r"(?i)\bwind\s+dir(?:ection)?[:\s]+(\d{1,3})");
re!(FIELD_WIND_SPEED_RE, r"(?i)\bwind\s+speed[:\s]+(\d{1,3})");
re!(FIELD_TEMP_RE, r"(?i)\btemp(?:erature)?[:\s]+(-?\d{1,3})");
re!(FIELD_CLOUD_RE, r"(?i)\bcloud\s*base[:\s]+(\d{2,5})");
re!(FIELD_RVR_RE, r"(?i)\bRVR[:\s]+(\d{2,5})");

/// Scan the normalized document for weather evidence and key it by airport.
/// Labeled prose segments are consulted only when no airport block yields an
/// observation, and land under the catch-all key. The header's AVG WIND
/// seeds the departure takeoff slot only when it is still empty.
pub fn extract_weather(
    text: &str,
    departure: Option<&str>,
    destination: Option<&str>,
    avg_wind: Option<(i32, i32)>,
) -> BTreeMap<String, AirportWeather> {
    let mut out: BTreeMap<String, AirportWeather> = BTreeMap::new();

    for caps in AIRPORT_BLOCK_RE.captures_iter(text) {
        let code = caps[1].to_string();
        let block = &caps[2];
        let mut obs = match observation_from_reports(block) {
            Some(obs) => obs,
            None => continue,
        };
        let entry = out.entry(code.clone()).or_default();
        let slot = if Some(code.as_str()) == departure {
            &mut entry.takeoff
        } else if Some(code.as_str()) == destination {
            &mut entry.destination
        } else {
            &mut entry.enroute
        };
        if let Some(existing) = slot.take() {
            obs = prefer_existing(existing, obs);
        }
        *slot = Some(obs);
    }

    if out.is_empty() {
        for (segment, body) in labeled_segments(text) {
            let Some(obs) = observation_from_fields(&body) else {
                continue;
            };
            let entry = out.entry(GENERIC_AIRPORT_KEY.to_string()).or_default();
            let slot = match segment.as_str() {
                "takeoff" | "departure" => &mut entry.takeoff,
                "destination" | "arrival" => &mut entry.destination,
                "etops" => &mut entry.etops,
                _ => &mut entry.enroute,
            };
            if slot.is_none() {
                *slot = Some(obs);
            }
        }
    }

    if let Some((dir, speed)) = avg_wind {
        let key = departure.unwrap_or(GENERIC_AIRPORT_KEY).to_string();
        let entry = out.entry(key).or_default();
        if entry.takeoff.is_none() {
            entry.takeoff = Some(WeatherObservation {
                wind_dir_deg: Some(dir),
                wind_speed_kt: Some(speed),
                ..WeatherObservation::default()
            });
        }
    }

    out.retain(|_, wx| !wx.is_empty());
    out
}

/// Build an observation from the METAR/TAF reports inside an airport block.
fn observation_from_reports(block: &str) -> Option<WeatherObservation> {
    let report = METAR_RE.captures(block).map(|c| squash(&c[1]));
    let forecast = TAF_RE.captures(block).map(|c| squash(&c[1]));
    let source = report.as_deref().or(forecast.as_deref())?;

    let mut obs = WeatherObservation {
        report: report.clone(),
        forecast: forecast.clone(),
        ..WeatherObservation::default()
    };
    if let Some(c) = WIND_KT_RE.captures(source) {
        obs.wind_dir_deg = c[1].parse().ok();
        obs.wind_speed_kt = c[2].parse().ok();
    } else if let Some(c) = WIND_SLASH_RE.captures(source) {
        obs.wind_dir_deg = c[1].parse().ok();
        obs.wind_speed_kt = c[2].parse().ok();
    }
    if let Some(c) = TEMP_DEW_RE.captures(source) {
        obs.temperature_c = parse_metar_temp(&c[1]);
    }
    if let Some(c) = CLOUD_BASE_RE.captures(source) {
        obs.cloud_base_ft = c[1].parse::<i32>().ok().map(|hundreds| hundreds * 100);
    }
    if let Some(c) = RVR_RE.captures(source) {
        obs.rvr_m = c[1].parse().ok();
    }
    Some(obs)
}

/// Build an observation from labeled fields: `Wind: 270/18` combined form,
/// or separate `Wind dir: 270` / `Wind speed: 18` lines.
fn observation_from_fields(body: &str) -> Option<WeatherObservation> {
    let mut obs = WeatherObservation::default();
    if let Some(c) = FIELD_WIND_RE.captures(body) {
        obs.wind_dir_deg = c[1].parse().ok();
        obs.wind_speed_kt = c[2].parse().ok();
    } else {
        if let Some(c) = FIELD_WIND_DIR_RE.captures(body) {
            obs.wind_dir_deg = c[1].parse().ok();
        }
        if let Some(c) = FIELD_WIND_SPEED_RE.captures(body) {
            obs.wind_speed_kt = c[1].parse().ok();
        }
    }
    if let Some(c) = FIELD_TEMP_RE.captures(body) {
        obs.temperature_c = c[1].parse().ok();
    }
    if let Some(c) = FIELD_CLOUD_RE.captures(body) {
        obs.cloud_base_ft = c[1].parse().ok();
    }
    if let Some(c) = FIELD_RVR_RE.captures(body) {
        obs.rvr_m = c[1].parse().ok();
    }
    let empty = obs.wind_dir_deg.is_none()
        && obs.wind_speed_kt.is_none()
        && obs.temperature_c.is_none()
        && obs.cloud_base_ft.is_none()
        && obs.rvr_m.is_none();
    if empty {
        None
    } else {
        Some(obs)
    }
}

/// Split the text into (segment name, body) pairs at labeled weather headings.
/// A body runs until the next heading.
fn labeled_segments(text: &str) -> Vec<(String, String)> {
    let heads: Vec<(usize, usize, String)> = SEGMENT_HEAD_RE
        .captures_iter(text)
        .map(|c| {
            let m = c.get(0).unwrap();
            (m.start(), m.end(), c[1].to_lowercase())
        })
        .collect();
    heads
        .iter()
        .enumerate()
        .map(|(i, (_, end, name))| {
            let stop = heads.get(i + 1).map(|h| h.0).unwrap_or(text.len());
            (name.clone(), text[*end..stop].to_string())
        })
        .collect()
}

/// METAR temperatures write minus as a leading `M`.
fn parse_metar_temp(token: &str) -> Option<i32> {
    if let Some(rest) = token.strip_prefix('M') {
        rest.parse::<i32>().ok().map(|t| -t)
    } else {
        token.parse().ok()
    }
}

/// A later report for the same slot only fills holes in the earlier one.
fn prefer_existing(
    mut keep: WeatherObservation,
    incoming: WeatherObservation,
) -> WeatherObservation {
    keep.wind_dir_deg = keep.wind_dir_deg.or(incoming.wind_dir_deg);
    keep.wind_speed_kt = keep.wind_speed_kt.or(incoming.wind_speed_kt);
    keep.temperature_c = keep.temperature_c.or(incoming.temperature_c);
    keep.cloud_base_ft = keep.cloud_base_ft.or(incoming.cloud_base_ft);
    keep.rvr_m = keep.rvr_m.or(incoming.rvr_m);
    keep.report = keep.report.or(incoming.report);
    keep.forecast = keep.forecast.or(incoming.forecast);
    keep
}

fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCKS: &str = "\
EHBK/MST MAASTRICHT
  SA 070925 24012KT 9999 BKN020 M02/M04 Q1013=
  FT 070900 0710/0810 25015KT 9999 SCT025=
LEZG/ZAZ ZARAGOZA
  SA 070930 30008KT 5000 R30R/0400 OVC002 12/08 Q1018=
LEMD/MAD MADRID
  SA 070930 27015G25KT 9999 FEW040 14/06 Q1019=
";

    #[test]
    fn airport_blocks_keyed_by_role() {
        let wx = extract_weather(BLOCKS, Some("EHBK"), Some("LEZG"), None);
        let dep = wx["EHBK"].takeoff.as_ref().unwrap();
        assert_eq!(dep.wind_dir_deg, Some(240));
        assert_eq!(dep.wind_speed_kt, Some(12));
        assert_eq!(dep.temperature_c, Some(-2));
        assert_eq!(dep.cloud_base_ft, Some(2000));
        assert!(dep.report.as_deref().unwrap().starts_with("070925"));
        assert!(dep.forecast.as_deref().unwrap().starts_with("070900"));

        let dest = wx["LEZG"].destination.as_ref().unwrap();
        assert_eq!(dest.rvr_m, Some(400));
        assert_eq!(dest.cloud_base_ft, Some(200));
        assert_eq!(dest.temperature_c, Some(12));

        let enroute = wx["LEMD"].enroute.as_ref().unwrap();
        assert_eq!(enroute.wind_speed_kt, Some(15));
    }

    #[test]
    fn labeled_segments_land_under_generic_key() {
        let text = "\
Takeoff weather:
Wind: 270/18
Temperature: -5
Destination weather:
Wind: 180/25
Cloud base: 150
RVR: 450
";
        let wx = extract_weather(text, None, None, None);
        let generic = &wx[GENERIC_AIRPORT_KEY];
        let takeoff = generic.takeoff.as_ref().unwrap();
        assert_eq!(takeoff.wind_dir_deg, Some(270));
        assert_eq!(takeoff.wind_speed_kt, Some(18));
        assert_eq!(takeoff.temperature_c, Some(-5));
        let dest = generic.destination.as_ref().unwrap();
        assert_eq!(dest.cloud_base_ft, Some(150));
        assert_eq!(dest.rvr_m, Some(450));
    }

    #[test]
    fn split_wind_labels_parse_in_generic_segments() {
        let text = "\
Takeoff weather:
Wind dir: 270
Wind speed: 18
";
        let wx = extract_weather(text, None, None, None);
        let takeoff = wx[GENERIC_AIRPORT_KEY].takeoff.as_ref().unwrap();
        assert_eq!(takeoff.wind_dir_deg, Some(270));
        assert_eq!(takeoff.wind_speed_kt, Some(18));
    }

    #[test]
    fn airport_blocks_suppress_the_labeled_segment_fallback() {
        let text = format!(
            "{BLOCKS}\
Takeoff weather:
Wind: 100/99
"
        );
        let wx = extract_weather(&text, Some("EHBK"), Some("LEZG"), None);
        assert!(!wx.contains_key(GENERIC_AIRPORT_KEY));
        assert_eq!(
            wx["EHBK"].takeoff.as_ref().unwrap().wind_dir_deg,
            Some(240)
        );
    }

    #[test]
    fn avg_wind_seeds_departure_takeoff_only_when_absent() {
        let wx = extract_weather("", Some("EHBK"), None, Some((247, 26)));
        let obs = wx["EHBK"].takeoff.as_ref().unwrap();
        assert_eq!(obs.wind_dir_deg, Some(247));
        assert_eq!(obs.wind_speed_kt, Some(26));
        assert!(obs.report.is_none());

        let wx = extract_weather(BLOCKS, Some("EHBK"), Some("LEZG"), Some((100, 99)));
        let obs = wx["EHBK"].takeoff.as_ref().unwrap();
        assert_eq!(obs.wind_dir_deg, Some(240));
    }

    #[test]
    fn avg_wind_without_departure_goes_generic() {
        let wx = extract_weather("", None, None, Some((90, 10)));
        assert!(wx[GENERIC_AIRPORT_KEY].takeoff.is_some());
    }

    #[test]
    fn no_evidence_yields_empty_map() {
        let wx = extract_weather("nothing to see here", Some("EHBK"), None, None);
        assert!(wx.is_empty());
    }
}
