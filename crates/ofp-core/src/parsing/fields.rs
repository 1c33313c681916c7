use crate::model::Alternates;
use crate::parsing::values::{normalize_zulu, parse_number, NumericCapture};
use regex::Regex;
use std::sync::LazyLock;

/// Raw field-extractor outputs, before schema composition. Numeric fields
/// keep the missing/ambiguous classification from capture time.
#[derive(Debug, Clone, Default)]
pub struct ParsedFields {
    pub callsign: Option<String>,
    pub time_departure: Option<String>,
    pub time_arrival: Option<String>,
    pub ground_distance: NumericCapture,
    pub air_distance: NumericCapture,
    pub takeoff_weight: NumericCapture,
    pub landing_weight: NumericCapture,
    pub zerofuel_weight: NumericCapture,
    pub trip_fuel: NumericCapture,
    pub trip_time: Option<String>,
    pub contingency: NumericCapture,
    pub contingency_time: Option<String>,
    pub minimum_takeoff_fuel: NumericCapture,
    pub corrected_minimum_takeoff_fuel: NumericCapture,
    pub block_fuel: NumericCapture,
    pub taxi: NumericCapture,
    pub route: Option<String>,
    pub departure: Option<String>,
    pub destination: Option<String>,
    pub destination_alternate: Option<Alternates>,
    pub alternate_distance: NumericCapture,
    pub alternate_time: Option<String>,
    pub is_etops: bool,
    pub etops_alternates: Option<Vec<String>>,
    /// AVG WIND summary from the header: (direction deg, speed kt).
    pub avg_wind: Option<(i32, i32)>,
}

macro_rules! re {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

re!(HEADER_SEP_RE, r"(?m)^-{20,}\s*$");

re!(CALLSIGN_LABEL_RE, r"(?i)Callsign[:\s]*([A-Z0-9\-]+)");
re!(CALLSIGN_CFP_RE, r"(?i)CFP ID[\s\S]{0,120}?\b([A-Z0-9]+)/(?:\d{2}[A-Z]{3})");
re!(CALLSIGN_BARE_RE, r"\b([A-Z]{2}\d{1,4})/\d{2}[A-Z]{3}");

re!(STD_RE, r"STD\s*([0-9]{3,4})Z");
re!(STA_RE, r"STA\s*([0-9]{3,4})Z");

re!(GND_DIST_RE, r"GND\s*DIST\s*([0-9]+)");
re!(AIR_DIST_RE, r"AIR\s*DIST\s*([0-9]+)");
re!(AVG_WIND_RE, r"AVG\s*WIND\s*([0-9]{1,3})/([0-9]{1,3})");

re!(MTOW_RE, r"MTOW\s*([0-9]+\.?[0-9]*)");
re!(MLAW_RE, r"MLAW\s*([0-9]+\.?[0-9]*)");
re!(MZFW_RE, r"MZFW\s*([0-9]+\.?[0-9]*)");

re!(TRIP_RE, r"\bTRIP\s+([0-9]+)\s+([0-9]{1,2}\.[0-9]{2})");
re!(CONTMIN_RE, r"\bCONTMIN\s+([0-9]+)\s+([0-9]{1,2}\.[0-9]{2})");
re!(ALTN_RE, r"\bALTN\s+([0-9]+)\s+([0-9]{1,2}\.[0-9]{2})\s+([A-Z]{4})");
re!(MINTOF_RE, r"\bMINTOF\s+([0-9]+)");
re!(CORR_MINTOF_RE, r"(?i)CORR(?:ECTED)?\s+MINTOF\s+([0-9]+)");
re!(TAXI_RE, r"\bTAXI\s+([0-9]+)\s+[0-9]{2}\.[0-9]{2}");
re!(BLOCK_FUEL_RE, r"\bBLOCK\s*FUEL\s+([0-9]+)");

re!(AIRPORT_PAIR_RE, r"\b([A-Z]{4})/[^\n]*?\s+([A-Z]{4})\b");
re!(ATC_FIELD_RE, r"(?m)^\s*-([A-Z]{4})(?:\d{4})?\b");

re!(ROUTE_BLOCK_RE, r"\n-{4,}\n([\s\S]{1,400}?)\n-{4,}\n");
re!(ROUTE_TOKEN_RE, r"\b[A-Z]{3,}\b");
re!(
    ROUTE_RUN_RE,
    r"\n([A-Z0-9\s,\-/]{30,}\n(?:[A-Z0-9\s,\-/]{30,}\n){0,4})"
);
re!(ROUTE_LABEL_RE, r"(?i)ROUTE[:\s]*([A-Z0-9\s\-/]{10,200})");

re!(
    DEST_ALTN_LIST_RE,
    r"(?i)Destination Alternate[s]?:[\s]*([A-Z]{4}(?:[,\s]+[A-Z]{4})*)"
);
re!(ETOPS_YES_RE, r"(?i)ETOPS[:\s]*Yes");
re!(
    ETOPS_ALTN_RE,
    r"(?i)ETOPS Alternates?:[\s]*([A-Z]{4}(?:[,\s]+[A-Z]{4})*)"
);
re!(ICAO_RE, r"([A-Z]{4})");

/// The header region is everything before the first long dashed separator;
/// most summary fields live there.
pub fn header_region(text: &str) -> &str {
    match HEADER_SEP_RE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

/// Run every field extractor over the normalized text. Order matters only in
/// that later consumers (weather/NOTAM segmenters) need the departure and
/// destination codes resolved here first.
pub fn extract_fields(text: &str) -> ParsedFields {
    let header = header_region(text);
    let mut f = ParsedFields {
        callsign: extract_callsign(text, header),
        ..ParsedFields::default()
    };

    f.time_departure = STD_RE
        .captures(header)
        .and_then(|c| normalize_zulu(&c[1]));
    f.time_arrival = STA_RE
        .captures(header)
        .and_then(|c| normalize_zulu(&c[1]));

    f.ground_distance = capture_first(&GND_DIST_RE, header)
        .or_else(|| labeled_numeric(text, &["Ground distance", "Distance", "GroundDistance", "GND DIST"]));
    f.air_distance = capture_first(&AIR_DIST_RE, header);

    if let Some(c) = AVG_WIND_RE.captures(header) {
        if let (Ok(dir), Ok(speed)) = (c[1].parse::<i32>(), c[2].parse::<i32>()) {
            f.avg_wind = Some((dir, speed));
        }
    }

    f.takeoff_weight = capture_first(&MTOW_RE, header)
        .or_else(|| labeled_numeric(text, &["Takeoff weight", "TakeoffWeight", "TOW", "MTOW"]));
    f.landing_weight = capture_first(&MLAW_RE, header)
        .or_else(|| labeled_numeric(text, &["Landing weight", "LandingWeight", "LAW", "MLAW"]));
    f.zerofuel_weight = capture_first(&MZFW_RE, header)
        .or_else(|| labeled_numeric(text, &["Zero fuel weight", "ZeroFuelWeight", "ZFW", "MZFW"]));

    // Fuel figures: searched in the whole document, not only the header
    if let Some(c) = TRIP_RE.captures(text) {
        f.trip_fuel = parse_number(&c[1]);
        f.trip_time = Some(c[2].to_string());
    }
    if let Some(c) = CONTMIN_RE.captures(text) {
        f.contingency = parse_number(&c[1]);
        f.contingency_time = Some(c[2].to_string());
    }
    if let Some(c) = ALTN_RE.captures(text) {
        f.alternate_distance = parse_number(&c[1]);
        f.alternate_time = Some(c[2].to_string());
        f.destination_alternate = Some(Alternates::One(c[3].to_string()));
    }
    f.minimum_takeoff_fuel = capture_first(&MINTOF_RE, text);
    f.corrected_minimum_takeoff_fuel = capture_first(&CORR_MINTOF_RE, text);
    f.taxi = capture_first(&TAXI_RE, text);
    f.block_fuel = capture_first(&BLOCK_FUEL_RE, text);

    extract_airports(&mut f, text, header);
    f.route = extract_route(text);

    // Explicit alternate list takes precedence only when the ALTN line gave nothing
    if f.destination_alternate.is_none() {
        if let Some(c) = DEST_ALTN_LIST_RE.captures(text) {
            let codes: Vec<String> = ICAO_RE
                .captures_iter(&c[1])
                .map(|m| m[1].to_string())
                .collect();
            f.destination_alternate = match codes.len() {
                0 => None,
                1 => Some(Alternates::One(codes.into_iter().next().unwrap())),
                _ => Some(Alternates::Many(codes)),
            };
        }
    }

    f.is_etops = ETOPS_YES_RE.is_match(text);
    if let Some(c) = ETOPS_ALTN_RE.captures(text) {
        f.etops_alternates = Some(
            ICAO_RE
                .captures_iter(&c[1])
                .map(|m| m[1].to_string())
                .collect(),
        );
    } else if f.is_etops {
        f.etops_alternates = Some(Vec::new());
    }

    f
}

/// Callsign chain: explicit label, then CFP ID header, then a bare
/// `AB1234/07FEB` token near the top of the document.
fn extract_callsign(text: &str, header: &str) -> Option<String> {
    if let Some(c) = CALLSIGN_LABEL_RE.captures(text) {
        return Some(c[1].to_string());
    }
    if let Some(c) = CALLSIGN_CFP_RE.captures(header) {
        return Some(c[1].to_string());
    }
    CALLSIGN_BARE_RE
        .captures(header)
        .map(|c| c[1].to_string())
}

/// Airport chain: explicit `CODE/... CODE` header pair, else the first two
/// airport codes of an ATC flight-plan field block (departure, destination).
fn extract_airports(f: &mut ParsedFields, text: &str, header: &str) {
    if let Some(c) = AIRPORT_PAIR_RE.captures(header) {
        f.departure = Some(c[1].to_string());
        f.destination = Some(c[2].to_string());
        return;
    }
    let mut codes = ATC_FIELD_RE.captures_iter(text).map(|c| c[1].to_string());
    f.departure = codes.next();
    f.destination = codes.next();
}

/// Route chain: the block between the first pair of dashed separators,
/// else a multi-line waypoint run, else an explicit ROUTE label.
fn extract_route(text: &str) -> Option<String> {
    if let Some(c) = ROUTE_BLOCK_RE.captures(text) {
        let block = c[1].trim().to_string();
        // first non-empty line that looks like a route: contains '/' or
        // at least two uppercase waypoint tokens
        for line in block.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.contains('/') || ROUTE_TOKEN_RE.find_iter(line).count() >= 2 {
                return Some(squash(line));
            }
        }
        if let Some(line) = block.lines().map(str::trim).find(|l| !l.is_empty()) {
            return Some(squash(line));
        }
    }
    if let Some(c) = ROUTE_RUN_RE.captures(text) {
        return Some(squash(c[1].trim()));
    }
    ROUTE_LABEL_RE.captures(text).map(|c| squash(c[1].trim()))
}

fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capture_first(re: &Regex, text: &str) -> NumericCapture {
    match re.captures(text) {
        Some(c) => parse_number(&c[1]),
        None => NumericCapture::Missing,
    }
}

/// Generic labeled-number fallback: `Label: 123 kg` and friends, tried in
/// the given order, first match wins.
fn labeled_numeric(text: &str, labels: &[&str]) -> NumericCapture {
    for label in labels {
        let pattern = format!(
            r"(?i){}[:\s]*([0-9,\.]+)\s*(?:kg|kgs|nm|ft|m)?",
            regex::escape(label)
        );
        let re = Regex::new(&pattern).expect("static label pattern");
        if let Some(c) = re.captures(text) {
            return parse_number(&c[1]);
        }
    }
    NumericCapture::Missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
CFP ID 12B-0207/0015
ET3734/07FEB  EHBK/MST  LEZG/ZAZ
STD 0945Z  STA 1310Z
GND DIST 720   AIR DIST 695
AVG WIND   247/026
MTOW 77.1  MLAW 66.5  MZFW 62.7
--------------------------------------------------------------------
MAARSN1C MAARSN UL608 T180/F360
--------------------------------------------------------------------
TRIP          4200  01.55
CONTMIN        210  00.05
ALTN          3893  00.41  LEMD
MINTOF        8305
";

    fn sample() -> String {
        SAMPLE.to_string()
    }

    #[test]
    fn callsign_from_bare_header_token() {
        let f = extract_fields(&sample());
        assert_eq!(f.callsign.as_deref(), Some("ET3734"));
    }

    #[test]
    fn callsign_label_takes_precedence() {
        let text = format!("Callsign: ABC123\n{}", sample());
        let f = extract_fields(&text);
        assert_eq!(f.callsign.as_deref(), Some("ABC123"));
    }

    #[test]
    fn times_normalized_to_zulu() {
        let f = extract_fields(&sample());
        assert_eq!(f.time_departure.as_deref(), Some("09:45:00Z"));
        assert_eq!(f.time_arrival.as_deref(), Some("13:10:00Z"));
    }

    #[test]
    fn weights_from_header_summary() {
        let f = extract_fields(&sample());
        assert_eq!(f.takeoff_weight.value(), Some(dec!(77.1)));
        assert_eq!(f.landing_weight.value(), Some(dec!(66.5)));
        assert_eq!(f.zerofuel_weight.value(), Some(dec!(62.7)));
    }

    #[test]
    fn weight_label_fallback() {
        let f = extract_fields("Takeoff weight: 77,100 kg");
        assert_eq!(f.takeoff_weight.value(), Some(dec!(77100)));
    }

    #[test]
    fn fuel_figures_with_times() {
        let f = extract_fields(&sample());
        assert_eq!(f.trip_fuel.value(), Some(dec!(4200)));
        assert_eq!(f.trip_time.as_deref(), Some("01.55"));
        assert_eq!(f.contingency.value(), Some(dec!(210)));
        assert_eq!(f.minimum_takeoff_fuel.value(), Some(dec!(8305)));
    }

    #[test]
    fn altn_line_yields_alternate_and_distance() {
        let f = extract_fields(&sample());
        assert_eq!(
            f.destination_alternate,
            Some(Alternates::One("LEMD".into()))
        );
        assert_eq!(f.alternate_distance.value(), Some(dec!(3893)));
        assert_eq!(f.alternate_time.as_deref(), Some("00.41"));
    }

    #[test]
    fn airports_from_header_pair() {
        let f = extract_fields(&sample());
        assert_eq!(f.departure.as_deref(), Some("EHBK"));
        assert_eq!(f.destination.as_deref(), Some("LEZG"));
    }

    #[test]
    fn airports_fallback_from_atc_block() {
        let text = "(FPL-ET3734-IS\n-B738/M-SDE3FGHIRWY/LB1\n-EHBK0945\n-N0447F360 MAARSN1C\n -LEZG0211 LEMD\n)";
        let f = extract_fields(text);
        assert_eq!(f.departure.as_deref(), Some("EHBK"));
        assert_eq!(f.destination.as_deref(), Some("LEZG"));
    }

    #[test]
    fn route_from_dashed_block() {
        let f = extract_fields(&sample());
        assert_eq!(
            f.route.as_deref(),
            Some("MAARSN1C MAARSN UL608 T180/F360")
        );
    }

    #[test]
    fn route_label_fallback() {
        let f = extract_fields("ROUTE: ABC DEF GHI JKL MNO");
        assert_eq!(f.route.as_deref(), Some("ABC DEF GHI JKL MNO"));
    }

    #[test]
    fn destination_alternate_list() {
        let f = extract_fields("Destination Alternates: LEMD, LEBL");
        assert_eq!(
            f.destination_alternate,
            Some(Alternates::Many(vec!["LEMD".into(), "LEBL".into()]))
        );
    }

    #[test]
    fn etops_flag_and_alternates() {
        let f = extract_fields("ETOPS: Yes\nETOPS Alternates: BIKF CYQX");
        assert!(f.is_etops);
        assert_eq!(
            f.etops_alternates,
            Some(vec!["BIKF".to_string(), "CYQX".to_string()])
        );
    }

    #[test]
    fn etops_without_list_yields_empty_list() {
        let f = extract_fields("ETOPS: Yes");
        assert!(f.is_etops);
        assert_eq!(f.etops_alternates, Some(Vec::new()));
    }

    #[test]
    fn avg_wind_from_header() {
        let f = extract_fields(&sample());
        assert_eq!(f.avg_wind, Some((247, 26)));
    }

    #[test]
    fn empty_input_yields_all_missing() {
        let f = extract_fields("");
        assert!(f.callsign.is_none());
        assert!(f.takeoff_weight.is_missing());
        assert!(f.trip_fuel.is_missing());
        assert!(f.route.is_none());
    }
}
