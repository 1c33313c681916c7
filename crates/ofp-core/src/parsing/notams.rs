use crate::model::{NotamSet, GENERIC_AIRPORT_KEY};
use crate::parsing::normalize::clean_entry;
use regex::Regex;
use std::sync::LazyLock;

/// Which part of the briefing a NOTAM heading introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Departure,
    Destination,
    Alternate,
    EtopsAlternate,
    Enroute,
    Company,
    Area,
}

static HEADINGS: LazyLock<Vec<(Regex, Section)>> = LazyLock::new(|| {
    let table: &[(&str, Section)] = &[
        (r"(?i)^\s*DEPARTURE\s+AIRPORT\b", Section::Departure),
        (r"(?i)^\s*DEPARTURE\s+ALTERNATES?\b", Section::Alternate),
        (r"(?i)^\s*DESTINATION\s+AIRPORT\b", Section::Destination),
        (r"(?i)^\s*DESTINATION\s+ALTERNATES?\b", Section::Alternate),
        (r"(?i)^\s*ETOPS\s+ALTERNATES?\b", Section::EtopsAlternate),
        (r"(?i)^\s*ENROUTE\s+AIRPORTS?\b", Section::Enroute),
        (r"(?i)^\s*EN-ROUTE\s+AIRPORTS?\b", Section::Enroute),
        (
            r"(?i)^\s*EXTENDED\s+AREA\s+AROUND\s+DEPARTURE\b",
            Section::Departure,
        ),
        (
            r"(?i)^\s*EXTENDED\s+AREA\s+AROUND\s+DESTINATION\b",
            Section::Destination,
        ),
        (r"(?i)^\s*COMPANY\s+NOTAMS?\b", Section::Company),
        (r"(?i)^\s*AREA\s+NOTAMS?\b", Section::Area),
    ];
    table
        .iter()
        .map(|(p, s)| (Regex::new(p).unwrap(), *s))
        .collect()
});

static NOTAM_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*((?:\d{1,2})?[A-Z]{1,2}\d{1,5}/\d{2})\b").unwrap());
static ICAO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b([A-Z]{4})\b").unwrap());
static AREA_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[^\n]*(?:AIP[ -]?(?:REGULATION|SUP)|LIDO RMK)[^\n]*$").unwrap());

/// Segment the NOTAM portion of the document into per-airport entry lists.
/// Headings open a section; entries split on NOTAM identifiers at line
/// starts, falling back to blank-line separation. `CO`-prefixed entries are
/// collected into the company list wherever they appear, staying in their
/// section's bucket as well.
pub fn extract_notams(
    text: &str,
    departure: Option<&str>,
    destination: Option<&str>,
    etops_alternates: &[String],
) -> NotamSet {
    let mut set = NotamSet::default();
    for (section, body) in sections(text) {
        let airport = section_airport(section, &body, departure, destination);
        for entry in split_entries(&body) {
            let entry = clean_entry(&entry);
            if entry.len() < 8 {
                continue;
            }
            route_entry(&mut set, section, &airport, entry, etops_alternates);
        }
    }
    for m in AREA_LINE_RE.find_iter(text) {
        push_unique(&mut set.area, clean_entry(m.as_str()));
    }
    set
}

/// Walk the document line by line, opening a new section at each heading.
/// Text before the first heading is ignored.
fn sections(text: &str) -> Vec<(Section, String)> {
    let mut out: Vec<(Section, String)> = Vec::new();
    let mut current: Option<(Section, String)> = None;
    for line in text.lines() {
        if let Some(section) = HEADINGS
            .iter()
            .find(|(re, _)| re.is_match(line))
            .map(|(_, s)| *s)
        {
            if let Some(done) = current.take() {
                out.push(done);
            }
            current = Some((section, format!("{line}\n")));
            continue;
        }
        if let Some((_, body)) = current.as_mut() {
            body.push_str(line);
            body.push('\n');
        }
    }
    if let Some(done) = current.take() {
        out.push(done);
    }
    out
}

/// Attribute a section to an airport: code on the heading or in the block,
/// else the role's own code, else the catch-all key.
fn section_airport(
    section: Section,
    body: &str,
    departure: Option<&str>,
    destination: Option<&str>,
) -> String {
    if let Some(c) = ICAO_RE.captures(body) {
        return c[1].to_string();
    }
    let role = match section {
        Section::Departure => departure,
        Section::Destination => destination,
        _ => None,
    };
    role.unwrap_or(GENERIC_AIRPORT_KEY).to_string()
}

/// Split a section body into entries at NOTAM identifiers. Preamble before
/// the first identifier (the heading itself, airport names) is dropped.
fn split_entries(body: &str) -> Vec<String> {
    let starts: Vec<usize> = NOTAM_ID_RE.find_iter(body).map(|m| m.start()).collect();
    if starts.is_empty() {
        // no identifiers: blank-line separated prose entries, heading line dropped
        let after_heading = body.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
        return after_heading
            .split("\n\n")
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect();
    }
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let stop = starts.get(i + 1).copied().unwrap_or(body.len());
            body[start..stop].trim().to_string()
        })
        .collect()
}

fn route_entry(
    set: &mut NotamSet,
    section: Section,
    airport: &str,
    entry: String,
    etops_alternates: &[String],
) {
    // CO-prefixed entries are company material wherever they appear, in
    // addition to their section's own bucket
    if is_company_entry(&entry) {
        push_unique(&mut set.company, entry.clone());
    }
    match section {
        Section::Company => push_unique(&mut set.company, entry),
        Section::Area => push_unique(&mut set.area, entry),
        Section::Departure => set
            .departure
            .entry(airport.to_string())
            .or_default()
            .push(entry),
        Section::Destination => set
            .destination
            .entry(airport.to_string())
            .or_default()
            .push(entry),
        Section::EtopsAlternate => set
            .etops_alternates
            .entry(airport.to_string())
            .or_default()
            .push(entry),
        Section::Alternate | Section::Enroute => {
            let bucket = if etops_alternates.iter().any(|a| a == airport) {
                &mut set.etops_alternates
            } else {
                &mut set.enroute_alternates
            };
            bucket.entry(airport.to_string()).or_default().push(entry);
        }
    }
}

fn is_company_entry(entry: &str) -> bool {
    static CO_ID_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^CO\d{1,5}/\d{2}\b").unwrap());
    CO_ID_RE.is_match(entry)
}

fn push_unique(bucket: &mut Vec<String>, entry: String) {
    if !bucket.contains(&entry) {
        bucket.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
DEPARTURE AIRPORT: EHBK
1A409/26
RWY 03/21 CLSD DUE TO
MAINTENANCE
CO31/20
CREW MUST CARRY PAPER CHARTS
DESTINATION AIRPORT: LEZG
B0210/26
ILS RWY 30R U/S
DESTINATION ALTERNATE
LEMD C0042/26 TWY B5 CLSD
COMPANY NOTAM
FUEL UPLIFT RESTRICTIONS APPLY AT OUTSTATIONS

AREA NOTAM
AIP-REGULATION CHANGE FOR UPPER AIRSPACE
";

    #[test]
    fn identifier_splitting_counts_entries() {
        let set = extract_notams(SAMPLE, Some("EHBK"), Some("LEZG"), &[]);
        let dep = &set.departure["EHBK"];
        assert_eq!(dep.len(), 2);
        assert!(dep[0].starts_with("1A409/26"));
        assert!(dep[1].starts_with("CO31/20"));
    }

    #[test]
    fn abbreviations_expanded_and_newlines_collapsed() {
        let set = extract_notams(SAMPLE, Some("EHBK"), Some("LEZG"), &[]);
        let dep = &set.departure["EHBK"][0];
        assert!(dep.contains("runway 03/21"));
        assert!(!dep.contains('\n'));
    }

    #[test]
    fn company_entries_collected_without_leaving_their_section() {
        let set = extract_notams(SAMPLE, Some("EHBK"), Some("LEZG"), &[]);
        assert!(set
            .company
            .iter()
            .any(|e| e.starts_with("CO31/20")));
        assert!(set
            .company
            .iter()
            .any(|e| e.contains("FUEL UPLIFT RESTRICTIONS")));
        // the entry also stays in the airport bucket it was found under
        assert!(set.departure["EHBK"]
            .iter()
            .any(|e| e.starts_with("CO31/20")));
    }

    #[test]
    fn destination_and_alternate_buckets() {
        let set = extract_notams(SAMPLE, Some("EHBK"), Some("LEZG"), &[]);
        assert!(set.destination["LEZG"][0].contains("ILS runway 30R"));
        assert!(set.enroute_alternates["LEMD"][0].contains("TWY B5"));
    }

    #[test]
    fn alternate_in_etops_list_goes_to_etops_bucket() {
        let set = extract_notams(SAMPLE, Some("EHBK"), Some("LEZG"), &["LEMD".to_string()]);
        assert!(set.etops_alternates.contains_key("LEMD"));
        assert!(!set.enroute_alternates.contains_key("LEMD"));
    }

    #[test]
    fn area_marker_lines_collected_once() {
        let set = extract_notams(SAMPLE, Some("EHBK"), Some("LEZG"), &[]);
        let hits: Vec<_> = set
            .area
            .iter()
            .filter(|e| e.contains("AIP-REGULATION"))
            .collect();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn empty_text_yields_empty_set() {
        let set = extract_notams("", None, None, &[]);
        assert!(set.is_empty());
    }
}
