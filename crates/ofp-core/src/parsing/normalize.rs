use regex::Regex;
use std::sync::LazyLock;

static PAGE_FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Page\s*\d+\s*of\s*\d+").unwrap());
static REG_FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*ET\s*\S[^\n]*Reg:[^\n]*$").unwrap());
// fleet footer form "ET 510/ET-AUO ...", not the flight-number header
static ET_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ET\s*\d{3,}/ET-[A-Z]{3}[^\n]*").unwrap());
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Strip page-footer noise and collapse blank-line runs. Pure text -> text;
/// run once per document before any field extractor or segmenter.
pub fn normalize_text(text: &str) -> String {
    let cleaned = PAGE_FOOTER_RE.replace_all(text, " ");
    let cleaned = REG_FOOTER_RE.replace_all(&cleaned, "");
    let cleaned = ET_MARKER_RE.replace_all(&cleaned, "");
    BLANK_RUN_RE.replace_all(&cleaned, "\n\n").into_owned()
}

/// Fixed abbreviation table for NOTAM and weather shorthand. Kept small and
/// auditable; expansion happens exactly once, at entry capture time.
static ABBREVIATIONS: &[(&str, &str)] = &[
    ("SHRA", "showers and rain"),
    ("TS", "thunderstorms"),
    ("RVR", "runway visual range"),
    ("RWY", "runway"),
    ("ICE", "ice"),
    ("SN", "snow"),
    ("DZ", "drizzle"),
    ("FG", "fog"),
    ("BKN", "broken clouds"),
    ("SCT", "scattered clouds"),
];

static ABBREV_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|(abbr, full)| {
            let re = Regex::new(&format!(r"(?i)\b{}\b", abbr)).unwrap();
            (re, *full)
        })
        .collect()
});

/// Expand known aviation abbreviations into readable phrases.
pub fn expand_abbreviations(text: &str) -> String {
    let mut out = text.to_string();
    for (re, full) in ABBREV_RES.iter() {
        out = re.replace_all(&out, *full).into_owned();
    }
    out
}

/// Collapse all whitespace runs (including newlines) to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Expand abbreviations then collapse whitespace: the canonical cleanup for
/// a captured NOTAM entry.
pub fn clean_entry(text: &str) -> String {
    collapse_whitespace(&expand_abbreviations(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_page_footers() {
        let text = "TRIP 4200\nPage 3 of 12\nALTN 3893";
        let out = normalize_text(text);
        assert!(!out.contains("Page 3"));
        assert!(out.contains("TRIP 4200"));
    }

    #[test]
    fn strips_registration_footer_lines() {
        let text = "DATA\n  ET AVN Reg: ET-AVN\nMORE";
        let out = normalize_text(text);
        assert!(!out.contains("Reg:"));
    }

    #[test]
    fn strips_fleet_footer_but_keeps_flight_number_header() {
        let out = normalize_text("ET3734/07FEB  EHBK/MST\nET 510/ET-AUO B737-800");
        assert!(out.contains("ET3734/07FEB"));
        assert!(!out.contains("ET-AUO"));
    }

    #[test]
    fn collapses_blank_runs() {
        let out = normalize_text("a\n\n\n\nb");
        assert_eq!(out, "a\n\nb");
    }

    #[test]
    fn expands_abbreviations_case_insensitively() {
        assert_eq!(expand_abbreviations("RWY 03 closed"), "runway 03 closed");
        assert_eq!(expand_abbreviations("rvr below minima"), "runway visual range below minima");
    }

    #[test]
    fn expansion_respects_word_boundaries() {
        // "TSUNAMI" must not expand its TS prefix
        assert_eq!(expand_abbreviations("TSUNAMI WARNING"), "TSUNAMI WARNING");
    }

    #[test]
    fn clean_entry_collapses_newlines() {
        assert_eq!(
            clean_entry("RWY 03\n  CLOSED DUE\n  SN"),
            "runway 03 CLOSED DUE snow"
        );
    }
}
