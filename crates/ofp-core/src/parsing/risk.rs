/// Keyword table mapping operational risk categories to the NOTAM phrases
/// that evidence them. Matching is case-insensitive substring; categories
/// come out sorted and deduplicated so tagging is order-independent.
static RISK_KEYWORDS: &[(&str, &[&str])] = &[
    ("braking", &["braking", "poor braking", "mu value", "slippery", "contam"]),
    ("closure", &["closed", "closure", "shut"]),
    (
        "contamination",
        &["contaminat", "slush", "ice", "snow", "water on runway", "frozen", "frost"],
    ),
    ("navaid_issues", &["navaid", "vordme out", "ils out", "papi out", "nav"]),
    ("reduced_visibility", &["fog", "mist", "haze", "rvr", "visibility"]),
    ("runway_damage", &["crack", "pothole", "damag", "surface irregularit"]),
    ("thunderstorms", &["thunderstorm", "ts", "lightning"]),
];

/// Tag a NOTAM entry (or any free text) with the risk categories it touches.
pub fn tag_risks(text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    let mut tags: Vec<String> = RISK_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(category, _)| category.to_string())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Risk categories per airport across all NOTAM buckets. Advisory metadata
/// only; the threshold analyzer never consults it.
pub fn tag_airport_risks(
    notams: &crate::model::NotamSet,
) -> std::collections::BTreeMap<String, Vec<String>> {
    let mut out: std::collections::BTreeMap<String, Vec<String>> =
        std::collections::BTreeMap::new();
    for (code, entries) in notams.airports() {
        let tags = tag_risks(&entries.join(" "));
        if tags.is_empty() {
            continue;
        }
        let bucket = out.entry(code.clone()).or_default();
        bucket.extend(tags);
        bucket.sort();
        bucket.dedup();
    }
    out
}
