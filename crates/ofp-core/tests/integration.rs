use ofp_core::augment::{AugmentError, RemoteExtractor, SecondaryRecord};
use ofp_core::extraction::{DocumentExtractor, RawDocumentText};
use ofp_core::model::FieldValue;
use ofp_core::{extract_document, parse_flightplan, ExtractOptions, OfpError};
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Extraction backend that returns canned text, so the pipeline can be
/// exercised without poppler installed.
struct MockExtractor {
    text: &'static str,
}

impl DocumentExtractor for MockExtractor {
    fn extract(&self, _bytes: &[u8]) -> Result<RawDocumentText, OfpError> {
        Ok(RawDocumentText {
            text: self.text.to_string(),
            page_count: 1,
        })
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

/// Remote channel that counts invocations and replies from a closure.
struct MockRemote {
    calls: AtomicUsize,
    reply: fn() -> Result<SecondaryRecord, AugmentError>,
}

impl MockRemote {
    fn new(reply: fn() -> Result<SecondaryRecord, AugmentError>) -> Self {
        MockRemote {
            calls: AtomicUsize::new(0),
            reply,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteExtractor for MockRemote {
    fn extract_remote(&self, _text: &str) -> Result<SecondaryRecord, AugmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }
}

const COMPLETE_OFP: &str = "\
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
TAXI           150  00.15
BLOCK FUEL    8455
EHBK/MST MAASTRICHT
  SA 070925 24012KT 9999 BKN020 M02/M04 Q1013=
  FT 070900 0710/0810 25015KT 9999 SCT025=
LEZG/ZAZ ZARAGOZA
  SA 070930 30008KT 5000 R30R/0400 OVC002 12/08 Q1018=
DEPARTURE AIRPORT: EHBK
1A409/26
RWY 03/21 CLSD DUE TO
MAINTENANCE
CO31/20
CREW MUST CARRY PAPER CHARTS
DESTINATION AIRPORT: LEZG
B0210/26
ILS RWY 30R U/S
Page 2 of 2
";

const SPARSE_OFP: &str = "Callsign: ET3734\nsome free text with no structure\n";

#[test]
fn end_to_end_extraction_from_a_full_document() {
    let extractor = MockExtractor { text: COMPLETE_OFP };
    let outcome = extract_document(b"%PDF", &extractor, None, ExtractOptions::default()).unwrap();
    let record = &outcome.extraction.record;

    assert_eq!(record.flight_number.as_deref(), Some("ET3734"));
    assert_eq!(record.departure.as_deref(), Some("EHBK"));
    assert_eq!(record.destination.as_deref(), Some("LEZG"));
    assert_eq!(record.route.as_deref(), Some("MAARSN1C MAARSN UL608 T180/F360"));
    assert_eq!(record.weights.takeoff_weight, Some(dec!(77.1)));
    assert_eq!(record.fuel.trip_fuel, Some(dec!(4200)));
    assert_eq!(record.fuel.taxi, Some(dec!(150)));
    assert_eq!(record.fuel.block_fuel, Some(dec!(8455)));

    let dep_wx = record.weather["EHBK"].takeoff.as_ref().unwrap();
    assert_eq!(dep_wx.wind_dir_deg, Some(240));
    assert_eq!(dep_wx.temperature_c, Some(-2));
    let dest_wx = record.weather["LEZG"].destination.as_ref().unwrap();
    assert_eq!(dest_wx.rvr_m, Some(400));

    assert_eq!(outcome.page_count, 1);
    assert!(outcome.augmentation_error.is_none());
}

#[test]
fn empty_input_still_has_every_declared_key() {
    let out = parse_flightplan("");
    let json = serde_json::to_value(&out.record).unwrap();
    let obj = json.as_object().unwrap();
    for key in [
        "flight_number",
        "route",
        "departure",
        "destination",
        "destination_alternate",
        "weights",
        "fuel",
        "weather",
        "notams",
    ] {
        assert!(obj.contains_key(key), "missing key {key}");
    }
    assert!(json["flight_number"].is_null());
    assert!(json["weights"]["takeoff_weight"].is_null());
    assert!(!out.notes.missing.is_empty());
}

#[test]
fn minimally_complete_record_short_circuits_augmentation() {
    let extractor = MockExtractor { text: COMPLETE_OFP };
    let remote = MockRemote::new(|| Ok(SecondaryRecord::default()));
    let outcome = extract_document(
        b"%PDF",
        &extractor,
        Some(&remote),
        ExtractOptions { augment: true },
    )
    .unwrap();
    assert_eq!(remote.call_count(), 0);
    assert!(outcome.augmentation_error.is_none());
}

#[test]
fn disabled_augmentation_never_calls_the_remote() {
    let extractor = MockExtractor { text: SPARSE_OFP };
    let remote = MockRemote::new(|| Ok(SecondaryRecord::default()));
    extract_document(
        b"%PDF",
        &extractor,
        Some(&remote),
        ExtractOptions { augment: false },
    )
    .unwrap();
    assert_eq!(remote.call_count(), 0);
}

#[test]
fn sparse_record_is_augmented_without_overwriting() {
    fn reply() -> Result<SecondaryRecord, AugmentError> {
        let json = serde_json::json!({
            "callsign": "ET9999",
            "route": "DCT MAARSN DCT",
            "weights": { "takeoff_weight": 77100 },
            "fuel": { "trip_fuel": 4200 }
        });
        Ok(serde_json::from_value(json).unwrap())
    }
    let extractor = MockExtractor { text: SPARSE_OFP };
    let remote = MockRemote::new(reply);
    let outcome = extract_document(
        b"%PDF",
        &extractor,
        Some(&remote),
        ExtractOptions { augment: true },
    )
    .unwrap();
    assert_eq!(remote.call_count(), 1);

    let record = &outcome.extraction.record;
    // primary found the callsign; the secondary must not replace it
    assert_eq!(record.flight_number.as_deref(), Some("ET3734"));
    // holes filled from the secondary
    assert_eq!(record.route.as_deref(), Some("DCT MAARSN DCT"));
    assert_eq!(record.weights.takeoff_weight, Some(dec!(77100)));
    assert_eq!(record.fuel.trip_fuel, Some(dec!(4200)));
    // the analysis view follows the merged record
    assert_eq!(
        outcome.extraction.analysis.trip_fuel,
        FieldValue::Number(4200.0)
    );
}

#[test]
fn failed_augmentation_keeps_the_primary_record() {
    fn reply() -> Result<SecondaryRecord, AugmentError> {
        Err(AugmentError::Status(503))
    }
    let extractor = MockExtractor { text: SPARSE_OFP };
    let remote = MockRemote::new(reply);
    let outcome = extract_document(
        b"%PDF",
        &extractor,
        Some(&remote),
        ExtractOptions { augment: true },
    )
    .unwrap();
    assert_eq!(remote.call_count(), 1);

    let record = &outcome.extraction.record;
    assert_eq!(record.flight_number.as_deref(), Some("ET3734"));
    assert!(record.route.is_none());
    let diag = outcome.augmentation_error.unwrap();
    assert!(diag.contains("503"), "unexpected diagnostic: {diag}");
}

#[test]
fn notam_entries_split_and_expand() {
    let out = parse_flightplan(COMPLETE_OFP);
    let notams = &out.record.notams;

    let dep = &notams.departure["EHBK"];
    assert_eq!(dep.len(), 2);
    assert!(dep[0].starts_with("1A409/26"));
    assert!(dep[0].contains("runway 03/21"));
    assert!(!dep[0].contains('\n'));
    assert!(dep[1].starts_with("CO31/20"));

    assert!(notams.company.iter().any(|e| e.starts_with("CO31/20")));
    assert!(notams.destination["LEZG"][0].contains("ILS runway 30R"));
}

#[test]
fn extraction_notes_separate_missing_from_found() {
    let out = parse_flightplan(COMPLETE_OFP);
    assert!(!out
        .notes
        .missing
        .contains(&"weights.zerofuel_weight".to_string()));
    assert!(!out.notes.missing.contains(&"fuel.trip_fuel".to_string()));
    // sorted and deduplicated
    let mut sorted = out.notes.missing.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(out.notes.missing, sorted);
}
