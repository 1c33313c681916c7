use ofp_core::analysis::AnalysisResult;
use ofp_core::model::FlightPlanRecord;
use ofp_core::parsing::risk::tag_airport_risks;
use ofp_core::ExtractOutcome;
use rust_decimal::Decimal;

pub fn print_extraction(outcome: &ExtractOutcome) {
    let record = &outcome.extraction.record;

    println!("=== Flight plan ===\n");
    println!("  Flight:     {}", opt(&record.flight_number));
    println!(
        "  Routing:    {} -> {}",
        opt(&record.departure),
        opt(&record.destination)
    );
    println!("  Route:      {}", opt(&record.route));
    let alternates = record
        .destination_alternate
        .as_ref()
        .map(|a| a.codes().join(", "))
        .unwrap_or_else(|| "-".to_string());
    println!("  Alternates: {alternates}");

    println!("\n  Weights (kg):");
    println!("    takeoff   {}", num(record.weights.takeoff_weight));
    println!("    landing   {}", num(record.weights.landing_weight));
    println!("    zero fuel {}", num(record.weights.zerofuel_weight));

    println!("  Fuel (kg):");
    println!("    trip      {}", num(record.fuel.trip_fuel));
    println!("    conting   {}", num(record.fuel.contingency));
    println!("    min t/o   {}", num(record.fuel.minimum_takeoff_fuel));
    println!("    block     {}", num(record.fuel.block_fuel));
    println!("    taxi      {}", num(record.fuel.taxi));

    print_weather(record);
    print_notams(record);

    let notes = &outcome.extraction.notes;
    if !notes.missing.is_empty() {
        println!("\n  Missing:   {}", notes.missing.join(", "));
    }
    if !notes.ambiguous.is_empty() {
        println!("  Ambiguous: {}", notes.ambiguous.join(", "));
    }
}

fn print_weather(record: &FlightPlanRecord) {
    if record.weather.is_empty() {
        return;
    }
    println!("\n  Weather:");
    for (code, airport) in &record.weather {
        let mut segments = Vec::new();
        for (name, obs) in [
            ("takeoff", &airport.takeoff),
            ("destination", &airport.destination),
            ("enroute", &airport.enroute),
            ("etops", &airport.etops),
        ] {
            if let Some(obs) = obs {
                let wind = match (obs.wind_dir_deg, obs.wind_speed_kt) {
                    (Some(d), Some(s)) => format!("{d:03}/{s:02}kt"),
                    _ => "wind n/a".to_string(),
                };
                segments.push(format!("{name} {wind}"));
            }
        }
        println!("    {code:<8} {}", segments.join("  "));
    }
}

fn print_notams(record: &FlightPlanRecord) {
    let notams = &record.notams;
    if notams.is_empty() {
        return;
    }
    println!("\n  NOTAMs:");
    let risks = tag_airport_risks(notams);
    for (code, entries) in notams.airports() {
        let tags = risks
            .get(code)
            .map(|t| format!("  [{}]", t.join(", ")))
            .unwrap_or_default();
        println!("    {code:<8} {} entr{}{}", entries.len(), plural_y(entries.len()), tags);
    }
    if !notams.company.is_empty() {
        println!("    company  {} entr{}", notams.company.len(), plural_y(notams.company.len()));
    }
    if !notams.area.is_empty() {
        println!("    area     {} entr{}", notams.area.len(), plural_y(notams.area.len()));
    }
}

pub fn print_analysis(result: &AnalysisResult) {
    println!("=== Safety analysis ===\n");

    if result.flags.is_empty() {
        println!("  No safety flags raised");
    } else {
        for flag in &result.flags {
            println!("  [{}] {}: {}", flag.severity, flag.code, flag.reason);
            for (key, value) in &flag.details {
                println!("      {key} = {value}");
            }
        }
    }

    let dq = &result.data_quality;
    if dq.is_clean() {
        println!("\n  Data quality: clean");
    } else {
        if !dq.missing.is_empty() {
            println!("\n  Missing:   {}", dq.missing.join(", "));
        }
        if !dq.ambiguous.is_empty() {
            println!("  Ambiguous: {}", dq.ambiguous.join(", "));
        }
    }

    println!("\n  Evidence:");
    println!("    callsign   {}", opt(&result.evidence.callsign));
    println!(
        "    times      {} -> {}",
        opt(&result.evidence.time_departure),
        opt(&result.evidence.time_arrival)
    );
    if let Some(obs) = &result.evidence.provided_weather {
        let wind = match (obs.wind_dir_deg, obs.wind_speed_kt) {
            (Some(d), Some(s)) => format!("{d:03}/{s:02}kt"),
            _ => "n/a".to_string(),
        };
        println!("    t/o wind   {wind}");
    }
    println!("    evaluated  {}", result.timestamp_utc);
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn num(value: Option<Decimal>) -> String {
    value
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn plural_y(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}
