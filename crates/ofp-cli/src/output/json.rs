use ofp_core::analysis::AnalysisResult;
use ofp_core::error::OfpError;
use ofp_core::model::FlightPlanRecord;

pub fn print_record(record: &FlightPlanRecord) -> Result<(), OfpError> {
    let json = serde_json::to_string_pretty(record)?;
    println!("{json}");
    Ok(())
}

pub fn print_analysis(result: &AnalysisResult) -> Result<(), OfpError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
