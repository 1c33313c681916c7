use ofp_core::analysis::{load_thresholds, read_thresholds};
use std::path::{Path, PathBuf};

pub fn show(file: Option<PathBuf>) -> Result<(), ofp_core::error::OfpError> {
    let config = load_thresholds(file.as_deref());
    let json = serde_json::to_string_pretty(&config)?;
    println!("{json}");
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), ofp_core::error::OfpError> {
    let config = read_thresholds(file)?;
    println!("OK: {} parses", file.display());
    println!(
        "  crosswind_limit_kt={} wind_speed_threshold_kt={} icing_temp_c={}",
        config.crosswind_limit_kt, config.wind_speed_threshold_kt, config.icing_temp_c
    );
    println!(
        "  min_rvr_m={} min_cloud_base_ft={} max_flight_level={}",
        config.min_rvr_m, config.min_cloud_base_ft, config.max_flight_level
    );
    println!(
        "  required_fields=[{}] ambiguous_time_tolerance_minutes={}",
        config.data_quality.required_fields.join(", "),
        config.data_quality.ambiguous_time_tolerance_minutes
    );
    Ok(())
}
