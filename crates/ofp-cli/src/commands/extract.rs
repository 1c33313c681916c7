use ofp_core::augment::http::HttpRemoteExtractor;
use ofp_core::augment::RemoteExtractor;
use ofp_core::extraction::pdftotext::PdftotextExtractor;
use ofp_core::{extract_document, ExtractOptions};
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
    augment: bool,
) -> Result<(), ofp_core::error::OfpError> {
    let bytes = std::fs::read(&input_file)?;
    let extractor = PdftotextExtractor::new();

    let remote = HttpRemoteExtractor::from_env();
    if augment && remote.is_none() {
        eprintln!("warning: --augment given but OFP_REMOTE_URL/OFP_REMOTE_API_KEY are not set");
    }
    let remote_ref = remote.as_ref().map(|r| r as &dyn RemoteExtractor);

    let outcome = extract_document(&bytes, &extractor, remote_ref, ExtractOptions { augment })?;
    if let Some(diag) = &outcome.augmentation_error {
        eprintln!("warning: augmentation unavailable: {diag}");
    }

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&outcome.extraction.record)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Extracted {} page(s), record written to {}",
                outcome.page_count,
                path.display()
            );
            let notes = &outcome.extraction.notes;
            if !notes.missing.is_empty() {
                eprintln!("  {} field(s) missing: {}", notes.missing.len(), notes.missing.join(", "));
            }
            if !notes.ambiguous.is_empty() {
                eprintln!(
                    "  {} field(s) ambiguous: {}",
                    notes.ambiguous.len(),
                    notes.ambiguous.join(", ")
                );
            }
        }
        None => match output_format {
            "json" => output::json::print_record(&outcome.extraction.record)?,
            _ => output::table::print_extraction(&outcome),
        },
    }

    Ok(())
}
