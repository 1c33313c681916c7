use crate::error::OfpError;
use crate::extraction::{DocumentExtractor, RawDocumentText};
use std::io::Write;
use std::process::Command;

/// Document extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` to preserve the whitespace alignment of OFP
/// header blocks and fuel tables.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for PdftotextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<RawDocumentText, OfpError> {
        // Write document bytes to a temp file
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| OfpError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(bytes)
            .map_err(|e| OfpError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OfpError::PdftotextNotFound
                } else {
                    OfpError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(OfpError::PdftotextFailed { code, stderr });
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(page_split(&raw))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// pdftotext separates pages with form feed \x0c; count non-empty pages and
/// rejoin them with newlines for the downstream line-oriented parsers.
fn page_split(raw: &str) -> RawDocumentText {
    let pages: Vec<&str> = raw.split('\x0c').collect();
    let page_count = pages.iter().filter(|p| !p.trim().is_empty()).count().max(1);
    RawDocumentText {
        text: pages.join("\n").trim().to_string(),
        page_count,
    }
}
