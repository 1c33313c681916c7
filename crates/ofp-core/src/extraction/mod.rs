pub mod pdftotext;

use crate::error::OfpError;

/// Best-effort text pulled from a binary document, plus its page count.
/// Ephemeral: produced once per document and discarded after composition.
#[derive(Debug, Clone)]
pub struct RawDocumentText {
    pub text: String,
    pub page_count: usize,
}

/// Trait for document text extraction backends. The core never inspects
/// binary document structure itself.
pub trait DocumentExtractor: Send + Sync {
    /// Extract best-effort text from document bytes.
    fn extract(&self, bytes: &[u8]) -> Result<RawDocumentText, OfpError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
