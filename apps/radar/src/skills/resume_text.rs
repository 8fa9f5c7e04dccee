//! Resume text loading. Every failure degrades to an empty string, which the
//! extractor turns into the fallback profile.

use std::path::Path;

use tracing::{info, warn};

const PDF_MAGIC: &[u8] = b"%PDF";

/// Reads a resume from disk. `.pdf` goes through `pdf-extract`; anything else is
/// read as UTF-8 (lossy). `.docx` and other binary formats are not supported.
pub async fn load_resume_text(path: &Path) -> String {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) => {
            warn!("Resume not readable at {}: {e}", path.display());
            return String::new();
        }
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());

    // PDF text extraction is CPU-bound
    let text = tokio::task::spawn_blocking(move || {
        resume_text_from_bytes(file_name.as_deref(), &bytes)
    })
    .await
    .unwrap_or_else(|e| {
        warn!("Resume extraction task failed: {e}");
        String::new()
    });

    if !text.is_empty() {
        info!("Loaded {} chars of resume text from {}", text.len(), path.display());
    }
    text
}

/// Request text when given, else the configured resume file, else empty.
pub async fn resume_text_or_configured(text: Option<String>, configured: Option<&Path>) -> String {
    match (text, configured) {
        (Some(text), _) => text,
        (None, Some(path)) => load_resume_text(path).await,
        (None, None) => String::new(),
    }
}

/// Extracts text from an uploaded or on-disk resume.
pub fn resume_text_from_bytes(file_name: Option<&str>, bytes: &[u8]) -> String {
    let extension = file_name
        .and_then(|n| Path::new(n).extension())
        .map(|e| e.to_string_lossy().to_lowercase());

    if bytes.starts_with(PDF_MAGIC) || extension.as_deref() == Some("pdf") {
        // pdf-extract panics on some malformed documents
        return match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Could not extract text from PDF resume: {e}");
                String::new()
            }
            Err(_) => {
                warn!("PDF extractor panicked on resume; falling back");
                String::new()
            }
        };
    }

    if matches!(extension.as_deref(), Some("docx" | "doc" | "odt")) {
        warn!("Unsupported resume format {:?}; falling back", extension);
        return String::new();
    }

    String::from_utf8_lossy(bytes).into_owned()
}
