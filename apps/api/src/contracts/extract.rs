//! Upload validation and PDF text extraction.

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Validates the uploaded file name and returns it without any path components.
pub fn validate_pdf_filename(filename: &str) -> Result<String, AppError> {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();

    if name.is_empty() {
        return Err(AppError::Validation("Uploaded file has no name".to_string()));
    }
    if !name.to_ascii_lowercase().ends_with(".pdf") {
        return Err(AppError::Validation("Only PDF files allowed".to_string()));
    }
    Ok(name.to_string())
}

/// Extracts the text of every page, in order.
///
/// Runs on the blocking pool: parsing is CPU-bound and the parser can panic on
/// malformed input, which surfaces here as a join error.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    let size = bytes.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::PdfExtraction(format!("parser aborted: {e}")))?
        .map_err(|e| AppError::PdfExtraction(format!("{e:?}")))?;

    debug!(
        "Extracted {} characters from {size}-byte PDF",
        text.chars().count()
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_filename_accepted() {
        assert_eq!(
            validate_pdf_filename("site-works-contract.pdf").unwrap(),
            "site-works-contract.pdf"
        );
    }

    #[test]
    fn test_uppercase_extension_accepted() {
        assert_eq!(validate_pdf_filename("EPC.PDF").unwrap(), "EPC.PDF");
    }

    #[test]
    fn test_path_components_stripped() {
        assert_eq!(
            validate_pdf_filename("../../etc/contract.pdf").unwrap(),
            "contract.pdf"
        );
        assert_eq!(
            validate_pdf_filename("C:\\Users\\pm\\tender.pdf").unwrap(),
            "tender.pdf"
        );
    }

    #[test]
    fn test_non_pdf_rejected() {
        assert!(matches!(
            validate_pdf_filename("contract.docx"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_pdf_filename("contract.pdf.exe"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            validate_pdf_filename("uploads/"),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_extraction() {
        let result = extract_pdf_text(Bytes::from_static(b"this is not a pdf")).await;
        assert!(matches!(result, Err(AppError::PdfExtraction(_))));
    }
}
