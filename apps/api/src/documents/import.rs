//! Text extraction for uploaded files.

use thiserror::Error;

const TEXT_EXTENSIONS: [&str; 5] = ["txt", "md", "json", "yaml", "html"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Empty content is not allowed")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
}

/// Classifies a file by its extension (case-insensitive).
pub fn detect_file_type(filename: &str) -> Result<FileType, ImportError> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if ext == "pdf" {
        Ok(FileType::Pdf)
    } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        Ok(FileType::Text)
    } else {
        Err(ImportError::UnsupportedType(format!(".{ext}")))
    }
}

/// Extracts the text of an uploaded file.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, ImportError> {
    let text = match detect_file_type(filename)? {
        FileType::Pdf => {
            let raw = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| ImportError::Pdf(e.to_string()))?;
            collapse_whitespace(&raw)
        }
        FileType::Text => decode_text(bytes),
    };

    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(text)
}

/// UTF-8, falling back to Latin-1 (every byte maps to the code point of the same value).
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_file_type() {
        assert_eq!(detect_file_type("cv.PDF").unwrap(), FileType::Pdf);
        assert_eq!(detect_file_type("notes.md").unwrap(), FileType::Text);
        assert_eq!(detect_file_type("job.yaml").unwrap(), FileType::Text);
        assert!(matches!(
            detect_file_type("cv.docx"),
            Err(ImportError::UnsupportedType(ext)) if ext == ".docx"
        ));
        assert!(detect_file_type("no_extension").is_err());
    }

    #[test]
    fn test_extract_utf8_text() {
        let text = extract_text("cv.txt", "Jane Doe — Rust".as_bytes()).unwrap();
        assert_eq!(text, "Jane Doe — Rust");
    }

    #[test]
    fn test_extract_latin1_fallback() {
        // "café" in Latin-1
        let text = extract_text("cv.txt", &[0x63, 0x61, 0x66, 0xE9]).unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn test_extract_rejects_blank_file() {
        assert!(matches!(
            extract_text("cv.md", b"  \n\t"),
            Err(ImportError::Empty)
        ));
    }

    #[test]
    fn test_invalid_pdf_reports_error() {
        assert!(matches!(
            extract_text("cv.pdf", b"not a pdf"),
            Err(ImportError::Pdf(_))
        ));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\n b\tc  "), "a b c");
    }
}
