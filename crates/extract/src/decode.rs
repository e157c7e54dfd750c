use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("PDF text extraction failed: {0}")]
    Pdf(String),
    #[error("Document is not valid UTF-8 text")]
    InvalidUtf8,
    #[error("Unsupported document type")]
    Unsupported,
}

/// Abstraction over the step that turns an uploaded document into text.
/// Implementations never run OCR: a scanned page without a text layer decodes
/// to empty text.
pub trait DocumentDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError>;
}

impl<D: DocumentDecoder + ?Sized> DocumentDecoder for std::sync::Arc<D> {
    fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        (**self).decode(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
    Unknown,
}

impl DocumentKind {
    /// Classify by content. PDFs are recognised by their `%PDF-` header.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"%PDF-") {
            DocumentKind::Pdf
        } else if !bytes.is_empty() && std::str::from_utf8(bytes).is_ok() {
            DocumentKind::Text
        } else {
            DocumentKind::Unknown
        }
    }
}

// ── Mock decoder (always available, used for tests) ───────────────────────────

/// Returns a preset string regardless of input.
pub struct MockDecoder {
    pub text: String,
}

impl MockDecoder {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DocumentDecoder for MockDecoder {
    fn decode(&self, _bytes: &[u8]) -> Result<String, DecodeError> {
        Ok(self.text.clone())
    }
}

// ── Plain text ────────────────────────────────────────────────────────────────

/// Accepts documents that are already UTF-8 text.
pub struct PlainTextDecoder;

impl DocumentDecoder for PlainTextDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }
}

// ── PDF text layer (gated behind the `pdf` feature) ───────────────────────────

#[cfg(feature = "pdf")]
pub mod pdf_backend {
    use super::{DecodeError, DocumentDecoder};

    pub struct PdfTextDecoder;

    impl DocumentDecoder for PdfTextDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
            // pdf-extract panics on some malformed inputs instead of erroring.
            match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(e)) => Err(DecodeError::Pdf(e.to_string())),
                Err(_) => Err(DecodeError::Pdf("PDF parser aborted on malformed input".into())),
            }
        }
    }
}

#[cfg(feature = "pdf")]
pub use pdf_backend::PdfTextDecoder;

/// Picks a decoder per document by sniffing its bytes.
pub struct AutoDecoder {
    pub accept_plain_text: bool,
}

impl DocumentDecoder for AutoDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        match DocumentKind::sniff(bytes) {
            #[cfg(feature = "pdf")]
            DocumentKind::Pdf => PdfTextDecoder.decode(bytes),
            DocumentKind::Text if self.accept_plain_text => PlainTextDecoder.decode(bytes),
            _ => Err(DecodeError::Unsupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_preset_text() {
        let d = MockDecoder::new("HDFC Bank");
        assert_eq!(d.decode(b"anything").unwrap(), "HDFC Bank");
        assert_eq!(d.decode(b"").unwrap(), "HDFC Bank");
    }

    #[test]
    fn plain_text_roundtrip_and_invalid_utf8() {
        assert_eq!(PlainTextDecoder.decode("₹ 849.00".as_bytes()).unwrap(), "₹ 849.00");
        assert!(matches!(
            PlainTextDecoder.decode(&[0xff, 0xfe, 0x00]),
            Err(DecodeError::InvalidUtf8)
        ));
    }

    #[test]
    fn shared_trait_object_decodes() {
        let d: std::sync::Arc<dyn DocumentDecoder> = std::sync::Arc::new(MockDecoder::new("SBI Card"));
        assert_eq!(d.decode(b"%PDF-1.7").unwrap(), "SBI Card");
    }

    #[test]
    fn sniff_kinds() {
        assert_eq!(DocumentKind::sniff(b"%PDF-1.7\n..."), DocumentKind::Pdf);
        assert_eq!(DocumentKind::sniff(b"Statement Date: 01/10/2024"), DocumentKind::Text);
        assert_eq!(DocumentKind::sniff(&[0x89, b'P', b'N', b'G', 0xff]), DocumentKind::Unknown);
        assert_eq!(DocumentKind::sniff(b""), DocumentKind::Unknown);
    }

    #[test]
    fn auto_decoder_rejects_text_unless_allowed() {
        let strict = AutoDecoder { accept_plain_text: false };
        assert!(matches!(strict.decode(b"HDFC Bank"), Err(DecodeError::Unsupported)));

        let lenient = AutoDecoder { accept_plain_text: true };
        assert_eq!(lenient.decode(b"HDFC Bank").unwrap(), "HDFC Bank");
    }

    #[test]
    fn auto_decoder_rejects_binary() {
        let d = AutoDecoder { accept_plain_text: true };
        assert!(matches!(d.decode(&[0x00, 0xff, 0xd8]), Err(DecodeError::Unsupported)));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn truncated_pdf_is_decode_error() {
        let err = PdfTextDecoder.decode(b"%PDF-1.7\n%%EOF").unwrap_err();
        assert!(matches!(err, DecodeError::Pdf(_)));
    }
}
