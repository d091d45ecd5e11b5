//! Document normalizer — converts raw input into a canonical `EmailDocument`.
//!
//! Accepted inputs:
//! 1. Raw text blob (optionally with `Assunto:`/`Subject:` header lines)
//! 2. PDF bytes — text extracted page by page
//! 3. `.eml` bytes — RFC 5322 message, plain-text part preferred
//!
//! All body text is whitespace-normalized before storage so downstream
//! keyword matching is stable.

mod eml;
mod pdf;

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;

// ── Input ───────────────────────────────────────────────────────────

/// Raw input handed over by the transport layer.
#[derive(Debug, Clone)]
pub enum RawInput {
    /// Pasted email text.
    Text {
        text: String,
        subject: Option<String>,
    },
    /// Uploaded file. `kind` is validated here, not by the caller.
    File {
        bytes: Vec<u8>,
        kind: String,
        subject_hint: Option<String>,
    },
}

/// Which format an `EmailDocument` was normalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    PlainText,
    Pdf,
    Eml,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PlainText => write!(f, "text"),
            Self::Pdf => write!(f, "pdf"),
            Self::Eml => write!(f, "eml"),
        }
    }
}

// ── Document ────────────────────────────────────────────────────────

/// Canonical normalized email document.
///
/// Created here, consumed read-only by every downstream stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDocument {
    /// Whitespace-normalized plain-text body.
    pub text: String,
    /// Subject line, if one was provided or could be extracted.
    pub subject: Option<String>,
    /// Sender address, if one could be extracted (`.eml` and header lines).
    pub sender: Option<String>,
    /// Format the document was normalized from.
    pub source_format: SourceFormat,
    /// Whether the original message carried attachments.
    pub has_attachments: bool,
    /// Size of the raw input in bytes.
    pub raw_byte_length: usize,
}

// ── Normalization ───────────────────────────────────────────────────

/// Normalize raw input into an `EmailDocument`.
///
/// Fails with `UnsupportedFormat` for unknown file kinds and `Decode` for
/// bytes that cannot be parsed as the declared kind. A PDF with no
/// extractable text (e.g. a scanned image) is *not* an error — it yields an
/// empty-but-valid document; classification treats empty bodies specially.
pub fn normalize(input: RawInput) -> Result<EmailDocument, NormalizeError> {
    match input {
        RawInput::Text { text, subject } => Ok(normalize_text(&text, subject)),
        RawInput::File {
            bytes,
            kind,
            subject_hint,
        } => match kind.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                let mut doc = normalize_text(&text, subject_hint);
                doc.raw_byte_length = bytes.len();
                Ok(doc)
            }
            "pdf" => normalize_pdf(&bytes, subject_hint),
            "eml" => eml::normalize_eml(&bytes, subject_hint),
            other => Err(NormalizeError::UnsupportedFormat { kind: other.into() }),
        },
    }
}

/// Normalize a raw text blob.
///
/// Leading `Assunto:`/`Subject:` and `De:`/`From:` header lines are
/// extracted into document metadata and stripped from the body. An explicit
/// subject always wins over an extracted one.
fn normalize_text(text: &str, subject: Option<String>) -> EmailDocument {
    let raw_byte_length = text.len();
    let (body, extracted_subject, sender) = strip_inline_headers(text);

    EmailDocument {
        text: normalize_whitespace(&body),
        subject: subject.or(extracted_subject),
        sender,
        source_format: SourceFormat::PlainText,
        has_attachments: false,
        raw_byte_length,
    }
}

/// Normalize PDF bytes: extract text page by page, join with newlines.
fn normalize_pdf(bytes: &[u8], subject_hint: Option<String>) -> Result<EmailDocument, NormalizeError> {
    let text = pdf::extract_text(bytes)?;

    Ok(EmailDocument {
        text: normalize_whitespace(&text),
        subject: subject_hint,
        sender: None,
        source_format: SourceFormat::Pdf,
        has_attachments: false,
        raw_byte_length: bytes.len(),
    })
}

/// Pull `Assunto:`/`Subject:` and `De:`/`From:` lines off the top of a text
/// blob. Scanning stops at the first line that is neither blank nor a
/// header, so header-looking lines inside the body are left alone.
fn strip_inline_headers(text: &str) -> (String, Option<String>, Option<String>) {
    let mut subject = None;
    let mut sender = None;
    let mut body_start = 0;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        let consumed = if trimmed.is_empty() {
            true
        } else if let Some(value) = header_value(trimmed, &["assunto:", "subject:"]) {
            subject.get_or_insert_with(|| value.to_string());
            true
        } else if let Some(value) = header_value(trimmed, &["de:", "from:"]) {
            sender.get_or_insert_with(|| value.to_string());
            true
        } else {
            false
        };

        if !consumed {
            break;
        }
        body_start += line.len();
    }

    let body = text.get(body_start..).unwrap_or("").to_string();
    (body, subject, sender)
}

/// Case-insensitive header prefix match, returning the trimmed value.
fn header_value<'a>(line: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    let lower = line.to_lowercase();
    for prefix in prefixes {
        if lower.starts_with(prefix) {
            return Some(line[prefix.len()..].trim());
        }
    }
    None
}

/// Whitespace-normalize body text.
///
/// Per-line trailing whitespace is trimmed, runs of blank lines collapse to
/// a single blank line, and the result is trimmed at both ends.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut in_blank_run = false;

    for line in text.lines() {
        let trimmed = line.trim_end();
        if trimmed.trim_start().is_empty() {
            if !in_blank_run {
                lines.push("");
                in_blank_run = true;
            }
        } else {
            lines.push(trimmed);
            in_blank_run = false;
        }
    }

    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Whitespace normalization ────────────────────────────────────

    #[test]
    fn whitespace_collapses_blank_runs() {
        let input = "first\n\n\n\nsecond\n\nthird";
        assert_eq!(normalize_whitespace(input), "first\n\nsecond\n\nthird");
    }

    #[test]
    fn whitespace_trims_line_ends_and_edges() {
        let input = "  \n\nhello   \nworld\t\n\n  ";
        assert_eq!(normalize_whitespace(input), "hello\nworld");
    }

    #[test]
    fn whitespace_empty_input() {
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("\n\n\n"), "");
    }

    // ── Plain text ──────────────────────────────────────────────────

    #[test]
    fn text_input_passes_through() {
        let doc = normalize(RawInput::Text {
            text: "Preciso de ajuda com o sistema.".into(),
            subject: Some("Suporte".into()),
        })
        .unwrap();

        assert_eq!(doc.text, "Preciso de ajuda com o sistema.");
        assert_eq!(doc.subject.as_deref(), Some("Suporte"));
        assert_eq!(doc.source_format, SourceFormat::PlainText);
        assert!(!doc.has_attachments);
    }

    #[test]
    fn text_input_extracts_inline_headers() {
        let doc = normalize(RawInput::Text {
            text: "Assunto: Erro no login\nDe: joao@empresa.com\n\nNão consigo acessar o sistema.".into(),
            subject: None,
        })
        .unwrap();

        assert_eq!(doc.subject.as_deref(), Some("Erro no login"));
        assert_eq!(doc.sender.as_deref(), Some("joao@empresa.com"));
        assert_eq!(doc.text, "Não consigo acessar o sistema.");
    }

    #[test]
    fn explicit_subject_wins_over_extracted() {
        let doc = normalize(RawInput::Text {
            text: "Subject: Extracted\n\nBody here.".into(),
            subject: Some("Explicit".into()),
        })
        .unwrap();

        assert_eq!(doc.subject.as_deref(), Some("Explicit"));
    }

    #[test]
    fn header_lines_inside_body_are_kept() {
        let doc = normalize(RawInput::Text {
            text: "Primeira linha do corpo.\nAssunto: isto não é cabeçalho".into(),
            subject: None,
        })
        .unwrap();

        assert!(doc.subject.is_none());
        assert!(doc.text.contains("Assunto: isto não é cabeçalho"));
    }

    #[test]
    fn raw_byte_length_recorded() {
        let text = "Olá, tudo bem?";
        let doc = normalize(RawInput::Text {
            text: text.into(),
            subject: None,
        })
        .unwrap();
        assert_eq!(doc.raw_byte_length, text.len());
    }

    // ── File kind dispatch ──────────────────────────────────────────

    #[test]
    fn unknown_file_kind_rejected() {
        let result = normalize(RawInput::File {
            bytes: b"irrelevant".to_vec(),
            kind: "docx".into(),
            subject_hint: None,
        });

        match result {
            Err(NormalizeError::UnsupportedFormat { kind }) => assert_eq!(kind, "docx"),
            other => panic!("Expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn file_kind_is_case_insensitive() {
        let doc = normalize(RawInput::File {
            bytes: "corpo do email".as_bytes().to_vec(),
            kind: "TXT".into(),
            subject_hint: None,
        })
        .unwrap();
        assert_eq!(doc.text, "corpo do email");
    }

    #[test]
    fn corrupt_pdf_is_decode_error() {
        let result = normalize(RawInput::File {
            bytes: b"definitely not a pdf stream".to_vec(),
            kind: "pdf".into(),
            subject_hint: None,
        });
        assert!(matches!(result, Err(NormalizeError::Decode { .. })));
    }

    // ── .eml round-trip ─────────────────────────────────────────────

    #[test]
    fn eml_plain_text_round_trips() {
        let eml = b"From: alice@example.com\r\n\
                    To: support@example.com\r\n\
                    Subject: Problema no acesso\r\n\
                    Content-Type: text/plain; charset=utf-8\r\n\
                    \r\n\
                    Preciso de ajuda com o ticket #98765.\r\n";

        let doc = normalize(RawInput::File {
            bytes: eml.to_vec(),
            kind: "eml".into(),
            subject_hint: None,
        })
        .unwrap();

        assert_eq!(doc.text, "Preciso de ajuda com o ticket #98765.");
        assert_eq!(doc.subject.as_deref(), Some("Problema no acesso"));
        assert_eq!(doc.sender.as_deref(), Some("alice@example.com"));
        assert_eq!(doc.source_format, SourceFormat::Eml);
    }
}
