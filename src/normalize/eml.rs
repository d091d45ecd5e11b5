//! `.eml` normalization via mail-parser.

use mail_parser::MessageParser;

use crate::error::NormalizeError;
use crate::normalize::{EmailDocument, SourceFormat, normalize_whitespace};

/// Parse RFC 5322 message bytes into an `EmailDocument`.
///
/// The canonical body is the best-effort plain-text part: mail-parser
/// prefers `text/plain` and converts `text/html` to plain text when it is
/// the only body part. Subject and sender headers are extracted if present.
pub(super) fn normalize_eml(
    bytes: &[u8],
    subject_hint: Option<String>,
) -> Result<EmailDocument, NormalizeError> {
    let message = MessageParser::default()
        .parse(bytes)
        .ok_or_else(|| NormalizeError::Decode {
            kind: "eml".into(),
            reason: "malformed MIME structure".into(),
        })?;

    let subject = message.subject().map(str::to_string);
    let sender = first_address(message.from());
    let body = message
        .body_text(0)
        .map(|cow| cow.into_owned())
        .unwrap_or_default();
    let has_attachments = message.attachment_count() > 0;

    Ok(EmailDocument {
        text: normalize_whitespace(&body),
        subject: subject_hint.or(subject),
        sender,
        source_format: SourceFormat::Eml,
        has_attachments,
        raw_byte_length: bytes.len(),
    })
}

/// First email address from an optional mail_parser Address field.
fn first_address(addr: Option<&mail_parser::Address>) -> Option<String> {
    match addr? {
        mail_parser::Address::List(addrs) => addrs
            .iter()
            .find_map(|a| a.address.as_ref().map(|s| s.to_string())),
        mail_parser::Address::Group(groups) => groups.iter().find_map(|g| {
            g.addresses
                .iter()
                .find_map(|a| a.address.as_ref().map(|s| s.to_string()))
        }),
    }
}
