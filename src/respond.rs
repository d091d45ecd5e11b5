//! Response composer — fills a reply template matching the classification.
//!
//! Template selection is data-driven: a table keyed by (label, language)
//! rather than branching logic, so adding a language is additive. Tone is
//! fixed by label: professional for PRODUCTIVE, friendly for UNPRODUCTIVE.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{ClassificationResult, Label};
use crate::error::ComposeError;
use crate::features::FeatureSet;
use crate::normalize::EmailDocument;

/// Subject falls back to this many leading characters of the body.
const SUBJECT_SNIPPET_CHARS: usize = 60;

/// Language every deployment is guaranteed to have templates for.
const FALLBACK_LANGUAGE: &str = "pt";

/// Register of a suggested reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Friendly,
}

/// A composed reply suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedResponse {
    /// Empty for UNPRODUCTIVE unless a ticket reference was detected.
    pub subject: Option<String>,
    pub body: String,
    pub tone: Tone,
    pub language: String,
}

// ── Templates ───────────────────────────────────────────────────────

/// One reply template. `body` may carry a `{ticket_sentence}` slot which is
/// filled from `ticket_sentence` (with `{ticket}` substituted) when a
/// ticket reference was detected, and removed otherwise.
struct ReplyTemplate {
    label: Label,
    language: &'static str,
    tone: Tone,
    body: &'static str,
    ticket_sentence: &'static str,
}

const TEMPLATES: &[ReplyTemplate] = &[
    ReplyTemplate {
        label: Label::Productive,
        language: "pt",
        tone: Tone::Professional,
        body: "Olá! Recebemos sua solicitação e nossa equipe já está analisando o caso.\
               {ticket_sentence} Retornaremos em breve com uma resposta. Caso tenha \
               informações adicionais, basta responder este email.",
        ticket_sentence: " O chamado {ticket} foi localizado e será referenciado em todas \
                          as atualizações.",
    },
    ReplyTemplate {
        label: Label::Unproductive,
        language: "pt",
        tone: Tone::Friendly,
        body: "Obrigado pela sua mensagem! Ficamos muito felizes com o contato.\
               {ticket_sentence} Se precisar de algo mais, estamos à disposição.",
        ticket_sentence: " Seguimos acompanhando o chamado {ticket}.",
    },
    ReplyTemplate {
        label: Label::Productive,
        language: "en",
        tone: Tone::Professional,
        body: "Hello! We have received your request and our team is already looking into \
               it.{ticket_sentence} We will get back to you shortly. If you have any \
               additional details, just reply to this email.",
        ticket_sentence: " Ticket {ticket} has been located and will be referenced in every \
                          update.",
    },
    ReplyTemplate {
        label: Label::Unproductive,
        language: "en",
        tone: Tone::Friendly,
        body: "Thank you for your message! We are glad to hear from you.{ticket_sentence} \
               If there is anything else we can help with, we are here.",
        ticket_sentence: " We are still tracking ticket {ticket}.",
    },
];

fn find_template(label: Label, language: &str) -> Option<&'static ReplyTemplate> {
    TEMPLATES
        .iter()
        .find(|t| t.label == label && t.language == language)
}

// ── Composer ────────────────────────────────────────────────────────

/// Template-based reply composer.
pub struct ResponseComposer {
    /// Surface `UnsupportedLanguage` instead of degrading to Portuguese.
    strict_language: bool,
}

impl ResponseComposer {
    pub fn new(strict_language: bool) -> Self {
        Self { strict_language }
    }

    /// Compose a reply for a classified document.
    ///
    /// Fails only with `UnsupportedLanguage`, and only under the strict
    /// policy; the default degrades to the Portuguese template.
    pub fn compose(
        &self,
        classification: &ClassificationResult,
        features: &FeatureSet,
        doc: &EmailDocument,
    ) -> Result<SuggestedResponse, ComposeError> {
        let label = classification.label;

        let template = match find_template(label, &features.language) {
            Some(template) => template,
            None if self.strict_language => {
                return Err(ComposeError::UnsupportedLanguage {
                    language: features.language.clone(),
                });
            }
            None => {
                debug!(
                    language = %features.language,
                    "No template for language, degrading to Portuguese"
                );
                find_template(label, FALLBACK_LANGUAGE)
                    .unwrap_or(&TEMPLATES[0])
            }
        };

        let ticket = features.ticket_reference.as_deref();
        let body = render_body(template, ticket);
        let subject = build_subject(label, doc, ticket);

        Ok(SuggestedResponse {
            subject,
            body,
            tone: template.tone,
            language: template.language.to_string(),
        })
    }
}

/// Fill the template's ticket slot, echoing the detected reference verbatim.
fn render_body(template: &ReplyTemplate, ticket: Option<&str>) -> String {
    let ticket_sentence = match ticket {
        Some(ticket) => template.ticket_sentence.replace("{ticket}", ticket),
        None => String::new(),
    };
    template.body.replace("{ticket_sentence}", &ticket_sentence)
}

/// Subject policy:
/// - PRODUCTIVE: `"Re: " + (subject | first 60 chars of body)`, with the
///   ticket reference appended when detected and not already present.
/// - UNPRODUCTIVE: empty, unless a ticket reference was detected — then the
///   reference is preserved for traceability.
fn build_subject(label: Label, doc: &EmailDocument, ticket: Option<&str>) -> Option<String> {
    match label {
        Label::Productive => {
            let base = doc
                .subject
                .clone()
                .unwrap_or_else(|| snippet(&doc.text, SUBJECT_SNIPPET_CHARS));
            let mut subject = format!("Re: {base}");
            if let Some(ticket) = ticket {
                if !subject.contains(ticket) {
                    subject.push_str(&format!(" ({ticket})"));
                }
            }
            Some(subject)
        }
        Label::Unproductive => ticket.map(|t| format!("Ticket {t}")),
    }
}

/// First `max_chars` characters of `text`, single-line.
fn snippet(text: &str, max_chars: usize) -> String {
    text.chars()
        .take(max_chars)
        .collect::<String>()
        .replace('\n', " ")
        .trim()
        .to_string()
}
