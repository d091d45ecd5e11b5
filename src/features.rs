//! Feature extractor — lightweight lexical signals from a normalized document.
//!
//! Pure and infallible: empty input degrades to defaults (word count 0,
//! language "pt", no signals). Language detection is a common-word frequency
//! heuristic, not a language-ID model — a deliberate simplification that
//! defaults to Portuguese when the signal is weak.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::EmailDocument;

/// Ticket reference pattern, e.g. "#12345". Captured verbatim so the
/// response composer can echo it back.
static TICKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\d{3,}").expect("ticket pattern is valid"));

// ── Keyword lists ───────────────────────────────────────────────────
//
// Curated per category; matching is case-insensitive substring membership.
// Bare greetings ("olá", "oi") are deliberately absent from PLEASANTRY —
// they open productive support emails just as often.

const GRATITUDE: &[&str] = &[
    "obrigado",
    "obrigada",
    "agradeço",
    "agradeco",
    "agradecemos",
    "valeu",
    "grato",
    "thank you",
    "thanks",
    "appreciate",
];

const PLEASANTRY: &[&str] = &[
    "bom dia",
    "boa tarde",
    "boa noite",
    "tudo bem",
    "parabéns",
    "parabens",
    "feliz natal",
    "feliz aniversário",
    "feliz aniversario",
    "bom final de semana",
    "happy birthday",
    "congratulations",
    "merry christmas",
    "happy new year",
];

const REQUEST: &[&str] = &[
    "preciso",
    "solicito",
    "solicitação",
    "solicitacao",
    "gostaria",
    "poderia",
    "por favor",
    "favor",
    "urgente",
    "aguardo",
    "retorno",
    "como fazer",
    "dúvida",
    "duvida",
    "status",
    "prazo",
    "need",
    "please",
    "could you",
    "request",
    "asap",
    "deadline",
];

const ERROR_REPORT: &[&str] = &[
    "erro",
    "problema",
    "bug",
    "falha",
    "não funciona",
    "nao funciona",
    "não consigo",
    "nao consigo",
    "travando",
    "indisponível",
    "indisponivel",
    "fora do ar",
    "login",
    "senha",
    "acesso",
    "error",
    "problem",
    "issue",
    "broken",
    "failed",
    "cannot",
    "can't",
    "crash",
];

const MARKETING: &[&str] = &[
    "promoção",
    "promocao",
    "oferta",
    "desconto",
    "cupom",
    "newsletter",
    "inscreva-se",
    "clique aqui",
    "unsubscribe",
    "click here",
];

/// Common-word lists for the pt/en frequency heuristic.
const PORTUGUESE_COMMON: &[&str] = &[
    "de", "que", "não", "nao", "para", "com", "uma", "por", "mais", "como", "mas", "meu", "minha",
    "você", "voce", "vocês", "voces", "ajuda", "pela", "são", "sao", "fazer", "sistema",
];
const ENGLISH_COMMON: &[&str] = &[
    "the", "and", "you", "for", "that", "with", "this", "have", "from", "are", "not", "your",
    "please", "thanks", "help", "can", "was", "will",
];

// ── Types ───────────────────────────────────────────────────────────

/// A matched keyword category used as classification evidence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SignalCategory {
    Gratitude,
    Pleasantry,
    Request,
    ErrorReport,
    Marketing,
    TicketReference,
}

impl SignalCategory {
    /// Short label for logging and reasoning strings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gratitude => "gratitude",
            Self::Pleasantry => "closing-pleasantry",
            Self::Request => "request",
            Self::ErrorReport => "error-report",
            Self::Marketing => "marketing",
            Self::TicketReference => "ticket-reference",
        }
    }
}

/// Features derived from one document. Owned by the pipeline call for its
/// duration only — never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Whitespace-split word count of the normalized body.
    pub word_count: usize,
    /// ISO language code, "pt" unless the heuristic clearly says otherwise.
    pub language: String,
    /// Matched keyword categories.
    pub signals: BTreeSet<SignalCategory>,
    /// First ticket reference in the text, verbatim (e.g. "#12345").
    pub ticket_reference: Option<String>,
    /// Number of question marks in the body.
    pub question_count: usize,
    /// Whether the body contains emoji.
    pub has_emoji: bool,
}

// ── Extraction ──────────────────────────────────────────────────────

/// Extract features from a normalized document.
pub fn extract(doc: &EmailDocument) -> FeatureSet {
    let word_count = doc.text.split_whitespace().count();

    // Subject participates in signal matching; a ticket number or request
    // keyword often lives only in the subject line.
    let scan_text = match &doc.subject {
        Some(subject) => format!("{}\n{}", subject, doc.text).to_lowercase(),
        None => doc.text.to_lowercase(),
    };

    let mut signals = BTreeSet::new();
    for (category, keywords) in [
        (SignalCategory::Gratitude, GRATITUDE),
        (SignalCategory::Pleasantry, PLEASANTRY),
        (SignalCategory::Request, REQUEST),
        (SignalCategory::ErrorReport, ERROR_REPORT),
        (SignalCategory::Marketing, MARKETING),
    ] {
        if keywords.iter().any(|kw| scan_text.contains(kw)) {
            signals.insert(category);
        }
    }

    let ticket_reference = TICKET_PATTERN
        .find(&scan_text)
        .map(|m| m.as_str().to_string());
    if ticket_reference.is_some() {
        signals.insert(SignalCategory::TicketReference);
    }

    FeatureSet {
        word_count,
        language: detect_language(&doc.text),
        signals,
        ticket_reference,
        question_count: doc.text.matches('?').count(),
        has_emoji: doc.text.chars().any(is_emoji),
    }
}

/// Common-word frequency heuristic over whole tokens. Ties and weak signal
/// default to Portuguese.
fn detect_language(text: &str) -> String {
    let mut pt = 0usize;
    let mut en = 0usize;

    for token in text
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|t| !t.is_empty())
    {
        let token = token.to_lowercase();
        if PORTUGUESE_COMMON.contains(&token.as_str()) {
            pt += 1;
        }
        if ENGLISH_COMMON.contains(&token.as_str()) {
            en += 1;
        }
    }

    if en > pt { "en".to_string() } else { "pt".to_string() }
}

fn is_emoji(c: char) -> bool {
    matches!(u32::from(c), 0x1F300..=0x1FAFF | 0x2600..=0x27BF | 0x1F000..=0x1F2FF)
}
