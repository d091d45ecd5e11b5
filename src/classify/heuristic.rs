//! Heuristic scoring strategy — deterministic keyword rules.
//!
//! Two non-negative scores accumulate weighted contributions from lexical
//! signals plus small structural bonuses. The higher side wins; ties
//! resolve to UNPRODUCTIVE (no actionable signal means no response needed
//! by default). Confidence is the winning share of the total score, so it
//! grows with the margin between the two sides.

use crate::classify::{ClassificationResult, Label};
use crate::features::{FeatureSet, SignalCategory};
use crate::normalize::EmailDocument;

/// Identifier reported as `model_used`.
pub(super) const MODEL_ID: &str = "heuristic";

/// Confidence assigned when no rule contributes anything at all,
/// including the empty-body case.
pub const NO_SIGNAL_CONFIDENCE: f64 = 0.5;

// Category weights, productive side.
const WEIGHT_ERROR_REPORT: f64 = 0.8;
const WEIGHT_REQUEST: f64 = 0.6;

// Category weights, unproductive side.
const WEIGHT_GRATITUDE: f64 = 0.9;
const WEIGHT_PLEASANTRY: f64 = 0.8;
const WEIGHT_MARKETING: f64 = 0.7;

// Structural bonuses.
const TICKET_BONUS: f64 = 0.5;
const QUESTION_BONUS: f64 = 0.3;
const SHORT_BODY_BONUS: f64 = 0.3;
const EMOJI_BONUS: f64 = 0.2;

/// A body at or under this many words counts as "short".
const SHORT_BODY_WORDS: usize = 12;

/// Rule-based scorer. Stateless; the keyword work happens upstream in the
/// feature extractor.
pub struct HeuristicScorer;

impl HeuristicScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a document. Never fails.
    pub fn score(&self, _doc: &EmailDocument, features: &FeatureSet) -> ClassificationResult {
        let mut productive = 0.0;
        let mut unproductive = 0.0;
        let mut productive_signals: Vec<&'static str> = Vec::new();
        let mut unproductive_signals: Vec<&'static str> = Vec::new();

        for signal in &features.signals {
            match signal {
                SignalCategory::Request => {
                    productive += WEIGHT_REQUEST;
                    productive_signals.push(signal.label());
                }
                SignalCategory::ErrorReport => {
                    productive += WEIGHT_ERROR_REPORT;
                    productive_signals.push(signal.label());
                }
                SignalCategory::Gratitude => {
                    unproductive += WEIGHT_GRATITUDE;
                    unproductive_signals.push(signal.label());
                }
                SignalCategory::Pleasantry => {
                    unproductive += WEIGHT_PLEASANTRY;
                    unproductive_signals.push(signal.label());
                }
                SignalCategory::Marketing => {
                    unproductive += WEIGHT_MARKETING;
                    unproductive_signals.push(signal.label());
                }
                // Scored below as a structural bonus.
                SignalCategory::TicketReference => {}
            }
        }

        if features.ticket_reference.is_some() {
            productive += TICKET_BONUS;
            productive_signals.push(SignalCategory::TicketReference.label());
        }
        if features.question_count > 0 {
            productive += QUESTION_BONUS;
        }
        if features.word_count > 0 && features.word_count <= SHORT_BODY_WORDS {
            unproductive += SHORT_BODY_BONUS;
        }
        if features.has_emoji {
            unproductive += EMOJI_BONUS;
        }

        let total = productive + unproductive;
        if total == 0.0 {
            return ClassificationResult {
                label: Label::Unproductive,
                confidence: NO_SIGNAL_CONFIDENCE,
                reasoning: "no classification signal found".into(),
                model_used: MODEL_ID.into(),
            };
        }

        // Ties go to UNPRODUCTIVE.
        let (label, winning, signals) = if productive > unproductive {
            (Label::Productive, productive, productive_signals)
        } else {
            (Label::Unproductive, unproductive, unproductive_signals)
        };

        ClassificationResult {
            label,
            confidence: winning / total,
            reasoning: build_reasoning(label, &signals, productive, unproductive),
            model_used: MODEL_ID.into(),
        }
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Templated reasoning naming the signals that drove the decision.
fn build_reasoning(
    label: Label,
    signals: &[&'static str],
    productive: f64,
    unproductive: f64,
) -> String {
    let detected = if signals.is_empty() {
        "structural cues only".to_string()
    } else {
        format!("detected {} language", signals.join("/"))
    };

    match label {
        Label::Productive => format!(
            "{detected} (productive {productive:.2} vs unproductive {unproductive:.2})"
        ),
        Label::Unproductive => format!(
            "{detected} (unproductive {unproductive:.2} vs productive {productive:.2})"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features;
    use crate::normalize::{RawInput, normalize};

    fn score(text: &str) -> ClassificationResult {
        let doc = normalize(RawInput::Text {
            text: text.into(),
            subject: None,
        })
        .unwrap();
        let features = features::extract(&doc);
        HeuristicScorer::new().score(&doc, &features)
    }

    #[test]
    fn request_and_error_is_productive() {
        let result = score("Preciso de ajuda, o sistema apresenta um erro grave ao gerar o relatório mensal de vendas.");
        assert_eq!(result.label, Label::Productive);
        assert!(result.confidence > 0.5);
        assert!(result.reasoning.contains("request"));
    }

    #[test]
    fn gratitude_is_unproductive() {
        let result = score("Agradeço imensamente todo o suporte prestado pela equipe durante a última semana de trabalho.");
        assert_eq!(result.label, Label::Unproductive);
        assert!(result.reasoning.contains("gratitude"));
    }

    #[test]
    fn empty_body_is_no_signal() {
        let result = score("");
        assert_eq!(result.label, Label::Unproductive);
        assert_eq!(result.confidence, NO_SIGNAL_CONFIDENCE);
        assert_eq!(result.reasoning, "no classification signal found");
        assert_eq!(result.model_used, "heuristic");
    }

    #[test]
    fn signal_free_text_is_no_signal() {
        // Long enough to dodge the short-body bonus, no keywords, no
        // punctuation cues.
        let result = score(
            "relatório semanal contendo os números consolidados da operação \
             durante o período anterior conforme combinado previamente entre as áreas",
        );
        assert_eq!(result.label, Label::Unproductive);
        assert_eq!(result.confidence, NO_SIGNAL_CONFIDENCE);
    }

    #[test]
    fn confidence_grows_with_margin() {
        let weak = score("bom dia, preciso de um retorno sobre o contrato assinado no mês passado por favor");
        let strong = score("Agradecemos e parabéns pela conquista, muito obrigado!");
        assert!(strong.confidence > weak.confidence);
    }

    #[test]
    fn confidence_is_winning_share_of_total() {
        // gratitude 0.9 + short 0.3 + emoji 0.2 = 1.4, no productive side
        let result = score("Muito obrigado pela ajuda! Vocês são demais! 😊");
        assert_eq!(result.label, Label::Unproductive);
        assert!((result.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ticket_and_question_push_productive() {
        let result = score("Qual o andamento do chamado #55001? Continuo sem conseguir emitir as notas fiscais desde a última atualização do ambiente.");
        assert_eq!(result.label, Label::Productive);
        assert!(result.reasoning.contains("ticket-reference"));
    }
}
