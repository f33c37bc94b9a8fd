use super::classifier::ErrorInfo;
use super::service::SuggestionResult;
use crate::i18n::Translator;
use crate::models::FieldKind;

/// What the user is shown once a suggestion request for one field finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionReview {
    Ready {
        field_kind: FieldKind,
        text: String,
    },
    Failed {
        field_kind: FieldKind,
        error: ErrorInfo,
        additional: String,
    },
}

impl SuggestionReview {
    pub fn from_result(field_kind: FieldKind, result: SuggestionResult, translator: &Translator) -> Self {
        match result.error_info {
            Some(error) if !result.succeeded => Self::Failed {
                field_kind,
                additional: error.additional_message(translator.language()),
                error,
            },
            _ => Self::Ready {
                field_kind,
                text: result.text,
            },
        }
    }

    pub fn field_kind(&self) -> FieldKind {
        match self {
            Self::Ready { field_kind, .. } | Self::Failed { field_kind, .. } => *field_kind,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Text to write into the field, if there is any to accept.
    pub fn accept(self) -> Option<String> {
        match self {
            Self::Ready { text, .. } => Some(text),
            Self::Failed { .. } => None,
        }
    }

    /// Replace the suggested text before accepting it.
    pub fn edit(self, text: impl Into<String>) -> Option<String> {
        match self {
            Self::Ready { .. } => Some(text.into()),
            Self::Failed { .. } => None,
        }
    }

    pub fn discard(self) {}

    /// Localised block for the terminal.
    pub fn render(&self, translator: &Translator) -> String {
        match self {
            Self::Ready { text, .. } => {
                format!(
                    "{}\n{}\n{}",
                    translator.t("suggest.review", &[]),
                    text,
                    translator.t("suggest.actions", &[])
                )
            }
            Self::Failed {
                error, additional, ..
            } => {
                let mut out = format!("{}: {}", translator.t("suggest.failed", &[]), error.user_message);
                if !additional.is_empty() {
                    out.push(' ');
                    out.push_str(additional);
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::suggest::classifier::ErrorKind;

    #[test]
    fn ready_review_accepts_and_edits() {
        let translator = Translator::new(Language::En);
        let review = SuggestionReview::from_result(
            FieldKind::ReasonForApplying,
            SuggestionResult::success("Drafted"),
            &translator,
        );
        assert!(review.is_ready());
        assert!(review.render(&translator).contains("Drafted"));
        assert_eq!(review.clone().accept().as_deref(), Some("Drafted"));
        assert_eq!(review.edit("Mine").as_deref(), Some("Mine"));
    }

    #[test]
    fn failed_review_carries_both_sentences() {
        let translator = Translator::new(Language::En);
        let review = SuggestionReview::from_result(
            FieldKind::CurrentFinancialSituation,
            SuggestionResult::failure(ErrorInfo::new(ErrorKind::RateLimit, Language::En, Some(30))),
            &translator,
        );
        let rendered = review.render(&translator);
        assert!(rendered.contains("Too many requests"));
        assert!(rendered.ends_with("Please wait 30 seconds before trying again."));
        assert_eq!(review.field_kind(), FieldKind::CurrentFinancialSituation);
        assert_eq!(review.accept(), None);
    }

    #[test]
    fn failure_without_addendum_has_no_trailing_space() {
        let translator = Translator::new(Language::En);
        let review = SuggestionReview::from_result(
            FieldKind::CurrentFinancialSituation,
            SuggestionResult::failure(ErrorInfo::new(ErrorKind::Model, Language::En, None)),
            &translator,
        );
        assert!(!review.render(&translator).ends_with(' '));
    }
}
