use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

use crate::language::Language;

/// Closed set of failure categories for the text-generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    RateLimit,
    ApiKey,
    Quota,
    Model,
    Content,
    Unknown,
}

impl ErrorKind {
    /// Only transient failures are worth another attempt.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::RateLimit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::ApiKey => "api_key",
            ErrorKind::Quota => "quota",
            ErrorKind::Model => "model",
            ErrorKind::Content => "content",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// Classification of one failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub retryable: bool,
    pub user_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, language: Language, retry_after_seconds: Option<u64>) -> Self {
        Self {
            kind,
            retryable: kind.is_retryable(),
            user_message: error_message(kind, language).to_string(),
            retry_after_seconds,
        }
    }

    /// The companion sentence for this error, possibly empty.
    pub fn additional_message(&self, language: Language) -> String {
        additional_error_message(self.kind, language, self.retry_after_seconds)
    }
}

static RETRY_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:retry after|wait)\s*:?\s*(\d+)").expect("retry-after pattern compiles")
});

/// Server-suggested wait in seconds, from text like "retry after 30" or "wait 60".
pub fn extract_retry_after(message: &str) -> Option<u64> {
    RETRY_AFTER
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

const RULES: &[(ErrorKind, &[&str])] = &[
    (ErrorKind::RateLimit, &["rate limit", "429"]),
    (ErrorKind::ApiKey, &["unauthorized", "401", "api key"]),
    (ErrorKind::Quota, &["quota", "billing", "insufficient"]),
    (ErrorKind::Model, &["model", "engine"]),
    (ErrorKind::Content, &["content policy", "safety", "filtered"]),
    (
        ErrorKind::Network,
        &["network", "connection", "timeout", "502", "503", "504"],
    ),
];

/// Map a failure message to its [`ErrorInfo`]. The first matching rule wins.
pub fn categorize_error(message: &str, language: Language) -> ErrorInfo {
    let lowered = message.to_lowercase();
    let kind = RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ErrorKind::Unknown);

    let retry_after = match kind {
        ErrorKind::RateLimit => extract_retry_after(message),
        _ => None,
    };

    warn!(
        error_kind = kind.as_str(),
        retry_after_seconds = ?retry_after,
        error = %message,
        "Suggestion request failed"
    );
    ErrorInfo::new(kind, language, retry_after)
}

pub fn error_message(kind: ErrorKind, language: Language) -> &'static str {
    match language {
        Language::En => match kind {
            ErrorKind::Network => {
                "Unable to reach the AI service. Please check your connection and try again."
            }
            ErrorKind::RateLimit => "Too many requests to the AI service. Please try again shortly.",
            ErrorKind::ApiKey => "The AI service is not configured correctly. Please contact support.",
            ErrorKind::Quota => "The AI service usage limit has been reached. Please try again later.",
            ErrorKind::Model => "The AI model is currently unavailable. Please try again later.",
            ErrorKind::Content => {
                "The request was blocked by the content filter. Please rephrase your input."
            }
            ErrorKind::Unknown => {
                "Something went wrong while generating the suggestion. Please try again."
            }
        },
        Language::Ar => match kind {
            ErrorKind::Network => {
                "تعذر الوصول إلى خدمة الذكاء الاصطناعي. يرجى التحقق من اتصالك والمحاولة مرة أخرى."
            }
            ErrorKind::RateLimit => {
                "طلبات كثيرة جدًا لخدمة الذكاء الاصطناعي. يرجى المحاولة مرة أخرى بعد قليل."
            }
            ErrorKind::ApiKey => "خدمة الذكاء الاصطناعي غير مهيأة بشكل صحيح. يرجى التواصل مع الدعم.",
            ErrorKind::Quota => {
                "تم الوصول إلى حد استخدام خدمة الذكاء الاصطناعي. يرجى المحاولة لاحقًا."
            }
            ErrorKind::Model => "نموذج الذكاء الاصطناعي غير متاح حاليًا. يرجى المحاولة لاحقًا.",
            ErrorKind::Content => "تم حظر الطلب بواسطة مرشح المحتوى. يرجى إعادة صياغة النص.",
            ErrorKind::Unknown => "حدث خطأ أثناء إنشاء الاقتراح. يرجى المحاولة مرة أخرى.",
        },
    }
}

pub fn additional_error_message(
    kind: ErrorKind,
    language: Language,
    retry_after_seconds: Option<u64>,
) -> String {
    match (language, kind) {
        (Language::En, ErrorKind::RateLimit) => match retry_after_seconds {
            Some(seconds) => format!("Please wait {seconds} seconds before trying again."),
            None => "Please wait a moment before trying again.".to_string(),
        },
        (Language::Ar, ErrorKind::RateLimit) => match retry_after_seconds {
            Some(seconds) => format!("يرجى الانتظار {seconds} ثانية قبل المحاولة مرة أخرى."),
            None => "يرجى الانتظار لحظة قبل المحاولة مرة أخرى.".to_string(),
        },
        (Language::En, ErrorKind::Network) => {
            "Check that you are connected to the internet.".to_string()
        }
        (Language::Ar, ErrorKind::Network) => "تأكد من اتصالك بالإنترنت.".to_string(),
        (Language::En, ErrorKind::ApiKey | ErrorKind::Quota) => {
            "This issue has been logged for our technical team.".to_string()
        }
        (Language::Ar, ErrorKind::ApiKey | ErrorKind::Quota) => {
            "تم تسجيل هذه المشكلة لفريقنا التقني.".to_string()
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_wins_over_network() {
        let info = categorize_error("Rate limit hit after network hiccup", Language::En);
        assert_eq!(info.kind, ErrorKind::RateLimit);
        assert!(info.retryable);
    }

    #[test]
    fn priority_order() {
        let cases = [
            ("HTTP 429 Too Many Requests", ErrorKind::RateLimit),
            ("401 Unauthorized: invalid API key", ErrorKind::ApiKey),
            ("Insufficient quota for model gpt", ErrorKind::Quota),
            ("The model `gpt-x` does not exist", ErrorKind::Model),
            ("Output filtered by SAFETY system", ErrorKind::Content),
            ("connection reset by peer", ErrorKind::Network),
            ("upstream returned 503", ErrorKind::Network),
            ("request timeout", ErrorKind::Network),
            ("something odd", ErrorKind::Unknown),
        ];
        for (message, expected) in cases {
            assert_eq!(categorize_error(message, Language::En).kind, expected, "{message}");
        }
    }

    #[test]
    fn only_network_and_rate_limit_retry() {
        for kind in [
            ErrorKind::ApiKey,
            ErrorKind::Quota,
            ErrorKind::Model,
            ErrorKind::Content,
            ErrorKind::Unknown,
        ] {
            assert!(!ErrorInfo::new(kind, Language::En, None).retryable);
        }
        assert!(ErrorInfo::new(ErrorKind::Network, Language::En, None).retryable);
    }

    #[test]
    fn retry_after_parsing() {
        assert_eq!(
            extract_retry_after("Rate limit exceeded. Retry after 30 seconds"),
            Some(30)
        );
        assert_eq!(extract_retry_after("please WAIT 60s"), Some(60));
        assert_eq!(extract_retry_after("no info here"), None);

        let info = categorize_error("rate limit reached, retry after 12", Language::En);
        assert_eq!(info.retry_after_seconds, Some(12));
    }

    #[test]
    fn messages_are_localised() {
        let en = categorize_error("quota", Language::En);
        let ar = categorize_error("quota", Language::Ar);
        assert_ne!(en.user_message, ar.user_message);
        assert_eq!(ar.user_message, error_message(ErrorKind::Quota, Language::Ar));
    }

    #[test]
    fn additional_messages() {
        assert_eq!(
            additional_error_message(ErrorKind::RateLimit, Language::En, Some(30)),
            "Please wait 30 seconds before trying again."
        );
        assert!(
            additional_error_message(ErrorKind::RateLimit, Language::En, None).contains("a moment")
        );
        assert!(!additional_error_message(ErrorKind::Network, Language::Ar, None).is_empty());
        assert!(!additional_error_message(ErrorKind::Quota, Language::En, None).is_empty());
        assert!(additional_error_message(ErrorKind::Model, Language::En, None).is_empty());
        assert!(additional_error_message(ErrorKind::Unknown, Language::Ar, None).is_empty());
    }
}
