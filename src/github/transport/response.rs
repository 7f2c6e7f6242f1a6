//! Classification of a single GitHub GraphQL HTTP response.

use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::github::error::FetchError;
use crate::github::rate_limit::RateLimitWait;

/// What the transport should do with one attempt's outcome.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Outcome {
    /// The `data` member of a successful response.
    Data(Value),
    /// A transient failure worth retrying after backoff.
    Transient(String),
    /// A primary or secondary rate limit; retry after waiting.
    RateLimited {
        /// Header hints for the wait.
        wait: RateLimitWait,
        /// Message reported by GitHub.
        message: String,
    },
    /// A permanent failure.
    Failed(FetchError),
}

#[derive(Debug, Default, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<ApiGraphQlError>>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    documentation_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiGraphQlError {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl ApiGraphQlError {
    fn is_rate_limit(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("RATE_LIMITED"))
            || mentions_rate_limit(&self.message)
    }
}

fn mentions_rate_limit(text: &str) -> bool {
    text.to_lowercase().contains("rate limit")
}

/// Classifies a response from its status, headers, and body text.
pub(crate) fn classify(status: StatusCode, headers: &HeaderMap, body: &str) -> Outcome {
    if status.is_server_error() {
        return Outcome::Transient(format!("GitHub returned {status}"));
    }

    let parsed = serde_json::from_str::<ApiEnvelope>(body);
    let wait = RateLimitWait::from_headers(headers);

    if !status.is_success() {
        let envelope = parsed.unwrap_or_default();
        return classify_http_failure(status, wait, &envelope);
    }

    let envelope = match parsed {
        Ok(envelope) => envelope,
        Err(error) => {
            return Outcome::Failed(FetchError::decode(format!(
                "response body is not GraphQL JSON: {error}"
            )));
        }
    };

    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        if let Some(limited) = errors.iter().find(|error| error.is_rate_limit()) {
            return Outcome::RateLimited {
                wait,
                message: limited.message.clone(),
            };
        }
        return Outcome::Failed(FetchError::GraphQl {
            messages: errors.into_iter().map(|error| error.message).collect(),
        });
    }

    match envelope.data {
        Some(data) if !data.is_null() => Outcome::Data(data),
        _ => Outcome::Failed(FetchError::decode(
            "response carried neither data nor errors",
        )),
    }
}

fn classify_http_failure(status: StatusCode, wait: RateLimitWait, envelope: &ApiEnvelope) -> Outcome {
    let message = envelope
        .message
        .clone()
        .unwrap_or_else(|| "unknown error".to_owned());

    let documented_as_rate_limit = envelope
        .documentation_url
        .as_deref()
        .is_some_and(|url| url.contains("rate-limit"));
    let is_rate_limit = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN
            && (mentions_rate_limit(&message) || documented_as_rate_limit || wait.signals_limit()));

    if is_rate_limit {
        return Outcome::RateLimited { wait, message };
    }

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Outcome::Failed(FetchError::Authentication {
            message: format!("GitHub returned {status} {message}"),
        });
    }

    if status == StatusCode::REQUEST_TIMEOUT {
        return Outcome::Transient(format!("GitHub returned {status}"));
    }

    Outcome::Failed(FetchError::Api {
        message: format!("GitHub returned {status}: {message}"),
    })
}
