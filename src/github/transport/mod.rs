//! Execution of one GraphQL request against GitHub.
//!
//! [`GraphQlTransport`] is the seam the paginator and the result assembler
//! depend on. [`HttpTransport`] implements it over `reqwest`, retrying
//! transient failures with [`BackoffPolicy`] and suspending for rate limits.
//! The two retry budgets are counted separately. The transport keeps no
//! per-call state, so one value can serve concurrent callers.

mod response;
pub mod retry;

use std::time::Duration;

use async_trait::async_trait;
use http::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use super::catalog::QueryDefinition;
use super::clock::{Clock, TokioClock};
use super::error::FetchError;
use super::locator::{GraphQlEndpoint, PersonalAccessToken};
use super::variables::Variables;

use response::{Outcome, classify};
pub use retry::BackoffPolicy;

/// Media type that exposes `mergeStateStatus` on older GitHub Enterprise
/// servers.
const MERGE_INFO_PREVIEW: &str = "application/vnd.github.merge-info-preview+json";

/// Executes GraphQL documents and returns the response's `data` tree.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    /// Runs `definition` with `variables`.
    ///
    /// Implementations validate `variables` before any network access.
    async fn execute(
        &self,
        definition: &QueryDefinition,
        variables: &Variables,
    ) -> Result<Value, FetchError>;
}

/// Settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    endpoint: GraphQlEndpoint,
    token: PersonalAccessToken,
    request_timeout: Duration,
    max_transport_retries: u32,
    backoff: BackoffPolicy,
    max_rate_limit_retries: u32,
    default_rate_limit_wait: Duration,
    user_agent: String,
}

impl TransportConfig {
    /// Default per-attempt deadline.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    /// Default number of retries after transient failures.
    pub const DEFAULT_MAX_TRANSPORT_RETRIES: u32 = 3;
    /// Default number of waits after rate-limited responses.
    pub const DEFAULT_MAX_RATE_LIMIT_RETRIES: u32 = 3;
    /// Wait used when a rate-limited response carries no reset hint.
    pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

    /// Configuration with default retry and timeout settings.
    #[must_use]
    pub fn new(endpoint: GraphQlEndpoint, token: PersonalAccessToken) -> Self {
        Self {
            endpoint,
            token,
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
            max_transport_retries: Self::DEFAULT_MAX_TRANSPORT_RETRIES,
            backoff: BackoffPolicy::DEFAULT,
            max_rate_limit_retries: Self::DEFAULT_MAX_RATE_LIMIT_RETRIES,
            default_rate_limit_wait: Self::DEFAULT_RATE_LIMIT_WAIT,
            user_agent: concat!("prfetch/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }

    /// Sets the per-attempt deadline.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets how many times a transient failure is retried.
    #[must_use]
    pub const fn with_max_transport_retries(mut self, retries: u32) -> Self {
        self.max_transport_retries = retries;
        self
    }

    /// Sets the backoff schedule for transient failures.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sets how many rate-limit waits are allowed per request.
    #[must_use]
    pub const fn with_max_rate_limit_retries(mut self, retries: u32) -> Self {
        self.max_rate_limit_retries = retries;
        self
    }

    /// Sets the wait used when GitHub gives no reset hint.
    #[must_use]
    pub const fn with_default_rate_limit_wait(mut self, wait: Duration) -> Self {
        self.default_rate_limit_wait = wait;
        self
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// GraphQL endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &GraphQlEndpoint {
        &self.endpoint
    }

    /// Per-attempt deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Transient-failure retry ceiling.
    #[must_use]
    pub const fn max_transport_retries(&self) -> u32 {
        self.max_transport_retries
    }

    /// Backoff schedule.
    #[must_use]
    pub const fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Rate-limit retry ceiling.
    #[must_use]
    pub const fn max_rate_limit_retries(&self) -> u32 {
        self.max_rate_limit_retries
    }

    /// Fallback rate-limit wait.
    #[must_use]
    pub const fn default_rate_limit_wait(&self) -> Duration {
        self.default_rate_limit_wait
    }
}

/// `reqwest`-backed transport with bounded retries.
pub struct HttpTransport<C = TokioClock> {
    client: reqwest::Client,
    config: TransportConfig,
    clock: C,
}

impl HttpTransport<TokioClock> {
    /// Builds a transport that sleeps on the Tokio timer.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: TransportConfig) -> Result<Self, FetchError> {
        Self::with_clock(config, TokioClock)
    }
}

impl<C: Clock> HttpTransport<C> {
    /// Builds a transport with a custom clock.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Configuration`] when the HTTP client cannot be
    /// constructed.
    pub fn with_clock(config: TransportConfig, clock: C) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MERGE_INFO_PREVIEW));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|error| FetchError::Configuration {
                message: format!("build HTTP client failed: {error}"),
            })?;

        Ok(Self {
            client,
            config,
            clock,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    async fn attempt(&self, body: &Value) -> Outcome {
        let sent = self
            .client
            .post(self.config.endpoint.url().clone())
            .bearer_auth(self.config.token.value())
            .timeout(self.config.request_timeout)
            .json(body)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(error) => return Outcome::Transient(describe_reqwest_error(&error)),
        };

        let status = response.status();
        let headers = response.headers().clone();
        match response.text().await {
            Ok(text) => classify(status, &headers, &text),
            Err(error) => Outcome::Transient(describe_reqwest_error(&error)),
        }
    }
}

#[async_trait]
impl<C: Clock> GraphQlTransport for HttpTransport<C> {
    async fn execute(
        &self,
        definition: &QueryDefinition,
        variables: &Variables,
    ) -> Result<Value, FetchError> {
        variables.validate(definition)?;

        let operation = definition.id().operation_name();
        let body = json!({
            "query": definition.document(),
            "operationName": operation,
            "variables": variables.to_json(),
        });

        let mut attempts: u32 = 0;
        let mut transport_retries: u32 = 0;
        let mut rate_limit_retries: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            tracing::debug!(query = operation, attempt = attempts, "sending GraphQL request");

            match self.attempt(&body).await {
                Outcome::Data(data) => return Ok(data),
                Outcome::Failed(error) => return Err(error),
                Outcome::Transient(message) => {
                    if transport_retries >= self.config.max_transport_retries {
                        return Err(FetchError::TransportExhausted { attempts, message });
                    }
                    let delay = self.config.backoff.delay(transport_retries);
                    transport_retries = transport_retries.saturating_add(1);
                    tracing::warn!(
                        query = operation,
                        retry = transport_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "transient GitHub failure, backing off: {message}"
                    );
                    self.clock.sleep(delay).await;
                }
                Outcome::RateLimited { wait, message } => {
                    if rate_limit_retries >= self.config.max_rate_limit_retries {
                        return Err(FetchError::RateLimitExceeded {
                            rate_limit: wait.info(),
                            message,
                        });
                    }
                    let delay = wait.duration(
                        self.clock.now_unix_seconds(),
                        self.config.default_rate_limit_wait,
                    );
                    rate_limit_retries = rate_limit_retries.saturating_add(1);
                    tracing::warn!(
                        query = operation,
                        retry = rate_limit_retries,
                        wait_secs = delay.as_secs(),
                        "GitHub rate limit hit, suspending: {message}"
                    );
                    self.clock.sleep(delay).await;
                }
            }
        }
    }
}

fn describe_reqwest_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    }
}
