//! Shared HTTP client, error types, and the remote configuration applier.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use peerdesk_config::{ConfigError, DesktopConfig};
use peerdesk_session::{ApplyError, ApplyFailure, ConfigApplier, SessionError};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

pub(crate) const HEADER_API_KEY: &str = "x-peerdesk-api-key";
pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const CONFIG_PATH: &str = "/v1/config";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Config(err) => err.into(),
            other => Self::Failure(other.into()),
        }
    }
}

impl From<&ApplyFailure> for CliError {
    fn from(failure: &ApplyFailure) -> Self {
        let message = failure.to_string();
        if is_rejection(failure.details.status) {
            Self::Validation(message)
        } else {
            Self::Failure(anyhow!(message))
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) api_key: Option<String>,
}

impl AppContext {
    /// Build the shared HTTP client tagged with the invocation's request id.
    pub(crate) fn new(
        base_url: Url,
        api_key: Option<String>,
        timeout_secs: u64,
        trace_id: &str,
    ) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

/// `ConfigApplier` that talks to the service's HTTP API.
#[derive(Clone)]
pub(crate) struct HttpConfigApplier {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpConfigApplier {
    pub(crate) fn new(ctx: &AppContext) -> Self {
        Self {
            client: ctx.client.clone(),
            base_url: ctx.base_url.clone(),
            api_key: ctx.api_key.clone(),
        }
    }

    /// Fetch the configuration the service is currently running with.
    #[instrument(name = "http.config.fetch", skip(self))]
    pub(crate) async fn fetch(&self) -> CliResult<DesktopConfig> {
        let url = self.config_url().map_err(CliError::failure)?;
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("request to {CONFIG_PATH} failed: {err}")))?;

        if response.status().is_success() {
            response.json::<DesktopConfig>().await.map_err(|err| {
                CliError::failure(anyhow!("failed to parse configuration: {err}"))
            })
        } else {
            Err(classify_problem(problem_details("GET", response).await))
        }
    }

    fn config_url(&self) -> Result<Url, ApplyError> {
        self.base_url
            .join(CONFIG_PATH)
            .map_err(|err| ApplyError::new(format!("invalid base URL: {err}")))
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.api_key {
            request = request.header(HEADER_API_KEY, key);
        }
        request
    }
}

#[async_trait]
impl ConfigApplier for HttpConfigApplier {
    #[instrument(name = "http.config.apply", skip_all)]
    async fn apply(&self, config: &DesktopConfig) -> Result<(), ApplyError> {
        let url = self.config_url()?;
        let response = self
            .authorize(self.client.put(url))
            .json(config)
            .send()
            .await
            .map_err(|err| {
                ApplyError::new(format!("request to {CONFIG_PATH} failed: {err}"))
                    .with_request("PUT", CONFIG_PATH)
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "configuration apply answered");
        if status.is_success() {
            Ok(())
        } else {
            Err(problem_details("PUT", response).await)
        }
    }
}

#[derive(Deserialize)]
struct ProblemBody {
    text: Option<String>,
    detail: Option<String>,
    title: Option<String>,
}

/// Translate an unsuccessful response into the service's error details.
///
/// The message prefers the JSON body's `text`, then `detail`, then `title`,
/// falling back to the trimmed body text.
pub(crate) async fn problem_details(method: &str, response: Response) -> ApplyError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();
    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();

    let problem = serde_json::from_slice::<ProblemBody>(&bytes).ok();
    let message = problem
        .and_then(|body| body.text.or(body.detail).or(body.title))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or(body_text);
    let message = if message.is_empty() {
        format!("request failed with status {status}")
    } else {
        message
    };

    ApplyError::new(message)
        .with_status(status.as_u16(), status.canonical_reason().unwrap_or_default())
        .with_request(method, CONFIG_PATH)
}

/// Classify service error details into a CLI error.
pub(crate) fn classify_problem(details: ApplyError) -> CliError {
    match (is_rejection(details.status), details.status) {
        (true, _) => CliError::validation(details.text),
        (false, Some(status)) => CliError::failure(anyhow!("{} (status {status})", details.text)),
        (false, None) => CliError::failure(details),
    }
}

/// Statuses meaning the service understood the request and refused its content.
fn is_rejection(status: Option<u16>) -> bool {
    matches!(
        status.map(StatusCode::from_u16),
        Some(Ok(
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
        ))
    )
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use peerdesk_session::APPLY_FAILURE_TEXT;
    use peerdesk_test_support::fixtures::sample_config;
    use serde_json::json;

    fn context_for(server: &MockServer, api_key: Option<&str>) -> Result<AppContext> {
        AppContext::new(
            parse_url(&server.base_url()).map_err(|err| anyhow!(err))?,
            api_key.map(str::to_string),
            5,
            "trace-1",
        )
        .map_err(|err| anyhow!(err.display_message()))
    }

    #[tokio::test]
    async fn apply_puts_whole_snapshot_with_headers() -> Result<()> {
        let server = MockServer::start_async().await;
        let config = sample_config();
        let body = serde_json::to_value(&config)?;
        let mock = server.mock(move |when, then| {
            when.method(PUT)
                .path(CONFIG_PATH)
                .header(HEADER_API_KEY, "secret")
                .header(HEADER_REQUEST_ID, "trace-1")
                .json_body(body);
            then.status(200);
        });

        let applier = HttpConfigApplier::new(&context_for(&server, Some("secret"))?);
        assert_eq!(applier.apply(&config).await, Ok(()));
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn apply_maps_problem_json_into_details() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PUT).path(CONFIG_PATH);
            then.status(400)
                .header("content-type", "application/json")
                .json_body(json!({"title": "invalid config", "detail": "max_port below min_port"}));
        });

        let applier = HttpConfigApplier::new(&context_for(&server, None)?);
        let err = applier
            .apply(&sample_config())
            .await
            .err()
            .ok_or_else(|| anyhow!("expected apply failure"))?;
        assert_eq!(err.text, "max_port below min_port");
        assert_eq!(err.status, Some(400));
        assert_eq!(err.status_text.as_deref(), Some("Bad Request"));
        assert_eq!(err.method.as_deref(), Some("PUT"));
        assert_eq!(err.path.as_deref(), Some(CONFIG_PATH));
        Ok(())
    }

    #[tokio::test]
    async fn apply_falls_back_to_trimmed_body_text() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PUT).path(CONFIG_PATH);
            then.status(500).body("  engine restart failed\n");
        });

        let applier = HttpConfigApplier::new(&context_for(&server, None)?);
        let err = applier
            .apply(&sample_config())
            .await
            .err()
            .ok_or_else(|| anyhow!("expected apply failure"))?;
        assert_eq!(err.text, "engine restart failed");
        assert_eq!(err.status, Some(500));
        Ok(())
    }

    #[tokio::test]
    async fn fetch_parses_configuration() -> Result<()> {
        let server = MockServer::start_async().await;
        let config = sample_config();
        let body = serde_json::to_value(&config)?;
        let mock = server.mock(move |when, then| {
            when.method(GET).path(CONFIG_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(body);
        });

        let applier = HttpConfigApplier::new(&context_for(&server, None)?);
        let fetched = applier
            .fetch()
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(fetched, config);
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn fetch_failure_is_operational() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path(CONFIG_PATH);
            then.status(503).body("");
        });

        let applier = HttpConfigApplier::new(&context_for(&server, None)?);
        let err = applier
            .fetch()
            .await
            .err()
            .ok_or_else(|| anyhow!("expected fetch failure"))?;
        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("status 503"));
        Ok(())
    }

    #[test]
    fn apply_failures_split_by_status() {
        let rejected = ApplyFailure {
            text: APPLY_FAILURE_TEXT,
            details: ApplyError::new("bad port").with_status(422, "Unprocessable Entity"),
        };
        let err = CliError::from(&rejected);
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "Error saving configuration: bad port");

        let unreachable = ApplyFailure {
            text: APPLY_FAILURE_TEXT,
            details: ApplyError::new("connection refused"),
        };
        assert_eq!(CliError::from(&unreachable).exit_code(), 3);
    }

    #[test]
    fn structural_errors_are_validation() {
        let err = CliError::from(SessionError::Config(ConfigError::InvalidPath {
            path: "a.b.c".to_string(),
        }));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "malformed field path 'a.b.c'");
        assert_eq!(CliError::from(SessionError::Committed).exit_code(), 3);
    }

    #[test]
    fn empty_api_key_is_ignored() -> Result<()> {
        let ctx = AppContext::new(
            parse_url("http://127.0.0.1:3030").map_err(|err| anyhow!(err))?,
            Some("   ".to_string()),
            5,
            "trace",
        )
        .map_err(|err| anyhow!(err.display_message()))?;
        assert!(ctx.api_key.is_none());
        assert!(parse_url("not a url").is_err());
        Ok(())
    }
}
