//! Client configuration and the request executor.
//!
//! One logical call runs: validate → encode → timed attempt → classify →
//! retry loop → decode → envelope. Attempts within a call are strictly
//! sequential; independent calls share nothing but the read-only config.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::decode::{decode_body, ContentKind, DecodedBody};
use crate::envelope::{CallMeta, Envelope};
use crate::error::ClientError;
use crate::http::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::models::{
    AssetMode, HealthReport, MaScoresReport, ResponseFormat, TickerGroups, TopPerformersReport,
    VolumeProfileReport,
};
use crate::query::{MaScoresQuery, QuerySpec, TickersQuery, TopPerformersQuery, VolumeProfileQuery};
use crate::records::{map_table, TickerSeries};
use crate::retry::{RetryDecision, RetryPolicy, RetryState};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Client configuration, fixed at construction and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base address of the service. A trailing slash is tolerated.
    pub base_url: String,
    /// Timeout applied to each individual network attempt.
    pub timeout: Duration,
    /// Retry classification and backoff schedule.
    pub retry: RetryPolicy,
    /// Log the request line and each retry via `tracing`.
    pub debug: bool,
    /// Populate [`CallMeta`] in returned envelopes.
    pub include_metadata: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            debug: false,
            include_metadata: false,
        }
    }
}

impl ClientConfig {
    /// Read the base address from `TICKPULSE_API_URL`, once, here. The
    /// environment is never consulted again after construction.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("TICKPULSE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        Self {
            base_url,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_metadata(mut self, include_metadata: bool) -> Self {
        self.include_metadata = include_metadata;
        self
    }
}

/// Typed client for the TickPulse analytics API.
#[derive(Clone)]
pub struct TickPulseClient {
    config: ClientConfig,
    transport: Arc<dyn HttpClient>,
}

/// Internal result of one successful logical call.
struct Fetched {
    body: DecodedBody,
    headers: BTreeMap<String, String>,
    meta: CallMeta,
}

impl TickPulseClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            transport: Arc::new(ReqwestHttpClient::new()),
        }
    }

    /// Build a client over an injected transport. Tests use this to script
    /// responses without a network.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpClient>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `/tickers`: per-symbol time series.
    ///
    /// Unless the query explicitly asks for JSON, the client requests the
    /// CSV representation and maps the rows itself; both paths produce the
    /// same [`TickerSeries`] shape.
    pub async fn tickers(
        &self,
        query: &TickersQuery,
    ) -> Result<Envelope<TickerSeries>, ClientError> {
        query.validate()?;

        let format = query.format.unwrap_or(ResponseFormat::Csv);
        let mut spec = query.to_spec();
        spec.push("format", format.as_str());

        match format {
            ResponseFormat::Json => self.fetch_json("/tickers", &spec).await,
            ResponseFormat::Csv => {
                let fetched = self.execute("/tickers", &spec, ContentKind::Csv).await?;
                let status = fetched.meta.status;
                let DecodedBody::Table(table) = fetched.body else {
                    return Err(unexpected_representation(status));
                };
                Ok(self.seal(map_table(&table), fetched.headers, fetched.meta))
            }
        }
    }

    /// GET `/tickers` with `format=csv`, returning the raw CSV text.
    pub async fn tickers_csv(&self, query: &TickersQuery) -> Result<Envelope<String>, ClientError> {
        query.validate()?;

        let mut spec = query.to_spec();
        spec.push("format", ResponseFormat::Csv.as_str());

        let fetched = self.execute("/tickers", &spec, ContentKind::Text).await?;
        let status = fetched.meta.status;
        let DecodedBody::Text(text) = fetched.body else {
            return Err(unexpected_representation(status));
        };
        Ok(self.seal(text, fetched.headers, fetched.meta))
    }

    /// GET `/health`: service health and worker statistics.
    pub async fn health(&self) -> Result<Envelope<HealthReport>, ClientError> {
        self.fetch_json("/health", &QuerySpec::new()).await
    }

    /// GET `/tickers/group`: symbol-to-group membership for an asset mode.
    pub async fn ticker_groups(
        &self,
        mode: AssetMode,
    ) -> Result<Envelope<TickerGroups>, ClientError> {
        let mut spec = QuerySpec::new();
        if mode != AssetMode::default() {
            spec.push("mode", mode.as_str());
        }
        self.fetch_json("/tickers/group", &spec).await
    }

    /// GET `/analysis/top-performers`: ranked top/bottom performers.
    pub async fn top_performers(
        &self,
        query: &TopPerformersQuery,
    ) -> Result<Envelope<TopPerformersReport>, ClientError> {
        query.validate()?;
        self.fetch_json("/analysis/top-performers", &query.to_spec())
            .await
    }

    /// GET `/analysis/ma-scores-by-sector`: moving-average scores grouped
    /// by sector.
    pub async fn ma_scores_by_sector(
        &self,
        query: &MaScoresQuery,
    ) -> Result<Envelope<MaScoresReport>, ClientError> {
        query.validate()?;
        self.fetch_json("/analysis/ma-scores-by-sector", &query.to_spec())
            .await
    }

    /// GET `/analysis/volume-profile`: volume distribution by price for
    /// one session.
    pub async fn volume_profile(
        &self,
        query: &VolumeProfileQuery,
    ) -> Result<Envelope<VolumeProfileReport>, ClientError> {
        query.validate()?;
        self.fetch_json("/analysis/volume-profile", &query.to_spec())
            .await
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        spec: &QuerySpec,
    ) -> Result<Envelope<T>, ClientError> {
        let fetched = self.execute(path, spec, ContentKind::Json).await?;
        let status = fetched.meta.status;
        let DecodedBody::Tree(tree) = fetched.body else {
            return Err(unexpected_representation(status));
        };
        let data = serde_json::from_value(tree)
            .map_err(|e| ClientError::api(status, format!("malformed response payload: {e}")))?;
        Ok(self.seal(data, fetched.headers, fetched.meta))
    }

    /// Drive one logical call end to end.
    async fn execute(
        &self,
        path: &str,
        spec: &QuerySpec,
        kind: ContentKind,
    ) -> Result<Fetched, ClientError> {
        let url = format!(
            "{}{}{}",
            self.config.base_url.trim_end_matches('/'),
            path,
            spec.encode()
        );

        if self.config.debug {
            debug!(url = %url, "GET");
        }

        let started = Instant::now();
        let mut state = RetryState::new();

        loop {
            match self.attempt(&url).await {
                Ok(response) => {
                    let HttpResponse {
                        status,
                        headers,
                        body,
                    } = response;
                    let (decoded, size) = decode_body(kind, status, body)?;
                    let meta = CallMeta {
                        url,
                        status,
                        duration: started.elapsed(),
                        retries: state.attempt(),
                        response_size: size,
                    };
                    return Ok(Fetched {
                        body: decoded,
                        headers,
                        meta,
                    });
                }
                Err(error) => match self.config.retry.decide(&error, &state) {
                    RetryDecision::GiveUp => return Err(error),
                    RetryDecision::Retry { delay } => {
                        if self.config.debug {
                            debug!(
                                attempt = state.attempt() + 1,
                                delay_ms = delay.as_millis() as u64,
                                error = %error,
                                "retrying"
                            );
                        }
                        tokio::time::sleep(delay).await;
                        state.record(delay);
                    }
                },
            }
        }
    }

    /// One timed network attempt. The timeout cancels only this attempt's
    /// transport future and surfaces as a `Network` error, which re-enters
    /// the same classification as any other transient failure.
    async fn attempt(&self, url: &str) -> Result<HttpResponse, ClientError> {
        let request = HttpRequest::get(url);

        let response =
            match tokio::time::timeout(self.config.timeout, self.transport.execute(request)).await {
                Ok(Ok(response)) => response,
                Ok(Err(transport)) => return Err(ClientError::network(transport.message())),
                Err(_) => return Err(ClientError::timeout(self.config.timeout)),
            };

        if response.is_success() {
            Ok(response)
        } else {
            Err(classify_status(&response))
        }
    }

    fn seal<T>(&self, data: T, headers: BTreeMap<String, String>, meta: CallMeta) -> Envelope<T> {
        Envelope {
            data,
            headers,
            meta: self.config.include_metadata.then_some(meta),
        }
    }
}

/// Classify a non-2xx response into the error taxonomy.
fn classify_status(response: &HttpResponse) -> ClientError {
    let message = error_body_message(&response.body)
        .unwrap_or_else(|| format!("HTTP {}", response.status));

    if response.status == 429 {
        let hint = response
            .headers
            .get("retry-after")
            .and_then(|value| value.trim().parse().ok());
        return ClientError::rate_limited(message, hint);
    }

    ClientError::api(response.status, message)
}

/// Extract the message from a JSON `{"error": "..."}` body, when present.
fn error_body_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        error: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|parsed| parsed.error)
}

fn unexpected_representation(status: u16) -> ClientError {
    ClientError::api(status, "unexpected payload representation")
}
