//! Behavior-driven tests for the request executor.
//!
//! These tests verify HOW the client behaves against a scripted transport:
//! retry budget accounting, terminal-error short-circuits, rate-limit
//! hints, timeout classification, and the decode pipeline. No sockets are
//! involved; virtual time makes the backoff sleeps instantaneous.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickpulse_client::{
    ClientConfig, ClientError, HttpClient, HttpError, HttpRequest, HttpResponse, ResponseFormat,
    RetryPolicy, TickPulseClient, TickersQuery, VolumeProfileQuery, TABLE_HEADER,
};

/// One scripted transport outcome.
enum Step {
    Respond(HttpResponse),
    Fail(HttpError),
    /// Never completes; exercises the per-attempt timeout race.
    Hang,
}

/// Transport fake that replays a fixed script and records what it saw.
struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    attempts: AtomicU32,
    urls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into_iter().collect()),
            attempts: AtomicU32::new(0),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn last_url(&self) -> String {
        self.urls.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl HttpClient for ScriptedTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(request.url);
        let step = self.steps.lock().unwrap().pop_front();

        Box::pin(async move {
            match step {
                Some(Step::Respond(response)) => Ok(response),
                Some(Step::Fail(error)) => Err(error),
                Some(Step::Hang) => std::future::pending().await,
                None => Err(HttpError::new("transport script exhausted")),
            }
        })
    }
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(100),
        multiplier: 2.0,
    }
}

fn client_over(
    transport: Arc<ScriptedTransport>,
    retry: RetryPolicy,
) -> TickPulseClient {
    let config = ClientConfig::default()
        .with_retry(retry)
        .with_metadata(true);
    TickPulseClient::with_transport(config, transport)
}

fn sample_csv() -> String {
    let mut lines = vec![TABLE_HEADER.join(",")];
    lines.push(
        "VCB,2025-01-14,60000,60500,59800,60300,1200000,,,,,,,,,,,0.5,12.0,360000000".to_owned(),
    );
    lines.push(
        "VCB,2025-01-15,60300,61000,60200,60900,1500000,,,,,,,,,,,1.0,25.0,900000000".to_owned(),
    );
    lines.push("FPT,2025-01-15,98000,99000,97500,98500,800000,,,,,,,,,,,,,".to_owned());
    lines.push("BROKEN,2025-01-15,1".to_owned());
    lines.join("\n")
}

fn ok_csv(body: String) -> HttpResponse {
    HttpResponse::new(200, body).with_header("content-type", "text/csv")
}

// =============================================================================
// Retry budget accounting
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_transport_fails_twice_then_succeeds_exactly_two_retries_are_reported() {
    // Given: a transport that fails twice before delivering the payload
    let transport = ScriptedTransport::new([
        Step::Fail(HttpError::new("connection refused")),
        Step::Fail(HttpError::new("connection reset")),
        Step::Respond(ok_csv(sample_csv())),
    ]);
    let client = client_over(transport.clone(), fast_retry(3));

    // When: one tickers call runs
    let reply = client
        .tickers(&TickersQuery::new().symbol("VCB"))
        .await
        .expect("third attempt should succeed");

    // Then: the payload arrives and the envelope accounts for both retries
    assert_eq!(transport.attempts(), 3);
    let meta = reply.meta.expect("metadata was opted in");
    assert_eq!(meta.retries, 2);
    assert_eq!(meta.status, 200);
    assert!(reply.data.contains_key("VCB"));
}

#[tokio::test(start_paused = true)]
async fn when_every_attempt_fails_the_last_error_surfaces_after_the_ceiling() {
    // Given: a transport that always fails and a ceiling of 2 retries
    let transport = ScriptedTransport::new([
        Step::Fail(HttpError::new("connection refused")),
        Step::Fail(HttpError::new("connection refused")),
        Step::Fail(HttpError::new("connection refused")),
        Step::Fail(HttpError::new("connection refused")),
    ]);
    let client = client_over(transport.clone(), fast_retry(2));

    // When: the call runs out of budget
    let error = client.health().await.expect_err("must exhaust retries");

    // Then: exactly 1 initial + 2 retry attempts happened, and the original
    // error kind surfaces unwrapped
    assert_eq!(transport.attempts(), 3);
    assert!(matches!(error, ClientError::Network { .. }));
    assert!(error.to_string().contains("connection refused"));
}

#[tokio::test]
async fn when_validation_fails_no_request_is_sent() {
    // Given: a query with an impossible calendar date
    let transport = ScriptedTransport::new([]);
    let client = client_over(transport.clone(), fast_retry(3));

    // When: the call is made
    let error = client
        .tickers(&TickersQuery::new().symbol("VCB").date_range("2025-13-40", "2025-12-31"))
        .await
        .expect_err("validation must fail");

    // Then: the error names the field and the transport never ran
    assert_eq!(error.field(), Some("start_date"));
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn when_the_service_faults_no_retries_are_consumed() {
    // Given: a 500 with a JSON error body
    let transport = ScriptedTransport::new([Step::Respond(HttpResponse::new(
        500,
        r#"{"error": "backing store offline"}"#,
    ))]);
    let client = client_over(transport.clone(), fast_retry(3));

    // When: the call fails
    let error = client.health().await.expect_err("must fail");

    // Then: one attempt, a structured Api error with the body's message
    assert_eq!(transport.attempts(), 1);
    assert_eq!(error.status(), Some(500));
    assert!(error.to_string().contains("backing store offline"));
}

// =============================================================================
// Rate limiting
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_rate_limited_the_retry_after_hint_is_honored_as_a_floor() {
    // Given: a 429 carrying a 5 second hint, then success
    let transport = ScriptedTransport::new([
        Step::Respond(
            HttpResponse::new(429, r#"{"error": "too many requests"}"#)
                .with_header("Retry-After", "5"),
        ),
        Step::Respond(ok_csv(sample_csv())),
    ]);
    let client = client_over(transport.clone(), fast_retry(3));

    // When: the call retries through the rate limit
    let before = tokio::time::Instant::now();
    let reply = client
        .tickers(&TickersQuery::new().symbol("VCB"))
        .await
        .expect("retry should succeed");

    // Then: at least the hinted five seconds elapsed before the retry
    assert!(before.elapsed() >= Duration::from_secs(5));
    assert_eq!(transport.attempts(), 2);
    assert_eq!(reply.meta.expect("metadata").retries, 1);
}

// =============================================================================
// Timeout classification
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_an_attempt_times_out_it_is_retried_like_any_transient_failure() {
    // Given: a first attempt that hangs forever, then a healthy response
    let transport = ScriptedTransport::new([Step::Hang, Step::Respond(ok_csv(sample_csv()))]);
    let config = ClientConfig::default()
        .with_timeout(Duration::from_secs(2))
        .with_retry(fast_retry(3))
        .with_metadata(true);
    let client = TickPulseClient::with_transport(config, transport.clone());

    // When: the call runs
    let reply = client
        .tickers(&TickersQuery::new().symbol("VCB"))
        .await
        .expect("second attempt should succeed");

    // Then: the timeout consumed one retry and the call still succeeded
    assert_eq!(transport.attempts(), 2);
    assert_eq!(reply.meta.expect("metadata").retries, 1);
}

#[tokio::test(start_paused = true)]
async fn when_the_only_attempt_times_out_the_error_is_network() {
    // Given: a hanging transport and no retry budget
    let transport = ScriptedTransport::new([Step::Hang]);
    let config = ClientConfig::default()
        .with_timeout(Duration::from_secs(2))
        .with_retry(RetryPolicy::no_retry());
    let client = TickPulseClient::with_transport(config, transport);

    // When: the attempt expires
    let error = client.health().await.expect_err("must time out");

    // Then: the timeout reads as a transport failure, not an api fault
    assert!(matches!(error, ClientError::Network { .. }));
    assert!(error.to_string().contains("timeout"));
}

// =============================================================================
// Decode pipeline
// =============================================================================

#[tokio::test]
async fn when_csv_arrives_rows_map_to_grouped_ordered_records() {
    // Given: a tabular payload with one malformed row
    let transport = ScriptedTransport::new([Step::Respond(ok_csv(sample_csv()))]);
    let client = client_over(transport.clone(), fast_retry(0));

    // When: tickers are fetched with the default format
    let reply = client
        .tickers(&TickersQuery::new().symbols(["VCB", "FPT"]))
        .await
        .expect("must decode");

    // Then: the request asked for csv, well-formed rows grouped by symbol
    // in order, and the malformed row vanished without an error
    assert!(transport.last_url().contains("format=csv"));
    assert_eq!(reply.data["VCB"].len(), 2);
    assert_eq!(reply.data["VCB"][0].time, "2025-01-14");
    assert_eq!(reply.data["VCB"][1].time, "2025-01-15");
    assert_eq!(reply.data["FPT"].len(), 1);
    assert!(!reply.data.contains_key("BROKEN"));
}

#[tokio::test]
async fn when_json_is_requested_explicitly_the_tree_deserializes_directly() {
    // Given: a JSON time-series payload
    let body = r#"{
        "VCB": [
            {"symbol": "VCB", "time": "2025-01-15", "open": 60300.0, "high": 61000.0,
             "low": 60200.0, "close": 60900.0, "volume": 1500000, "ma20": 60000.0}
        ]
    }"#;
    let transport = ScriptedTransport::new([Step::Respond(HttpResponse::new(200, body))]);
    let client = client_over(transport.clone(), fast_retry(0));

    // When: the caller explicitly asks for JSON
    let reply = client
        .tickers(&TickersQuery::new().symbol("VCB").format(ResponseFormat::Json))
        .await
        .expect("must decode");

    // Then: the mapper is bypassed and the same record shape comes back
    assert!(transport.last_url().contains("format=json"));
    assert_eq!(reply.data["VCB"][0].ma20, Some(60000.0));
}

#[tokio::test]
async fn when_a_2xx_payload_is_malformed_the_error_is_an_api_fault() {
    // Given: a 200 whose body is not valid JSON
    let transport = ScriptedTransport::new([Step::Respond(HttpResponse::new(200, "{broken"))]);
    let client = client_over(transport.clone(), fast_retry(3));

    // When: the decode runs
    let error = client.health().await.expect_err("must fail to decode");

    // Then: the bytes arrived, so this is an api fault and never retried
    assert_eq!(error.status(), Some(200));
    assert!(!error.retryable());
    assert_eq!(transport.attempts(), 1);
}

#[tokio::test]
async fn raw_csv_export_returns_the_untouched_blob() {
    // Given: a csv payload
    let csv = sample_csv();
    let transport = ScriptedTransport::new([Step::Respond(ok_csv(csv.clone()))]);
    let client = client_over(transport, fast_retry(0));

    // When: the raw export operation is used
    let reply = client
        .tickers_csv(&TickersQuery::new().symbol("VCB"))
        .await
        .expect("must pass through");

    // Then: the body is exactly what the service sent
    assert_eq!(reply.data, csv);
}

// =============================================================================
// Envelope and URL construction
// =============================================================================

#[tokio::test]
async fn metadata_is_absent_unless_opted_in() {
    // Given: a client without the metadata opt-in
    let transport = ScriptedTransport::new([Step::Respond(ok_csv(sample_csv()))]);
    let config = ClientConfig::default().with_retry(fast_retry(0));
    let client = TickPulseClient::with_transport(config, transport.clone());

    // When: a call succeeds
    let reply = client
        .tickers(&TickersQuery::new().symbol("VCB"))
        .await
        .expect("must succeed");

    // Then: headers still come back, diagnostics do not
    assert!(reply.meta.is_none());
    assert_eq!(
        reply.headers.get("content-type").map(String::as_str),
        Some("text/csv")
    );
}

#[tokio::test]
async fn envelope_reports_url_status_and_payload_size() {
    let transport = ScriptedTransport::new([Step::Respond(HttpResponse::new(200, "{}"))]);
    let config = ClientConfig::default()
        .with_base_url("http://analytics.internal:8080/")
        .with_retry(fast_retry(0))
        .with_metadata(true);
    let client = TickPulseClient::with_transport(config, transport.clone());

    let reply = client
        .ticker_groups(tickpulse_client::AssetMode::Crypto)
        .await
        .expect("must succeed");

    // Trailing slash on the base trims; mode is only sent when non-default.
    assert_eq!(
        transport.last_url(),
        "http://analytics.internal:8080/tickers/group?mode=crypto"
    );
    let meta = reply.meta.expect("metadata");
    assert_eq!(meta.url, transport.last_url());
    assert_eq!(meta.status, 200);
    assert_eq!(meta.response_size, 2);
    assert_eq!(meta.retries, 0);
}

#[tokio::test]
async fn default_mode_sends_no_mode_parameter() {
    let transport = ScriptedTransport::new([Step::Respond(HttpResponse::new(200, "{}"))]);
    let client = client_over(transport.clone(), fast_retry(0));

    client
        .ticker_groups(tickpulse_client::AssetMode::Vn)
        .await
        .expect("must succeed");

    assert_eq!(transport.last_url(), "http://localhost:3000/tickers/group");
}

#[tokio::test]
async fn repeated_symbols_encode_as_repeated_keys() {
    let transport = ScriptedTransport::new([Step::Respond(ok_csv(sample_csv()))]);
    let client = client_over(transport.clone(), fast_retry(0));

    client
        .tickers(&TickersQuery::new().symbols(["VCB", "FPT"]))
        .await
        .expect("must succeed");

    assert!(transport
        .last_url()
        .contains("symbol=VCB&symbol=FPT"));
}

#[tokio::test]
async fn volume_profile_requires_its_parameters_before_any_request() {
    let transport = ScriptedTransport::new([]);
    let client = client_over(transport.clone(), fast_retry(3));

    let error = client
        .volume_profile(&VolumeProfileQuery::new("VCB", "2025-01-15").bins(500))
        .await
        .expect_err("bins out of range");

    assert_eq!(error.field(), Some("bins"));
    assert_eq!(transport.attempts(), 0);
}
