//! # TickPulse Client
//!
//! Typed, retrying HTTP client for the TickPulse market-data analytics API.
//!
//! ## Overview
//!
//! The service exposes read-only endpoints for raw time series and derived
//! analytics. This crate is the resilient request pipeline in front of
//! them: pre-flight validation, query encoding, per-attempt timeouts,
//! retry with capped exponential backoff, a closed error taxonomy, and
//! dual-format decoding (JSON tree vs. CSV rows) into one record model.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Configuration and the request executor |
//! | [`decode`] | Declared-kind payload decoding |
//! | [`envelope`] | Result envelope and call diagnostics |
//! | [`error`] | Error taxonomy |
//! | [`http`] | Transport trait and reqwest implementation |
//! | [`models`] | Wire enums and typed response models |
//! | [`query`] | Query encoding and typed endpoint queries |
//! | [`records`] | Time-series records and the tabular mapper |
//! | [`retry`] | Retry classification and backoff |
//! | [`validate`] | Pre-flight argument checks |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickpulse_client::{ClientConfig, TickPulseClient, TickersQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TickPulseClient::new(
//!         ClientConfig::default().with_base_url("http://localhost:3000"),
//!     );
//!
//!     let reply = client
//!         .tickers(&TickersQuery::new().symbol("VCB"))
//!         .await?;
//!
//!     for record in &reply.data["VCB"] {
//!         println!("{} close {}", record.time, record.close);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`ClientError`], a closed tagged union. The
//! retry classifier and caller branching dispatch on the same variants:
//!
//! ```rust
//! use tickpulse_client::ClientError;
//!
//! fn handle(error: ClientError) {
//!     match error {
//!         ClientError::Validation { field, .. } => {
//!             // fix the call site; nothing was sent
//!             let _ = field;
//!         }
//!         ClientError::RateLimited { retry_after_secs, .. } => {
//!             // back off, optionally honoring the hint
//!             let _ = retry_after_secs;
//!         }
//!         ClientError::Network { .. } | ClientError::Api { .. } => {
//!             // degrade gracefully or surface to the user
//!         }
//!     }
//! }
//! ```
//!
//! Transient failures (`Network`, `RateLimited`) are retried silently up
//! to the configured ceiling; the last error is then surfaced unchanged,
//! never wrapped.

pub mod client;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod http;
pub mod models;
pub mod query;
pub mod records;
pub mod retry;
pub mod validate;

pub use client::{ClientConfig, TickPulseClient};
pub use decode::{ContentKind, CsvTable, DecodedBody};
pub use envelope::{CallMeta, Envelope};
pub use error::ClientError;
pub use http::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use models::{
    AssetMode, HealthReport, Interval, MaScoresReport, MaStockScore, Performer, ResponseFormat,
    SectorMaScore, SortDirection, SortMetric, TickerGroups, TopPerformersReport,
    VolumeProfileReport,
};
pub use query::{
    MaScoresQuery, ParamValue, QuerySpec, TickersQuery, TopPerformersQuery, VolumeProfileQuery,
};
pub use records::{map_table, TickerSeries, TimeSeriesRecord, TABLE_COLUMNS, TABLE_HEADER};
pub use retry::{RetryDecision, RetryPolicy, RetryState};
