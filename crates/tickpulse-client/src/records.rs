//! Time-series records and the tabular record mapper.
//!
//! The tabular payload of the `/tickers` endpoint is a fixed twenty-column
//! schema, position-based rather than header-driven. The column order is a
//! wire contract; a service-side reorder would silently miscode, so the
//! list below is the single place that order is written down.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::decode::CsvTable;

/// Number of columns in the tabular time-series schema.
pub const TABLE_COLUMNS: usize = 20;

/// Column order of the tabular time-series schema.
pub const TABLE_HEADER: [&str; TABLE_COLUMNS] = [
    "symbol",
    "time",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "ma10",
    "ma20",
    "ma50",
    "ma100",
    "ma200",
    "ma10_score",
    "ma20_score",
    "ma50_score",
    "ma100_score",
    "ma200_score",
    "close_changed",
    "volume_changed",
    "total_money_changed",
];

/// One observation of a symbol's time series.
///
/// Everything past `volume` may be absent: moving averages need enough
/// history, and change deltas need a prior record. Aggregated intervals
/// omit them as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRecord {
    pub symbol: String,
    /// `YYYY-MM-DD` for daily data, `YYYY-MM-DD HH:MM:SS` for intraday.
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    #[serde(default)]
    pub ma10: Option<f64>,
    #[serde(default)]
    pub ma20: Option<f64>,
    #[serde(default)]
    pub ma50: Option<f64>,
    #[serde(default)]
    pub ma100: Option<f64>,
    #[serde(default)]
    pub ma200: Option<f64>,
    /// Percentage distance of close from the corresponding moving average.
    #[serde(default)]
    pub ma10_score: Option<f64>,
    #[serde(default)]
    pub ma20_score: Option<f64>,
    #[serde(default)]
    pub ma50_score: Option<f64>,
    #[serde(default)]
    pub ma100_score: Option<f64>,
    #[serde(default)]
    pub ma200_score: Option<f64>,
    /// Percent change in close since the prior record.
    #[serde(default)]
    pub close_changed: Option<f64>,
    /// Percent change in volume since the prior record.
    #[serde(default)]
    pub volume_changed: Option<f64>,
    /// Money-flow delta since the prior record.
    #[serde(default)]
    pub total_money_changed: Option<f64>,
}

/// Per-symbol ordered time series, keyed by ticker symbol.
pub type TickerSeries = HashMap<String, Vec<TimeSeriesRecord>>;

/// Map a decoded tabular payload into per-symbol record sequences.
///
/// Rows are appended in the order encountered; the mapper never sorts or
/// deduplicates. Unparseable required numerics fall back to zero and
/// unparseable optionals to absent, so a single bad field never drops a
/// row the decoder already accepted.
pub fn map_table(table: &CsvTable) -> TickerSeries {
    let mut series = TickerSeries::new();

    for row in &table.rows {
        if row.len() != TABLE_COLUMNS {
            continue;
        }

        let record = TimeSeriesRecord {
            symbol: row[0].clone(),
            time: row[1].clone(),
            open: float_or_zero(&row[2]),
            high: float_or_zero(&row[3]),
            low: float_or_zero(&row[4]),
            close: float_or_zero(&row[5]),
            volume: row[6].parse().unwrap_or(0),
            ma10: optional_float(&row[7]),
            ma20: optional_float(&row[8]),
            ma50: optional_float(&row[9]),
            ma100: optional_float(&row[10]),
            ma200: optional_float(&row[11]),
            ma10_score: optional_float(&row[12]),
            ma20_score: optional_float(&row[13]),
            ma50_score: optional_float(&row[14]),
            ma100_score: optional_float(&row[15]),
            ma200_score: optional_float(&row[16]),
            close_changed: optional_float(&row[17]),
            volume_changed: optional_float(&row[18]),
            total_money_changed: optional_float(&row[19]),
        };

        series
            .entry(record.symbol.clone())
            .or_default()
            .push(record);
    }

    series
}

fn float_or_zero(field: &str) -> f64 {
    field.parse().unwrap_or(0.0)
}

fn optional_float(field: &str) -> Option<f64> {
    if field.is_empty() {
        return None;
    }
    field.parse().ok()
}
