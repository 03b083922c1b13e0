//! Wire enums and typed response models.
//!
//! Field names and enum values mirror the service's JSON contract exactly;
//! the structs deserialize straight from the decoded value tree.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Time interval selector for the time-series endpoint.
///
/// Daily, hourly and minute are base intervals; the rest are aggregates the
/// service computes from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1D")]
    Daily,
    #[serde(rename = "1H")]
    Hourly,
    #[serde(rename = "1m")]
    Minute,
    #[serde(rename = "5m")]
    Minutes5,
    #[serde(rename = "15m")]
    Minutes15,
    #[serde(rename = "30m")]
    Minutes30,
    #[serde(rename = "1W")]
    Weekly,
    #[serde(rename = "2W")]
    BiWeekly,
    #[serde(rename = "1M")]
    Monthly,
}

impl Interval {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "1D",
            Self::Hourly => "1H",
            Self::Minute => "1m",
            Self::Minutes5 => "5m",
            Self::Minutes15 => "15m",
            Self::Minutes30 => "30m",
            Self::Weekly => "1W",
            Self::BiWeekly => "2W",
            Self::Monthly => "1M",
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "1D" => Ok(Self::Daily),
            "1H" => Ok(Self::Hourly),
            "1m" => Ok(Self::Minute),
            "5m" => Ok(Self::Minutes5),
            "15m" => Ok(Self::Minutes15),
            "30m" => Ok(Self::Minutes30),
            "1W" => Ok(Self::Weekly),
            "2W" => Ok(Self::BiWeekly),
            "1M" => Ok(Self::Monthly),
            other => Err(ClientError::validation(
                "interval",
                format!("invalid interval '{other}'"),
            )),
        }
    }
}

/// Payload representation the service is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Json,
    Csv,
}

impl ResponseFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl Display for ResponseFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset universe selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetMode {
    #[default]
    Vn,
    Crypto,
}

impl AssetMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vn => "vn",
            Self::Crypto => "crypto",
        }
    }
}

impl Display for AssetMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranking metric for the top-performers endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMetric {
    CloseChanged,
    Volume,
    VolumeChanged,
    TotalMoneyChanged,
    Ma10Score,
    Ma20Score,
    Ma50Score,
    Ma100Score,
    Ma200Score,
}

impl SortMetric {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CloseChanged => "close_changed",
            Self::Volume => "volume",
            Self::VolumeChanged => "volume_changed",
            Self::TotalMoneyChanged => "total_money_changed",
            Self::Ma10Score => "ma10_score",
            Self::Ma20Score => "ma20_score",
            Self::Ma50Score => "ma50_score",
            Self::Ma100Score => "ma100_score",
            Self::Ma200Score => "ma200_score",
        }
    }
}

impl Display for SortMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for ranked endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol-to-group membership, e.g. `"VN30" -> ["VCB", "FPT", ...]`.
pub type TickerGroups = HashMap<String, Vec<String>>;

/// Service health and worker statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub daily_last_sync: Option<String>,
    pub hourly_last_sync: Option<String>,
    pub minute_last_sync: Option<String>,
    pub daily_iteration_count: u64,
    pub slow_iteration_count: u64,

    pub is_trading_hours: bool,
    pub trading_hours_timezone: String,

    pub memory_usage_bytes: u64,
    pub memory_usage_mb: f64,
    pub memory_limit_mb: f64,
    pub memory_usage_percent: f64,

    pub total_tickers_count: u64,
    pub active_tickers_count: u64,
    pub daily_records_count: u64,
    pub hourly_records_count: u64,
    pub minute_records_count: u64,

    pub disk_cache_entries: u64,
    pub disk_cache_size_bytes: u64,
    pub disk_cache_size_mb: f64,
    pub disk_cache_limit_mb: f64,
    pub disk_cache_usage_percent: f64,

    pub uptime_secs: u64,
    pub current_system_time: String,
}

/// One row of the top-performers ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub symbol: String,
    pub close: f64,
    pub volume: u64,
    #[serde(default)]
    pub close_changed: Option<f64>,
    #[serde(default)]
    pub volume_changed: Option<f64>,
    #[serde(default)]
    pub total_money_changed: Option<f64>,
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
    #[serde(default)]
    pub sector: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformerSet {
    pub performers: Vec<Performer>,
}

/// Response from `/analysis/top-performers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformersReport {
    pub analysis_date: String,
    pub analysis_type: String,
    pub total_analyzed: u64,
    pub data: PerformerSet,
}

/// Moving-average score for a single stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaStockScore {
    pub symbol: String,
    pub close: f64,
    pub volume: u64,
    pub ma_value: f64,
    pub ma_score: f64,
    #[serde(default)]
    pub close_changed: Option<f64>,
    #[serde(default)]
    pub volume_changed: Option<f64>,
}

/// Per-sector aggregation of moving-average scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorMaScore {
    pub sector_name: String,
    pub total_stocks: u64,
    pub stocks_above_threshold: u64,
    pub average_score: f64,
    pub top_stocks: Vec<MaStockScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaScoresData {
    pub sectors: Vec<SectorMaScore>,
    pub ma_period: u32,
    pub threshold: f64,
}

/// Response from `/analysis/ma-scores-by-sector`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaScoresReport {
    pub analysis_date: String,
    pub analysis_type: String,
    pub total_analyzed: u64,
    pub data: MaScoresData,
}

/// Session price range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
    pub spread: f64,
}

/// Price level with the highest traded volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfControl {
    pub price: f64,
    pub volume: f64,
    pub percentage: f64,
}

/// Price band containing the target share of the session's volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueArea {
    pub low: f64,
    pub high: f64,
    pub volume: f64,
    pub percentage: f64,
}

/// One bin of the volume distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevelVolume {
    pub price: f64,
    pub volume: f64,
    pub percentage: f64,
    pub cumulative_percentage: f64,
}

/// Volume-weighted distribution statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeStatistics {
    pub mean_price: f64,
    pub median_price: f64,
    pub std_deviation: f64,
    pub skewness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfileData {
    pub symbol: String,
    pub total_volume: f64,
    pub total_minutes: u64,
    pub price_range: PriceRange,
    pub poc: PointOfControl,
    pub value_area: ValueArea,
    pub profile: Vec<PriceLevelVolume>,
    pub statistics: VolumeStatistics,
}

/// Response from `/analysis/volume-profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfileReport {
    pub analysis_date: String,
    pub analysis_type: String,
    pub total_analyzed: u64,
    pub data: VolumeProfileData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_round_trips_through_wire_values() {
        for interval in [
            Interval::Daily,
            Interval::Hourly,
            Interval::Minute,
            Interval::Minutes5,
            Interval::Weekly,
            Interval::Monthly,
        ] {
            let parsed: Interval = interval.as_str().parse().expect("must parse");
            assert_eq!(parsed, interval);
        }
    }

    #[test]
    fn interval_rejects_unknown_values() {
        let error = "4H".parse::<Interval>().expect_err("must fail");
        assert_eq!(error.field(), Some("interval"));
    }

    #[test]
    fn sort_metric_uses_snake_case_wire_names() {
        assert_eq!(SortMetric::CloseChanged.as_str(), "close_changed");
        assert_eq!(SortMetric::Ma20Score.as_str(), "ma20_score");
    }

    #[test]
    fn top_performers_report_deserializes() {
        let payload = r#"{
            "analysis_date": "2025-01-15",
            "analysis_type": "top_performers",
            "total_analyzed": 2,
            "data": {
                "performers": [
                    {"symbol": "VCB", "close": 60300.0, "volume": 1200000, "close_changed": 1.2},
                    {"symbol": "FPT", "close": 98000.0, "volume": 800000}
                ]
            }
        }"#;

        let report: TopPerformersReport = serde_json::from_str(payload).expect("must parse");
        assert_eq!(report.data.performers.len(), 2);
        assert_eq!(report.data.performers[0].close_changed, Some(1.2));
        assert_eq!(report.data.performers[1].ma20, None);
    }
}
