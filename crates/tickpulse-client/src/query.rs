//! Query-string construction and typed per-endpoint queries.
//!
//! [`QuerySpec`] is an ordered list of `(key, value)` pairs. List values are
//! encoded as repeated keys (`symbol=VCB&symbol=FPT`), never comma-joined.
//! Empty and absent values are omitted entirely; a meaningful falsy value
//! (the number 0, `false`) is the caller's to emit explicitly, because the
//! encoder never coerces.

use crate::error::ClientError;
use crate::models::{AssetMode, Interval, ResponseFormat, SortDirection, SortMetric};
use crate::validate::{
    ensure_date, ensure_in_range, ensure_in_range_f64, ensure_ma_period, ensure_present,
};

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(String),
    List(Vec<String>),
}

/// Ordered query parameters for one request. Built fresh per call and
/// discarded after encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    params: Vec<(&'static str, ParamValue)>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scalar parameter. Empty values are dropped.
    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.params.push((key, ParamValue::Scalar(value)));
    }

    /// Append a scalar parameter rendered through `Display`.
    pub fn push_display(&mut self, key: &'static str, value: impl ToString) {
        self.push(key, value.to_string());
    }

    /// Append a scalar parameter when the value is present.
    pub fn push_opt<T: ToString>(&mut self, key: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.push(key, value.to_string());
        }
    }

    /// Append a list parameter, one repeated key per element, order kept.
    pub fn push_list<S: AsRef<str>>(&mut self, key: &'static str, values: &[S]) {
        let values: Vec<String> = values
            .iter()
            .map(|v| v.as_ref().to_owned())
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            return;
        }
        self.params.push((key, ParamValue::List(values)));
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Encode into a `?key=value&...` string, or `""` when empty.
    ///
    /// Encoding is pure: the same spec always yields a byte-identical
    /// string, and encoding has no effect on the spec itself.
    pub fn encode(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();

        for (key, value) in &self.params {
            match value {
                ParamValue::Scalar(scalar) => pairs.push(encode_pair(key, scalar)),
                ParamValue::List(list) => {
                    for item in list {
                        pairs.push(encode_pair(key, item));
                    }
                }
            }
        }

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
}

/// Query for the `/tickers` time-series endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickersQuery {
    pub symbols: Vec<String>,
    pub interval: Option<Interval>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u32>,
    pub legacy: Option<bool>,
    pub cache: Option<bool>,
    pub mode: Option<AssetMode>,
    /// Explicit payload format. Left unset, the client requests CSV and maps
    /// the rows itself.
    pub format: Option<ResponseFormat>,
}

impl TickersQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    pub fn symbols<S: Into<String>>(mut self, symbols: impl IntoIterator<Item = S>) -> Self {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    pub fn interval(mut self, interval: Interval) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn mode(mut self, mode: AssetMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn format(mut self, format: ResponseFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(start) = &self.start_date {
            ensure_date("start_date", start)?;
        }
        if let Some(end) = &self.end_date {
            ensure_date("end_date", end)?;
        }
        Ok(())
    }

    pub fn to_spec(&self) -> QuerySpec {
        let mut spec = QuerySpec::new();
        spec.push_list("symbol", &self.symbols);
        spec.push_opt("interval", self.interval.map(|i| i.as_str()));
        spec.push_opt("start_date", self.start_date.as_deref());
        spec.push_opt("end_date", self.end_date.as_deref());
        spec.push_opt("limit", self.limit);
        spec.push_opt("legacy", self.legacy);
        spec.push_opt("cache", self.cache);
        spec.push_opt("mode", self.mode.map(|m| m.as_str()));
        spec
    }
}

/// Query for `/analysis/top-performers`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopPerformersQuery {
    pub date: Option<String>,
    pub sort_by: Option<SortMetric>,
    pub direction: Option<SortDirection>,
    pub limit: Option<u32>,
    pub sector: Option<String>,
    pub min_volume: Option<u64>,
}

impl TopPerformersQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn sort_by(mut self, metric: SortMetric) -> Self {
        self.sort_by = Some(metric);
        self
    }

    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn min_volume(mut self, min_volume: u64) -> Self {
        self.min_volume = Some(min_volume);
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(date) = &self.date {
            ensure_date("date", date)?;
        }
        if let Some(limit) = self.limit {
            ensure_in_range("limit", limit, 1, 100)?;
        }
        Ok(())
    }

    pub fn to_spec(&self) -> QuerySpec {
        let mut spec = QuerySpec::new();
        spec.push_opt("date", self.date.as_deref());
        spec.push_opt("sort_by", self.sort_by.map(|m| m.as_str()));
        spec.push_opt("direction", self.direction.map(|d| d.as_str()));
        spec.push_opt("limit", self.limit);
        spec.push_opt("sector", self.sector.as_deref());
        spec.push_opt("min_volume", self.min_volume);
        spec
    }
}

/// Query for `/analysis/ma-scores-by-sector`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaScoresQuery {
    pub date: Option<String>,
    pub ma_period: Option<u32>,
    pub min_score: Option<f64>,
    pub above_threshold_only: Option<bool>,
    pub top_per_sector: Option<u32>,
}

impl MaScoresQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn ma_period(mut self, period: u32) -> Self {
        self.ma_period = Some(period);
        self
    }

    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn above_threshold_only(mut self, flag: bool) -> Self {
        self.above_threshold_only = Some(flag);
        self
    }

    pub fn top_per_sector(mut self, count: u32) -> Self {
        self.top_per_sector = Some(count);
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(date) = &self.date {
            ensure_date("date", date)?;
        }
        if let Some(period) = self.ma_period {
            ensure_ma_period("ma_period", period)?;
        }
        if let Some(count) = self.top_per_sector {
            ensure_in_range("top_per_sector", count, 1, 50)?;
        }
        Ok(())
    }

    pub fn to_spec(&self) -> QuerySpec {
        let mut spec = QuerySpec::new();
        spec.push_opt("date", self.date.as_deref());
        spec.push_opt("ma_period", self.ma_period);
        spec.push_opt("min_score", self.min_score);
        spec.push_opt("above_threshold_only", self.above_threshold_only);
        spec.push_opt("top_per_sector", self.top_per_sector);
        spec
    }
}

/// Query for `/analysis/volume-profile`. Symbol and date are required.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeProfileQuery {
    pub symbol: String,
    pub date: String,
    pub mode: Option<AssetMode>,
    pub bins: Option<u32>,
    pub value_area_pct: Option<f64>,
}

impl VolumeProfileQuery {
    pub fn new(symbol: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            date: date.into(),
            mode: None,
            bins: None,
            value_area_pct: None,
        }
    }

    pub fn mode(mut self, mode: AssetMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn bins(mut self, bins: u32) -> Self {
        self.bins = Some(bins);
        self
    }

    pub fn value_area_pct(mut self, pct: f64) -> Self {
        self.value_area_pct = Some(pct);
        self
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        ensure_present("symbol", &self.symbol)?;
        ensure_present("date", &self.date)?;
        ensure_date("date", &self.date)?;
        if let Some(bins) = self.bins {
            ensure_in_range("bins", bins, 10, 200)?;
        }
        if let Some(pct) = self.value_area_pct {
            ensure_in_range_f64("value_area_pct", pct, 60.0, 90.0)?;
        }
        Ok(())
    }

    pub fn to_spec(&self) -> QuerySpec {
        let mut spec = QuerySpec::new();
        spec.push("symbol", self.symbol.clone());
        spec.push("date", self.date.clone());
        spec.push_opt("mode", self.mode.map(|m| m.as_str()));
        spec.push_opt("bins", self.bins);
        spec.push_opt("value_area_pct", self.value_area_pct);
        spec
    }
}
