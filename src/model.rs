// Core structs: PriceRecord, PriceSeries, Prediction, errors
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Daily records ordered by date ascending, one record per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    records: Vec<PriceRecord>,
}

impl PriceSeries {
    /// Sorts by date; when a date repeats the last record for it wins.
    pub fn from_records(mut records: Vec<PriceRecord>) -> Self {
        // stable sort keeps arrival order within a date
        records.sort_by_key(|r| r.date);
        let mut deduped: Vec<PriceRecord> = Vec::with_capacity(records.len());
        for record in records {
            match deduped.last_mut() {
                Some(prev) if prev.date == record.date => *prev = record,
                _ => deduped.push(record),
            }
        }
        Self { records: deduped }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub last_ema: f64,
    pub mean_daily_return: f64,
    pub forecast: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid window: start {start} is not before end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("a {days}-day window before {end} is out of range")]
    WindowOutOfRange { days: i64, end: NaiveDate },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum PredictError {
    #[error("need at least 2 observations, got {len}")]
    NotEnoughData { len: usize },
    #[error("close price at index {index} is not a positive finite number: {value}")]
    NonPositivePrice { index: usize, value: f64 },
    #[error("EMA span must be greater than zero")]
    InvalidSpan,
    #[error("horizon of {0} days is too long")]
    InvalidHorizon(u32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("unknown company: {0}")]
    UnknownCompany(String),
    #[error("unknown ticker: {0}")]
    UnknownTicker(String),
    #[error("no selection made")]
    Empty,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(day: u32, close: f64) -> PriceRecord {
        PriceRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }

    #[test]
    fn from_records_sorts_and_keeps_last_duplicate() {
        let series = PriceSeries::from_records(vec![rec(5, 3.0), rec(1, 1.0), rec(5, 4.0), rec(2, 2.0)]);
        assert_eq!(series.closes(), vec![1.0, 2.0, 4.0]);
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn empty_series_has_no_last_date() {
        let series = PriceSeries::from_records(Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.last_date(), None);
    }
}
