use crate::fetcher::traits::PriceSource;
use crate::model::{FetchError, PriceRecord, PriceSeries};

use chrono::{DateTime, Duration, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

pub struct YahooSource {
    client: Client,
    base_url: String,
}

impl YahooSource {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        // period2 is exclusive upstream, so ask for the whole `end` day
        let period1 = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let period2 = (end + Duration::days(1)).and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, ticker, period1, period2
        )
    }
}

#[async_trait::async_trait]
impl PriceSource for YahooSource {
    async fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, FetchError> {
        if start >= end {
            return Err(FetchError::InvalidWindow { start, end });
        }

        let url = self.build_url(ticker, start, end);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let series = classify(status, &body, start, end)?;
        info!("[{}] fetched {} daily records", ticker, series.len());
        Ok(series)
    }
}

/// Maps a provider response to a series. A 404 carrying a chart error is
/// the no-data case (unknown or delisted symbol) and yields an empty series.
fn classify(status: StatusCode, body: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, FetchError> {
    if status == StatusCode::NOT_FOUND {
        return match serde_json::from_str::<ChartEnvelope>(body) {
            Ok(envelope) if envelope.chart.error.is_some() => {
                info!("Provider has no data: {}", describe(&envelope));
                Ok(PriceSeries::default())
            }
            _ => Err(FetchError::Status(status)),
        };
    }
    if !status.is_success() {
        warn!("Provider responded [{}]", status);
        return Err(FetchError::Status(status));
    }

    Ok(decode_chart(body, start, end)?)
}

fn describe(envelope: &ChartEnvelope) -> String {
    envelope
        .chart
        .error
        .as_ref()
        .map(|e| format!("{} ({})", e.description.as_deref().unwrap_or("-"), e.code.as_deref().unwrap_or("-")))
        .unwrap_or_default()
}

/// Decodes a chart payload into a series restricted to `start..=end`
/// (exchange-local dates). Rows without a close are dropped.
pub fn decode_chart(body: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, serde_json::Error> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::default());
    };

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(PriceSeries::default());
    };

    let mut records = Vec::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(close) = value_at(&quote.close, i) else {
            skipped += 1;
            continue;
        };
        let Some(date) = DateTime::from_timestamp(ts + offset, 0).map(|dt| dt.date_naive()) else {
            skipped += 1;
            continue;
        };
        if date < start || date > end {
            continue;
        }

        records.push(PriceRecord {
            date,
            open: value_at(&quote.open, i).unwrap_or(close),
            high: value_at(&quote.high, i).unwrap_or(close),
            low: value_at(&quote.low, i).unwrap_or(close),
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }

    if skipped > 0 {
        warn!("Skipped {} rows without a usable close", skipped);
    }

    Ok(PriceSeries::from_records(records))
}

fn value_at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

// `chart` schema
#[derive(Deserialize, Debug)]
struct ChartEnvelope {
    chart: ChartResponse,
}

#[derive(Deserialize, Debug)]
struct ChartResponse {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    meta: Option<Meta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Deserialize, Debug)]
struct Meta {
    gmtoffset: Option<i64>,
}

#[derive(Deserialize, Debug, Default)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug, Default)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    // 2024-03-01, 03-04 and 03-05 at 14:30 UTC, New York offset -18000
    const PAYLOAD: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "KO", "gmtoffset": -18000 },
                "timestamp": [1709303400, 1709562600, 1709649000],
                "indicators": {
                    "quote": [{
                        "open":   [59.9, null, 60.2],
                        "high":   [60.3, 60.8, 60.5],
                        "low":    [59.5, 60.0, 59.9],
                        "close":  [60.1, null, 60.4],
                        "volume": [12000000, 9000000, null]
                    }],
                    "adjclose": [{ "adjclose": [60.1, null, 60.4] }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn decodes_rows_and_skips_null_close() {
        let series = decode_chart(PAYLOAD, day(2, 1), day(3, 31)).unwrap();
        let records = series.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, day(3, 1));
        assert_eq!(records[0].close, 60.1);
        assert_eq!(records[0].volume, 12_000_000);
        assert_eq!(records[1].date, day(3, 5));
        assert_eq!(records[1].volume, 0);
    }

    #[test]
    fn applies_exchange_offset_to_dates() {
        // 2024-03-02 03:00 UTC is still March 1st in New York
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},
            "timestamp":[1709348400],
            "indicators":{"quote":[{"open":[1.0],"high":[1.0],"low":[1.0],"close":[1.0],"volume":[1]}]}}],
            "error":null}}"#;
        let series = decode_chart(body, day(2, 1), day(3, 31)).unwrap();
        assert_eq!(series.last_date(), Some(day(3, 1)));
    }

    #[test]
    fn trims_records_outside_window() {
        let series = decode_chart(PAYLOAD, day(3, 2), day(3, 31)).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.last_date(), Some(day(3, 5)));
    }

    #[test]
    fn no_data_shapes_decode_to_empty() {
        let not_found = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(decode_chart(not_found, day(1, 1), day(3, 1)).unwrap().is_empty());

        let no_rows = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"indicators":{"quote":[{}]}}],"error":null}}"#;
        assert!(decode_chart(no_rows, day(1, 1), day(3, 1)).unwrap().is_empty());
    }

    const NOT_FOUND_BODY: &str = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

    #[test]
    fn not_found_with_chart_error_is_no_data() {
        let series = classify(StatusCode::NOT_FOUND, NOT_FOUND_BODY, day(1, 1), day(3, 1)).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn not_found_without_chart_error_is_a_status_error() {
        let err = classify(StatusCode::NOT_FOUND, "<html>404</html>", day(1, 1), day(3, 1)).unwrap_err();
        assert!(matches!(err, FetchError::Status(s) if s == StatusCode::NOT_FOUND));

        let no_error = r#"{"chart":{"result":null,"error":null}}"#;
        let err = classify(StatusCode::NOT_FOUND, no_error, day(1, 1), day(3, 1)).unwrap_err();
        assert!(matches!(err, FetchError::Status(s) if s == StatusCode::NOT_FOUND));
    }

    #[test]
    fn server_error_is_a_status_error() {
        let err = classify(StatusCode::INTERNAL_SERVER_ERROR, NOT_FOUND_BODY, day(1, 1), day(3, 1)).unwrap_err();
        assert!(matches!(err, FetchError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn success_decodes_the_payload() {
        let series = classify(StatusCode::OK, PAYLOAD, day(2, 1), day(3, 31)).unwrap();
        assert_eq!(series.len(), 2);

        let err = classify(StatusCode::OK, "<html>", day(2, 1), day(3, 31)).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_chart("<html>", day(1, 1), day(3, 1)).is_err());
    }

    #[test]
    fn builds_inclusive_window_url() {
        let source = YahooSource::new("https://example.test/", "test-agent").unwrap();
        let url = source.build_url("AAPL", day(3, 1), day(3, 2));
        assert_eq!(
            url,
            "https://example.test/v8/finance/chart/AAPL?period1=1709251200&period2=1709424000&interval=1d"
        );
    }

    #[tokio::test]
    async fn inverted_window_is_rejected_before_any_request() {
        let source = YahooSource::new("http://127.0.0.1:9", "test-agent").unwrap();
        let err = source.fetch("AAPL", day(3, 2), day(3, 1)).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidWindow { .. }));
    }
}
