use crate::model::{FetchError, PriceSeries};
use chrono::NaiveDate;

/// Source of daily price history. An unknown ticker or a window without
/// trading days is an empty series, not an error.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, FetchError>;
}
