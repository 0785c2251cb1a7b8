// Fetcher module: price source seam and the Yahoo Finance client.

pub mod traits;
pub mod yahoo;

pub use traits::PriceSource;
pub use yahoo::YahooSource;
