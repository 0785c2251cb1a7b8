// Dashboard: runs one selection through fetch -> predict -> render.
pub mod chart;

use crate::analyzer::{expand_projection, TrendPredictor};
use crate::config::AppConfig;
use crate::directory::SymbolEntry;
use crate::fetcher::PriceSource;
use crate::model::{FetchError, PriceSeries, Prediction, ProjectionPoint};
use chart::{render_chart, ChartStyle, Segment};

use chrono::{Days, Duration, NaiveDate};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{info, warn};

pub const TITLE: &str = "Stock Tracker - Last Two Months History and One-Month Prediction";

/// Everything one render pass needs for a selected company.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub company: &'static str,
    pub ticker: &'static str,
    pub history: PriceSeries,
    pub prediction: Option<Prediction>,
    pub projection: Vec<ProjectionPoint>,
}

pub struct Dashboard<S: PriceSource> {
    source: S,
    predictor: TrendPredictor,
    history_days: i64,
    style: ChartStyle,
}

impl<S: PriceSource> Dashboard<S> {
    pub fn new(source: S, config: &AppConfig) -> Self {
        Self {
            source,
            predictor: TrendPredictor::new(config.ema_span, config.horizon_days),
            history_days: config.history_days,
            style: ChartStyle {
                width: config.chart_width,
                height: config.chart_height,
            },
        }
    }

    /// Fetches the trailing window ending `today` and derives the forecast.
    /// `Ok(None)` means the provider had no data.
    pub async fn load(&self, entry: SymbolEntry, today: NaiveDate) -> Result<Option<Report>, FetchError> {
        let start = u64::try_from(self.history_days)
            .ok()
            .and_then(|days| today.checked_sub_days(Days::new(days)))
            .ok_or(FetchError::WindowOutOfRange {
                days: self.history_days,
                end: today,
            })?;
        info!("Fetching {} ({}) from {} to {}", entry.display_name, entry.ticker, start, today);

        let history = self.source.fetch(entry.ticker, start, today).await?;
        if history.is_empty() {
            info!("No data for {}", entry.ticker);
            return Ok(None);
        }

        let (prediction, projection) = match self.predictor.predict(&history) {
            Ok(p) => {
                info!(
                    "Prediction for {}: last EMA {:.4}, mean daily return {:.6}, forecast {:.4}",
                    entry.ticker, p.last_ema, p.mean_daily_return, p.forecast
                );
                let projection = history
                    .last_date()
                    .map(|last| expand_projection(p.forecast, last, self.predictor.horizon_days))
                    .unwrap_or_default();
                (Some(p), projection)
            }
            Err(e) => {
                warn!("Skipping prediction for {}: {}", entry.ticker, e);
                (None, Vec::new())
            }
        };

        Ok(Some(Report {
            company: entry.display_name,
            ticker: entry.ticker,
            history,
            prediction,
            projection,
        }))
    }

    pub fn render_text<W: Write>(&self, report: Option<&Report>, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", TITLE)?;
        writeln!(out)?;

        let Some(report) = report else {
            return Ok(());
        };

        let history: Vec<(NaiveDate, f64)> = report.history.records().iter().map(|r| (r.date, r.close)).collect();

        writeln!(out, "Last Two Months History for {} ({})", report.company, report.ticker)?;
        write!(out, "{}", render_chart(&[Segment::new('*', history.clone())], self.style))?;
        writeln!(out)?;

        let Some(prediction) = report.prediction else {
            return Ok(());
        };

        writeln!(out, "One-Month Price Prediction: {:.2}", prediction.forecast)?;
        writeln!(out)?;

        let projection: Vec<(NaiveDate, f64)> = report.projection.iter().map(|p| (p.date, p.value)).collect();
        writeln!(
            out,
            "Historical Data with One-Month Prediction for {} ({})",
            report.company, report.ticker
        )?;
        write!(
            out,
            "{}",
            render_chart(&[Segment::new('*', history), Segment::new('-', projection)], self.style)
        )?;
        Ok(())
    }
}

/// JSON form of a render pass. The no-data state keeps the selection and
/// leaves everything else empty.
pub fn render_json<W: Write>(entry: SymbolEntry, report: Option<&Report>, out: &mut W) -> Result<(), serde_json::Error> {
    match report {
        Some(report) => serde_json::to_writer_pretty(&mut *out, report)?,
        None => serde_json::to_writer_pretty(
            &mut *out,
            &Report {
                company: entry.display_name,
                ticker: entry.ticker,
                history: PriceSeries::default(),
                prediction: None,
                projection: Vec::new(),
            },
        )?,
    }
    writeln!(out).map_err(serde_json::Error::io)
}
