use crate::model::{PredictError, PriceSeries, Prediction};

/// Exponential moving average, seeded with the first observation
/// (pandas `ewm(span, adjust=False)`).
///
///   bar 0  -> value = price
///   bar 1+ -> value = a*price + (1-a)*prev, a = 2/(span+1)
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(span: usize) -> Result<Self, PredictError> {
        if span == 0 {
            return Err(PredictError::InvalidSpan);
        }
        Ok(Self {
            alpha: 2.0 / (span as f64 + 1.0),
            value: None,
        })
    }

    /// Feeds one price, returns the current EMA value.
    pub fn update(&mut self, price: f64) -> f64 {
        let next = match self.value {
            None => price,
            Some(prev) => self.alpha * price + (1.0 - self.alpha) * prev,
        };
        self.value = Some(next);
        next
    }

    /// Full EMA curve over `prices`.
    pub fn curve(span: usize, prices: &[f64]) -> Result<Vec<f64>, PredictError> {
        let mut ema = Self::new(span)?;
        Ok(prices.iter().map(|&p| ema.update(p)).collect())
    }
}

/// Arithmetic mean of day-over-day fractional changes.
pub fn mean_daily_return(prices: &[f64]) -> Result<f64, PredictError> {
    if prices.len() < 2 {
        return Err(PredictError::NotEnoughData { len: prices.len() });
    }
    let total: f64 = prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).sum();
    Ok(total / (prices.len() - 1) as f64)
}

/// Compounds the last EMA forward at the mean daily return.
#[derive(Debug, Clone, Copy)]
pub struct TrendPredictor {
    pub span: usize,
    pub horizon_days: u32,
}

impl Default for TrendPredictor {
    fn default() -> Self {
        Self { span: 20, horizon_days: 30 }
    }
}

impl TrendPredictor {
    pub fn new(span: usize, horizon_days: u32) -> Self {
        Self { span, horizon_days }
    }

    pub fn predict(&self, series: &PriceSeries) -> Result<Prediction, PredictError> {
        self.predict_closes(&series.closes())
    }

    pub fn predict_closes(&self, closes: &[f64]) -> Result<Prediction, PredictError> {
        if closes.len() < 2 {
            return Err(PredictError::NotEnoughData { len: closes.len() });
        }
        // every close but the last is a return denominator
        let last = closes.len() - 1;
        if let Some((index, &value)) = closes
            .iter()
            .enumerate()
            .find(|&(i, p)| !p.is_finite() || (i < last && *p <= 0.0))
        {
            return Err(PredictError::NonPositivePrice { index, value });
        }
        let horizon = i32::try_from(self.horizon_days).map_err(|_| PredictError::InvalidHorizon(self.horizon_days))?;

        let curve = Ema::curve(self.span, closes)?;
        let last_ema = curve[curve.len() - 1];
        let mean_daily_return = mean_daily_return(closes)?;
        let forecast = last_ema * (1.0 + mean_daily_return).powi(horizon);

        Ok(Prediction {
            last_ema,
            mean_daily_return,
            forecast,
        })
    }
}
