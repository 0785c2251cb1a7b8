use crate::model::ProjectionPoint;
use chrono::{Days, NaiveDate};

/// Flat projection line: `days` consecutive calendar days after `last_date`,
/// every point at `forecast`.
pub fn expand_projection(forecast: f64, last_date: NaiveDate, days: u32) -> Vec<ProjectionPoint> {
    (1..=u64::from(days))
        .map_while(|offset| last_date.checked_add_days(Days::new(offset)))
        .map(|date| ProjectionPoint { date, value: forecast })
        .collect()
}
