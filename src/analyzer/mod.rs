// Analyzer module: trend prediction and the projection line built from it.

pub mod projection;
pub mod trend;

pub use projection::expand_projection;
pub use trend::TrendPredictor;
