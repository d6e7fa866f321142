use chrono::NaiveDate;
use thiserror::Error;

/// Denominators guarded by the derived-metric formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Denominator {
    HealthyBirds,
    FeedConsumed,
    EggMass,
}

impl std::fmt::Display for Denominator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Denominator::HealthyBirds => "healthy_birds",
            Denominator::FeedConsumed => "feed_consumed_kg",
            Denominator::EggMass => "total_eggs * avg_egg_weight_g",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    /// A ratio denominator was zero, negative or not finite.
    #[error("division by {denominator} = {value} on {date}")]
    Division {
        date: NaiveDate,
        denominator: Denominator,
        value: f64,
    },
    #[error("invalid generator configuration: {0}")]
    Configuration(String),
    #[error("insufficient data: need {needed} records, have {available}")]
    InsufficientData { needed: usize, available: usize },
}

pub type MetricsResult<T> = Result<T, MetricsError>;
