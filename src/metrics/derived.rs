//! Ratio metrics derived row-wise from the base readings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Denominator, MetricsError, MetricsResult};
use crate::types::BaseReading;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Eggs per 100 healthy birds.
    pub hen_day_production_pct: f64,
    /// kg feed per kg eggs.
    pub feed_conversion_ratio: f64,
    /// Litres water per kg feed.
    pub water_feed_ratio: f64,
}

/// Allowed drift between a stored ratio and its recomputation.
pub const RATIO_TOLERANCE: f64 = 1e-9;

impl DerivedMetrics {
    pub fn matches(&self, other: &DerivedMetrics) -> bool {
        close(self.hen_day_production_pct, other.hen_day_production_pct)
            && close(self.feed_conversion_ratio, other.feed_conversion_ratio)
            && close(self.water_feed_ratio, other.water_feed_ratio)
    }

    pub fn compute(base: &BaseReading) -> MetricsResult<Self> {
        Ok(Self {
            hen_day_production_pct: hen_day_production_pct(
                base.date,
                base.total_eggs,
                base.healthy_birds,
            )?,
            feed_conversion_ratio: feed_conversion_ratio(
                base.date,
                base.feed_consumed_kg,
                base.total_eggs,
                base.avg_egg_weight_g,
            )?,
            water_feed_ratio: water_feed_ratio(
                base.date,
                base.water_consumed_l,
                base.feed_consumed_kg,
            )?,
        })
    }
}

pub fn hen_day_production_pct(
    date: NaiveDate,
    total_eggs: u32,
    healthy_birds: u32,
) -> MetricsResult<f64> {
    let birds = checked_denominator(date, Denominator::HealthyBirds, f64::from(healthy_birds))?;
    Ok(f64::from(total_eggs) / birds * 100.0)
}

pub fn feed_conversion_ratio(
    date: NaiveDate,
    feed_consumed_kg: f64,
    total_eggs: u32,
    avg_egg_weight_g: f64,
) -> MetricsResult<f64> {
    // Egg mass in kg: eggs * grams / 1000.
    let egg_mass_kg = checked_denominator(
        date,
        Denominator::EggMass,
        f64::from(total_eggs) * avg_egg_weight_g,
    )? / 1000.0;
    Ok(feed_consumed_kg / egg_mass_kg)
}

pub fn water_feed_ratio(
    date: NaiveDate,
    water_consumed_l: f64,
    feed_consumed_kg: f64,
) -> MetricsResult<f64> {
    let feed = checked_denominator(date, Denominator::FeedConsumed, feed_consumed_kg)?;
    Ok(water_consumed_l / feed)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= RATIO_TOLERANCE
}

fn checked_denominator(date: NaiveDate, denominator: Denominator, value: f64) -> MetricsResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MetricsError::Division {
            date,
            denominator,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn hen_day_production_is_eggs_per_hundred_birds() {
        let hdp = hen_day_production_pct(day(), 85_000, 100_000).unwrap();
        assert!((hdp - 85.0).abs() < 1e-12);
    }

    #[test]
    fn feed_conversion_uses_egg_mass_in_kg() {
        // 1000 eggs * 60 g = 60 kg of eggs; 120 kg feed => FCR 2.0
        let fcr = feed_conversion_ratio(day(), 120.0, 1_000, 60.0).unwrap();
        assert!((fcr - 2.0).abs() < 1e-12);
    }

    #[test]
    fn zero_birds_is_a_division_error() {
        let err = hen_day_production_pct(day(), 10, 0).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::Division {
                denominator: Denominator::HealthyBirds,
                ..
            }
        ));
    }

    #[test]
    fn zero_egg_mass_is_a_division_error() {
        assert!(matches!(
            feed_conversion_ratio(day(), 120.0, 0, 60.0),
            Err(MetricsError::Division {
                denominator: Denominator::EggMass,
                ..
            })
        ));
        assert!(matches!(
            feed_conversion_ratio(day(), 120.0, 1_000, 0.0),
            Err(MetricsError::Division { .. })
        ));
    }

    #[test]
    fn non_positive_or_nan_feed_is_rejected() {
        for feed in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                water_feed_ratio(day(), 20_000.0, feed),
                Err(MetricsError::Division {
                    denominator: Denominator::FeedConsumed,
                    ..
                })
            ));
        }
    }
}
