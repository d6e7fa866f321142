//! Synthetic daily flock metrics.
//!
//! Every base field except feed and water follows a linear trend in the day
//! index `i` (0 = oldest day of the window). Feed and water add Gaussian
//! noise drawn from an injected RNG so a seed reproduces a dataset exactly.

use std::f64::consts::TAU;

use chrono::{Days, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{Denominator, MetricsError, MetricsResult};
use crate::fixtures::DAILY_EGG_YIELD;
use crate::types::{BaseReading, DailyRecord, Dataset};

pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Where daily egg counts come from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "kebab-case")]
pub enum EggYield {
    /// The hand-written 30-day reference table, indexed by day.
    #[default]
    Fixture,
    /// `base + daily_gain * i + weekly_amplitude * sin(2*pi*i/7)`, rounded.
    Parametric {
        base: f64,
        #[serde(rename = "daily-gain")]
        daily_gain: f64,
        #[serde(rename = "weekly-amplitude")]
        weekly_amplitude: f64,
    },
}

impl EggYield {
    fn max_window(&self) -> Option<usize> {
        match self {
            EggYield::Fixture => Some(DAILY_EGG_YIELD.len()),
            EggYield::Parametric { .. } => None,
        }
    }

    fn eggs_on_day(&self, i: usize) -> MetricsResult<u32> {
        match self {
            EggYield::Fixture => DAILY_EGG_YIELD.get(i).copied().ok_or_else(|| {
                MetricsError::Configuration(format!(
                    "egg fixture only covers {} days (day {i} requested)",
                    DAILY_EGG_YIELD.len()
                ))
            }),
            EggYield::Parametric {
                base,
                daily_gain,
                weekly_amplitude,
            } => {
                let x = i as f64;
                let eggs = base + daily_gain * x + weekly_amplitude * (TAU * x / 7.0).sin();
                if !eggs.is_finite() {
                    return Err(MetricsError::Configuration(format!(
                        "parametric egg yield is not finite on day {i}"
                    )));
                }
                Ok(eggs.round().clamp(0.0, f64::from(u32::MAX)) as u32)
            }
        }
    }
}

/// Trend parameters. Defaults reproduce the reference dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TrendConfig {
    pub egg_yield: EggYield,

    pub healthy_birds_start: u32,
    pub healthy_birds_daily_loss: u32,

    pub feed_base_kg: f64,
    /// Standard deviation of the per-day feed noise.
    pub feed_noise_kg: f64,

    pub mortality_start_pct: f64,
    pub mortality_daily_increase_pct: f64,

    pub sick_start: u32,
    pub sick_daily_increase: u32,

    pub health_score_start: f64,
    pub health_score_daily_decrease: f64,

    pub bird_weight_start_kg: f64,
    pub bird_weight_daily_gain_kg: f64,

    pub uniformity_start_pct: f64,
    pub uniformity_daily_decrease_pct: f64,

    pub water_base_l: f64,
    pub water_noise_l: f64,

    pub egg_weight_start_g: f64,
    pub egg_weight_daily_gain_g: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            egg_yield: EggYield::Fixture,
            healthy_birds_start: 100_000,
            healthy_birds_daily_loss: 10,
            feed_base_kg: 12_000.0,
            feed_noise_kg: 100.0,
            mortality_start_pct: 0.1,
            mortality_daily_increase_pct: 0.001,
            sick_start: 45,
            sick_daily_increase: 1,
            health_score_start: 8.5,
            health_score_daily_decrease: 0.02,
            bird_weight_start_kg: 1.8,
            bird_weight_daily_gain_kg: 0.01,
            uniformity_start_pct: 85.0,
            uniformity_daily_decrease_pct: 0.1,
            water_base_l: 20_000.0,
            water_noise_l: 200.0,
            egg_weight_start_g: 60.0,
            egg_weight_daily_gain_g: 0.1,
        }
    }
}

impl TrendConfig {
    /// Checks that do not depend on the window length.
    pub fn validate(&self) -> MetricsResult<()> {
        for (name, sd) in [
            ("feed-noise-kg", self.feed_noise_kg),
            ("water-noise-l", self.water_noise_l),
        ] {
            if !(sd.is_finite() && sd >= 0.0) {
                return Err(MetricsError::Configuration(format!(
                    "{name} must be a finite, non-negative standard deviation (got {sd})"
                )));
            }
        }
        Ok(())
    }

    pub fn validate_window(&self, window_days: u32) -> MetricsResult<()> {
        if window_days == 0 {
            return Err(MetricsError::Configuration(
                "window must cover at least one day".into(),
            ));
        }
        if let Some(max) = self.egg_yield.max_window() {
            if window_days as usize > max {
                return Err(MetricsError::Configuration(format!(
                    "fixture egg yield covers {max} days but the window is {window_days}; \
                     use a parametric egg yield for longer windows"
                )));
            }
        }
        self.validate()
    }

    fn healthy_birds_on_day(&self, date: NaiveDate, i: usize) -> MetricsResult<u32> {
        let birds = i64::from(self.healthy_birds_start)
            - i64::from(self.healthy_birds_daily_loss) * i as i64;
        if birds <= 0 {
            return Err(MetricsError::Division {
                date,
                denominator: Denominator::HealthyBirds,
                value: birds as f64,
            });
        }
        u32::try_from(birds).map_err(|_| {
            MetricsError::Configuration(format!("healthy bird count {birds} out of range"))
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct MetricsGenerator {
    trend: TrendConfig,
}

impl MetricsGenerator {
    pub fn new(trend: TrendConfig) -> Self {
        Self { trend }
    }

    pub fn trend(&self) -> &TrendConfig {
        &self.trend
    }

    /// Generate `window_days` records ending at `end_date` (inclusive).
    ///
    /// With `seed` set the noise draws are reproducible; otherwise the RNG is
    /// seeded from OS entropy.
    pub fn generate(
        &self,
        window_days: u32,
        end_date: NaiveDate,
        seed: Option<u64>,
    ) -> MetricsResult<Dataset> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with_rng(window_days, end_date, &mut rng)
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        window_days: u32,
        end_date: NaiveDate,
        rng: &mut R,
    ) -> MetricsResult<Dataset> {
        let cfg = &self.trend;
        cfg.validate_window(window_days)?;
        tracing::debug!(window_days, %end_date, "generating flock metrics");

        let n = window_days as usize;
        let start = end_date
            .checked_sub_days(Days::new(u64::from(window_days - 1)))
            .ok_or_else(|| {
                MetricsError::Configuration(format!(
                    "window of {window_days} days ending {end_date} starts before the calendar"
                ))
            })?;

        let feed_noise = normal(cfg.feed_noise_kg)?;
        let water_noise = normal(cfg.water_noise_l)?;
        // All feed draws first, then all water draws.
        let feed: Vec<f64> = (0..n).map(|_| cfg.feed_base_kg + feed_noise.sample(&mut *rng)).collect();
        let water: Vec<f64> = (0..n).map(|_| cfg.water_base_l + water_noise.sample(&mut *rng)).collect();

        let mut records = Vec::with_capacity(n);
        for (i, date) in start.iter_days().take(n).enumerate() {
            let x = i as f64;
            let step = i as u32;
            let base = BaseReading {
                date,
                total_eggs: cfg.egg_yield.eggs_on_day(i)?,
                healthy_birds: cfg.healthy_birds_on_day(date, i)?,
                feed_consumed_kg: feed[i],
                mortality_rate_pct: cfg.mortality_start_pct + x * cfg.mortality_daily_increase_pct,
                sick_count: cfg
                    .sick_start
                    .saturating_add(step.saturating_mul(cfg.sick_daily_increase)),
                health_score: cfg.health_score_start - x * cfg.health_score_daily_decrease,
                avg_bird_weight_kg: cfg.bird_weight_start_kg + x * cfg.bird_weight_daily_gain_kg,
                uniformity_pct: cfg.uniformity_start_pct - x * cfg.uniformity_daily_decrease_pct,
                water_consumed_l: water[i],
                avg_egg_weight_g: cfg.egg_weight_start_g + x * cfg.egg_weight_daily_gain_g,
            };
            records.push(DailyRecord::from_base(base)?);
        }

        Dataset::new(records)
    }
}

fn normal(std_dev: f64) -> MetricsResult<Normal<f64>> {
    Normal::new(0.0, std_dev)
        .map_err(|e| MetricsError::Configuration(format!("noise distribution: {e}")))
}

/// Generate with the reference trends.
///
/// `end_date` defaults to today (local time).
pub fn generate(
    window_days: u32,
    end_date: Option<NaiveDate>,
    seed: Option<u64>,
) -> MetricsResult<Dataset> {
    let end_date = end_date.unwrap_or_else(|| Local::now().date_naive());
    MetricsGenerator::default().generate(window_days, end_date, seed)
}
