use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MetricsError, MetricsResult};
use crate::metrics::derived::DerivedMetrics;

/// Raw synthetic readings for one day, before any ratio is derived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseReading {
    pub date: NaiveDate,
    pub total_eggs: u32,
    pub healthy_birds: u32,
    pub feed_consumed_kg: f64,
    pub mortality_rate_pct: f64,
    pub sick_count: u32,
    /// 0-10 scale.
    pub health_score: f64,
    pub avg_bird_weight_kg: f64,
    pub uniformity_pct: f64,
    pub water_consumed_l: f64,
    pub avg_egg_weight_g: f64,
}

/// One day of readings plus the ratios derived from them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub total_eggs: u32,
    pub healthy_birds: u32,
    pub feed_consumed_kg: f64,
    pub mortality_rate_pct: f64,
    pub sick_count: u32,
    pub health_score: f64,
    pub avg_bird_weight_kg: f64,
    pub uniformity_pct: f64,
    pub water_consumed_l: f64,
    pub avg_egg_weight_g: f64,

    pub hen_day_production_pct: f64,
    pub feed_conversion_ratio: f64,
    pub water_feed_ratio: f64,
}

impl DailyRecord {
    /// Derive the ratio fields from `base`, failing on a zero denominator.
    pub fn from_base(base: BaseReading) -> MetricsResult<Self> {
        let derived = DerivedMetrics::compute(&base)?;
        Ok(Self {
            date: base.date,
            total_eggs: base.total_eggs,
            healthy_birds: base.healthy_birds,
            feed_consumed_kg: base.feed_consumed_kg,
            mortality_rate_pct: base.mortality_rate_pct,
            sick_count: base.sick_count,
            health_score: base.health_score,
            avg_bird_weight_kg: base.avg_bird_weight_kg,
            uniformity_pct: base.uniformity_pct,
            water_consumed_l: base.water_consumed_l,
            avg_egg_weight_g: base.avg_egg_weight_g,
            hen_day_production_pct: derived.hen_day_production_pct,
            feed_conversion_ratio: derived.feed_conversion_ratio,
            water_feed_ratio: derived.water_feed_ratio,
        })
    }

    pub fn base(&self) -> BaseReading {
        BaseReading {
            date: self.date,
            total_eggs: self.total_eggs,
            healthy_birds: self.healthy_birds,
            feed_consumed_kg: self.feed_consumed_kg,
            mortality_rate_pct: self.mortality_rate_pct,
            sick_count: self.sick_count,
            health_score: self.health_score,
            avg_bird_weight_kg: self.avg_bird_weight_kg,
            uniformity_pct: self.uniformity_pct,
            water_consumed_l: self.water_consumed_l,
            avg_egg_weight_g: self.avg_egg_weight_g,
        }
    }

    pub fn derived(&self) -> DerivedMetrics {
        DerivedMetrics {
            hen_day_production_pct: self.hen_day_production_pct,
            feed_conversion_ratio: self.feed_conversion_ratio,
            water_feed_ratio: self.water_feed_ratio,
        }
    }
}

/// Every record of one window, ascending by date. Read-only once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dataset {
    records: Vec<DailyRecord>,
}

impl Dataset {
    /// Wrap `records`, checking they form a gapless ascending day sequence
    /// and that every stored ratio matches its base readings.
    pub fn new(records: Vec<DailyRecord>) -> MetricsResult<Self> {
        if records.is_empty() {
            return Err(MetricsError::Configuration(
                "a dataset needs at least one record".into(),
            ));
        }
        for r in &records {
            let expected = DerivedMetrics::compute(&r.base())?;
            if !expected.matches(&r.derived()) {
                return Err(MetricsError::Configuration(format!(
                    "derived metrics on {} do not match the base readings",
                    r.date
                )));
            }
        }
        for pair in records.windows(2) {
            if pair[0].date.succ_opt() != Some(pair[1].date) {
                return Err(MetricsError::Configuration(format!(
                    "dates must be consecutive: {} followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// The most recent record and the one before it.
    pub fn latest_pair(&self) -> MetricsResult<(&DailyRecord, &DailyRecord)> {
        match self.records.as_slice() {
            [.., previous, latest] => Ok((latest, previous)),
            _ => Err(MetricsError::InsufficientData {
                needed: 2,
                available: self.records.len(),
            }),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DailyRecord;
    type IntoIter = std::slice::Iter<'a, DailyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
