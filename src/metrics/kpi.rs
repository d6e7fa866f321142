//! Headline KPIs: latest value plus the day-over-day delta.

use serde::Serialize;

use crate::error::MetricsResult;
use crate::types::{DailyRecord, Dataset};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiFormat {
    /// Thousands-separated integer.
    Count,
    /// One decimal with a percent sign.
    Percent1,
    /// Two decimals.
    Ratio2,
    /// Two decimals with a percent sign.
    Percent2,
}

impl KpiFormat {
    pub fn render(self, v: f64) -> String {
        match self {
            KpiFormat::Count => group_thousands(v),
            KpiFormat::Percent1 => format!("{v:.1}%"),
            KpiFormat::Ratio2 => format!("{v:.2}"),
            KpiFormat::Percent2 => format!("{v:.2}%"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Kpi {
    pub label: &'static str,
    pub value: f64,
    pub delta: f64,
    pub format: KpiFormat,
    pub display_value: String,
    pub display_delta: String,
}

impl Kpi {
    fn compare(
        label: &'static str,
        format: KpiFormat,
        latest: &DailyRecord,
        previous: &DailyRecord,
        field: impl Fn(&DailyRecord) -> f64,
    ) -> Self {
        let value = field(latest);
        let delta = value - field(previous);
        Self {
            label,
            value,
            delta,
            format,
            display_value: format.render(value),
            display_delta: format.render(delta),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeadlineMetrics {
    pub daily_eggs: Kpi,
    pub hen_day_production: Kpi,
    pub feed_conversion: Kpi,
    pub mortality: Kpi,
}

impl HeadlineMetrics {
    /// Needs two records; a one-day window yields `InsufficientData`.
    pub fn from_dataset(dataset: &Dataset) -> MetricsResult<Self> {
        let (latest, previous) = dataset.latest_pair()?;
        Ok(Self {
            daily_eggs: Kpi::compare("Daily Egg Production", KpiFormat::Count, latest, previous, |r| {
                f64::from(r.total_eggs)
            }),
            hen_day_production: Kpi::compare("HDP (%)", KpiFormat::Percent1, latest, previous, |r| {
                r.hen_day_production_pct
            }),
            feed_conversion: Kpi::compare("FCR", KpiFormat::Ratio2, latest, previous, |r| {
                r.feed_conversion_ratio
            }),
            mortality: Kpi::compare("Mortality", KpiFormat::Percent2, latest, previous, |r| {
                r.mortality_rate_pct
            }),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Kpi> {
        [
            &self.daily_eggs,
            &self.hen_day_production,
            &self.feed_conversion,
            &self.mortality,
        ]
        .into_iter()
    }
}

fn group_thousands(v: f64) -> String {
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricsError;
    use crate::metrics::generator::generate;
    use chrono::NaiveDate;

    fn june_30() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 6, 30)
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(85_000.0), "85,000");
        assert_eq!(group_thousands(100.0), "100");
        assert_eq!(group_thousands(-1_234_567.4), "-1,234,567");
        assert_eq!(group_thousands(0.0), "0");
    }

    #[test]
    fn egg_delta_compares_last_two_days() {
        let ds = generate(30, june_30(), Some(42)).unwrap();
        let kpis = HeadlineMetrics::from_dataset(&ds).unwrap();
        assert_eq!(kpis.daily_eggs.display_value, "85,000");
        assert_eq!(kpis.daily_eggs.display_delta, "100");
        assert!(kpis.mortality.display_value.ends_with('%'));
        assert!((kpis.mortality.delta - 0.001).abs() < 1e-9);
    }

    #[test]
    fn single_day_has_no_delta() {
        let ds = generate(1, june_30(), Some(42)).unwrap();
        assert_eq!(
            HeadlineMetrics::from_dataset(&ds),
            Err(MetricsError::InsufficientData {
                needed: 2,
                available: 1
            })
        );
    }
}
