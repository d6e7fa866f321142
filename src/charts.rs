//! Chart-ready series. The page draws them; nothing here renders.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::Dataset;

pub const WEIGHT_HISTOGRAM_BINS: usize = 20;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductionTrend {
    pub dates: Vec<NaiveDate>,
    pub total_eggs: Vec<u32>,
}

/// Health score on the primary axis, mortality on the secondary one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HealthSeries {
    pub dates: Vec<NaiveDate>,
    pub health_score: Vec<f64>,
    pub mortality_rate_pct: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Equal-width bins over `[min, max]`; the last bin includes `max`.
    ///
    /// Non-finite values are skipped. Identical values collapse into one bin.
    pub fn equal_width(values: &[f64], max_bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || max_bins == 0 {
            return Self { bins: Vec::new() };
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == min {
            return Self {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: finite.len(),
                }],
            };
        }

        let width = (max - min) / max_bins as f64;
        let mut bins: Vec<HistogramBin> = (0..max_bins)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: if i + 1 == max_bins {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();
        for v in finite {
            let idx = (((v - min) / width) as usize).min(max_bins - 1);
            bins[idx].count += 1;
        }
        Self { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartData {
    pub production: ProductionTrend,
    pub health: HealthSeries,
    pub bird_weight: Histogram,
}

impl ChartData {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let dates: Vec<NaiveDate> = dataset.iter().map(|r| r.date).collect();
        let weights: Vec<f64> = dataset.iter().map(|r| r.avg_bird_weight_kg).collect();
        Self {
            production: ProductionTrend {
                dates: dates.clone(),
                total_eggs: dataset.iter().map(|r| r.total_eggs).collect(),
            },
            health: HealthSeries {
                dates,
                health_score: dataset.iter().map(|r| r.health_score).collect(),
                mortality_rate_pct: dataset.iter().map(|r| r.mortality_rate_pct).collect(),
            },
            bird_weight: Histogram::equal_width(&weights, WEIGHT_HISTOGRAM_BINS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::generator::generate;

    #[test]
    fn histogram_counts_every_record() {
        let ds = generate(30, NaiveDate::from_ymd_opt(2024, 6, 30), Some(3)).unwrap();
        let charts = ChartData::from_dataset(&ds);
        assert_eq!(charts.bird_weight.bins.len(), WEIGHT_HISTOGRAM_BINS);
        assert_eq!(charts.bird_weight.total(), 30);
        assert_eq!(charts.production.dates.len(), 30);
        assert_eq!(charts.health.mortality_rate_pct.len(), 30);
    }

    #[test]
    fn max_value_lands_in_last_bin() {
        let h = Histogram::equal_width(&[0.0, 0.5, 1.0, 10.0], 5);
        assert_eq!(h.bins.len(), 5);
        assert_eq!(h.bins[0].count, 3);
        assert_eq!(h.bins[4].count, 1);
        assert_eq!(h.bins[4].upper, 10.0);
    }

    #[test]
    fn identical_values_use_one_bin() {
        let h = Histogram::equal_width(&[1.8], WEIGHT_HISTOGRAM_BINS);
        assert_eq!(h.bins.len(), 1);
        assert_eq!(h.total(), 1);
    }
}
