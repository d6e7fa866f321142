//! One dashboard render pass.
//!
//! Each render builds a fresh [`Dataset`] and everything the page shows is
//! derived from it. Nothing survives the pass.

use chrono::NaiveDate;
use serde::Serialize;

use crate::charts::ChartData;
use crate::config::Config;
use crate::error::{MetricsError, MetricsResult};
use crate::export::{DisplayTable, DATE_FORMAT};
use crate::metrics::generator::MetricsGenerator;
use crate::metrics::kpi::HeadlineMetrics;
use crate::types::Dataset;

#[derive(Clone, Debug, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub subtitle: String,
    pub farms: Vec<String>,
    pub selected_date: NaiveDate,
    /// Noise seed this render used; the download link replays it.
    pub seed: u64,
    pub csv_url: String,
    /// `None` when the window has fewer than two days.
    pub headline: Option<HeadlineMetrics>,
    pub charts: ChartData,
    pub table: DisplayTable,
}

impl DashboardView {
    /// Render with the configured seed, or a freshly drawn one when unset.
    pub fn render(config: &Config, today: NaiveDate) -> MetricsResult<Self> {
        Self::render_with_seed(config, today, resolve_seed(config, None))
    }

    pub fn render_with_seed(config: &Config, today: NaiveDate, seed: u64) -> MetricsResult<Self> {
        let dataset = render_dataset(config, today, seed)?;
        Self::from_dataset(config, today, seed, &dataset)
    }

    pub fn from_dataset(
        config: &Config,
        today: NaiveDate,
        seed: u64,
        dataset: &Dataset,
    ) -> MetricsResult<Self> {
        let headline = match HeadlineMetrics::from_dataset(dataset) {
            Ok(h) => Some(h),
            Err(MetricsError::InsufficientData { .. }) => None,
            Err(e) => return Err(e),
        };
        Ok(Self {
            title: config.dashboard.title.clone(),
            subtitle: config.dashboard.subtitle.clone(),
            farms: config.dashboard.farms.clone(),
            selected_date: today,
            seed,
            csv_url: csv_url(today, seed),
            headline,
            charts: ChartData::from_dataset(dataset),
            table: DisplayTable::from_dataset(dataset),
        })
    }
}

/// An explicit request seed wins, then the configured one, then a random draw.
pub fn resolve_seed(config: &Config, requested: Option<u64>) -> u64 {
    requested
        .or(config.dashboard.seed)
        .unwrap_or_else(rand::random)
}

pub fn csv_url(date: NaiveDate, seed: u64) -> String {
    format!("/download.csv?date={}&seed={seed}", date.format(DATE_FORMAT))
}

/// The dataset a render pass for `today` with `seed` works from.
pub fn render_dataset(config: &Config, today: NaiveDate, seed: u64) -> MetricsResult<Dataset> {
    MetricsGenerator::new(config.trend.clone()).generate(
        config.dashboard.window_days,
        today,
        Some(seed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::to_csv_bytes;

    fn june_30() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn renders_all_sections() {
        let view = DashboardView::render(&Config::sample(), june_30()).unwrap();
        assert!(view.headline.is_some());
        assert_eq!(view.table.rows.len(), 30);
        assert_eq!(view.farms.len(), 3);
        assert_eq!(view.charts.production.dates.last(), Some(&june_30()));
    }

    #[test]
    fn one_day_window_renders_without_headline() {
        let mut config = Config::sample();
        config.dashboard.window_days = 1;
        let view = DashboardView::render(&config, june_30()).unwrap();
        assert!(view.headline.is_none());
        assert_eq!(view.table.rows.len(), 1);
    }

    #[test]
    fn download_replays_the_rendered_table() {
        // No configured seed: the render draws one and must hand it out.
        let config = Config::sample();
        assert_eq!(config.dashboard.seed, None);
        let view = DashboardView::render(&config, june_30()).unwrap();
        assert_eq!(
            view.csv_url,
            format!("/download.csv?date=2024-06-30&seed={}", view.seed)
        );

        let ds = render_dataset(&config, view.selected_date, view.seed).unwrap();
        let csv = String::from_utf8(to_csv_bytes(&ds).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), view.table.rows.len() + 1);
        assert_eq!(lines[0], view.table.headers.join(","));
        for (line, row) in lines[1..].iter().zip(&view.table.rows) {
            assert_eq!(*line, row.join(","));
        }
    }

    #[test]
    fn request_seed_overrides_config() {
        let mut config = Config::sample();
        config.dashboard.seed = Some(7);
        assert_eq!(resolve_seed(&config, None), 7);
        assert_eq!(resolve_seed(&config, Some(9)), 9);
    }
}
