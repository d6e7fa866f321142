//! Display table and its CSV download.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use crate::types::{DailyRecord, Dataset};

pub const CSV_FILE_NAME: &str = "egg_production_data.csv";
pub const CSV_MIME: &str = "text/csv";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error during export: {0}")]
    Io(#[from] std::io::Error),
}

/// Table columns in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Column {
    Date,
    TotalEggs,
    HealthyBirds,
    FeedConsumed,
    Mortality,
    SickCount,
    HealthScore,
    BirdWeight,
    Uniformity,
    WaterConsumed,
    EggWeight,
    HenDayProduction,
    FeedConversion,
    WaterFeedRatio,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Date,
        Column::TotalEggs,
        Column::HealthyBirds,
        Column::FeedConsumed,
        Column::Mortality,
        Column::SickCount,
        Column::HealthScore,
        Column::BirdWeight,
        Column::Uniformity,
        Column::WaterConsumed,
        Column::EggWeight,
        Column::HenDayProduction,
        Column::FeedConversion,
        Column::WaterFeedRatio,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::TotalEggs => "Total Eggs",
            Column::HealthyBirds => "Healthy Birds",
            Column::FeedConsumed => "Feed Consumed (kg)",
            Column::Mortality => "Mortality (%)",
            Column::SickCount => "Sick Count",
            Column::HealthScore => "Health Score",
            Column::BirdWeight => "Bird Weight (kg)",
            Column::Uniformity => "Uniformity (%)",
            Column::WaterConsumed => "Water Consumed (L)",
            Column::EggWeight => "Egg Weight (g)",
            Column::HenDayProduction => "HDP (%)",
            Column::FeedConversion => "FCR",
            Column::WaterFeedRatio => "Water:Feed Ratio",
        }
    }

    /// Cell text: dates as `YYYY-MM-DD`, numbers with two decimals.
    pub fn cell(self, r: &DailyRecord) -> String {
        let v = match self {
            Column::Date => return r.date.format(DATE_FORMAT).to_string(),
            Column::TotalEggs => f64::from(r.total_eggs),
            Column::HealthyBirds => f64::from(r.healthy_birds),
            Column::FeedConsumed => r.feed_consumed_kg,
            Column::Mortality => r.mortality_rate_pct,
            Column::SickCount => f64::from(r.sick_count),
            Column::HealthScore => r.health_score,
            Column::BirdWeight => r.avg_bird_weight_kg,
            Column::Uniformity => r.uniformity_pct,
            Column::WaterConsumed => r.water_consumed_l,
            Column::EggWeight => r.avg_egg_weight_g,
            Column::HenDayProduction => r.hen_day_production_pct,
            Column::FeedConversion => r.feed_conversion_ratio,
            Column::WaterFeedRatio => r.water_feed_ratio,
        };
        format!("{v:.2}")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl DisplayTable {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            headers: Column::ALL.iter().map(|c| c.label()).collect(),
            rows: dataset
                .iter()
                .map(|r| Column::ALL.iter().map(|c| c.cell(r)).collect())
                .collect(),
        }
    }
}

/// Header row plus one row per record, no index column.
pub fn write_csv<W: Write>(dataset: &Dataset, out: W) -> Result<(), ExportError> {
    let table = DisplayTable::from_dataset(dataset);
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    Ok(buf)
}
