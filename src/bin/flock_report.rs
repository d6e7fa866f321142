use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use layer_farm_dashboard::config::{load_config, Config, ConfigFormat};
use layer_farm_dashboard::export::{write_csv, DATE_FORMAT};
use layer_farm_dashboard::metrics::generator::MetricsGenerator;
use layer_farm_dashboard::metrics::kpi::HeadlineMetrics;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flock_report", version, about = "Print synthetic layer-farm metrics and export them as CSV")]
struct Args {
    /// Optional dashboard config (TOML or YAML); CLI flags override it.
    #[arg(long, env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ConfigFormat::Auto)]
    config_format: ConfigFormat,

    #[arg(long)]
    window_days: Option<u32>,

    /// Last day of the window (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,

    #[arg(long)]
    seed: Option<u64>,

    /// Write the display table here as CSV.
    #[arg(long)]
    csv_out: Option<PathBuf>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => load_config(path, args.config_format)
            .with_context(|| format!("load config {}", path.display()))?,
        None => Config::sample(),
    };
    if let Some(n) = args.window_days {
        cfg.dashboard.window_days = n;
    }
    if args.seed.is_some() {
        cfg.dashboard.seed = args.seed;
    }
    let end_date = args.end_date.unwrap_or_else(|| Local::now().date_naive());

    let dataset = MetricsGenerator::new(cfg.trend.clone())
        .generate(cfg.dashboard.window_days, end_date, cfg.dashboard.seed)
        .context("generate flock metrics")?;
    tracing::info!(records = dataset.len(), %end_date, "dataset generated");

    match HeadlineMetrics::from_dataset(&dataset) {
        Ok(kpis) => {
            for kpi in kpis.iter() {
                println!("{:<22} {:>12}  ({})", kpi.label, kpi.display_value, kpi.display_delta);
            }
        }
        Err(e) => tracing::warn!(error = %e, "headline metrics unavailable"),
    }

    if let Some(path) = &args.csv_out {
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        write_csv(&dataset, BufWriter::new(file)).context("write csv")?;
        tracing::info!(path = %path.display(), "csv written");
    }

    println!("{}", serde_json::to_string_pretty(&dataset)?);
    Ok(())
}
