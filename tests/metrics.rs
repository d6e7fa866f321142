use chrono::NaiveDate;
use layer_farm_dashboard::error::MetricsError;
use layer_farm_dashboard::metrics::derived::DerivedMetrics;
use layer_farm_dashboard::metrics::generator::{generate, EggYield, MetricsGenerator, TrendConfig};
use layer_farm_dashboard::metrics::kpi::HeadlineMetrics;
use layer_farm_dashboard::Dataset;
use pretty_assertions::assert_eq;

fn june_30() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn reference() -> Dataset {
    generate(30, Some(june_30()), Some(42)).unwrap()
}

#[test]
fn reference_window_ends_on_anchor_date() {
    let ds = reference();
    assert_eq!(ds.len(), 30);
    assert_eq!(ds.first_date(), NaiveDate::from_ymd_opt(2024, 6, 1));
    assert_eq!(ds.last_date(), Some(june_30()));

    let rows = ds.records();
    assert_eq!(rows[0].healthy_birds, 100_000);
    assert_eq!(rows[29].healthy_birds, 99_710);
    assert_eq!(rows[0].sick_count, 45);
    assert_eq!(rows[29].sick_count, 74);
}

#[test]
fn dates_are_consecutive_days() {
    for n in [1u32, 2, 7, 30] {
        let ds = generate(n, Some(june_30()), Some(9)).unwrap();
        assert_eq!(ds.len(), n as usize);
        for pair in ds.records().windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
    }
}

#[test]
fn denominators_stay_positive() {
    for seed in 0..20 {
        let ds = generate(30, Some(june_30()), Some(seed)).unwrap();
        for r in &ds {
            assert!(r.healthy_birds > 0);
            assert!(r.feed_consumed_kg > 0.0);
            assert!(f64::from(r.total_eggs) * r.avg_egg_weight_g > 0.0);
        }
    }
}

#[test]
fn derived_fields_recompute_from_base() {
    let ds = reference();
    for r in &ds {
        let again = DerivedMetrics::compute(&r.base()).unwrap();
        let stored = r.derived();
        assert!((again.hen_day_production_pct - stored.hen_day_production_pct).abs() < 1e-9);
        assert!((again.feed_conversion_ratio - stored.feed_conversion_ratio).abs() < 1e-9);
        assert!((again.water_feed_ratio - stored.water_feed_ratio).abs() < 1e-9);

        let hdp = f64::from(r.total_eggs) / f64::from(r.healthy_birds) * 100.0;
        assert!((r.hen_day_production_pct - hdp).abs() < 1e-9);
    }
}

#[test]
fn same_seed_reproduces_dataset() {
    let a = serde_json::to_string(&reference()).unwrap();
    let b = serde_json::to_string(&reference()).unwrap();
    assert_eq!(a, b);

    let other = serde_json::to_string(&generate(30, Some(june_30()), Some(43)).unwrap()).unwrap();
    assert_ne!(a, other);
}

#[test]
fn trends_are_monotonic() {
    let ds = reference();
    for pair in ds.records().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(b.healthy_birds <= a.healthy_birds);
        assert!(b.health_score <= a.health_score);
        assert!(b.uniformity_pct <= a.uniformity_pct);

        assert!(b.mortality_rate_pct >= a.mortality_rate_pct);
        assert!(b.sick_count >= a.sick_count);
        assert!(b.avg_bird_weight_kg >= a.avg_bird_weight_kg);
        assert!(b.avg_egg_weight_g >= a.avg_egg_weight_g);
    }
}

#[test]
fn single_day_window_cannot_compute_deltas() {
    let ds = generate(1, Some(june_30()), Some(42)).unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.last_date(), Some(june_30()));
    assert!(matches!(
        HeadlineMetrics::from_dataset(&ds),
        Err(MetricsError::InsufficientData { needed: 2, available: 1 })
    ));
}

#[test]
fn empty_window_is_rejected() {
    assert!(matches!(
        generate(0, Some(june_30()), None),
        Err(MetricsError::Configuration(_))
    ));
}

#[test]
fn fixture_window_cannot_exceed_table() {
    assert!(matches!(
        generate(31, Some(june_30()), Some(1)),
        Err(MetricsError::Configuration(_))
    ));
}

#[test]
fn parametric_yield_supports_long_windows() {
    let trend = TrendConfig {
        egg_yield: EggYield::Parametric {
            base: 82_500.0,
            daily_gain: 80.0,
            weekly_amplitude: 250.0,
        },
        ..Default::default()
    };
    let ds = MetricsGenerator::new(trend).generate(90, june_30(), Some(5)).unwrap();
    assert_eq!(ds.len(), 90);
    assert_eq!(ds.records()[89].healthy_birds, 100_000 - 10 * 89);
    assert!(ds.records()[89].total_eggs > ds.records()[0].total_eggs);
}

#[test]
fn flock_collapse_surfaces_division_error() {
    let trend = TrendConfig {
        healthy_birds_start: 1_000,
        healthy_birds_daily_loss: 100,
        ..Default::default()
    };
    let err = MetricsGenerator::new(trend)
        .generate(30, june_30(), Some(1))
        .unwrap_err();
    assert!(matches!(err, MetricsError::Division { .. }));
}

#[test]
fn headline_uses_latest_two_records() {
    let ds = reference();
    let kpis = HeadlineMetrics::from_dataset(&ds).unwrap();
    let rows = ds.records();
    let (latest, previous) = (&rows[29], &rows[28]);
    assert_eq!(kpis.daily_eggs.value, 85_000.0);
    assert_eq!(kpis.daily_eggs.delta, 100.0);
    assert_eq!(
        kpis.feed_conversion.delta,
        latest.feed_conversion_ratio - previous.feed_conversion_ratio
    );
    assert_eq!(
        kpis.hen_day_production.display_value,
        format!("{:.1}%", latest.hen_day_production_pct)
    );
}
