use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DAYS: usize = 730;
const OUTPUT_PATH: &str = "sample_daily.csv";

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut ChaCha8Rng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-15);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.3}")).unwrap_or_default()
}

/// Writes a daily count series with lag and rolling features. Rows are
/// shuffled so the viewer has to sort by `day`; a few cells are missing and
/// one date is malformed.
fn main() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).context("invalid start date")?;

    // Weekly seasonality + slow trend + noise
    let counts: Vec<f64> = (0..DAYS)
        .map(|i| {
            let day = start + Duration::days(i as i64);
            let weekday = day.weekday().num_days_from_monday() as f64;
            let season = 20.0 * (2.0 * std::f64::consts::PI * weekday / 7.0).sin();
            let trend = 0.05 * i as f64;
            (120.0 + season + trend + gauss(&mut rng, 0.0, 8.0)).max(0.0).round()
        })
        .collect();

    let mut rows: Vec<[String; 6]> = Vec::with_capacity(DAYS);
    for i in 0..DAYS {
        let day = start + Duration::days(i as i64);
        let lag_1 = i.checked_sub(1).map(|j| counts[j]);
        let lag_7 = i.checked_sub(7).map(|j| counts[j]);
        let rolling_mean_7 = (i >= 6).then(|| counts[i - 6..=i].iter().sum::<f64>() / 7.0);

        // ~2% missing counts
        let daily_count = (rng.random::<f64>() >= 0.02).then_some(counts[i]);

        rows.push([
            day.format("%Y-%m-%d").to_string(),
            fmt_opt(daily_count),
            fmt_opt(lag_1),
            fmt_opt(lag_7),
            fmt_opt(rolling_mean_7),
            day.format("%a").to_string(),
        ]);
    }
    rows[DAYS / 2][0] = "not-a-date".to_string();

    rows.shuffle(&mut rng);

    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;
    writer.write_record([
        "day",
        "daily_count",
        "lag_1",
        "lag_7",
        "rolling_mean_7",
        "weekday",
    ])?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    println!("Wrote {DAYS} days to {OUTPUT_PATH}");
    Ok(())
}
