mod report;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cw_data::PositionLoader;
use cw_risk::{AnalyticsConfig, PortfolioAnalytics};
use cw_types::{PositionStore, ReferenceData};

use crate::report::{build_report, ReportRequest};

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_path =
        env("CREDITWATCH_DATA").unwrap_or_else(|| "data/analyzed_portfolio.csv".to_string());

    let config = match env("CREDITWATCH_CONFIG") {
        Some(path) => {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading config {path}"))?;
            AnalyticsConfig::from_json_str(&raw).with_context(|| format!("parsing config {path}"))?
        }
        None => AnalyticsConfig::default(),
    };

    let request = ReportRequest::from_settings(
        env("CREDITWATCH_CATEGORY").as_deref(),
        env("CREDITWATCH_SECTORS").as_deref(),
        env("CREDITWATCH_METRICS").as_deref(),
        env("CREDITWATCH_COMPANY").as_deref(),
        env("CREDITWATCH_RATE_CHANGE").as_deref(),
        env("CREDITWATCH_REVENUE_DECLINE").as_deref(),
    )?;

    let reference = ReferenceData::sample_portfolio();
    let positions = PositionLoader::new()
        .load_csv_file(&data_path)
        .await
        .with_context(|| format!("loading positions from {data_path}"))?;
    let store = PositionStore::new(positions, &reference)?;
    let analytics = PortfolioAnalytics::new(store, reference, config);

    let report = build_report(&analytics, &request);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
