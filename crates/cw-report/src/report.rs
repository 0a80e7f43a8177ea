//! Report assembly: request parsing and composition of the analytics views.

use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use cw_risk::{
    CompanyDetails, NormalizedMetricRow, PortfolioAnalytics, PortfolioOverview, RiskScore,
    ScenarioResult, ScenarioShock, SelectionCriteria,
};
use cw_types::{validation_error, CwResult, Metric};

/// Inputs of one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub category: String,
    pub sectors: Vec<String>,
    pub metrics: Vec<Metric>,
    pub company: Option<String>,
    pub shock: ScenarioShock,
}

impl ReportRequest {
    /// Build a request from raw string settings. Unknown or non-comparable
    /// metric names are dropped; out-of-range shocks are rejected.
    pub fn from_settings(
        category: Option<&str>,
        sectors: Option<&str>,
        metrics: Option<&str>,
        company: Option<&str>,
        rate_change: Option<&str>,
        revenue_decline: Option<&str>,
    ) -> CwResult<Self> {
        let sectors = split_list(sectors.unwrap_or(""));
        let metrics = split_list(metrics.unwrap_or("Leverage Ratio,Interest Coverage"))
            .iter()
            .filter_map(|name| match Metric::parse_comparable(name) {
                Ok(metric) => Some(metric),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            })
            .collect();

        let shock = ScenarioShock::new(
            parse_pct(rate_change, "rate change")?,
            parse_pct(revenue_decline, "revenue decline")?,
        )?;

        Ok(Self {
            category: category.unwrap_or(cw_risk::ALL).to_string(),
            sectors,
            metrics,
            company: company.filter(|c| !c.is_empty()).map(str::to_string),
            shock,
        })
    }

    pub fn criteria(&self) -> SelectionCriteria {
        let sectors: Vec<&str> = self.sectors.iter().map(String::as_str).collect();
        SelectionCriteria::parse(&self.category, &sectors)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_pct(raw: Option<&str>, name: &str) -> CwResult<Decimal> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Decimal::ZERO),
        Some(s) => Decimal::from_str(s)
            .map_err(|e| validation_error!("Invalid {} '{}': {}", name, s, e)),
    }
}

/// Everything derived for one request.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub overview: PortfolioOverview,
    pub companies: Vec<String>,
    pub comparison: Vec<NormalizedMetricRow>,
    pub risk_scores: Vec<RiskScore>,
    pub details: Option<CompanyDetails>,
    pub scenario: Option<ScenarioResult>,
}

pub fn build_report(analytics: &PortfolioAnalytics, request: &ReportRequest) -> Report {
    let subset = analytics.select(&request.criteria());
    let company = request.company.as_deref();

    let details = analytics.details(&subset, company);
    let scenario = PortfolioAnalytics::find(&subset, company)
        .map(|position| analytics.simulate(position, &request.shock));

    Report {
        overview: analytics.overview(),
        companies: PortfolioAnalytics::company_options(&subset),
        comparison: analytics.compare(&subset, &request.metrics, company),
        risk_scores: analytics.risk_scores(&subset),
        details,
        scenario,
    }
}
