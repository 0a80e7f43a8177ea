//! Portfolio analytics facade.
//!
//! [`PortfolioAnalytics`] owns the immutable position store, the injected
//! reference data and the analytics configuration, and exposes the derived
//! views the presentation layer asks for: filtered subsets, overview counts,
//! company details, metric comparisons, risk scores and scenario runs. Each
//! call is independent; nothing is cached between calls.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cw_types::{Category, Metric, Position, PositionStore, ReferenceData, Urgency};

use crate::config::AnalyticsConfig;
use crate::filter::{filter, SelectionCriteria};
use crate::normalize::{MetricNormalizer, NormalizedMetricRow};
use crate::scenario::{ScenarioResult, ScenarioShock, ScenarioSimulator};
use crate::score::{RiskScore, RiskScorer};

/// Number of positions in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
    pub color: String,
    pub urgency: Urgency,
}

/// Category distribution of the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioOverview {
    pub total_positions: usize,
    /// In first-seen order.
    pub by_category: Vec<CategoryCount>,
}

/// A single position with its display annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub position: Position,
    pub category_color: String,
    pub urgency: Urgency,
    pub note: String,
}

/// One line of the formatted comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub company: String,
    /// Formatted value per requested metric; `None` when not on file.
    pub cells: Vec<(Metric, Option<String>)>,
}

pub struct PortfolioAnalytics {
    store: PositionStore,
    reference: ReferenceData,
    normalizer: MetricNormalizer,
    scorer: RiskScorer,
}

impl PortfolioAnalytics {
    pub fn new(store: PositionStore, reference: ReferenceData, config: AnalyticsConfig) -> Self {
        Self {
            store,
            reference,
            normalizer: MetricNormalizer::new(config.normalization),
            scorer: RiskScorer::new(config.scoring),
        }
    }

    pub fn store(&self) -> &PositionStore {
        &self.store
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Active subset for `criteria`.
    pub fn select(&self, criteria: &SelectionCriteria) -> Vec<Position> {
        filter(self.store.positions(), criteria)
    }

    pub fn overview(&self) -> PortfolioOverview {
        let mut by_category: Vec<CategoryCount> = Vec::new();
        for position in self.store.positions() {
            match by_category.iter_mut().find(|c| c.category == position.category) {
                Some(entry) => entry.count += 1,
                None => {
                    let style = self.reference.palette.style(&position.category);
                    by_category.push(CategoryCount {
                        category: position.category.clone(),
                        count: 1,
                        color: style.color,
                        urgency: style.urgency,
                    });
                }
            }
        }

        PortfolioOverview {
            total_positions: self.store.len(),
            by_category,
        }
    }

    /// Company codes offered for selection, in subset order.
    pub fn company_options(subset: &[Position]) -> Vec<String> {
        subset.iter().map(|p| p.company.clone()).collect()
    }

    /// The selected company if it is part of `subset`.
    pub fn find<'a>(subset: &'a [Position], company: Option<&str>) -> Option<&'a Position> {
        let company = company?;
        subset.iter().find(|p| p.company == company)
    }

    pub fn details(&self, subset: &[Position], company: Option<&str>) -> Option<CompanyDetails> {
        let position = Self::find(subset, company)?;
        let style = self.reference.palette.style(&position.category);
        Some(CompanyDetails {
            position: position.clone(),
            category_color: style.color,
            urgency: style.urgency,
            note: self.reference.note_of(&position.company).to_string(),
        })
    }

    /// Normalized comparison rows. With a company selected, only that
    /// company's rows are produced; ranges still span the whole subset. A
    /// selection outside the subset yields no rows.
    pub fn compare(
        &self,
        subset: &[Position],
        metrics: &[Metric],
        company: Option<&str>,
    ) -> Vec<NormalizedMetricRow> {
        match company {
            None => self.normalizer.compare(subset, metrics),
            Some(code) => {
                let rows: Vec<Position> = subset
                    .iter()
                    .filter(|p| p.company == code)
                    .cloned()
                    .collect();
                self.normalizer.compare_rows(subset, &rows, metrics)
            }
        }
    }

    pub fn normalize(&self, subset: &[Position], metric: Metric, raw: Decimal) -> Decimal {
        self.normalizer.normalize(subset, metric, raw)
    }

    /// Raw values of the subset formatted per metric unit.
    pub fn comparison_table(subset: &[Position], metrics: &[Metric]) -> Vec<ComparisonRow> {
        subset
            .iter()
            .map(|p| ComparisonRow {
                company: p.company.clone(),
                cells: metrics
                    .iter()
                    .map(|&m| (m, p.value(m).map(|v| m.format_value(v))))
                    .collect(),
            })
            .collect()
    }

    pub fn risk_score(&self, position: &Position) -> RiskScore {
        self.scorer.breakdown(position)
    }

    /// Risk scores for every position of the subset.
    pub fn risk_scores(&self, subset: &[Position]) -> Vec<RiskScore> {
        subset.iter().map(|p| self.scorer.breakdown(p)).collect()
    }

    /// Run a validated shock; a sign-flip alert is logged when raised.
    pub fn simulate(&self, position: &Position, shock: &ScenarioShock) -> ScenarioResult {
        let result = ScenarioSimulator::simulate_shock(position, shock);
        if let Some(alert) = result.alert() {
            alert.log();
        }
        result
    }
}
