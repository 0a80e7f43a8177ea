//! Analytics and scoring engine for CreditWatch.
//!
//! Provides:
//! - Category/sector selection over the position store
//! - Normalization of heterogeneous metrics onto a common [0, 1] scale
//! - A bounded composite risk score built from three capped sub-factors
//! - Interest-rate and revenue shock simulation for a single position
//!
//! Every operation is a pure function of its inputs.

pub mod alerts;
pub mod analytics;
pub mod config;
pub mod filter;
pub mod normalize;
pub mod scenario;
pub mod score;

pub use alerts::{RiskAlert, RiskAlertKind, RiskSeverity};
pub use analytics::{
    CategoryCount, CompanyDetails, ComparisonRow, PortfolioAnalytics, PortfolioOverview,
};
pub use config::{AnalyticsConfig, NormalizationPolicy, ScoringPolicy};
pub use filter::{filter, CategoryCriterion, SectorCriterion, SelectionCriteria, ALL};
pub use normalize::{MetricNormalizer, NormalizedMetricRow};
pub use scenario::{ScenarioRatio, ScenarioResult, ScenarioShock, ScenarioSimulator};
pub use score::{RiskScore, RiskScorer};
