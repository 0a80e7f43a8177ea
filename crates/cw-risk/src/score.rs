//! Composite risk score.
//!
//! Three sub-factors are computed independently, each capped at its weight,
//! summed and clamped to `[0, max_score]`. Lower is healthier.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cw_types::Position;

use crate::config::ScoringPolicy;

/// Score with its sub-factor breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub company: String,
    pub ebitda_factor: Decimal,
    pub coverage_factor: Decimal,
    pub leverage_factor: Decimal,
    /// Sum of the factors, clamped to the policy's maximum score.
    pub total: Decimal,
}

/// Stateless scorer parameterised by a [`ScoringPolicy`].
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    policy: ScoringPolicy,
}

impl RiskScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Composite score in `[0, max_score]`.
    pub fn score(&self, position: &Position) -> Decimal {
        self.breakdown(position).total
    }

    pub fn breakdown(&self, position: &Position) -> RiskScore {
        let ebitda_factor = self.ebitda_factor(position.ebitda(), position.ebitda_margin());
        let coverage_factor = self.coverage_factor(position.interest_coverage());
        let leverage_factor = self.leverage_factor(position.leverage_ratio());

        let total = clamp(
            ebitda_factor + coverage_factor + leverage_factor,
            Decimal::ZERO,
            self.policy.max_score,
        );

        RiskScore {
            company: position.company.clone(),
            ebitda_factor,
            coverage_factor,
            leverage_factor,
            total,
        }
    }

    /// Non-positive EBITDA short-circuits to the full weight, regardless of
    /// the margin.
    pub fn ebitda_factor(&self, ebitda: Decimal, margin: Decimal) -> Decimal {
        let weight = self.policy.ebitda_weight;
        if ebitda <= Decimal::ZERO {
            return weight;
        }
        let raw = weight.saturating_mul(Decimal::ONE.saturating_sub(margin));
        clamp(raw, Decimal::ZERO, weight)
    }

    pub fn coverage_factor(&self, coverage: Decimal) -> Decimal {
        let weight = self.policy.coverage_weight;
        let cap = self.policy.coverage_cap;
        if coverage <= Decimal::ZERO || cap <= Decimal::ZERO {
            return weight;
        }
        let capped = coverage.min(cap);
        let raw = weight * (Decimal::ONE - capped / cap);
        clamp(raw, Decimal::ZERO, weight)
    }

    /// A negative leverage ratio is ambiguous (negative debt or negative
    /// EBITDA) and gets a flat mid-range contribution.
    pub fn leverage_factor(&self, leverage: Decimal) -> Decimal {
        let weight = self.policy.leverage_weight;
        if leverage < Decimal::ZERO {
            return self.policy.negative_leverage_factor;
        }
        let capped = leverage.min(self.policy.leverage_cap);
        let raw = self.policy.leverage_multiplier.saturating_mul(capped);
        clamp(raw, Decimal::ZERO, weight)
    }
}

fn clamp(value: Decimal, lo: Decimal, hi: Decimal) -> Decimal {
    value.max(lo).min(hi)
}
