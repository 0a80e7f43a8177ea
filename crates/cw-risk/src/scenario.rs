//! Scenario simulation.
//!
//! [`ScenarioSimulator`] recomputes interest coverage and leverage for one
//! position under an interest-rate change and a revenue decline. The input
//! position is never modified; every run yields a fresh [`ScenarioResult`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use cw_types::{validation_error, CwResult, Position};

use crate::alerts::{RiskAlert, RiskAlertKind, RiskSeverity};

/// A ratio that may not be computable by division.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScenarioRatio {
    Finite(Decimal),
    /// Denominator was zero, non-positive, or the quotient overflowed.
    Unbounded,
}

impl ScenarioRatio {
    pub fn finite(&self) -> Option<Decimal> {
        match self {
            ScenarioRatio::Finite(v) => Some(*v),
            ScenarioRatio::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, ScenarioRatio::Unbounded)
    }

    pub fn is_negative(&self) -> bool {
        self.finite().is_some_and(|v| v < Decimal::ZERO)
    }

    fn divide(numerator: Decimal, denominator: Decimal) -> Self {
        numerator
            .checked_div(denominator)
            .map(ScenarioRatio::Finite)
            .unwrap_or(ScenarioRatio::Unbounded)
    }
}

impl fmt::Display for ScenarioRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioRatio::Finite(v) => write!(f, "{:.2}", v.round_dp(2)),
            ScenarioRatio::Unbounded => write!(f, "inf"),
        }
    }
}

/// Validated shock parameters, both in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioShock {
    pub interest_rate_change_pct: Decimal,
    pub revenue_decline_pct: Decimal,
}

impl ScenarioShock {
    pub const RATE_CHANGE_RANGE: RangeInclusive<Decimal> =
        Decimal::from_parts(5, 0, 0, true, 0)..=Decimal::from_parts(5, 0, 0, false, 0);
    pub const REVENUE_DECLINE_RANGE: RangeInclusive<Decimal> =
        Decimal::ZERO..=Decimal::from_parts(50, 0, 0, false, 0);

    /// Validate the parameters against the documented ranges.
    pub fn new(interest_rate_change_pct: Decimal, revenue_decline_pct: Decimal) -> CwResult<Self> {
        if !Self::RATE_CHANGE_RANGE.contains(&interest_rate_change_pct) {
            return Err(validation_error!(
                "Interest rate change {}% outside [{}, {}]",
                interest_rate_change_pct,
                Self::RATE_CHANGE_RANGE.start(),
                Self::RATE_CHANGE_RANGE.end()
            ));
        }
        if !Self::REVENUE_DECLINE_RANGE.contains(&revenue_decline_pct) {
            return Err(validation_error!(
                "Revenue decline {}% outside [{}, {}]",
                revenue_decline_pct,
                Self::REVENUE_DECLINE_RANGE.start(),
                Self::REVENUE_DECLINE_RANGE.end()
            ));
        }
        Ok(Self {
            interest_rate_change_pct,
            revenue_decline_pct,
        })
    }

    pub fn none() -> Self {
        Self {
            interest_rate_change_pct: Decimal::ZERO,
            revenue_decline_pct: Decimal::ZERO,
        }
    }
}

/// Health metrics recomputed under a shock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub company: String,
    pub interest_rate_change_pct: Decimal,
    pub revenue_decline_pct: Decimal,
    pub original_ebitda: Decimal,
    pub new_interest_expense: Decimal,
    pub new_revenue: Decimal,
    pub new_ebitda: Decimal,
    pub new_interest_coverage: ScenarioRatio,
    pub new_leverage_ratio: ScenarioRatio,
    /// Original EBITDA is negative and the shocked coverage is negative.
    pub warning: bool,
}

impl ScenarioResult {
    /// Alert describing the sign flip, when the warning flag is set.
    pub fn alert(&self) -> Option<RiskAlert> {
        if !self.warning {
            return None;
        }
        let shocked_coverage = self.new_interest_coverage.finite()?;
        Some(RiskAlert::new(
            RiskSeverity::Warning,
            RiskAlertKind::NegativeCoverageSignFlip {
                company: self.company.clone(),
                original_ebitda: self.original_ebitda,
                shocked_coverage,
            },
            format!(
                "Interest coverage for {} is negative ({:.2}) because EBITDA is negative; \
                 a more negative value under a larger shock is a deterioration, not an improvement",
                self.company,
                shocked_coverage.round_dp(2),
            ),
        ))
    }
}

/// Stateless shock simulator.
pub struct ScenarioSimulator;

impl ScenarioSimulator {
    /// Apply the shock formulas unconditionally; range checks belong to
    /// [`ScenarioShock::new`].
    pub fn simulate(
        position: &Position,
        interest_rate_change_pct: Decimal,
        revenue_decline_pct: Decimal,
    ) -> ScenarioResult {
        let ebitda = position.ebitda();

        let rate_factor =
            Decimal::ONE.saturating_add(interest_rate_change_pct / Decimal::ONE_HUNDRED);
        let new_interest_expense = position.interest_expense().saturating_mul(rate_factor);
        let new_interest_coverage = if new_interest_expense > Decimal::ZERO {
            ScenarioRatio::divide(ebitda, new_interest_expense)
        } else {
            ScenarioRatio::Unbounded
        };

        let decline_factor =
            Decimal::ONE.saturating_sub(revenue_decline_pct / Decimal::ONE_HUNDRED);
        let new_revenue = position.revenue().saturating_mul(decline_factor);
        let new_ebitda = ebitda.saturating_mul(decline_factor);
        let new_leverage_ratio = if !new_ebitda.is_zero() {
            ScenarioRatio::divide(position.total_debt(), new_ebitda)
        } else {
            ScenarioRatio::Unbounded
        };

        let warning = ebitda < Decimal::ZERO && new_interest_coverage.is_negative();

        ScenarioResult {
            company: position.company.clone(),
            interest_rate_change_pct,
            revenue_decline_pct,
            original_ebitda: ebitda,
            new_interest_expense,
            new_revenue,
            new_ebitda,
            new_interest_coverage,
            new_leverage_ratio,
            warning,
        }
    }

    pub fn simulate_shock(position: &Position, shock: &ScenarioShock) -> ScenarioResult {
        Self::simulate(
            position,
            shock.interest_rate_change_pct,
            shock.revenue_decline_pct,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_types::{Category, CwError, Metric};
    use rust_decimal_macros::dec;

    fn position(ebitda: Decimal, interest: Decimal, debt: Decimal) -> Position {
        Position::new("TEST", Category::Amber)
            .with(Metric::Revenue, dec!(10_000))
            .with(Metric::Ebitda, ebitda)
            .with(Metric::InterestExpense, interest)
            .with(Metric::TotalDebt, debt)
    }

    fn assert_close(actual: ScenarioRatio, expected: Decimal) {
        let v = actual.finite().expect("finite ratio");
        assert!((v - expected).abs() < dec!(0.000001), "{} != {}", v, expected);
    }

    #[test]
    fn zero_shock_recovers_original_ratios() {
        let ebitda = dec!(1234.56);
        let interest = dec!(98.7);
        let debt = dec!(4321);
        let pos = position(ebitda, interest, debt)
            .with(Metric::InterestCoverage, ebitda / interest)
            .with(Metric::LeverageRatio, debt / ebitda);

        let result = ScenarioSimulator::simulate(&pos, dec!(0), dec!(0));
        assert_close(result.new_interest_coverage, pos.interest_coverage());
        assert_close(result.new_leverage_ratio, pos.leverage_ratio());
        assert_eq!(result.new_revenue, dec!(10_000));
        assert!(!result.warning);
    }

    #[test]
    fn rate_increase_lowers_coverage() {
        let pos = position(dec!(1000), dec!(100), dec!(3000));
        let result = ScenarioSimulator::simulate(&pos, dec!(5), dec!(0));
        assert_eq!(result.new_interest_expense, dec!(105));
        assert_close(result.new_interest_coverage, dec!(1000) / dec!(105));
    }

    #[test]
    fn revenue_decline_raises_leverage() {
        let pos = position(dec!(1000), dec!(100), dec!(3000));
        let result = ScenarioSimulator::simulate(&pos, dec!(0), dec!(50));
        assert_eq!(result.new_ebitda, dec!(500));
        assert_eq!(result.new_revenue, dec!(5000));
        assert_close(result.new_leverage_ratio, dec!(6));
    }

    #[test]
    fn non_positive_interest_expense_is_unbounded() {
        let pos = position(dec!(1000), dec!(0), dec!(3000));
        let result = ScenarioSimulator::simulate(&pos, dec!(2), dec!(0));
        assert!(result.new_interest_coverage.is_unbounded());
        assert_eq!(result.new_interest_coverage.to_string(), "inf");

        let negative = position(dec!(1000), dec!(-10), dec!(3000));
        let result = ScenarioSimulator::simulate(&negative, dec!(0), dec!(0));
        assert!(result.new_interest_coverage.is_unbounded());
    }

    #[test]
    fn zero_ebitda_leverage_is_unbounded() {
        let pos = position(dec!(0), dec!(100), dec!(3000));
        let result = ScenarioSimulator::simulate(&pos, dec!(0), dec!(10));
        assert!(result.new_leverage_ratio.is_unbounded());
        assert_close(result.new_interest_coverage, dec!(0));
    }

    #[test]
    fn negative_earnings_coverage_sets_warning() {
        let pos = position(dec!(-500), dec!(100), dec!(3000));
        let result = ScenarioSimulator::simulate(&pos, dec!(5), dec!(0));
        assert!(result.new_interest_coverage.is_negative());
        assert!(result.warning);

        let alert = result.alert().expect("sign flip alert");
        assert_eq!(alert.severity, RiskSeverity::Warning);
        let RiskAlertKind::NegativeCoverageSignFlip { original_ebitda, .. } = alert.kind;
        assert_eq!(original_ebitda, dec!(-500));
    }

    #[test]
    fn positive_earnings_never_warn() {
        let pos = position(dec!(500), dec!(100), dec!(3000));
        let result = ScenarioSimulator::simulate(&pos, dec!(-5), dec!(50));
        assert!(!result.warning);
        assert!(result.alert().is_none());
    }

    #[test]
    fn input_position_is_untouched() {
        let pos = position(dec!(-500), dec!(100), dec!(3000));
        let before = pos.clone();
        let _ = ScenarioSimulator::simulate(&pos, dec!(5), dec!(50));
        assert_eq!(pos, before);
    }

    #[test]
    fn shock_validation_enforces_ranges() {
        assert!(ScenarioShock::new(dec!(-5), dec!(0)).is_ok());
        assert!(ScenarioShock::new(dec!(5), dec!(50)).is_ok());
        assert!(matches!(
            ScenarioShock::new(dec!(5.01), dec!(0)),
            Err(CwError::Validation(_))
        ));
        assert!(matches!(
            ScenarioShock::new(dec!(0), dec!(-1)),
            Err(CwError::Validation(_))
        ));
        assert!(ScenarioShock::new(dec!(0), dec!(50.5)).is_err());
    }

    #[test]
    fn simulator_does_not_clamp_out_of_range_shocks() {
        let pos = position(dec!(1000), dec!(100), dec!(3000));
        let result = ScenarioSimulator::simulate(&pos, dec!(-150), dec!(0));
        // Interest expense turns negative: coverage is unbounded, not clamped.
        assert!(result.new_interest_coverage.is_unbounded());
        let shocked = ScenarioSimulator::simulate_shock(&pos, &ScenarioShock::none());
        assert_close(shocked.new_interest_coverage, dec!(10));
    }
}
