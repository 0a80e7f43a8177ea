//! Tunable caps and weights for normalization and scoring.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cw_types::{config_error, CwResult};

/// Caps used when mapping ratios onto [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationPolicy {
    /// Interest coverage at or above this multiple scores 1.0.
    pub coverage_cap: Decimal,
    /// Leverage is clamped to `[0, leverage_cap]` before scaling.
    pub leverage_cap: Decimal,
    /// Report `1 - leverage/cap` so that a higher score reads healthier.
    pub invert_leverage: bool,
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Self {
            coverage_cap: Decimal::from(20),
            leverage_cap: Decimal::from(10),
            invert_leverage: true,
        }
    }
}

/// Weights and caps of the three risk sub-factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Maximum contribution of the EBITDA factor.
    pub ebitda_weight: Decimal,
    /// Maximum contribution of the coverage factor.
    pub coverage_weight: Decimal,
    /// Coverage multiple treated as fully healthy.
    pub coverage_cap: Decimal,
    /// Maximum contribution of the leverage factor.
    pub leverage_weight: Decimal,
    /// Leverage multiple at which the leverage factor saturates.
    pub leverage_cap: Decimal,
    /// Points per turn of leverage.
    pub leverage_multiplier: Decimal,
    /// Flat contribution for a negative leverage ratio.
    pub negative_leverage_factor: Decimal,
    /// Upper bound of the composite score.
    pub max_score: Decimal,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            ebitda_weight: Decimal::from(20),
            coverage_weight: Decimal::from(40),
            coverage_cap: Decimal::from(10),
            leverage_weight: Decimal::from(40),
            leverage_cap: Decimal::from(8),
            leverage_multiplier: Decimal::from(5),
            negative_leverage_factor: Decimal::from(20),
            max_score: Decimal::ONE_HUNDRED,
        }
    }
}

/// Configuration for the analytics engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub normalization: NormalizationPolicy,
    #[serde(default)]
    pub scoring: ScoringPolicy,
}

impl AnalyticsConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> CwResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CwResult<()> {
        let positive = [
            ("normalization.coverage_cap", self.normalization.coverage_cap),
            ("normalization.leverage_cap", self.normalization.leverage_cap),
            ("scoring.coverage_cap", self.scoring.coverage_cap),
            ("scoring.leverage_cap", self.scoring.leverage_cap),
            ("scoring.max_score", self.scoring.max_score),
        ];
        for (name, value) in positive {
            if value <= Decimal::ZERO {
                return Err(config_error!("{} must be positive, got {}", name, value));
            }
        }

        let non_negative = [
            ("scoring.ebitda_weight", self.scoring.ebitda_weight),
            ("scoring.coverage_weight", self.scoring.coverage_weight),
            ("scoring.leverage_weight", self.scoring.leverage_weight),
            ("scoring.leverage_multiplier", self.scoring.leverage_multiplier),
            ("scoring.negative_leverage_factor", self.scoring.negative_leverage_factor),
        ];
        for (name, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(config_error!("{} must not be negative, got {}", name, value));
            }
        }

        Ok(())
    }
}
