//! Metric normalization.
//!
//! [`MetricNormalizer`] maps raw metric values onto a common [0, 1] scale so
//! that currency amounts, multiples and margins can be compared side by
//! side. Higher scores read healthier. Ratio metrics use fixed caps from
//! [`NormalizationPolicy`]; currency metrics are scaled against the min/max
//! observed in the active subset.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cw_types::{Metric, Position};

use crate::config::NormalizationPolicy;

/// One (company, metric) cell of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetricRow {
    pub company: String,
    pub metric: Metric,
    pub original_value: Decimal,
    /// Always within [0, 1].
    pub normalized_value: Decimal,
}

/// Observed range of one metric across a subset.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    min: Decimal,
    max: Decimal,
}

impl Range {
    fn of(subset: &[Position], metric: Metric) -> Option<Self> {
        subset
            .iter()
            .filter_map(|p| p.value(metric))
            .fold(None, |acc: Option<Range>, v| match acc {
                None => Some(Range { min: v, max: v }),
                Some(r) => Some(Range {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }
}

const HALF: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Stateless normalizer parameterised by a [`NormalizationPolicy`].
#[derive(Debug, Clone, Default)]
pub struct MetricNormalizer {
    policy: NormalizationPolicy,
}

impl MetricNormalizer {
    pub fn new(policy: NormalizationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &NormalizationPolicy {
        &self.policy
    }

    /// Normalize `raw` for `metric`, using `subset` as the distribution for
    /// currency and unclassified metrics. The result is clamped to [0, 1].
    pub fn normalize(&self, subset: &[Position], metric: Metric, raw: Decimal) -> Decimal {
        self.normalize_in(Range::of(subset, metric), metric, raw)
    }

    fn normalize_in(&self, range: Option<Range>, metric: Metric, raw: Decimal) -> Decimal {
        let score = match metric {
            Metric::EbitdaMargin => {
                if raw < Decimal::ZERO {
                    (raw + Decimal::ONE) / Decimal::TWO
                } else {
                    raw
                }
            }
            Metric::InterestCoverage => {
                let cap = self.policy.coverage_cap;
                scaled_to_cap(raw, cap)
            }
            Metric::LeverageRatio => {
                let cap = self.policy.leverage_cap;
                let scaled = scaled_to_cap(raw, cap);
                if self.policy.invert_leverage {
                    Decimal::ONE - scaled
                } else {
                    scaled
                }
            }
            Metric::Ebitda if raw < Decimal::ZERO => {
                // Negative earnings are scaled against the subset's most
                // negative value.
                let relative = match range {
                    Some(r) if r.min < Decimal::ZERO => {
                        raw.checked_div(r.min).unwrap_or(Decimal::ZERO)
                    }
                    _ => Decimal::ZERO,
                };
                HALF.saturating_mul(Decimal::ONE.saturating_add(relative))
            }
            _ => min_max(range, raw),
        };

        clamp(score, Decimal::ZERO, Decimal::ONE)
    }

    /// Normalized rows for every position of `subset` and every metric in
    /// `metrics`. Cells without a usable raw value are skipped.
    pub fn compare(&self, subset: &[Position], metrics: &[Metric]) -> Vec<NormalizedMetricRow> {
        self.compare_rows(subset, subset, metrics)
    }

    /// Like [`compare`](Self::compare) but only emits rows for `rows`, while
    /// ranges still come from the whole `subset`.
    pub fn compare_rows(
        &self,
        subset: &[Position],
        rows: &[Position],
        metrics: &[Metric],
    ) -> Vec<NormalizedMetricRow> {
        let ranges: Vec<(Metric, Option<Range>)> = metrics
            .iter()
            .map(|&m| (m, Range::of(subset, m)))
            .collect();

        let mut out = Vec::with_capacity(rows.len() * metrics.len());
        for position in rows {
            for &(metric, range) in &ranges {
                let Some(raw) = position.value(metric) else {
                    tracing::debug!(
                        company = %position.company,
                        %metric,
                        "Skipping non-numeric metric value"
                    );
                    continue;
                };
                out.push(NormalizedMetricRow {
                    company: position.company.clone(),
                    metric,
                    original_value: raw,
                    normalized_value: self.normalize_in(range, metric, raw),
                });
            }
        }
        out
    }

    /// Compare by column name. Unknown names and metrics not offered for
    /// comparison yield no rows.
    pub fn compare_by_name(&self, subset: &[Position], names: &[&str]) -> Vec<NormalizedMetricRow> {
        let metrics: Vec<Metric> = names
            .iter()
            .filter_map(|name| match Metric::parse_comparable(name) {
                Ok(metric) => Some(metric),
                Err(e) => {
                    tracing::debug!("{}", e);
                    None
                }
            })
            .collect();
        self.compare(subset, &metrics)
    }
}

fn clamp(value: Decimal, lo: Decimal, hi: Decimal) -> Decimal {
    value.max(lo).min(hi)
}

/// `clamp(raw, 0, cap) / cap`; a non-positive cap scores 0.
fn scaled_to_cap(raw: Decimal, cap: Decimal) -> Decimal {
    if cap <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    clamp(raw, Decimal::ZERO, cap) / cap
}

/// `(raw - min) / (max - min)`, or 0.5 for a degenerate range.
fn min_max(range: Option<Range>, raw: Decimal) -> Decimal {
    let Some(Range { min, max }) = range else {
        return HALF;
    };
    let spread = max.saturating_sub(min);
    if spread <= Decimal::ZERO {
        return HALF;
    }
    raw.saturating_sub(min).checked_div(spread).unwrap_or(HALF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_types::Category;
    use rust_decimal_macros::dec;

    fn pos(company: &str) -> Position {
        Position::new(company, Category::Green)
    }

    fn normalizer() -> MetricNormalizer {
        MetricNormalizer::default()
    }

    #[test]
    fn ebitda_margin_policy() {
        let n = normalizer();
        assert_eq!(n.normalize(&[], Metric::EbitdaMargin, dec!(-1)), dec!(0));
        assert_eq!(n.normalize(&[], Metric::EbitdaMargin, dec!(-0.5)), dec!(0.25));
        assert_eq!(n.normalize(&[], Metric::EbitdaMargin, dec!(0)), dec!(0));
        assert_eq!(n.normalize(&[], Metric::EbitdaMargin, dec!(0.3)), dec!(0.3));
        assert_eq!(n.normalize(&[], Metric::EbitdaMargin, dec!(1.7)), dec!(1));
        assert_eq!(n.normalize(&[], Metric::EbitdaMargin, dec!(-3)), dec!(0));
    }

    #[test]
    fn interest_coverage_capped_at_twenty() {
        let n = normalizer();
        assert_eq!(n.normalize(&[], Metric::InterestCoverage, dec!(5)), dec!(0.25));
        assert_eq!(n.normalize(&[], Metric::InterestCoverage, dec!(40)), dec!(1));
        assert_eq!(n.normalize(&[], Metric::InterestCoverage, dec!(-2)), dec!(0));
    }

    #[test]
    fn leverage_is_inverted_against_cap_of_ten() {
        let n = normalizer();
        assert_eq!(n.normalize(&[], Metric::LeverageRatio, dec!(0)), dec!(1));
        assert_eq!(n.normalize(&[], Metric::LeverageRatio, dec!(2.5)), dec!(0.75));
        assert_eq!(n.normalize(&[], Metric::LeverageRatio, dec!(12)), dec!(0));
        assert_eq!(n.normalize(&[], Metric::LeverageRatio, dec!(-4)), dec!(1));
    }

    #[test]
    fn leverage_without_inversion() {
        let n = MetricNormalizer::new(NormalizationPolicy {
            leverage_cap: dec!(8),
            invert_leverage: false,
            ..NormalizationPolicy::default()
        });
        assert_eq!(n.normalize(&[], Metric::LeverageRatio, dec!(2)), dec!(0.25));
        assert_eq!(n.normalize(&[], Metric::LeverageRatio, dec!(9)), dec!(1));
    }

    #[test]
    fn ebitda_min_max_over_subset() {
        let subset = vec![
            pos("A").with(Metric::Ebitda, dec!(-100)),
            pos("B").with(Metric::Ebitda, dec!(100)),
        ];
        let n = normalizer();
        assert_eq!(n.normalize(&subset, Metric::Ebitda, dec!(100)), dec!(1));
        assert_eq!(n.normalize(&subset, Metric::Ebitda, dec!(0)), dec!(0.5));
    }

    #[test]
    fn negative_ebitda_scaled_against_subset_minimum() {
        let subset = vec![
            pos("A").with(Metric::Ebitda, dec!(-200)),
            pos("B").with(Metric::Ebitda, dec!(-50)),
            pos("C").with(Metric::Ebitda, dec!(300)),
        ];
        let n = normalizer();
        // 0.5 * (1 + -50 / -200)
        assert_eq!(n.normalize(&subset, Metric::Ebitda, dec!(-50)), dec!(0.625));
        assert_eq!(n.normalize(&subset, Metric::Ebitda, dec!(-200)), dec!(1));
    }

    #[test]
    fn negative_ebitda_outside_negative_subset_is_midpoint() {
        let subset = vec![pos("A").with(Metric::Ebitda, dec!(10))];
        assert_eq!(normalizer().normalize(&subset, Metric::Ebitda, dec!(-5)), dec!(0.5));
    }

    #[test]
    fn revenue_min_max_and_degenerate_range() {
        let subset = vec![
            pos("A").with(Metric::Revenue, dec!(100)),
            pos("B").with(Metric::Revenue, dec!(300)),
        ];
        let n = normalizer();
        assert_eq!(n.normalize(&subset, Metric::Revenue, dec!(200)), dec!(0.5));
        assert_eq!(n.normalize(&subset, Metric::Revenue, dec!(300)), dec!(1));

        let single = vec![pos("A").with(Metric::Revenue, dec!(100))];
        assert_eq!(n.normalize(&single, Metric::Revenue, dec!(100)), dec!(0.5));
        assert_eq!(n.normalize(&[], Metric::Revenue, dec!(100)), dec!(0.5));
    }

    #[test]
    fn other_metrics_use_min_max() {
        let subset = vec![
            pos("A").with(Metric::TotalDebt, dec!(0)),
            pos("B").with(Metric::TotalDebt, dec!(400)),
        ];
        let n = normalizer();
        assert_eq!(n.normalize(&subset, Metric::TotalDebt, dec!(100)), dec!(0.25));
        assert_eq!(n.normalize(&subset, Metric::TotalDebt, dec!(900)), dec!(1));
    }

    #[test]
    fn compare_emits_one_row_per_numeric_cell() {
        let subset = vec![
            pos("A")
                .with(Metric::InterestCoverage, dec!(10))
                .with(Metric::LeverageRatio, dec!(5)),
            pos("B").with(Metric::InterestCoverage, dec!(2)),
        ];
        let metrics = [Metric::LeverageRatio, Metric::InterestCoverage];
        let rows = normalizer().compare(&subset, &metrics);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].company, "A");
        assert_eq!(rows[0].metric, Metric::LeverageRatio);
        assert_eq!(rows[0].normalized_value, dec!(0.5));
        assert_eq!(rows[1].normalized_value, dec!(0.5));
        assert_eq!(rows[2].company, "B");
        assert_eq!(rows[2].original_value, dec!(2));
        assert_eq!(rows[2].normalized_value, dec!(0.1));
    }

    #[test]
    fn compare_rows_uses_subset_distribution() {
        let subset = vec![
            pos("A").with(Metric::Revenue, dec!(0)),
            pos("B").with(Metric::Revenue, dec!(50)),
            pos("C").with(Metric::Revenue, dec!(200)),
        ];
        let rows = normalizer().compare_rows(&subset, &subset[1..2], &[Metric::Revenue]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].normalized_value, dec!(0.25));
    }

    #[test]
    fn empty_requests_produce_no_rows() {
        let subset = vec![pos("A")
            .with(Metric::Revenue, dec!(1))
            .with(Metric::TotalDebt, dec!(5))];
        assert!(normalizer().compare(&subset, &[]).is_empty());
        assert!(normalizer().compare(&[], &[Metric::Revenue]).is_empty());
        assert!(normalizer().compare_by_name(&subset, &["Net Income"]).is_empty());
        assert!(normalizer().compare_by_name(&subset, &["Total Debt"]).is_empty());
        assert_eq!(normalizer().compare_by_name(&subset, &["Revenue"]).len(), 1);
    }
}
