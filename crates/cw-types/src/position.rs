use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::classification::Category;

/// How a metric's raw value is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricUnit {
    /// Absolute money amount.
    Currency,
    /// Dimensionless multiple (e.g. 4.2x).
    Ratio,
    /// Fraction displayed as a percentage (0.25 = 25%).
    Percentage,
}

/// Numeric columns of the positions table.
///
/// Every column declares its header and the default applied when the
/// source row does not carry a usable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Revenue,
    Ebitda,
    TotalDebt,
    InterestExpense,
    CashFlowFromOperations,
    LeverageRatio,
    InterestCoverage,
    EbitdaMargin,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Revenue,
        Metric::Ebitda,
        Metric::TotalDebt,
        Metric::InterestExpense,
        Metric::CashFlowFromOperations,
        Metric::LeverageRatio,
        Metric::InterestCoverage,
        Metric::EbitdaMargin,
    ];

    /// Metrics offered for side-by-side comparison.
    pub const COMPARABLE: [Metric; 5] = [
        Metric::Revenue,
        Metric::Ebitda,
        Metric::LeverageRatio,
        Metric::InterestCoverage,
        Metric::EbitdaMargin,
    ];

    /// Resolve a column name among the [`Metric::COMPARABLE`] metrics.
    pub fn parse_comparable(name: &str) -> Result<Self, String> {
        let metric: Metric = name.parse()?;
        if Metric::COMPARABLE.contains(&metric) {
            Ok(metric)
        } else {
            Err(format!("Metric not offered for comparison: {}", name))
        }
    }

    /// Column header used by the positions table.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Revenue => "Revenue",
            Metric::Ebitda => "EBITDA",
            Metric::TotalDebt => "Total Debt",
            Metric::InterestExpense => "Interest Expense",
            Metric::CashFlowFromOperations => "Cash Flow from Operations",
            Metric::LeverageRatio => "Leverage Ratio",
            Metric::InterestCoverage => "Interest Coverage",
            Metric::EbitdaMargin => "EBITDA Margin",
        }
    }

    /// Value substituted when a position is missing this field.
    pub fn default_value(&self) -> Decimal {
        match self {
            Metric::Revenue
            | Metric::Ebitda
            | Metric::TotalDebt
            | Metric::InterestExpense
            | Metric::CashFlowFromOperations
            | Metric::LeverageRatio
            | Metric::InterestCoverage
            | Metric::EbitdaMargin => Decimal::ZERO,
        }
    }

    pub fn unit(&self) -> MetricUnit {
        match self {
            Metric::Revenue
            | Metric::Ebitda
            | Metric::TotalDebt
            | Metric::InterestExpense
            | Metric::CashFlowFromOperations => MetricUnit::Currency,
            Metric::EbitdaMargin => MetricUnit::Percentage,
            Metric::LeverageRatio | Metric::InterestCoverage => MetricUnit::Ratio,
        }
    }

    /// Render a raw value for the comparison table.
    ///
    /// Currency as `$1,234.56`, percentages as `12.34%`, ratios as `4.20`.
    /// A percentage too large to scale renders as `n/a`.
    pub fn format_value(&self, value: Decimal) -> String {
        match self.unit() {
            MetricUnit::Currency => format!("${}", group_thousands(value.round_dp(2))),
            MetricUnit::Percentage => match value.checked_mul(Decimal::ONE_HUNDRED) {
                Some(pct) => format!("{:.2}%", pct.round_dp(2)),
                None => NOT_AVAILABLE.to_string(),
            },
            MetricUnit::Ratio => format!("{:.2}", value.round_dp(2)),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .find(|m| m.column() == s)
            .copied()
            .ok_or_else(|| format!("Unknown metric: {}", s))
    }
}

const NOT_AVAILABLE: &str = "n/a";

fn group_thousands(value: Decimal) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Financial facts for one counterparty.
///
/// `None` means the source did not carry a usable number for that column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    pub revenue: Option<Decimal>,
    pub ebitda: Option<Decimal>,
    pub total_debt: Option<Decimal>,
    pub interest_expense: Option<Decimal>,
    pub cash_flow_from_operations: Option<Decimal>,
    pub leverage_ratio: Option<Decimal>,
    pub interest_coverage: Option<Decimal>,
    pub ebitda_margin: Option<Decimal>,
}

impl Financials {
    pub fn get(&self, metric: Metric) -> Option<Decimal> {
        match metric {
            Metric::Revenue => self.revenue,
            Metric::Ebitda => self.ebitda,
            Metric::TotalDebt => self.total_debt,
            Metric::InterestExpense => self.interest_expense,
            Metric::CashFlowFromOperations => self.cash_flow_from_operations,
            Metric::LeverageRatio => self.leverage_ratio,
            Metric::InterestCoverage => self.interest_coverage,
            Metric::EbitdaMargin => self.ebitda_margin,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<Decimal>) {
        let slot = match metric {
            Metric::Revenue => &mut self.revenue,
            Metric::Ebitda => &mut self.ebitda,
            Metric::TotalDebt => &mut self.total_debt,
            Metric::InterestExpense => &mut self.interest_expense,
            Metric::CashFlowFromOperations => &mut self.cash_flow_from_operations,
            Metric::LeverageRatio => &mut self.leverage_ratio,
            Metric::InterestCoverage => &mut self.interest_coverage,
            Metric::EbitdaMargin => &mut self.ebitda_margin,
        };
        *slot = value;
    }
}

/// One lending counterparty in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Unique short company code (e.g. `TWLO`).
    pub company: String,
    pub category: Category,
    /// Derived from the company→sector lookup when the store is built.
    pub sector: Option<String>,
    pub financials: Financials,
    /// Qualitative note; empty when none is on file.
    pub note: String,
}

impl Position {
    pub fn new(company: impl Into<String>, category: Category) -> Self {
        Self {
            company: company.into(),
            category,
            sector: None,
            financials: Financials::default(),
            note: String::new(),
        }
    }

    /// Builder-style setter for a single numeric field.
    pub fn with(mut self, metric: Metric, value: Decimal) -> Self {
        self.financials.set(metric, Some(value));
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Raw value as supplied by the source, `None` when missing.
    pub fn value(&self, metric: Metric) -> Option<Decimal> {
        self.financials.get(metric)
    }

    /// Value with the column's declared default applied.
    pub fn value_or_default(&self, metric: Metric) -> Decimal {
        self.value(metric).unwrap_or_else(|| metric.default_value())
    }

    pub fn revenue(&self) -> Decimal {
        self.value_or_default(Metric::Revenue)
    }

    pub fn ebitda(&self) -> Decimal {
        self.value_or_default(Metric::Ebitda)
    }

    pub fn total_debt(&self) -> Decimal {
        self.value_or_default(Metric::TotalDebt)
    }

    pub fn interest_expense(&self) -> Decimal {
        self.value_or_default(Metric::InterestExpense)
    }

    pub fn leverage_ratio(&self) -> Decimal {
        self.value_or_default(Metric::LeverageRatio)
    }

    pub fn interest_coverage(&self) -> Decimal {
        self.value_or_default(Metric::InterestCoverage)
    }

    pub fn ebitda_margin(&self) -> Decimal {
        self.value_or_default(Metric::EbitdaMargin)
    }
}
