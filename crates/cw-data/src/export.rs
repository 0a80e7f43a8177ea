//! Single-position export.
//!
//! Serializes the raw fields of one position as a one-row CSV with a header.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use cw_types::{CwResult, DataError, Position};
use rust_decimal::Decimal;
use serde::Serialize;

/// Flat snapshot of a position's raw fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionSnapshot {
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Revenue")]
    pub revenue: Option<Decimal>,
    #[serde(rename = "EBITDA")]
    pub ebitda: Option<Decimal>,
    #[serde(rename = "Total Debt")]
    pub total_debt: Option<Decimal>,
    #[serde(rename = "Interest Expense")]
    pub interest_expense: Option<Decimal>,
    #[serde(rename = "Cash Flow from Operations")]
    pub cash_flow_from_operations: Option<Decimal>,
    #[serde(rename = "Leverage Ratio")]
    pub leverage_ratio: Option<Decimal>,
    #[serde(rename = "Interest Coverage")]
    pub interest_coverage: Option<Decimal>,
    #[serde(rename = "EBITDA Margin")]
    pub ebitda_margin: Option<Decimal>,
    #[serde(rename = "Qualitative Notes")]
    pub note: String,
    #[serde(rename = "Exported At")]
    pub exported_at: DateTime<Utc>,
}

impl PositionSnapshot {
    pub fn capture(position: &Position, exported_at: DateTime<Utc>) -> Self {
        let f = &position.financials;
        Self {
            company: position.company.clone(),
            category: position.category.label().to_string(),
            sector: position.sector.clone().unwrap_or_default(),
            revenue: f.revenue,
            ebitda: f.ebitda,
            total_debt: f.total_debt,
            interest_expense: f.interest_expense,
            cash_flow_from_operations: f.cash_flow_from_operations,
            leverage_ratio: f.leverage_ratio,
            interest_coverage: f.interest_coverage,
            ebitda_margin: f.ebitda_margin,
            note: position.note.clone(),
            exported_at,
        }
    }
}

/// Writes position snapshots as CSV.
#[derive(Debug, Default)]
pub struct PositionExporter;

impl PositionExporter {
    pub fn new() -> Self {
        Self
    }

    /// Write the header and a single row for `position`.
    pub fn write_csv<W: Write>(
        &self,
        position: &Position,
        exported_at: DateTime<Utc>,
        writer: W,
    ) -> CwResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.serialize(PositionSnapshot::capture(position, exported_at))?;
        wtr.flush()?;
        Ok(())
    }

    /// File name used for an exported position.
    pub fn file_name(company: &str) -> String {
        format!("{}_export.csv", company)
    }

    /// Export into `dir/<COMPANY>_export.csv` and return the written path.
    pub async fn export_to_dir<P: AsRef<Path>>(
        &self,
        position: &Position,
        dir: P,
    ) -> CwResult<PathBuf> {
        let path = dir.as_ref().join(Self::file_name(&position.company));

        let mut buffer = Vec::new();
        self.write_csv(position, Utc::now(), &mut buffer)?;

        tokio::fs::write(&path, buffer)
            .await
            .map_err(|e| DataError::ExportFailed {
                company: position.company.clone(),
                message: format!("{}: {}", path.display(), e),
            })?;

        tracing::info!("Exported data for {} to '{}'", position.company, path.display());
        Ok(path)
    }
}
