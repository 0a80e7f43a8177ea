use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use cw_types::{Category, CwResult, DataError, Metric, Position};
use rust_decimal::Decimal;

const COMPANY_COLUMN: &str = "Company";
const CATEGORY_COLUMN: &str = "Category";

/// Column positions detected from the header row.
#[derive(Debug, Clone)]
struct ColumnMap {
    company: usize,
    category: usize,
    metrics: Vec<(Metric, usize)>,
}

/// Loads the positions table from CSV.
///
/// `Company` and `Category` columns are required. Numeric columns are
/// optional; a missing column or an unparseable cell leaves the field empty
/// so the declared default applies downstream.
#[derive(Debug, Default)]
pub struct PositionLoader;

impl PositionLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load positions from a CSV file with a header row.
    pub async fn load_csv_file<P: AsRef<Path>>(&self, file_path: P) -> CwResult<Vec<Position>> {
        let path = file_path.as_ref();
        tracing::info!("Loading positions from: {}", path.display());

        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(DataError::SourceNotFound(path.display().to_string()).into());
        }

        let bytes = tokio::fs::read(path).await?;
        let positions = self.load_csv_reader(bytes.as_slice())?;

        tracing::info!("Loaded {} positions from {}", positions.len(), path.display());
        Ok(positions)
    }

    /// Parse positions from any CSV reader.
    pub fn load_csv_reader<R: Read>(&self, reader: R) -> CwResult<Vec<Position>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to read CSV headers: {}", e),
            })?
            .clone();
        tracing::debug!("CSV headers: {:?}", headers);

        let columns = Self::detect_columns(&headers)?;

        let mut positions = Vec::new();
        for (line_num, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| DataError::LoadingFailed {
                message: format!("Failed to read CSV record at line {}: {}", line_num + 2, e),
            })?;

            match Self::parse_record(&record, &columns) {
                Ok(position) => positions.push(position),
                Err(e) => {
                    tracing::warn!("Skipping invalid record at line {}: {}", line_num + 2, e);
                    continue;
                }
            }
        }

        Ok(positions)
    }

    fn detect_columns(headers: &csv::StringRecord) -> CwResult<ColumnMap> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let company = find(COMPANY_COLUMN).ok_or_else(|| DataError::MissingColumn {
            column: COMPANY_COLUMN.to_string(),
        })?;
        let category = find(CATEGORY_COLUMN).ok_or_else(|| DataError::MissingColumn {
            column: CATEGORY_COLUMN.to_string(),
        })?;

        let metrics = Metric::ALL
            .iter()
            .filter_map(|&metric| match find(metric.column()) {
                Some(idx) => Some((metric, idx)),
                None => {
                    tracing::debug!(
                        "Column '{}' absent, defaulting to {}",
                        metric,
                        metric.default_value()
                    );
                    None
                }
            })
            .collect();

        Ok(ColumnMap {
            company,
            category,
            metrics,
        })
    }

    fn parse_record(record: &csv::StringRecord, columns: &ColumnMap) -> CwResult<Position> {
        let company = record.get(columns.company).unwrap_or("");
        if company.is_empty() {
            return Err(DataError::InvalidFormat {
                message: "empty company code".to_string(),
            }
            .into());
        }

        let category = Category::parse(record.get(columns.category).unwrap_or(""));
        let mut position = Position::new(company, category);

        for &(metric, idx) in &columns.metrics {
            let cell = record.get(idx).unwrap_or("");
            let value = parse_decimal(cell);
            if value.is_none() && !cell.is_empty() {
                tracing::debug!(company, %metric, cell, "Non-numeric value left empty");
            }
            position.financials.set(metric, value);
        }

        Ok(position)
    }
}

/// Parse a numeric cell; plain and scientific notation are accepted.
fn parse_decimal(cell: &str) -> Option<Decimal> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    Decimal::from_str(cell)
        .or_else(|_| Decimal::from_scientific(cell))
        .ok()
}
