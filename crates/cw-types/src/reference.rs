//! Immutable lookup tables injected into the store and the analytics layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classification::CategoryPalette;

/// Company→sector map, qualitative notes and the category palette.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub sectors: HashMap<String, String>,
    pub notes: HashMap<String, String>,
    pub palette: CategoryPalette,
}

impl ReferenceData {
    pub fn new(
        sectors: HashMap<String, String>,
        notes: HashMap<String, String>,
        palette: CategoryPalette,
    ) -> Self {
        Self {
            sectors,
            notes,
            palette,
        }
    }

    pub fn with_sector(mut self, company: &str, sector: &str) -> Self {
        self.sectors.insert(company.to_string(), sector.to_string());
        self
    }

    pub fn with_note(mut self, company: &str, note: &str) -> Self {
        self.notes.insert(company.to_string(), note.to_string());
        self
    }

    pub fn sector_of(&self, company: &str) -> Option<&str> {
        self.sectors.get(company).map(String::as_str)
    }

    /// Qualitative note for `company`, empty when none is on file.
    pub fn note_of(&self, company: &str) -> &str {
        self.notes.get(company).map(String::as_str).unwrap_or("")
    }

    /// Lookups for the nine-company direct lending sample portfolio.
    pub fn sample_portfolio() -> Self {
        const ENTRIES: [(&str, &str, &str); 9] = [
            ("TWLO", "Technology", "Facing competition from new entrants."),
            ("PD", "Technology", "Negative EBITDA due to R&D investments."),
            ("BOX", "Technology", "Stable but high leverage from acquisition."),
            ("TDOC", "Healthcare", "Regulatory uncertainty in telehealth."),
            ("AMWL", "Healthcare", "Cash burn from expansion efforts."),
            ("HIMS", "Healthcare", "Strong growth but unproven scalability."),
            ("MAN", "Services", "Cyclical risks in staffing market."),
            ("RHI", "Services", "Resilient despite economic slowdown."),
            ("ASGN", "Services", "Consistent performance with low debt."),
        ];

        ENTRIES
            .iter()
            .fold(Self::default(), |data, (company, sector, note)| {
                data.with_sector(company, sector).with_note(company, note)
            })
    }
}
