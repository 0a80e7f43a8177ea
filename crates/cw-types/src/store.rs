use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::classification::Category;
use crate::errors::{CwResult, DataError};
use crate::position::Position;
use crate::reference::ReferenceData;

/// Immutable, ordered table of positions for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionStore {
    positions: Vec<Position>,
}

impl PositionStore {
    /// Build the store, deriving each position's sector and note from
    /// `reference`. Company codes must be unique.
    pub fn new(positions: Vec<Position>, reference: &ReferenceData) -> CwResult<Self> {
        let mut seen = HashSet::with_capacity(positions.len());
        let mut enriched = Vec::with_capacity(positions.len());

        for mut position in positions {
            if !seen.insert(position.company.clone()) {
                return Err(DataError::DuplicateCompany {
                    company: position.company,
                }
                .into());
            }
            position.sector = reference.sector_of(&position.company).map(str::to_string);
            position.note = reference.note_of(&position.company).to_string();
            enriched.push(position);
        }

        Ok(Self {
            positions: enriched,
        })
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn get(&self, company: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.company == company)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<Category> {
        let mut out: Vec<Category> = Vec::new();
        for p in &self.positions {
            if !out.contains(&p.category) {
                out.push(p.category.clone());
            }
        }
        out
    }

    /// Distinct sectors in first-seen order; positions without a sector are
    /// not represented.
    pub fn sectors(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for sector in self.positions.iter().filter_map(|p| p.sector.as_ref()) {
            if !out.contains(sector) {
                out.push(sector.clone());
            }
        }
        out
    }
}
