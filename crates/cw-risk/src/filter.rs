//! Selection filter: derives the active subset from category and sector
//! criteria.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use cw_types::{Category, Position};

/// Sentinel meaning "no restriction".
pub const ALL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryCriterion {
    All,
    /// Exact, case-sensitive category label.
    Only(String),
}

impl CategoryCriterion {
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            CategoryCriterion::All
        } else {
            CategoryCriterion::Only(value.to_string())
        }
    }

    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryCriterion::All => true,
            CategoryCriterion::Only(label) => category.label() == label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectorCriterion {
    All,
    AnyOf(BTreeSet<String>),
}

impl SectorCriterion {
    /// An empty selection, or one containing the sentinel, imposes no
    /// restriction.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if set.is_empty() || set.contains(ALL) {
            SectorCriterion::All
        } else {
            SectorCriterion::AnyOf(set)
        }
    }

    pub fn matches(&self, sector: Option<&str>) -> bool {
        match self {
            SectorCriterion::All => true,
            SectorCriterion::AnyOf(set) => sector.is_some_and(|s| set.contains(s)),
        }
    }
}

/// Category and sector criteria, combined by conjunction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    pub category: CategoryCriterion,
    pub sectors: SectorCriterion,
}

impl SelectionCriteria {
    pub fn new(category: CategoryCriterion, sectors: SectorCriterion) -> Self {
        Self { category, sectors }
    }

    /// No restriction at all.
    pub fn all() -> Self {
        Self::new(CategoryCriterion::All, SectorCriterion::All)
    }

    /// Build criteria from raw widget values.
    pub fn parse(category: &str, sectors: &[&str]) -> Self {
        Self::new(
            CategoryCriterion::parse(category),
            SectorCriterion::from_values(sectors.iter().copied()),
        )
    }

    pub fn matches(&self, position: &Position) -> bool {
        self.category.matches(&position.category)
            && self.sectors.matches(position.sector.as_deref())
    }
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self::all()
    }
}

/// Positions matching `criteria`, in their original order.
pub fn filter(positions: &[Position], criteria: &SelectionCriteria) -> Vec<Position> {
    let subset: Vec<Position> = positions
        .iter()
        .filter(|p| criteria.matches(p))
        .cloned()
        .collect();

    tracing::debug!(
        total = positions.len(),
        selected = subset.len(),
        "Applied selection criteria"
    );
    subset
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions() -> Vec<Position> {
        vec![
            Position::new("TWLO", Category::Yellow).with_sector("Technology"),
            Position::new("PD", Category::Red).with_sector("Technology"),
            Position::new("TDOC", Category::Red).with_sector("Healthcare"),
            Position::new("MAN", Category::Amber).with_sector("Services"),
            Position::new("ASGN", Category::Green).with_sector("Services"),
            Position::new("ACME", Category::Red),
        ]
    }

    fn companies(subset: &[Position]) -> Vec<&str> {
        subset.iter().map(|p| p.company.as_str()).collect()
    }

    #[test]
    fn no_restriction_is_identity() {
        let all = positions();
        assert_eq!(filter(&all, &SelectionCriteria::parse("All", &["All"])), all);
        assert_eq!(filter(&all, &SelectionCriteria::parse("All", &[])), all);
        assert_eq!(filter(&all, &SelectionCriteria::default()), all);
    }

    #[test]
    fn category_restriction_preserves_order() {
        let subset = filter(&positions(), &SelectionCriteria::parse("Red", &[]));
        assert_eq!(companies(&subset), vec!["PD", "TDOC", "ACME"]);
    }

    #[test]
    fn category_match_is_exact() {
        assert!(filter(&positions(), &SelectionCriteria::parse("red", &[])).is_empty());
        assert!(filter(&positions(), &SelectionCriteria::parse("Purple", &[])).is_empty());
    }

    #[test]
    fn sector_restriction_and_composition() {
        let subset = filter(
            &positions(),
            &SelectionCriteria::parse("All", &["Technology", "Services"]),
        );
        assert_eq!(companies(&subset), vec!["TWLO", "PD", "MAN", "ASGN"]);

        let subset = filter(&positions(), &SelectionCriteria::parse("Red", &["Technology"]));
        assert_eq!(companies(&subset), vec!["PD"]);
    }

    #[test]
    fn sentinel_among_sectors_lifts_restriction() {
        let subset = filter(&positions(), &SelectionCriteria::parse("Red", &["Healthcare", "All"]));
        assert_eq!(companies(&subset), vec!["PD", "TDOC", "ACME"]);
    }

    #[test]
    fn positions_without_sector_never_match_a_sector_restriction() {
        let subset = filter(&positions(), &SelectionCriteria::parse("Red", &["Healthcare"]));
        assert_eq!(companies(&subset), vec!["TDOC"]);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let subset = filter(&positions(), &SelectionCriteria::parse("Green", &["Healthcare"]));
        assert!(subset.is_empty());
        assert!(filter(&[], &SelectionCriteria::all()).is_empty());
    }
}
