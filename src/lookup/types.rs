use serde::Serialize;
use std::cmp::Ordering;

use crate::error::StoreError;

/// Sort weight of a proficiency level. Variant order is sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProficiencyRank {
    Expert,
    Intermediate,
    /// Any other value, including a missing one
    Other,
}

impl ProficiencyRank {
    /// Rank a stored level. Matching is exact: "expert" ranks as `Other`.
    pub fn of(level: Option<&str>) -> Self {
        match level {
            Some("Expert") => ProficiencyRank::Expert,
            Some("Intermediate") => ProficiencyRank::Intermediate,
            _ => ProficiencyRank::Other,
        }
    }
}

/// One alumnus holding the requested skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlumniMatch {
    pub first_name: String,
    pub last_name: String,
    pub proficiency_level: Option<String>,
    pub skill_name: String,
}

impl AlumniMatch {
    pub fn rank(&self) -> ProficiencyRank {
        ProficiencyRank::of(self.proficiency_level.as_deref())
    }

    /// Proficiency rank first, then last name
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.last_name.cmp(&other.last_name))
    }
}

/// Stable sort by proficiency rank, then last name. Remaining ties keep the
/// order they arrived in.
pub fn rank_matches(matches: &mut [AlumniMatch]) {
    matches.sort_by(AlumniMatch::ranking_cmp);
}

/// Result of a read against the store. A degraded read carries the fault and
/// behaves as an empty result.
#[derive(Debug)]
pub enum ReadOutcome<T> {
    Ok(Vec<T>),
    Degraded(StoreError),
}

impl<T> ReadOutcome<T> {
    pub fn empty() -> Self {
        ReadOutcome::Ok(Vec::new())
    }

    pub fn items(&self) -> &[T] {
        match self {
            ReadOutcome::Ok(items) => items,
            ReadOutcome::Degraded(_) => &[],
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ReadOutcome::Ok(items) => items,
            ReadOutcome::Degraded(_) => Vec::new(),
        }
    }

    pub fn fault(&self) -> Option<&StoreError> {
        match self {
            ReadOutcome::Ok(_) => None,
            ReadOutcome::Degraded(err) => Some(err),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ReadOutcome::Degraded(_))
    }

    /// Report a fault to the operator log, then hand back the items
    pub fn into_items_logged(self, what: &str) -> Vec<T> {
        if let ReadOutcome::Degraded(err) = &self {
            log::error!("Failed to read {}: {}", what, err);
        }
        self.into_items()
    }
}

impl<T> From<Result<Vec<T>, StoreError>> for ReadOutcome<T> {
    fn from(result: Result<Vec<T>, StoreError>) -> Self {
        match result {
            Ok(items) => ReadOutcome::Ok(items),
            Err(err) => ReadOutcome::Degraded(err),
        }
    }
}
