use rusqlite::Connection;
use std::path::PathBuf;

use super::query;
use super::types::{AlumniMatch, ReadOutcome};
use crate::config::Config;
use crate::error::StoreResult;
use crate::writer::Store;

/// Read-only access to the skill store. Every call opens its own connection
/// and releases it before returning.
#[derive(Debug, Clone)]
pub struct LookupService {
    db_path: PathBuf,
}

impl LookupService {
    pub fn new(config: &Config) -> Self {
        Self {
            db_path: config.db_path.clone(),
        }
    }

    /// Fail unless the store exists and carries the expected tables
    pub fn check_store(&self) -> StoreResult<()> {
        Store::open_read_only(&self.db_path)?.verify_schema()
    }

    /// Alumni with the given skill (case-insensitive), best first.
    /// Empty input returns an empty result without touching the store.
    pub fn find_alumni_by_skill(&self, skill_name: &str) -> ReadOutcome<AlumniMatch> {
        if skill_name.is_empty() {
            return ReadOutcome::empty();
        }
        self.read(|conn| query::find_alumni_by_skill(conn, skill_name))
    }

    /// Every distinct skill name, sorted
    pub fn all_skills(&self) -> ReadOutcome<String> {
        self.read(query::skill_names)
    }

    fn read<T, F>(&self, f: F) -> ReadOutcome<T>
    where
        F: FnOnce(&Connection) -> StoreResult<Vec<T>>,
    {
        Store::open_read_only(&self.db_path)
            .and_then(|store| f(store.connection()))
            .into()
    }
}
