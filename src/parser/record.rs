use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{StoreError, StoreResult};

/// One row of the bulk-load file: an alumnus, a skill and how well they know it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SkillRecord {
    pub first_name: String,
    pub last_name: String,
    pub skill_name: String,
    #[serde(default)]
    pub proficiency_level: Option<String>,
}

impl SkillRecord {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        skill_name: impl Into<String>,
        proficiency_level: Option<&str>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            skill_name: skill_name.into(),
            proficiency_level: proficiency_level.map(str::to_string),
        }
    }

    /// Reject rows that cannot identify an alumnus or a skill
    pub fn validate(&self, row: u64) -> StoreResult<()> {
        let required = [
            ("FirstName", &self.first_name),
            ("LastName", &self.last_name),
            ("SkillName", &self.skill_name),
        ];

        for (column, value) in required {
            if value.trim().is_empty() {
                return Err(StoreError::InvalidRecord {
                    row,
                    reason: format!("{} is empty", column),
                });
            }
        }

        Ok(())
    }
}

/// Parse CSV rows by header name. Extra columns are ignored, fields are trimmed
/// and an empty ProficiencyLevel becomes `None`.
pub fn read_records<R: Read>(reader: R) -> impl Iterator<Item = StoreResult<SkillRecord>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize::<SkillRecord>()
        .enumerate()
        .map(|(idx, result)| -> StoreResult<SkillRecord> {
            let record = result?;
            record.validate(idx as u64 + 1)?;
            Ok(record)
        })
}

/// Open a CSV file and parse its rows
pub fn open_records(path: &Path) -> StoreResult<impl Iterator<Item = StoreResult<SkillRecord>>> {
    let file = File::open(path)?;
    Ok(read_records(file))
}
