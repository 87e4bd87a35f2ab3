use rusqlite::Connection;

use super::types::{rank_matches, AlumniMatch};
use crate::error::StoreResult;

/// Exact skill-name match after ASCII case folding. Rows come back in last
/// name then link insertion order; proficiency ranking is applied afterwards.
const FIND_BY_SKILL_SQL: &str = "
    SELECT
        A.FirstName,
        A.LastName,
        ASk.ProficiencyLevel,
        S.SkillName
    FROM
        Alumni A
    JOIN
        Alumni_Skills ASk ON A.AlumniID = ASk.AlumniID
    JOIN
        Skills S ON ASk.SkillID = S.SkillID
    WHERE
        S.SkillName = ?1 COLLATE NOCASE
    ORDER BY
        A.LastName, ASk.rowid";

const SKILL_NAMES_SQL: &str = "SELECT DISTINCT SkillName FROM Skills ORDER BY SkillName";

/// Alumni holding `skill_name`, ranked by proficiency then last name
pub fn find_alumni_by_skill(conn: &Connection, skill_name: &str) -> StoreResult<Vec<AlumniMatch>> {
    let mut stmt = conn.prepare_cached(FIND_BY_SKILL_SQL)?;
    let mut matches = stmt
        .query_map([skill_name], |row| {
            Ok(AlumniMatch {
                first_name: row.get(0)?,
                last_name: row.get(1)?,
                proficiency_level: row.get(2)?,
                skill_name: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rank_matches(&mut matches);
    Ok(matches)
}

/// All distinct skill names in ascending order
pub fn skill_names(conn: &Connection) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(SKILL_NAMES_SQL)?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(names)
}
