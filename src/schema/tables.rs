//! Table schema definitions for the alumni skill store

use super::types::*;

// =============================================================================
// Independent Tables (no FK dependencies)
// =============================================================================

pub static ALUMNI: TableSchema = TableSchema {
    name: "Alumni",
    columns: &[
        Column::identity("AlumniID"),
        Column::required("FirstName", ColumnType::Text),
        Column::required("LastName", ColumnType::Text),
        // Not populated by the bulk loader
        Column::new("GraduationYear", ColumnType::Integer),
        Column::new("Email", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[Index::on(&["LastName", "FirstName"])],
};

pub static SKILLS: TableSchema = TableSchema {
    name: "Skills",
    columns: &[
        Column::identity("SkillID"),
        Column::required("SkillName", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[Index::unique(&["SkillName"])],
};

// =============================================================================
// Junction Tables
// =============================================================================

pub static ALUMNI_SKILLS: TableSchema = TableSchema {
    name: "Alumni_Skills",
    columns: &[
        Column::required("AlumniID", ColumnType::Integer),
        Column::required("SkillID", ColumnType::Integer),
        Column::new("ProficiencyLevel", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::new("AlumniID", "Alumni", "AlumniID"),
        ForeignKey::new("SkillID", "Skills", "SkillID"),
    ],
    indexes: &[],
};

// =============================================================================
// Table Registry
// =============================================================================

/// All tables in the store; creation order comes from `DependencyResolver`
pub static ALL_TABLES: &[&TableSchema] = &[&ALUMNI, &SKILLS, &ALUMNI_SKILLS];

/// Look up a table by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
