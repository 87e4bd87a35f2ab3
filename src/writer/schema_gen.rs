use crate::schema::{DependencyResolver, TableSchema};

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let constraint = if col.primary_key {
            " PRIMARY KEY AUTOINCREMENT"
        } else if !col.nullable {
            " NOT NULL"
        } else {
            ""
        };

        columns.push(format!(
            "    {} {}{}",
            col.name,
            col.col_type.sql_type(),
            constraint
        ));
    }

    // Add foreign key constraints
    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for foreign key columns and explicit indexes
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let fk_indexes = schema.foreign_keys.iter().map(|fk| {
        format!(
            "CREATE INDEX idx_{}_{} ON {}({})",
            schema.name, fk.column, schema.name, fk.column
        )
    });

    let explicit = schema.indexes.iter().map(|index| {
        format!(
            "CREATE {}INDEX idx_{}_{} ON {}({})",
            if index.unique { "UNIQUE " } else { "" },
            schema.name,
            index.columns.join("_"),
            schema.name,
            index.columns.join(", ")
        )
    });

    fk_indexes.chain(explicit).collect()
}

/// Generate a complete schema script: drops (children first), then creates
pub fn generate_schema_script() -> Result<String, String> {
    let resolver = DependencyResolver::new();
    let mut script = String::from("-- Alumni skill store schema\n\n");

    for table in resolver.drop_order()? {
        script.push_str(&format!("DROP TABLE IF EXISTS {};\n", table.name));
    }

    for table in resolver.create_order()? {
        script.push('\n');
        script.push_str(&generate_create_table(table));
        script.push_str(";\n");
        for index_sql in generate_indexes(table) {
            script.push_str(&index_sql);
            script.push_str(";\n");
        }
    }

    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{ALUMNI, ALUMNI_SKILLS, SKILLS};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&ALUMNI_SKILLS);
        assert!(sql.contains("CREATE TABLE Alumni_Skills"));
        assert!(sql.contains("AlumniID INTEGER NOT NULL"));
        assert!(sql.contains("ProficiencyLevel TEXT"));
        assert!(sql.contains("FOREIGN KEY (AlumniID) REFERENCES Alumni(AlumniID)"));
        assert!(sql.contains("FOREIGN KEY (SkillID) REFERENCES Skills(SkillID)"));
    }

    #[test]
    fn test_identity_column() {
        let sql = generate_create_table(&ALUMNI);
        assert!(sql.contains("AlumniID INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("GraduationYear INTEGER,"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes(&ALUMNI_SKILLS);
        assert!(indexes.iter().any(|i| i.contains("idx_Alumni_Skills_SkillID")));

        let indexes = generate_indexes(&SKILLS);
        assert_eq!(
            indexes,
            vec!["CREATE UNIQUE INDEX idx_Skills_SkillName ON Skills(SkillName)"]
        );
    }

    #[test]
    fn test_schema_script_drops_before_creates() {
        let script = generate_schema_script().unwrap();
        let drop_pos = script.find("DROP TABLE IF EXISTS Alumni;").unwrap();
        let create_pos = script.find("CREATE TABLE Alumni (").unwrap();
        assert!(drop_pos < create_pos);
        assert!(
            script.find("DROP TABLE IF EXISTS Alumni_Skills;").unwrap() < drop_pos
        );
    }
}
