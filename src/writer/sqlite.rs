use log::{debug, info, warn};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::parser::{open_records, SkillRecord};
use crate::schema::{DependencyResolver, ALL_TABLES};

/// Counts of rows created by a bulk load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub alumni: u64,
    pub skills: u64,
    pub links: u64,
}

/// A connection to the alumni skill store. The connection is released when the
/// `Store` is dropped.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store for writing, creating the database file if needed
    pub fn create(db_path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(db_path)?;

        // Enable foreign keys and let readers run alongside a load
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        Ok(Self { conn })
    }

    /// Open an existing store for reading. Never creates the database file.
    pub fn open_read_only(db_path: &Path) -> StoreResult<Self> {
        if !db_path.exists() {
            return Err(StoreError::StoreAbsent(db_path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA query_only = ON;",
        )?;

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Drop all tables and recreate them from the given schema script
    pub fn initialize(&mut self, schema_sql: &str) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        initialize_in(&tx, schema_sql)?;
        tx.commit()?;
        Ok(())
    }

    /// Insert every record in a single transaction. Any failure rolls the
    /// whole load back.
    pub fn bulk_load<I>(&mut self, records: I) -> StoreResult<LoadSummary>
    where
        I: IntoIterator<Item = StoreResult<SkillRecord>>,
    {
        let tx = self.conn.transaction()?;
        let summary = load_in(&tx, records)?;
        tx.commit()?;
        Ok(summary)
    }

    /// Initialize and load as one unit: on failure the previous store
    /// contents are left untouched.
    pub fn rebuild<I>(&mut self, schema_sql: &str, records: I) -> StoreResult<LoadSummary>
    where
        I: IntoIterator<Item = StoreResult<SkillRecord>>,
    {
        let tx = self.conn.transaction()?;
        initialize_in(&tx, schema_sql)?;
        let summary = load_in(&tx, records)?;
        tx.commit()?;
        Ok(summary)
    }

    /// Check that every declared table and column exists
    pub fn verify_schema(&self) -> StoreResult<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1)")?;

        for table in ALL_TABLES {
            let present: Vec<String> = stmt
                .query_map([table.name], |row| row.get(0))?
                .collect::<Result<_, _>>()?;

            if present.is_empty() {
                return Err(StoreError::SchemaMismatch(format!(
                    "missing table {}",
                    table.name
                )));
            }

            for column in table.columns {
                if !present.iter().any(|p| p == column.name) {
                    return Err(StoreError::SchemaMismatch(format!(
                        "missing column {}.{}",
                        table.name, column.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Finalize the database after a load
    pub fn finalize(self) -> StoreResult<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

fn initialize_in(conn: &Connection, schema_sql: &str) -> StoreResult<()> {
    let resolver = DependencyResolver::new();
    let tables = resolver.drop_order().map_err(StoreError::SchemaMismatch)?;

    // Reset known tables even if the schema script does not drop them itself
    for table in tables {
        conn.execute_batch(&format!("DROP TABLE IF EXISTS {};", table.name))?;
    }

    conn.execute_batch(schema_sql)?;
    info!("Created tables: {}", crate::schema::table_names().join(", "));
    Ok(())
}

fn load_in<I>(conn: &Connection, records: I) -> StoreResult<LoadSummary>
where
    I: IntoIterator<Item = StoreResult<SkillRecord>>,
{
    let mut summary = LoadSummary::default();

    for record in records {
        let record = record?;
        let alumni_id = alumnus_id(conn, &record, &mut summary)?;
        let skill_id = skill_id(conn, &record.skill_name, &mut summary)?;

        conn.prepare_cached(
            "INSERT INTO Alumni_Skills (AlumniID, SkillID, ProficiencyLevel) VALUES (?1, ?2, ?3)",
        )?
        .execute(params![alumni_id, skill_id, record.proficiency_level])?;
        summary.links += 1;

        if summary.links % 1000 == 0 {
            debug!("Loaded {} links", summary.links);
        }
    }

    info!(
        "Loaded {} alumni, {} skills, {} links",
        summary.alumni, summary.skills, summary.links
    );
    Ok(summary)
}

/// Look up or create an alumnus by exact (first, last) name
fn alumnus_id(
    conn: &Connection,
    record: &SkillRecord,
    summary: &mut LoadSummary,
) -> StoreResult<i64> {
    let existing = conn
        .prepare_cached("SELECT AlumniID FROM Alumni WHERE FirstName = ?1 AND LastName = ?2")?
        .query_row(params![record.first_name, record.last_name], |row| {
            row.get(0)
        })
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    conn.prepare_cached("INSERT INTO Alumni (FirstName, LastName) VALUES (?1, ?2)")?
        .execute(params![record.first_name, record.last_name])?;
    summary.alumni += 1;
    Ok(conn.last_insert_rowid())
}

/// Look up or create a skill by exact name
fn skill_id(conn: &Connection, skill_name: &str, summary: &mut LoadSummary) -> StoreResult<i64> {
    let existing = conn
        .prepare_cached("SELECT SkillID FROM Skills WHERE SkillName = ?1")?
        .query_row([skill_name], |row| row.get(0))
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    conn.prepare_cached("INSERT INTO Skills (SkillName) VALUES (?1)")?
        .execute([skill_name])?;
    summary.skills += 1;
    Ok(conn.last_insert_rowid())
}

/// (Re)build the store from the schema file, optionally loading a CSV file in
/// the same transaction
pub fn setup_store(config: &Config, csv_path: Option<&Path>) -> StoreResult<LoadSummary> {
    if !config.schema_path.exists() {
        return Err(StoreError::SchemaFileAbsent(config.schema_path.clone()));
    }
    let schema_sql = fs::read_to_string(&config.schema_path)?;
    let records = csv_path.map(open_records).transpose()?;

    // A failed first setup must not leave an empty database behind
    let existed = config.db_path.exists();
    let result = match records {
        Some(records) => build_store(&config.db_path, &schema_sql, records),
        None => build_store(&config.db_path, &schema_sql, std::iter::empty()),
    };

    if result.is_err() && !existed {
        remove_store_files(&config.db_path);
    }
    result
}

fn build_store<I>(db_path: &Path, schema_sql: &str, records: I) -> StoreResult<LoadSummary>
where
    I: IntoIterator<Item = StoreResult<SkillRecord>>,
{
    let mut store = Store::create(db_path)?;
    let summary = store.rebuild(schema_sql, records)?;
    store.finalize()?;
    Ok(summary)
}

/// Remove the database file and its WAL companions
fn remove_store_files(db_path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut name = db_path.as_os_str().to_owned();
        name.push(suffix);
        let path = PathBuf::from(name);

        match fs::remove_file(&path) {
            Ok(()) => debug!("Removed {:?}", path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {:?}: {}", path, e),
        }
    }
}
