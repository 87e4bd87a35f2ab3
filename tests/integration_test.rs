//! Integration tests that build a store from CSV and query it through the
//! lookup service.
//!
//! Run with:
//! ```sh
//! cargo test --test integration_test
//! ```

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use alumni_matcher::config::Config;
use alumni_matcher::lookup::{AlumniMatch, LookupService, ProficiencyRank};
use alumni_matcher::parser::{read_records, SkillRecord};
use alumni_matcher::writer::{generate_schema_script, setup_store, Store};
use alumni_matcher::StoreError;

// =============================================================================
// Test Configuration
// =============================================================================

const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

const SAMPLE_CSV: &str = include_str!("../data/alumni_skills.csv");

const PIONEERS_CSV: &str = "\
FirstName,LastName,SkillName,ProficiencyLevel
Ada,Lovelace,Python,Expert
Grace,Hopper,Python,Intermediate
Alan,Turing,Python,Beginner
";

// =============================================================================
// Test Store
// =============================================================================

/// A throwaway store in its own temp directory
struct TestStore {
    dir: TempDir,
    config: Config,
}

impl TestStore {
    /// Empty directory with the schema file written; no database yet
    fn empty() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let schema_path = dir.path().join("schema.sql");
        fs::write(&schema_path, SCHEMA_SQL).expect("Failed to write schema");

        let config = Config {
            db_path: dir.path().join("alumni_matcher.db"),
            schema_path,
            ..Config::default()
        };

        Self { dir, config }
    }

    /// Store built by `setup` from the given CSV text
    fn from_csv(csv: &str) -> Self {
        let store = Self::empty();
        let csv_path = store.write_file("load.csv", csv);
        setup_store(&store.config, Some(&csv_path)).expect("Failed to set up store");
        store
    }

    fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    fn lookup(&self) -> LookupService {
        LookupService::new(&self.config)
    }

    fn connection(&self) -> Connection {
        Connection::open(&self.config.db_path).expect("Failed to open test database")
    }

    fn count(&self, table: &str) -> i64 {
        self.connection()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .expect("Failed to count rows")
    }
}

fn find(store: &TestStore, skill: &str) -> Vec<AlumniMatch> {
    let outcome = store.lookup().find_alumni_by_skill(skill);
    assert!(!outcome.is_degraded(), "lookup degraded: {:?}", outcome.fault());
    outcome.into_items()
}

fn last_names(matches: &[AlumniMatch]) -> Vec<&str> {
    matches.iter().map(|m| m.last_name.as_str()).collect()
}

/// Expert < Intermediate < other, last names non-decreasing within a rank
fn assert_ranked(matches: &[AlumniMatch]) {
    for pair in matches.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.rank() <= b.rank(), "{:?} sorted after {:?}", b, a);
        if a.rank() == b.rank() {
            assert!(a.last_name <= b.last_name, "{:?} sorted after {:?}", b, a);
        }
    }
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_pioneers_ranked_by_proficiency() {
    let store = TestStore::from_csv(PIONEERS_CSV);
    let matches = find(&store, "python");

    assert_eq!(last_names(&matches), vec!["Lovelace", "Hopper", "Turing"]);
    assert_eq!(matches[0].proficiency_level.as_deref(), Some("Expert"));
    assert_eq!(matches[1].proficiency_level.as_deref(), Some("Intermediate"));
    assert_eq!(matches[2].proficiency_level.as_deref(), Some("Beginner"));
    assert_eq!(matches[0].first_name, "Ada");
}

#[test]
fn test_matching_ignores_case() {
    let store = TestStore::from_csv(SAMPLE_CSV);

    let lower = find(&store, "python");
    assert!(!lower.is_empty());
    assert_eq!(lower, find(&store, "PYTHON"));
    assert_eq!(lower, find(&store, "Python"));
}

#[test]
fn test_results_carry_stored_skill_name() {
    let store = TestStore::from_csv(SAMPLE_CSV);

    let matches = find(&store, "dAtA aNaLySiS");
    assert_eq!(matches.len(), 4);
    for m in matches {
        assert_eq!(m.skill_name, "Data Analysis");
    }
}

#[test]
fn test_every_result_matches_query() {
    let store = TestStore::from_csv(SAMPLE_CSV);
    let skills = store.lookup().all_skills().into_items();

    for skill in &skills {
        let query = skill.to_uppercase();
        let matches = find(&store, &query);
        assert!(!matches.is_empty(), "no matches for {}", query);
        assert!(matches.iter().all(|m| m.skill_name.eq_ignore_ascii_case(&query)));
        assert_ranked(&matches);
    }
}

#[test]
fn test_match_is_exact_not_substring() {
    let store = TestStore::from_csv(SAMPLE_CSV);

    assert!(find(&store, "Pyth").is_empty());
    assert!(find(&store, "Python ").is_empty());
    assert!(find(&store, "Pyth%").is_empty());
    assert!(find(&store, "Pyth_n").is_empty());
}

#[test]
fn test_unknown_skill_is_empty() {
    let store = TestStore::from_csv(SAMPLE_CSV);
    assert!(find(&store, "Quantum Knitting").is_empty());
}

#[test]
fn test_empty_input_is_empty() {
    let store = TestStore::from_csv(SAMPLE_CSV);
    assert!(find(&store, "").is_empty());
}

#[test]
fn test_missing_proficiency_ranks_last() {
    let store = TestStore::from_csv(
        "FirstName,LastName,SkillName,ProficiencyLevel\n\
         Pat,Abbott,SQL,\n\
         Sam,Young,SQL,Expert\n\
         Kim,Moore,SQL,intermediate\n\
         Lou,Baker,SQL,Intermediate\n",
    );

    let matches = find(&store, "sql");
    assert_eq!(last_names(&matches), vec!["Young", "Baker", "Abbott", "Moore"]);
    assert_eq!(matches[2].proficiency_level, None);
    assert_eq!(matches[3].rank(), ProficiencyRank::Other);
    assert_ranked(&matches);
}

#[test]
fn test_equal_last_names_keep_load_order() {
    let store = TestStore::from_csv(
        "FirstName,LastName,SkillName,ProficiencyLevel\n\
         Sam,Lee,Go,Expert\n\
         Pat,Lee,Go,Expert\n",
    );

    let matches = find(&store, "go");
    let firsts: Vec<_> = matches.iter().map(|m| m.first_name.as_str()).collect();
    assert_eq!(firsts, vec!["Sam", "Pat"]);
}

// =============================================================================
// Skill Catalog Tests
// =============================================================================

#[test]
fn test_catalog_sorted_and_distinct() {
    let store = TestStore::from_csv(SAMPLE_CSV);
    let skills = store.lookup().all_skills().into_items();

    let mut expected = skills.clone();
    expected.sort();
    expected.dedup();
    assert_eq!(skills, expected);
    assert!(skills.contains(&"Python".to_string()));
    assert!(skills.contains(&"Data Analysis".to_string()));
}

#[test]
fn test_catalog_read_is_repeatable() {
    let store = TestStore::from_csv(SAMPLE_CSV);
    let lookup = store.lookup();

    let first = lookup.all_skills().into_items();
    let second = lookup.all_skills().into_items();
    assert_eq!(first, second);
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_repeated_name_pair_is_one_alumnus() {
    let store = TestStore::from_csv(
        "FirstName,LastName,SkillName,ProficiencyLevel\n\
         Pat,Lee,SQL,Expert\n\
         Pat,Lee,Rust,Beginner\n",
    );

    assert_eq!(store.count("Alumni"), 1);
    assert_eq!(store.count("Alumni_Skills"), 2);
    assert_eq!(find(&store, "rust")[0].last_name, "Lee");
}

#[test]
fn test_names_differing_only_in_padding_are_one_alumnus() {
    let store = TestStore::from_csv(
        "FirstName,LastName,SkillName,ProficiencyLevel\n\
         Grace ,Hopper,COBOL,Expert\n\
         Grace, Hopper ,Python,Intermediate\n",
    );

    assert_eq!(store.count("Alumni"), 1);
    assert_eq!(store.count("Alumni_Skills"), 2);
    assert_eq!(find(&store, "cobol")[0].first_name, "Grace");
}

#[test]
fn test_sample_file_counts() {
    let store = TestStore::from_csv(SAMPLE_CSV);
    let rows = SAMPLE_CSV.lines().count() as i64 - 1;

    assert_eq!(store.count("Alumni_Skills"), rows);
    assert_eq!(store.count("Alumni"), 7);
    assert_eq!(store.count("Skills"), 7);
}

#[test]
fn test_failed_setup_keeps_previous_store() {
    let store = TestStore::from_csv(PIONEERS_CSV);
    let bad_csv = store.write_file(
        "bad.csv",
        "FirstName,LastName,SkillName,ProficiencyLevel\n\
         Katherine,Johnson,Orbital Mechanics,Expert\n\
         Nobody,,Orbital Mechanics,Expert\n",
    );

    let result = setup_store(&store.config, Some(&bad_csv));
    assert!(matches!(result, Err(StoreError::InvalidRecord { row: 2, .. })));

    assert_eq!(store.count("Alumni"), 3);
    assert!(find(&store, "orbital mechanics").is_empty());
    assert_eq!(last_names(&find(&store, "python")), vec!["Lovelace", "Hopper", "Turing"]);
}

#[test]
fn test_failed_first_setup_leaves_no_store() {
    let store = TestStore::empty();
    let bad_csv = store.write_file(
        "bad.csv",
        "FirstName,LastName,SkillName,ProficiencyLevel\n\
         Katherine,Johnson,,Expert\n",
    );

    let result = setup_store(&store.config, Some(&bad_csv));
    assert!(matches!(result, Err(StoreError::InvalidRecord { row: 1, .. })));
    assert!(!store.config.db_path.exists());

    let err = store.lookup().check_store().unwrap_err();
    assert!(matches!(err, StoreError::StoreAbsent(_)));
}

#[test]
fn test_missing_csv_keeps_previous_store() {
    let store = TestStore::from_csv(PIONEERS_CSV);
    let missing = store.dir.path().join("nope.csv");

    assert!(matches!(
        setup_store(&store.config, Some(&missing)),
        Err(StoreError::Io(_))
    ));
    assert_eq!(store.count("Alumni_Skills"), 3);
}

#[test]
fn test_setup_without_csv_creates_empty_store() {
    let store = TestStore::empty();
    let summary = setup_store(&store.config, None).unwrap();

    assert_eq!(summary.links, 0);
    store.lookup().check_store().unwrap();
    assert!(find(&store, "python").is_empty());
}

#[test]
fn test_bulk_load_appends_to_existing_store() {
    let store = TestStore::from_csv(PIONEERS_CSV);
    let mut writer = Store::create(&store.config.db_path).unwrap();

    let summary = writer
        .bulk_load(read_records(
            "FirstName,LastName,SkillName,ProficiencyLevel\nAda,Lovelace,Mathematics,Expert\n"
                .as_bytes(),
        ))
        .unwrap();

    assert_eq!(summary.alumni, 0);
    assert_eq!(summary.skills, 1);
    assert_eq!(store.count("Alumni"), 3);
    assert_eq!(find(&store, "mathematics")[0].first_name, "Ada");
}

#[test]
fn test_bulk_load_with_records() {
    let store = TestStore::empty();
    setup_store(&store.config, None).unwrap();

    let mut writer = Store::create(&store.config.db_path).unwrap();
    writer
        .bulk_load(vec![
            Ok(SkillRecord::new("Grace", "Hopper", "COBOL", Some("Expert"))),
            Ok(SkillRecord::new("Jean", "Sammet", "COBOL", Some("Expert"))),
        ])
        .unwrap();

    assert_eq!(last_names(&find(&store, "cobol")), vec!["Hopper", "Sammet"]);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_missing_schema_file_is_fatal_and_touches_nothing() {
    let store = TestStore::empty();
    let config = Config {
        schema_path: Path::new("/nonexistent/schema.sql").to_path_buf(),
        ..store.config.clone()
    };

    assert!(matches!(
        setup_store(&config, None),
        Err(StoreError::SchemaFileAbsent(_))
    ));
    assert!(!config.db_path.exists());
}

#[test]
fn test_absent_store_reported_before_serving() {
    let store = TestStore::empty();
    let lookup = store.lookup();

    let err = lookup.check_store().unwrap_err();
    assert!(matches!(err, StoreError::StoreAbsent(_)));
    assert!(err.to_string().contains("setup"));

    let outcome = lookup.find_alumni_by_skill("python");
    assert!(outcome.is_degraded());
    assert!(outcome.items().is_empty());
    assert!(!store.config.db_path.exists());
}

#[test]
fn test_store_without_tables_degrades() {
    let store = TestStore::empty();
    Connection::open(&store.config.db_path)
        .and_then(|conn| conn.execute_batch("CREATE TABLE Unrelated (x INTEGER)"))
        .expect("Failed to create bare database");
    let lookup = store.lookup();

    assert!(matches!(lookup.check_store(), Err(StoreError::SchemaMismatch(_))));

    let alumni = lookup.find_alumni_by_skill("python");
    assert!(alumni.is_degraded());
    assert!(alumni.items().is_empty());

    let skills = lookup.all_skills();
    assert!(skills.is_degraded());
    assert!(skills.items().is_empty());
}

#[test]
fn test_non_sqlite_file_degrades() {
    let store = TestStore::empty();
    store.write_file("alumni_matcher.db", "FirstName,LastName\nAda,Lovelace\n");
    let lookup = store.lookup();

    assert!(lookup.check_store().is_err());

    let alumni = lookup.find_alumni_by_skill("python");
    assert!(alumni.is_degraded());
    assert!(alumni.items().is_empty());

    let skills = lookup.all_skills();
    assert!(skills.is_degraded());
    assert!(skills.items().is_empty());
}

#[test]
fn test_reads_do_not_modify_store() {
    let store = TestStore::from_csv(SAMPLE_CSV);
    let before = store.count("Alumni_Skills");

    find(&store, "python");
    store.lookup().all_skills();

    assert_eq!(store.count("Alumni_Skills"), before);
}

// =============================================================================
// Schema Tests
// =============================================================================

fn table_layout(conn: &Connection) -> Vec<(String, String, String, i64, i64)> {
    let mut stmt = conn
        .prepare(
            "SELECT m.name, p.name, p.type, p.\"notnull\", p.pk
             FROM sqlite_master m, pragma_table_info(m.name) p
             WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%'
             ORDER BY m.name, p.cid",
        )
        .unwrap();
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    rows
}

fn index_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%' ORDER BY name")
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap();
    names
}

#[test]
fn test_schema_file_matches_table_definitions() {
    let dir = TempDir::new().unwrap();

    let mut from_file = Store::create(&dir.path().join("file.db")).unwrap();
    from_file.initialize(SCHEMA_SQL).unwrap();

    let mut generated = Store::create(&dir.path().join("generated.db")).unwrap();
    generated
        .initialize(&generate_schema_script().unwrap())
        .unwrap();

    assert_eq!(
        table_layout(from_file.connection()),
        table_layout(generated.connection())
    );
    assert_eq!(
        index_names(from_file.connection()),
        index_names(generated.connection())
    );
    from_file.verify_schema().unwrap();
}

#[test]
fn test_direct_duplicate_skill_rejected() {
    let store = TestStore::from_csv(PIONEERS_CSV);
    let result = store
        .connection()
        .execute("INSERT INTO Skills (SkillName) VALUES ('Python')", []);
    assert!(result.is_err());
}
