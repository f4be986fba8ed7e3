//! CLI command tests

use tempfile::TempDir;

use crate::commands;

#[test]
fn test_cmd_init_creates_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("billfold.db");

    commands::cmd_init(&db_path).unwrap();
    assert!(db_path.exists());

    // Re-running against an existing database is fine
    commands::cmd_init(&db_path).unwrap();
}

#[test]
fn test_cmd_status_without_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("missing.db");

    // Reports the uninitialized state instead of failing
    commands::cmd_status(&db_path).unwrap();
    assert!(!db_path.exists());
}

#[test]
fn test_cmd_status_with_data() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("billfold.db");

    let db = commands::open_db(&db_path).unwrap();
    db.create_user("alice", "not-a-real-hash").unwrap();

    commands::cmd_status(&db_path).unwrap();
}
