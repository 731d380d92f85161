use roster_db::{open_roster_db, run_migrations, DbRuntimeSettings};

fn table_names(conn: &rusqlite::Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .expect("failed to prepare table query");
    stmt.query_map([], |row| row.get(0))
        .expect("failed to execute table query")
        .map(|r| r.expect("failed to read table name"))
        .collect()
}

#[test]
fn opened_database_has_roster_schema() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("roster.db");
    let pool = open_roster_db(path.to_str().unwrap(), DbRuntimeSettings::default())
        .expect("failed to open database");

    let conn = pool.get().expect("failed to get connection");
    assert_eq!(table_names(&conn), vec!["_roster_migrations", "marks", "students"]);

    let recorded: i64 = conn
        .query_row("SELECT COUNT(*) FROM _roster_migrations", [], |row| row.get(0))
        .unwrap();
    assert_eq!(recorded, 2);
}

#[test]
fn reopening_keeps_data_and_applies_nothing() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("roster.db");
    let path = path.to_str().unwrap();

    {
        let pool = open_roster_db(path, DbRuntimeSettings::default()).unwrap();
        pool.get()
            .unwrap()
            .execute(
                "INSERT INTO students (name, email, age) VALUES ('Ann', 'a@x.com', 20)",
                [],
            )
            .unwrap();
    }

    let pool = open_roster_db(path, DbRuntimeSettings::default()).unwrap();
    let conn = pool.get().unwrap();
    assert_eq!(run_migrations(&conn).unwrap(), 0);
    let names: i64 = conn
        .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
        .unwrap();
    assert_eq!(names, 1);
}

#[test]
fn deleting_a_student_cascades_to_marks_on_every_connection() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("roster.db");
    let pool = open_roster_db(path.to_str().unwrap(), DbRuntimeSettings::default()).unwrap();

    // Hold one connection so the next checkout is a fresh one.
    let first = pool.get().unwrap();
    first
        .execute(
            "INSERT INTO students (name, email, age) VALUES ('Ann', 'a@x.com', 20)",
            [],
        )
        .unwrap();
    let id = first.last_insert_rowid();
    first
        .execute(
            "INSERT INTO marks (student_id, subject, score) VALUES (?1, 'Maths', 90)",
            [id],
        )
        .unwrap();

    let second = pool.get().unwrap();
    second
        .execute("DELETE FROM students WHERE id = ?1", [id])
        .unwrap();

    let remaining: i64 = first
        .query_row("SELECT COUNT(*) FROM marks", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}
