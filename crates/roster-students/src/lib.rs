//! Student records and their marks.
//!
//! Every operation here is a single parameterized statement against a
//! `rusqlite::Connection`; no business logic lives in the database. The
//! [`StudentStore`] trait bundles these statements behind the handle the
//! HTTP layer is given, so handlers can be exercised against test doubles.

mod store;

pub use store::{SqliteStudentStore, StudentStore};

use roster_types::{Mark, Student, StudentFields};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Errors that can occur during student operations.
///
/// Database and pool failures display the underlying message unchanged;
/// the HTTP layer reports it to clients verbatim.
#[derive(Debug, Error)]
pub enum StudentError {
    #[error("student not found: {0}")]
    NotFound(i64),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
    #[error(transparent)]
    Pool(#[from] r2d2::Error),
}

const STUDENT_COLUMNS: &str = "id, name, email, age";

/// Binds a JSON scalar as the closest SQLite value. Column affinity and
/// constraints then decide what is stored.
fn bind(field: &Option<Value>) -> SqlValue {
    match field {
        None | Some(Value::Null) => SqlValue::Null,
        Some(Value::Bool(b)) => SqlValue::Integer(i64::from(*b)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
        },
        Some(Value::String(text)) => SqlValue::Text(text.clone()),
        Some(other) => SqlValue::Text(other.to_string()),
    }
}

/// Inserts a new student and returns it with its assigned id.
pub fn create_student(conn: &Connection, fields: &StudentFields) -> Result<Student, StudentError> {
    let student = conn.query_row(
        &format!(
            "INSERT INTO students (name, email, age) VALUES (?1, ?2, ?3) RETURNING {STUDENT_COLUMNS}"
        ),
        params![bind(&fields.name), bind(&fields.email), bind(&fields.age)],
        map_row_to_student,
    )?;
    tracing::debug!(student_id = student.id, "created student");
    Ok(student)
}

/// Total number of student records.
pub fn count_students(conn: &Connection) -> Result<i64, StudentError> {
    let total = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
    Ok(total)
}

/// Lists one slice of students, ordered by id ascending.
pub fn list_students(
    conn: &Connection,
    limit: u32,
    offset: i64,
) -> Result<Vec<Student>, StudentError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students ORDER BY id ASC LIMIT ?1 OFFSET ?2"
    ))?;

    let rows = stmt.query_map(params![limit, offset], map_row_to_student)?;
    let mut students = Vec::new();
    for row in rows {
        students.push(row?);
    }
    Ok(students)
}

/// Retrieves a student by id.
pub fn get_student(conn: &Connection, id: i64) -> Result<Student, StudentError> {
    conn.query_row(
        &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
        [id],
        map_row_to_student,
    )
    .optional()?
    .ok_or(StudentError::NotFound(id))
}

/// Replaces name, email and age of an existing student in one statement.
pub fn update_student(
    conn: &Connection,
    id: i64,
    fields: &StudentFields,
) -> Result<Student, StudentError> {
    conn.query_row(
        &format!(
            "UPDATE students SET name = ?1, email = ?2, age = ?3 WHERE id = ?4 RETURNING {STUDENT_COLUMNS}"
        ),
        params![bind(&fields.name), bind(&fields.email), bind(&fields.age), id],
        map_row_to_student,
    )
    .optional()?
    .ok_or(StudentError::NotFound(id))
}

/// Deletes a student. Its marks go with it (`ON DELETE CASCADE`).
pub fn delete_student(conn: &Connection, id: i64) -> Result<(), StudentError> {
    let count = conn.execute("DELETE FROM students WHERE id = ?1", [id])?;
    if count == 0 {
        return Err(StudentError::NotFound(id));
    }
    tracing::debug!(student_id = id, "deleted student");
    Ok(())
}

/// Lists every mark referencing `student_id`, ordered by mark id.
///
/// Columns other than `id` and `student_id` are copied into
/// [`Mark::fields`] as-is. An unknown student simply has no marks.
pub fn list_marks(conn: &Connection, student_id: i64) -> Result<Vec<Mark>, StudentError> {
    let mut stmt = conn.prepare("SELECT * FROM marks WHERE student_id = ?1 ORDER BY id ASC")?;
    let columns = column_names(&stmt);

    let rows = stmt.query_map([student_id], |row| map_row_to_mark(row, &columns))?;
    let mut marks = Vec::new();
    for row in rows {
        marks.push(row?);
    }
    Ok(marks)
}

/// Records a mark for a student and returns the stored row. Not reachable
/// over HTTP; marks are read-only there.
pub fn add_mark(
    conn: &Connection,
    student_id: i64,
    subject: &str,
    score: i64,
) -> Result<Mark, StudentError> {
    let mut stmt = conn.prepare(
        "INSERT INTO marks (student_id, subject, score) VALUES (?1, ?2, ?3) RETURNING *",
    )?;
    let columns = column_names(&stmt);
    let mark = stmt.query_row(params![student_id, subject, score], |row| {
        map_row_to_mark(row, &columns)
    })?;
    Ok(mark)
}

fn column_names(stmt: &rusqlite::Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn map_row_to_student(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        age: row.get(3)?,
    })
}

fn map_row_to_mark(row: &Row, columns: &[String]) -> rusqlite::Result<Mark> {
    let mut fields = Map::new();
    for (idx, column) in columns.iter().enumerate() {
        if column == "id" || column == "student_id" {
            continue;
        }
        fields.insert(column.clone(), sql_value_to_json(row.get_ref(idx)?));
    }

    Ok(Mark {
        id: row.get("id")?,
        student_id: row.get("student_id")?,
        fields,
    })
}

fn sql_value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(hex::encode(bytes)),
    }
}
