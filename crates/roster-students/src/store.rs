//! The store handle injected into the HTTP layer.

use crate::{
    count_students, create_student, delete_student, get_student, list_marks, list_students,
    update_student, StudentError,
};
use roster_db::DbPool;
use roster_types::{PageRequest, Student, StudentFields, StudentPage, StudentWithMarks};

/// Record store operations backing the `/students` API.
///
/// Methods are blocking; async callers run them on a blocking thread.
pub trait StudentStore: Send + Sync {
    fn create(&self, fields: &StudentFields) -> Result<Student, StudentError>;

    /// Returns the total record count together with the requested slice.
    fn list_page(&self, request: PageRequest) -> Result<StudentPage, StudentError>;

    /// Returns the record merged with all marks referencing it.
    fn get_with_marks(&self, id: i64) -> Result<StudentWithMarks, StudentError>;

    fn update(&self, id: i64, fields: &StudentFields) -> Result<Student, StudentError>;

    fn delete(&self, id: i64) -> Result<(), StudentError>;
}

/// [`StudentStore`] backed by a pooled SQLite database.
#[derive(Clone)]
pub struct SqliteStudentStore {
    pool: DbPool,
}

impl SqliteStudentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl StudentStore for SqliteStudentStore {
    fn create(&self, fields: &StudentFields) -> Result<Student, StudentError> {
        let conn = self.pool.get()?;
        create_student(&conn, fields)
    }

    fn list_page(&self, request: PageRequest) -> Result<StudentPage, StudentError> {
        let conn = self.pool.get()?;
        // Count and slice are independent reads; a write landing between
        // them can make `total` disagree with the slice by that write.
        let total = count_students(&conn)?;
        let students = list_students(&conn, request.limit(), request.offset())?;
        Ok(StudentPage {
            total,
            page: request.page(),
            limit: request.limit(),
            students,
        })
    }

    fn get_with_marks(&self, id: i64) -> Result<StudentWithMarks, StudentError> {
        let conn = self.pool.get()?;
        let student = get_student(&conn, id)?;
        let marks = list_marks(&conn, id)?;
        Ok(StudentWithMarks { student, marks })
    }

    fn update(&self, id: i64, fields: &StudentFields) -> Result<Student, StudentError> {
        let conn = self.pool.get()?;
        update_student(&conn, id, fields)
    }

    fn delete(&self, id: i64) -> Result<(), StudentError> {
        let conn = self.pool.get()?;
        delete_student(&conn, id)
    }
}
