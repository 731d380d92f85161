//! Shared wire types for the Roster student-record service.
//!
//! Both the server and the client depend on this crate, so the JSON shapes
//! exchanged over `/students` and the pagination math are defined exactly
//! once. Nothing here touches the database or the network.

pub mod pagination;

pub use pagination::{page_count, page_numbers, PageRequest, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message returned for every id-addressed operation whose id does not resolve.
pub const STUDENT_NOT_FOUND: &str = "Student not found";

/// Acknowledgment message returned by a successful delete.
pub const STUDENT_DELETED: &str = "Student deleted";

/// A persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned identifier. Never changes and is never reused.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// A create or update request as the client builds it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
}

impl StudentInput {
    /// Builds a fully populated input.
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i64) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            age: Some(age),
        }
    }
}

/// A create or update request as the server receives it.
///
/// Each field keeps whatever JSON scalar was sent, untyped. The store binds
/// it unchanged and the schema decides whether the write is accepted; an
/// absent or `null` field becomes SQL `NULL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentFields {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub age: Option<Value>,
}

impl StudentFields {
    /// Picks `name`, `email` and `age` out of a decoded request body. Any
    /// body that is not a JSON object carries no fields.
    pub fn from_body(body: Value) -> Self {
        let Value::Object(mut map) = body else {
            return Self::default();
        };
        let mut take = |key: &str| map.remove(key).filter(|value| !value.is_null());
        Self {
            name: take("name"),
            email: take("email"),
            age: take("age"),
        }
    }
}

impl From<&StudentInput> for StudentFields {
    fn from(input: &StudentInput) -> Self {
        Self {
            name: input.name.clone().map(Value::String),
            email: input.email.clone().map(Value::String),
            age: input.age.map(Value::from),
        }
    }
}

impl From<StudentInput> for StudentFields {
    fn from(input: StudentInput) -> Self {
        Self::from(&input)
    }
}

/// A mark row, passed through verbatim.
///
/// Only `id` and `student_id` are known to the service; every other column
/// of the `marks` table is carried in `fields` under its column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub id: i64,
    pub student_id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Response of `GET /students/{id}`: the record merged with its marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentWithMarks {
    #[serde(flatten)]
    pub student: Student,
    pub marks: Vec<Mark>,
}

/// Response of `GET /students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPage {
    /// Total number of records in the store, not just on this page.
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub students: Vec<Student>,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of a delete acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_keep_raw_scalars() {
        let fields = StudentFields::from_body(
            json!({"name": 123, "email": "a@x.com", "age": "20", "extra": true}),
        );
        assert_eq!(fields.name, Some(json!(123)));
        assert_eq!(fields.email, Some(json!("a@x.com")));
        assert_eq!(fields.age, Some(json!("20")));
    }

    #[test]
    fn null_and_missing_fields_are_absent() {
        let fields = StudentFields::from_body(json!({"name": "Ann", "email": null}));
        assert_eq!(fields.name, Some(json!("Ann")));
        assert_eq!(fields.email, None);
        assert_eq!(fields.age, None);
    }

    #[test]
    fn non_object_body_has_no_fields() {
        assert_eq!(StudentFields::from_body(json!([1, 2])), StudentFields::default());
        assert_eq!(StudentFields::from_body(json!("Ann")), StudentFields::default());
    }

    #[test]
    fn input_converts_to_fields() {
        let fields = StudentFields::from(StudentInput::new("Ann", "a@x.com", 20));
        assert_eq!(
            fields,
            StudentFields {
                name: Some(json!("Ann")),
                email: Some(json!("a@x.com")),
                age: Some(json!(20)),
            }
        );
    }

    #[test]
    fn student_with_marks_flattens_record() {
        let mut fields = Map::new();
        fields.insert("subject".to_string(), json!("Maths"));
        fields.insert("score".to_string(), json!(88));

        let value = serde_json::to_value(StudentWithMarks {
            student: Student {
                id: 7,
                name: "Ann".to_string(),
                email: "a@x.com".to_string(),
                age: 20,
            },
            marks: vec![Mark {
                id: 1,
                student_id: 7,
                fields,
            }],
        })
        .unwrap();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "name": "Ann",
                "email": "a@x.com",
                "age": 20,
                "marks": [{"id": 1, "student_id": 7, "subject": "Maths", "score": 88}]
            })
        );
    }
}
