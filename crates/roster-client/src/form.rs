//! The add/edit form.

use roster_types::{Student, StudentInput};
use std::str::FromStr;
use thiserror::Error;

/// Reasons a form cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Age must be a whole number")]
    InvalidAge,
}

/// One editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Age,
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(FormField::Name),
            "email" => Ok(FormField::Email),
            "age" => Ok(FormField::Age),
            other => Err(format!("unknown field: {other}")),
        }
    }
}

/// Raw field values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub age: String,
}

impl StudentForm {
    /// Pre-fills the form from an existing record.
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            age: student.age.to_string(),
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Age => self.age = value,
        }
    }

    /// Every field must be filled in and age must be an integer.
    pub fn to_input(&self) -> Result<StudentInput, FormError> {
        let name = required(&self.name, "Name")?;
        let email = required(&self.email, "Email")?;
        let age = required(&self.age, "Age")?
            .parse::<i64>()
            .map_err(|_| FormError::InvalidAge)?;
        Ok(StudentInput::new(name, email, age))
    }
}

fn required<'a>(value: &'a str, label: &'static str) -> Result<&'a str, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Missing(label));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_form_converts() {
        let form = StudentForm {
            name: " Ann ".to_string(),
            email: "a@x.com".to_string(),
            age: "20".to_string(),
        };
        assert_eq!(form.to_input(), Ok(StudentInput::new("Ann", "a@x.com", 20)));
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        let mut form = StudentForm::default();
        assert_eq!(form.to_input(), Err(FormError::Missing("Name")));

        form.set(FormField::Name, "Ann");
        assert_eq!(form.to_input(), Err(FormError::Missing("Email")));

        form.set(FormField::Email, "a@x.com");
        assert_eq!(form.to_input(), Err(FormError::Missing("Age")));

        form.set(FormField::Age, "twenty");
        assert_eq!(form.to_input(), Err(FormError::InvalidAge));
    }

    #[test]
    fn prefill_from_student() {
        let form = StudentForm::from_student(&Student {
            id: 3,
            name: "Bob".to_string(),
            email: "b@x.com".to_string(),
            age: 31,
        });
        assert_eq!(form.age, "31");
        assert_eq!(form.to_input().unwrap().name.as_deref(), Some("Bob"));
    }

    #[test]
    fn field_names_parse_case_insensitively() {
        assert_eq!("EMAIL".parse::<FormField>(), Ok(FormField::Email));
        assert!("phone".parse::<FormField>().is_err());
    }
}
