//! Persisted student and subject shapes.

use crate::id::{StudentId, SubjectId};
use serde::{Deserialize, Serialize};

/// A persisted student.
///
/// The student owns its subjects. There is no way to reach a [`Subject`]
/// except through its student, and [`replace_subjects`](Self::replace_subjects)
/// hands back the rows it discards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned id, `None` until first saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<StudentId>,
    /// Full name (required, indexed).
    pub name: String,
    /// Contact email (required, unique).
    pub email: String,
    /// Age in years (required).
    pub age: Option<u32>,
    /// Gender.
    pub gender: Option<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    #[serde(default)]
    subjects: Vec<Subject>,
}

impl Student {
    /// Creates an unsaved student with the required fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age: Some(age),
            ..Self::default()
        }
    }

    /// Returns the owned subjects in order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Appends a subject.
    pub fn add_subject(&mut self, subject: Subject) {
        self.subjects.push(subject);
    }

    /// Replaces the subject list, returning the discarded subjects.
    pub fn replace_subjects(&mut self, subjects: Vec<Subject>) -> Vec<Subject> {
        std::mem::replace(&mut self.subjects, subjects)
    }

    /// Builder form of [`add_subject`](Self::add_subject).
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.add_subject(subject);
        self
    }

    /// Builder form of [`replace_subjects`](Self::replace_subjects).
    pub fn with_subjects(mut self, subjects: Vec<Subject>) -> Self {
        self.subjects = subjects;
        self
    }

    pub(crate) fn subjects_mut(&mut self) -> &mut [Subject] {
        &mut self.subjects
    }
}

/// A subject owned by a [`Student`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Store-assigned id, `None` until its student is saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubjectId>,
    /// Subject name.
    pub name: Option<String>,
    /// Credit count.
    pub credits: Option<u32>,
    /// Free-form description.
    pub description: Option<String>,
}

impl Subject {
    /// Creates an unsaved subject.
    pub fn new(name: impl Into<String>, credits: u32) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            credits: Some(credits),
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_subjects_returns_orphans() {
        let mut student = Student::new("John", "john@example.com", 20)
            .with_subject(Subject::new("Math", 3))
            .with_subject(Subject::new("Art", 2));

        let orphans = student.replace_subjects(vec![Subject::new("Physics", 4)]);
        assert_eq!(orphans.len(), 2);
        assert_eq!(student.subjects().len(), 1);
        assert_eq!(student.subjects()[0].name.as_deref(), Some("Physics"));
    }

    #[test]
    fn entity_wire_shape() {
        let student = Student::new("John", "john@example.com", 20)
            .with_subject(Subject::new("Math", 3).with_description("Mathematics"));

        let value = serde_json::to_value(&student).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["phone_number"], serde_json::Value::Null);
        assert_eq!(value["subjects"][0]["description"], "Mathematics");
    }
}
