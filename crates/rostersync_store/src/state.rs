//! Store contents and secondary indexes shared by both store backends.

use crate::error::{StoreError, StoreResult};
use crate::id::{StudentId, SubjectId};
use crate::model::Student;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Serializable form of the store, written by the file backend.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    next_student_id: u64,
    next_subject_id: u64,
    students: Vec<Student>,
}

/// In-memory tables plus the email (unique) and name indexes.
#[derive(Debug, Clone)]
pub(crate) struct StoreState {
    students: BTreeMap<StudentId, Student>,
    by_email: HashMap<String, StudentId>,
    by_name: HashMap<String, BTreeSet<StudentId>>,
    next_student_id: u64,
    next_subject_id: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            students: BTreeMap::new(),
            by_email: HashMap::new(),
            by_name: HashMap::new(),
            next_student_id: 1,
            next_subject_id: 1,
        }
    }
}

impl StoreState {
    /// Rebuilds the state and its indexes from a snapshot.
    pub(crate) fn from_snapshot(snapshot: Snapshot) -> StoreResult<Self> {
        let mut state = Self {
            next_student_id: snapshot.next_student_id.max(1),
            next_subject_id: snapshot.next_subject_id.max(1),
            ..Self::default()
        };
        for student in snapshot.students {
            let id = student.id.ok_or(StoreError::MissingField { field: "id" })?;
            state.index(id, &student);
            state.students.insert(id, student);
        }
        Ok(state)
    }

    pub(crate) fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            next_student_id: self.next_student_id,
            next_subject_id: self.next_subject_id,
            students: self.students.values().cloned().collect(),
        }
    }

    pub(crate) fn find_all(&self) -> Vec<Student> {
        self.students.values().cloned().collect()
    }

    pub(crate) fn find_by_id(&self, id: StudentId) -> Option<Student> {
        self.students.get(&id).cloned()
    }

    pub(crate) fn find_by_email(&self, email: &str) -> Option<Student> {
        self.by_email
            .get(email)
            .and_then(|id| self.students.get(id))
            .cloned()
    }

    pub(crate) fn find_by_name(&self, name: &str) -> Vec<Student> {
        self.by_name
            .get(name)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.students.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.students.len()
    }

    pub(crate) fn subject_count(&self) -> usize {
        self.students.values().map(|s| s.subjects().len()).sum()
    }

    pub(crate) fn save(&mut self, mut student: Student) -> StoreResult<Student> {
        validate(&student)?;

        let id = match student.id {
            Some(id) if !self.students.contains_key(&id) => return Err(StoreError::NotFound(id)),
            Some(id) => id,
            None => StudentId::new(self.next_student_id),
        };

        if let Some(&existing) = self.by_email.get(&student.email) {
            if existing != id {
                return Err(StoreError::DuplicateEmail {
                    email: student.email,
                    existing,
                });
            }
        }

        if student.id.is_none() {
            self.next_student_id += 1;
        }
        student.id = Some(id);
        for subject in student.subjects_mut() {
            if subject.id.is_none() {
                subject.id = Some(SubjectId::new(self.next_subject_id));
                self.next_subject_id += 1;
            }
        }

        if let Some(previous) = self.students.remove(&id) {
            self.unindex(id, &previous);
            let orphaned = previous
                .subjects()
                .iter()
                .filter(|old| student.subjects().iter().all(|new| new.id != old.id))
                .count();
            if orphaned > 0 {
                debug!(student_id = %id, orphaned, "Removed orphaned subjects");
            }
        }

        self.index(id, &student);
        self.students.insert(id, student.clone());
        debug!(student_id = %id, subjects = student.subjects().len(), "Saved student");
        Ok(student)
    }

    pub(crate) fn delete(&mut self, id: StudentId) -> StoreResult<Student> {
        let student = self.students.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.unindex(id, &student);
        debug!(
            student_id = %id,
            subjects = student.subjects().len(),
            "Deleted student and its subjects"
        );
        Ok(student)
    }

    fn index(&mut self, id: StudentId, student: &Student) {
        self.by_email.insert(student.email.clone(), id);
        self.by_name.entry(student.name.clone()).or_default().insert(id);
    }

    fn unindex(&mut self, id: StudentId, student: &Student) {
        self.by_email.remove(&student.email);
        if let Some(ids) = self.by_name.get_mut(&student.name) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_name.remove(&student.name);
            }
        }
    }
}

fn validate(student: &Student) -> StoreResult<()> {
    if student.name.trim().is_empty() {
        return Err(StoreError::MissingField { field: "name" });
    }
    if student.email.trim().is_empty() {
        return Err(StoreError::MissingField { field: "email" });
    }
    if student.age.is_none() {
        return Err(StoreError::MissingField { field: "age" });
    }
    Ok(())
}
