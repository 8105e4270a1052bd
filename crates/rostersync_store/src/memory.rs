//! In-process student store.

use crate::error::StoreResult;
use crate::id::StudentId;
use crate::model::Student;
use crate::state::StoreState;
use crate::StudentStore;
use parking_lot::RwLock;

/// A student store held entirely in memory.
///
/// Each call takes the store lock once, so every `save` is applied
/// atomically with respect to concurrent readers.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    state: RwLock<StoreState>,
}

impl MemoryStudentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a student by id.
    pub fn find_by_id(&self, id: StudentId) -> Option<Student> {
        self.state.read().find_by_id(id)
    }

    /// Looks up a student by email.
    pub fn find_by_email(&self, email: &str) -> Option<Student> {
        self.state.read().find_by_email(email)
    }

    /// Returns all students with exactly this name, in insertion order.
    pub fn find_by_name(&self, name: &str) -> Vec<Student> {
        self.state.read().find_by_name(name)
    }

    /// Deletes a student together with its subjects.
    pub fn delete(&self, id: StudentId) -> StoreResult<Student> {
        self.state.write().delete(id)
    }

    /// Returns the number of stored students.
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// Returns true if the store holds no students.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of subject rows across all students.
    pub fn subject_count(&self) -> usize {
        self.state.read().subject_count()
    }
}

impl StudentStore for MemoryStudentStore {
    fn find_all(&self) -> StoreResult<Vec<Student>> {
        Ok(self.state.read().find_all())
    }

    fn save(&self, student: Student) -> StoreResult<Student> {
        self.state.write().save(student)
    }
}
