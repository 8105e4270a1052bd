//! # Rostersync Store
//!
//! Persistent student records for rostersync.
//!
//! This crate provides:
//! - `Student` and `Subject`, the persisted shapes
//! - The `StudentStore` repository trait (`find_all`, `save`)
//! - `MemoryStudentStore`, an in-process store
//! - `FileStudentStore`, a store that snapshots to a JSON file
//!
//! ## Invariants
//!
//! - A student id is assigned on first save and never reused
//! - Email is unique across the store
//! - A student exclusively owns its subjects; replacing or deleting the
//!   student discards the orphaned subject rows
//! - `find_all` returns students in insertion order

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod error;
mod file;
mod id;
mod memory;
mod model;
mod state;

pub use error::{StoreError, StoreResult};
pub use file::FileStudentStore;
pub use id::{StudentId, SubjectId};
pub use memory::MemoryStudentStore;
pub use model::{Student, Subject};

/// Repository of persisted students.
///
/// Implementations provide their own per-call synchronization; callers
/// share a store across threads without extra locking.
pub trait StudentStore: Send + Sync {
    /// Returns every stored student in insertion order.
    fn find_all(&self) -> StoreResult<Vec<Student>>;

    /// Inserts or updates a student.
    ///
    /// A student without an id is inserted and receives a fresh id. A
    /// student with an id replaces the stored version. The stored form,
    /// with all ids assigned, is returned.
    fn save(&self, student: Student) -> StoreResult<Student>;
}

impl<S: StudentStore + ?Sized> StudentStore for std::sync::Arc<S> {
    fn find_all(&self) -> StoreResult<Vec<Student>> {
        (**self).find_all()
    }

    fn save(&self, student: Student) -> StoreResult<Student> {
        (**self).save(student)
    }
}
