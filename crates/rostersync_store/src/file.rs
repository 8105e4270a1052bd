//! Student store persisted as a JSON snapshot.

use crate::error::StoreResult;
use crate::id::StudentId;
use crate::model::Student;
use crate::state::{Snapshot, StoreState};
use crate::StudentStore;
use parking_lot::RwLock;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A student store that rewrites a JSON snapshot after every change.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// snapshot, so a crash leaves either the old or the new snapshot on disk.
/// A failed write leaves the in-memory state unchanged.
#[derive(Debug)]
pub struct FileStudentStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl FileStudentStore {
    /// Opens the store at `path`, creating an empty one if the file does
    /// not exist.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let bytes = fs::read(&path)?;
            let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
            let state = StoreState::from_snapshot(snapshot)?;
            info!(path = %path.display(), students = state.len(), "Opened student store");
            state
        } else {
            debug!(path = %path.display(), "Creating new student store");
            StoreState::default()
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
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
        self.mutate(|state| state.delete(id))
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

    fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> StoreResult<T>) -> StoreResult<T> {
        let mut guard = self.state.write();
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }

    fn persist(&self, state: &StoreState) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(&state.to_snapshot())?;
        let tmp = self.path.with_extension("tmp");

        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)?;
        self.sync_parent()
    }

    /// Makes the rename durable by syncing the containing directory.
    #[cfg(unix)]
    fn sync_parent(&self) -> StoreResult<()> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()?;
        Ok(())
    }

    /// NTFS journals the rename; directories cannot be opened for sync.
    #[cfg(not(unix))]
    fn sync_parent(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl StudentStore for FileStudentStore {
    fn find_all(&self) -> StoreResult<Vec<Student>> {
        Ok(self.state.read().find_all())
    }

    fn save(&self, student: Student) -> StoreResult<Student> {
        self.mutate(|state| state.save(student))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::model::Subject;
    use tempfile::tempdir;

    #[test]
    fn open_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileStudentStore::open(dir.path().join("students.json")).unwrap();
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn reopen_restores_students_and_indexes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");

        {
            let store = FileStudentStore::open(&path).unwrap();
            store
                .save(Student::new("John", "john@example.com", 20).with_subject(Subject::new("Math", 3)))
                .unwrap();
            store.save(Student::new("Jane", "jane@example.com", 22)).unwrap();
        }

        let store = FileStudentStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_name("John").len(), 1);
        let john = store.find_by_email("john@example.com").unwrap();
        assert_eq!(john.subjects().len(), 1);

        // Counters survive reopen
        let third = store.save(Student::new("Jo", "jo@example.com", 19)).unwrap();
        assert_eq!(third.id, Some(StudentId::new(3)));
    }

    #[test]
    fn failed_save_does_not_touch_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        let store = FileStudentStore::open(&path).unwrap();
        store.save(Student::new("John", "john@example.com", 20)).unwrap();
        let before = fs::read(&path).unwrap();

        let result = store.save(Student::new("Other", "john@example.com", 30));
        assert!(matches!(result, Err(StoreError::DuplicateEmail { .. })));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn save_publishes_snapshot_without_leftover_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        let store = FileStudentStore::open(&path).unwrap();

        let saved = store
            .save(Student::new("John", "john@example.com", 20).with_subject(Subject::new("Math", 3)))
            .unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        assert_eq!(store.subject_count(), 1);

        let reopened = FileStudentStore::open(&path).unwrap();
        let john = reopened.find_by_id(saved.id.unwrap()).unwrap();
        assert_eq!(john.email, "john@example.com");
        assert_eq!(reopened.subject_count(), 1);
    }

    #[test]
    fn delete_is_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        let store = FileStudentStore::open(&path).unwrap();
        let saved = store.save(Student::new("John", "john@example.com", 20)).unwrap();
        store.delete(saved.id.unwrap()).unwrap();

        let reopened = FileStudentStore::open(&path).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn corrupt_snapshot_is_a_codec_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        fs::write(&path, b"not json").unwrap();

        assert!(matches!(
            FileStudentStore::open(&path),
            Err(StoreError::Codec(_))
        ));
    }
}
