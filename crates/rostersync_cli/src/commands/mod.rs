//! CLI command implementations.

pub mod fetch;
pub mod list;
pub mod post;
pub mod serve;

use rostersync_engine::{BlockingHttpClient, ReactiveHttpClient, SyncConfig, SyncService};
use rostersync_protocol::ResultEnvelope;
use rostersync_store::{FileStudentStore, MemoryStudentStore, Student, StoreResult, StudentStore};
use std::path::Path;

/// Service type driven by the commands.
pub type CliService = SyncService<CliStore, ReactiveHttpClient, BlockingHttpClient>;

/// Store selected by `--store`.
#[derive(Debug)]
pub enum CliStore {
    /// Process-local store, gone on exit.
    Memory(MemoryStudentStore),
    /// Store persisted to a JSON snapshot.
    File(FileStudentStore),
}

impl CliStore {
    /// Opens the file store at `path`, or an empty in-memory store.
    pub fn open(path: Option<&Path>) -> StoreResult<Self> {
        match path {
            Some(path) => Ok(CliStore::File(FileStudentStore::open(path)?)),
            None => Ok(CliStore::Memory(MemoryStudentStore::new())),
        }
    }
}

impl StudentStore for CliStore {
    fn find_all(&self) -> StoreResult<Vec<Student>> {
        match self {
            CliStore::Memory(store) => store.find_all(),
            CliStore::File(store) => store.find_all(),
        }
    }

    fn save(&self, student: Student) -> StoreResult<Student> {
        match self {
            CliStore::Memory(store) => store.save(student),
            CliStore::File(store) => store.save(student),
        }
    }
}

/// Builds the service over real HTTP clients.
pub fn build_service(
    store: CliStore,
    config: SyncConfig,
) -> Result<CliService, Box<dyn std::error::Error>> {
    let user_agent = concat!("rostersync/", env!("CARGO_PKG_VERSION"));
    Ok(SyncService::new(
        config,
        store,
        ReactiveHttpClient::new()?,
        BlockingHttpClient::new().with_user_agent(user_agent),
    ))
}

/// Prints an envelope and reports whether it succeeded.
pub fn print_envelope(
    envelope: &ResultEnvelope,
    format: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(envelope)?);
        }
        _ => {
            println!("{envelope}");
        }
    }
    Ok(envelope.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_without_path_is_memory() {
        let store = CliStore::open(None).unwrap();
        assert!(matches!(store, CliStore::Memory(_)));
        assert!(store.find_all().unwrap().is_empty());
    }

    #[test]
    fn file_store_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.json");

        let store = CliStore::open(Some(&path)).unwrap();
        store
            .save(Student::new("John", "john@example.com", 20))
            .unwrap();
        drop(store);

        let reopened = CliStore::open(Some(&path)).unwrap();
        assert!(matches!(reopened, CliStore::File(_)));
        assert_eq!(reopened.find_all().unwrap()[0].name, "John");
    }
}
