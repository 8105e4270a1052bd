//! Synchronization service.
//!
//! The service owns the two directions of a sync:
//!
//! - **Inbound**: fetch the remote student listing and save every record
//! - **Outbound**: load every stored student, partition them into batches and
//!   submit each batch to a caller-supplied URL
//!
//! Each direction runs over either transport strategy. Every operation
//! returns a [`ResultEnvelope`]; errors are folded into a failed envelope
//! and never escape.

use crate::batch::partition;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::headers::{BasicAuthHeaders, HeaderProvider};
use crate::transport::{BlockingTransport, ReactiveTransport};
use futures::{stream, TryFutureExt, TryStreamExt};
use rostersync_protocol::{ResponseBody, ResultEnvelope, StudentRecord, SubjectRecord};
use rostersync_store::{Student, StudentStore, Subject};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, info, warn};

/// Request-execution strategy used by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Deferred requests; outbound batches may overlap.
    Reactive,
    /// Requests occupy the calling thread; outbound batches run in order.
    Blocking,
}

impl Strategy {
    /// Returns the name used in envelope messages.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Reactive => "reactive client",
            Strategy::Blocking => "blocking client",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reactive" | "webclient" => Ok(Strategy::Reactive),
            "blocking" | "httpclient" => Ok(Strategy::Blocking),
            other => Err(format!(
                "unknown strategy '{other}', expected 'reactive' or 'blocking'"
            )),
        }
    }
}

/// Orchestrates inbound and outbound student syncs.
///
/// Generic over the store, both transports and the header source; the
/// strategy is picked by which operation the caller invokes.
pub struct SyncService<S, R, B, H = BasicAuthHeaders> {
    config: SyncConfig,
    store: S,
    reactive: R,
    blocking: B,
    headers: H,
}

impl<S, R, B> SyncService<S, R, B>
where
    S: StudentStore,
    R: ReactiveTransport,
    B: BlockingTransport,
{
    /// Creates a service authenticating with the default Basic-Auth
    /// credentials.
    pub fn new(config: SyncConfig, store: S, reactive: R, blocking: B) -> Self {
        Self {
            config,
            store,
            reactive,
            blocking,
            headers: BasicAuthHeaders::default(),
        }
    }
}

impl<S, R, B, H> SyncService<S, R, B, H>
where
    S: StudentStore,
    R: ReactiveTransport,
    B: BlockingTransport,
    H: HeaderProvider,
{
    /// Replaces the header source.
    pub fn with_header_provider<P: HeaderProvider>(self, headers: P) -> SyncService<S, R, B, P> {
        SyncService {
            config: self.config,
            store: self.store,
            reactive: self.reactive,
            blocking: self.blocking,
            headers,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches the remote listing with the reactive transport and saves it.
    pub async fn fetch_and_save_reactive(&self) -> ResultEnvelope {
        let result = self
            .reactive
            .fetch::<Option<Vec<StudentRecord>>>(
                &self.config.fetch_url,
                &self.headers.headers(),
                self.config.timeout,
            )
            .await
            .and_then(|records| self.save_all(records.unwrap_or_default()));

        fetch_outcome(Strategy::Reactive, result)
    }

    /// Fetches the remote listing with the blocking transport and saves it.
    ///
    /// Holds the calling thread for the whole operation.
    pub fn fetch_and_save_blocking(&self) -> ResultEnvelope {
        let result = self
            .blocking
            .fetch::<Option<Vec<StudentRecord>>>(
                &self.config.fetch_url,
                &self.headers.headers(),
                self.config.timeout,
            )
            .and_then(|records| self.save_all(records.unwrap_or_default()));

        fetch_outcome(Strategy::Blocking, result)
    }

    /// Submits every stored student to `post_url` with the reactive
    /// transport.
    ///
    /// Up to `max_in_flight` batches are pending at once. The first failed
    /// batch stops further batches from being scheduled; batches already
    /// accepted by the remote stay accepted.
    pub async fn post_reactive(&self, post_url: &str) -> ResultEnvelope {
        let strategy = Strategy::Reactive;
        let students = match self.load_for_post(strategy, post_url) {
            Ok(students) => students,
            Err(envelope) => return envelope,
        };

        let result = self.submit_concurrently(post_url, &students).await;
        post_outcome(strategy, result)
    }

    /// Submits every stored student to `post_url` with the blocking
    /// transport, one batch after another.
    pub fn post_blocking(&self, post_url: &str) -> ResultEnvelope {
        let strategy = Strategy::Blocking;
        let students = match self.load_for_post(strategy, post_url) {
            Ok(students) => students,
            Err(envelope) => return envelope,
        };

        let result = self.submit_sequentially(post_url, &students);
        post_outcome(strategy, result)
    }

    fn save_all(&self, records: Vec<StudentRecord>) -> SyncResult<usize> {
        let total = records.len();
        for record in records {
            let saved = self.store.save(student_from_record(record))?;
            debug!(id = ?saved.id, name = %saved.name, "Saved student");
        }
        Ok(total)
    }

    fn load_for_post(
        &self,
        strategy: Strategy,
        post_url: &str,
    ) -> Result<Vec<Student>, ResultEnvelope> {
        if post_url.trim().is_empty() {
            warn!(%strategy, "Post URL is null or empty");
            return Err(ResultEnvelope::failure("Post URL is null or empty"));
        }

        if self.config.batch_size == 0 {
            let e = SyncError::invalid_input("batch size must be at least 1");
            warn!(%strategy, error = %e, "Rejected post configuration");
            return Err(ResultEnvelope::failure(format!(
                "Error posting data using {strategy}: {e}"
            )));
        }

        let students = self.store.find_all().map_err(|e| {
            error!(%strategy, error = %e, "Failed to load students");
            ResultEnvelope::failure(format!("Error posting data using {strategy}: {e}"))
        })?;

        if students.is_empty() {
            warn!(%strategy, "No students found in the database");
            return Err(ResultEnvelope::failure("No students found in the database"));
        }

        Ok(students)
    }

    async fn submit_concurrently(&self, url: &str, students: &[Student]) -> SyncResult<usize> {
        let batches = partition(students, self.config.batch_size)?;
        let count = batches.len();

        stream::iter(batches.into_iter().enumerate().map(Ok::<_, SyncError>))
            .try_for_each_concurrent(self.config.max_in_flight, |(index, batch)| {
                debug!(batch = index, size = batch.len(), url, "Scheduling batch");
                self.reactive
                    .submit::<_, ResponseBody>(
                        url,
                        &self.headers.headers(),
                        batch,
                        self.config.timeout,
                    )
                    .map_ok(move |response| log_acknowledgement(index, &response))
            })
            .await?;

        Ok(count)
    }

    fn submit_sequentially(&self, url: &str, students: &[Student]) -> SyncResult<usize> {
        let batches = partition(students, self.config.batch_size)?;
        let count = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            debug!(batch = index, size = batch.len(), url, "Submitting batch");
            let response: ResponseBody = self.blocking.submit(
                url,
                &self.headers.headers(),
                batch,
                self.config.timeout,
            )?;
            log_acknowledgement(index, &response);
        }

        Ok(count)
    }
}

impl<S, R, B, H> fmt::Debug for SyncService<S, R, B, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builds an unsaved student from a remote record.
///
/// Absent name or email become empty strings, which the store rejects on
/// save.
pub fn student_from_record(record: StudentRecord) -> Student {
    let subjects = record.subjects.into_iter().map(subject_from_record).collect();

    let mut student = Student::default().with_subjects(subjects);
    student.name = record.name.unwrap_or_default();
    student.email = record.email.unwrap_or_default();
    student.age = record.age;
    student.gender = record.gender;
    student.phone_number = record.phone_number;
    student.address = record.address;
    student
}

fn subject_from_record(record: SubjectRecord) -> Subject {
    Subject {
        id: None,
        name: record.name,
        credits: record.credits,
        description: record.description,
    }
}

fn log_acknowledgement(index: usize, response: &ResponseBody) {
    match ResultEnvelope::from_response_body(response) {
        Ok(envelope) => debug!(
            batch = index,
            status = %envelope.status(),
            message = envelope.message(),
            "Batch acknowledged"
        ),
        Err(_) => debug!(batch = index, "Batch accepted"),
    }
}

fn fetch_outcome(strategy: Strategy, result: SyncResult<usize>) -> ResultEnvelope {
    match result {
        Ok(count) => {
            info!(%strategy, count, "Data fetched and saved");
            ResultEnvelope::success(format!("Data fetched and saved using {strategy}"))
        }
        Err(e) => {
            error!(%strategy, error = %e, "Fetch failed");
            ResultEnvelope::failure(format!("Error fetching data using {strategy}: {e}"))
        }
    }
}

fn post_outcome(strategy: Strategy, result: SyncResult<usize>) -> ResultEnvelope {
    match result {
        Ok(batches) => {
            info!(%strategy, batches, "Data successfully posted");
            ResultEnvelope::success(format!("Data successfully posted using {strategy}"))
        }
        Err(e) => {
            error!(%strategy, error = %e, "Post failed");
            ResultEnvelope::failure(format!("Error posting data using {strategy}: {e}"))
        }
    }
}
