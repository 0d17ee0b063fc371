//! In-process job store with a per-job progress channel.
//!
//! Each generation request on the job-based path gets a pending record here;
//! the background task writes the terminal state back through [`JobStore::update`],
//! which also publishes the new record to every subscriber. The store is an
//! explicitly-owned object injected through `AppState`; no module-level
//! globals.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

/// Default retention window for finished (and stale pending) jobs.
pub const DEFAULT_JOB_TTL: Duration = Duration::from_secs(60 * 60);

// =============================================================================
// Job
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// One tracked generation job. `created_at` is serialized as `timestamp`,
/// the field name progress subscribers expect.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Partial update merged into an existing job record.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl JobUpdate {
    pub fn completed(result: String) -> Self {
        Self {
            status: Some(JobStatus::Completed),
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            result: None,
            error: Some(error),
        }
    }
}

/// Outcome of [`JobStore::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Update merged and published to subscribers.
    Applied,
    /// Job id unknown (never existed, or already evicted). Not an error.
    UnknownJob,
    /// Job already reached a terminal state; the update was rejected and the
    /// first terminal status persists.
    AlreadyTerminal,
}

// =============================================================================
// JobStore
// =============================================================================

struct JobEntry {
    job: Job,
    tx: watch::Sender<Job>,
}

/// Concurrency-safe job map with a `watch` channel per job.
///
/// The single mutex serializes merges per job (no two updates interleave)
/// while keeping operations short: all I/O happens outside the store, so
/// independent jobs still make progress in parallel.
pub struct JobStore {
    inner: Mutex<HashMap<String, JobEntry>>,
    ttl: Duration,
}

impl JobStore {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_JOB_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Insert a fresh pending job and return its id.
    ///
    /// Ids come from `uuid` v4, so collisions across repeated calls are
    /// negligible. Also sweeps entries older than the TTL, so access-triggered
    /// eviction bounds memory without a dedicated timer.
    pub fn create_job(&self) -> String {
        let job = Job {
            id: uuid::Uuid::new_v4().to_string(),
            status: JobStatus::Pending,
            result: None,
            error: None,
            created_at: Utc::now(),
        };
        let id = job.id.clone();
        let (tx, _rx) = watch::channel(job.clone());

        let mut map = self.inner.lock().expect("job store mutex poisoned");
        Self::sweep_expired(&mut map, self.ttl);
        map.insert(id.clone(), JobEntry { job, tx });

        tracing::debug!(job_id = %id, "job created");
        id
    }

    /// Merge an update into a job and publish the full record to its
    /// subscribers. No-op on an unknown id; rejected once a job is terminal.
    pub fn update(&self, id: &str, update: JobUpdate) -> UpdateOutcome {
        let mut map = self.inner.lock().expect("job store mutex poisoned");
        let Some(entry) = map.get_mut(id) else {
            tracing::debug!(job_id = %id, "update for unknown job ignored");
            return UpdateOutcome::UnknownJob;
        };

        if entry.job.status.is_terminal() {
            tracing::debug!(job_id = %id, "update for terminal job rejected");
            return UpdateOutcome::AlreadyTerminal;
        }

        if let Some(status) = update.status {
            entry.job.status = status;
        }
        if let Some(result) = update.result {
            entry.job.result = Some(result);
        }
        if let Some(error) = update.error {
            entry.job.error = Some(error);
        }

        // Subscribers may all be gone (client disconnected); the record
        // stays queryable until eviction.
        let _ = entry.tx.send(entry.job.clone());
        UpdateOutcome::Applied
    }

    /// Current snapshot of a job, if it still exists.
    pub fn get(&self, id: &str) -> Option<Job> {
        let map = self.inner.lock().expect("job store mutex poisoned");
        map.get(id).map(|e| e.job.clone())
    }

    /// Subscribe to a job's state transitions. The receiver's initial value
    /// is the current state, so subscribers always see `pending` (or the
    /// terminal state) immediately, then every later transition in order.
    pub fn subscribe(&self, id: &str) -> Option<watch::Receiver<Job>> {
        let map = self.inner.lock().expect("job store mutex poisoned");
        map.get(id).map(|e| e.tx.subscribe())
    }

    fn sweep_expired(map: &mut HashMap<String, JobEntry>, ttl: Duration) {
        let now = Utc::now();
        map.retain(|id, entry| {
            let age = (now - entry.job.created_at)
                .to_std()
                .unwrap_or(Duration::ZERO);
            let keep = age < ttl;
            if !keep {
                tracing::debug!(job_id = %id, "evicting expired job");
            }
            keep
        });
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Progress stream
// =============================================================================

/// Turn a job subscription into a stream of job snapshots: the current state
/// first, then every transition, ending after a terminal state (or when the
/// job is evicted and its sender dropped). Dropping the stream releases the
/// subscription, so a disconnecting client leaks nothing and never cancels
/// the underlying generation task.
pub fn job_updates(rx: watch::Receiver<Job>) -> impl futures_util::Stream<Item = Job> {
    futures_util::stream::unfold(Some((rx, true)), |state| async move {
        let (mut rx, first) = state?;
        if !first {
            rx.changed().await.ok()?;
        }
        let job = rx.borrow_and_update().clone();
        let next = if job.status.is_terminal() {
            None
        } else {
            Some((rx, false))
        };
        Some((job, next))
    })
}
