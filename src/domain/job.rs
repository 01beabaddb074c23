//! Translation job state machine
//!
//! A [`TranslationJob`] starts `ACTIVE` and moves once to one of the
//! terminal states `DONE`, `FAILED` or `TIMEOUT`. Terminal states are
//! final: later observations are ignored.

use super::errors::TranslationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a translation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobState {
    Active,
    Done,
    Failed,
    /// Local-only: the poll budget ran out while the job was active
    Timeout,
}

impl JobState {
    /// True for `DONE`, `FAILED` and `TIMEOUT`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Active)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Active => "ACTIVE",
            JobState::Done => "DONE",
            JobState::Failed => "FAILED",
            JobState::Timeout => "TIMEOUT",
        };
        write!(f, "{s}")
    }
}

/// A `requestState` the server can report
///
/// `TIMEOUT` has no counterpart here; only the poller produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteState {
    Active,
    Done,
    Failed,
}

impl RemoteState {
    /// Maps a remote `requestState` value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(RemoteState::Active),
            "DONE" => Some(RemoteState::Done),
            "FAILED" => Some(RemoteState::Failed),
            _ => None,
        }
    }
}

impl From<RemoteState> for JobState {
    fn from(state: RemoteState) -> Self {
        match state {
            RemoteState::Active => JobState::Active,
            RemoteState::Done => JobState::Done,
            RemoteState::Failed => JobState::Failed,
        }
    }
}

/// Locally tracked view of a remote translation job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    /// Remote job identifier
    pub id: String,

    /// Current state
    pub state: JobState,

    /// External data ids of the results, in server order
    pub result_artifact_ids: Vec<String>,

    /// Failure reason reported with `FAILED`
    pub failure_reason: Option<String>,

    /// Number of status polls issued so far
    pub polls: u32,
}

impl TranslationJob {
    /// A freshly created job, always `ACTIVE`
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: JobState::Active,
            result_artifact_ids: Vec::new(),
            failure_reason: None,
            polls: 0,
        }
    }

    /// True once the job reached a terminal state
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Applies a state reported by the server
    ///
    /// Observations after a terminal state are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::UnexpectedState`] for an unknown
    /// `requestState`.
    pub fn observe(
        &mut self,
        request_state: &str,
        result_ids: Option<Vec<String>>,
        failure_reason: Option<String>,
    ) -> Result<(), TranslationError> {
        if self.is_terminal() {
            return Ok(());
        }

        let state = RemoteState::parse(request_state)
            .ok_or_else(|| TranslationError::UnexpectedState(request_state.to_string()))?;

        match state {
            RemoteState::Active => {}
            RemoteState::Done => {
                self.result_artifact_ids = result_ids.unwrap_or_default();
            }
            RemoteState::Failed => {
                self.failure_reason = failure_reason;
            }
        }
        self.state = state.into();
        Ok(())
    }

    /// Moves an active job to `TIMEOUT`
    pub fn time_out(&mut self) {
        if !self.is_terminal() {
            self.state = JobState::Timeout;
        }
    }

    /// Result ids of a finished job, or the reason there are none
    pub fn outcome(&self) -> Result<&[String], TranslationError> {
        match self.state {
            JobState::Done if self.result_artifact_ids.is_empty() => {
                Err(TranslationError::NoResults)
            }
            JobState::Done => Ok(&self.result_artifact_ids),
            JobState::Failed => Err(TranslationError::Failed {
                reason: self
                    .failure_reason
                    .clone()
                    .unwrap_or_else(|| "Unknown failure".to_string()),
            }),
            JobState::Timeout => Err(TranslationError::TimedOut {
                attempts: self.polls,
            }),
            JobState::Active => Err(TranslationError::UnexpectedState(self.state.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_active() {
        let job = TranslationJob::new("job-1");
        assert_eq!(job.state, JobState::Active);
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_done_with_results() {
        let mut job = TranslationJob::new("job-1");
        job.observe("DONE", Some(vec!["a".into(), "b".into()]), None)
            .unwrap();

        assert_eq!(job.state, JobState::Done);
        assert_eq!(job.outcome().unwrap(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_done_without_results_is_distinct() {
        let mut job = TranslationJob::new("job-1");
        job.observe("DONE", None, None).unwrap();

        assert_eq!(job.outcome(), Err(TranslationError::NoResults));
    }

    #[test]
    fn test_failed_carries_reason() {
        let mut job = TranslationJob::new("job-1");
        job.observe("FAILED", None, Some("bad geometry".into()))
            .unwrap();

        assert_eq!(
            job.outcome(),
            Err(TranslationError::Failed {
                reason: "bad geometry".into()
            })
        );
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut job = TranslationJob::new("job-1");
        job.observe("FAILED", None, None).unwrap();
        job.observe("ACTIVE", None, None).unwrap();
        job.observe("DONE", Some(vec!["x".into()]), None).unwrap();
        job.time_out();

        assert_eq!(job.state, JobState::Failed);
    }

    #[test]
    fn test_time_out() {
        let mut job = TranslationJob::new("job-1");
        job.polls = 30;
        job.time_out();

        assert_eq!(job.state, JobState::Timeout);
        assert_eq!(
            job.outcome(),
            Err(TranslationError::TimedOut { attempts: 30 })
        );
    }

    #[test]
    fn test_remote_timeout_is_not_a_remote_state() {
        assert_eq!(RemoteState::parse("DONE"), Some(RemoteState::Done));
        assert_eq!(RemoteState::parse("TIMEOUT"), None);

        let mut job = TranslationJob::new("job-1");
        let result = job.observe("TIMEOUT", None, None);

        assert_eq!(
            result,
            Err(TranslationError::UnexpectedState("TIMEOUT".into()))
        );
        assert_eq!(job.state, JobState::Active);
    }

    #[test]
    fn test_unknown_state_rejected() {
        let mut job = TranslationJob::new("job-1");
        let result = job.observe("QUEUED", None, None);

        assert_eq!(
            result,
            Err(TranslationError::UnexpectedState("QUEUED".into()))
        );
        assert_eq!(job.state, JobState::Active);
    }
}
