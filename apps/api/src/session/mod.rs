//! The single user session: which resume is held and where it is in the
//! upload → analyze → search → results flow.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::analysis::KeywordSet;
use crate::intake::UploadedDocument;
use crate::search::JobRecord;

pub mod handlers;
pub mod pipeline;
pub mod view;

/// Where the session is in the flow. Each variant carries only the data that
/// exists in that state.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Waiting for an upload. `notice` holds the last validation message.
    Idle { notice: Option<String> },
    Analyzing,
    Searching {
        keywords: KeywordSet,
    },
    Results {
        keywords: KeywordSet,
        jobs: Vec<JobRecord>,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A resume is already being processed")]
    Busy,

    #[error("There is no failed analysis to retry")]
    NothingToRetry,

    #[error("Result belongs to an analysis that is no longer current")]
    Stale,
}

/// A started pipeline run: the document to process and the id that its
/// outcomes must carry to be applied.
#[derive(Debug, Clone)]
pub struct Run {
    pub id: Uuid,
    pub document: UploadedDocument,
}

#[derive(Debug)]
pub struct Session {
    document: Option<UploadedDocument>,
    phase: Phase,
    run_id: Option<Uuid>,
    updated_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            document: None,
            phase: Phase::Idle { notice: None },
            run_id: None,
            updated_at: Utc::now(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Analyzing | Phase::Searching { .. })
    }

    /// Holds `document` and moves to Analyzing. A new upload replaces the
    /// held document; it is refused while a run is in flight.
    pub fn start_upload(&mut self, document: UploadedDocument) -> Result<Run, TransitionError> {
        if self.is_busy() {
            return Err(TransitionError::Busy);
        }
        self.document = Some(document.clone());
        Ok(self.begin_run(document))
    }

    /// Records a rejected upload. Only an idle session keeps the message;
    /// in every other state the phase is left untouched.
    pub fn reject_upload(&mut self, message: impl Into<String>) {
        if let Phase::Idle { notice } = &mut self.phase {
            *notice = Some(message.into());
            self.touch();
        }
    }

    /// Replays the held document from the top of the flow.
    ///
    /// Returns `Ok(None)` when there is nothing to replay, in which case the
    /// session falls back to Idle.
    pub fn retry(&mut self) -> Result<Option<Run>, TransitionError> {
        match self.phase {
            Phase::Failed { .. } => {}
            Phase::Analyzing | Phase::Searching { .. } => return Err(TransitionError::Busy),
            Phase::Idle { .. } | Phase::Results { .. } => {
                return Err(TransitionError::NothingToRetry)
            }
        }

        match self.document.clone() {
            Some(document) => Ok(Some(self.begin_run(document))),
            None => {
                self.reset();
                Ok(None)
            }
        }
    }

    pub fn keywords_extracted(
        &mut self,
        run_id: Uuid,
        keywords: KeywordSet,
    ) -> Result<(), TransitionError> {
        self.ensure_current(run_id)?;
        if self.phase != Phase::Analyzing {
            return Err(TransitionError::Stale);
        }
        self.set_phase(Phase::Searching { keywords });
        Ok(())
    }

    pub fn jobs_found(&mut self, run_id: Uuid, jobs: Vec<JobRecord>) -> Result<(), TransitionError> {
        self.ensure_current(run_id)?;
        let keywords = match &self.phase {
            Phase::Searching { keywords } => keywords.clone(),
            _ => return Err(TransitionError::Stale),
        };
        self.set_phase(Phase::Results { keywords, jobs });
        Ok(())
    }

    pub fn fail(&mut self, run_id: Uuid, message: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_current(run_id)?;
        if !self.is_busy() {
            return Err(TransitionError::Stale);
        }
        self.set_phase(Phase::Failed {
            message: message.into(),
        });
        Ok(())
    }

    /// Drops the held document and everything derived from it. Any run still
    /// in flight becomes stale.
    pub fn remove_document(&mut self) {
        self.document = None;
        self.reset();
    }

    fn begin_run(&mut self, document: UploadedDocument) -> Run {
        let id = Uuid::new_v4();
        self.run_id = Some(id);
        self.set_phase(Phase::Analyzing);
        debug!("Started run {} for '{}'", id, document.name());
        Run { id, document }
    }

    fn reset(&mut self) {
        self.run_id = None;
        self.set_phase(Phase::Idle { notice: None });
    }

    fn ensure_current(&self, run_id: Uuid) -> Result<(), TransitionError> {
        if self.run_id == Some(run_id) {
            Ok(())
        } else {
            Err(TransitionError::Stale)
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
