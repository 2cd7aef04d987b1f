//! Drives one run through analysis and search, applying each outcome to the
//! session as it arrives.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::{Run, Session, TransitionError};
use crate::analysis::{AnalysisError, ResumeAnalyzer};
use crate::search::{JobSearch, SearchError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Superseded(#[from] TransitionError),
}

/// Analysis followed by search. The session lock is only taken to apply a
/// transition, never across a remote call.
#[derive(Clone)]
pub struct Pipeline {
    analyzer: Arc<dyn ResumeAnalyzer>,
    job_search: Arc<dyn JobSearch>,
}

impl Pipeline {
    pub fn new(analyzer: Arc<dyn ResumeAnalyzer>, job_search: Arc<dyn JobSearch>) -> Self {
        Self {
            analyzer,
            job_search,
        }
    }

    /// Runs `run` to completion. Every failure ends in the Failed phase,
    /// unless the run was superseded meanwhile, in which case its outcome is
    /// dropped.
    pub async fn run(&self, session: &Mutex<Session>, run: Run) {
        match self.execute(session, &run).await {
            Ok(()) => info!("Run {} finished", run.id),
            Err(PipelineError::Superseded(e)) => {
                warn!("Dropping outcome of run {}: {e}", run.id);
            }
            Err(e) => {
                error!("Error processing resume '{}': {e}", run.document.name());
                if let Err(stale) = session.lock().await.fail(run.id, e.to_string()) {
                    warn!("Dropping failure of run {}: {stale}", run.id);
                }
            }
        }
    }

    async fn execute(&self, session: &Mutex<Session>, run: &Run) -> Result<(), PipelineError> {
        let payload = run.document.to_base64();
        let keywords = self.analyzer.analyze(&payload).await?;

        info!("Extracted keywords {:?}", keywords.as_slice());
        session
            .lock()
            .await
            .keywords_extracted(run.id, keywords.clone())?;

        let jobs = self.job_search.search(&keywords).await?;

        info!("Found {} jobs", jobs.len());
        session.lock().await.jobs_found(run.id, jobs)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory analyzer and search used by the session tests.

    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::analysis::extract::parse_keywords;
    use crate::analysis::{AnalysisError, KeywordSet, ResumeAnalyzer};
    use crate::search::{JobRecord, JobSearch, SearchError};

    pub enum FakeAnalysis {
        /// Raw model text, run through the real keyword parser.
        Text(String),
        Configuration,
        Failed,
    }

    /// Replays scripted answers in order; the last one repeats.
    pub struct FakeAnalyzer {
        answers: StdMutex<VecDeque<FakeAnalysis>>,
        delay: Option<Duration>,
        pub payloads: StdMutex<Vec<String>>,
    }

    impl FakeAnalyzer {
        pub fn new(answers: Vec<FakeAnalysis>) -> Self {
            Self {
                answers: StdMutex::new(answers.into()),
                delay: None,
                payloads: StdMutex::default(),
            }
        }

        pub fn text(text: &str) -> Self {
            Self::new(vec![FakeAnalysis::Text(text.to_string())])
        }

        /// Makes every answer take `delay` to arrive.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> usize {
            self.payloads.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ResumeAnalyzer for FakeAnalyzer {
        async fn analyze(&self, base64_pdf: &str) -> Result<KeywordSet, AnalysisError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.payloads.lock().unwrap().push(base64_pdf.to_string());
            let mut answers = self.answers.lock().unwrap();
            let answer = if answers.len() > 1 {
                answers.pop_front()
            } else {
                None
            };
            match answer.as_ref().or(answers.front()) {
                Some(FakeAnalysis::Text(text)) => parse_keywords(text),
                Some(FakeAnalysis::Configuration) => Err(AnalysisError::Configuration),
                Some(FakeAnalysis::Failed) | None => Err(AnalysisError::Failed),
            }
        }
    }

    pub enum FakeResult {
        Jobs(Vec<JobRecord>),
        Unavailable,
    }

    pub struct FakeSearch {
        result: FakeResult,
        pub requests: StdMutex<Vec<Vec<String>>>,
    }

    impl FakeSearch {
        pub fn new(result: FakeResult) -> Self {
            Self {
                result,
                requests: StdMutex::default(),
            }
        }

        pub fn jobs(jobs: Vec<JobRecord>) -> Self {
            Self::new(FakeResult::Jobs(jobs))
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl JobSearch for FakeSearch {
        async fn search(&self, keywords: &KeywordSet) -> Result<Vec<JobRecord>, SearchError> {
            self.requests
                .lock()
                .unwrap()
                .push(keywords.as_slice().to_vec());
            match &self.result {
                FakeResult::Jobs(jobs) => Ok(jobs.clone()),
                FakeResult::Unavailable => Err(SearchError::Api {
                    status: 503,
                    message: "actor unavailable".to_string(),
                }),
            }
        }
    }

    pub fn job(company: &str) -> JobRecord {
        JobRecord::from(serde_json::json!({ "company_name": company }))
    }
}
