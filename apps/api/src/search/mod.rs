//! Job search: sends the extracted keywords to the job-search actor and
//! hands back whatever job records it returns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::analysis::KeywordSet;

pub mod apify;

pub use apify::ApifyClient;

/// Job boards every search is restricted to.
pub const SEARCH_SITES: [&str; 12] = [
    "boards.greenhouse.io",
    "jobs.lever.co",
    "myworkdayjobs.com",
    "careers.smartrecruiters.com",
    "jobs.jobvite.com",
    "careers.icims.com",
    "angel.co",
    "stackoverflow.com/jobs",
    "weworkremotely.com",
    "remotive.io",
    "bamboohr.com",
    "https://www.linkedin.com/jobs",
];

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Job search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job search API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Job search returned an unreadable response: {0}")]
    Decode(String),
}

/// One job posting exactly as the search service returned it.
///
/// Nothing is validated or rewritten: the record is usually an object with
/// fields such as `company_name` or `url`, but any JSON value is accepted and
/// written back out unchanged when the results are rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRecord(Value);

impl From<Value> for JobRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl JobRecord {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Finds jobs matching a keyword set.
#[async_trait]
pub trait JobSearch: Send + Sync {
    async fn search(&self, keywords: &KeywordSet) -> Result<Vec<JobRecord>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_record_round_trips_unchanged() {
        let raw = json!({
            "company_name": "Acme",
            "remote": false,
            "salary": 120000,
            "tags": ["rust"]
        });
        let job: JobRecord = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(job.as_value()["company_name"], "Acme");
        assert_eq!(serde_json::to_value(&job).unwrap(), raw);
    }

    #[test]
    fn test_job_record_adds_no_missing_fields() {
        let job: JobRecord = serde_json::from_value(json!({ "company_name": "Acme" })).unwrap();
        let rendered = serde_json::to_value(&job).unwrap();

        assert_eq!(rendered.as_object().map(|o| o.len()), Some(1));
        assert!(rendered.get("country").is_none());
    }

    #[test]
    fn test_non_object_records_are_kept() {
        let jobs: Vec<JobRecord> =
            serde_json::from_value(json!([{ "company_name": "A" }, null, "B"])).unwrap();

        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[1].as_value(), &Value::Null);
        assert_eq!(serde_json::to_value(&jobs[2]).unwrap(), json!("B"));
    }

    #[test]
    fn test_search_sites_are_fixed() {
        assert_eq!(SEARCH_SITES.len(), 12);
        assert_eq!(SEARCH_SITES[0], "boards.greenhouse.io");
        assert_eq!(SEARCH_SITES[11], "https://www.linkedin.com/jobs");
    }
}
