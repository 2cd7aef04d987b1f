use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{JobRecord, JobSearch, SearchError, SEARCH_SITES};
use crate::analysis::KeywordSet;

/// Longest slice of a response body quoted back in an error.
const BODY_PREVIEW_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    mandatory_keywords: &'a [String],
    search_sites: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct ApifyErrorEnvelope {
    error: ApifyErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApifyErrorBody {
    message: String,
}

/// Client for the job-search actor's synchronous dataset endpoint.
///
/// The token is not checked: when it is missing an empty token is sent and
/// the failure comes back from the API.
#[derive(Clone)]
pub struct ApifyClient {
    client: Client,
    base_url: String,
    actor: String,
    token: Option<String>,
}

impl ApifyClient {
    pub fn new(
        token: Option<String>,
        base_url: impl Into<String>,
        actor: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("jobscan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            actor: actor.into(),
            token,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v2/acts/{}/run-sync-get-dataset-items",
            self.base_url, self.actor
        )
    }
}

#[async_trait]
impl JobSearch for ApifyClient {
    async fn search(&self, keywords: &KeywordSet) -> Result<Vec<JobRecord>, SearchError> {
        let body = SearchRequest {
            mandatory_keywords: keywords.as_slice(),
            search_sites: &SEARCH_SITES,
        };

        info!("Searching jobs for keywords {:?}", keywords.as_slice());

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("token", self.token.as_deref().unwrap_or_default())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApifyErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| preview(&text));
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let jobs: Vec<JobRecord> = serde_json::from_str(&text)
            .map_err(|e| SearchError::Decode(format!("{e}; body: {}", preview(&text))))?;

        debug!("Job search returned {} records", jobs.len());
        let non_objects = jobs.iter().filter(|j| !j.as_value().is_object()).count();
        if non_objects > 0 {
            warn!("{non_objects} job records are not JSON objects, passing them through as-is");
        }
        Ok(jobs)
    }
}

fn preview(body: &str) -> String {
    let mut out: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    if body.chars().count() > BODY_PREVIEW_CHARS {
        out.push('…');
    }
    out
}
