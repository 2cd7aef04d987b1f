//! Resume analysis: turns an uploaded resume into a short keyword set via
//! the Gemini `generateContent` API.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod extract;
pub mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

/// Message shown for every transport or API failure of the analysis call.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze resume. Please try again.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(
        "Gemini API key is not configured. Please add GEMINI_API_KEY to your environment variables."
    )]
    Configuration,

    #[error("Could not read keywords from the analysis response: {0}")]
    Parse(String),

    #[error("{}", ANALYSIS_FAILED_MESSAGE)]
    Failed,
}

/// Ordered, non-empty list of job-matching keywords.
///
/// The model is asked for a single keyword but nothing enforces that, so
/// callers must not assume a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn new(keywords: Vec<String>) -> Option<Self> {
        if keywords.is_empty() {
            None
        } else {
            Some(Self(keywords))
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Extracts job-matching keywords from a base64-encoded PDF resume.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(&self, base64_pdf: &str) -> Result<KeywordSet, AnalysisError>;
}
