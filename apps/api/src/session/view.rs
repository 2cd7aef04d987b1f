//! Renders the session into the JSON document a frontend displays.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Phase, Session};
use crate::analysis::KeywordSet;
use crate::intake::UploadedDocument;
use crate::search::JobRecord;

pub const ANALYZING_TITLE: &str = "Analyzing Resume";
pub const ANALYZING_SUBTITLE: &str = "AI is extracting key skills and experiences...";
pub const SEARCHING_TITLE: &str = "Finding Jobs";
pub const SEARCHING_SUBTITLE: &str = "Searching for matching opportunities...";
pub const FAILED_TITLE: &str = "Oops! Something went wrong";
pub const RETRY_LABEL: &str = "Try Again";

#[derive(Debug, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub state: StateView,
    pub document: Option<DocumentView>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StateView {
    Idle {
        notice: Option<String>,
    },
    Analyzing {
        title: &'static str,
        subtitle: &'static str,
    },
    Searching {
        title: &'static str,
        subtitle: &'static str,
        keywords: KeywordSet,
    },
    Results {
        keywords: KeywordSet,
        summary: String,
        job_count: usize,
        jobs: Vec<JobRecord>,
    },
    Failed {
        title: &'static str,
        message: String,
        retry_label: &'static str,
    },
}

#[derive(Debug, Serialize)]
pub struct DocumentView {
    pub name: String,
    pub content_type: String,
    pub size_bytes: usize,
    /// Size in MB with two decimals, e.g. `"0.25 MB"`.
    pub size_label: String,
    /// The document cannot be removed while a run is in flight.
    pub removable: bool,
}

pub fn render(session: &Session) -> SessionView {
    let state = match session.phase() {
        Phase::Idle { notice } => StateView::Idle {
            notice: notice.clone(),
        },
        Phase::Analyzing => StateView::Analyzing {
            title: ANALYZING_TITLE,
            subtitle: ANALYZING_SUBTITLE,
        },
        Phase::Searching { keywords } => StateView::Searching {
            title: SEARCHING_TITLE,
            subtitle: SEARCHING_SUBTITLE,
            keywords: keywords.clone(),
        },
        Phase::Results { keywords, jobs } => StateView::Results {
            keywords: keywords.clone(),
            summary: results_summary(jobs.len()),
            job_count: jobs.len(),
            jobs: jobs.clone(),
        },
        Phase::Failed { message } => StateView::Failed {
            title: FAILED_TITLE,
            message: message.clone(),
            retry_label: RETRY_LABEL,
        },
    };

    SessionView {
        state,
        document: session
            .document()
            .map(|doc| document_view(doc, !session.is_busy())),
        updated_at: session.updated_at(),
    }
}

pub fn results_summary(count: usize) -> String {
    if count == 1 {
        "We found 1 job that matches your profile".to_string()
    } else {
        format!("We found {count} jobs that match your profile")
    }
}

fn document_view(doc: &UploadedDocument, removable: bool) -> DocumentView {
    DocumentView {
        name: doc.name().to_string(),
        content_type: doc.content_type().to_string(),
        size_bytes: doc.size(),
        size_label: format!("{:.2} MB", doc.size_mb()),
        removable,
    }
}
