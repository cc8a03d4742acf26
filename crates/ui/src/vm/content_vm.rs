use services::ContentQuery;
use study_core::model::{Content, ContentKind, JobStatus, ProcessingStatus};

use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentCardVm {
    pub id: String,
    pub title: String,
    pub kind_label: &'static str,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub source_url: Option<String>,
    pub created_at_str: String,
    pub ready: bool,
}

impl From<&Content> for ContentCardVm {
    fn from(content: &Content) -> Self {
        Self {
            id: content.id.as_str().to_string(),
            title: content.title.clone(),
            kind_label: content.kind.label(),
            status_label: status_label(content.status),
            status_class: status_class(content.status),
            source_url: content.source_url.clone(),
            created_at_str: format_date(content.created_at),
            ready: content.is_ready(),
        }
    }
}

#[must_use]
pub fn map_content_cards(contents: &[Content]) -> Vec<ContentCardVm> {
    contents.iter().map(ContentCardVm::from).collect()
}

#[must_use]
pub fn status_label(status: ProcessingStatus) -> &'static str {
    match status {
        ProcessingStatus::Pending => "Pending",
        ProcessingStatus::Processing => "Processing",
        ProcessingStatus::Completed => "Ready",
        ProcessingStatus::Failed => "Failed",
    }
}

fn status_class(status: ProcessingStatus) -> &'static str {
    match status {
        ProcessingStatus::Pending | ProcessingStatus::Processing => "badge badge--busy",
        ProcessingStatus::Completed => "badge badge--ok",
        ProcessingStatus::Failed => "badge badge--error",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentFilterVm {
    pub search: String,
    pub kind: String,
    pub status: String,
}

impl ContentFilterVm {
    #[must_use]
    pub fn to_query(&self) -> ContentQuery {
        ContentQuery {
            search: self.search.trim().to_string(),
            kind: parse_kind(&self.kind),
            status: parse_status(&self.status),
        }
    }
}

fn parse_kind(raw: &str) -> Option<ContentKind> {
    match raw.trim() {
        "pdf" => Some(ContentKind::Pdf),
        "url" => Some(ContentKind::Url),
        "youtube" => Some(ContentKind::Youtube),
        _ => None,
    }
}

fn parse_status(raw: &str) -> Option<ProcessingStatus> {
    match raw.trim() {
        "pending" => Some(ProcessingStatus::Pending),
        "processing" => Some(ProcessingStatus::Processing),
        "completed" => Some(ProcessingStatus::Completed),
        "failed" => Some(ProcessingStatus::Failed),
        _ => None,
    }
}

/// Progress line shown while an upload's job is being polled.
#[must_use]
pub fn job_progress_label(status: &JobStatus) -> String {
    match (status.status, status.progress) {
        (ProcessingStatus::Completed, _) => "Processing complete".to_string(),
        (ProcessingStatus::Failed, _) => status
            .error
            .clone()
            .unwrap_or_else(|| "Processing failed".to_string()),
        (_, Some(progress)) => format!("{}… {progress}%", status_label(status.status)),
        (_, None) => format!("{}…", status_label(status.status)),
    }
}
