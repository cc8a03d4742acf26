use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::ContentId;

/// Where an uploaded content item came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Pdf,
    Url,
    Youtube,
}

impl ContentKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Url => "Web page",
            Self::Youtube => "YouTube",
        }
    }
}

/// Backend processing state of an upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    /// Completed and failed jobs never change again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// An uploaded source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub id: ContentId,
    pub title: String,
    pub kind: ContentKind,
    pub status: ProcessingStatus,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Content {
    /// Materials can only be generated once extraction has finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == ProcessingStatus::Completed
    }
}

/// Progress report for a background extraction job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub job_id: String,
    pub status: ProcessingStatus,
    pub progress: Option<u8>,
    pub error: Option<String>,
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!ProcessingStatus::Pending.is_terminal());
        assert!(!ProcessingStatus::Processing.is_terminal());
        assert!(ProcessingStatus::Completed.is_terminal());
        assert!(ProcessingStatus::Failed.is_terminal());
    }
}
