use std::sync::Arc;
use std::time::Duration;

use study_core::model::{JobStatus, ProcessingStatus};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::api::{ContentApi, UploadReceipt, UploadSource};
use crate::error::UploadError;

pub const JOB_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Uploads source documents and follows their extraction jobs.
#[derive(Clone)]
pub struct UploadService {
    contents: Arc<dyn ContentApi>,
    poll_interval: Duration,
}

impl UploadService {
    #[must_use]
    pub fn new(contents: Arc<dyn ContentApi>) -> Self {
        Self {
            contents,
            poll_interval: JOB_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// # Errors
    ///
    /// Returns `UploadError::MissingField` for a blank title or URL, or
    /// `UploadError::Api` if the upload fails.
    pub async fn upload(&self, source: &UploadSource) -> Result<UploadReceipt, UploadError> {
        if source.title().trim().is_empty() {
            return Err(UploadError::MissingField("title"));
        }
        match source {
            UploadSource::Url { url, .. } | UploadSource::Youtube { url, .. }
                if url.trim().is_empty() =>
            {
                return Err(UploadError::MissingField("url"));
            }
            UploadSource::Pdf { path, .. } if path.as_os_str().is_empty() => {
                return Err(UploadError::MissingField("file"));
            }
            _ => {}
        }

        let receipt = self.contents.upload(source).await?;
        info!(
            title = source.title(),
            job = receipt.job_id.as_deref().unwrap_or("-"),
            "content uploaded"
        );
        Ok(receipt)
    }

    /// Poll `job_id` until it completes or fails, reporting every status seen.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::JobFailed` if processing failed, or
    /// `UploadError::Api` if a status request fails.
    pub async fn wait_for_job<F>(
        &self,
        job_id: &str,
        mut on_progress: F,
    ) -> Result<JobStatus, UploadError>
    where
        F: FnMut(&JobStatus),
    {
        let mut ticks = interval(self.poll_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticks.tick().await;
            let status = self.contents.job_status(job_id).await?;
            debug!(job = job_id, status = ?status.status, progress = ?status.progress, "job status");
            on_progress(&status);

            match status.status {
                ProcessingStatus::Completed => return Ok(status),
                ProcessingStatus::Failed => {
                    let reason = status
                        .error
                        .clone()
                        .unwrap_or_else(|| "Processing failed".to_string());
                    warn!(job = job_id, %reason, "job failed");
                    return Err(UploadError::JobFailed(reason));
                }
                ProcessingStatus::Pending | ProcessingStatus::Processing => {}
            }
        }
    }
}
