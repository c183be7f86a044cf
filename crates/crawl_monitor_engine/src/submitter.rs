use std::sync::Arc;

use crawl_monitor_core::{JobHandle, JobParameters};
use monitor_logging::{monitor_info, monitor_warn};

use crate::{JobApi, SubmissionError};

/// Sends the job-creation request. One attempt, no retries.
#[derive(Clone)]
pub struct JobSubmitter {
    api: Arc<dyn JobApi>,
}

impl JobSubmitter {
    pub fn new(api: Arc<dyn JobApi>) -> Self {
        Self { api }
    }

    pub async fn submit(&self, params: &JobParameters) -> Result<JobHandle, SubmissionError> {
        monitor_info!(
            "Submitting crawl vendor={} start_urls={} page_limit={}",
            params.vendor_name(),
            params.start_urls().len(),
            params.page_limit()
        );
        match self.api.create_job(params).await {
            Ok(job) => {
                monitor_info!("Crawl accepted job_id={}", job);
                Ok(job)
            }
            Err(err) => {
                monitor_warn!("Crawl submission failed: {}", err);
                Err(SubmissionError(err))
            }
        }
    }
}
