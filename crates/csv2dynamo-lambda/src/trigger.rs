// Batch-job triggering
//
// Fire-and-forget: the dispatcher hands over the file name and does not
// track the run after receiving its id. No idempotency key is attached,
// so a redundant invocation for the same object starts a duplicate run.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_glue::error::DisplayErrorContext;
use std::collections::HashMap;

#[async_trait]
pub trait JobTrigger: Send + Sync {
    /// Start one job run and return its run identifier.
    async fn start_job_run(
        &self,
        job_name: &str,
        arguments: HashMap<String, String>,
    ) -> Result<String>;
}

pub struct GlueJobTrigger {
    client: aws_sdk_glue::Client,
}

impl GlueJobTrigger {
    pub fn new(client: aws_sdk_glue::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobTrigger for GlueJobTrigger {
    async fn start_job_run(
        &self,
        job_name: &str,
        arguments: HashMap<String, String>,
    ) -> Result<String> {
        let output = self
            .client
            .start_job_run()
            .job_name(job_name)
            .set_arguments(Some(arguments))
            .send()
            .await
            .map_err(|e| anyhow!("{}", DisplayErrorContext(e)))?;

        output
            .job_run_id()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("job run started but no run id was returned"))
    }
}
