// S3 event handling
//
// Extract the container and object key from the first notification record,
// derive the bare file name, and start the batch job with it. Exactly one
// trigger call on the happy path; zero on any failure.

use crate::response::DispatchResponse;
use crate::DispatcherState;
use aws_lambda_events::event::s3::S3Event;
use std::collections::HashMap;

/// Job-argument key the loader reads the file name from.
const FILE_NAME_ARG: &str = "--data_file_name";

/// Bare file name: everything after the last `/` of the object key.
pub(crate) fn derive_file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

pub(crate) async fn handle_event(event: &S3Event, state: &DispatcherState) -> DispatchResponse {
    let Some(record) = event.records.first() else {
        tracing::error!("event contained no records");
        return DispatchResponse::failure("Event contained no records");
    };

    let bucket = record.s3.bucket.name.as_deref().unwrap_or_default();
    let key = record.s3.object.key.as_deref().unwrap_or_default();
    if bucket.is_empty() || key.is_empty() {
        tracing::error!("event record is missing bucket name or object key");
        return DispatchResponse::failure("Event record is missing bucket name or object key");
    }

    let file_name = derive_file_name(key);
    tracing::info!(bucket, key, file_name, "new file uploaded");

    let Some(config) = &state.config else {
        return DispatchResponse::failure("Error retrieving batch job name");
    };

    let arguments = HashMap::from([(FILE_NAME_ARG.to_string(), file_name.to_string())]);
    match state
        .trigger
        .start_job_run(&config.job_name, arguments)
        .await
    {
        Ok(run_id) => {
            tracing::info!(job_name = %config.job_name, run_id = %run_id, "started batch job");
            DispatchResponse::ok(format!("Batch job triggered successfully: {}", run_id))
        }
        Err(err) => {
            tracing::error!(job_name = %config.job_name, error = %err, "error starting batch job");
            DispatchResponse::failure("Error starting batch job")
        }
    }
}
