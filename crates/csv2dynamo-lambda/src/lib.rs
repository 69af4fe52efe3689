// AWS Lambda runtime adapter - the dispatcher
//
// One object-created notification in, at most one batch-job start out.
// Failures never bubble to the runtime as Err: every outcome becomes a
// {statusCode, body} acknowledgment, so the platform treats a failed
// dispatch as terminal rather than retrying the event.

use aws_lambda_events::event::s3::S3Event;
use csv2dynamo_config::DispatcherConfig;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;

mod handlers;
mod response;
mod trigger;

use handlers::handle_event;
pub use response::DispatchResponse;
pub use trigger::{GlueJobTrigger, JobTrigger};

pub(crate) struct DispatcherState {
    /// None when the job name could not be resolved at startup; every
    /// invocation then acknowledges with a 500 instead of crashing the
    /// runtime.
    pub config: Option<DispatcherConfig>,
    pub trigger: Arc<dyn JobTrigger>,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_ansi(false)),
    );
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let config = match DispatcherConfig::from_env() {
        Ok(config) => {
            tracing::info!(job_name = %config.job_name, "dispatcher configured");
            Some(config)
        }
        Err(err) => {
            tracing::error!(error = %err, "dispatcher configuration missing");
            None
        }
    };

    let aws_config = aws_config::load_from_env().await;
    let trigger: Arc<dyn JobTrigger> =
        Arc::new(GlueJobTrigger::new(aws_sdk_glue::Client::new(&aws_config)));

    let state = Arc::new(DispatcherState { config, trigger });

    lambda_runtime::run(service_fn(move |event: LambdaEvent<S3Event>| {
        let state = state.clone();
        async move {
            let (event, _context) = event.into_parts();
            Ok::<DispatchResponse, Error>(handle_event(&event, &state).await)
        }
    }))
    .await
}
