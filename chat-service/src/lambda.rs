//! AWS Lambda runtime adapter.

use crate::handlers::ChatHandler;
use crate::models::OutboundResult;
use crate::utils::extract_region_from_arn;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;

/// Serve invocations until the runtime shuts the process down.
pub async fn run(handler: Arc<ChatHandler>) -> Result<(), Error> {
    tracing::info!("Starting Lambda runtime loop");

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { invoke(&handler, event).await }
    }))
    .await
}

/// Handle one invocation. Never fails: errors are folded into the result.
pub async fn invoke(
    handler: &ChatHandler,
    event: LambdaEvent<Value>,
) -> Result<OutboundResult, Error> {
    let (payload, context) = event.into_parts();

    let span = tracing::info_span!(
        "invocation",
        request_id = %context.request_id,
        region = %extract_region_from_arn(&context.invoked_function_arn),
    );

    Ok(handler.handle_event(payload).instrument(span).await)
}
