use chat_service::config::ChatConfig;
use chat_service::lambda;
use chat_service::startup::{build_handler, Application};
use service_core::observability::init_tracing;
use std::sync::Arc;

const SERVICE_NAME: &str = "chat-service";

/// Set by the Lambda execution environment.
const LAMBDA_RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    let config = match ChatConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(SERVICE_NAME, "info");
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    init_tracing(SERVICE_NAME, &config.common.log_level);

    if std::env::var(LAMBDA_RUNTIME_API_ENV).is_ok() {
        let handler = build_handler(&config).map_err(|e| {
            tracing::error!("Failed to build chat handler: {}", e);
            e
        })?;
        return lambda::run(Arc::new(handler)).await;
    }

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        e
    })?;
    app.run_until_stopped().await?;

    Ok(())
}
