use std::sync::Arc;

use mail_triage::config::{PipelineConfig, ServerConfig};
use mail_triage::http;
use mail_triage::pipeline::Pipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let pipeline_config = PipelineConfig::from_env();
    let server_config = ServerConfig::from_env();

    eprintln!("📬 mail-triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://{}/api/v1/process", server_config.bind);
    match &pipeline_config.external_model {
        Some(external) => eprintln!(
            "   External model: {} ({})",
            external.model_id, external.endpoint
        ),
        None => eprintln!("   External model: disabled (heuristic only)"),
    }

    let pipeline = Arc::new(Pipeline::new(pipeline_config));
    let app = http::router(pipeline);

    let listener = tokio::net::TcpListener::bind(&server_config.bind).await?;
    tracing::info!(addr = %server_config.bind, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
