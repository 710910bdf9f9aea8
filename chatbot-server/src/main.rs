use std::sync::Arc;

use chatbot_server::config::{API_BASE, BIND_ADDR, MODEL};
use chatbot_server::{router, Config, LlmService, Orchestrator, ToolRegistry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let config = Config::from_env().map_err(|e| {
        error!("{}", e);
        e
    })?;

    info!("Using model: {}", MODEL);
    let llm_service = Arc::new(LlmService::new(
        config.api_key,
        API_BASE.to_string(),
        MODEL.to_string(),
    ));
    let tools = Arc::new(ToolRegistry::with_defaults());
    info!(
        "Tool calling {} ({} tools registered)",
        if config.tools_enabled { "enabled" } else { "disabled" },
        tools.len()
    );
    let orchestrator =
        Arc::new(Orchestrator::new(llm_service, tools).with_tools_enabled(config.tools_enabled));

    let app = router(orchestrator);

    info!("Server listening on {}", BIND_ADDR);
    let listener = tokio::net::TcpListener::bind(BIND_ADDR).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
