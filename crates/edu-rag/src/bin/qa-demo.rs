//! Offline QA demo
//!
//! Run with: cargo run -p edu-rag --bin qa-demo

use edu_rag::{AiConfig, AiService, QaRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edu_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = AiConfig::from_env();
    if config.deepseek.api_key.is_none() && config.openai.api_key.is_none() {
        tracing::warn!("no provider credentials configured, forcing mock mode");
        config.mock_mode = true;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Default provider: {}", config.default_provider);
    tracing::info!("  - Mock mode: {}", config.mock_mode);
    tracing::info!(
        "  - Vector index: {}",
        config.vector_db.url.as_deref().unwrap_or("disabled")
    );

    let service = AiService::new(&config);
    service.warmup().await;

    let request = QaRequest::new("求解二次方程 x^2-5x+6=0").with_subject("数学");
    let result = service.answer_question(&request).await?;

    println!("Provider: {}", result.provider);
    println!("Citations:");
    for citation in &result.citations {
        println!("  - {} (score {:.2})", citation.source, citation.score);
    }
    println!("\n{}", result.answer);

    Ok(())
}
