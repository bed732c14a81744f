use tracing::info;
use tracing_subscriber::EnvFilter;

use rulesmith::config::{self, ServerConfig};
use rulesmith::{RuleStore, api};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let config = ServerConfig::from_env();
    let app = api::router(RuleStore::with_history_limit(config.history_limit), &config);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    info!("Rule engine listening on http://{}", config.addr());
    axum::serve(listener, app).await?;

    Ok(())
}
