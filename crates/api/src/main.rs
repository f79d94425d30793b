use std::sync::Arc;

use anyhow::Context;

use blog_api::config::ServerConfig;
use blog_auth::TokenCodec;
use blog_store::InMemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    blog_observability::init();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };

    let codec = TokenCodec::new(config.signing_key.as_bytes()).context("token codec")?;
    let store = Arc::new(InMemoryStore::new());
    let app = blog_api::app::build_app(Arc::new(codec), store);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
