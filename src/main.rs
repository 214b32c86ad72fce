use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todostore::middleware::Trace;
use todostore::todos::{self, TodoStore};
use todostore::{Config, Server};

/// Initialize tracing subscriber with env filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todostore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_tracing();

    let store = TodoStore::open(&config.data_dir).await?;
    info!(data_dir = %store.dir().display(), "using data directory");

    let mut app = todos::router(Arc::new(store)).layer(Trace);
    if let Some(latency) = config.latency() {
        info!(?latency, "simulating response latency");
        app = app.layer(latency);
    }

    Server::bind(config.addr()).serve(app).await?;
    Ok(())
}
