use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gigboard::app::notifications::NoticeBoard;
use gigboard::app::session::Session;
use gigboard::app::sources::{SnapshotCache, SourceChain};
use gigboard::app::store::JobStore;
use gigboard::config::AppConfig;
use gigboard::infra::cache::{LocalCache, MemoryCache, RedisCache};
use gigboard::infra::remote::RemoteJobsApi;
use gigboard::{http, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let cache: Arc<dyn LocalCache> = match &config.redis_url {
        Some(redis_url) => Arc::new(RedisCache::connect(redis_url).await?),
        None => {
            tracing::warn!("REDIS_URL not set, job snapshots will not survive a restart");
            Arc::new(MemoryCache::new())
        }
    };
    let remote = match &config.remote_jobs_url {
        Some(url) => Some(RemoteJobsApi::new(
            url.clone(),
            Duration::from_secs(config.remote_timeout_seconds),
        )?),
        None => None,
    };

    let snapshot = SnapshotCache::new(cache, config.cache_key.clone());
    let session = Session::new();
    let notices = NoticeBoard::new(config.notice_capacity);
    let store = JobStore::new(
        SourceChain::standard(remote, snapshot.clone()),
        snapshot,
        Arc::new(session.clone()),
        Arc::new(notices.clone()),
    );

    match store.load().await {
        Some(source) => tracing::info!(source, "initial job load complete"),
        None => tracing::warn!("starting without jobs"),
    }

    let state = AppState {
        store,
        session,
        notices,
    };

    let app: Router = http::router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("listening on {}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
