mod api;
mod middleware;

use std::sync::Arc;

use jiak_carpark::{DatamallClient, PageLimits};
use jiak_store::MallStore;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = jiak_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let malls = MallStore::from_app_config(&config)?;
    let carparks = config
        .datamall_account_key
        .as_deref()
        .map(|key| {
            DatamallClient::with_base_url(
                key,
                config.http_timeout_secs,
                &config.user_agent,
                &config.datamall_base_url,
            )
        })
        .transpose()?;
    if carparks.is_none() {
        tracing::warn!("DATAMALL_ACCOUNT_KEY not set; carpark availability disabled");
    }
    let carpark_limits = PageLimits::new(config.carpark_page_size, config.carpark_max_pages)?;

    let app = build_app(AppState {
        malls: Arc::new(malls),
        carparks: carparks.map(Arc::new),
        carpark_limits,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "jiak-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
