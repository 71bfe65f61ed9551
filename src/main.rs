use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use bygdegard::config::AppConfig;
use bygdegard::db;
use bygdegard::db::queries;
use bygdegard::handlers;
use bygdegard::services::notify::log::LogNotifier;
use bygdegard::services::notify::webhook::WebhookNotifier;
use bygdegard::services::notify::Notifier;
use bygdegard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    if config.admin_password == "changeme" {
        tracing::warn!("ADMIN_PASSWORD is not set, using the default password");
    }

    let conn = db::init_db(&config.database_url)?;
    let purged = queries::purge_expired_sessions(&conn)?;
    if purged > 0 {
        tracing::info!("purged {purged} expired admin sessions");
    }

    let notifier: Box<dyn Notifier> = match &config.notify_webhook_url {
        Some(url) => {
            tracing::info!(
                "sending notifications to webhook (url: {url}, timeout: {}s)",
                config.notify_timeout_secs
            );
            Box::new(WebhookNotifier::new(
                url.clone(),
                Duration::from_secs(config.notify_timeout_secs),
            )?)
        }
        None => {
            tracing::info!("logging notifications");
            Box::new(LogNotifier)
        }
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        notifier,
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
