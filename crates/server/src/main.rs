//! Chat Widget Server entry point

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chat_widget_config::{load_settings, Settings, WidgetConfig};
use chat_widget_notify::{LeadNotifier, StubNotifier, WebhookNotifier};
use chat_widget_server::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from files and environment.
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("CHAT_WIDGET_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!(
                "Loaded configuration from files (env: {})",
                env.as_deref().unwrap_or("default")
            );
            settings
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!("Starting chat widget server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    // Widget content: catalog, quick questions, message templates
    let widget = match WidgetConfig::load_or_default(&config.widget_config_path) {
        Ok(widget) => widget,
        Err(e) => {
            tracing::error!(
                path = %config.widget_config_path,
                error = %e,
                "Failed to load widget content"
            );
            std::process::exit(1);
        }
    };
    tracing::info!(
        entries = widget.catalog.entries.len(),
        questions = widget.quick_questions.len(),
        "Loaded widget content"
    );

    let notifier = build_notifier(&config);

    let state = AppState::new(config.clone(), widget, notifier);

    // Evict idle sessions in the background
    let _cleanup_shutdown = state.sessions.start_cleanup_task();

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Build the lead notifier from configuration
///
/// Falls back to the in-memory stub whenever a webhook cannot be
/// configured, so lead delivery problems never block the server.
fn build_notifier(config: &Settings) -> Arc<dyn LeadNotifier> {
    if !config.notification.enabled {
        tracing::info!("Lead notifications disabled, using stub notifier");
        return Arc::new(StubNotifier::new());
    }

    match &config.notification.webhook_url {
        Some(url) => {
            let timeout = Duration::from_secs(config.notification.timeout_secs);
            match WebhookNotifier::new(url.clone(), timeout) {
                Ok(notifier) => {
                    tracing::info!(endpoint = %url, "Webhook lead notifier configured");
                    Arc::new(notifier)
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Invalid webhook configuration, falling back to stub notifier"
                    );
                    Arc::new(StubNotifier::new())
                }
            }
        }
        None => {
            tracing::warn!("Notifications enabled without a webhook URL, using stub notifier");
            Arc::new(StubNotifier::new())
        }
    }
}

/// Initialize tracing from the observability settings
fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "chat_widget={},tower_http=info",
            config.observability.log_level
        )
        .into()
    });

    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter);
    if config.observability.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
