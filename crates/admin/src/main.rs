//! Metafield Groups Admin - embedded Shopify admin service.
//!
//! This binary serves the admin app on port 3001.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for server-side rendering
//! - Shopify Admin API for metafield definitions and product gift metafields
//! - `PostgreSQL` for metafield groups and sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metafield_groups_admin::config::{AdminConfig, TlsConfig};
use metafield_groups_admin::{db, routes};

/// Start Sentry when `SENTRY_DSN` is set. The guard flushes pending events
/// on drop, so it lives as long as `main`.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    let options = sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Into::into),
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        attach_stacktrace: true,
        send_default_pii: false,
        ..Default::default()
    };
    let guard = sentry::init((dsn, options));

    tracing::info!(store = %config.shopify.store, "Sentry initialized");
    Some(guard)
}

/// Warnings and errors become Sentry events; info and debug ride along as
/// breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    use sentry_tracing::EventFilter;
    use tracing::Level;

    let level = *metadata.level();
    if level <= Level::WARN {
        EventFilter::Event
    } else if level <= Level::DEBUG {
        EventFilter::Breadcrumb
    } else {
        EventFilter::Ignore
    }
}

/// Install the subscriber: env filter, text or JSON output, Sentry events.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "metafield_groups_admin=info,tower_http=debug".into());

    // JSON on Fly.io, where logs are parsed; text everywhere else
    let json_logs = std::env::var("FLY_APP_NAME").is_ok();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true)))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Serve over TLS until a shutdown signal, draining for up to 30 seconds.
async fn serve_tls(app: Router, addr: SocketAddr, tls: TlsConfig) -> std::io::Result<()> {
    let rustls_config = RustlsConfig::from_pem(
        tls.cert_pem.into_bytes(),
        tls.key_pem.expose_secret().as_bytes().to_vec(),
    )
    .await?;

    let handle = Handle::new();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            shutdown_signal().await;
            handle.graceful_shutdown(Some(Duration::from_secs(30)));
        }
    });

    tracing::info!("admin listening on https://{addr}");
    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await
}

/// Serve plain HTTP until a shutdown signal.
async fn serve_plain(app: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("admin listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

#[tokio::main]
async fn main() {
    // Must happen before any TLS use
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AdminConfig::from_env().expect("Failed to load configuration");

    // Sentry first so the tracing layer has a client to report to
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p metafield-groups-cli -- migrate

    let addr = config.socket_addr();
    let tls = config.tls.clone();
    let app = routes::app_with_pool(config, pool);

    let served = match tls {
        Some(tls) => serve_tls(app, addr, tls).await,
        None => serve_plain(app, addr).await,
    };
    served.expect("Server error");
}

/// Resolve on Ctrl+C, or on SIGTERM from the platform on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    let mut sigterm =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");

    #[cfg(unix)]
    let terminate = sigterm.recv();
    #[cfg(not(unix))]
    let terminate = std::future::pending::<Option<()>>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.expect("Failed to listen for Ctrl+C");
        }
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received, draining connections");
}
