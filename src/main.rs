#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use contact_relay::api::MgmtState;
use contact_relay::config::Config;
use contact_relay::{AppBuilder, adapters, telemetry};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::watch;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    let telemetry_guard = telemetry::init_telemetry(&config.telemetry)?;

    contact_relay::setup_panic_hook();

    let boot_span = tracing::info_span!("boot_server");
    let (api_listener, mgmt_listener, app_router, mgmt_app, shutdown_rx) = async {
        // Phase 1: Resources
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        contact_relay::spawn_signal_handler(shutdown_tx);

        let mail_transport = adapters::mail::build_transport(&config.mail)?;

        // Phase 2: Component wiring
        let app = AppBuilder::new(config.clone()).with_mail_transport(mail_transport).build()?;

        // Phase 3: Listeners and routers
        let app_router = contact_relay::api::app_router(&config, app.services);
        let mgmt_app = contact_relay::api::mgmt_router(MgmtState { health_service: app.health_service });

        let api_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let mgmt_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.mgmt_port).parse()?;

        tracing::info!(address = %api_addr, "listening");
        tracing::info!(address = %mgmt_addr, "management server listening");

        let api_listener = tokio::net::TcpListener::bind(api_addr).await?;
        let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;

        Ok::<
            (tokio::net::TcpListener, tokio::net::TcpListener, axum::Router, axum::Router, watch::Receiver<bool>),
            anyhow::Error,
        >((api_listener, mgmt_listener, app_router, mgmt_app, shutdown_rx))
    }
    .instrument(boot_span)
    .await?;

    // Phase 4: Serve until a shutdown signal arrives
    let mut api_rx = shutdown_rx.clone();
    let api_server = axum::serve(api_listener, app_router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = api_rx.wait_for(|&s| s).await;
        });

    let mut mgmt_rx = shutdown_rx.clone();
    let mgmt_server = axum::serve(mgmt_listener, mgmt_app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = mgmt_rx.wait_for(|&s| s).await;
        });

    // Phase 5: Drain in-flight submissions, bounded by the shutdown timeout
    let mut deadline_rx = shutdown_rx.clone();
    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    tokio::select! {
        result = async { tokio::try_join!(api_server, mgmt_server) } => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server error");
            } else {
                tracing::info!("Servers stopped.");
            }
        }
        () = async {
            let _ = deadline_rx.wait_for(|&s| s).await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            tracing::warn!("Timeout waiting for in-flight requests to finish.");
        }
    }

    telemetry_guard.shutdown();
    Ok(())
}
