//! NeoPixel bridge daemon.
//!
//! Opens the LED controller, starts the host bridge and the HTTP API the
//! dashboard posts notifications to, and runs until SIGINT or SIGTERM.

use anyhow::{Context, Result};
use tokio::signal::unix::{self, SignalKind};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use neopixel_bridge::api::{self, AppState};
use neopixel_bridge::bridge::HostBridge;
use neopixel_bridge::config::Config;
use neopixel_bridge::driver::NeoPixel;
use neopixel_bridge::message::socket_channel;
use neopixel_bridge::relay::NotificationRelay;
use neopixel_bridge::tracing::{self, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    tracing::init_journald_or_stdout();

    let config = Config::load().context("failed to load configuration")?;
    info!(text = %config.text, "Starting.");

    let pixel = NeoPixel::open(&config.device.path, config.device.baud_rate)
        .with_context(|| format!("failed to open {}", config.device.path))?;

    let (socket_tx, socket_rx) = socket_channel();
    let relay = NotificationRelay::new(socket_tx);
    let state = AppState::new(relay, &config);

    let running = CancellationToken::new();
    let tracker = TaskTracker::new();
    tracker.spawn(HostBridge::new(pixel, socket_rx).run(running.clone()));
    {
        let running = running.clone();
        let listen = config.api.listen.clone();
        tracker.spawn(async move {
            if let Err(e) = api::serve(&listen, state, running.clone()).await {
                error!(error = %e, "API server failed.");
                running.cancel();
            }
        });
    }
    tracker.close();
    info!("Started.");

    let mut sigint = unix::signal(SignalKind::interrupt())?;
    let mut sigterm = unix::signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
        _ = running.cancelled() => {},
    }

    trace!("Shutting down.");
    running.cancel();

    tracker.wait().await;
    info!("Exiting.");
    Ok(())
}
