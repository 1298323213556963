//! Command-line interface for neopixel-bridge.
//!
//! Posts notifications to a running bridge daemon, the same way the
//! dashboard does, which is handy for trying out states by hand.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use neopixel_bridge::api_client::ApiClient;

#[derive(Parser, Debug)]
#[command(name = "neopixel-cli", about = "Send notifications to the NeoPixel bridge")]
struct Cli {
    /// Base URL of the bridge daemon
    #[arg(long, default_value = "http://127.0.0.1:7786")]
    url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Switch the device to a state
    State { state: String },
    /// Raise an alert
    Alert,
    /// Send an arbitrary notification
    Notify {
        name: String,
        /// Payload as JSON
        payload: Option<String>,
    },
    /// Check that the daemon is running
    Health,
    /// Show the daemon's label and device settings
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(cli.url);

    match cli.command {
        Command::State { state } => {
            client.set_state(&state).await?;
            println!("sent state={state}");
        }
        Command::Alert => {
            client.alert().await?;
            println!("sent alert");
        }
        Command::Notify { name, payload } => {
            let payload = match payload {
                Some(text) => serde_json::from_str(&text).context("payload is not valid JSON")?,
                None => Value::Null,
            };
            client.notify(&name, payload).await?;
            println!("sent notification={name}");
        }
        Command::Health => {
            println!("{}", client.health().await?);
        }
        Command::Info => {
            let info = client.info().await?;
            println!("text={} device={} baud_rate={}", info.text, info.device, info.baud_rate);
        }
    }

    Ok(())
}
