//! Bridge between dashboard notifications and a serial NeoPixel controller.
//!
//! Notifications enter through the [`relay`], travel over the socket channel
//! defined in [`message`], and are written to the device by the [`bridge`]
//! through the [`driver`].

pub mod api;
pub mod api_client;
pub mod bridge;
pub mod config;
pub mod driver;
pub mod error;
pub mod message;
pub mod relay;
pub mod tracing;
