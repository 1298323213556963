//! Logging setup for the bridge daemon.
//!
//! The daemon calls [`init_journald_or_stdout`] once at startup. Everything
//! else pulls in `use crate::tracing::prelude::*` for the usual `trace!()`,
//! `debug!()`, `info!()`, `warn!()`, and `error!()` macros.

use std::env;
use time::OffsetDateTime;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{format::Writer, time::FormatTime},
    prelude::*,
};

pub mod prelude {
    #[allow(unused_imports)]
    pub use tracing::{debug, error, info, trace, warn};
}

use prelude::*;

/// Install the global subscriber.
///
/// Under systemd (`JOURNAL_STREAM` set) events go to journald; otherwise,
/// or if the journald socket is unavailable, they go to stdout.
pub fn init_journald_or_stdout() {
    if env::var("JOURNAL_STREAM").is_ok() {
        match tracing_journald::layer() {
            Ok(layer) => tracing_subscriber::registry().with(layer).init(),
            Err(e) => {
                use_stdout();
                error!(error = %e, "Failed to initialize journald logging, using stdout.");
            }
        }
    } else {
        use_stdout();
    }
}

// Human-readable lines on stdout; RUST_LOG narrows or widens the INFO default.
fn use_stdout() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_timer(ClockTimer))
        .init();
}

// Wall-clock time of day, local when the offset is known.
struct ClockTimer;

impl FormatTime for ClockTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let stamp = now
            .format(time::macros::format_description!("[hour]:[minute]:[second]"))
            .map_err(|_| std::fmt::Error)?;
        write!(w, "{stamp}")
    }
}
