use std::{fmt::Display, str::FromStr, sync::OnceLock};

use anyhow::{Error, Result};
use backtrace::Backtrace;
use tracing::{debug, error, info, level_filters::LevelFilter, trace, warn};

static SHOW_BACKTRACE: OnceLock<bool> = OnceLock::new();

/// Installs the global fmt subscriber. Fails on an unknown level filter or
/// when a subscriber is already installed.
pub fn init(display_level: &bool, level_filter: &str) -> Result<()> {
    let level_filter = LevelFilter::from_str(level_filter)
        .map_err(|err| Error::msg(format!("Invalid log level filter '{level_filter}': {err}")))?;

    tracing_subscriber::fmt()
        .with_level(*display_level)
        .with_max_level(level_filter)
        .try_init()
        .map_err(Error::msg)
}

fn show_backtrace() -> bool {
    *SHOW_BACKTRACE.get_or_init(|| std::env::var("RUST_BACKTRACE").is_ok_and(|var| var == "1"))
}

fn line<T: Display>(prefix: Option<&str>, glyph: &str, msg: T) -> String {
    format!("{} {msg}", prefix.unwrap_or(glyph))
}

pub fn trace<T: Display>(prefix: Option<&str>, msg: T) {
    trace!("{}", line(prefix, "🐾", msg));
}

pub fn debug<T: Display>(prefix: Option<&str>, msg: T) {
    debug!("{}", line(prefix, "🐞", msg));
}

pub fn info<T: Display>(prefix: Option<&str>, msg: T) {
    info!("{}", line(prefix, "📢", msg));
}

pub fn warn<T: Display>(prefix: Option<&str>, msg: T) {
    warn!("{}", line(prefix, "⚠️", msg));
}

pub fn error<T: Display>(prefix: Option<&str>, msg: T) {
    let line = line(prefix, "🚨", msg);
    if show_backtrace() {
        error!("{line}\n{:?}", Backtrace::new());
    } else {
        error!("{line}");
    }
}

pub fn panic<T: Display>(prefix: Option<&str>, msg: T) -> ! {
    panic!("{}", line(prefix, "☠️", msg));
}
