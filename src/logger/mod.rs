//! Structured console logging for bsclens
//!
//! Tagged, leveled output with a process-wide minimum level. The level is
//! taken from the `BSCLENS_LOG` environment variable at `init()` (error,
//! warn, info, debug) and defaults to info. Errors always print.
//!
//! ```rust
//! use bsclens::logger::{self, LogTag};
//!
//! logger::init();
//! logger::info(LogTag::Api, "fetching token list");
//! logger::debug(LogTag::Rpc, "eth_getCode 0xabc... -> 0x");
//! ```

mod format;
mod levels;
mod tags;

pub use levels::LogLevel;
pub use tags::LogTag;

use once_cell::sync::OnceCell;

static MIN_LEVEL: OnceCell<LogLevel> = OnceCell::new();

/// Initialize the logger; call once at startup. Safe to call again (no-op).
pub fn init() {
    let level = std::env::var("BSCLENS_LOG")
        .ok()
        .and_then(|v| LogLevel::parse(&v))
        .unwrap_or(LogLevel::Info);
    let _ = MIN_LEVEL.set(level);
}

fn min_level() -> LogLevel {
    *MIN_LEVEL.get().unwrap_or(&LogLevel::Info)
}

fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    // Errors always log; everything else respects the threshold
    if level != LogLevel::Error && level > min_level() {
        return;
    }
    format::format_and_log(tag, level, message);
}

/// Critical failures, always shown
pub fn error(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Error, message);
}

/// Issues that need attention but are not fatal
pub fn warning(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Warning, message);
}

/// Standard operational messages
pub fn info(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Info, message);
}

/// Detailed diagnostics, shown with BSCLENS_LOG=debug
pub fn debug(tag: LogTag, message: &str) {
    log_internal(tag, LogLevel::Debug, message);
}
