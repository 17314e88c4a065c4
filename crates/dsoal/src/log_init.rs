//! `DSOAL_LOGLEVEL` wiring (§6 "Platform boundary").
//!
//! A translation layer loaded into someone else's process has no one to call
//! `env_logger::init()` for it — the host application owns its own logging
//! setup, if it has one at all. So this does two things, once, the first
//! time anything in the crate logs:
//!
//! - Reads `DSOAL_LOGLEVEL` (`0` = off .. `3` = trace) and calls
//!   [`log::set_max_level`] accordingly, so filtering is cheap regardless of
//!   what's listening.
//! - If the host process hasn't installed a logger of its own
//!   (`log::set_boxed_logger` not yet called by anyone), installs a minimal
//!   stderr logger so a standalone `cdylib` build still produces visible
//!   output without requiring the host app to configure one.

use std::sync::OnceLock;

fn level_from_env() -> log::LevelFilter {
    match std::env::var("DSOAL_LOGLEVEL").ok().as_deref() {
        Some("0") => log::LevelFilter::Off,
        Some("1") => log::LevelFilter::Error,
        Some("2") => log::LevelFilter::Warn,
        Some("3") => log::LevelFilter::Trace,
        _ => log::LevelFilter::Warn,
    }
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[dsoal {}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static INIT: OnceLock<()> = OnceLock::new();

/// Idempotent; safe to call from every entry point that might be hit first
/// (`DirectSoundCreate`, `DirectSoundCaptureCreate`, ...). Only the first
/// call has any effect.
pub fn init_logging() {
    INIT.get_or_init(|| {
        log::set_max_level(level_from_env());
        // Fine to fail: it just means the host application already installed
        // its own logger (e.g. via `env_logger`), which we should not replace.
        let _ = log::set_logger(&StderrLogger);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_env_defaults_to_warn() {
        std::env::remove_var("DSOAL_LOGLEVEL");
        assert_eq!(level_from_env(), log::LevelFilter::Warn);
    }

    #[test]
    fn level_3_is_trace() {
        std::env::set_var("DSOAL_LOGLEVEL", "3");
        assert_eq!(level_from_env(), log::LevelFilter::Trace);
        std::env::remove_var("DSOAL_LOGLEVEL");
    }

    #[test]
    fn level_0_is_off() {
        std::env::set_var("DSOAL_LOGLEVEL", "0");
        assert_eq!(level_from_env(), log::LevelFilter::Off);
        std::env::remove_var("DSOAL_LOGLEVEL");
    }
}
