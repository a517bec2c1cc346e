//! Logger bootstrap
//!
//! Wraps flexi_logger setup for the binary. Library code only ever talks to
//! the `log` facade.

use std::sync::Mutex;

use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

/// Kept alive so the logger is not torn down before exit
static LOGGER_HANDLE: Mutex<Option<LoggerHandle>> = Mutex::new(None);

/// Start logging to stderr with a `log`-style filter spec (e.g. `"warn"`)
///
/// `RUST_LOG`, when set, takes precedence over `spec`.
pub fn init(spec: &str) -> Result<(), FlexiLoggerError> {
    let handle = Logger::try_with_env_or_str(spec)?
        .format(flexi_logger::default_format)
        .start()?;

    if let Ok(mut guard) = LOGGER_HANDLE.lock() {
        *guard = Some(handle);
    }
    log::debug!("logging initialised at '{}'", spec);
    Ok(())
}

/// Swap the active filter once the real spec is known
///
/// No-op when `RUST_LOG` is set or no logger is running.
pub fn reconfigure(spec: &str) -> Result<(), FlexiLoggerError> {
    if std::env::var_os("RUST_LOG").is_some() {
        return Ok(());
    }
    if let Ok(guard) = LOGGER_HANDLE.lock() {
        if let Some(handle) = guard.as_ref() {
            handle.parse_new_spec(spec)?;
            log::debug!("logging reconfigured to '{}'", spec);
        }
    }
    Ok(())
}

/// Flush pending records
pub fn shutdown() {
    if let Ok(mut guard) = LOGGER_HANDLE.lock() {
        if let Some(handle) = guard.take() {
            handle.flush();
        }
    }
}

pub fn is_initialized() -> bool {
    LOGGER_HANDLE
        .lock()
        .map(|guard| guard.is_some())
        .unwrap_or(false)
}
