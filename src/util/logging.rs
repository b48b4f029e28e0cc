//! Browser logging bootstrap.
//!
//! Routes the `log` facade to the devtools console and installs the panic
//! hook so WASM panics print a readable message. Without `hydrate` this is a
//! no-op; native hosts install their own `log` backend.

/// Install the console logger at `level`. Safe to call more than once.
pub fn init(level: log::Level) {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(level) {
            log::debug!("console logger already installed: {e}");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        log::trace!("console logging unavailable outside the browser (level={level})");
    }
}
