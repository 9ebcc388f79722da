// ABOUTME: Installs the stderr tracing subscriber used by the command-line tool
// ABOUTME: Stays quiet apart from warnings unless ADDH_DEBUG is set in the environment

use tracing::Level;

pub const DEBUG_ENV: &str = "ADDH_DEBUG";

pub fn max_level(debug: bool) -> Level {
    if debug { Level::DEBUG } else { Level::WARN }
}

pub fn init() {
    let debug = std::env::var_os(DEBUG_ENV).is_some();

    // Ignore the error if a subscriber was already installed.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(max_level(debug))
        .with_target(false)
        .without_time()
        .try_init();
}
