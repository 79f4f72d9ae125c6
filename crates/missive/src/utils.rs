use std::fmt;
use tracing_subscriber::{EnvFilter, prelude::*};
use yansi::Paint;

/// Initializes a tracing subscriber writing to stderr, filtered by `RUST_LOG`.
pub fn subscriber() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Colors output only when stdout is a terminal and `NO_COLOR` is unset.
pub fn enable_paint() {
    let enable = yansi::Condition::os_support() && yansi::Condition::tty_and_color_live();
    yansi::whenever(yansi::Condition::cached(enable));
}

/// Prints a warning to stderr.
pub fn sh_warn(msg: impl fmt::Display) {
    eprintln!("{}: {msg}", "Warning".yellow().bold());
}

/// Prints a progress note to stderr.
pub fn sh_status(msg: impl fmt::Display) {
    eprintln!("{} {msg}", "•".dim());
}

/// Formats an optional value, with a dimmed placeholder when absent.
pub fn or_unset(value: Option<impl fmt::Display>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "unset".dim().to_string(),
    }
}
