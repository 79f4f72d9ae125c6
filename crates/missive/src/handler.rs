use eyre::EyreHandler;
use missive_common::errors::{display_chain, sources};
use missive_session::SessionError;
use std::{error::Error, fmt};

/// Error report printed when a `missive` command fails.
///
/// Renders the deduplicated cause chain, followed by a hint when a session error says what the
/// user can change. With `MISSIVE_DEBUG` set the `color-eyre` report is printed instead.
pub struct Handler {
    debug_handler: Option<Box<dyn EyreHandler>>,
}

impl EyreHandler for Handler {
    fn display(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_chain(error))
    }

    fn debug(&self, error: &(dyn Error + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(debug_handler) = &self.debug_handler {
            return debug_handler.debug(error, f);
        }
        if f.alternate() {
            return fmt::Debug::fmt(error, f);
        }

        f.write_str(&display_chain(error))?;
        if let Some(hint) = hint(error) {
            write!(f, "\n\nhint: {hint}")?;
        }
        Ok(())
    }

    fn track_caller(&mut self, location: &'static std::panic::Location<'static>) {
        if let Some(debug_handler) = &mut self.debug_handler {
            debug_handler.track_caller(location);
        }
    }
}

/// Suggests a fix for the first session error in the chain.
fn hint(error: &(dyn Error + 'static)) -> Option<&'static str> {
    sources(error).find_map(|err| match err.downcast_ref::<SessionError>()? {
        SessionError::MissingProvider => {
            Some("pass `--private-key` or `--unlocked`, or set one of them in missive.toml")
        }
        SessionError::NotConnected => Some("the node authorized no account, unlock one and run `missive connect`"),
        SessionError::InvalidAmount { .. } => Some("amounts are positive decimal ether, such as `0.00001`"),
        SessionError::LedgerCall(_) => Some("check that `--contract` is the deployed transfer ledger"),
        _ => None,
    })
}

/// Installs the [`eyre`] and [`panic`](mod@std::panic) hooks as the global ones.
pub fn install() {
    let (panic_hook, debug_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("This is a bug. Consider reporting it to the missive maintainers.")
        .into_hooks();
    panic_hook.install();
    let debug_hook = debug_hook.into_eyre_hook();
    let debug = std::env::var_os("MISSIVE_DEBUG").is_some();
    if let Err(e) = eyre::set_hook(Box::new(move |e| {
        Box::new(Handler { debug_handler: debug.then(|| debug_hook(e)) })
    })) {
        debug!("failed to install eyre error hook: {e}");
    }
}
