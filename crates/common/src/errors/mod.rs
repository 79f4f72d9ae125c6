//! Helpers for rendering error chains.

use std::error::Error;

/// Iterates over `err` followed by each of its sources.
pub fn sources<'a>(err: &'a (dyn Error + 'static)) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(Some(err), |&err| err.source())
}

/// Messages of `err` and its sources.
///
/// Most wrapping errors here quote their source, as in `wallet request failed: user rejected`, so a
/// source whose message is contained in the one before it is dropped.
pub fn dedup_chain(err: &(dyn Error + 'static)) -> Vec<String> {
    let mut messages: Vec<String> = sources(err).map(|err| err.to_string().trim().to_string()).collect();
    messages.dedup_by(|source, wrapper| wrapper.contains(source.as_str()));
    messages
}

/// Renders [`dedup_chain`] on one line.
pub fn display_chain(err: &(dyn Error + 'static)) -> String {
    dedup_chain(err).join("; ")
}
