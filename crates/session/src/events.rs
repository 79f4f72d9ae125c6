use alloy_primitives::Address;

/// A change to the session, broadcast to every subscriber.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A wallet account was authorized.
    AccountChanged(Address),
    /// A recorded transfer started or stopped waiting for confirmation.
    Loading(bool),
    /// The transfer list was replaced, with the new length.
    TransfersReplaced(usize),
    /// The in-memory transfer count changed.
    TransactionCount(u64),
    /// The form was reset after a send.
    FormCleared,
    /// A prompt meant for the user, such as the missing wallet warning.
    Alert(String),
}
