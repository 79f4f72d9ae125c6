use alloy_primitives::Address;
use alloy_transport::TransportError;

/// Why a configured private key cannot back a local wallet.
#[derive(Debug, thiserror::Error)]
pub enum PrivateKeyError {
    #[error("private key is not 32 bytes of hex")]
    Decode,
    #[error("private key is out of range for secp256k1: {0}")]
    OutOfRange(String),
    #[error("private key {0:?} names an environment variable, is the `$` missing?")]
    ExistsAsEnvVar(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("cannot send from {from}: the private key belongs to {signer}")]
    SenderMismatch { from: Address, signer: Address },
    #[error("sender {0} is not managed by the node")]
    SenderNotManaged(Address),
}
