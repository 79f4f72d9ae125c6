use crate::{Wallet, WalletSigner, error::PrivateKeyError};
use alloy_primitives::{Address, B256, hex::FromHex};
use alloy_signer_local::PrivateKeySigner;
use eyre::Result;
use missive_config::Config;

/// Prefers the env-var hint over `err` when the key is the name of a set variable.
fn env_hint_or(pk: &str, err: PrivateKeyError) -> PrivateKeyError {
    if !pk.starts_with("0x") && std::env::var(pk).is_ok() {
        return PrivateKeyError::ExistsAsEnvVar(pk.to_string());
    }
    err
}

/// Validates and sanitizes user inputs, returning a local [WalletSigner].
pub fn create_private_key_signer(private_key_str: &str) -> Result<WalletSigner, PrivateKeyError> {
    let private_key_str = private_key_str.trim();
    let private_key = B256::from_hex(private_key_str)
        .map_err(|_| env_hint_or(private_key_str, PrivateKeyError::Decode))?;
    PrivateKeySigner::from_bytes(&private_key)
        .map(WalletSigner::Local)
        .map_err(|err| env_hint_or(private_key_str, PrivateKeyError::OutOfRange(err.to_string())))
}

/// Ensures a configured sender matches the address of a local signer.
pub fn validate_from_address(specified_from: Option<Address>, signer_address: Address) -> Result<()> {
    if let Some(specified_from) = specified_from
        && specified_from != signer_address
    {
        eyre::bail!(
            "\
The configured sender {specified_from} does not match the address of the private key ({signer_address}).
Remove the `sender` setting or use the private key that belongs to it."
        )
    }
    Ok(())
}

/// Resolves the wallet described by `config`.
///
/// A private key takes precedence over unlocked accounts. Returns `None` when neither is
/// configured, which the session treats as "no wallet installed".
pub fn wallet_from_config(config: &Config) -> Result<Option<Wallet>> {
    let signer = if let Some(private_key) = &config.private_key {
        let signer = create_private_key_signer(private_key)?;
        if let WalletSigner::Local(local) = &signer {
            validate_from_address(config.sender, local.address())?;
        }
        signer
    } else if config.unlocked {
        WalletSigner::Unlocked { from: config.sender }
    } else {
        trace!(target: "missive::wallets", "no wallet configured");
        return Ok(None);
    };
    Ok(Some(Wallet::new(signer, config.rpc_url())?.with_chain_id(config.chain_id)))
}
