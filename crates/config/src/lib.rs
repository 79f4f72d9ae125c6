//! # missive-config
//!
//! Missive configuration.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::Address;
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Serialized},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

mod error;
pub use error::ExtractConfigError;

mod providers;
use providers::TomlFileProvider;

// reexport so cli types can implement `figment::Provider`
pub use figment;

/// Missive configuration.
///
/// # Defaults
///
/// All configuration values have a default, documented in the fields section below.
/// [`Config::default()`] returns the default values for the default profile while
/// [`Config::load()`] merges `missive.toml` and `MISSIVE_` environment variables on top of them.
///
/// # Provider Details
///
/// `Config` is a Figment [`Provider`]. The profile is set to the value of the `profile` field and
/// the data emitted are the serialized fields, in the "default" meta-profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The selected profile. **(default: _default_ `default`)**
    ///
    /// **Note:** This field is never serialized nor deserialized. When a `Config` is extracted,
    /// this field is set to the extracting Figment's selected `Profile`.
    #[serde(skip)]
    pub profile: Profile,
    /// RPC endpoint of the node hosting the ledger contract. **(default: `http://localhost:8545`)**
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eth_rpc_url: Option<String>,
    /// Chain id to sign local transactions for, queried from the node when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Address of the deployed ledger contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<Address>,
    /// Use accounts managed by the node instead of a local key.
    pub unlocked: bool,
    /// Preferred account when `unlocked` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<Address>,
    /// Hex-encoded private key of the local signer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Number of confirmations to wait for after recording a transfer. **(default: 1)**
    pub confirmations: u64,
    /// Seconds to wait for a recorded transfer to confirm. Unbounded when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_timeout: Option<u64>,
    /// Path of the durable key-value store.
    /// **(default: `<data dir>/missive/storage.json`)**
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<PathBuf>,
}

impl Config {
    /// The default profile: "default"
    pub const DEFAULT_PROFILE: Profile = Profile::const_new("default");

    /// TOML section for profiles
    pub const PROFILE_SECTION: &'static str = "profile";

    /// File name of config toml file
    pub const FILE_NAME: &'static str = "missive.toml";

    /// The RPC endpoint used when none is configured.
    pub const DEFAULT_RPC_URL: &'static str = "http://localhost:8545";

    /// Name of the directory missive uses under the platform data directory.
    pub const DATA_DIR_NAME: &'static str = "missive";

    /// File name of the durable key-value store.
    pub const STORAGE_FILE_NAME: &'static str = "storage.json";

    /// Loads the config from the default figment.
    ///
    /// See [`figment`](Self::figment) for more details.
    pub fn load() -> Result<Self, ExtractConfigError> {
        Self::from_provider(Self::figment())
    }

    /// Extracts a `Config` from `provider`, setting the profile to the selected one.
    ///
    /// # Example
    ///
    /// ```rust
    /// use figment::providers::{Format, Toml};
    /// use missive_config::Config;
    ///
    /// // Use missive's default `Figment`, but allow values from `other.toml`
    /// let figment = Config::figment().merge(Toml::file("other.toml").nested());
    ///
    /// let config = Config::from_provider(figment);
    /// ```
    pub fn from_provider<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        trace!(target: "missive::config", "extracting config");
        let figment = Figment::from(provider);
        let mut config = figment.extract::<Self>().map_err(ExtractConfigError::new)?;
        config.profile = figment.profile().clone();
        Ok(config)
    }

    /// Returns the default figment.
    ///
    /// The default figment reads from the following sources, in ascending priority order:
    ///
    ///   1. [`Config::default()`]
    ///   2. `missive.toml` _or_ filename in the `MISSIVE_CONFIG` environment variable, where
    ///      values live under `[profile.<name>]`
    ///   3. `MISSIVE_` prefixed environment variables
    ///
    /// The profile selected is the value set in the `MISSIVE_PROFILE` environment variable. If it
    /// is not set, it defaults to `default`.
    pub fn figment() -> Figment {
        Self::default().into()
    }

    /// Returns the selected profile.
    ///
    /// If the `MISSIVE_PROFILE` env variable is not set, this returns the `DEFAULT_PROFILE`.
    pub fn selected_profile() -> Profile {
        Profile::from_env_or("MISSIVE_PROFILE", Self::DEFAULT_PROFILE)
    }

    /// Returns the RPC endpoint to connect to.
    pub fn rpc_url(&self) -> &str {
        self.eth_rpc_url.as_deref().unwrap_or(Self::DEFAULT_RPC_URL)
    }

    /// Returns the path of the durable key-value store.
    ///
    /// Falls back to `.missive/storage.json` relative to the working directory if the platform
    /// has no data directory.
    pub fn storage_path(&self) -> PathBuf {
        if let Some(storage) = &self.storage {
            return storage.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join(Self::DATA_DIR_NAME))
            .unwrap_or_else(|| Path::new(".").join(format!(".{}", Self::DATA_DIR_NAME)))
            .join(Self::STORAGE_FILE_NAME)
    }

    /// Returns the confirmation timeout, if any.
    pub fn transaction_timeout(&self) -> Option<Duration> {
        self.transaction_timeout.map(Duration::from_secs)
    }

    /// Returns a copy of the config safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.private_key.is_some() {
            config.private_key = Some("<redacted>".to_string());
        }
        config
    }

    /// Serializes the config as a toml document nested in its profile section.
    pub fn to_string_pretty(&self) -> Result<String, toml::ser::Error> {
        let value = toml::Value::try_from(self)?;
        let mut profile = toml::Table::new();
        profile.insert(self.profile.to_string(), value);
        let mut root = toml::Table::new();
        root.insert(Self::PROFILE_SECTION.to_string(), toml::Value::Table(profile));
        toml::to_string_pretty(&root)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Self::DEFAULT_PROFILE,
            eth_rpc_url: None,
            chain_id: None,
            contract: None,
            unlocked: false,
            sender: None,
            private_key: None,
            confirmations: 1,
            transaction_timeout: None,
            storage: None,
        }
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("Missive Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }

    fn profile(&self) -> Option<Profile> {
        Some(self.profile.clone())
    }
}

impl From<Config> for Figment {
    fn from(c: Config) -> Self {
        let profile = Config::selected_profile();
        Self::new()
            .merge(c)
            .merge(TomlFileProvider::new(
                Some("MISSIVE_CONFIG"),
                Config::FILE_NAME,
                Config::PROFILE_SECTION,
            ))
            .merge(Env::prefixed("MISSIVE_").ignore(&["PROFILE", "CONFIG", "DEBUG"]).global())
            .select(profile)
    }
}
