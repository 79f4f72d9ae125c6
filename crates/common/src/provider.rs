//! Commonly used helpers to construct `Provider`s.

use crate::LOCAL_HTTP_POLL_INTERVAL;
use alloy_network::{Ethereum, EthereumWallet};
use alloy_provider::{DynProvider, Provider, ProviderBuilder as AlloyProviderBuilder};
use eyre::{Result, WrapErr};
use url::Url;

/// Helper type alias for the type-erased providers used across the workspace.
pub type RpcProvider = DynProvider<Ethereum>;

/// Constructs a read-only provider for the given endpoint.
///
/// Local endpoints (most likely an anvil or other dev node) are polled every
/// [`LOCAL_HTTP_POLL_INTERVAL`].
pub fn get_http_provider(url: impl AsRef<str>) -> Result<RpcProvider> {
    ProviderBuilder::new(url.as_ref()).build()
}

/// Helper type to construct a [`RpcProvider`].
#[derive(Debug)]
pub struct ProviderBuilder {
    // Note: this is a result, so we can easily chain builder calls
    url: Result<Url>,
    wallet: Option<EthereumWallet>,
}

impl ProviderBuilder {
    /// Creates a new builder instance.
    pub fn new(url_str: &str) -> Self {
        // a bare `localhost:<port>` has no scheme, default to http
        let url_str = url_str.trim();
        let url = if url_str.starts_with("localhost:") {
            Url::parse(&format!("http://{url_str}"))
        } else {
            Url::parse(url_str)
        }
        .wrap_err_with(|| format!("invalid provider URL: {url_str:?}"));

        Self { url, wallet: None }
    }

    /// Signs outgoing transactions with the given wallet.
    pub fn wallet(mut self, wallet: EthereumWallet) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Constructs the provider.
    ///
    /// Local endpoints are polled every [`LOCAL_HTTP_POLL_INTERVAL`], others at alloy's default.
    pub fn build(self) -> Result<RpcProvider> {
        let Self { url, wallet } = self;
        let url = url?;
        let local = is_local_endpoint(url.as_str());

        trace!(target: "missive::provider", %url, signing = wallet.is_some(), "building provider");
        let provider = match wallet {
            Some(wallet) => AlloyProviderBuilder::new().wallet(wallet).connect_http(url).erased(),
            None => AlloyProviderBuilder::new().connect_http(url).erased(),
        };
        if local {
            provider.client().set_poll_interval(LOCAL_HTTP_POLL_INTERVAL);
        }
        Ok(provider)
    }
}

/// Returns true if the endpoint is local.
#[inline]
pub fn is_local_endpoint(url: &str) -> bool {
    url.contains("127.0.0.1") || url.contains("localhost")
}
