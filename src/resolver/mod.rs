//! Security display-name resolution
//!
//! An ordered chain of quote providers (Sina first, Tencent fallback)
//! is walked per code until one yields a non-empty name. Distinct codes
//! in a batch are resolved concurrently; a slow or broken provider only
//! costs its own timeout and never aborts the batch.

mod sina;
mod tencent;

pub use sina::SinaProvider;
pub use tencent::TencentProvider;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::types::Market;

/// Trait for quote lookup providers
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Look up the display name for a market-classified code.
    ///
    /// `Ok(None)` means the provider answered but knows no name;
    /// transport and decode failures surface as errors. Either way the
    /// caller moves on to the next provider in the chain.
    async fn lookup(&self, market: Market, code: &str) -> Result<Option<String>>;
}

/// Ordered provider chain with concurrent per-batch fan-out
pub struct NameResolver {
    providers: Vec<Arc<dyn QuoteProvider>>,
}

impl NameResolver {
    /// Build the default Sina -> Tencent chain. `timeout` bounds each
    /// individual provider call.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create lookup HTTP client")?;

        Ok(Self {
            providers: vec![
                Arc::new(SinaProvider::new(client.clone())),
                Arc::new(TencentProvider::new(client)),
            ],
        })
    }

    /// Build a resolver over an arbitrary chain (used by tests)
    pub fn with_providers(providers: Vec<Arc<dyn QuoteProvider>>) -> Self {
        Self { providers }
    }

    /// Resolve a batch of codes to display names.
    ///
    /// Duplicates are collapsed so each distinct code costs at most one
    /// walk of the provider chain. Unclassifiable codes are skipped
    /// without any network call. Codes that resolve nowhere are simply
    /// absent from the returned map.
    pub async fn resolve(&self, codes: &[String]) -> HashMap<String, String> {
        let mut distinct: Vec<&String> = Vec::new();
        for code in codes {
            if !distinct.contains(&code) {
                distinct.push(code);
            }
        }

        let lookups = distinct.into_iter().filter_map(|code| {
            let market = Market::classify(code);
            if market == Market::Unknown {
                tracing::debug!(code = %code, "unclassifiable code, skipping lookup");
                return None;
            }
            Some(self.resolve_one(code.clone(), market))
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }

    async fn resolve_one(&self, code: String, market: Market) -> Option<(String, String)> {
        for provider in &self.providers {
            match provider.lookup(market, &code).await {
                Ok(Some(name)) if !name.trim().is_empty() => {
                    tracing::debug!(
                        code = %code,
                        provider = provider.name(),
                        name = %name,
                        "name resolved"
                    );
                    return Some((code, name.trim().to_string()));
                }
                Ok(_) => {
                    tracing::debug!(
                        code = %code,
                        provider = provider.name(),
                        "provider returned no name"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        code = %code,
                        provider = provider.name(),
                        error = %e,
                        "name lookup failed"
                    );
                }
            }
        }
        None
    }
}

/// GET a provider URL and decode the GBK body to UTF-8.
pub(crate) async fn fetch_gbk(
    client: &reqwest::Client,
    url: &str,
    referer: Option<&str>,
) -> Result<String> {
    let mut request = client.get(url);
    if let Some(referer) = referer {
        request = request.header(reqwest::header::REFERER, referer);
    }

    let response = request.send().await.context("quote request failed")?;
    if !response.status().is_success() {
        bail!("quote endpoint returned {}", response.status());
    }

    let bytes = response.bytes().await.context("quote body read failed")?;
    let (text, _, _) = encoding_rs::GBK.decode(&bytes);
    Ok(text.into_owned())
}
