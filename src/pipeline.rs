//! The enrichment pipeline
//!
//! normalize -> extract -> resolve -> substitute -> (optional) beautify.
//! Nothing here outlives one invocation; names are resolved freshly per
//! request.

use crate::beautify::beautify;
use crate::extract::extract_codes;
use crate::normalize::normalize;
use crate::resolver::NameResolver;
use crate::substitute::substitute;

pub struct Pipeline {
    resolver: NameResolver,
}

impl Pipeline {
    pub fn new(resolver: NameResolver) -> Self {
        Self { resolver }
    }

    /// Run raw inbound bytes through the full pipeline and return the
    /// final message text. Lookup failures degrade to the bare code;
    /// this never errors.
    pub async fn process(&self, body: &[u8], pretty: bool) -> String {
        let text = normalize(body);
        let matches = extract_codes(&text);

        if matches.is_empty() {
            tracing::debug!("no labeled codes found, relaying text as-is");
            return if pretty { beautify(&text) } else { text };
        }

        let codes: Vec<String> = matches.iter().map(|m| m.code.clone()).collect();
        let names = self.resolver.resolve(&codes).await;
        tracing::info!(
            extracted = matches.len(),
            resolved = names.len(),
            "codes enriched"
        );

        let enriched = substitute(&text, &matches, &names);
        if pretty {
            beautify(&enriched)
        } else {
            enriched
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::QuoteProvider;
    use crate::types::Market;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct TableProvider(HashMap<String, String>);

    #[async_trait]
    impl QuoteProvider for TableProvider {
        fn name(&self) -> &'static str {
            "table"
        }

        async fn lookup(&self, _market: Market, code: &str) -> Result<Option<String>> {
            Ok(self.0.get(code).cloned())
        }
    }

    fn pipeline(pairs: &[(&str, &str)]) -> Pipeline {
        let table = pairs
            .iter()
            .map(|(c, n)| (c.to_string(), n.to_string()))
            .collect();
        Pipeline::new(NameResolver::with_providers(vec![Arc::new(
            TableProvider(table),
        )]))
    }

    #[tokio::test]
    async fn test_end_to_end_single_line() {
        let p = pipeline(&[("159565", "恒生科技")]);
        let out = p
            .process("标的: 159565, 周期: 5, 买信号!".as_bytes(), false)
            .await;
        assert_eq!(out, "标的:恒生科技(159565)\n周期: 5, 买信号!");
    }

    #[tokio::test]
    async fn test_idempotence() {
        let p = pipeline(&[("159565", "恒生科技")]);
        let once = p
            .process("标的: 159565, 周期: 5, 买信号!".as_bytes(), false)
            .await;
        let twice = p.process(once.as_bytes(), false).await;
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_non_numeric_ticker_passthrough() {
        let p = pipeline(&[]);
        let out = p
            .process(br#"{"ticker":"AAPL","price":190.2}"#, false)
            .await;
        assert_eq!(out, "ticker: AAPL\nprice: 190.2");
    }

    #[tokio::test]
    async fn test_lookup_miss_keeps_code() {
        let p = pipeline(&[]);
        let out = p.process("标的: 600000, 买信号".as_bytes(), false).await;
        assert!(out.contains("600000"));
    }
}
