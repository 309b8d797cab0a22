//! Sina quote provider
//!
//! `https://hq.sinajs.cn/list=sh600000` answers a GBK-encoded JS
//! assignment; the display name is the first comma field inside the
//! quoted section. The endpoint rejects requests without a finance
//! referer.

use anyhow::Result;
use async_trait::async_trait;

use super::{fetch_gbk, QuoteProvider};
use crate::types::Market;

const SINA_BASE_URL: &str = "https://hq.sinajs.cn/list=";
const SINA_REFERER: &str = "https://finance.sina.com.cn";

pub struct SinaProvider {
    client: reqwest::Client,
}

impl SinaProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Pull the name out of `var hq_str_sh600000="浦发银行,10.10,..."`.
    fn parse_name(body: &str) -> Option<String> {
        let quoted = body.split('"').nth(1)?;
        let name = quoted.split(',').next()?.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

#[async_trait]
impl QuoteProvider for SinaProvider {
    fn name(&self) -> &'static str {
        "sina"
    }

    async fn lookup(&self, market: Market, code: &str) -> Result<Option<String>> {
        let url = format!(
            "{}{}{}",
            SINA_BASE_URL,
            market.query_prefix(),
            market.query_code(code)
        );
        let body = fetch_gbk(&self.client, &url, Some(SINA_REFERER)).await?;
        Ok(Self::parse_name(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name() {
        let body = r#"var hq_str_sh600000="浦发银行,10.10,10.09,10.20,9.99";"#;
        assert_eq!(SinaProvider::parse_name(body), Some("浦发银行".to_string()));
    }

    #[test]
    fn test_parse_empty_payload() {
        assert_eq!(SinaProvider::parse_name(r#"var hq_str_sh600000="";"#), None);
        assert_eq!(SinaProvider::parse_name("garbage"), None);
    }

    #[test]
    fn test_parse_whitespace_name() {
        assert_eq!(SinaProvider::parse_name(r#"var x=" ,1,2";"#), None);
    }
}
