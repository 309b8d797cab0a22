//! Tencent quote provider (fallback)
//!
//! `https://qt.gtimg.cn/q=sh600000` answers a GBK-encoded assignment
//! of tilde-separated fields; the display name is the second field.

use anyhow::Result;
use async_trait::async_trait;

use super::{fetch_gbk, QuoteProvider};
use crate::types::Market;

const TENCENT_BASE_URL: &str = "https://qt.gtimg.cn/q=";

pub struct TencentProvider {
    client: reqwest::Client,
}

impl TencentProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Pull the name out of `v_sh600000="1~浦发银行~600000~10.10~..."`.
    fn parse_name(body: &str) -> Option<String> {
        let quoted = body.split('"').nth(1)?;
        let name = quoted.split('~').nth(1)?.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

#[async_trait]
impl QuoteProvider for TencentProvider {
    fn name(&self) -> &'static str {
        "tencent"
    }

    async fn lookup(&self, market: Market, code: &str) -> Result<Option<String>> {
        let url = format!(
            "{}{}{}",
            TENCENT_BASE_URL,
            market.query_prefix(),
            market.query_code(code)
        );
        let body = fetch_gbk(&self.client, &url, None).await?;
        Ok(Self::parse_name(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name() {
        let body = r#"v_sz002074="51~国轩高科~002074~21.40~21.10";"#;
        assert_eq!(
            TencentProvider::parse_name(body),
            Some("国轩高科".to_string())
        );
    }

    #[test]
    fn test_parse_missing_field() {
        assert_eq!(TencentProvider::parse_name(r#"v_x="1";"#), None);
        assert_eq!(TencentProvider::parse_name("not a quote"), None);
    }
}
