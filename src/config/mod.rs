//! Configuration management for tvrelay
//!
//! Loads from config files + environment variables via .env. The
//! routing table (key -> destination) may additionally be supplied as
//! one JSON object in `TVRELAY_ROUTES`, which is how serverless-style
//! deployments configure it.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub lookup: LookupConfig,
    pub relay: RelayConfig,
    /// Routing key -> delivery destination. Read-only after startup.
    #[serde(default)]
    pub routes: HashMap<String, Route>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Per-provider call timeout in milliseconds
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Outbound delivery timeout in milliseconds
    pub timeout_ms: u64,
}

/// One configured delivery destination
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub url: String,
    /// Payload shape expected by the destination
    #[serde(rename = "type", default)]
    pub shape: DeliveryShape,
    /// Reformat the enriched text into the bulleted summary
    #[serde(default)]
    pub beautify: bool,
}

/// How the final text is wrapped for the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryShape {
    /// Body is the message text verbatim (text/plain; charset=utf-8)
    #[default]
    Raw,
    /// WeCom markdown envelope: {"msgtype":"markdown","markdown":{"content":...}}
    Wecom,
}

const ROUTES_ENV: &str = "TVRELAY_ROUTES";

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("lookup.timeout_ms", 2000)?
            .set_default("relay.timeout_ms", 5000)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (TVRELAY_*)
            .add_source(Environment::with_prefix("TVRELAY").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // The `config` env source cannot carry a map of structs, so the
        // routing table rides in a single JSON env var and wins over files.
        if let Ok(raw) = std::env::var(ROUTES_ENV) {
            if !raw.trim().is_empty() {
                let routes: HashMap<String, Route> = serde_json::from_str(&raw)
                    .with_context(|| format!("{} is not a valid route table", ROUTES_ENV))?;
                app_config.routes = routes;
            }
        }

        Ok(app_config)
    }

    /// Look up the destination for a routing key
    pub fn route_for(&self, key: &str) -> Option<&Route> {
        self.routes.get(key)
    }

    /// Generate a digest of the config (without destination URLs) for logging
    pub fn digest(&self) -> String {
        let mut keys: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        format!(
            "bind={}:{} lookup_timeout={}ms relay_timeout={}ms routes={:?}",
            self.server.host,
            self.server.port,
            self.lookup.timeout_ms,
            self.relay.timeout_ms,
            keys
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_table_from_json() {
        let raw = r#"{
            "team-a": {"url": "https://example.com/hook", "type": "wecom"},
            "team-b": {"url": "https://example.com/raw"}
        }"#;
        let routes: HashMap<String, Route> = serde_json::from_str(raw).unwrap();

        assert_eq!(routes["team-a"].shape, DeliveryShape::Wecom);
        // Shape defaults to raw when omitted
        assert_eq!(routes["team-b"].shape, DeliveryShape::Raw);
        assert!(!routes["team-b"].beautify);
    }

    #[test]
    fn test_route_lookup() {
        let mut routes = HashMap::new();
        routes.insert(
            "alerts".to_string(),
            Route {
                url: "https://example.com".to_string(),
                shape: DeliveryShape::Raw,
                beautify: false,
            },
        );
        let cfg = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            lookup: LookupConfig { timeout_ms: 2000 },
            relay: RelayConfig { timeout_ms: 5000 },
            routes,
        };

        assert!(cfg.route_for("alerts").is_some());
        assert!(cfg.route_for("missing").is_none());
    }
}
