//! HTTP configuration types.
//!
//! This module defines `HttpConfig` and its builder, shared by the auth and
//! ingestion clients.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout for request/response calls
    #[serde(with = "duration_option_serde")]
    pub timeout: Option<Duration>,
    /// Connection timeout
    #[serde(with = "duration_option_serde")]
    pub connect_timeout: Option<Duration>,
    /// Custom headers
    pub headers: HashMap<String, String>,
    /// Proxy settings
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
    /// Whether to disable compression for streaming requests.
    ///
    /// When `true`, the ingestion upload sets `Accept-Encoding: identity` so
    /// intermediaries do not buffer the progress stream to compress it.
    pub stream_disable_compression: bool,
}

/// Builder for `HttpConfig`
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: HashMap<String, String>,
    proxy: Option<String>,
    user_agent: Option<String>,
    stream_disable_compression: Option<bool>,
}

impl HttpConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
    pub fn user_agent<S: Into<String>>(mut self, user_agent: Option<S>) -> Self {
        self.user_agent = user_agent.map(|s| s.into());
        self
    }
    pub fn proxy<S: Into<String>>(mut self, proxy: Option<S>) -> Self {
        self.proxy = proxy.map(|s| s.into());
        self
    }
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
    pub fn stream_disable_compression(mut self, val: bool) -> Self {
        self.stream_disable_compression = Some(val);
        self
    }

    /// Build the configuration
    pub fn build(self) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            headers: self.headers,
            proxy: self.proxy,
            user_agent: self.user_agent.or(defaults.user_agent),
            stream_disable_compression: self
                .stream_disable_compression
                .unwrap_or(defaults.stream_disable_compression),
        }
    }
}

impl HttpConfig {
    /// Returns a builder for constructing `HttpConfig`
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::new()
    }

    /// Copy of this configuration suitable for long-lived streaming responses:
    /// identical except that no total request timeout applies.
    pub fn for_streaming(&self) -> Self {
        Self {
            timeout: None,
            ..self.clone()
        }
    }
}

// Helper module for Duration serialization
mod duration_option_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        let sdc = match std::env::var("ROHDE_STREAM_DISABLE_COMPRESSION") {
            Ok(val) => parse_flag(&val),
            Err(_) => true,
        };
        Self {
            timeout: Some(crate::defaults::http::REQUEST_TIMEOUT),
            connect_timeout: Some(crate::defaults::http::CONNECT_TIMEOUT),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(crate::defaults::http::USER_AGENT.to_string()),
            stream_disable_compression: sdc,
        }
    }
}

/// Anything other than an explicit "off" value counts as enabled.
pub(crate) fn parse_flag(val: &str) -> bool {
    let v = val.trim().to_lowercase();
    !(v == "false" || v == "0" || v == "off" || v == "no")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_default_user_agent() {
        let cfg = HttpConfig::builder()
            .timeout(Some(Duration::from_secs(5)))
            .header("X-Tenant", "rohde")
            .build();
        assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.headers.get("X-Tenant").map(String::as_str), Some("rohde"));
        assert!(cfg.user_agent.unwrap().starts_with("rohde-portal/"));
    }

    #[test]
    fn streaming_copy_drops_total_timeout_only() {
        let cfg = HttpConfig::default();
        let streaming = cfg.for_streaming();
        assert!(streaming.timeout.is_none());
        assert_eq!(streaming.connect_timeout, cfg.connect_timeout);
        assert_eq!(streaming.user_agent, cfg.user_agent);
    }

    #[test]
    fn durations_serialize_as_seconds() {
        let cfg = HttpConfig::builder()
            .timeout(Some(Duration::from_secs(30)))
            .build();
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["timeout"], 30);
        assert!(json["connect_timeout"].is_null());

        let back: HttpConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn flag_parsing() {
        assert!(!parse_flag("off"));
        assert!(!parse_flag(" FALSE "));
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
    }
}
