//! AI solver configuration

use serde::{Deserialize, Serialize};

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default generative-language API host
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default transport timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for the AI solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// API key; the solver is unavailable without one
    pub api_key: Option<String>,
    /// Model name used in the request path
    pub model: String,
    /// API host, without trailing slash
    pub base_url: String,
    /// Request timeout applied by the HTTP client
    pub timeout_secs: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SolverConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `GEMINI_API_KEY` (or `API_KEY`), `OMNICALC_MODEL` and
    /// `OMNICALC_BASE_URL` from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        config.api_key = non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY"));
        if let Some(model) = non_empty("OMNICALC_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = non_empty("OMNICALC_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        config
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API host
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// True when a non-blank API key is present
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 60);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_from_lookup_prefers_gemini_key() {
        let config = SolverConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "primary"),
            ("API_KEY", "fallback"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_from_lookup_falls_back_to_api_key() {
        let config = SolverConfig::from_lookup(lookup(&[("API_KEY", "fallback")]));
        assert_eq!(config.api_key.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_from_lookup_ignores_blank_values() {
        let config = SolverConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")]));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = SolverConfig::from_lookup(lookup(&[
            ("OMNICALC_MODEL", "gemini-2.0-pro"),
            ("OMNICALC_BASE_URL", "http://localhost:9000/"),
        ]));
        assert_eq!(config.model, "gemini-2.0-pro");
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_builders() {
        let config = SolverConfig::new()
            .with_api_key("k")
            .with_model("m")
            .with_base_url("http://example.com/")
            .with_timeout_secs(5);
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.model, "m");
        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_blank_api_key_is_not_a_key() {
        assert!(!SolverConfig::new().with_api_key("  ").has_api_key());
        assert!(!SolverConfig::new().with_api_key("").has_api_key());
        assert!(SolverConfig::new().with_api_key("k").has_api_key());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: SolverConfig = serde_json::from_str(r#"{"model":"custom"}"#).unwrap();
        assert_eq!(config.model, "custom");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
