use anyhow::{anyhow, Result};
use std::env;

pub const API_KEY_VAR: &str = "SCRAPFLY";
pub const API_URL_VAR: &str = "SCRAPFLY_API_URL";

pub const DEFAULT_API_URL: &str = "https://api.scrapfly.io/scrape";
pub const DEFAULT_REGION: &str = "in";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub region: String,
    pub accept_language: String,
    /// Anti-scraping protection bypass on the scraping service.
    pub asp: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "{} environment variable not set. Set it with: export {}=your-key-here",
                    API_KEY_VAR,
                    API_KEY_VAR
                )
            })?;

        let api_url = lookup(API_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_key,
            api_url,
            region: DEFAULT_REGION.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            asp: true,
        })
    }

    pub fn with_region(mut self, region: &str) -> Self {
        self.region = region.trim().to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[]));
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("SCRAPFLY"));
    }

    #[test]
    fn test_blank_api_key_is_an_error() {
        let result = Config::from_lookup(lookup_from(&[("SCRAPFLY", "   ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("SCRAPFLY", " key-123\n")])).unwrap();
        assert_eq!(config.api_key, "key-123");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.region, "in");
        assert_eq!(config.accept_language, "en-US,en;q=0.5");
        assert!(config.asp);
    }

    #[test]
    fn test_api_url_override_and_region() {
        let config = Config::from_lookup(lookup_from(&[
            ("SCRAPFLY", "key"),
            ("SCRAPFLY_API_URL", "http://localhost:9999/scrape"),
        ]))
        .unwrap()
        .with_region("uk");
        assert_eq!(config.api_url, "http://localhost:9999/scrape");
        assert_eq!(config.region, "uk");
    }
}
