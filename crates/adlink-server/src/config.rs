use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use reqwest::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_DB_PATH: &str = "adlink.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// Startup configuration, read once and passed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token. Empty disables the bot.
    pub token: String,
    /// Public URL of the mini app, used for the bot's web-app buttons.
    pub base_url: Url,
    pub store_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Directory with the mini app's static files, served at `/`.
    pub webapp_dir: Option<PathBuf>,
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = var("ADLINK_BOT_TOKEN").unwrap_or_default();

        let raw_url = var("ADLINK_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let base_url =
            Url::parse(&raw_url).with_context(|| format!("ADLINK_BASE_URL '{}' is not a URL", raw_url))?;
        if !token.is_empty() && base_url.scheme() != "https" {
            bail!(
                "ADLINK_BASE_URL must use https when the bot is enabled (got '{}')",
                base_url
            );
        }

        let port = match var("ADLINK_PORT") {
            Some(p) => p
                .parse()
                .with_context(|| format!("ADLINK_PORT '{}' is not a valid port", p))?,
            None => DEFAULT_PORT,
        };

        let seed_sample_data = match var("ADLINK_SEED_SAMPLE_DATA").as_deref() {
            None => false,
            Some("1" | "true" | "yes" | "on") => true,
            Some("0" | "false" | "no" | "off") => false,
            Some(other) => bail!("ADLINK_SEED_SAMPLE_DATA '{}' is not a boolean", other),
        };

        Ok(Self {
            token,
            base_url,
            store_path: var("ADLINK_DB_PATH")
                .unwrap_or_else(|| DEFAULT_DB_PATH.into())
                .into(),
            host: var("ADLINK_HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            webapp_dir: var("ADLINK_WEBAPP_DIR").map(PathBuf::from),
            seed_sample_data,
        })
    }

    pub fn bot_enabled(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = load(&[]).unwrap();
        assert!(!cfg.bot_enabled());
        assert_eq!(cfg.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(cfg.store_path, PathBuf::from("adlink.db"));
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.webapp_dir, None);
        assert!(!cfg.seed_sample_data);
        assert_eq!(cfg.listen_addr().unwrap().port(), 5000);
    }

    #[test]
    fn reads_all_options() {
        let cfg = load(&[
            ("ADLINK_BOT_TOKEN", "123:abc"),
            ("ADLINK_BASE_URL", "https://ads.example.com"),
            ("ADLINK_DB_PATH", "/var/lib/adlink/data.db"),
            ("ADLINK_HOST", "127.0.0.1"),
            ("ADLINK_PORT", "8080"),
            ("ADLINK_WEBAPP_DIR", "./webapp"),
            ("ADLINK_SEED_SAMPLE_DATA", "true"),
        ])
        .unwrap();

        assert!(cfg.bot_enabled());
        assert_eq!(cfg.base_url.host_str(), Some("ads.example.com"));
        assert_eq!(cfg.store_path, PathBuf::from("/var/lib/adlink/data.db"));
        assert_eq!(cfg.listen_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.webapp_dir, Some(PathBuf::from("./webapp")));
        assert!(cfg.seed_sample_data);
    }

    #[test]
    fn bot_requires_https_base_url() {
        let err = load(&[
            ("ADLINK_BOT_TOKEN", "123:abc"),
            ("ADLINK_BASE_URL", "http://ads.example.com"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("https"));
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(load(&[("ADLINK_PORT", "eighty")]).is_err());
        assert!(load(&[("ADLINK_PORT", "70000")]).is_err());
        assert!(load(&[("ADLINK_SEED_SAMPLE_DATA", "maybe")]).is_err());
        assert!(load(&[("ADLINK_BASE_URL", "not a url")]).is_err());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = load(&[("ADLINK_BOT_TOKEN", "  "), ("ADLINK_PORT", "")]).unwrap();
        assert!(!cfg.bot_enabled());
        assert_eq!(cfg.port, 5000);
    }
}
