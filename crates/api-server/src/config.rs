use anyhow::{bail, Context, Result};
use sec_client::SecConfig;
use std::time::Duration;
use yahoo_client::YahooConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Process configuration, read once at startup.
///
/// A single timeout applies to every outbound provider call.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub timeout: Duration,
    pub yahoo: YahooConfig,
    pub sec: SecConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout_secs = match var("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS must be a whole number of seconds, got {:?}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            bail!("HTTP_TIMEOUT_SECS must be greater than zero");
        }
        let timeout = Duration::from_secs(timeout_secs);

        let yahoo_defaults = YahooConfig::default();
        let yahoo = YahooConfig {
            base_url: var("YAHOO_BASE_URL").unwrap_or(yahoo_defaults.base_url),
            user_agent: var("YAHOO_USER_AGENT").unwrap_or(yahoo_defaults.user_agent),
            timeout,
        };

        let sec_defaults = SecConfig::default();
        let sec = SecConfig {
            registry_url: var("SEC_REGISTRY_URL").unwrap_or(sec_defaults.registry_url),
            submissions_base_url: var("SEC_SUBMISSIONS_URL").unwrap_or(sec_defaults.submissions_base_url),
            user_agent: var("SEC_USER_AGENT").unwrap_or(sec_defaults.user_agent),
            timeout,
        };

        Ok(Self {
            bind_addr: var("BRIEF_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            timeout,
            yahoo,
            sec,
        })
    }
}
