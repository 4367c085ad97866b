//! SEC EDGAR client: ticker registry lookup and filing history.
//!
//! The SEC fair access policy requires a User-Agent naming the caller and a
//! contact address; it is sent on every request.

use async_trait::async_trait;
use brief_core::{BriefError, Cik, CompanyTicker, FilingHistory, FilingsProvider};
use reqwest::{header, Client};
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_REGISTRY_URL: &str = "https://www.sec.gov/files/company_tickers.json";
pub const DEFAULT_SUBMISSIONS_BASE_URL: &str = "https://data.sec.gov/submissions";
pub const DEFAULT_USER_AGENT: &str = "StockAnalyzer contact@example.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct SecConfig {
    pub registry_url: String,
    pub submissions_base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for SecConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            submissions_base_url: DEFAULT_SUBMISSIONS_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// `company_tickers.json` entries in document order.
///
/// The file is an object keyed by opaque indices ("0", "1", ...); the keys
/// are dropped but their order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyRegistry(pub Vec<CompanyTicker>);

impl<'de> Deserialize<'de> for CompanyRegistry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = CompanyRegistry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of company ticker entries")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((_, entry)) = map.next_entry::<IgnoredAny, CompanyTicker>()? {
                    entries.push(entry);
                }
                Ok(CompanyRegistry(entries))
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}

#[derive(Debug, Deserialize)]
struct SubmissionsResponse {
    #[serde(default)]
    filings: FilingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct FilingsSection {
    #[serde(default)]
    recent: FilingHistory,
}

pub fn parse_registry(body: &str) -> Result<Vec<CompanyTicker>, BriefError> {
    let registry: CompanyRegistry = serde_json::from_str(body)
        .map_err(|e| BriefError::InvalidResponse(format!("company registry: {}", e)))?;
    Ok(registry.0)
}

pub fn parse_submissions(body: &str) -> Result<FilingHistory, BriefError> {
    let submissions: SubmissionsResponse = serde_json::from_str(body)
        .map_err(|e| BriefError::InvalidResponse(format!("submissions: {}", e)))?;
    Ok(submissions.filings.recent)
}

#[derive(Clone)]
pub struct SecClient {
    client: Client,
    config: SecConfig,
}

impl SecClient {
    pub fn new(config: SecConfig) -> Self {
        let client = Client::builder()
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    pub fn submissions_url(&self, cik: &Cik) -> String {
        format!(
            "{}/CIK{}.json",
            self.config.submissions_base_url.trim_end_matches('/'),
            cik
        )
    }

    async fn get_text(&self, url: &str) -> Result<String, BriefError> {
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, &self.config.user_agent)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            return Err(BriefError::Http(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| BriefError::Http(format!("failed to read response body: {}", e)))
    }
}

impl Default for SecClient {
    fn default() -> Self {
        Self::new(SecConfig::default())
    }
}

#[async_trait]
impl FilingsProvider for SecClient {
    async fn company_registry(&self) -> Result<Vec<CompanyTicker>, BriefError> {
        let body = self.get_text(&self.config.registry_url).await?;
        let entries = parse_registry(&body)?;
        tracing::debug!("Loaded {} SEC registry entries", entries.len());
        Ok(entries)
    }

    async fn filing_history(&self, cik: &Cik) -> Result<FilingHistory, BriefError> {
        let body = self.get_text(&self.submissions_url(cik)).await?;
        parse_submissions(&body)
    }
}

fn map_transport_error(e: reqwest::Error) -> BriefError {
    if e.is_timeout() {
        BriefError::Http(format!("request timeout: {}", e))
    } else if e.is_connect() {
        BriefError::Http(format!("connection failed: {}", e))
    } else {
        BriefError::Http(format!("request failed: {}", e))
    }
}
