use async_trait::async_trait;
use brief_core::{BriefError, QuoteSummaryProvider, TickerSymbol};
use reqwest::{header, Client, Url};
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the quote summary endpoint
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    config: YahooConfig,
}

impl YahooClient {
    pub fn new(config: YahooConfig) -> Self {
        let client = Client::builder()
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, config }
    }

    /// Build `<base>/v10/finance/quoteSummary/<ticker>?modules=a,b,c`
    pub fn quote_summary_url(&self, ticker: &TickerSymbol, modules: &[&str]) -> Result<Url, BriefError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| BriefError::Config(format!("invalid Yahoo base URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| BriefError::Config("Yahoo base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["v10", "finance", "quoteSummary", ticker.as_str()]);
        url.query_pairs_mut().append_pair("modules", &modules.join(","));

        Ok(url)
    }

    /// Fetch and decode the raw quote summary document
    pub async fn get_quote_summary(&self, ticker: &TickerSymbol, modules: &[&str]) -> Result<Value, BriefError> {
        let url = self.quote_summary_url(ticker, modules)?;
        tracing::debug!("Fetching Yahoo quote summary for {} ({})", ticker, modules.join(","));

        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, &self.config.user_agent)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            // Unknown symbols come back as 404 with the usual error document
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|doc| provider_error(&doc).map(str::to_string))
                .unwrap_or(body);
            return Err(BriefError::Http(format!("HTTP {}: {}", status, detail)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| BriefError::InvalidResponse(e.to_string()))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new(YahooConfig::default())
    }
}

#[async_trait]
impl QuoteSummaryProvider for YahooClient {
    async fn quote_summary(
        &self,
        ticker: &TickerSymbol,
        modules: &[&str],
    ) -> Result<Map<String, Value>, BriefError> {
        let document = self.get_quote_summary(ticker, modules).await?;
        first_result(&document)
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

/// Pull `quoteSummary.result[0]` out of a quote summary document.
///
/// Missing wrapper keys yield an empty object so every field degrades to its
/// sentinel. An explicit null or empty `result` is an error.
pub fn first_result(document: &Value) -> Result<Map<String, Value>, BriefError> {
    let summary = match document.get("quoteSummary") {
        Some(summary) => summary,
        None => return Ok(Map::new()),
    };

    let result = match summary.get("result") {
        Some(result) => result,
        None => return Ok(Map::new()),
    };

    let first = result
        .as_array()
        .and_then(|arr| arr.first())
        .ok_or_else(|| {
            let reason = provider_error(document).unwrap_or("quoteSummary result is empty");
            BriefError::InvalidResponse(reason.to_string())
        })?;

    Ok(first.as_object().cloned().unwrap_or_default())
}

/// `quoteSummary.error.description`, if the document carries one
fn provider_error(document: &Value) -> Option<&str> {
    document
        .get("quoteSummary")?
        .get("error")?
        .get("description")?
        .as_str()
}
