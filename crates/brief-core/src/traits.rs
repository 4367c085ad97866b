use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{BriefError, Cik, CompanyTicker, FilingHistory, TickerSymbol};

/// Trait for quote/financials and company-profile providers
#[async_trait]
pub trait QuoteSummaryProvider: Send + Sync {
    /// Fetch the first quote summary result for `ticker`, restricted to `modules`.
    async fn quote_summary(
        &self,
        ticker: &TickerSymbol,
        modules: &[&str],
    ) -> Result<Map<String, Value>, BriefError>;
}

/// Trait for regulatory filings providers
#[async_trait]
pub trait FilingsProvider: Send + Sync {
    /// Full ticker registry, in the provider's document order.
    async fn company_registry(&self) -> Result<Vec<CompanyTicker>, BriefError>;

    async fn filing_history(&self, cik: &Cik) -> Result<FilingHistory, BriefError>;
}
