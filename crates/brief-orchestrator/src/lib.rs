use brief_core::{
    find_cik, AggregateResponse, BriefError, CompetitiveProfile, FilingSummary, FilingsProvider,
    FinancialsSnapshot, QuoteSummaryProvider, Section, TickerSymbol, ANNUAL_REPORT_FORM,
};
use std::sync::Arc;

pub mod competitive;
pub mod financials;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use competitive::{extract_profile, PROFILE_MODULES};
pub use financials::{extract_financials, raw_field, FINANCIALS_MODULES};

/// Collects the financials, competitive profile and filing summary for one ticker.
///
/// Each section recovers locally: a failing provider turns its own section into
/// an `{"error": ...}` object and the other sections are still fetched.
#[derive(Clone)]
pub struct BriefOrchestrator {
    quotes: Arc<dyn QuoteSummaryProvider>,
    filings: Arc<dyn FilingsProvider>,
}

impl BriefOrchestrator {
    pub fn new(quotes: Arc<dyn QuoteSummaryProvider>, filings: Arc<dyn FilingsProvider>) -> Self {
        Self { quotes, filings }
    }

    /// Build the full response. Sections run one after another.
    pub async fn aggregate(&self, ticker: &TickerSymbol) -> AggregateResponse {
        tracing::info!("Building brief for {}", ticker);

        let financials = self.fetch_financials(ticker).await;
        let competitive_analysis = self.fetch_competitive(ticker).await;
        let sec_summary = self.summarize_filings(ticker).await;

        let degraded = [
            financials.is_degraded(),
            competitive_analysis.is_degraded(),
            sec_summary.is_degraded(),
        ]
        .iter()
        .filter(|d| **d)
        .count();
        tracing::info!("Brief for {} complete ({} degraded sections)", ticker, degraded);

        AggregateResponse {
            ticker: ticker.to_string(),
            financials,
            competitive_analysis,
            sec_summary,
        }
    }

    pub async fn fetch_financials(&self, ticker: &TickerSymbol) -> Section<FinancialsSnapshot> {
        match self.quotes.quote_summary(ticker, FINANCIALS_MODULES).await {
            Ok(result) => Section::Ready(extract_financials(&result)),
            Err(e) => {
                tracing::warn!("Financials fetch failed for {}: {}", ticker, e);
                Section::degraded(format!("Failed to fetch financials: {}", e))
            }
        }
    }

    pub async fn fetch_competitive(&self, ticker: &TickerSymbol) -> Section<CompetitiveProfile> {
        match self.quotes.quote_summary(ticker, PROFILE_MODULES).await {
            Ok(result) => Section::Ready(extract_profile(&result)),
            Err(e) => {
                tracing::warn!("Profile fetch failed for {}: {}", ticker, e);
                Section::degraded(format!("Failed to fetch competitive analysis: {}", e))
            }
        }
    }

    pub async fn summarize_filings(&self, ticker: &TickerSymbol) -> Section<FilingSummary> {
        match self.latest_annual_report(ticker).await {
            Ok(latest) => Section::Ready(FilingSummary::from_latest(latest)),
            Err(BriefError::CompanyNotFound) => {
                tracing::warn!("{} not found in SEC registry", ticker);
                Section::degraded(BriefError::CompanyNotFound.to_string())
            }
            Err(e) => {
                tracing::warn!("SEC summary failed for {}: {}", ticker, e);
                Section::degraded(format!("Failed to fetch SEC summary: {}", e))
            }
        }
    }

    /// Resolve the CIK, then find the most recent 10-K date in its history
    async fn latest_annual_report(&self, ticker: &TickerSymbol) -> Result<Option<String>, BriefError> {
        let registry = self.filings.company_registry().await?;
        let cik = find_cik(&registry, ticker).ok_or(BriefError::CompanyNotFound)?;

        tracing::debug!("Resolved {} to CIK {}", ticker, cik);

        let history = self.filings.filing_history(&cik).await?;
        Ok(history.latest_of_form(ANNUAL_REPORT_FORM).map(str::to_string))
    }
}
