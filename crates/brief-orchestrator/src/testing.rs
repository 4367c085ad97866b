//! In-memory providers with canned responses and call recording.

use async_trait::async_trait;
use brief_core::{
    BriefError, Cik, CompanyTicker, FilingHistory, FilingsProvider, QuoteSummaryProvider,
    TickerSymbol,
};
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Serves one canned result for the profile module and another for everything else
pub struct FakeQuotes {
    summary: Result<Map<String, Value>, BriefError>,
    profile: Result<Map<String, Value>, BriefError>,
    calls: Mutex<Vec<String>>,
}

impl FakeQuotes {
    pub fn new(summary: Value, profile: Value) -> Self {
        Self {
            summary: Ok(summary.as_object().cloned().unwrap_or_default()),
            profile: Ok(profile.as_object().cloned().unwrap_or_default()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Value::Null, Value::Null)
    }

    pub fn failing_summary(mut self, error: BriefError) -> Self {
        self.summary = Err(error);
        self
    }

    pub fn failing_profile(mut self, error: BriefError) -> Self {
        self.profile = Err(error);
        self
    }

    /// `<ticker>?<modules>` for every call so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QuoteSummaryProvider for FakeQuotes {
    async fn quote_summary(
        &self,
        ticker: &TickerSymbol,
        modules: &[&str],
    ) -> Result<Map<String, Value>, BriefError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{}?{}", ticker, modules.join(",")));
        }

        if modules == ["assetProfile"] {
            self.profile.clone()
        } else {
            self.summary.clone()
        }
    }
}

pub struct FakeFilings {
    registry: Result<Vec<CompanyTicker>, BriefError>,
    history: Result<FilingHistory, BriefError>,
    history_calls: Mutex<Vec<String>>,
}

impl FakeFilings {
    pub fn new(registry: Vec<CompanyTicker>, history: FilingHistory) -> Self {
        Self {
            registry: Ok(registry),
            history: Ok(history),
            history_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), FilingHistory::default())
    }

    pub fn failing_registry(mut self, error: BriefError) -> Self {
        self.registry = Err(error);
        self
    }

    pub fn failing_history(mut self, error: BriefError) -> Self {
        self.history = Err(error);
        self
    }

    /// CIKs requested from the history endpoint
    pub fn history_calls(&self) -> Vec<String> {
        self.history_calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FilingsProvider for FakeFilings {
    async fn company_registry(&self) -> Result<Vec<CompanyTicker>, BriefError> {
        self.registry.clone()
    }

    async fn filing_history(&self, cik: &Cik) -> Result<FilingHistory, BriefError> {
        if let Ok(mut calls) = self.history_calls.lock() {
            calls.push(cik.to_string());
        }
        self.history.clone()
    }
}

pub fn company(ticker: &str, cik_str: u64) -> CompanyTicker {
    CompanyTicker {
        cik_str,
        ticker: ticker.to_string(),
        title: None,
    }
}

pub fn history(filings: &[(&str, &str)]) -> FilingHistory {
    FilingHistory {
        form: filings.iter().map(|(form, _)| form.to_string()).collect(),
        filing_date: filings.iter().map(|(_, date)| date.to_string()).collect(),
    }
}
