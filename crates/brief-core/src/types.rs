use serde::{Deserialize, Serialize};
use std::fmt;

use crate::BriefError;

/// Placeholder for a metric the provider did not report
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a missing sector/industry classification
pub const UNKNOWN: &str = "Unknown";

/// Form type of the annual report
pub const ANNUAL_REPORT_FORM: &str = "10-K";

const PE_VS_SECTOR_PLACEHOLDER: &str = "Analysis requires sector benchmark data";
const FILING_NOTE: &str = "Full text analysis requires additional processing";

/// Normalized ticker symbol. Uppercase, surrounding whitespace removed, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TickerSymbol(String);

impl TickerSymbol {
    pub fn parse(raw: &str) -> Result<Self, BriefError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(BriefError::MissingTicker);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Central Index Key, zero-padded to 10 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cik(String);

impl Cik {
    pub fn from_raw(raw: u64) -> Self {
        Self(format!("{:010}", raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the filings registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyTicker {
    pub cik_str: u64,
    pub ticker: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// First registry entry whose ticker matches, ignoring case
pub fn find_cik(entries: &[CompanyTicker], ticker: &TickerSymbol) -> Option<Cik> {
    entries
        .iter()
        .find(|entry| entry.ticker.to_uppercase() == ticker.as_str())
        .map(|entry| Cik::from_raw(entry.cik_str))
}

/// Recent filings of one company, as index-aligned form/date sequences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingHistory {
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default, rename = "filingDate")]
    pub filing_date: Vec<String>,
}

impl FilingHistory {
    /// Date of the first filing whose form type is exactly `form`.
    ///
    /// A match without an aligned date counts as no match.
    pub fn latest_of_form(&self, form: &str) -> Option<&str> {
        let index = self.form.iter().position(|f| f == form)?;
        self.filing_date.get(index).map(String::as_str)
    }
}

/// Key market metrics, stringified, with `"N/A"` for anything missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialsSnapshot {
    pub market_cap: String,
    pub pe_ratio: String,
    pub revenue: String,
    pub profit_margin: String,
    pub debt_to_equity: String,
}

/// Sector/industry classification plus derived commentary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitiveProfile {
    pub sector: String,
    pub industry: String,
    pub pe_vs_sector: String,
    pub market_position: String,
}

impl CompetitiveProfile {
    pub fn from_classification(sector: Option<String>, industry: Option<String>) -> Self {
        let sector = sector.unwrap_or_else(|| UNKNOWN.to_string());
        let industry = industry.unwrap_or_else(|| UNKNOWN.to_string());
        let market_position = format!("Company operates in {} sector", industry);

        Self {
            sector,
            industry,
            pe_vs_sector: PE_VS_SECTOR_PLACEHOLDER.to_string(),
            market_position,
        }
    }
}

/// Latest annual report summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingSummary {
    pub latest_10k_date: Option<String>,
    pub summary: String,
    pub note: String,
}

impl FilingSummary {
    pub fn from_latest(latest_10k_date: Option<String>) -> Self {
        let summary = match &latest_10k_date {
            Some(date) => format!("Latest {} filing dated {}", ANNUAL_REPORT_FORM, date),
            None => format!("No recent {} found", ANNUAL_REPORT_FORM),
        };

        Self {
            latest_10k_date,
            summary,
            note: FILING_NOTE.to_string(),
        }
    }
}

/// One section of the aggregate: either the data or an `{"error": ...}` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section<T> {
    Ready(T),
    Degraded { error: String },
}

impl<T> Section<T> {
    pub fn degraded(error: impl Into<String>) -> Self {
        Section::Degraded {
            error: error.into(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Section::Degraded { .. })
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(data) => Some(data),
            Section::Degraded { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Section::Ready(_) => None,
            Section::Degraded { error } => Some(error),
        }
    }
}

/// Everything returned to the caller for one ticker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateResponse {
    pub ticker: String,
    pub financials: Section<FinancialsSnapshot>,
    pub competitive_analysis: Section<CompetitiveProfile>,
    pub sec_summary: Section<FilingSummary>,
}
