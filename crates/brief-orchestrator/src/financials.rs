use brief_core::{FinancialsSnapshot, NOT_AVAILABLE};
use serde_json::{Map, Value};

pub const FINANCIALS_MODULES: &[&str] = &["defaultKeyStatistics", "financialData", "summaryDetail"];

/// Stringified `<module>.<key>.raw`, or `"N/A"` when any step is missing
pub fn raw_field(result: &Map<String, Value>, module: &str, key: &str) -> String {
    let field = result.get(module).and_then(|m| m.get(key));

    match field {
        Some(Value::Object(field)) => match field.get("raw") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => NOT_AVAILABLE.to_string(),
            Some(other) => other.to_string(),
        },
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn extract_financials(result: &Map<String, Value>) -> FinancialsSnapshot {
    FinancialsSnapshot {
        market_cap: raw_field(result, "summaryDetail", "marketCap"),
        pe_ratio: raw_field(result, "summaryDetail", "trailingPE"),
        revenue: raw_field(result, "financialData", "totalRevenue"),
        profit_margin: raw_field(result, "financialData", "profitMargins"),
        debt_to_equity: raw_field(result, "financialData", "debtToEquity"),
    }
}
