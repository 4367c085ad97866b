use brief_core::CompetitiveProfile;
use serde_json::{Map, Value};

pub const PROFILE_MODULES: &[&str] = &["assetProfile"];

pub fn extract_profile(result: &Map<String, Value>) -> CompetitiveProfile {
    let profile = result.get("assetProfile");
    let text = |key: &str| {
        profile
            .and_then(|p| p.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    CompetitiveProfile::from_classification(text("sector"), text("industry"))
}
