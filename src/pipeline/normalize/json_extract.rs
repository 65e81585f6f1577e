use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").unwrap());

/// Pull a JSON object out of free-form model output.
///
/// Strips markdown code fences, takes the span from the first `{` to the
/// last `}` and parses it strictly. No repair is attempted.
///
/// The span heuristic is not brace-aware: prose after the object that
/// contains its own `}` widens the span and the parse then fails.
pub fn extract_json_object(raw: &str) -> Result<Value, String> {
    let cleaned = CODE_FENCE.replace_all(raw, "");
    let cleaned = cleaned.trim();

    let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) else {
        return Err("no JSON object found".into());
    };
    if end < start {
        return Err("no JSON object found".into());
    }

    serde_json::from_str(&cleaned[start..=end]).map_err(|e| format!("JSON parse error: {e}"))
}
