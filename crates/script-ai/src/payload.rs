//! Strict validation of the model's JSON response.
//!
//! The model is untrusted: its output only reaches the scene store after
//! every element has been checked. Any violation fails the whole payload
//! with a single user-facing message, so a half-valid response never
//! produces a partially populated timeline.

use serde_json::Value;
use vidprompt_common::error::{VidpromptError, VidpromptResult};
use vidprompt_scene_model::SceneDraft;

const USER_FACING_FAILURE: &str =
    "Failed to generate script. Please check your prompt and try again.";

/// Parse and validate a generator response.
///
/// The payload must be a JSON array whose elements each carry non-empty
/// `startTime`, `endTime`, and `narration` strings.
pub fn parse_scene_payload(json: &str) -> VidpromptResult<Vec<SceneDraft>> {
    match validate(json) {
        Ok(drafts) => Ok(drafts),
        Err(detail) => {
            tracing::warn!(%detail, "Rejected generator payload");
            Err(VidpromptError::generation(USER_FACING_FAILURE))
        }
    }
}

fn validate(json: &str) -> Result<Vec<SceneDraft>, String> {
    let value: Value =
        serde_json::from_str(json.trim()).map_err(|e| format!("response is not JSON: {e}"))?;

    let items = value
        .as_array()
        .ok_or_else(|| "response is not an array".to_string())?;

    let mut drafts = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        drafts.push(SceneDraft {
            start_time: required_string(item, "startTime", index)?,
            end_time: required_string(item, "endTime", index)?,
            narration: required_string(item, "narration", index)?,
        });
    }
    Ok(drafts)
}

fn required_string(item: &Value, field: &str, index: usize) -> Result<String, String> {
    let text = item
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("scene {index} is missing \"{field}\""))?;
    if text.is_empty() {
        return Err(format!("scene {index} has an empty \"{field}\""));
    }
    Ok(text.to_string())
}
