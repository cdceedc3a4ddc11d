//! Parse LLM output into person profiles

use synapse_domain::{EntityProfile, SynthesisError};

/// Parse an LLM response into validated profiles
///
/// Accepts a bare JSON array or one wrapped in a markdown code block. The whole
/// response is rejected if any profile fails validation.
pub fn parse_profiles(response: &str) -> Result<Vec<EntityProfile>, SynthesisError> {
    let json_str = extract_json(response)?;

    let profiles: Vec<EntityProfile> = serde_json::from_str(json_str)
        .map_err(|e| SynthesisError::Malformed(format!("JSON parse error: {}", e)))?;

    for (idx, profile) in profiles.iter().enumerate() {
        validate(profile).map_err(|e| SynthesisError::Malformed(format!("profile {}: {}", idx, e)))?;
    }

    Ok(profiles)
}

fn validate(profile: &EntityProfile) -> Result<(), String> {
    if profile.metadata.name.trim().is_empty() {
        return Err("name is empty".to_string());
    }
    if profile.content.trim().is_empty() {
        return Err(format!("content for '{}' is empty", profile.metadata.name));
    }
    Ok(())
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<&str, SynthesisError> {
    let trimmed = response.trim();

    if let Some(fenced) = trimmed.strip_prefix("```") {
        // Drop the info string (```json) on the opening line
        let body = fenced
            .split_once('\n')
            .map(|(_, rest)| rest)
            .ok_or_else(|| SynthesisError::Malformed("Empty code block".to_string()))?;
        let body = body.trim_end();
        Ok(body.strip_suffix("```").unwrap_or(body).trim())
    } else {
        Ok(trimmed)
    }
}
