//! Client for the local Ollama generation endpoint.
//!
//! The language model is an external collaborator: this module only sends
//! a composed prompt to `POST /api/generate` and hands back the raw text.
//! Which model to target is static configuration. Failures here are always
//! recoverable for the caller — the transport layer folds them into a
//! normal response payload instead of failing the request.

use anyhow::{bail, Result};
use std::time::Duration;

use crate::config::GenerationConfig;

/// Execute `prompt` against the configured model and return its raw text.
///
/// Non-streaming: the call blocks until the model finishes or the request
/// timeout elapses. There is no retry — a stalled or unreachable model is
/// surfaced to the caller, who decides how to phrase it for the user.
pub async fn generate(config: &GenerationConfig, prompt: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    let body = serde_json::json!({
        "model": config.model,
        "prompt": prompt,
        "stream": false,
    });

    let response = client
        .post(format!("{}/api/generate", config.url))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "Ollama connection error (is Ollama running at {}?): {}",
                config.url,
                e
            )
        })?;

    let status = response.status();
    if !status.is_success() {
        let body_text = response.text().await.unwrap_or_default();
        bail!("Ollama API error {}: {}", status, body_text);
    }

    let json: serde_json::Value = response.json().await?;
    json.get("response")
        .and_then(|r| r.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing response field"))
}

/// Strip accidental markdown code fences from model output.
///
/// Models asked for "only the new code" still wrap it in ``` fences often
/// enough that the edit endpoint cleans them off before handing the code
/// back to the editor. Unfenced output passes through unchanged.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        // Drop the opener line (with or without a language tag).
        let body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => return String::new(),
        };
        let body = body.strip_suffix("```").unwrap_or(body);
        return body.trim_end_matches('\n').to_string();
    }

    trimmed.to_string()
}
