//! The JSON document printed after a successful deployment.

use serde::Serialize;
use stack::{DeploymentRunId, OutputMap, Timestamp};

/// Printed in place of secret output values unless the caller opts in.
pub const MASKED: &str = "[secret]";

#[derive(Debug, Serialize)]
pub struct DeploymentSummary {
    pub run_id: DeploymentRunId,
    pub stack: String,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub outputs: serde_json::Map<String, serde_json::Value>,
}

/// Flattens `outputs` to plain values, masking secrets unless `show_secrets`.
pub fn render_outputs(
    outputs: &OutputMap,
    show_secrets: bool,
) -> serde_json::Map<String, serde_json::Value> {
    outputs
        .iter()
        .map(|(name, output)| {
            let value = if output.secret && !show_secrets {
                serde_json::Value::String(MASKED.to_string())
            } else {
                output.value.clone()
            };
            (name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
