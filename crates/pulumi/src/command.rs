//! Argument construction and output parsing for `pulumi` invocations.
//!
//! Kept free of I/O so the exact command lines can be tested.

use std::collections::BTreeMap;

use stack::{ConfigMap, OutputMap, OutputValue, StackName};

/// Placeholder the engine prints for secret outputs unless `--show-secrets` is given.
pub(crate) const SECRET_PLACEHOLDER: &str = "[secret]";

/// Appends the stack selector and the non-interactive flag to `verb`.
pub(crate) fn stack_args(verb: &[&str], stack: &StackName) -> Vec<String> {
    let mut args: Vec<String> = verb.iter().map(|s| s.to_string()).collect();
    args.push("--stack".to_string());
    args.push(stack.fully_qualified());
    args.push("--non-interactive".to_string());
    args
}

/// `pulumi config set-all` with one `--secret` or `--plaintext` pair per entry.
pub(crate) fn config_set_all_args(stack: &StackName, config: &ConfigMap) -> Vec<String> {
    let mut args = stack_args(&["config", "set-all"], stack);
    for (key, value) in config {
        args.push(if value.secret { "--secret" } else { "--plaintext" }.to_string());
        args.push(format!("{}={}", key, value.value));
    }
    args
}

/// A loggable rendering of a command line: the binary and the leading
/// subcommand words, stopping at the first flag so no values are included.
pub(crate) fn describe(binary: &str, args: &[String]) -> String {
    let mut parts = vec![binary];
    parts.extend(
        args.iter()
            .map(String::as_str)
            .take_while(|a| !a.starts_with("--")),
    );
    parts.join(" ")
}

/// Combines the masked and revealed JSON output of `pulumi stack output`.
///
/// An output is marked secret when its masked value is the secret placeholder.
pub(crate) fn parse_outputs(masked: &str, revealed: &str) -> Result<OutputMap, String> {
    let masked = parse_object(masked)?;
    let revealed = parse_object(revealed)?;

    Ok(revealed
        .into_iter()
        .map(|(key, value)| {
            let secret = masked
                .get(&key)
                .and_then(serde_json::Value::as_str)
                .is_some_and(|m| m == SECRET_PLACEHOLDER);
            (key, OutputValue { value, secret })
        })
        .collect())
}

fn parse_object(raw: &str) -> Result<BTreeMap<String, serde_json::Value>, String> {
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(raw).map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
