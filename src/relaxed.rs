// Relaxed JSON: lets the operator type `{User: {login: 'test'}}` at the
// prompt instead of fully quoted JSON. Text that is already strict JSON is
// used as is. Anything else goes through one left-to-right regex scan that
// quotes bare keys and turns single-quoted values into double-quoted ones,
// then through a strict parser; nothing is ever evaluated.
//
// Quoted strings are consumed whole by the scan, so `, word:` or an
// apostrophe inside a double-quoted value is never touched.
//
// Known limitations:
// - a single quote inside a single-quoted value is not supported (write
//   that value with double quotes instead);
// - a backslash escape inside a single-quoted value is copied verbatim;
// - keys must match `[A-Za-z0-9_]+` to be quoted automatically.

use std::sync::OnceLock;

use regex_lite::{Captures, Regex};
use serde_json::Value;

use crate::error::CliError;

/// Double-quoted string | single-quoted string (1) | bare key (2, 3, 4).
fn token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""(?:[^"\\]|\\.)*"|'([^']*)'|([{,]\s*)([A-Za-z0-9_]+)(\s*:)"#)
            .expect("valid relaxed json regex")
    })
}

fn rewrite(caps: &Captures<'_>) -> String {
    if let Some(single) = caps.get(1) {
        return format!("\"{}\"", single.as_str().replace('"', "\\\""));
    }
    match (caps.get(2), caps.get(3), caps.get(4)) {
        (Some(lead), Some(key), Some(colon)) => {
            format!("{}\"{}\"{}", lead.as_str(), key.as_str(), colon.as_str())
        }
        _ => caps[0].to_string(),
    }
}

fn coerce_and_parse(input: &str) -> Result<(String, Value), CliError> {
    let trimmed = input.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok((trimmed.to_string(), value));
    }
    let text = token().replace_all(trimmed, rewrite).into_owned();
    let value = serde_json::from_str(&text).map_err(|e| CliError::Parse {
        input: trimmed.to_string(),
        message: e.to_string(),
    })?;
    Ok((text, value))
}

/// Rewrite relaxed object-literal text into strict JSON text.
///
/// Strict JSON comes back unchanged (trimmed). Malformed output is a
/// [`CliError::Parse`].
pub fn coerce(input: &str) -> Result<String, CliError> {
    coerce_and_parse(input).map(|(text, _)| text)
}

/// Coerce and parse in one step.
pub fn parse(input: &str) -> Result<Value, CliError> {
    coerce_and_parse(input).map(|(_, value)| value)
}
