//! Canonical JSON emission (JCS, RFC 8785)
//!
//! JSON output of the CLI is emitted in canonical form so that summaries and
//! matrices diff cleanly across runs and platforms.

use anyhow::{Context, Result};
use serde::Serialize;

/// Serialize `value` as JCS canonical JSON.
///
/// # Example
///
/// ```rust
/// use phaseboard_utils::canonicalization::emit_jcs;
///
/// let json = emit_jcs(&serde_json::json!({"b": 1, "a": 2})).unwrap();
/// assert_eq!(json, r#"{"a":2,"b":1}"#);
/// ```
pub fn emit_jcs<T: Serialize>(value: &T) -> Result<String> {
    let json_value =
        serde_json::to_value(value).with_context(|| "Failed to serialize value to JSON")?;
    let json_bytes = serde_json_canonicalizer::to_vec(&json_value)
        .with_context(|| "Failed to canonicalize JSON using JCS")?;
    String::from_utf8(json_bytes).with_context(|| "JCS output contained invalid UTF-8")
}
