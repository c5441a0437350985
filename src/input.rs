//! Input reading
//!
//! Turns raw schema text into a generic value tree. Strict JSON parsing is
//! tried first; text that fails strict parsing but is array-literal-shaped
//! goes through the relaxed literal parser. The conversion core only ever
//! sees the resulting `serde_json::Value` entries.

use serde_json::Value;

use crate::error::{ErdError, Result};
use crate::literal;

/// Parse schema text into the root array of raw type entries.
///
/// Errors with [`ErdError::UnrecognizedFormat`] when the parsed root is not
/// an array, and [`ErdError::ParseFailure`] (carrying the strict parser's
/// message) when neither strict nor relaxed parsing succeeds.
pub fn parse_document(text: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(entries)) => Ok(entries),
        Ok(_) => Err(ErdError::UnrecognizedFormat),
        Err(strict_err) => {
            if !text.trim_start().starts_with('[') {
                return Err(ErdError::ParseFailure(strict_err.to_string()));
            }
            match literal::parse_literal(text) {
                Ok(Value::Array(entries)) => {
                    tracing::debug!("strict parse failed, relaxed literal fallback succeeded");
                    Ok(entries)
                }
                Ok(_) => Err(ErdError::UnrecognizedFormat),
                Err(_) => Err(ErdError::ParseFailure(strict_err.to_string())),
            }
        }
    }
}
