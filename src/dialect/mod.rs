//! Dialect normalizers
//!
//! A closed set of input dialects, each transforming its raw value tree into
//! the canonical model. Dispatch goes through [`Dialect::normalize`]; there
//! is no fallback between dialects.

pub mod introspection;
pub mod native;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{ErdError, Result};
use crate::input;
use crate::model::TypeCategory;
use crate::registry::ParsedSchema;

/// Supported input dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Default dialect: fields arrive essentially canonical.
    Native,
    /// Exported introspection dumps: value/attributes wrappers and
    /// `dereferencesTo` markers.
    Introspection,
    /// Recognized but intentionally unsupported.
    Manifest,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Native, Dialect::Introspection, Dialect::Manifest];

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Native => "native",
            Dialect::Introspection => "introspection",
            Dialect::Manifest => "manifest",
        }
    }

    /// Normalize a parsed value tree into the canonical schema.
    pub fn normalize(&self, entries: &[Value]) -> Result<ParsedSchema> {
        match self {
            Dialect::Native => Ok(native::normalize(entries)),
            Dialect::Introspection => Ok(introspection::normalize(entries)),
            Dialect::Manifest => Err(ErdError::NotImplemented("manifest")),
        }
    }

    /// Parse raw schema text and normalize it in one step.
    pub fn normalize_text(&self, text: &str) -> Result<ParsedSchema> {
        let entries = input::parse_document(text)?;
        self.normalize(&entries)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Dialect::Native),
            "introspection" => Ok(Dialect::Introspection),
            "manifest" => Ok(Dialect::Manifest),
            other => Err(format!(
                "unknown dialect '{other}' (expected one of: native, introspection, manifest)"
            )),
        }
    }
}

/// A root entry becomes a type only when it carries both a name and a
/// category tag; entries missing either are skipped, not errors.
pub(crate) fn entry_header(entry: &Value) -> Option<(String, TypeCategory)> {
    let name = entry.get("name")?.as_str()?;
    let category = entry.get("type")?.as_str()?;
    Some((name.to_string(), TypeCategory::from_tag(category)))
}
