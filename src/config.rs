// Configuration loading — §4.8. The only place in the crate that touches
// `std::fs`; the printer itself never reads files.

use std::path::Path;

use serde::Deserialize;

use crate::error::FormatError;
use crate::printer::FormatContext;

fn default_indent_width() -> usize {
    2
}

fn default_max_line_length() -> usize {
    80
}

/// Deserializable project configuration, loaded from a TOML file. Every
/// field has a default, so a partial or absent file still produces a
/// complete `FormatConfig` — the same 80/2 the printer falls back to when no
/// file is found at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            max_line_length: default_max_line_length(),
        }
    }
}

impl FormatConfig {
    /// Reads and parses a TOML configuration file. Missing fields fall back
    /// to the documented defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| FormatError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| FormatError::Config {
            path: path.display().to_string(),
            source,
        })
    }

    /// Builds the printer's input for one `format()` call.
    pub fn into_context<'a>(self, file_path: &'a str, source: &'a str) -> FormatContext<'a> {
        FormatContext::new(file_path, source, self.indent_width, self.max_line_length)
    }
}
