//! Conversion options, optionally loaded from a YAML file:
//!
//! ```yaml
//! title: Clarinet Concerto, page 2
//! indent: 4
//! link-staves: true
//! ```

use crate::error::ConvertError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub title: Option<String>,
    pub indent: Option<usize>,
    pub link_staves: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Written to `meiHead/fileDesc/titleStmt/title`
    pub title: Option<String>,
    /// Spaces per nesting level in the output; 0 writes one line
    pub indent: usize,
    /// Link every staff and system to its zone in the section
    pub link_staves: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            title: None,
            indent: 2,
            link_staves: false,
        }
    }
}

impl ConvertOptions {
    pub fn from_yaml(content: &str) -> Result<Self, ConvertError> {
        // An empty file deserializes to null rather than an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| ConvertError::Config(e.to_string()))?;

        if let Some(indent) = raw.indent {
            if indent > 16 {
                return Err(ConvertError::Config(format!(
                    "indent must be between 0 and 16, got {}",
                    indent
                )));
            }
        }

        let defaults = Self::default();
        Ok(Self {
            title: raw.title.filter(|t| !t.trim().is_empty()),
            indent: raw.indent.unwrap_or(defaults.indent),
            link_staves: raw.link_staves.unwrap_or(defaults.link_staves),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        if !path.exists() {
            return Err(ConvertError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::from_yaml(&fs::read_to_string(path)?)
    }
}
