use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which response adapter a source's endpoints speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Pnp,
    Checkers,
    Deeliver,
}

impl SourceKind {
    /// Form field the detail endpoint expects the candidate identifier under.
    #[must_use]
    pub fn detail_field(self) -> &'static str {
        match self {
            SourceKind::Pnp => "product_code",
            SourceKind::Checkers => "href",
            SourceKind::Deeliver => "barcode",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            SourceKind::Pnp => "pnp",
            SourceKind::Checkers => "checkers",
            SourceKind::Deeliver => "deeliver",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Fixed lowercase identifier, e.g. `"pnp"`.
    pub name: String,
    /// Human-facing label shown next to the source's list.
    pub label: String,
    pub kind: SourceKind,
    pub search_path: String,
    pub detail_path: String,
}

impl SourceConfig {
    #[must_use]
    pub fn detail_field(&self) -> &'static str {
        self.kind.detail_field()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

impl SourcesFile {
    /// The three retailer sources with the endpoint paths the matching server
    /// exposes out of the box.
    #[must_use]
    pub fn builtin() -> Self {
        let source = |name: &str, label: &str, kind: SourceKind, detail: &str| SourceConfig {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            search_path: format!("/{name}/search"),
            detail_path: format!("/{name}/{detail}"),
        };

        Self {
            sources: vec![
                source("pnp", "Pick n Pay", SourceKind::Pnp, "fetch_barcode"),
                source("checkers", "Checkers", SourceKind::Checkers, "fetch_details"),
                source("deeliver", "Deeliver", SourceKind::Deeliver, "fetch_details"),
            ],
        }
    }

    /// Looks a source up by its name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }
}

/// Load and validate the sources configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sources_file: SourcesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::SourcesFileParse)?;

    validate_sources(&sources_file)?;

    Ok(sources_file)
}

/// Like [`load_sources`], but falls back to [`SourcesFile::builtin`] when the
/// file does not exist. A file that exists but is invalid is still an error.
///
/// # Errors
///
/// Returns `ConfigError` if an existing file cannot be read, parsed, or fails
/// validation.
pub fn load_sources_or_builtin(path: &Path) -> Result<SourcesFile, ConfigError> {
    if path.exists() {
        load_sources(path)
    } else {
        Ok(SourcesFile::builtin())
    }
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    if sources_file.sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one source must be configured".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();

    for source in &sources_file.sources {
        let name = source.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }

        if name != source.name || name.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "source name '{}' must be lowercase without surrounding whitespace",
                source.name
            )));
        }

        if source.label.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "source '{name}' has an empty label"
            )));
        }

        for (field, path) in [
            ("search_path", &source.search_path),
            ("detail_path", &source.detail_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "source '{name}' {field} '{path}' must start with '/'"
                )));
            }
        }

        if !seen_names.insert(name) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{name}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
