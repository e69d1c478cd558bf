use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigurationError, Result};

/// Optional dependency group installed into the test environment.
pub const TEST_EXTRA: &str = "test";

/// Dependency lists declared in `pyproject.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct ExternalManifest {
    #[serde(default)]
    pub project: ManifestProject,
}

#[derive(Debug, Default, Deserialize)]
pub struct ManifestProject {
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default, rename = "optional-dependencies")]
    pub optional_dependencies: HashMap<String, Vec<String>>,
}

impl ExternalManifest {
    /// Reads the manifest; called each time dependencies are needed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            ConfigurationError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::parse(&text).map_err(|source| {
            ConfigurationError::Malformed {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }

    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn base_requirements(&self) -> Vec<String> {
        self.project.dependencies.clone()
    }

    /// Base dependencies followed by the `test` extra.
    pub fn test_requirements(&self) -> Vec<String> {
        let mut requirements = self.base_requirements();
        if let Some(extra) = self.project.optional_dependencies.get(TEST_EXTRA) {
            requirements.extend(extra.iter().cloned());
        }
        requirements
    }
}
