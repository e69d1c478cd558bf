use std::path::{Path, PathBuf};

use crate::constants::*;

/// Well-known directories of a project, all derived from its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    /// Environment used to build the package.
    pub fn env_dir(&self) -> PathBuf {
        self.build_dir().join(ENV_DIR)
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.build_dir().join(DIST_DIR)
    }

    pub fn test_dir(&self) -> PathBuf {
        self.build_dir().join(TEST_DIR)
    }

    /// Environment the built artifacts are installed into for testing.
    pub fn test_env_dir(&self) -> PathBuf {
        self.test_dir().join(ENV_DIR)
    }

    pub fn test_out_dir(&self) -> PathBuf {
        self.test_dir().join(OUT_DIR)
    }

    pub fn manifest_file(&self) -> PathBuf {
        self.root.join(MANIFEST_PYPROJECT)
    }

    /// Resolves a path from configuration against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Renders `path` relative to the root with forward slashes, falling back
    /// to the full path when it lies outside the project.
    pub fn relative_posix(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
