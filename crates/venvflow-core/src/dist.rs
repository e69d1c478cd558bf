use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constants::ARTIFACT_EXTENSION;
use crate::error::{FlowError, Result};

/// Lists built wheels anywhere under `dist_dir`, sorted by path.
///
/// A missing directory yields an empty list.
pub fn find_artifacts(dist_dir: &Path) -> Result<Vec<PathBuf>> {
    if !dist_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut artifacts = Vec::new();
    for entry in WalkDir::new(dist_dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dist_dir).to_path_buf();
            FlowError::io(path, e.into())
        })?;
        let is_artifact = entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(ARTIFACT_EXTENSION);
        if is_artifact {
            artifacts.push(entry.into_path());
        }
    }
    artifacts.sort();
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_wheels_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("demo-0.1.0-py3-none-any.whl"), b"").unwrap();
        fs::write(nested.join("extra-1.0-py3-none-any.whl"), b"").unwrap();
        fs::write(dir.path().join("demo-0.1.0.tar.gz"), b"").unwrap();

        let found = find_artifacts(dir.path()).unwrap();
        assert_eq!(
            found,
            vec![
                dir.path().join("demo-0.1.0-py3-none-any.whl"),
                nested.join("extra-1.0-py3-none-any.whl"),
            ]
        );
    }

    #[test]
    fn missing_directory_has_no_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_artifacts(&dir.path().join("dist")).unwrap().is_empty());
    }
}
