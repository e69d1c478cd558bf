use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::{INTERPRETER_POSIX, INTERPRETER_WINDOWS};
use crate::error::{ConfigurationError, FlowError, Result};

/// Finds the interpreter binary inside a virtual environment.
///
/// The Windows layout (`Scripts/python.exe`) is checked before the POSIX one
/// (`bin/python`). A directory with neither is a broken or half-created
/// environment.
pub fn locate(env_dir: &Path) -> Result<PathBuf> {
    if env_dir.as_os_str().is_empty() {
        return Err(ConfigurationError::EmptyPath.into());
    }
    if !env_dir.exists() {
        return Err(ConfigurationError::MissingPath(env_dir.to_path_buf()).into());
    }
    if !env_dir.is_dir() {
        return Err(ConfigurationError::NotADirectory(env_dir.to_path_buf()).into());
    }

    for convention in [INTERPRETER_WINDOWS, INTERPRETER_POSIX] {
        let candidate = convention.iter().fold(env_dir.to_path_buf(), |p, c| p.join(c));
        if candidate.exists() {
            debug!("interpreter resolved: {}", candidate.display());
            return Ok(candidate);
        }
    }

    Err(FlowError::InterpreterNotFound(env_dir.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_posix_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("bin")).unwrap();
        fs::write(dir.path().join("bin").join("python"), b"").unwrap();

        let python = locate(dir.path()).expect("bin/python should resolve");
        assert_eq!(python, dir.path().join("bin").join("python"));
    }

    #[test]
    fn prefers_windows_layout_when_both_exist() {
        let dir = tempfile::tempdir().unwrap();
        for (sub, file) in [("Scripts", "python.exe"), ("bin", "python")] {
            fs::create_dir_all(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join(file), b"").unwrap();
        }

        let python = locate(dir.path()).unwrap();
        assert_eq!(python, dir.path().join("Scripts").join("python.exe"));
    }

    #[test]
    fn empty_environment_is_unresolved() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate(dir.path()).expect_err("must fail");
        assert!(matches!(err, FlowError::InterpreterNotFound(_)));
    }

    #[test]
    fn missing_directory_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = locate(&dir.path().join("absent")).expect_err("must fail");
        assert!(matches!(
            err,
            FlowError::Configuration(ConfigurationError::MissingPath(_))
        ));
    }

    #[test]
    fn file_instead_of_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("env");
        fs::write(&file, b"").unwrap();
        let err = locate(&file).expect_err("must fail");
        assert!(matches!(
            err,
            FlowError::Configuration(ConfigurationError::NotADirectory(_))
        ));
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = locate(Path::new("")).expect_err("must fail");
        assert!(matches!(err, FlowError::Configuration(ConfigurationError::EmptyPath)));
    }
}
