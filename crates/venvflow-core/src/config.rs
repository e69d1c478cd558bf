use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::command::Command;
use crate::constants::*;
use crate::error::{ConfigurationError, Result};

/// Optional per-project settings read from `venvflow.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    #[serde(default)]
    pub python: PythonConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub test: TestConfig,
    #[serde(default)]
    pub launch: LaunchConfig,
}

impl ToolConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            ConfigurationError::Unreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let cfg = toml::from_str::<Self>(&text).map_err(|source| ConfigurationError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(cfg)
    }

    /// Loads `path` when it exists and falls back to defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            debug!("loading tool config from {}", path.display());
            Self::load_from_file(path)
        } else {
            debug!("no tool config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PythonConfig {
    /// Interpreter used to create environments; a bare name is looked up on `PATH`.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
        }
    }
}

impl PythonConfig {
    /// Resolves the base interpreter to an executable path.
    ///
    /// Relative paths with a directory part are taken from `root`, never from
    /// the working directory; bare names are looked up on `PATH`.
    pub fn resolve(&self, root: &Path) -> Result<PathBuf> {
        let candidate = Path::new(&self.interpreter);
        if candidate.components().count() > 1 || candidate.is_absolute() {
            let path = root.join(candidate);
            if path.is_file() {
                return Ok(path);
            }
            return Err(ConfigurationError::MissingPath(path).into());
        }

        which::which(&self.interpreter).map_err(|e| {
            ConfigurationError::InvalidValue {
                name: "python.interpreter".to_string(),
                message: format!("'{}' not found on PATH: {e}", self.interpreter),
            }
            .into()
        })
    }
}

fn default_interpreter() -> String {
    if cfg!(windows) {
        "python".to_string()
    } else {
        "python3".to_string()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    #[serde(default = "default_trusted_hosts")]
    pub trusted_hosts: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            trusted_hosts: default_trusted_hosts(),
        }
    }
}

impl IndexConfig {
    /// Expands the trusted hosts into repeated `--trusted-host` arguments.
    pub fn trusted_host_args(&self) -> Vec<String> {
        self.trusted_hosts
            .iter()
            .flat_map(|host| ["--trusted-host".to_string(), host.clone()])
            .collect()
    }
}

fn default_trusted_hosts() -> Vec<String> {
    DEFAULT_TRUSTED_HOSTS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Module run with `python -m` to execute and collect tests.
    #[serde(default = "default_runner")]
    pub runner: String,
    /// Entries listed before the collected test ids in the launch configuration.
    #[serde(default = "default_entries")]
    pub default_entries: Vec<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            runner: default_runner(),
            default_entries: default_entries(),
        }
    }
}

fn default_runner() -> String {
    DEFAULT_TEST_RUNNER.to_string()
}

fn default_entries() -> Vec<String> {
    vec![DEFAULT_TEST_ENTRY.to_string()]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchConfig {
    #[serde(default = "default_launch_template")]
    pub template: PathBuf,
    #[serde(default = "default_launch_output")]
    pub output: PathBuf,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            template: default_launch_template(),
            output: default_launch_output(),
        }
    }
}

fn default_launch_template() -> PathBuf {
    PathBuf::from(LAUNCH_TEMPLATE)
}

fn default_launch_output() -> PathBuf {
    PathBuf::from(LAUNCH_OUTPUT)
}

/// What a single invocation of the tool was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    commands: Vec<String>,
    timeout: Option<Duration>,
}

impl RunConfiguration {
    /// An empty command list means `help`; a zero timeout means none.
    pub fn new(commands: Vec<String>, timeout_secs: u64) -> Self {
        let commands = if commands.is_empty() {
            vec![Command::Help.as_str().to_string()]
        } else {
            commands
        };
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
        Self { commands, timeout }
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
