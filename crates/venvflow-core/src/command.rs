use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// The fixed set of operations the dispatcher knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Help,
    Env,
    CleanEnv,
    Package,
    CleanPackage,
    TestEnv,
    UpdateTestEnv,
    CleanTestEnv,
    Test,
    CleanTest,
    Clean,
    Vscode,
}

impl Command {
    /// Every command, in the order they are listed in help output.
    pub const ALL: [Command; 12] = [
        Self::Help,
        Self::Env,
        Self::CleanEnv,
        Self::Package,
        Self::CleanPackage,
        Self::TestEnv,
        Self::UpdateTestEnv,
        Self::CleanTestEnv,
        Self::Test,
        Self::CleanTest,
        Self::Clean,
        Self::Vscode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Env => "env",
            Self::CleanEnv => "clean_env",
            Self::Package => "package",
            Self::CleanPackage => "clean_package",
            Self::TestEnv => "test_env",
            Self::UpdateTestEnv => "update_test_env",
            Self::CleanTestEnv => "clean_test_env",
            Self::Test => "test",
            Self::CleanTest => "clean_test",
            Self::Clean => "clean",
            Self::Vscode => "vscode",
        }
    }

    /// One-line description shown next to the command name in help output.
    pub fn summary(self) -> &'static str {
        match self {
            Self::Help => "Print usage",
            Self::Env => "Create build/env and install base dependencies",
            Self::CleanEnv => "Remove build/env",
            Self::Package => "Build a wheel into build/dist",
            Self::CleanPackage => "Remove build/dist",
            Self::TestEnv => "Create build/test/env with base and test dependencies",
            Self::UpdateTestEnv => "Install built wheels into build/test/env",
            Self::CleanTestEnv => "Remove build/test/env",
            Self::Test => "Run the test suite in build/test/env",
            Self::CleanTest => "Remove build/test/out",
            Self::Clean => "Run clean_test, clean_test_env, clean_package, clean_env",
            Self::Vscode => "Write .vscode/launch.json from the collected tests",
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|cmd| cmd.as_str())
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("command not found: '{0}'")]
    Unknown(String),
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == value)
            .ok_or_else(|| CommandParseError::Unknown(value.to_string()))
    }
}
