//! Constants used across the venvflow workspace.

/// The filename for venvflow's optional tool configuration.
pub const CONFIG_FILE: &str = "venvflow.toml";

/// The Python project descriptor holding dependency lists.
pub const MANIFEST_PYPROJECT: &str = "pyproject.toml";

/// Directory names of the build tree, relative to the project root.
pub const BUILD_DIR: &str = "build";
pub const ENV_DIR: &str = "env";
pub const DIST_DIR: &str = "dist";
pub const TEST_DIR: &str = "test";
pub const OUT_DIR: &str = "out";

/// Written inside an environment once every setup step has succeeded.
pub const COMPLETION_MARKER: &str = ".venvflow-complete";

/// Requirements file materialized inside an environment before `pip install -r`.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Interpreter locations inside a virtual environment, checked in order.
pub const INTERPRETER_WINDOWS: [&str; 2] = ["Scripts", "python.exe"];
pub const INTERPRETER_POSIX: [&str; 2] = ["bin", "python"];

/// Package index hosts trusted by default when installing or building.
pub const DEFAULT_TRUSTED_HOSTS: [&str; 3] =
    ["pypi.org", "pypi.python.org", "files.pythonhosted.org"];

/// Extension of built distribution artifacts.
pub const ARTIFACT_EXTENSION: &str = "whl";

/// Editor launch configuration locations.
pub const LAUNCH_TEMPLATE: &str = "src/test/resources/vscode/launch.json";
pub const LAUNCH_OUTPUT: &str = ".vscode/launch.json";

/// Entry prepended to the collected test ids in the launch configuration.
pub const DEFAULT_TEST_ENTRY: &str = "src/test/py";

/// Test runner module invoked through the test environment's interpreter.
pub const DEFAULT_TEST_RUNNER: &str = "pytest";
