use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, info, instrument, warn};

use venvflow_core::constants::{COMPLETION_MARKER, REQUIREMENTS_FILE};
use venvflow_core::{
    dist, interpreter, Command, ExternalManifest, FlowError, Invocation, ProcessRunner,
    ProjectLayout, Result, RunConfiguration, ToolConfig,
};

/// Sub-steps of `clean`, in the order they run.
pub const CLEAN_SEQUENCE: [Command; 4] = [
    Command::CleanTest,
    Command::CleanTestEnv,
    Command::CleanPackage,
    Command::CleanEnv,
];

/// Runs named commands in order against one project, stopping at the first failure.
#[derive(Debug)]
pub struct Dispatcher<'a> {
    layout: ProjectLayout,
    tool: ToolConfig,
    run: RunConfiguration,
    runner: &'a dyn ProcessRunner,
    help: String,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        layout: ProjectLayout,
        tool: ToolConfig,
        run: RunConfiguration,
        runner: &'a dyn ProcessRunner,
        help: String,
    ) -> Self {
        Self {
            layout,
            tool,
            run,
            runner,
            help,
        }
    }

    /// Resolves and runs each configured command; an unknown name aborts
    /// the remaining ones.
    pub fn run(&self) -> Result<()> {
        for name in self.run.commands() {
            let command = Command::from_str(name)?;
            self.dispatch(command)?;
        }
        Ok(())
    }

    pub fn dispatch(&self, command: Command) -> Result<()> {
        let handler: fn(&Self) -> Result<()> = match command {
            Command::Help => Self::help,
            Command::Env => Self::env,
            Command::CleanEnv => Self::clean_env,
            Command::Package => Self::package,
            Command::CleanPackage => Self::clean_package,
            Command::TestEnv => Self::test_env,
            Command::UpdateTestEnv => Self::update_test_env,
            Command::CleanTestEnv => Self::clean_test_env,
            Command::Test => Self::test,
            Command::CleanTest => Self::clean_test,
            Command::Clean => Self::clean,
            Command::Vscode => Self::vscode,
        };
        handler(self)
    }

    fn help(&self) -> Result<()> {
        println!("{}", self.help);
        Ok(())
    }

    fn env(&self) -> Result<()> {
        self.ensure_environment(
            Command::Env,
            &self.layout.env_dir(),
            ExternalManifest::base_requirements,
        )
    }

    fn clean_env(&self) -> Result<()> {
        self.remove_dir(Command::CleanEnv, &self.layout.env_dir())
    }

    fn package(&self) -> Result<()> {
        let dist_dir = self.layout.dist_dir();
        if dist_dir.exists() {
            debug!("-- [{}] skip: {} exists", Command::Package, dist_dir.display());
            return Ok(());
        }

        let env_dir = self.layout.env_dir();
        require_dir(&env_dir, "build environment is not initialized, run 'env' first")?;

        info!("-- [{}] ...", Command::Package);
        let python = interpreter::locate(&env_dir)?;
        let invocation = Invocation::new(python, self.layout.root())
            .args(["-m", "pip", "wheel", "--no-deps", "-w"])
            .arg(dist_dir.to_string_lossy())
            .args(self.tool.index.trusted_host_args())
            .arg(".");
        self.execute(Command::Package, &invocation)?;
        info!("-- [{}] ... done", Command::Package);
        Ok(())
    }

    fn clean_package(&self) -> Result<()> {
        self.remove_dir(Command::CleanPackage, &self.layout.dist_dir())
    }

    fn test_env(&self) -> Result<()> {
        self.ensure_environment(
            Command::TestEnv,
            &self.layout.test_env_dir(),
            ExternalManifest::test_requirements,
        )
    }

    fn update_test_env(&self) -> Result<()> {
        let env_dir = self.layout.test_env_dir();
        require_dir(&env_dir, "test environment is not initialized")?;

        let dist_dir = self.layout.dist_dir();
        let artifacts = dist::find_artifacts(&dist_dir)?;
        if artifacts.is_empty() {
            return Err(FlowError::Precondition {
                path: dist_dir,
                reason: "no distribution artifacts found, run 'package' first".to_string(),
            });
        }

        info!("-- [{}] ...", Command::UpdateTestEnv);
        let python = interpreter::locate(&env_dir)?;
        let invocation = Invocation::new(python, self.layout.root())
            .args(["-m", "pip", "install", "--no-deps"])
            .args(self.tool.index.trusted_host_args())
            .args(artifacts.iter().map(|p| p.to_string_lossy().into_owned()));
        self.execute(Command::UpdateTestEnv, &invocation)?;
        info!("-- [{}] ... done", Command::UpdateTestEnv);
        Ok(())
    }

    fn clean_test_env(&self) -> Result<()> {
        self.remove_dir(Command::CleanTestEnv, &self.layout.test_env_dir())
    }

    fn test(&self) -> Result<()> {
        let env_dir = self.layout.test_env_dir();
        require_dir(&env_dir, "test environment is not initialized")?;

        info!("-- [{}] ...", Command::Test);
        let python = interpreter::locate(&env_dir)?;
        let invocation =
            Invocation::new(python, self.layout.root()).args(["-m", self.tool.test.runner.as_str()]);
        self.execute(Command::Test, &invocation)?;
        info!("-- [{}] ... done", Command::Test);
        Ok(())
    }

    fn clean_test(&self) -> Result<()> {
        self.remove_dir(Command::CleanTest, &self.layout.test_out_dir())
    }

    fn clean(&self) -> Result<()> {
        info!("-- [{}] ...", Command::Clean);
        for step in CLEAN_SEQUENCE {
            self.dispatch(step)?;
        }
        info!("-- [{}] ... done", Command::Clean);
        Ok(())
    }

    fn vscode(&self) -> Result<()> {
        self.env()?;
        self.test_env()?;

        info!("-- [{}] ...", Command::Vscode);
        let template_path = self.layout.resolve(&self.tool.launch.template);
        let template = if template_path.is_file() {
            fs::read_to_string(&template_path).map_err(|e| FlowError::io(&template_path, e))?
        } else {
            debug!(
                "no launch template at {}, using builtin",
                template_path.display()
            );
            venvflow_launch::BUILTIN_TEMPLATE.to_string()
        };
        venvflow_launch::check_template(&template)?;

        let python = interpreter::locate(&self.layout.test_env_dir())?;
        let collect = Invocation::new(&python, self.layout.root())
            .args(["-m", self.tool.test.runner.as_str(), "-q", "--co"]);
        info!("-- [{}] execute: {}", Command::Vscode, collect);
        let stdout = self.runner.capture(&collect, self.run.timeout())?;

        let collected = venvflow_launch::parse_collected_tests(&stdout);
        if collected.is_empty() {
            return Err(FlowError::Discovery(format!(
                "no tests found by '{}'",
                self.tool.test.runner
            )));
        }
        debug!("collected {} tests", collected.len());

        let mut entries = self.tool.test.default_entries.clone();
        entries.extend(collected);
        let rendered = venvflow_launch::render_launch_config(
            &template,
            &self.layout.relative_posix(&python),
            &entries,
        )?;

        let output = self.layout.resolve(&self.tool.launch.output);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| FlowError::io(parent, e))?;
        }
        fs::write(&output, rendered).map_err(|e| FlowError::io(&output, e))?;
        info!("-- [{}] wrote {}", Command::Vscode, output.display());
        info!("-- [{}] ... done", Command::Vscode);
        Ok(())
    }

    /// Creates `env_dir` and installs `requirements` into it unless a
    /// previous run completed it.
    #[instrument(skip(self, requirements))]
    fn ensure_environment(
        &self,
        command: Command,
        env_dir: &Path,
        requirements: fn(&ExternalManifest) -> Vec<String>,
    ) -> Result<()> {
        if is_complete(env_dir) {
            debug!("-- [{}] skip: {} exists", command, env_dir.display());
            return Ok(());
        }
        if env_dir.exists() {
            warn!(
                "-- [{}] {} is incomplete, recreating",
                command,
                env_dir.display()
            );
            fs::remove_dir_all(env_dir).map_err(|e| FlowError::io(env_dir, e))?;
        }

        info!("-- [{}] ...", command);
        let base = self.tool.python.resolve(self.layout.root())?;
        let create = Invocation::new(base, self.layout.root())
            .args(["-m", "venv"])
            .arg(env_dir.to_string_lossy());
        self.execute(command, &create)?;

        let manifest = ExternalManifest::load_from_file(&self.layout.manifest_file())?;
        let requirements = requirements(&manifest);
        if requirements.is_empty() {
            debug!("-- [{}] no dependencies declared", command);
        } else {
            let requirements_file = env_dir.join(REQUIREMENTS_FILE);
            fs::write(&requirements_file, requirements.join("\n"))
                .map_err(|e| FlowError::io(&requirements_file, e))?;

            let python = interpreter::locate(env_dir)?;
            let install = Invocation::new(python, self.layout.root())
                .args(["-m", "pip", "install"])
                .args(self.tool.index.trusted_host_args())
                .arg("-r")
                .arg(requirements_file.to_string_lossy());
            self.execute(command, &install)?;
        }

        mark_complete(env_dir)?;
        info!("-- [{}] ... done", command);
        Ok(())
    }

    fn remove_dir(&self, command: Command, dir: &Path) -> Result<()> {
        if !dir.exists() {
            debug!("-- [{}] skip: {} absent", command, dir.display());
            return Ok(());
        }

        info!("-- [{}] ...", command);
        fs::remove_dir_all(dir).map_err(|e| FlowError::io(dir, e))?;
        info!("-- [{}] ... done", command);
        Ok(())
    }

    fn execute(&self, command: Command, invocation: &Invocation) -> Result<()> {
        info!("-- [{}] execute: {}", command, invocation);
        self.runner.run(invocation, self.run.timeout())
    }
}

fn require_dir(dir: &Path, reason: &str) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    Err(FlowError::Precondition {
        path: dir.to_path_buf(),
        reason: reason.to_string(),
    })
}

fn is_complete(env_dir: &Path) -> bool {
    env_dir.join(COMPLETION_MARKER).is_file()
}

fn mark_complete(env_dir: &Path) -> Result<()> {
    let marker = env_dir.join(COMPLETION_MARKER);
    fs::write(&marker, b"").map_err(|e| FlowError::io(&marker, e))
}
