use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::{debug, error};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use venvflow_core::constants::CONFIG_FILE;
use venvflow_core::{Command, ProjectLayout, RunConfiguration, SystemRunner, ToolConfig};

mod dispatcher;
mod styles;

use dispatcher::Dispatcher;
use styles as s;

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    fn filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warning => LevelFilter::WARN,
            Self::Error | Self::Fatal => LevelFilter::ERROR,
        }
    }
}

/// The command-line interface for venvflow.
#[derive(Debug, Parser)]
#[command(name = "venvflow")]
#[command(version)]
#[command(styles = s::help_styles())]
#[command(about = "Build, package and test a Python project in isolated environments")]
#[command(after_help = commands_help())]
struct Cli {
    /// Log level.
    #[arg(short = 'l', long, value_enum, ignore_case = true, default_value_t = LogLevel::Debug)]
    log_level: LogLevel,
    /// Subprocess timeout in seconds (0 means no timeout).
    #[arg(short = 't', long, default_value_t = 0)]
    subprocess_timeout: u64,
    /// Project root holding pyproject.toml.
    #[arg(short = 'C', long, default_value = ".")]
    project_dir: PathBuf,
    /// Path to the venvflow config file, relative to the project root.
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,
    /// Commands to run in order (default: help).
    #[arg(value_parser = PossibleValuesParser::new(Command::names()))]
    commands: Vec<String>,
}

const COMMAND_COLUMN: usize = 17;

fn commands_help() -> String {
    let mut text = String::from("Commands:\n");
    for cmd in Command::ALL {
        let name = cmd.as_str();
        let pad = COMMAND_COLUMN.saturating_sub(name.len());
        text.push_str(&format!("  {}{:pad$} {}\n", s::command(name), "", cmd.summary()));
    }
    text.push_str("\nExample:\n  venvflow env test_env package update_test_env test");
    text
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);
    debug!("parsed cli arguments: {:?}", cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(EnvFilter::from_default_env().add_directive(level.filter().into()))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let root = cli
        .project_dir
        .canonicalize()
        .with_context(|| format!("unable to resolve project dir '{}'", cli.project_dir.display()))?;
    let layout = ProjectLayout::new(root);

    let config_path = layout.resolve(&cli.config);
    let tool = ToolConfig::load_or_default(&config_path)
        .with_context(|| format!("unable to load config '{}'", config_path.display()))?;

    let run = RunConfiguration::new(cli.commands, cli.subprocess_timeout);
    let help = Cli::command().render_help().to_string();

    let runner = SystemRunner;
    Dispatcher::new(layout, tool, run, &runner, help).run()?;
    Ok(())
}
