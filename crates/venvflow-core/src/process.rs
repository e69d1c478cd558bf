//! External process execution with an optional timeout.

use std::fmt::{Display, Formatter};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{FlowError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A single external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The executable program (an interpreter path in practice).
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory of the child.
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Display for Invocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs external programs on behalf of the dispatcher.
pub trait ProcessRunner: std::fmt::Debug {
    /// Runs with inherited stdio and fails on a non-zero exit.
    fn run(&self, invocation: &Invocation, timeout: Option<Duration>) -> Result<()>;

    /// Runs with stdout captured and returns it; fails on a non-zero exit.
    fn capture(&self, invocation: &Invocation, timeout: Option<Duration>) -> Result<String>;
}

/// Spawns real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn spawn(invocation: &Invocation, stdout: Stdio) -> Result<Child> {
        Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| FlowError::Spawn {
                command: invocation.to_string(),
                source,
            })
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, timeout: Option<Duration>) -> Result<()> {
        let mut child = Self::spawn(invocation, Stdio::inherit())?;
        let status = wait(&mut child, invocation, timeout)?;
        check_status(invocation, status)
    }

    fn capture(&self, invocation: &Invocation, timeout: Option<Duration>) -> Result<String> {
        let mut child = Self::spawn(invocation, Stdio::piped())?;

        // Drained on a separate thread so a chatty child cannot block on a full pipe
        // while we poll for the deadline.
        let reader = child.stdout.take().map(|mut stdout| {
            thread::spawn(move || {
                let mut out = String::new();
                stdout.read_to_string(&mut out).map(|_| out)
            })
        });

        let status = wait(&mut child, invocation, timeout)?;

        let stdout = match reader {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| {
                    Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "stdout reader thread panicked",
                    ))
                })
                .map_err(|e| FlowError::io(&invocation.program, e))?,
            None => String::new(),
        };

        check_status(invocation, status)?;
        Ok(stdout)
    }
}

fn wait(child: &mut Child, invocation: &Invocation, timeout: Option<Duration>) -> Result<ExitStatus> {
    let Some(limit) = timeout else {
        return child
            .wait()
            .map_err(|e| FlowError::io(&invocation.program, e));
    };

    // A limit past the end of the clock is no limit at all.
    let Some(deadline) = Instant::now().checked_add(limit) else {
        return child
            .wait()
            .map_err(|e| FlowError::io(&invocation.program, e));
    };
    loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|e| FlowError::io(&invocation.program, e))?
        {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            debug!("killing {} after {}s", invocation, limit.as_secs());
            let _ = child.kill();
            let _ = child.wait();
            return Err(FlowError::ProcessTimeout {
                command: invocation.to_string(),
                timeout: limit,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn check_status(invocation: &Invocation, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(FlowError::ExternalProcess {
        command: invocation.to_string(),
        code: status.code(),
    })
}
