//! Core types for venvflow.
//!
//! This crate defines the command set, project layout, tool configuration,
//! manifest reading, interpreter lookup and process execution shared by the
//! venvflow workspace.

pub mod command;
pub mod config;
pub mod constants;
pub mod dist;
pub mod error;
pub mod interpreter;
pub mod manifest;
pub mod process;
pub mod project;

pub use command::{Command, CommandParseError};
pub use config::{RunConfiguration, ToolConfig};
pub use error::{ConfigurationError, FlowError, Result};
pub use manifest::ExternalManifest;
pub use process::{Invocation, ProcessRunner, SystemRunner};
pub use project::ProjectLayout;
