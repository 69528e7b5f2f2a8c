//! CLI command implementations
//!
//! This module contains the argument parser and the commands supported by
//! the CLI application, implemented with the Command pattern.

pub mod cli;
pub mod command_traits;
pub mod convert_command;

pub use cli::build_cli;
pub use command_traits::Command;
pub use convert_command::ConvertCommand;
