//! Command pattern interface
//!
//! Every CLI operation is a command object built from parsed arguments and
//! executed once.

use crate::errors::FloodResult;

/// Represents an executable command in the application
///
/// Command objects encapsulate the logic for a specific CLI operation,
/// which keeps argument parsing apart from the pipeline and lets tests
/// drive a command without going through `main`.
pub trait Command {
    /// Execute the command
    fn execute(&self) -> FloodResult<()>;
}
