//! Error types for stack operations and deployment runs.
//!
//! [`StackError`] is produced by [`crate::Stack`] implementations and describes
//! why a single engine call failed. [`DeployError`] is produced by the
//! orchestrator and records *which* lifecycle step failed, wrapping the
//! underlying [`StackError`].
//!
//! There is no retry classification: the orchestrator never retries, and the
//! caller decides whether to re-invoke a failed deployment.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Stack-level errors
// ---------------------------------------------------------------------------

/// Errors returned by a single operation on a [`crate::Stack`].
#[derive(Debug, Error)]
pub enum StackError {
    /// The engine process could not be started at all.
    #[error("could not start `{command}`: {source}")]
    Spawn {
        /// The command line that was attempted (without secret values).
        command: String,
        /// The I/O error reported by the operating system.
        #[source]
        source: std::io::Error,
    },

    /// The engine process ran but exited unsuccessfully.
    #[error("`{command}` exited with {}: {stderr}", exit_label(.code))]
    CommandFailed {
        /// The command line that was run (without secret values).
        command: String,
        /// Exit code, or `None` if the process was terminated by a signal.
        code: Option<i32>,
        /// Trimmed standard error output of the process.
        stderr: String,
    },

    /// The engine produced output that could not be interpreted.
    #[error("unexpected output from `{command}`: {message}")]
    InvalidOutput {
        /// The command whose output was rejected.
        command: String,
        /// Description of the parse problem.
        message: String,
    },

    /// A free-form failure reported by the stack implementation.
    #[error("{0}")]
    Operation(String),
}

impl StackError {
    /// Convenience constructor for [`StackError::Operation`].
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation(message.into())
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Deployment errors
// ---------------------------------------------------------------------------

/// The lifecycle step of a deployment run.
///
/// Steps always execute in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeployStep {
    /// Setting the backend access token on the stack.
    SetEnvVars,
    /// Applying the configuration map.
    SetConfig,
    /// Reconciling the engine's state with real-world resources.
    Refresh,
    /// Computing the pending change.
    Preview,
    /// Applying the change.
    Update,
}

impl DeployStep {
    /// All steps, in execution order.
    pub const ALL: [DeployStep; 5] = [
        DeployStep::SetEnvVars,
        DeployStep::SetConfig,
        DeployStep::Refresh,
        DeployStep::Preview,
        DeployStep::Update,
    ];

    /// Human-readable phrase used in error messages (`"failed to <phrase>"`).
    pub fn as_str(self) -> &'static str {
        match self {
            DeployStep::SetEnvVars => "set environment variables",
            DeployStep::SetConfig => "set config",
            DeployStep::Refresh => "refresh stack",
            DeployStep::Preview => "preview stack",
            DeployStep::Update => "update stack",
        }
    }
}

impl std::fmt::Display for DeployStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by a deployment run.
///
/// Every failure is an upstream operation failure; variants are distinguished
/// only by the step that produced them.
#[derive(Debug, Error)]
pub enum DeployError {
    /// A stack operation failed; no later step was attempted.
    #[error("failed to {step}: {cause}")]
    UpstreamOperationFailed {
        /// The step whose stack operation failed.
        step: DeployStep,
        /// The error returned by the stack.
        #[source]
        cause: StackError,
    },
}

impl DeployError {
    /// Returns the step that failed.
    pub fn step(&self) -> DeployStep {
        match self {
            DeployError::UpstreamOperationFailed { step, .. } => *step,
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
