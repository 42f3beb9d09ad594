//! Stack deployment domain.
//!
//! This crate contains the identifiers, value types, and error types shared by
//! every crate in the workspace, plus the [`Stack`] port trait. Engine adapters
//! implement the trait defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Domain types + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a stack must be able to do; adapter crates define *how*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`StackName`, `RepositoryName`, `DeploymentRunId`, etc.) |
//! | [`types`] | Config/output maps, `UpResult`, `AccessToken`, `Timestamp` |
//! | [`errors`] | `StackError`, `DeployStep`, `DeployError` |
//! | [`ports`] | The `Stack` capability trait |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{DeployError, DeployStep, StackError};
pub use identifiers::{
    ConfigKey, DeploymentRunId, EnvironmentName, OrganizationName, ProjectName, RepositoryName,
    StackName,
};
pub use ports::Stack;
pub use types::{
    AccessToken, ConfigMap, ConfigValue, OutputMap, OutputValue, Timestamp, UpResult,
    ACCESS_TOKEN_ENV_VAR,
};
