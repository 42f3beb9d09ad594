//! Port trait for a deployable stack.
//!
//! The orchestrator depends on this narrow capability set, never on a concrete
//! engine type. Engine adapters (see the `pulumi` crate) and test doubles both
//! implement [`Stack`].

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{ConfigMap, StackError, UpResult};

/// One instance of a named deployable unit tracked by an infrastructure engine.
///
/// The handle must already exist (be created or selected) before it is handed
/// to the orchestrator. A deployment run borrows the handle exclusively; the
/// trait makes no promises about concurrent runs against the same stack name.
///
/// Every operation may block for an arbitrary, externally bounded duration.
/// Implementations impose no timeouts of their own.
#[async_trait]
pub trait Stack: Send + Sync {
    /// Sets environment variables for subsequent engine operations on this stack.
    ///
    /// Implementations store the variables on the handle. The process
    /// environment is never modified.
    fn set_env_vars(&mut self, vars: BTreeMap<String, String>) -> Result<(), StackError>;

    /// Applies every entry of `config` to the stack.
    async fn set_all_config(&self, config: &ConfigMap) -> Result<(), StackError>;

    /// Reconciles the engine's view of existing resources with reality.
    ///
    /// Returns the engine's textual output.
    async fn refresh(&self) -> Result<String, StackError>;

    /// Computes a dry-run diff of the pending change.
    ///
    /// Returns the engine's textual output.
    async fn preview(&self) -> Result<String, StackError>;

    /// Applies the pending change and returns the resulting outputs.
    async fn up(&self) -> Result<UpResult, StackError>;

    /// Deletes every resource managed by the stack.
    async fn destroy(&self) -> Result<(), StackError>;
}
