//! Deployment orchestration.
//!
//! This crate drives a [`stack::Stack`] through one deployment run:
//!
//! 1. set the backend access token,
//! 2. apply configuration,
//! 3. refresh,
//! 4. preview,
//! 5. update (`up`),
//!
//! and returns the stack outputs from the update.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** [`deploy`] sequences calls on the stack port. It
//! contains no engine details of its own and never retries.
//!
//! ## Preview and update
//!
//! Nothing guards the gap between steps 4 and 5. If real-world state changes
//! after the preview was computed, `up` applies a plan that differs from the
//! one that was previewed. This follows the engine's own semantics.

use std::collections::BTreeMap;

use stack::{
    AccessToken, ConfigMap, DeployError, DeployStep, DeploymentRunId, OutputMap, Stack,
    StackError, ACCESS_TOKEN_ENV_VAR,
};
use tracing::{debug, info, instrument, warn};

/// Runs one deployment against `stack` with a freshly generated run id.
///
/// See [`deploy_run`].
pub async fn deploy<S>(
    stack: &mut S,
    access_token: &AccessToken,
    config: &ConfigMap,
) -> Result<OutputMap, DeployError>
where
    S: Stack + ?Sized,
{
    deploy_run(DeploymentRunId::new_random(), stack, access_token, config).await
}

/// Runs one deployment against `stack`, tagging all log output with `run_id`.
///
/// Steps run strictly in order and the first failure stops the run; later
/// steps are never attempted. On success the outputs of the update are
/// returned unchanged.
///
/// # Errors
///
/// Returns [`DeployError::UpstreamOperationFailed`] naming the failed step and
/// wrapping the stack's error.
#[instrument(name = "deploy", skip_all, fields(run_id = %run_id, config_entries = config.len()))]
pub async fn deploy_run<S>(
    run_id: DeploymentRunId,
    stack: &mut S,
    access_token: &AccessToken,
    config: &ConfigMap,
) -> Result<OutputMap, DeployError>
where
    S: Stack + ?Sized,
{
    info!(step = %DeployStep::SetEnvVars, "deployment step started");
    let env = BTreeMap::from([(
        ACCESS_TOKEN_ENV_VAR.to_string(),
        access_token.expose().to_string(),
    )]);
    stack
        .set_env_vars(env)
        .map_err(failed(DeployStep::SetEnvVars))?;

    info!(step = %DeployStep::SetConfig, "deployment step started");
    stack
        .set_all_config(config)
        .await
        .map_err(failed(DeployStep::SetConfig))?;

    info!(step = %DeployStep::Refresh, "deployment step started");
    let refresh_log = stack
        .refresh()
        .await
        .map_err(failed(DeployStep::Refresh))?;
    debug!(output = %refresh_log, "refresh finished");

    info!(step = %DeployStep::Preview, "deployment step started");
    let preview_log = stack
        .preview()
        .await
        .map_err(failed(DeployStep::Preview))?;
    debug!(output = %preview_log, "preview finished");

    info!(step = %DeployStep::Update, "deployment step started");
    let result = stack.up().await.map_err(failed(DeployStep::Update))?;
    debug!(output = %result.stdout, "update finished");

    info!(outputs = result.outputs.len(), "deployment succeeded");
    Ok(result.outputs)
}

fn failed(step: DeployStep) -> impl FnOnce(StackError) -> DeployError {
    move |cause| {
        warn!(step = %step, error = %cause, "deployment step failed");
        DeployError::UpstreamOperationFailed { step, cause }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
