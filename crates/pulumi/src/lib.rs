//! Pulumi engine adapter.
//!
//! Implements the [`stack::Stack`] trait by driving the `pulumi` CLI against a
//! program directory (normally a `Pulumi.yaml` rendered by the `github` crate).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Process spawning, command-line construction, and
//! output parsing all live here. The orchestrator sees only [`stack::Stack`].
//!
//! ## Credentials
//!
//! The backend access token is passed to [`PulumiStack::select`] and carried
//! in the handle's own environment map, which is applied to every child
//! process. The current process environment is never modified.

mod command;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use stack::{
    AccessToken, ConfigMap, OutputMap, Stack, StackError, StackName, UpResult,
    ACCESS_TOKEN_ENV_VAR,
};
use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::command::{config_set_all_args, describe, parse_outputs, stack_args};

/// Where the `pulumi` binary and the program live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulumiSettings {
    /// Path or name of the `pulumi` executable.
    pub binary: PathBuf,
    /// Directory containing `Pulumi.yaml`.
    pub work_dir: PathBuf,
}

impl Default for PulumiSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("pulumi"),
            work_dir: PathBuf::from("."),
        }
    }
}

/// A selected Pulumi stack, driven through the `pulumi` CLI.
#[derive(Debug)]
pub struct PulumiStack {
    name: StackName,
    settings: PulumiSettings,
    env: BTreeMap<String, String>,
}

impl PulumiStack {
    /// Selects the stack `name` in `settings.work_dir`, creating it if it does
    /// not exist yet.
    ///
    /// # Errors
    ///
    /// Returns the [`StackError`] of the failed `pulumi stack select` call.
    #[instrument(skip_all, fields(stack = %name))]
    pub async fn select(
        settings: PulumiSettings,
        name: StackName,
        access_token: &AccessToken,
    ) -> Result<Self, StackError> {
        let stack = Self {
            env: BTreeMap::from([(
                ACCESS_TOKEN_ENV_VAR.to_string(),
                access_token.expose().to_string(),
            )]),
            name,
            settings,
        };
        let args = stack_args(&["stack", "select", "--create"], &stack.name);
        stack.run(&args).await?;
        info!("stack selected");
        Ok(stack)
    }

    /// The stack's fully-qualified name.
    pub fn name(&self) -> &StackName {
        &self.name
    }

    /// The program directory.
    pub fn work_dir(&self) -> &Path {
        &self.settings.work_dir
    }

    /// Removes the stack and its configuration from the backend.
    ///
    /// The stack must be empty; call [`Stack::destroy`] first.
    pub async fn remove(self) -> Result<(), StackError> {
        let args = stack_args(&["stack", "rm", "--yes"], &self.name);
        self.run(&args).await?;
        info!(stack = %self.name, "stack removed");
        Ok(())
    }

    async fn run(&self, args: &[String]) -> Result<String, StackError> {
        let command = describe(&self.settings.binary.to_string_lossy(), args);
        debug!(command = %command, "running pulumi");

        let output = Command::new(&self.settings.binary)
            .args(args)
            .current_dir(&self.settings.work_dir)
            .envs(&self.env)
            .env("PULUMI_SKIP_UPDATE_CHECK", "true")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| StackError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(StackError::CommandFailed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn outputs(&self) -> Result<OutputMap, StackError> {
        let masked = self
            .run(&stack_args(&["stack", "output", "--json"], &self.name))
            .await?;
        let revealed = self
            .run(&stack_args(
                &["stack", "output", "--json", "--show-secrets"],
                &self.name,
            ))
            .await?;
        parse_outputs(&masked, &revealed).map_err(|message| StackError::InvalidOutput {
            command: "pulumi stack output".to_string(),
            message,
        })
    }
}

#[async_trait]
impl Stack for PulumiStack {
    fn set_env_vars(&mut self, vars: BTreeMap<String, String>) -> Result<(), StackError> {
        self.env.extend(vars);
        Ok(())
    }

    async fn set_all_config(&self, config: &ConfigMap) -> Result<(), StackError> {
        if config.is_empty() {
            return Ok(());
        }
        self.run(&config_set_all_args(&self.name, config)).await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<String, StackError> {
        self.run(&stack_args(&["refresh", "--yes", "--skip-preview"], &self.name))
            .await
    }

    async fn preview(&self) -> Result<String, StackError> {
        self.run(&stack_args(&["preview"], &self.name)).await
    }

    async fn up(&self) -> Result<UpResult, StackError> {
        let stdout = self
            .run(&stack_args(&["up", "--yes", "--skip-preview"], &self.name))
            .await?;
        let outputs = self.outputs().await?;
        Ok(UpResult { stdout, outputs })
    }

    async fn destroy(&self) -> Result<(), StackError> {
        self.run(&stack_args(&["destroy", "--yes", "--skip-preview"], &self.name))
            .await?;
        info!(stack = %self.name, "stack destroyed");
        Ok(())
    }
}
