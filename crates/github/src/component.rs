//! `StandardRepo`: a reusable component declaring a GitHub repository with the
//! house policy applied.
//!
//! Callers choose the name, description, and topics. Everything else is fixed:
//! public visibility, issues and projects enabled, branches deleted on merge,
//! linear history required on `main`, a `github-actions dependencies` label,
//! and the three GitLab mirroring secrets.

use std::collections::BTreeMap;

use stack::RepositoryName;
use tracing::debug;

use crate::graph::{ComponentOutput, OutputRef, ResourceGraph, ResourceId, ResourceOptions};
use crate::resources::{
    ActionsSecretArgs, BranchProtectionArgs, IssueLabelArgs, Repository, RepositoryArgs,
    Visibility,
};
use crate::GraphError;

/// Type token under which the component is registered.
pub const STANDARD_REPO_TYPE: &str = "custom:resource:StandardRepo";

/// Caller-supplied inputs of a [`StandardRepo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardRepoArgs {
    pub repository_name: RepositoryName,
    pub description: String,
    pub topics: Vec<String>,
}

/// A registered `StandardRepo` component and its outputs.
#[derive(Debug, Clone)]
pub struct StandardRepo {
    /// The component resource the children are parented to.
    pub component: ResourceId,
    pub repository_name: OutputRef,
    pub repository_url: OutputRef,
    pub repository_node_id: OutputRef,
    /// The underlying repository, exposed for composition.
    pub repository: Repository,
}

impl StandardRepo {
    /// Registers the component and its children in `graph`.
    ///
    /// # Errors
    ///
    /// Propagates the first registration failure. The graph should be
    /// discarded in that case.
    pub fn new(
        graph: &mut ResourceGraph,
        name: &str,
        args: &StandardRepoArgs,
        options: ResourceOptions,
    ) -> Result<Self, GraphError> {
        let component = graph.register_component(STANDARD_REPO_TYPE, name, options)?;
        let child = || ResourceOptions::parent(component);

        let repository = graph.register(
            "repository",
            &RepositoryArgs {
                name: args.repository_name.as_str().to_string(),
                description: args.description.clone(),
                topics: args.topics.clone(),
                delete_branch_on_merge: true,
                has_issues: true,
                has_projects: true,
                visibility: Visibility::Public,
            },
            child(),
        )?;

        graph.register(
            "branch-protection",
            &BranchProtectionArgs {
                repository_id: repository.node_id(),
                pattern: "main".to_string(),
                required_linear_history: true,
            },
            child(),
        )?;

        graph.register(
            "label-gh-actions",
            &IssueLabelArgs {
                repository: repository.name_output(),
                name: "github-actions dependencies".to_string(),
                color: "E66E01".to_string(),
                description: "This issue is related to github-actions dependencies".to_string(),
            },
            child(),
        )?;

        for (resource_name, secret_name) in [
            ("secret-gitlab-repo", "GITLAB_REPOSITORY"),
            ("secret-gitlab-token", "GITLAB_TOKEN"),
            ("secret-gitlab-owner", "GITLAB_OWNER"),
        ] {
            graph.register(
                resource_name,
                &ActionsSecretArgs {
                    repository: repository.name_output(),
                    secret_name: secret_name.to_string(),
                },
                child(),
            )?;
        }

        let standard_repo = Self {
            component,
            repository_name: repository.name_output(),
            repository_url: repository.html_url(),
            repository_node_id: repository.node_id(),
            repository,
        };

        graph.register_component_outputs(
            component,
            BTreeMap::from([
                (
                    "repositoryName".to_string(),
                    ComponentOutput::Value(standard_repo.repository_name.clone()),
                ),
                (
                    "repositoryUrl".to_string(),
                    ComponentOutput::Value(standard_repo.repository_url.clone()),
                ),
                (
                    "repositoryNodeId".to_string(),
                    ComponentOutput::Value(standard_repo.repository_node_id.clone()),
                ),
                (
                    "repository".to_string(),
                    ComponentOutput::Resource(repository.id()),
                ),
            ]),
        )?;

        debug!(component = name, repository = %args.repository_name, "StandardRepo declared");
        Ok(standard_repo)
    }

    /// Exports `repositoryName`, `repositoryUrl`, and `repositoryNodeId` as
    /// stack outputs.
    pub fn export(&self, graph: &mut ResourceGraph) -> Result<(), GraphError> {
        graph.export("repositoryName", self.repository_name.clone())?;
        graph.export("repositoryUrl", self.repository_url.clone())?;
        graph.export("repositoryNodeId", self.repository_node_id.clone())?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
