//! The project's own GitHub repository, declared as a fixed resource graph.

use crate::graph::{ResourceGraph, ResourceOptions};
use crate::resources::{
    ActionsSecret, ActionsSecretArgs, BranchProtection, BranchProtectionArgs, IssueLabel,
    IssueLabelArgs, Repository, RepositoryArgs, Visibility,
};
use crate::GraphError;

/// Name of the repository managed by [`define_infrastructure`].
pub const REPOSITORY_NAME: &str = "pulumi-go-components";

const REPOSITORY_DESCRIPTION: &str = "This is a repository for pulumi go components.";

const REPOSITORY_TOPICS: [&str; 7] = [
    "dagger", "github", "gitlab", "go", "golang", "pulumi", "vscode",
];

/// Handles to every resource declared by [`define_infrastructure`].
#[derive(Debug, Clone, Copy)]
pub struct GithubResources {
    pub repository: Repository,
    pub branch_protection: BranchProtection,
    pub gh_actions_label: IssueLabel,
    pub go_modules_label: IssueLabel,
    pub gitlab_repo_secret: ActionsSecret,
    pub gitlab_token_secret: ActionsSecret,
    pub gitlab_owner_secret: ActionsSecret,
}

impl GithubResources {
    /// Exports `repository` (the name) and `repositoryUrl` as stack outputs.
    pub fn export(&self, graph: &mut ResourceGraph) -> Result<(), GraphError> {
        graph.export("repository", self.repository.name_output())?;
        graph.export("repositoryUrl", self.repository.html_url())?;
        Ok(())
    }
}

/// Declares the repository, its `main` branch protection, two dependency
/// labels, and three GitLab mirroring secrets.
///
/// Labels and secrets reference the repository's name output; branch
/// protection references its node id. Nothing is protected from deletion.
pub fn define_infrastructure(graph: &mut ResourceGraph) -> Result<GithubResources, GraphError> {
    let unprotected = || ResourceOptions::default().with_protect(false);

    let repository = graph.register(
        "newRepositoryPulumiGoComponents",
        &RepositoryArgs {
            name: REPOSITORY_NAME.to_string(),
            description: REPOSITORY_DESCRIPTION.to_string(),
            topics: REPOSITORY_TOPICS.iter().map(|t| t.to_string()).collect(),
            delete_branch_on_merge: true,
            has_issues: true,
            has_projects: true,
            visibility: Visibility::Public,
        },
        unprotected(),
    )?;

    let branch_protection = graph.register(
        "branchProtection",
        &BranchProtectionArgs {
            repository_id: repository.node_id(),
            pattern: "main".to_string(),
            required_linear_history: true,
        },
        unprotected(),
    )?;

    let gh_actions_label = graph.register(
        "newIssueLabelGhActions",
        &IssueLabelArgs {
            repository: repository.name_output(),
            name: "github-actions dependencies".to_string(),
            color: "E66E01".to_string(),
            description: "This issue is related to github-actions dependencies".to_string(),
        },
        unprotected(),
    )?;

    let go_modules_label = graph.register(
        "newIssueLabelGoModules",
        &IssueLabelArgs {
            repository: repository.name_output(),
            name: "go-modules dependencies".to_string(),
            color: "9BE688".to_string(),
            description: "This issue is related to go modules dependencies".to_string(),
        },
        unprotected(),
    )?;

    let secret = |graph: &mut ResourceGraph, name: &str, secret_name: &str| {
        graph.register(
            name,
            &ActionsSecretArgs {
                repository: repository.name_output(),
                secret_name: secret_name.to_string(),
            },
            ResourceOptions::parent(repository.id()).with_protect(false),
        )
    };
    let gitlab_repo_secret = secret(graph, "newActionsSecretGLR", "GITLAB_REPOSITORY")?;
    let gitlab_token_secret = secret(graph, "newActionsSecretGLT", "GITLAB_TOKEN")?;
    let gitlab_owner_secret = secret(graph, "newActionsSecretGLO", "GITLAB_OWNER")?;

    Ok(GithubResources {
        repository,
        branch_protection,
        gh_actions_label,
        go_modules_label,
        gitlab_repo_secret,
        gitlab_token_secret,
        gitlab_owner_secret,
    })
}

#[cfg(test)]
#[path = "infrastructure_tests.rs"]
mod tests;
