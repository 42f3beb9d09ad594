//! Argument structs for the GitHub provider resource types used here.
//!
//! Property names and type tokens follow the GitHub provider schema so the
//! rendered program can be handed to the engine unchanged.

use serde::{Deserialize, Serialize};

use crate::graph::{Input, OutputRef, Properties, Resource, ResourceArgs};

/// Repository visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone.
    Public,
    /// Visible to collaborators only.
    Private,
    /// Visible to members of the owning enterprise.
    Internal,
}

impl Visibility {
    /// The provider's spelling of the visibility.
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Internal => "internal",
        }
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// Arguments of `github:index/repository:Repository`.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryArgs {
    /// Repository name under the provider's owner.
    pub name: String,
    /// One-line description shown on the repository page.
    pub description: String,
    /// Repository topics, in declaration order.
    pub topics: Vec<String>,
    /// Delete head branches once their pull request merges.
    pub delete_branch_on_merge: bool,
    /// Enable the issue tracker.
    pub has_issues: bool,
    /// Enable classic projects.
    pub has_projects: bool,
    /// Who can see the repository.
    pub visibility: Visibility,
}

impl ResourceArgs for RepositoryArgs {
    const TYPE_TOKEN: &'static str = "github:index/repository:Repository";

    fn properties(&self) -> Properties {
        Properties::from([
            ("name".to_string(), Input::value(self.name.clone())),
            (
                "description".to_string(),
                Input::value(self.description.clone()),
            ),
            ("topics".to_string(), Input::value(self.topics.clone())),
            (
                "deleteBranchOnMerge".to_string(),
                Input::value(self.delete_branch_on_merge),
            ),
            ("hasIssues".to_string(), Input::value(self.has_issues)),
            ("hasProjects".to_string(), Input::value(self.has_projects)),
            (
                "visibility".to_string(),
                Input::value(self.visibility.as_str()),
            ),
        ])
    }
}

/// A registered repository.
pub type Repository = Resource<RepositoryArgs>;

impl Resource<RepositoryArgs> {
    /// The repository name as reported by GitHub.
    pub fn name_output(&self) -> OutputRef {
        self.output("name")
    }

    /// The repository's web URL (`https://github.com/<owner>/<name>`).
    pub fn html_url(&self) -> OutputRef {
        self.output("htmlUrl")
    }

    /// The GraphQL node id of the repository.
    pub fn node_id(&self) -> OutputRef {
        self.output("nodeId")
    }
}

// ---------------------------------------------------------------------------
// Branch protection
// ---------------------------------------------------------------------------

/// Arguments of `github:index/branchProtection:BranchProtection`.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchProtectionArgs {
    /// Node id of the protected repository.
    pub repository_id: OutputRef,
    /// Branch name pattern.
    pub pattern: String,
    /// Reject merge commits on matching branches.
    pub required_linear_history: bool,
}

impl ResourceArgs for BranchProtectionArgs {
    const TYPE_TOKEN: &'static str = "github:index/branchProtection:BranchProtection";

    fn properties(&self) -> Properties {
        Properties::from([
            (
                "repositoryId".to_string(),
                Input::from(self.repository_id.clone()),
            ),
            ("pattern".to_string(), Input::value(self.pattern.clone())),
            (
                "requiredLinearHistory".to_string(),
                Input::value(self.required_linear_history),
            ),
        ])
    }
}

/// A registered branch protection rule.
pub type BranchProtection = Resource<BranchProtectionArgs>;

// ---------------------------------------------------------------------------
// Issue label
// ---------------------------------------------------------------------------

/// Arguments of `github:index/issueLabel:IssueLabel`.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueLabelArgs {
    /// Name of the owning repository.
    pub repository: OutputRef,
    /// Label text.
    pub name: String,
    /// Hex colour without the leading `#`.
    pub color: String,
    /// Tooltip shown for the label.
    pub description: String,
}

impl ResourceArgs for IssueLabelArgs {
    const TYPE_TOKEN: &'static str = "github:index/issueLabel:IssueLabel";

    fn properties(&self) -> Properties {
        Properties::from([
            (
                "repository".to_string(),
                Input::from(self.repository.clone()),
            ),
            ("name".to_string(), Input::value(self.name.clone())),
            ("color".to_string(), Input::value(self.color.clone())),
            (
                "description".to_string(),
                Input::value(self.description.clone()),
            ),
        ])
    }
}

/// A registered issue label.
pub type IssueLabel = Resource<IssueLabelArgs>;

// ---------------------------------------------------------------------------
// Actions secret
// ---------------------------------------------------------------------------

/// Arguments of `github:index/actionsSecret:ActionsSecret`.
///
/// Only the secret's name is declared; its value is set out of band.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionsSecretArgs {
    /// Name of the owning repository.
    pub repository: OutputRef,
    /// Name the secret is exposed under in workflows.
    pub secret_name: String,
}

impl ResourceArgs for ActionsSecretArgs {
    const TYPE_TOKEN: &'static str = "github:index/actionsSecret:ActionsSecret";

    fn properties(&self) -> Properties {
        Properties::from([
            (
                "repository".to_string(),
                Input::from(self.repository.clone()),
            ),
            (
                "secretName".to_string(),
                Input::value(self.secret_name.clone()),
            ),
        ])
    }
}

/// A registered Actions secret.
pub type ActionsSecret = Resource<ActionsSecretArgs>;
