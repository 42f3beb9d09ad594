//! Newtype domain identifiers.
//!
//! Every name that identifies something to the infrastructure engine is a
//! distinct newtype wrapping a `String`. This prevents accidentally passing,
//! for example, a [`ProjectName`] where an [`EnvironmentName`] is expected even
//! though both are plain strings on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single deployment run (one invocation of the orchestrator).
///
/// Generated fresh for every run; recorded on the tracing span so all engine
/// calls made during one run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeploymentRunId(Uuid);

impl DeploymentRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a [`DeploymentRunId`] from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for DeploymentRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed (engine and GitHub names)
// ---------------------------------------------------------------------------

string_id! {
    /// The organization (or individual account) that owns stacks in the
    /// engine's backend.
    OrganizationName
}

string_id! {
    /// A project groups stacks that deploy the same program.
    ProjectName
}

string_id! {
    /// The environment part of a stack name (e.g. `"dev"`, `"test-1718000000"`).
    EnvironmentName
}

string_id! {
    /// A GitHub repository name, without the owner prefix.
    RepositoryName
}

string_id! {
    /// A configuration key in `namespace:name` form (e.g. `"github:token"`).
    ConfigKey
}

// ---------------------------------------------------------------------------
// Composite identifiers
// ---------------------------------------------------------------------------

/// Fully-qualified name of a stack: `organization/project/environment`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackName {
    /// Owning organization.
    pub organization: OrganizationName,
    /// Project the stack belongs to.
    pub project: ProjectName,
    /// Environment name, unique within the project.
    pub environment: EnvironmentName,
}

impl StackName {
    /// Creates a new [`StackName`] from its three parts.
    pub fn new(
        organization: OrganizationName,
        project: ProjectName,
        environment: EnvironmentName,
    ) -> Self {
        Self {
            organization,
            project,
            environment,
        }
    }

    /// Returns the `organization/project/environment` form used by the engine.
    pub fn fully_qualified(&self) -> String {
        format!(
            "{}/{}/{}",
            self.organization, self.project, self.environment
        )
    }
}

impl std::fmt::Display for StackName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.fully_qualified())
    }
}

#[cfg(test)]
#[path = "identifiers_tests.rs"]
mod tests;
