//! Declarative GitHub resources.
//!
//! Describes the desired GitHub state (a repository, its branch protection,
//! issue labels, and Actions secrets) as a [`ResourceGraph`] and renders it as
//! a Pulumi YAML program. The engine evaluates that program; this crate never
//! talks to GitHub.
//!
//! ## Architectural Layer
//!
//! **Configuration.** Value structs plus an explicit dependency list. No
//! ordering, diffing, or state handling lives here.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`graph`] | `ResourceGraph`, references, options, dependency list |
//! | [`resources`] | Argument structs for the GitHub provider types |
//! | [`infrastructure`] | The project's fixed repository declaration |
//! | [`component`] | The reusable `StandardRepo` component |
//! | [`program`] | Pulumi YAML rendering |
//! | [`mock`] | Engine-free evaluation for tests |
//! | [`errors`] | `GraphError`, `EvaluationError` |

pub mod component;
pub mod errors;
pub mod graph;
pub mod infrastructure;
pub mod mock;
pub mod program;
pub mod resources;

pub use component::{StandardRepo, StandardRepoArgs, STANDARD_REPO_TYPE};
pub use errors::{EvaluationError, GraphError};
pub use graph::{
    ComponentOutput, Dependency, DependencyKind, Input, OutputRef, ResourceGraph, ResourceId,
    ResourceOptions,
};
pub use infrastructure::{define_infrastructure, GithubResources, REPOSITORY_NAME};
pub use program::{Program, PROGRAM_FILE};
