//! Chooses which infrastructure program to render.

use github::{define_infrastructure, GraphError, Program, ResourceGraph, StandardRepo, StandardRepoArgs};
use stack::{ProjectName, RepositoryName};

/// Logical name of the component when a standard repository is requested.
pub const STANDARD_REPO_NAME: &str = "standard-repo";

/// What to deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramSelection {
    /// The project's own repository and its fixed companions.
    Infrastructure,
    /// A single repository built from the standard-repo component.
    StandardRepo(StandardRepoArgs),
}

/// Builds the resource graph for `selection` and renders it as a program.
pub fn build_program(
    project: &ProjectName,
    selection: &ProgramSelection,
) -> Result<Program, GraphError> {
    let mut graph = ResourceGraph::new();
    let description = match selection {
        ProgramSelection::Infrastructure => {
            define_infrastructure(&mut graph)?.export(&mut graph)?;
            "GitHub repository infrastructure"
        }
        ProgramSelection::StandardRepo(args) => {
            StandardRepo::new(&mut graph, STANDARD_REPO_NAME, args, Default::default())?
                .export(&mut graph)?;
            "Standard GitHub repository"
        }
    };
    graph.to_program(project, Some(description))
}

/// Picks the standard-repo component when a repository name is given.
pub fn selection_from(
    repository_name: Option<RepositoryName>,
    description: String,
    topics: Vec<String>,
) -> ProgramSelection {
    match repository_name {
        Some(repository_name) => ProgramSelection::StandardRepo(StandardRepoArgs {
            repository_name,
            description,
            topics,
        }),
        None => ProgramSelection::Infrastructure,
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
