//! Errors raised while building, rendering, or evaluating a resource graph.
//!
//! Any of these aborts the whole run; there is no partially declared graph.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by [`crate::ResourceGraph`] and the program renderer.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A resource or component was registered with an empty logical name.
    #[error("resource of type '{type_token}' has an empty name")]
    EmptyName { type_token: String },

    /// The (type, name, parent) triple is already taken.
    #[error("resource '{name}' of type '{type_token}' is already declared under the same parent")]
    DuplicateResource { type_token: String, name: String },

    /// Two custom resources render to the same program name, either through
    /// equal names of different types or through component-qualified names
    /// that join to the same string.
    #[error("more than one resource renders as '{name}'")]
    NameCollision { name: String },

    /// A parent, dependency, or reference points outside this graph.
    #[error("reference to unknown resource #{index}")]
    UnknownResource { index: usize },

    /// Component outputs were registered on a custom resource.
    #[error("'{name}' is not a component resource")]
    NotAComponent { name: String },

    /// A stack output name was exported twice.
    #[error("stack output '{name}' is already exported")]
    DuplicateExport { name: String },

    /// Components exist only in the graph; the engine cannot resolve their properties.
    #[error("cannot reference property '{property}' of component '{name}'")]
    ComponentReference { name: String, property: String },

    /// The program could not be serialised as YAML.
    #[error("failed to render program: {0}")]
    Render(#[from] serde_yaml_ng::Error),

    /// The program file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors produced while evaluating a graph against [`crate::mock::Mocks`].
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The mocks refused to create a resource.
    #[error("mock rejected resource '{name}' of type '{type_token}': {message}")]
    Rejected {
        type_token: String,
        name: String,
        message: String,
    },

    /// A reference names a property the referenced resource does not have.
    #[error("resource '{name}' has no output '{property}'")]
    MissingOutput { name: String, property: String },

    /// The graph itself is invalid.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
