use super::*;
use crate::resources::{ActionsSecretArgs, RepositoryArgs, Visibility};

fn repo_args(name: &str) -> RepositoryArgs {
    RepositoryArgs {
        name: name.to_string(),
        description: String::new(),
        topics: Vec::new(),
        delete_branch_on_merge: true,
        has_issues: true,
        has_projects: true,
        visibility: Visibility::Public,
    }
}

#[test]
fn test_register_assigns_declaration_order() {
    let mut graph = ResourceGraph::new();
    let a = graph
        .register("a", &repo_args("a"), ResourceOptions::default())
        .unwrap();
    let b = graph
        .register("b", &repo_args("b"), ResourceOptions::default())
        .unwrap();

    assert_eq!(a.id().index(), 0);
    assert_eq!(b.id().index(), 1);
    assert_eq!(graph.len(), 2);
    assert_eq!(
        graph.get(a.id()).unwrap().type_token,
        "github:index/repository:Repository"
    );
}

#[test]
fn test_register_rejects_empty_name() {
    let mut graph = ResourceGraph::new();
    let err = graph
        .register("", &repo_args("x"), ResourceOptions::default())
        .unwrap_err();
    assert!(matches!(err, GraphError::EmptyName { .. }));
    assert!(graph.is_empty());
}

#[test]
fn test_register_rejects_duplicate_under_same_parent() {
    let mut graph = ResourceGraph::new();
    graph
        .register("repo", &repo_args("x"), ResourceOptions::default())
        .unwrap();

    let err = graph
        .register("repo", &repo_args("y"), ResourceOptions::default())
        .unwrap_err();

    assert!(matches!(err, GraphError::DuplicateResource { ref name, .. } if name == "repo"));
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_same_name_allowed_under_different_components() {
    let mut graph = ResourceGraph::new();
    let first = graph
        .register_component("custom:resource:X", "first", ResourceOptions::default())
        .unwrap();
    let second = graph
        .register_component("custom:resource:X", "second", ResourceOptions::default())
        .unwrap();

    graph
        .register("repository", &repo_args("a"), ResourceOptions::parent(first))
        .unwrap();
    let other = graph
        .register("repository", &repo_args("b"), ResourceOptions::parent(second))
        .unwrap();

    assert_eq!(
        graph.qualified_name(other.id()).as_deref(),
        Some("second-repository")
    );
}

#[test]
fn test_register_rejects_unknown_references() {
    let mut donor = ResourceGraph::new();
    for name in ["a", "b", "c"] {
        donor
            .register(name, &repo_args(name), ResourceOptions::default())
            .unwrap();
    }
    let foreign = donor
        .register("d", &repo_args("d"), ResourceOptions::default())
        .unwrap();

    let mut graph = ResourceGraph::new();
    let err = graph
        .register(
            "secret",
            &ActionsSecretArgs {
                repository: foreign.name_output(),
                secret_name: "S".to_string(),
            },
            ResourceOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, GraphError::UnknownResource { index: 3 }));

    let err = graph
        .register("orphan", &repo_args("o"), ResourceOptions::parent(foreign.id()))
        .unwrap_err();
    assert!(matches!(err, GraphError::UnknownResource { index: 3 }));
    assert!(graph.is_empty());
}

#[test]
fn test_dependencies_list_references_parents_and_explicit_edges() {
    let mut graph = ResourceGraph::new();
    let repo = graph
        .register("repo", &repo_args("r"), ResourceOptions::default())
        .unwrap();
    let other = graph
        .register("other", &repo_args("o"), ResourceOptions::default())
        .unwrap();
    let secret = graph
        .register(
            "secret",
            &ActionsSecretArgs {
                repository: repo.name_output(),
                secret_name: "S".to_string(),
            },
            ResourceOptions {
                parent: Some(repo.id()),
                protect: false,
                depends_on: vec![other.id()],
            },
        )
        .unwrap();

    let edges = graph.dependencies();

    assert_eq!(
        edges,
        vec![
            Dependency {
                dependent: secret.id(),
                dependency: repo.id(),
                kind: DependencyKind::Parent,
            },
            Dependency {
                dependent: secret.id(),
                dependency: repo.id(),
                kind: DependencyKind::Reference,
            },
            Dependency {
                dependent: secret.id(),
                dependency: other.id(),
                kind: DependencyKind::Explicit,
            },
        ]
    );
}

#[test]
fn test_component_outputs_require_a_component() {
    let mut graph = ResourceGraph::new();
    let repo = graph
        .register("repo", &repo_args("r"), ResourceOptions::default())
        .unwrap();

    let err = graph
        .register_component_outputs(repo.id(), Default::default())
        .unwrap_err();

    assert!(matches!(err, GraphError::NotAComponent { ref name } if name == "repo"));
}

#[test]
fn test_export_rejects_duplicates() {
    let mut graph = ResourceGraph::new();
    let repo = graph
        .register("repo", &repo_args("r"), ResourceOptions::default())
        .unwrap();

    graph.export("url", repo.html_url()).unwrap();
    let err = graph.export("url", repo.node_id()).unwrap_err();

    assert!(matches!(err, GraphError::DuplicateExport { ref name } if name == "url"));
    assert_eq!(graph.exports()["url"], repo.html_url());
}

#[test]
fn test_qualified_name_ignores_custom_parents() {
    let mut graph = ResourceGraph::new();
    let repo = graph
        .register("repo", &repo_args("r"), ResourceOptions::default())
        .unwrap();
    let secret = graph
        .register(
            "secret",
            &ActionsSecretArgs {
                repository: repo.name_output(),
                secret_name: "S".to_string(),
            },
            ResourceOptions::parent(repo.id()),
        )
        .unwrap();

    assert_eq!(graph.qualified_name(secret.id()).as_deref(), Some("secret"));
}
