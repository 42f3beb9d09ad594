use serde_json::json;

use super::*;
use crate::graph::ResourceOptions;
use crate::resources::{IssueLabelArgs, RepositoryArgs, Visibility};

struct Silent;

impl Mocks for Silent {
    fn new_resource(&self, args: &MockResourceArgs<'_>) -> Result<MockResource, String> {
        Ok(MockResource {
            id: format!("{}_id", args.name),
            outputs: BTreeMap::new(),
        })
    }
}

fn graph_with_label() -> (ResourceGraph, ResourceId, ResourceId) {
    let mut graph = ResourceGraph::new();
    let repo = graph
        .register(
            "repo",
            &RepositoryArgs {
                name: "echo".to_string(),
                description: String::new(),
                topics: Vec::new(),
                delete_branch_on_merge: true,
                has_issues: true,
                has_projects: true,
                visibility: Visibility::Public,
            },
            ResourceOptions::default(),
        )
        .unwrap();
    let label = graph
        .register(
            "label",
            &IssueLabelArgs {
                repository: repo.name_output(),
                name: "bug".to_string(),
                color: "FF0000".to_string(),
                description: String::new(),
            },
            ResourceOptions::default(),
        )
        .unwrap();
    (graph, repo.id(), label.id())
}

#[test]
fn test_unreturned_outputs_fall_back_to_inputs() {
    let (graph, repo, label) = graph_with_label();

    let eval = evaluate(&graph, &Silent).unwrap();

    assert_eq!(eval.resource(repo).unwrap().id, "repo_id");
    assert_eq!(
        eval.resource(label).unwrap().inputs["repository"],
        json!("echo")
    );
}

#[test]
fn test_missing_output_is_an_error() {
    let (mut graph, repo, _) = graph_with_label();
    graph
        .export(
            "url",
            OutputRef {
                resource: repo,
                property: "htmlUrl".to_string(),
            },
        )
        .unwrap();

    let err = evaluate(&graph, &Silent).unwrap_err();

    assert!(matches!(
        err,
        EvaluationError::MissingOutput { ref name, ref property } if name == "repo" && property == "htmlUrl"
    ));
}

#[test]
fn test_mock_sees_resolved_inputs() {
    struct Asserting;
    impl Mocks for Asserting {
        fn new_resource(&self, args: &MockResourceArgs<'_>) -> Result<MockResource, String> {
            if args.name == "label" && args.inputs.get("repository") != Some(&json!("echo")) {
                return Err("reference was not resolved".to_string());
            }
            Ok(MockResource::default())
        }
    }

    let (graph, _, _) = graph_with_label();

    assert!(evaluate(&graph, &Asserting).is_ok());
}
