use serde_json::json;

use super::*;
use crate::graph::ResourceKind;
use crate::mock::{evaluate, MockResource, MockResourceArgs, Mocks};
use crate::EvaluationError;

/// Provides the repository outputs the component's own outputs derive from.
struct StandardRepoMocks;

impl Mocks for StandardRepoMocks {
    fn new_resource(&self, args: &MockResourceArgs<'_>) -> Result<MockResource, String> {
        let mut outputs = BTreeMap::new();
        match args.type_token {
            STANDARD_REPO_TYPE => {}
            "github:index/repository:Repository" => {
                let repo_name = args.inputs["name"].as_str().unwrap_or_default().to_string();
                outputs.insert(
                    "htmlUrl".to_string(),
                    json!(format!("https://github.com/mock-owner/{repo_name}")),
                );
                outputs.insert("name".to_string(), json!(repo_name));
                outputs.insert(
                    "nodeId".to_string(),
                    json!(format!("mock-node-id-for-{}", args.name)),
                );
            }
            "github:index/branchProtection:BranchProtection"
            | "github:index/issueLabel:IssueLabel"
            | "github:index/actionsSecret:ActionsSecret" => {}
            other => return Err(format!("unknown resource type: {other}")),
        }
        Ok(MockResource {
            id: format!("{}_id", args.name),
            outputs,
        })
    }
}

fn args(name: &str, topics: &[&str]) -> StandardRepoArgs {
    StandardRepoArgs {
        repository_name: RepositoryName::new(name).unwrap(),
        description: "A test repository".to_string(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
    }
}

#[test]
fn test_new_standard_repo_outputs() {
    let mut graph = ResourceGraph::new();
    let repo = StandardRepo::new(
        &mut graph,
        "testStandardRepo",
        &args("test-repo", &["pulumi", "go"]),
        ResourceOptions::default(),
    )
    .unwrap();

    let eval = evaluate(&graph, &StandardRepoMocks).unwrap();

    assert_eq!(eval.output(&repo.repository_name), Some(&json!("test-repo")));
    assert_eq!(
        eval.output(&repo.repository_url),
        Some(&json!("https://github.com/mock-owner/test-repo"))
    );
    // The child repository's logical name is "repository".
    assert_eq!(
        eval.output(&repo.repository_node_id),
        Some(&json!("mock-node-id-for-repository"))
    );
}

#[test]
fn test_component_outputs_include_child_repository() {
    let mut graph = ResourceGraph::new();
    let repo = StandardRepo::new(
        &mut graph,
        "testStandardRepo",
        &args("test-repo", &[]),
        ResourceOptions::default(),
    )
    .unwrap();

    let eval = evaluate(&graph, &StandardRepoMocks).unwrap();
    let outputs = eval.component_outputs(repo.component).unwrap();

    assert_eq!(outputs["repositoryName"], json!("test-repo"));
    assert_eq!(
        outputs["repositoryUrl"],
        json!("https://github.com/mock-owner/test-repo")
    );
    assert!(!outputs["repositoryNodeId"].as_str().unwrap().is_empty());
    assert_eq!(
        outputs["repository"],
        json!({
            "type": "github:index/repository:Repository",
            "name": "testStandardRepo-repository",
            "id": "repository_id",
        })
    );
}

#[test]
fn test_children_are_parented_to_component() {
    let mut graph = ResourceGraph::new();
    let repo = StandardRepo::new(
        &mut graph,
        "parent",
        &args("test-repo", &[]),
        ResourceOptions::default(),
    )
    .unwrap();

    let component = graph.get(repo.component).unwrap();
    assert_eq!(component.kind, ResourceKind::Component);
    assert_eq!(component.type_token, STANDARD_REPO_TYPE);

    let children: Vec<_> = graph
        .resources()
        .filter(|(id, _)| *id != repo.component)
        .map(|(_, decl)| (decl.name.as_str(), decl.options.parent))
        .collect();
    assert_eq!(
        children,
        vec![
            ("repository", Some(repo.component)),
            ("branch-protection", Some(repo.component)),
            ("label-gh-actions", Some(repo.component)),
            ("secret-gitlab-repo", Some(repo.component)),
            ("secret-gitlab-token", Some(repo.component)),
            ("secret-gitlab-owner", Some(repo.component)),
        ]
    );
}

#[test]
fn test_policy_is_fixed_regardless_of_inputs() {
    for (name, topics) in [
        ("test-repo", vec!["pulumi", "go"]),
        ("another", vec![]),
        ("x", vec!["rust", "infra", "github"]),
    ] {
        let mut graph = ResourceGraph::new();
        let repo = StandardRepo::new(
            &mut graph,
            "component",
            &args(name, &topics),
            ResourceOptions::default(),
        )
        .unwrap();
        let eval = evaluate(&graph, &StandardRepoMocks).unwrap();

        let repository = eval.resource(repo.repository.id()).unwrap();
        assert_eq!(repository.get("deleteBranchOnMerge"), Some(&json!(true)));
        assert_eq!(repository.get("visibility"), Some(&json!("public")));
        assert_eq!(repository.get("topics"), Some(&json!(topics)));

        let protection = graph
            .resources()
            .find(|(_, d)| d.name == "branch-protection")
            .map(|(id, _)| eval.resource(id).unwrap())
            .unwrap();
        assert_eq!(protection.get("pattern"), Some(&json!("main")));
        assert_eq!(protection.get("requiredLinearHistory"), Some(&json!(true)));
    }
}

#[test]
fn test_labels_and_secrets_reference_repository_name() {
    let mut graph = ResourceGraph::new();
    let repo = StandardRepo::new(
        &mut graph,
        "component",
        &args("integrity", &[]),
        ResourceOptions::default(),
    )
    .unwrap();
    let eval = evaluate(&graph, &StandardRepoMocks).unwrap();
    let repo_name = eval.output(&repo.repository_name).unwrap();

    let mut checked = 0;
    for (id, decl) in graph.resources() {
        if decl.type_token == "github:index/issueLabel:IssueLabel"
            || decl.type_token == "github:index/actionsSecret:ActionsSecret"
        {
            let evaluated = eval.resource(id).unwrap();
            assert_eq!(evaluated.inputs.get("repository"), Some(repo_name));
            checked += 1;
        }
    }
    assert_eq!(checked, 4);
}

#[test]
fn test_export_adds_three_stack_outputs() {
    let mut graph = ResourceGraph::new();
    let repo = StandardRepo::new(
        &mut graph,
        "my-standard-repo",
        &args("test-repo", &[]),
        ResourceOptions::default(),
    )
    .unwrap();
    repo.export(&mut graph).unwrap();

    let eval = evaluate(&graph, &StandardRepoMocks).unwrap();
    let keys: Vec<_> = eval.stack_outputs().keys().map(String::as_str).collect();

    assert_eq!(keys, vec!["repositoryName", "repositoryNodeId", "repositoryUrl"]);
}

#[test]
fn test_mock_failure_aborts_evaluation() {
    struct Rejecting;
    impl Mocks for Rejecting {
        fn new_resource(&self, args: &MockResourceArgs<'_>) -> Result<MockResource, String> {
            if args.type_token == "github:index/issueLabel:IssueLabel" {
                return Err("label quota exceeded".to_string());
            }
            StandardRepoMocks.new_resource(args)
        }
    }

    let mut graph = ResourceGraph::new();
    StandardRepo::new(
        &mut graph,
        "component",
        &args("test-repo", &[]),
        ResourceOptions::default(),
    )
    .unwrap();

    let err = evaluate(&graph, &Rejecting).unwrap_err();

    assert!(matches!(
        err,
        EvaluationError::Rejected { ref name, .. } if name == "label-gh-actions"
    ));
}

#[test]
fn test_duplicate_component_name_is_rejected() {
    let mut graph = ResourceGraph::new();
    StandardRepo::new(&mut graph, "same", &args("a", &[]), ResourceOptions::default()).unwrap();

    let err = StandardRepo::new(&mut graph, "same", &args("b", &[]), ResourceOptions::default())
        .unwrap_err();

    assert!(matches!(err, GraphError::DuplicateResource { .. }));
}
