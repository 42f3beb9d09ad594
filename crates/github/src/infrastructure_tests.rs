use std::collections::BTreeMap;

use serde_json::{json, Value};

use super::*;
use crate::graph::DependencyKind;
use crate::mock::{evaluate, Evaluation, MockResource, MockResourceArgs, Mocks};

/// Echoes inputs and fabricates the repository outputs other resources need.
struct EchoMocks;

impl Mocks for EchoMocks {
    fn new_resource(&self, args: &MockResourceArgs<'_>) -> Result<MockResource, String> {
        let mut outputs: BTreeMap<String, Value> = args.inputs.clone();
        if args.type_token == "github:index/repository:Repository" {
            let repo_name = args.inputs["name"].as_str().unwrap_or_default();
            outputs.insert(
                "htmlUrl".to_string(),
                json!(format!("https://github.com/mock-owner/{repo_name}")),
            );
            outputs.insert(
                "nodeId".to_string(),
                json!(format!("mock-node-id-for-{}", args.name)),
            );
        }
        Ok(MockResource {
            id: format!("{}_id", args.name),
            outputs,
        })
    }
}

fn evaluated() -> (GithubResources, Evaluation) {
    let mut graph = ResourceGraph::new();
    let resources = define_infrastructure(&mut graph).unwrap();
    let evaluation = evaluate(&graph, &EchoMocks).unwrap();
    (resources, evaluation)
}

#[test]
fn test_repository_policy() {
    let (resources, eval) = evaluated();
    let repo = eval.resource(resources.repository.id()).unwrap();

    assert_eq!(repo.get("name"), Some(&json!("pulumi-go-components")));
    assert_eq!(repo.get("visibility"), Some(&json!("public")));
    assert_eq!(repo.get("deleteBranchOnMerge"), Some(&json!(true)));
    assert_eq!(repo.get("hasIssues"), Some(&json!(true)));
    assert_eq!(repo.get("hasProjects"), Some(&json!(true)));
    assert_eq!(
        repo.get("topics"),
        Some(&json!([
            "dagger", "github", "gitlab", "go", "golang", "pulumi", "vscode"
        ]))
    );
}

#[test]
fn test_branch_protection_on_main_with_linear_history() {
    let (resources, eval) = evaluated();
    let protection = eval.resource(resources.branch_protection.id()).unwrap();

    assert_eq!(protection.get("pattern"), Some(&json!("main")));
    assert_eq!(protection.get("requiredLinearHistory"), Some(&json!(true)));
    assert_eq!(
        protection.get("repositoryId"),
        Some(&json!("mock-node-id-for-newRepositoryPulumiGoComponents"))
    );
}

#[test]
fn test_issue_labels() {
    let (resources, eval) = evaluated();
    let repo_name = eval.output(&resources.repository.name_output()).cloned();

    let cases = [
        (
            resources.gh_actions_label,
            "github-actions dependencies",
            "E66E01",
            "This issue is related to github-actions dependencies",
        ),
        (
            resources.go_modules_label,
            "go-modules dependencies",
            "9BE688",
            "This issue is related to go modules dependencies",
        ),
    ];

    for (label, name, color, description) in cases {
        let label = eval.resource(label.id()).unwrap();
        assert_eq!(label.get("name"), Some(&json!(name)));
        assert_eq!(label.get("color"), Some(&json!(color)));
        assert_eq!(label.get("description"), Some(&json!(description)));
        assert_eq!(
            label.get("repository").cloned(),
            repo_name,
            "{name} should be in the correct repository"
        );
    }
}

#[test]
fn test_actions_secrets() {
    let (resources, eval) = evaluated();
    let repo_name = eval.output(&resources.repository.name_output()).cloned();

    let cases = [
        (resources.gitlab_repo_secret, "GITLAB_REPOSITORY"),
        (resources.gitlab_token_secret, "GITLAB_TOKEN"),
        (resources.gitlab_owner_secret, "GITLAB_OWNER"),
    ];

    for (secret, expected_name) in cases {
        let evaluated = eval.resource(secret.id()).unwrap();
        assert_eq!(evaluated.get("secretName"), Some(&json!(expected_name)));
        assert_eq!(
            evaluated.get("repository").cloned(),
            repo_name,
            "{expected_name} should be in the correct repository"
        );
    }
}

#[test]
fn test_labels_and_secrets_depend_on_repository() {
    let mut graph = ResourceGraph::new();
    let resources = define_infrastructure(&mut graph).unwrap();
    let repo = resources.repository.id();

    let dependents: Vec<_> = graph
        .dependencies()
        .into_iter()
        .filter(|d| d.dependency == repo && d.kind == DependencyKind::Reference)
        .map(|d| d.dependent)
        .collect();

    assert_eq!(
        dependents,
        vec![
            resources.branch_protection.id(),
            resources.gh_actions_label.id(),
            resources.go_modules_label.id(),
            resources.gitlab_repo_secret.id(),
            resources.gitlab_token_secret.id(),
            resources.gitlab_owner_secret.id(),
        ]
    );
}

#[test]
fn test_secrets_are_parented_to_repository_and_nothing_is_protected() {
    let mut graph = ResourceGraph::new();
    let resources = define_infrastructure(&mut graph).unwrap();

    for secret in [
        resources.gitlab_repo_secret,
        resources.gitlab_token_secret,
        resources.gitlab_owner_secret,
    ] {
        let decl = graph.get(secret.id()).unwrap();
        assert_eq!(decl.options.parent, Some(resources.repository.id()));
    }
    assert!(graph.resources().all(|(_, decl)| !decl.options.protect));
}

#[test]
fn test_exports() {
    let mut graph = ResourceGraph::new();
    let resources = define_infrastructure(&mut graph).unwrap();
    resources.export(&mut graph).unwrap();

    let eval = evaluate(&graph, &EchoMocks).unwrap();

    let keys: Vec<_> = eval.stack_outputs().keys().cloned().collect();
    assert_eq!(keys, vec!["repository", "repositoryUrl"]);
    assert_eq!(
        eval.stack_outputs()["repository"],
        json!("pulumi-go-components")
    );
}
