//! Evaluates a [`ResourceGraph`] without an engine, for tests.
//!
//! Mirrors the engine's mock mode: every declaration (components included) is
//! passed to a [`Mocks`] implementation in declaration order, with references
//! already resolved to the values earlier mocks produced. A property that a
//! mock does not return falls back to the resource's own input of the same
//! name, the way the engine echoes inputs into state.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::graph::{ComponentOutput, Input, OutputRef, ResourceGraph, ResourceId};
use crate::{EvaluationError, GraphError};

/// What a mock sees when a resource is created.
#[derive(Debug, Clone, Copy)]
pub struct MockResourceArgs<'a> {
    pub type_token: &'a str,
    /// Logical name as declared (not component-qualified).
    pub name: &'a str,
    /// Inputs with every reference resolved.
    pub inputs: &'a BTreeMap<String, Value>,
}

/// What a mock returns for a created resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockResource {
    /// Physical id.
    pub id: String,
    pub outputs: BTreeMap<String, Value>,
}

/// Supplies fake provider behaviour.
pub trait Mocks {
    /// Called once per declared resource. An `Err` aborts evaluation.
    fn new_resource(&self, args: &MockResourceArgs<'_>) -> Result<MockResource, String>;
}

/// One resource after mock creation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedResource {
    pub name: String,
    pub type_token: String,
    pub id: String,
    pub inputs: BTreeMap<String, Value>,
    pub outputs: BTreeMap<String, Value>,
}

impl EvaluatedResource {
    /// Reads a property from the outputs, falling back to the inputs.
    pub fn get(&self, property: &str) -> Option<&Value> {
        self.outputs
            .get(property)
            .or_else(|| self.inputs.get(property))
    }
}

/// The result of [`evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    resources: Vec<EvaluatedResource>,
    component_outputs: BTreeMap<ResourceId, BTreeMap<String, Value>>,
    stack_outputs: BTreeMap<String, Value>,
}

impl Evaluation {
    /// The evaluated resource for `id`.
    pub fn resource(&self, id: ResourceId) -> Option<&EvaluatedResource> {
        self.resources.get(id.index())
    }

    /// Resolves an output reference.
    pub fn output(&self, r: &OutputRef) -> Option<&Value> {
        self.resource(r.resource)?.get(&r.property)
    }

    /// Resolved outputs of a component.
    pub fn component_outputs(&self, component: ResourceId) -> Option<&BTreeMap<String, Value>> {
        self.component_outputs.get(&component)
    }

    /// Resolved stack exports.
    pub fn stack_outputs(&self) -> &BTreeMap<String, Value> {
        &self.stack_outputs
    }
}

/// Creates every resource of `graph` through `mocks` and resolves all
/// references, component outputs, and exports.
pub fn evaluate(graph: &ResourceGraph, mocks: &impl Mocks) -> Result<Evaluation, EvaluationError> {
    let mut resources: Vec<EvaluatedResource> = Vec::with_capacity(graph.len());

    for (_, decl) in graph.resources() {
        let mut inputs = BTreeMap::new();
        for (key, input) in &decl.properties {
            let value = match input {
                Input::Value(v) => v.clone(),
                Input::Output(r) => resolve(&resources, r)?,
            };
            inputs.insert(key.clone(), value);
        }

        let created = mocks
            .new_resource(&MockResourceArgs {
                type_token: &decl.type_token,
                name: &decl.name,
                inputs: &inputs,
            })
            .map_err(|message| EvaluationError::Rejected {
                type_token: decl.type_token.clone(),
                name: decl.name.clone(),
                message,
            })?;

        resources.push(EvaluatedResource {
            name: decl.name.clone(),
            type_token: decl.type_token.clone(),
            id: created.id,
            inputs,
            outputs: created.outputs,
        });
    }

    let mut component_outputs = BTreeMap::new();
    for (id, _) in graph.resources() {
        let Some(outputs) = graph.component_outputs(id) else {
            continue;
        };
        let mut resolved = BTreeMap::new();
        for (key, output) in outputs {
            let value = match output {
                ComponentOutput::Value(r) => resolve(&resources, r)?,
                ComponentOutput::Resource(child) => resource_reference(&resources, graph, *child)?,
            };
            resolved.insert(key.clone(), value);
        }
        component_outputs.insert(id, resolved);
    }

    let stack_outputs = graph
        .exports()
        .iter()
        .map(|(name, r)| Ok((name.clone(), resolve(&resources, r)?)))
        .collect::<Result<BTreeMap<_, _>, EvaluationError>>()?;

    Ok(Evaluation {
        resources,
        component_outputs,
        stack_outputs,
    })
}

fn resolve(resources: &[EvaluatedResource], r: &OutputRef) -> Result<Value, EvaluationError> {
    let evaluated = evaluated(resources, r.resource)?;
    evaluated
        .get(&r.property)
        .cloned()
        .ok_or_else(|| EvaluationError::MissingOutput {
            name: evaluated.name.clone(),
            property: r.property.clone(),
        })
}

fn resource_reference(
    resources: &[EvaluatedResource],
    graph: &ResourceGraph,
    id: ResourceId,
) -> Result<Value, EvaluationError> {
    let evaluated = evaluated(resources, id)?;
    Ok(serde_json::json!({
        "type": evaluated.type_token,
        "name": graph.qualified_name(id),
        "id": evaluated.id,
    }))
}

fn evaluated(
    resources: &[EvaluatedResource],
    id: ResourceId,
) -> Result<&EvaluatedResource, EvaluationError> {
    resources
        .get(id.index())
        .ok_or(EvaluationError::Graph(GraphError::UnknownResource {
            index: id.index(),
        }))
}

#[cfg(test)]
#[path = "mock_tests.rs"]
mod tests;
