//! The declarative resource graph.
//!
//! A [`ResourceGraph`] is plain data: resources with their input properties,
//! options, and references to other resources' outputs. It is handed to the
//! engine (via [`crate::program`]) which owns ordering, diffing, and state.
//!
//! References can only point at resources registered *before* the referencing
//! resource, so declaration order is always a valid creation order.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use tracing::trace;

use crate::GraphError;

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// Position of a resource within its [`ResourceGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(usize);

impl ResourceId {
    /// Returns the declaration index of the resource.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A reference to one output property of a registered resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputRef {
    /// The resource producing the output.
    pub resource: ResourceId,
    /// Output property name as the provider spells it (e.g. `"nodeId"`).
    pub property: String,
}

/// An input property: either a literal or another resource's output.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// A value known at declaration time.
    Value(serde_json::Value),
    /// A value produced by another resource once it exists.
    Output(OutputRef),
}

impl Input {
    /// Creates a literal input.
    pub fn value(value: impl Into<serde_json::Value>) -> Self {
        Self::Value(value.into())
    }

    /// Returns the output reference, if this input has one.
    pub fn as_output(&self) -> Option<&OutputRef> {
        match self {
            Input::Output(r) => Some(r),
            Input::Value(_) => None,
        }
    }
}

impl From<OutputRef> for Input {
    fn from(r: OutputRef) -> Self {
        Self::Output(r)
    }
}

/// Input properties keyed by provider property name.
pub type Properties = BTreeMap<String, Input>;

// ---------------------------------------------------------------------------
// Resource declarations
// ---------------------------------------------------------------------------

/// Arguments of a provider resource type.
pub trait ResourceArgs {
    /// Provider type token (e.g. `"github:index/repository:Repository"`).
    const TYPE_TOKEN: &'static str;

    /// Input properties, keyed by provider property name.
    fn properties(&self) -> Properties;
}

/// A typed handle to a resource registered in a [`ResourceGraph`].
#[derive(Debug)]
pub struct Resource<A> {
    id: ResourceId,
    _args: PhantomData<fn() -> A>,
}

impl<A> Resource<A> {
    /// The resource's position in the graph.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// A reference to one of the resource's output properties.
    pub fn output(&self, property: impl Into<String>) -> OutputRef {
        OutputRef {
            resource: self.id,
            property: property.into(),
        }
    }
}

impl<A> Clone for Resource<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for Resource<A> {}

/// Options that affect how the engine manages a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    /// Logical parent. Children of a component are grouped under it.
    pub parent: Option<ResourceId>,
    /// Whether the engine must refuse to delete the resource.
    pub protect: bool,
    /// Explicit dependencies in addition to those implied by references.
    pub depends_on: Vec<ResourceId>,
}

impl ResourceOptions {
    /// Options with the given parent.
    pub fn parent(parent: ResourceId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Sets the `protect` flag.
    pub fn with_protect(mut self, protect: bool) -> Self {
        self.protect = protect;
        self
    }
}

/// Whether a declaration is a provider resource or a grouping component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Managed by a provider plugin.
    Custom,
    /// A logical grouping with no provider-side existence.
    Component,
}

/// One declared resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDecl {
    /// Logical name, unique among resources of the same type and parent.
    pub name: String,
    /// Provider or component type token.
    pub type_token: String,
    /// Custom resource or component.
    pub kind: ResourceKind,
    /// Input properties (empty for components).
    pub properties: Properties,
    /// Resource options.
    pub options: ResourceOptions,
}

/// A value a component exposes to its callers.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentOutput {
    /// One output property of a child resource.
    Value(OutputRef),
    /// The child resource itself, for composition.
    Resource(ResourceId),
}

/// Why one resource depends on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// An input property references the other resource's output.
    Reference,
    /// The other resource is the logical parent.
    Parent,
    /// Listed in `depends_on`.
    Explicit,
}

/// One edge of the dependency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    /// The resource that must be created later.
    pub dependent: ResourceId,
    /// The resource that must exist first.
    pub dependency: ResourceId,
    /// Why the edge exists.
    pub kind: DependencyKind,
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// An ordered set of resource declarations plus stack exports.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    resources: Vec<ResourceDecl>,
    component_outputs: BTreeMap<ResourceId, BTreeMap<String, ComponentOutput>>,
    exports: BTreeMap<String, OutputRef>,
}

impl ResourceGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider resource.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty, a resource with the same type, name, and
    /// parent already exists, or any reference, parent, or explicit dependency
    /// points at an unknown resource.
    pub fn register<A: ResourceArgs>(
        &mut self,
        name: &str,
        args: &A,
        options: ResourceOptions,
    ) -> Result<Resource<A>, GraphError> {
        let id = self.push(ResourceDecl {
            name: name.to_string(),
            type_token: A::TYPE_TOKEN.to_string(),
            kind: ResourceKind::Custom,
            properties: args.properties(),
            options,
        })?;
        Ok(Resource {
            id,
            _args: PhantomData,
        })
    }

    /// Registers a component resource that children can be parented to.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ResourceGraph::register`].
    pub fn register_component(
        &mut self,
        type_token: &str,
        name: &str,
        options: ResourceOptions,
    ) -> Result<ResourceId, GraphError> {
        self.push(ResourceDecl {
            name: name.to_string(),
            type_token: type_token.to_string(),
            kind: ResourceKind::Component,
            properties: Properties::new(),
            options,
        })
    }

    /// Records the outputs a component exposes.
    ///
    /// # Errors
    ///
    /// Fails if `component` is not a registered component or any output
    /// refers to an unknown resource.
    pub fn register_component_outputs(
        &mut self,
        component: ResourceId,
        outputs: BTreeMap<String, ComponentOutput>,
    ) -> Result<(), GraphError> {
        let decl = self.decl(component)?;
        if decl.kind != ResourceKind::Component {
            return Err(GraphError::NotAComponent {
                name: decl.name.clone(),
            });
        }
        for output in outputs.values() {
            match output {
                ComponentOutput::Value(r) => self.check_known(r.resource)?,
                ComponentOutput::Resource(id) => self.check_known(*id)?,
            }
        }
        self.component_outputs.insert(component, outputs);
        Ok(())
    }

    /// Exports an output as a stack output under `name`.
    ///
    /// # Errors
    ///
    /// Fails if `name` is already exported or `output` refers to an unknown resource.
    pub fn export(&mut self, name: &str, output: OutputRef) -> Result<(), GraphError> {
        self.check_known(output.resource)?;
        if self.exports.contains_key(name) {
            return Err(GraphError::DuplicateExport {
                name: name.to_string(),
            });
        }
        self.exports.insert(name.to_string(), output);
        Ok(())
    }

    /// Declared resources in registration order.
    pub fn resources(&self) -> impl Iterator<Item = (ResourceId, &ResourceDecl)> {
        self.resources
            .iter()
            .enumerate()
            .map(|(i, decl)| (ResourceId(i), decl))
    }

    /// Number of declared resources, components included.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns `true` if nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Looks up a declaration.
    pub fn get(&self, id: ResourceId) -> Option<&ResourceDecl> {
        self.resources.get(id.0)
    }

    /// Stack exports.
    pub fn exports(&self) -> &BTreeMap<String, OutputRef> {
        &self.exports
    }

    /// Outputs registered for `component`, if any.
    pub fn component_outputs(
        &self,
        component: ResourceId,
    ) -> Option<&BTreeMap<String, ComponentOutput>> {
        self.component_outputs.get(&component)
    }

    /// The explicit dependency list: every reference, parent link, and
    /// `depends_on` entry, in declaration order.
    pub fn dependencies(&self) -> Vec<Dependency> {
        let mut edges = Vec::new();
        for (dependent, decl) in self.resources() {
            if let Some(parent) = decl.options.parent {
                edges.push(Dependency {
                    dependent,
                    dependency: parent,
                    kind: DependencyKind::Parent,
                });
            }
            for input in decl.properties.values() {
                if let Some(r) = input.as_output() {
                    edges.push(Dependency {
                        dependent,
                        dependency: r.resource,
                        kind: DependencyKind::Reference,
                    });
                }
            }
            for dependency in &decl.options.depends_on {
                edges.push(Dependency {
                    dependent,
                    dependency: *dependency,
                    kind: DependencyKind::Explicit,
                });
            }
        }
        edges
    }

    /// Name that is unique across the whole graph.
    ///
    /// Resources nested under components are prefixed with the component
    /// names, joined with `-`. Custom-resource parents do not contribute.
    pub fn qualified_name(&self, id: ResourceId) -> Option<String> {
        self.qualify(self.get(id)?)
    }

    /// Whether `ancestor` appears anywhere on the parent chain of `id`.
    pub fn is_descendant(&self, id: ResourceId, ancestor: ResourceId) -> bool {
        let mut parent = self.get(id).and_then(|decl| decl.options.parent);
        while let Some(p) = parent {
            if p == ancestor {
                return true;
            }
            parent = self.get(p).and_then(|decl| decl.options.parent);
        }
        false
    }

    fn qualify(&self, decl: &ResourceDecl) -> Option<String> {
        let mut parts = vec![decl.name.as_str()];
        let mut parent = decl.options.parent;
        while let Some(p) = parent {
            let pdecl = self.get(p)?;
            if pdecl.kind == ResourceKind::Component {
                parts.push(pdecl.name.as_str());
            }
            parent = pdecl.options.parent;
        }
        parts.reverse();
        Some(parts.join("-"))
    }

    fn push(&mut self, decl: ResourceDecl) -> Result<ResourceId, GraphError> {
        if decl.name.is_empty() {
            return Err(GraphError::EmptyName {
                type_token: decl.type_token,
            });
        }
        if let Some(parent) = decl.options.parent {
            self.check_known(parent)?;
        }
        for dependency in &decl.options.depends_on {
            self.check_known(*dependency)?;
        }
        for input in decl.properties.values() {
            if let Some(r) = input.as_output() {
                self.check_known(r.resource)?;
            }
        }
        let duplicate = self.resources.iter().any(|existing| {
            existing.name == decl.name
                && existing.type_token == decl.type_token
                && existing.options.parent == decl.options.parent
        });
        if duplicate {
            return Err(GraphError::DuplicateResource {
                type_token: decl.type_token,
                name: decl.name,
            });
        }
        // Custom resources share one namespace once components are flattened.
        if let Some(qualified) = self
            .qualify(&decl)
            .filter(|_| decl.kind == ResourceKind::Custom)
        {
            let collides = self.resources().any(|(id, existing)| {
                existing.kind == ResourceKind::Custom
                    && self.qualified_name(id).as_deref() == Some(qualified.as_str())
            });
            if collides {
                return Err(GraphError::NameCollision { name: qualified });
            }
        }

        let id = ResourceId(self.resources.len());
        trace!(name = %decl.name, type_token = %decl.type_token, "resource registered");
        self.resources.push(decl);
        Ok(id)
    }

    fn decl(&self, id: ResourceId) -> Result<&ResourceDecl, GraphError> {
        self.get(id).ok_or(GraphError::UnknownResource { index: id.0 })
    }

    fn check_known(&self, id: ResourceId) -> Result<(), GraphError> {
        self.decl(id).map(|_| ())
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
