//! Rendering a [`ResourceGraph`] as a Pulumi YAML program.
//!
//! The engine evaluates the program itself; nothing here orders or diffs
//! resources. References become `${name.property}` interpolations, which the
//! engine turns back into dependency edges.
//!
//! Component resources have no YAML counterpart. They are flattened: children
//! take component-qualified names (see [`ResourceGraph::qualified_name`]),
//! lose the component parent, and inherit the component's `protect` flag and
//! explicit dependencies.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use stack::ProjectName;
use tracing::info;

use crate::graph::{Input, OutputRef, ResourceDecl, ResourceGraph, ResourceId, ResourceKind};
use crate::GraphError;

/// File name the engine expects the program in.
pub const PROGRAM_FILE: &str = "Pulumi.yaml";

/// A serialisable Pulumi YAML program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub name: String,
    pub runtime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resources: BTreeMap<String, ProgramResource>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, String>,
}

/// One resource entry of a [`Program`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramResource {
    #[serde(rename = "type")]
    pub type_token: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "ProgramOptions::is_default")]
    pub options: ProgramOptions,
}

/// Resource options of a [`ProgramResource`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub protect: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl ProgramOptions {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Program {
    /// Serialises the program as YAML.
    pub fn to_yaml(&self) -> Result<String, GraphError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Writes the program to `<dir>/Pulumi.yaml`, creating `dir` if needed.
    pub fn write_to(&self, dir: &Path) -> Result<(), GraphError> {
        let yaml = self.to_yaml()?;
        std::fs::create_dir_all(dir).map_err(|source| GraphError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(PROGRAM_FILE);
        std::fs::write(&path, yaml).map_err(|source| GraphError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "program written");
        Ok(())
    }
}

impl ResourceGraph {
    /// Renders the graph as a Pulumi YAML program for `project`.
    ///
    /// # Errors
    ///
    /// Fails if an export or reference points at a component, which has no
    /// outputs the engine can resolve, or if two resources would render under
    /// the same name.
    pub fn to_program(
        &self,
        project: &ProjectName,
        description: Option<&str>,
    ) -> Result<Program, GraphError> {
        let mut resources = BTreeMap::new();
        for (id, decl) in self.resources() {
            if decl.kind == ResourceKind::Component {
                continue;
            }

            let mut properties = BTreeMap::new();
            for (key, input) in &decl.properties {
                let value = match input {
                    Input::Value(v) => v.clone(),
                    Input::Output(r) => serde_json::Value::String(self.interpolate(r)?),
                };
                properties.insert(key.clone(), value);
            }

            let parent = match decl.options.parent {
                Some(p) if self.kind_of(p)? == ResourceKind::Custom => {
                    Some(format!("${{{}}}", self.yaml_name(p)?))
                }
                _ => None,
            };
            let (protect, depends_on) = self.flattened_options(id, decl)?;

            let name = self.yaml_name(id)?;
            if resources.contains_key(&name) {
                return Err(GraphError::NameCollision { name });
            }
            resources.insert(
                name,
                ProgramResource {
                    type_token: decl.type_token.clone(),
                    properties,
                    options: ProgramOptions {
                        parent,
                        protect,
                        depends_on,
                    },
                },
            );
        }

        let outputs = self
            .exports()
            .iter()
            .map(|(name, r)| Ok((name.clone(), self.interpolate(r)?)))
            .collect::<Result<BTreeMap<_, _>, GraphError>>()?;

        Ok(Program {
            name: project.as_str().to_string(),
            runtime: "yaml".to_string(),
            description: description.map(str::to_string),
            resources,
            outputs,
        })
    }

    /// `protect` and `dependsOn` of a custom resource, including those set on
    /// enclosing components.
    ///
    /// A dependency on a component stands for every custom resource inside
    /// it.
    fn flattened_options(
        &self,
        id: ResourceId,
        decl: &ResourceDecl,
    ) -> Result<(bool, Vec<String>), GraphError> {
        let mut protect = decl.options.protect;
        let mut targets = decl.options.depends_on.clone();
        let mut parent = decl.options.parent;
        while let Some(p) = parent {
            let pdecl = self
                .get(p)
                .ok_or(GraphError::UnknownResource { index: p.index() })?;
            if pdecl.kind == ResourceKind::Component {
                protect |= pdecl.options.protect;
                targets.extend(pdecl.options.depends_on.iter().copied());
            }
            parent = pdecl.options.parent;
        }

        let mut depends_on = Vec::new();
        for target in targets {
            let members: Vec<ResourceId> = match self.kind_of(target)? {
                ResourceKind::Custom => vec![target],
                ResourceKind::Component => self
                    .resources()
                    .filter(|(member, m)| {
                        m.kind == ResourceKind::Custom && self.is_descendant(*member, target)
                    })
                    .map(|(member, _)| member)
                    .collect(),
            };
            for member in members {
                if member == id {
                    continue;
                }
                let reference = format!("${{{}}}", self.yaml_name(member)?);
                if !depends_on.contains(&reference) {
                    depends_on.push(reference);
                }
            }
        }
        Ok((protect, depends_on))
    }

    fn interpolate(&self, r: &OutputRef) -> Result<String, GraphError> {
        if self.kind_of(r.resource)? == ResourceKind::Component {
            return Err(GraphError::ComponentReference {
                name: self.yaml_name(r.resource)?,
                property: r.property.clone(),
            });
        }
        Ok(format!("${{{}.{}}}", self.yaml_name(r.resource)?, r.property))
    }

    fn yaml_name(&self, id: ResourceId) -> Result<String, GraphError> {
        self.qualified_name(id)
            .ok_or(GraphError::UnknownResource { index: id.index() })
    }

    fn kind_of(&self, id: ResourceId) -> Result<ResourceKind, GraphError> {
        self.get(id)
            .map(|decl| decl.kind)
            .ok_or(GraphError::UnknownResource { index: id.index() })
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
