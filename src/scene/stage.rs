use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{Result, SceneMirrorError};

use super::prim_path::PrimPath;
use super::value::{Attribute, AttributeValue};

/// Relationship carrying a material binding.
pub const MATERIAL_BINDING: &str = "material:binding";

/// A node of the scene hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Prim {
    pub path: PrimPath,
    /// Schema type, e.g. `Mesh`, `Material`, `Shader`; empty for typeless prims
    pub type_name: String,
    pub api_schemas: Vec<String>,
    pub attributes: BTreeMap<String, Attribute>,
    pub relationships: BTreeMap<String, Vec<PrimPath>>,
    /// Child names in definition order
    pub children: Vec<String>,
}

impl Prim {
    fn new(path: PrimPath, type_name: &str) -> Self {
        Self {
            path,
            type_name: type_name.to_string(),
            api_schemas: Vec::new(),
            attributes: BTreeMap::new(),
            relationships: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn is_a(&self, type_name: &str) -> bool {
        self.type_name == type_name
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Authored value of an attribute, if any.
    pub fn value(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name).and_then(|a| a.value.as_ref())
    }

    pub fn relationship(&self, name: &str) -> Option<&[PrimPath]> {
        self.relationships.get(name).map(Vec::as_slice)
    }

    pub fn set_attribute(&mut self, name: &str, attribute: Attribute) {
        self.attributes.insert(name.to_string(), attribute);
    }

    pub fn apply_api_schema(&mut self, schema: &str) {
        if !self.api_schemas.iter().any(|s| s == schema) {
            self.api_schemas.push(schema.to_string());
        }
    }
}

/// Hierarchical store of typed prims the converter writes into.
///
/// This is the seam to the scene-graph engine; `MemoryStage` is the bundled
/// implementation.
pub trait SceneStage {
    fn prim(&self, path: &PrimPath) -> Option<&Prim>;

    fn prim_mut(&mut self, path: &PrimPath) -> Option<&mut Prim>;

    /// Define (or re-type) the prim at `path`, creating typeless ancestors.
    fn define_prim(&mut self, path: &PrimPath, type_name: &str) -> Result<&mut Prim>;

    /// Set `name` on the prim at `path`, which must already exist.
    fn set_attribute(&mut self, path: &PrimPath, name: &str, attribute: Attribute) -> Result<()> {
        let prim = self.prim_mut(path).ok_or_else(|| {
            SceneMirrorError::SceneState(format!("No prim at [{path}] to hold attribute [{name}]"))
        })?;
        prim.set_attribute(name, attribute);
        Ok(())
    }

    /// Bind the `Material` prim at `material` to the prim at `target`.
    fn bind_material(&mut self, target: &PrimPath, material: &PrimPath) -> Result<()> {
        match self.prim(material) {
            Some(prim) if prim.is_a("Material") => {}
            Some(prim) => {
                return Err(SceneMirrorError::SceneState(format!(
                    "Prim at [{material}] is a [{}], not a Material",
                    prim.type_name
                )));
            }
            None => {
                return Err(SceneMirrorError::SceneState(format!(
                    "No material prim at [{material}]"
                )));
            }
        }

        let prim = self.prim_mut(target).ok_or_else(|| {
            SceneMirrorError::SceneState(format!("No prim at [{target}] to bind [{material}]"))
        })?;
        prim.apply_api_schema("MaterialBindingAPI");
        prim.relationships
            .insert(MATERIAL_BINDING.to_string(), vec![material.clone()]);
        Ok(())
    }
}

/// In-memory scene stage keyed by prim path.
#[derive(Debug, Clone)]
pub struct MemoryStage {
    prims: HashMap<PrimPath, Prim>,
}

impl Default for MemoryStage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStage {
    pub fn new() -> Self {
        let mut prims = HashMap::new();
        prims.insert(PrimPath::root(), Prim::new(PrimPath::root(), ""));
        Self { prims }
    }

    /// Number of prims, excluding the pseudo-root.
    pub fn len(&self) -> usize {
        self.prims.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pseudo_root(&self) -> &Prim {
        &self.prims[&PrimPath::root()]
    }

    /// Direct children of `path` in definition order.
    pub fn children(&self, path: &PrimPath) -> Vec<&Prim> {
        let Some(prim) = self.prims.get(path) else {
            return Vec::new();
        };
        prim.children
            .iter()
            .filter_map(|name| path.child(name).ok())
            .filter_map(|child| self.prims.get(&child))
            .collect()
    }

    /// All prims of the given schema type, sorted by path.
    pub fn prims_of_type(&self, type_name: &str) -> Vec<&Prim> {
        let mut prims: Vec<&Prim> = self.prims.values().filter(|p| p.is_a(type_name)).collect();
        prims.sort_by(|a, b| a.path.cmp(&b.path));
        prims
    }
}

impl SceneStage for MemoryStage {
    fn prim(&self, path: &PrimPath) -> Option<&Prim> {
        self.prims.get(path)
    }

    fn prim_mut(&mut self, path: &PrimPath) -> Option<&mut Prim> {
        self.prims.get_mut(path)
    }

    fn define_prim(&mut self, path: &PrimPath, type_name: &str) -> Result<&mut Prim> {
        if path.is_root() {
            return Err(SceneMirrorError::SceneState(
                "The pseudo-root cannot be defined".into(),
            ));
        }

        // Walk up until an existing ancestor, then create the missing chain top-down.
        let mut missing = Vec::new();
        let mut cursor = path.clone();
        while !self.prims.contains_key(&cursor) {
            let parent = cursor.parent().unwrap_or_else(PrimPath::root);
            missing.push(cursor);
            cursor = parent;
        }

        for created in missing.into_iter().rev() {
            let parent = created.parent().unwrap_or_else(PrimPath::root);
            if let Some(parent_prim) = self.prims.get_mut(&parent) {
                parent_prim.children.push(created.name().to_string());
            }
            debug!(path = %created, "Defined prim");
            self.prims.insert(created.clone(), Prim::new(created, ""));
        }

        let prim = self
            .prims
            .get_mut(path)
            .ok_or_else(|| SceneMirrorError::SceneState(format!("Failed to define [{path}]")))?;
        prim.type_name = type_name.to_string();
        Ok(prim)
    }
}
