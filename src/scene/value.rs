use std::collections::BTreeMap;

use glam::{Vec2, Vec3};

use super::prim_path::PrimPath;

/// Typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Token(String),
    Asset(String),
    Float3(Vec3),
    Color3f(Vec3),

    IntArray(Vec<i32>),
    Float3Array(Vec<Vec3>),
    Point3fArray(Vec<Vec3>),
    Normal3fArray(Vec<Vec3>),
    TexCoord2fArray(Vec<Vec2>),
    TokenArray(Vec<String>),
}

impl AttributeValue {
    /// Scene-description type name of the value.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Int(_) => "int",
            AttributeValue::Float(_) => "float",
            AttributeValue::Token(_) => "token",
            AttributeValue::Asset(_) => "asset",
            AttributeValue::Float3(_) => "float3",
            AttributeValue::Color3f(_) => "color3f",
            AttributeValue::IntArray(_) => "int[]",
            AttributeValue::Float3Array(_) => "float3[]",
            AttributeValue::Point3fArray(_) => "point3f[]",
            AttributeValue::Normal3fArray(_) => "normal3f[]",
            AttributeValue::TexCoord2fArray(_) => "texCoord2f[]",
            AttributeValue::TokenArray(_) => "token[]",
        }
    }
}

/// How a primvar is interpolated across a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Vertex,
}

impl Interpolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpolation::Vertex => "vertex",
        }
    }
}

/// Authoring metadata carried by an attribute (UI hints and custom data).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMetadata {
    pub custom_data: BTreeMap<String, AttributeValue>,
    pub display_name: Option<String>,
    pub display_group: Option<String>,
    pub documentation: Option<String>,
    pub color_space: Option<String>,
}

/// Connection from an attribute to another prim's attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub prim: PrimPath,
    pub attribute: String,
}

/// One attribute on a prim.
///
/// Output terminals are declared with a type but no value and may carry a
/// connection instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub type_name: String,
    pub value: Option<AttributeValue>,
    pub uniform: bool,
    pub interpolation: Option<Interpolation>,
    pub connection: Option<Connection>,
    pub metadata: AttributeMetadata,
}

impl Attribute {
    pub fn new(value: AttributeValue) -> Self {
        Self {
            type_name: value.type_name().to_string(),
            value: Some(value),
            uniform: false,
            interpolation: None,
            connection: None,
            metadata: AttributeMetadata::default(),
        }
    }

    /// Uniform (non time-varying) attribute.
    pub fn uniform(value: AttributeValue) -> Self {
        Self {
            uniform: true,
            ..Self::new(value)
        }
    }

    /// Declared attribute without an authored value.
    pub fn declared(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            value: None,
            uniform: false,
            interpolation: None,
            connection: None,
            metadata: AttributeMetadata::default(),
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = Some(interpolation);
        self
    }

    pub fn connected_to(mut self, prim: PrimPath, attribute: &str) -> Self {
        self.connection = Some(Connection {
            prim,
            attribute: attribute.to_string(),
        });
        self
    }
}
