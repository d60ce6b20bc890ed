//! Model schema types.
//!
//! A [`ModelSchema`] describes one data model class: its name, the namespace
//! it was declared in, its properties in declaration order, and its methods.
//! Schemas are produced by a schema provider and are immutable once built.

use crate::errors::GenerationError;
use crate::types::{resolve_type, ResolvedType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Structural description of a model class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    /// Class name.
    pub name: String,
    /// Namespace the class was declared in. Empty if unknown.
    #[serde(default)]
    pub namespace: String,
    /// Properties in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    /// Methods declared on the class.
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ModelSchema {
    /// Create a schema with no members.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add a property, resolving its raw type.
    pub fn with_property(mut self, name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        self.properties.push(PropertyDescriptor::new(name, raw_type));
        self
    }

    /// Add a method.
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Public methods, in declaration order.
    pub fn public_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(|m| m.is_public)
    }

    /// Check that every name is a usable identifier and property names are unique.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !is_identifier(&self.name) {
            return Err(GenerationError::InvalidSchema(format!(
                "'{}' is not a valid class name",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if !is_identifier(property.name()) {
                return Err(GenerationError::InvalidSchema(format!(
                    "{}: '{}' is not a valid property name",
                    self.name,
                    property.name()
                )));
            }
            if !seen.insert(property.name()) {
                return Err(GenerationError::InvalidSchema(format!(
                    "{}: duplicate property '{}'",
                    self.name,
                    property.name()
                )));
            }
        }

        for method in &self.methods {
            if !is_identifier(&method.name) {
                return Err(GenerationError::InvalidSchema(format!(
                    "{}: '{}' is not a valid method name",
                    self.name, method.name
                )));
            }
        }

        Ok(())
    }
}

/// One property of a model class.
///
/// The resolved type information is computed from the raw type when the
/// descriptor is built and cannot change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PropertyDefinition", into = "PropertyDefinition")]
pub struct PropertyDescriptor {
    name: String,
    raw_type: String,
    resolved: ResolvedType,
}

impl PropertyDescriptor {
    /// Build a descriptor, resolving `raw_type`.
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        let raw_type = raw_type.into();
        let resolved = resolve_type(&raw_type);
        Self {
            name: name.into(),
            raw_type,
            resolved,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    pub fn canonical_type(&self) -> &str {
        &self.resolved.canonical
    }

    pub fn is_nullable(&self) -> bool {
        self.resolved.nullable
    }

    pub fn is_value_type(&self) -> bool {
        self.resolved.value_type
    }

    pub fn resolved(&self) -> &ResolvedType {
        &self.resolved
    }

    /// Type spelling for generated declarations.
    pub fn source_type(&self) -> String {
        self.resolved.source_name()
    }
}

/// Serialized form of a property: just its name and raw type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PropertyDefinition {
    name: String,
    #[serde(rename = "type")]
    raw_type: String,
}

impl From<PropertyDefinition> for PropertyDescriptor {
    fn from(def: PropertyDefinition) -> Self {
        PropertyDescriptor::new(def.name, def.raw_type)
    }
}

impl From<PropertyDescriptor> for PropertyDefinition {
    fn from(desc: PropertyDescriptor) -> Self {
        PropertyDefinition {
            name: desc.name,
            raw_type: desc.raw_type,
        }
    }
}

/// A method declared on a model class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Positional parameters.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Whether the method is publicly accessible.
    #[serde(default = "default_true")]
    pub is_public: bool,
}

impl MethodDescriptor {
    /// Public method with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            is_public: true,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        self.parameters.push(ParameterDescriptor {
            name: name.into(),
            raw_type: raw_type.into(),
        });
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Raw type descriptor.
    #[serde(rename = "type")]
    pub raw_type: String,
}

impl ParameterDescriptor {
    pub fn resolved(&self) -> ResolvedType {
        resolve_type(&self.raw_type)
    }
}

fn default_true() -> bool {
    true
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}
