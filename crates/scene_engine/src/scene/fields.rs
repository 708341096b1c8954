//! Field-descriptor tables
//!
//! Every component publishes a static table of the fields an inspector may
//! show and a serializer may persist, plus a getter and setter keyed by
//! field name. The table replaces attribute reflection: nothing is
//! discovered at runtime, the component author lists the fields.

use crate::assets::AssetGuid;
use crate::foundation::math::{Color, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::GameObjectId;

/// A dynamically typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point scalar
    Float(f32),
    /// 3D vector
    Vec3(Vec3),
    /// RGBA color
    Color(Color),
    /// Free text
    Text(String),
    /// Reference to another GameObject by stable id
    GameObject(Option<GameObjectId>),
    /// Reference to an external asset by GUID
    Asset(Option<AssetGuid>),
}

impl FieldValue {
    /// Short type name used in error messages
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Vec3(_) => "vec3",
            Self::Color(_) => "color",
            Self::Text(_) => "text",
            Self::GameObject(_) => "game object",
            Self::Asset(_) => "asset",
        }
    }
}

/// Editor widget used to display a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetKind {
    /// Toggle box
    Checkbox,
    /// Integer input
    IntegerField,
    /// Float input
    FloatField,
    /// Float slider with bounds
    Slider {
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },
    /// Three float inputs
    Vector3,
    /// Color picker
    ColorPicker,
    /// Text input
    TextField,
    /// Drop target for a GameObject from the hierarchy
    ObjectReference,
    /// Drop target for an asset from the project browser
    AssetReference,
}

impl WidgetKind {
    /// Name of the [`FieldValue`] variant this widget edits
    pub const fn value_type(&self) -> &'static str {
        match self {
            Self::Checkbox => "bool",
            Self::IntegerField => "int",
            Self::FloatField | Self::Slider { .. } => "float",
            Self::Vector3 => "vec3",
            Self::ColorPicker => "color",
            Self::TextField => "text",
            Self::ObjectReference => "game object",
            Self::AssetReference => "asset",
        }
    }
}

/// One row of a component's field table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    /// Key used by `get_field`/`set_field` and in scene files
    pub name: &'static str,
    /// Inspector label
    pub label: &'static str,
    /// Inspector widget
    pub widget: WidgetKind,
    /// Whether the field is written to scene files
    pub serialized: bool,
}

impl FieldDescriptor {
    /// A persisted field
    pub const fn new(name: &'static str, label: &'static str, widget: WidgetKind) -> Self {
        Self {
            name,
            label,
            widget,
            serialized: true,
        }
    }

    /// Same field, shown in the inspector but never persisted
    pub const fn transient(self) -> Self {
        Self {
            serialized: false,
            ..self
        }
    }
}

/// Errors from `set_field`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// No field with this name
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Value variant does not match the field's widget
    #[error("field '{field}' expects {expected}, got {found}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Expected value type
        expected: &'static str,
        /// Supplied value type
        found: &'static str,
    },

    /// Value has the right type but is out of range
    #[error("invalid value for field '{field}': {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Why it was rejected
        reason: String,
    },
}

impl FieldError {
    /// Error for a `(name, value)` pair a setter did not accept.
    ///
    /// Unknown names give `UnknownField`; known names give `TypeMismatch`
    /// against the descriptor's widget type.
    pub fn rejected(descriptors: &[FieldDescriptor], name: &str, value: &FieldValue) -> Self {
        descriptors
            .iter()
            .find(|descriptor| descriptor.name == name)
            .map_or_else(
                || Self::UnknownField(name.to_string()),
                |descriptor| Self::TypeMismatch {
                    field: name.to_string(),
                    expected: descriptor.widget.value_type(),
                    found: value.type_name(),
                },
            )
    }

    /// `InvalidValue` shorthand
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Explicit field table for editor display and persistence
pub trait Inspectable {
    /// Static field table
    fn field_descriptors(&self) -> &'static [FieldDescriptor];

    /// Read a field by name
    fn get_field(&self, name: &str) -> Option<FieldValue>;

    /// Write a field by name
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError>;

    /// Current values of every persisted field, keyed by name
    fn serialized_fields(&self) -> BTreeMap<String, FieldValue> {
        self.field_descriptors()
            .iter()
            .filter(|descriptor| descriptor.serialized)
            .filter_map(|descriptor| {
                self.get_field(descriptor.name)
                    .map(|value| (descriptor.name.to_string(), value))
            })
            .collect()
    }

    /// Apply a persisted field map; stops at the first rejected field
    fn apply_fields(&mut self, fields: &BTreeMap<String, FieldValue>) -> Result<(), FieldError> {
        for (name, value) in fields {
            self.set_field(name, value.clone())?;
        }
        Ok(())
    }
}
