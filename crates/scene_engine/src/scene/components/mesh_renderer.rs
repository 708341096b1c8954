//! Mesh renderer component

use crate::render::DrawCall;
use crate::scene::component::{Component, RenderContext};
use crate::scene::fields::{FieldDescriptor, FieldError, FieldValue, Inspectable, WidgetKind};
use crate::scene::reference::AssetRef;
use std::any::Any;

const MESH_RENDERER_FIELDS: &[FieldDescriptor] =
    &[FieldDescriptor::new("model", "Model", WidgetKind::AssetReference)];

/// Draws a model asset at the owner's world matrix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshRenderer {
    /// Model to draw; nothing is drawn while unset
    pub model: AssetRef,
}

impl MeshRenderer {
    /// Registry kind tag
    pub const KIND: &'static str = "MeshRenderer";

    /// Renderer for `model`
    pub const fn new(model: AssetRef) -> Self {
        Self { model }
    }
}

impl Inspectable for MeshRenderer {
    fn field_descriptors(&self) -> &'static [FieldDescriptor] {
        MESH_RENDERER_FIELDS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "model" => Some(FieldValue::Asset(self.model.guid())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match (name, value) {
            ("model", FieldValue::Asset(guid)) => {
                self.model = AssetRef(guid);
                Ok(())
            }
            (name, value) => Err(FieldError::rejected(MESH_RENDERER_FIELDS, name, &value)),
        }
    }
}

impl Component for MeshRenderer {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let Some(model) = self.model.guid() else {
            return;
        };
        ctx.renderer.draw(&DrawCall {
            owner: ctx.owner,
            model,
            model_matrix: ctx.world_matrix,
            view: ctx.frame.view,
            projection: ctx.frame.projection,
            lights: ctx.lights.to_vec(),
        });
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
