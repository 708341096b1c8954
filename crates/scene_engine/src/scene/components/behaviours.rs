//! Simple scripted behaviours
//!
//! Small update-driven components used by demo scenes and by the play-mode
//! tests to produce observable simulation state.

use crate::foundation::math::Vec3;
use crate::scene::component::{Component, UpdateContext};
use crate::scene::fields::{FieldDescriptor, FieldError, FieldValue, Inspectable, WidgetKind};
use std::any::Any;

const SPINNER_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::new(
    "degrees_per_second",
    "Degrees / Second",
    WidgetKind::FloatField,
)];

const MOVER_FIELDS: &[FieldDescriptor] =
    &[FieldDescriptor::new("velocity", "Velocity", WidgetKind::Vector3)];

/// Spins its owner about local Y
#[derive(Debug, Clone, PartialEq)]
pub struct Spinner {
    /// Angular speed
    pub degrees_per_second: f32,
}

impl Spinner {
    /// Registry kind tag
    pub const KIND: &'static str = "Spinner";
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            degrees_per_second: 10.0,
        }
    }
}

impl Inspectable for Spinner {
    fn field_descriptors(&self) -> &'static [FieldDescriptor] {
        SPINNER_FIELDS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        (name == "degrees_per_second").then_some(FieldValue::Float(self.degrees_per_second))
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match (name, value) {
            ("degrees_per_second", FieldValue::Float(speed)) => {
                self.degrees_per_second = speed;
                Ok(())
            }
            (name, value) => Err(FieldError::rejected(SPINNER_FIELDS, name, &value)),
        }
    }
}

impl Component for Spinner {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let step = self.degrees_per_second * ctx.delta_time;
        ctx.transform.rotate_local(Vec3::new(0.0, step, 0.0));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Translates its owner at a constant local velocity
#[derive(Debug, Clone, PartialEq)]
pub struct Mover {
    /// Units per second in parent space
    pub velocity: Vec3,
}

impl Mover {
    /// Registry kind tag
    pub const KIND: &'static str = "Mover";
}

impl Default for Mover {
    fn default() -> Self {
        Self {
            velocity: Vec3::new(0.0, 0.0, -1.0),
        }
    }
}

impl Inspectable for Mover {
    fn field_descriptors(&self) -> &'static [FieldDescriptor] {
        MOVER_FIELDS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        (name == "velocity").then_some(FieldValue::Vec3(self.velocity))
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match (name, value) {
            ("velocity", FieldValue::Vec3(velocity)) => {
                self.velocity = velocity;
                Ok(())
            }
            (name, value) => Err(FieldError::rejected(MOVER_FIELDS, name, &value)),
        }
    }
}

impl Component for Mover {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        ctx.transform.translate(self.velocity * ctx.delta_time);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
