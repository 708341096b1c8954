//! Light component
//!
//! One type covers point, directional and spot lights; the kind selects
//! which parameters are shown and persisted. Lights do not register
//! themselves anywhere. The owning scene indexes them.

use crate::foundation::math::{forward_of, position_of, Color, Mat4};
use crate::scene::component::Component;
use crate::scene::fields::{FieldDescriptor, FieldError, FieldValue, Inspectable, WidgetKind};
use crate::scene::lighting::LightSample;
use crate::scene::GameObjectHandle;
use std::any::Any;

const BRIGHTNESS: FieldDescriptor = FieldDescriptor::new("brightness", "Brightness", WidgetKind::FloatField);
const COLOR: FieldDescriptor = FieldDescriptor::new("color", "Color", WidgetKind::ColorPicker);
const RANGE: FieldDescriptor = FieldDescriptor::new("range", "Range", WidgetKind::FloatField);
const ANGLE: FieldDescriptor = FieldDescriptor::new("angle", "Angle", WidgetKind::Slider { min: 1.0, max: 179.0 });
const SOFTNESS: FieldDescriptor = FieldDescriptor::new("softness", "Softness", WidgetKind::Slider { min: 0.0, max: 1.0 });

const DIRECTIONAL_FIELDS: &[FieldDescriptor] = &[BRIGHTNESS, COLOR];
const POINT_FIELDS: &[FieldDescriptor] = &[BRIGHTNESS, COLOR, RANGE];
const SPOT_FIELDS: &[FieldDescriptor] = &[BRIGHTNESS, COLOR, RANGE, ANGLE, SOFTNESS];

/// Light type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    /// Omnidirectional light with a range
    Point,
    /// Infinitely distant light, only direction matters
    Directional,
    /// Cone light
    Spot,
}

/// Light source component
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    kind: LightKind,
    /// Light color
    pub color: Color,
    /// Intensity multiplier
    pub brightness: f32,
    /// Reach, unused by directional lights
    pub range: f32,
    /// Spot cone angle in degrees
    pub angle: f32,
    /// Spot edge softness in `0..=1`
    pub softness: f32,
}

impl Light {
    /// Kind tag of point lights
    pub const POINT_KIND: &'static str = "PointLight";
    /// Kind tag of directional lights
    pub const DIRECTIONAL_KIND: &'static str = "DirectionalLight";
    /// Kind tag of spot lights
    pub const SPOT_KIND: &'static str = "SpotLight";

    fn with_kind(kind: LightKind, range: f32) -> Self {
        Self {
            kind,
            color: Color::WHITE,
            brightness: 1.0,
            range,
            angle: 30.0,
            softness: 0.5,
        }
    }

    /// Point light, range 10
    pub fn point() -> Self {
        Self::with_kind(LightKind::Point, 10.0)
    }

    /// Directional light
    pub fn directional() -> Self {
        Self::with_kind(LightKind::Directional, 0.0)
    }

    /// Spot light, range 4, 30 degree cone, softness 0.5
    pub fn spot() -> Self {
        Self::with_kind(LightKind::Spot, 4.0)
    }

    /// Light type
    pub const fn light_kind(&self) -> LightKind {
        self.kind
    }

    /// Resolve against the owner's world matrix; the light points along world forward
    pub fn sample(&self, owner: GameObjectHandle, world: &Mat4) -> LightSample {
        LightSample {
            owner,
            kind: self.kind,
            position: position_of(world),
            direction: forward_of(world),
            color: self.color,
            brightness: self.brightness,
            range: self.range,
            angle: self.angle,
            softness: self.softness,
        }
    }
}

impl Inspectable for Light {
    fn field_descriptors(&self) -> &'static [FieldDescriptor] {
        match self.kind {
            LightKind::Point => POINT_FIELDS,
            LightKind::Directional => DIRECTIONAL_FIELDS,
            LightKind::Spot => SPOT_FIELDS,
        }
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        if !self.field_descriptors().iter().any(|d| d.name == name) {
            return None;
        }
        match name {
            "brightness" => Some(FieldValue::Float(self.brightness)),
            "color" => Some(FieldValue::Color(self.color)),
            "range" => Some(FieldValue::Float(self.range)),
            "angle" => Some(FieldValue::Float(self.angle)),
            "softness" => Some(FieldValue::Float(self.softness)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        let fields = self.field_descriptors();
        if !fields.iter().any(|d| d.name == name) {
            return Err(FieldError::UnknownField(name.to_string()));
        }
        match (name, value) {
            ("brightness", FieldValue::Float(brightness)) => self.brightness = brightness,
            ("color", FieldValue::Color(color)) => self.color = color,
            ("range", FieldValue::Float(range)) => {
                if range < 0.0 {
                    return Err(FieldError::invalid(name, "must not be negative"));
                }
                self.range = range;
            }
            ("angle", FieldValue::Float(angle)) => self.angle = angle,
            ("softness", FieldValue::Float(softness)) => self.softness = softness.clamp(0.0, 1.0),
            (name, value) => return Err(FieldError::rejected(fields, name, &value)),
        }
        Ok(())
    }
}

impl Component for Light {
    fn kind(&self) -> &'static str {
        match self.kind {
            LightKind::Point => Self::POINT_KIND,
            LightKind::Directional => Self::DIRECTIONAL_KIND,
            LightKind::Spot => Self::SPOT_KIND,
        }
    }

    fn dispose(&mut self) {
        log::trace!("{} disposed", self.kind());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_defaults() {
        assert!((Light::point().range - 10.0).abs() < f32::EPSILON);
        let spot = Light::spot();
        assert!((spot.range - 4.0).abs() < f32::EPSILON);
        assert!((spot.angle - 30.0).abs() < f32::EPSILON);
        assert!((spot.softness - 0.5).abs() < f32::EPSILON);
        assert_eq!(Light::directional().color, Color::WHITE);
    }

    #[test]
    fn test_directional_has_no_range_field() {
        let mut light = Light::directional();
        assert_eq!(light.get_field("range"), None);
        assert_eq!(
            light.set_field("range", FieldValue::Float(3.0)),
            Err(FieldError::UnknownField("range".to_string()))
        );
        assert_eq!(light.serialized_fields().len(), 2);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(Light::point().kind(), "PointLight");
        assert_eq!(Light::directional().kind(), "DirectionalLight");
        assert_eq!(Light::spot().kind(), "SpotLight");
    }
}
