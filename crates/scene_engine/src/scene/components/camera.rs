//! Camera component
//!
//! A Camera has no pose of its own. Its view is derived from the owning
//! GameObject's world matrix: it sits at the world position and looks along
//! `-forward` with the world up vector, right-handed.

use crate::foundation::math::{forward_of, position_of, up_of, Mat4, Point3};
use crate::scene::component::Component;
use crate::scene::fields::{FieldDescriptor, FieldError, FieldValue, Inspectable, WidgetKind};
use std::any::Any;

const CAMERA_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("fov", "Field of View", WidgetKind::Slider { min: 1.0, max: 179.0 }),
    FieldDescriptor::new("near", "Near Clip", WidgetKind::FloatField),
    FieldDescriptor::new("far", "Far Clip", WidgetKind::FloatField),
    FieldDescriptor::new("primary", "Primary", WidgetKind::Checkbox),
];

/// Perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping distance
    pub near: f32,
    /// Far clipping distance
    pub far: f32,
    /// Preferred by `Scene::find_camera` over non-primary cameras
    pub primary: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 90.0,
            near: 0.1,
            far: 1000.0,
            primary: false,
        }
    }
}

impl Camera {
    /// Registry kind tag
    pub const KIND: &'static str = "Camera";

    /// World-to-view matrix for a camera whose owner has `world` as world matrix
    pub fn view_matrix(&self, world: &Mat4) -> Mat4 {
        let eye = position_of(world);
        let target = eye - forward_of(world);
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up_of(world))
    }

    /// Right-handed perspective projection
    ///
    /// # Arguments
    /// * `aspect` - Viewport width divided by height
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::new_perspective(aspect, self.fov.to_radians(), self.near, self.far)
    }
}

impl Inspectable for Camera {
    fn field_descriptors(&self) -> &'static [FieldDescriptor] {
        CAMERA_FIELDS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "fov" => Some(FieldValue::Float(self.fov)),
            "near" => Some(FieldValue::Float(self.near)),
            "far" => Some(FieldValue::Float(self.far)),
            "primary" => Some(FieldValue::Bool(self.primary)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match (name, value) {
            ("fov", FieldValue::Float(fov)) => {
                if fov.is_nan() || fov <= 0.0 || fov >= 180.0 {
                    return Err(FieldError::invalid(name, "must be between 0 and 180 degrees"));
                }
                self.fov = fov;
            }
            ("near", FieldValue::Float(near)) => {
                if near <= 0.0 {
                    return Err(FieldError::invalid(name, "must be positive"));
                }
                self.near = near;
            }
            ("far", FieldValue::Float(far)) => {
                if far <= 0.0 {
                    return Err(FieldError::invalid(name, "must be positive"));
                }
                self.far = far;
            }
            ("primary", FieldValue::Bool(primary)) => self.primary = primary,
            (name, value) => return Err(FieldError::rejected(CAMERA_FIELDS, name, &value)),
        }
        Ok(())
    }
}

impl Component for Camera {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn allows_multiple(&self) -> bool {
        false
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
    use crate::foundation::math::{Pose, Vec3, Vec4};
    use approx::assert_relative_eq;

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let world = Pose::from_position(Vec3::new(1.0, 2.0, 3.0)).to_matrix();
        let view = Camera::default().view_matrix(&world);
        let eye = view * Vec4::new(1.0, 2.0, 3.0, 1.0);
        assert_relative_eq!(eye, Vec4::new(0.0, 0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_camera_looks_down_negative_forward() {
        let view = Camera::default().view_matrix(&Mat4::identity());
        // a point on -Z is in front of a right-handed camera
        let ahead = view * Vec4::new(0.0, 0.0, -5.0, 1.0);
        assert_relative_eq!(ahead.z, -5.0, epsilon = 1e-5);
    }

    #[test]
    fn test_rejects_bad_clip_planes() {
        let mut camera = Camera::default();
        assert!(camera.set_field("near", FieldValue::Float(0.0)).is_err());
        assert!(camera.set_field("fov", FieldValue::Float(180.0)).is_err());
        assert_eq!(camera, Camera::default());
    }
}
