//! Transform component
//!
//! Local pose plus navigation links. Links are handles into the owning
//! scene's arena; the Transform never owns its parent or children, and only
//! the scene rewrites the links so `children` and each child's `parent`
//! stay mutually consistent.
//!
//! Every GameObject has exactly one Transform, held outside its component
//! list and addressed as [`ComponentId::TRANSFORM`](super::ComponentId::TRANSFORM).
//! It has no lifecycle hooks, so it implements [`Inspectable`] but not
//! `Component`.

use super::fields::{FieldDescriptor, FieldError, FieldValue, Inspectable, WidgetKind};
use super::GameObjectHandle;
use crate::foundation::math::{quat_from_euler_degrees, Mat4, Pose, Quat, Vec3};

const TRANSFORM_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("position", "Position", WidgetKind::Vector3).transient(),
    FieldDescriptor::new("rotation", "Rotation", WidgetKind::Vector3).transient(),
    FieldDescriptor::new("scale", "Scale", WidgetKind::Vector3).transient(),
];

/// Spatial component present on every GameObject
#[derive(Debug, Clone)]
pub struct Transform {
    local: Pose,
    owner: GameObjectHandle,
    parent: Option<GameObjectHandle>,
    children: Vec<GameObjectHandle>,
}

impl Transform {
    pub(crate) fn new(owner: GameObjectHandle) -> Self {
        Self {
            local: Pose::identity(),
            owner,
            parent: None,
            children: Vec::new(),
        }
    }

    /// GameObject this Transform belongs to
    pub const fn owner(&self) -> GameObjectHandle {
        self.owner
    }

    /// Parent Transform's owner, `None` for a root
    pub const fn parent(&self) -> Option<GameObjectHandle> {
        self.parent
    }

    /// Children in order
    pub fn children(&self) -> &[GameObjectHandle] {
        &self.children
    }

    /// Whether this Transform has no parent
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Local pose
    pub const fn local_pose(&self) -> &Pose {
        &self.local
    }

    /// Replace the local pose
    pub fn set_local_pose(&mut self, pose: Pose) {
        self.local = pose;
    }

    /// Local position
    pub const fn local_position(&self) -> Vec3 {
        self.local.position
    }

    /// Set local position
    pub fn set_local_position(&mut self, position: Vec3) {
        self.local.position = position;
    }

    /// Local rotation
    pub const fn local_rotation(&self) -> Quat {
        self.local.rotation
    }

    /// Set local rotation
    pub fn set_local_rotation(&mut self, rotation: Quat) {
        self.local.rotation = rotation;
    }

    /// Local scale
    pub const fn local_scale(&self) -> Vec3 {
        self.local.scale
    }

    /// Set local scale
    pub fn set_local_scale(&mut self, scale: Vec3) {
        self.local.scale = scale;
    }

    /// Local rotation as Euler angles in degrees (roll, pitch, yaw)
    pub fn local_euler_angles(&self) -> Vec3 {
        self.local.euler_degrees()
    }

    /// Set local rotation from Euler angles in degrees
    pub fn set_local_euler_angles(&mut self, degrees: Vec3) {
        self.local.set_euler_degrees(degrees);
    }

    /// Move by `delta` in parent space
    pub fn translate(&mut self, delta: Vec3) {
        self.local.position += delta;
    }

    /// Rotate by Euler `degrees` applied after the current rotation
    pub fn rotate_local(&mut self, degrees: Vec3) {
        self.local.rotation *= quat_from_euler_degrees(degrees);
    }

    /// Local T*R*S matrix
    pub fn local_matrix(&self) -> Mat4 {
        self.local.to_matrix()
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<GameObjectHandle>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: GameObjectHandle) {
        self.children.push(child);
    }

    pub(crate) fn insert_children(&mut self, index: usize, children: &[GameObjectHandle]) {
        let index = index.min(self.children.len());
        self.children.splice(index..index, children.iter().copied());
    }

    /// Unlink `child`, returning the slot it occupied
    pub(crate) fn remove_child(&mut self, child: GameObjectHandle) -> Option<usize> {
        let index = self.children.iter().position(|c| *c == child)?;
        self.children.remove(index);
        Some(index)
    }

    pub(crate) fn take_children(&mut self) -> Vec<GameObjectHandle> {
        std::mem::take(&mut self.children)
    }
}

impl Inspectable for Transform {
    fn field_descriptors(&self) -> &'static [FieldDescriptor] {
        TRANSFORM_FIELDS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "position" => Some(FieldValue::Vec3(self.local.position)),
            "rotation" => Some(FieldValue::Vec3(self.local_euler_angles())),
            "scale" => Some(FieldValue::Vec3(self.local.scale)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match (name, value) {
            ("position", FieldValue::Vec3(position)) => self.local.position = position,
            ("rotation", FieldValue::Vec3(degrees)) => self.set_local_euler_angles(degrees),
            ("scale", FieldValue::Vec3(scale)) => self.local.scale = scale,
            (name, value) => return Err(FieldError::rejected(TRANSFORM_FIELDS, name, &value)),
        }
        Ok(())
    }
}
