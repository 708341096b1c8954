//! Scene model
//!
//! GameObjects with a Transform hierarchy and pluggable components, owned by
//! a [`Scene`] that dispatches start/update/render and applies deferred
//! structural edits between passes.

mod commands;
mod component;
pub mod components;
mod error;
mod fields;
mod game_object;
mod ids;
mod lighting;
mod reference;
mod registry;
mod scene_graph;
mod transform;

pub use commands::{FlushReport, SceneCommand, SceneCommands};
pub use component::{AttachedComponent, Component, RenderContext, UpdateContext};
pub use error::SceneError;
pub use fields::{FieldDescriptor, FieldError, FieldValue, Inspectable, WidgetKind};
pub use game_object::GameObject;
pub use ids::{ComponentId, GameObjectHandle, GameObjectId, ObjectKey, SceneId};
pub use lighting::{LightIndex, LightSample};
pub use reference::{AssetRef, GameObjectRef};
pub use registry::{ComponentDescriptor, ComponentRegistry};
pub use scene_graph::{RemovalPolicy, Scene};
pub use transform::Transform;
