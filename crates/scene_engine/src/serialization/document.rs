//! Format-independent scene records

use super::SerializationError;
use crate::foundation::math::{Pose, Quat, Vec3};
use crate::scene::{Component, ComponentRegistry, FieldValue, GameObjectId, Scene, SceneError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

/// Current document version
pub const FORMAT_VERSION: u32 = 1;

/// A whole scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Written as [`FORMAT_VERSION`]
    pub format_version: u32,
    /// Every GameObject in scene insertion order
    pub game_objects: Vec<GameObjectRecord>,
}

/// One GameObject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObjectRecord {
    /// Stable id
    pub id: GameObjectId,
    /// Display name
    pub name: String,
    /// Enabled flag
    pub enabled: bool,
    /// Local pose and child list
    pub transform: TransformRecord,
    /// Components in dispatch order
    pub components: Vec<ComponentRecord>,
}

/// Local pose plus ordered child ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    /// Local position
    pub position: Vec3,
    /// Local rotation
    pub rotation: Quat,
    /// Local scale
    pub scale: Vec3,
    /// Children in order
    pub children: Vec<GameObjectId>,
}

/// One component's kind tag and persisted fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Registry kind tag
    pub kind: String,
    /// Fields marked `serialized`, sorted by name
    pub fields: BTreeMap<String, FieldValue>,
}

impl SceneDocument {
    /// Record the persisted state of `scene`
    pub fn capture(scene: &Scene) -> Self {
        let game_objects = scene
            .game_objects()
            .map(|object| {
                let transform = object.transform();
                let pose = transform.local_pose();
                GameObjectRecord {
                    id: object.id(),
                    name: object.name.clone(),
                    enabled: object.enabled,
                    transform: TransformRecord {
                        position: pose.position,
                        rotation: pose.rotation,
                        scale: pose.scale,
                        children: transform
                            .children()
                            .iter()
                            .filter_map(|child| scene.game_object(*child).map(|c| c.id()))
                            .collect(),
                    },
                    components: object
                        .components()
                        .iter()
                        .map(|attached| ComponentRecord {
                            kind: attached.kind().to_string(),
                            fields: attached.component().serialized_fields(),
                        })
                        .collect(),
                }
            })
            .collect();
        Self {
            format_version: FORMAT_VERSION,
            game_objects,
        }
    }

    /// Validate the whole document, then build a scene from it
    ///
    /// No scene is constructed until every record has been checked, so a
    /// malformed document never yields a partial scene.
    pub fn build(&self, registry: Rc<ComponentRegistry>) -> Result<Scene, SerializationError> {
        if self.format_version != FORMAT_VERSION {
            return Err(SerializationError::UnsupportedVersion(self.format_version));
        }
        self.validate_hierarchy()?;
        let components = self.instantiate_components(&registry)?;

        let mut scene = Scene::with_registry(registry);
        for (record, components) in self.game_objects.iter().zip(components) {
            let object = scene.add_game_object_with_id(record.id, record.name.clone())?;
            object.enabled = record.enabled;
            object.transform_mut().set_local_pose(Pose::new(
                record.transform.position,
                record.transform.rotation,
                record.transform.scale,
            ));
            for component in components {
                object.add_boxed_component(component)?;
            }
        }
        for record in &self.game_objects {
            let Some(parent) = scene.find_game_object(record.id) else {
                continue;
            };
            for child_id in &record.transform.children {
                if let Some(child) = scene.find_game_object(*child_id) {
                    scene.set_parent(child, Some(parent))?;
                }
            }
        }

        let cleared = scene.sweep_object_references();
        if cleared > 0 {
            debug!("Cleared {cleared} dangling object references while loading");
        }
        Ok(scene)
    }

    fn validate_hierarchy(&self) -> Result<(), SerializationError> {
        let mut ids = HashSet::with_capacity(self.game_objects.len());
        for record in &self.game_objects {
            if !ids.insert(record.id) {
                return Err(SerializationError::DuplicateId(record.id));
            }
        }

        let mut parent_of: HashMap<GameObjectId, GameObjectId> = HashMap::new();
        for record in &self.game_objects {
            for child in &record.transform.children {
                if !ids.contains(child) {
                    return Err(SerializationError::UnknownChild {
                        parent: record.id,
                        child: *child,
                    });
                }
                if parent_of.insert(*child, record.id).is_some() {
                    return Err(SerializationError::ChildListedTwice(*child));
                }
            }
        }

        // every node has at most one parent, so walking up either reaches a
        // root or revisits a node within `len` steps
        for record in &self.game_objects {
            let mut current = record.id;
            let mut steps = 0;
            while let Some(parent) = parent_of.get(&current) {
                steps += 1;
                if *parent == record.id || steps > self.game_objects.len() {
                    return Err(SerializationError::CyclicHierarchy(record.id));
                }
                current = *parent;
            }
        }
        Ok(())
    }

    fn instantiate_components(
        &self,
        registry: &ComponentRegistry,
    ) -> Result<Vec<Vec<Box<dyn Component>>>, SerializationError> {
        let mut per_object = Vec::with_capacity(self.game_objects.len());
        for record in &self.game_objects {
            let mut instances = Vec::with_capacity(record.components.len());
            for component in &record.components {
                let mut instance = registry
                    .create(&component.kind)
                    .ok_or_else(|| SerializationError::UnknownComponentKind(component.kind.clone()))?;
                instance
                    .apply_fields(&component.fields)
                    .map_err(|source| SerializationError::Field {
                        kind: component.kind.clone(),
                        source,
                    })?;
                let kind = instance.kind();
                if !instance.allows_multiple() && instances.iter().any(|other: &Box<dyn Component>| other.kind() == kind) {
                    return Err(SceneError::DuplicateComponent { kind }.into());
                }
                instances.push(instance);
            }
            per_object.push(instances);
        }
        Ok(per_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::components::{Camera, Light};

    fn registry() -> Rc<ComponentRegistry> {
        Rc::new(ComponentRegistry::with_builtins())
    }

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let root = scene.add_named_game_object("Root").handle();
        let child = scene.add_named_game_object("Child").handle();
        scene
            .game_object_mut(child)
            .unwrap()
            .add_component_with(Light::spot())
            .unwrap();
        scene
            .game_object_mut(root)
            .unwrap()
            .add_component::<Camera>()
            .unwrap();
        scene.set_parent(child, Some(root)).unwrap();
        scene
    }

    #[test]
    fn test_capture_then_build_preserves_document() {
        let scene = sample_scene();
        let document = SceneDocument::capture(&scene);
        let rebuilt = document.build(registry()).unwrap();
        assert_eq!(SceneDocument::capture(&rebuilt), document);
    }

    #[test]
    fn test_rejects_future_version() {
        let mut document = SceneDocument::capture(&sample_scene());
        document.format_version = 2;
        assert!(matches!(
            document.build(registry()),
            Err(SerializationError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_rejects_cycle() {
        let mut document = SceneDocument::capture(&sample_scene());
        let root = document.game_objects[0].id;
        document.game_objects[1].transform.children.push(root);
        assert!(matches!(
            document.build(registry()),
            Err(SerializationError::CyclicHierarchy(_))
        ));
    }

    #[test]
    fn test_rejects_child_listed_twice() {
        let mut document = SceneDocument::capture(&sample_scene());
        let child = document.game_objects[1].id;
        document.game_objects[0].transform.children.push(child);
        assert!(matches!(
            document.build(registry()),
            Err(SerializationError::ChildListedTwice(id)) if id == child
        ));
    }

    #[test]
    fn test_rejects_unknown_kind_and_bad_field() {
        let mut document = SceneDocument::capture(&sample_scene());
        document.game_objects[0].components[0].kind = "Teapot".to_string();
        assert!(matches!(
            document.build(registry()),
            Err(SerializationError::UnknownComponentKind(kind)) if kind == "Teapot"
        ));

        let mut document = SceneDocument::capture(&sample_scene());
        document.game_objects[0].components[0]
            .fields
            .insert("fov".to_string(), FieldValue::Bool(true));
        assert!(matches!(
            document.build(registry()),
            Err(SerializationError::Field { .. })
        ));
    }
}
