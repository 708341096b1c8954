//! Component registry
//!
//! Maps a kind tag to a factory. The "add component" menu enumerates
//! [`ComponentRegistry::kinds`] and scene loading creates components from
//! the tags stored in files; nothing is discovered by scanning types.

use super::component::Component;
use super::components::{Camera, Light, MeshRenderer, Mover, Spinner};
use log::debug;
use std::collections::HashMap;
use std::fmt;

type Factory = Box<dyn Fn() -> Box<dyn Component>>;

/// One registered component kind
pub struct ComponentDescriptor {
    /// Kind tag stored in scene files
    pub kind: &'static str,
    /// Menu label
    pub display_name: &'static str,
    factory: Factory,
}

impl ComponentDescriptor {
    /// Construct a default instance
    pub fn create(&self) -> Box<dyn Component> {
        (self.factory)()
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("kind", &self.kind)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// Kind tag -> factory table
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    descriptors: Vec<ComponentDescriptor>,
    by_kind: HashMap<&'static str, usize>,
}

impl ComponentRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in component
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Camera::KIND, "Camera", || Box::new(Camera::default()));
        registry.register(Light::POINT_KIND, "Point Light", || Box::new(Light::point()));
        registry.register(Light::DIRECTIONAL_KIND, "Directional Light", || {
            Box::new(Light::directional())
        });
        registry.register(Light::SPOT_KIND, "Spot Light", || Box::new(Light::spot()));
        registry.register(MeshRenderer::KIND, "Mesh Renderer", || {
            Box::new(MeshRenderer::default())
        });
        registry.register(Spinner::KIND, "Spinner", || Box::new(Spinner::default()));
        registry.register(Mover::KIND, "Mover", || Box::new(Mover::default()));
        registry
    }

    /// Add a kind; registering an existing tag replaces its factory in place
    pub fn register<F>(&mut self, kind: &'static str, display_name: &'static str, factory: F)
    where
        F: Fn() -> Box<dyn Component> + 'static,
    {
        let descriptor = ComponentDescriptor {
            kind,
            display_name,
            factory: Box::new(factory),
        };
        if let Some(&index) = self.by_kind.get(kind) {
            debug!("Replacing component kind '{kind}'");
            self.descriptors[index] = descriptor;
        } else {
            self.by_kind.insert(kind, self.descriptors.len());
            self.descriptors.push(descriptor);
        }
    }

    /// Construct a component by tag
    pub fn create(&self, kind: &str) -> Option<Box<dyn Component>> {
        self.descriptor(kind).map(ComponentDescriptor::create)
    }

    /// Descriptor by tag
    pub fn descriptor(&self, kind: &str) -> Option<&ComponentDescriptor> {
        self.by_kind.get(kind).map(|&index| &self.descriptors[index])
    }

    /// Whether the tag is registered
    pub fn contains(&self, kind: &str) -> bool {
        self.by_kind.contains_key(kind)
    }

    /// Registered kinds in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.descriptors.iter()
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_in_menu_order() {
        let registry = ComponentRegistry::with_builtins();
        let kinds: Vec<_> = registry.kinds().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            [
                "Camera",
                "PointLight",
                "DirectionalLight",
                "SpotLight",
                "MeshRenderer",
                "Spinner",
                "Mover"
            ]
        );
        assert!(!registry.contains("Transform"));
    }

    #[test]
    fn test_create_by_kind() {
        let registry = ComponentRegistry::with_builtins();
        let light = registry.create("SpotLight").unwrap();
        assert_eq!(light.kind(), "SpotLight");
        assert!(registry.create("Teapot").is_none());
    }

    #[test]
    fn test_register_replaces_existing_kind() {
        let mut registry = ComponentRegistry::with_builtins();
        let before = registry.len();
        registry.register(Spinner::KIND, "Fast Spinner", || {
            Box::new(Spinner {
                degrees_per_second: 90.0,
            })
        });
        assert_eq!(registry.len(), before);
        let spinner = registry.create("Spinner").unwrap();
        let spinner = spinner.as_any().downcast_ref::<Spinner>().unwrap();
        assert!((spinner.degrees_per_second - 90.0).abs() < f32::EPSILON);
    }
}
