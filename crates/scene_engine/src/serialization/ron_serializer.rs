//! RON scene serializer

use super::{SceneDocument, SceneSerializer, SerializationError};
use crate::config::SerializationConfig;
use crate::scene::{ComponentRegistry, Scene};
use ron::ser::PrettyConfig;
use std::rc::Rc;

/// Writes scenes as RON text
#[derive(Debug, Clone)]
pub struct RonSceneSerializer {
    registry: Rc<ComponentRegistry>,
    pretty: bool,
}

impl RonSceneSerializer {
    /// Serializer creating components from `registry`
    pub const fn new(registry: Rc<ComponentRegistry>, pretty: bool) -> Self {
        Self { registry, pretty }
    }

    /// Serializer configured by engine settings
    pub const fn from_config(registry: Rc<ComponentRegistry>, config: &SerializationConfig) -> Self {
        Self::new(registry, config.pretty)
    }

    /// Registry used when deserializing
    pub const fn registry(&self) -> &Rc<ComponentRegistry> {
        &self.registry
    }

    /// Encode a document
    pub fn write_document(&self, document: &SceneDocument) -> Result<String, SerializationError> {
        let text = if self.pretty {
            ron::ser::to_string_pretty(document, PrettyConfig::new())?
        } else {
            ron::to_string(document)?
        };
        Ok(text)
    }

    /// Decode a document without building a scene
    pub fn read_document(&self, bytes: &[u8]) -> Result<SceneDocument, SerializationError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(ron::from_str(text)?)
    }
}

impl SceneSerializer for RonSceneSerializer {
    fn serialize_scene(&self, scene: &Scene) -> Result<Vec<u8>, SerializationError> {
        let text = self.write_document(&SceneDocument::capture(scene))?;
        Ok(text.into_bytes())
    }

    fn deserialize_scene(&self, bytes: &[u8]) -> Result<Scene, SerializationError> {
        self.read_document(bytes)?.build(Rc::clone(&self.registry))
    }
}
