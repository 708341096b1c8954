//! Test components and fixtures

use crate::play::{MemorySnapshotStore, SceneManager, SnapshotStore};
use crate::scene::{
    Component, ComponentRegistry, FieldDescriptor, FieldError, FieldValue, GameObjectRef,
    Inspectable, UpdateContext, WidgetKind,
};
use crate::serialization::RonSceneSerializer;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

/// Lifecycle call counts shared by every `Counted` built from one registry
#[derive(Debug, Default, Clone)]
pub struct Counters {
    pub starts: Rc<Cell<u32>>,
    pub updates: Rc<Cell<u32>>,
    pub renders: Rc<Cell<u32>>,
    pub disposes: Rc<Cell<u32>>,
}

fn bump(cell: &Cell<u32>) {
    cell.set(cell.get() + 1);
}

const COUNTER_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::new("ticks", "Ticks", WidgetKind::IntegerField)];

/// Counts lifecycle calls and persists how many updates it has seen
#[derive(Debug, Default)]
pub struct Counted {
    pub counters: Counters,
    pub ticks: i64,
}

impl Counted {
    pub const KIND: &'static str = "Counted";

    pub fn new(counters: Counters) -> Self {
        Self { counters, ticks: 0 }
    }
}

impl Inspectable for Counted {
    fn field_descriptors(&self) -> &'static [FieldDescriptor] {
        COUNTER_FIELDS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        (name == "ticks").then_some(FieldValue::Int(self.ticks))
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match (name, value) {
            ("ticks", FieldValue::Int(ticks)) => {
                self.ticks = ticks;
                Ok(())
            }
            (name, value) => Err(FieldError::rejected(COUNTER_FIELDS, name, &value)),
        }
    }
}

impl Component for Counted {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn start(&mut self, _ctx: &mut UpdateContext<'_>) {
        bump(&self.counters.starts);
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.ticks += 1;
        bump(&self.counters.updates);
    }

    fn render(&mut self, _ctx: &mut crate::scene::RenderContext<'_>) {
        bump(&self.counters.renders);
    }

    fn dispose(&mut self) {
        bump(&self.counters.disposes);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

const SPAWNER_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::new("remaining", "Remaining", WidgetKind::IntegerField)];

/// Queues one child with a `Counted` per update until `remaining` runs out
#[derive(Debug, Default)]
pub struct Spawner {
    pub remaining: i64,
}

impl Spawner {
    pub const KIND: &'static str = "Spawner";
}

impl Inspectable for Spawner {
    fn field_descriptors(&self) -> &'static [FieldDescriptor] {
        SPAWNER_FIELDS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        (name == "remaining").then_some(FieldValue::Int(self.remaining))
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match (name, value) {
            ("remaining", FieldValue::Int(remaining)) => {
                self.remaining = remaining;
                Ok(())
            }
            (name, value) => Err(FieldError::rejected(SPAWNER_FIELDS, name, &value)),
        }
    }
}

impl Component for Spawner {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.remaining <= 0 {
            return;
        }
        self.remaining -= 1;
        let child = ctx.commands.create_game_object("Spawned", Some(ctx.owner_id));
        ctx.commands.add_component(child, Counted::KIND);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

const FOLLOWER_FIELDS: &[FieldDescriptor] =
    &[FieldDescriptor::new("target", "Target", WidgetKind::ObjectReference)];

/// Holds a weak reference to another GameObject
#[derive(Debug, Default)]
pub struct Follower {
    pub target: GameObjectRef,
}

impl Follower {
    pub const KIND: &'static str = "Follower";
}

impl Inspectable for Follower {
    fn field_descriptors(&self) -> &'static [FieldDescriptor] {
        FOLLOWER_FIELDS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        (name == "target").then_some(FieldValue::GameObject(self.target.id()))
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match (name, value) {
            ("target", FieldValue::GameObject(id)) => {
                self.target = GameObjectRef(id);
                Ok(())
            }
            (name, value) => Err(FieldError::rejected(FOLLOWER_FIELDS, name, &value)),
        }
    }
}

impl Component for Follower {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Built-ins plus the test components, counted components wired to `counters`
pub fn registry(counters: &Counters) -> Rc<ComponentRegistry> {
    let mut registry = ComponentRegistry::with_builtins();
    let shared = counters.clone();
    registry.register(Counted::KIND, "Counted", move || Box::new(Counted::new(shared.clone())));
    registry.register(Spawner::KIND, "Spawner", || Box::new(Spawner::default()));
    registry.register(Follower::KIND, "Follower", || Box::new(Follower::default()));
    Rc::new(registry)
}

/// Manager with an in-memory snapshot store and no default objects
pub fn manager(registry: &Rc<ComponentRegistry>) -> SceneManager {
    manager_with_store(registry, Box::new(MemorySnapshotStore::new()))
}

pub fn manager_with_store(registry: &Rc<ComponentRegistry>, store: Box<dyn SnapshotStore>) -> SceneManager {
    let serializer = RonSceneSerializer::new(Rc::clone(registry), false);
    let mut manager = SceneManager::new(Rc::clone(registry), Box::new(serializer), store);
    manager.set_new_scene_defaults(false);
    manager
}

/// Snapshot store whose bytes the test can reach into
#[derive(Debug, Default, Clone)]
pub struct SharedStore {
    pub bytes: Rc<RefCell<Option<Vec<u8>>>>,
    pub fail_writes: Rc<Cell<bool>>,
}

impl SnapshotStore for SharedStore {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        *self.bytes.borrow_mut() = Some(bytes.to_vec());
        Ok(())
    }

    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.bytes.borrow().clone())
    }

    fn clear(&mut self) -> io::Result<()> {
        *self.bytes.borrow_mut() = None;
        Ok(())
    }
}
