//! Play/Pause/Stop sessions through the scene manager

use super::support::{self, Counters, Follower, Counted, SharedStore, Spawner};
use crate::assets::{AssetDatabase, AssetGuid};
use crate::foundation::math::{Mat4, Vec3};
use crate::play::{PlayAction, PlayError, PlayState, SceneManager, TempFileSnapshotStore};
use crate::render::RecordingRenderer;
use crate::scene::components::{MeshRenderer, Mover, Spinner};
use crate::scene::{AssetRef, ComponentRegistry, GameObjectId, GameObjectRef, Scene};
use crate::serialization::{RonSceneSerializer, SceneSerializer};
use std::rc::Rc;

const DT: f32 = 0.25;

fn populated_scene(registry: &Rc<ComponentRegistry>) -> Scene {
    let mut scene = Scene::with_registry(Rc::clone(registry));

    let root = scene.add_named_game_object("Root");
    root.add_component_with(Spinner {
        degrees_per_second: 45.0,
    })
    .unwrap();
    root.add_component_of_kind(registry, Counted::KIND).unwrap();
    root.add_component_with(Spawner { remaining: 2 }).unwrap();
    let root = root.handle();

    let child = scene.add_named_game_object("Child");
    child
        .transform_mut()
        .set_local_position(Vec3::new(0.0, 0.0, -1.0));
    child.add_component::<Mover>().unwrap();
    let child = child.handle();

    scene.set_parent(child, Some(root)).unwrap();
    scene
}

fn run_frames(manager: &mut SceneManager, renderer: &mut RecordingRenderer, frames: usize) {
    for _ in 0..frames {
        manager
            .frame(DT, Mat4::identity(), Mat4::identity(), renderer)
            .unwrap();
    }
}

fn scene_bytes(manager: &SceneManager) -> Vec<u8> {
    let serializer = RonSceneSerializer::new(Rc::clone(manager.registry()), false);
    serializer
        .serialize_scene(manager.scene().unwrap())
        .unwrap()
}

fn root_ticks(manager: &SceneManager) -> i64 {
    let scene = manager.scene().unwrap();
    let root = scene.find_by_name("Root").unwrap();
    scene
        .game_object(root)
        .unwrap()
        .get_component::<Counted>()
        .unwrap()
        .ticks
}

#[test]
fn test_stop_restores_scene_exactly() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut manager = support::manager(&registry);
    manager.load_scene(populated_scene(&registry)).unwrap();
    let before = scene_bytes(&manager);
    let mut renderer = RecordingRenderer::new();

    manager.start_playing().unwrap();
    assert!(manager.has_snapshot());
    run_frames(&mut manager, &mut renderer, 4);

    assert_eq!(root_ticks(&manager), 4);
    assert_eq!(manager.scene().unwrap().len(), 4);
    assert_ne!(scene_bytes(&manager), before);

    manager.stop_playing().unwrap();
    assert_eq!(manager.state(), PlayState::Stopped);
    assert!(!manager.has_snapshot());
    assert_eq!(scene_bytes(&manager), before);
    assert_eq!(manager.scene().unwrap().len(), 2);
    assert_eq!(root_ticks(&manager), 0);
}

#[test]
fn test_repeated_sessions_are_idempotent() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut manager = support::manager(&registry);
    manager.load_scene(populated_scene(&registry)).unwrap();
    let before = scene_bytes(&manager);
    let mut renderer = RecordingRenderer::new();

    for frames in [1, 3, 0] {
        manager.start_playing().unwrap();
        run_frames(&mut manager, &mut renderer, frames);
        manager.stop_playing().unwrap();
        assert_eq!(scene_bytes(&manager), before);
    }
}

#[test]
fn test_stop_disposes_played_scene() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut manager = support::manager(&registry);
    manager.load_scene(populated_scene(&registry)).unwrap();
    let mut renderer = RecordingRenderer::new();

    manager.start_playing().unwrap();
    assert_eq!(counters.starts.get(), 1);
    run_frames(&mut manager, &mut renderer, 2);
    // two spawned counted components joined the root one
    assert_eq!(counters.starts.get(), 3);

    manager.stop_playing().unwrap();
    assert_eq!(counters.disposes.get(), 3);
}

#[test]
fn test_pause_freezes_updates_but_keeps_rendering() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut manager = support::manager(&registry);
    manager.load_scene(populated_scene(&registry)).unwrap();
    let mut renderer = RecordingRenderer::new();

    manager.start_playing().unwrap();
    run_frames(&mut manager, &mut renderer, 2);
    assert_eq!(root_ticks(&manager), 2);

    manager.pause_playing().unwrap();
    assert_eq!(manager.state(), PlayState::Paused);
    let paused = scene_bytes(&manager);
    let renders = counters.renders.get();
    run_frames(&mut manager, &mut renderer, 3);
    assert_eq!(root_ticks(&manager), 2);
    assert_eq!(scene_bytes(&manager), paused);
    assert!(counters.renders.get() > renders);
    assert_eq!(renderer.frames(), 5);

    manager.continue_playing().unwrap();
    run_frames(&mut manager, &mut renderer, 1);
    assert_eq!(root_ticks(&manager), 3);

    manager.stop_playing().unwrap();
    assert_eq!(root_ticks(&manager), 0);
}

#[test]
fn test_stop_from_paused_restores() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut manager = support::manager(&registry);
    manager.load_scene(populated_scene(&registry)).unwrap();
    let before = scene_bytes(&manager);
    let mut renderer = RecordingRenderer::new();

    manager.start_playing().unwrap();
    run_frames(&mut manager, &mut renderer, 2);
    manager.pause_playing().unwrap();
    manager.stop_playing().unwrap();
    assert_eq!(scene_bytes(&manager), before);
}

#[test]
fn test_invalid_transitions_change_nothing() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut manager = support::manager(&registry);
    manager.load_scene(populated_scene(&registry)).unwrap();

    assert!(matches!(
        manager.pause_playing(),
        Err(PlayError::InvalidTransition {
            from: PlayState::Stopped,
            action: PlayAction::Pause
        })
    ));
    assert!(matches!(
        manager.stop_playing(),
        Err(PlayError::InvalidTransition { .. })
    ));
    assert!(matches!(
        manager.continue_playing(),
        Err(PlayError::InvalidTransition { .. })
    ));
    assert_eq!(manager.state(), PlayState::Stopped);
    assert_eq!(counters.starts.get(), 0);

    manager.start_playing().unwrap();
    assert!(matches!(
        manager.start_playing(),
        Err(PlayError::InvalidTransition {
            from: PlayState::Playing,
            action: PlayAction::Start
        })
    ));
    assert!(matches!(
        manager.continue_playing(),
        Err(PlayError::InvalidTransition { .. })
    ));
    assert_eq!(manager.state(), PlayState::Playing);
    assert_eq!(counters.starts.get(), 1);

    manager.pause_playing().unwrap();
    assert!(matches!(
        manager.pause_playing(),
        Err(PlayError::InvalidTransition { .. })
    ));
    assert_eq!(manager.state(), PlayState::Paused);
}

#[test]
fn test_no_scene_loaded() {
    let registry = Rc::new(ComponentRegistry::with_builtins());
    let mut manager = support::manager(&registry);
    let mut renderer = RecordingRenderer::new();

    assert!(matches!(manager.update(DT), Err(PlayError::NoSceneLoaded)));
    assert!(matches!(
        manager.frame(DT, Mat4::identity(), Mat4::identity(), &mut renderer),
        Err(PlayError::NoSceneLoaded)
    ));
    assert!(matches!(manager.start_playing(), Err(PlayError::NoSceneLoaded)));
    assert_eq!(manager.state(), PlayState::Stopped);
    assert!(!manager.has_snapshot());
    assert_eq!(renderer.frames(), 0);
}

#[test]
fn test_session_blocks_scene_replacement() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut manager = support::manager(&registry);
    manager.load_scene(populated_scene(&registry)).unwrap();
    manager.start_playing().unwrap();

    assert!(matches!(
        manager.load_scene(Scene::with_registry(Rc::clone(&registry))),
        Err(PlayError::SessionActive(PlayState::Playing))
    ));
    assert!(matches!(
        manager.create_and_load_new_scene(),
        Err(PlayError::SessionActive(_))
    ));
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        manager.save_scene(&dir.path().join("main.scene")),
        Err(PlayError::SessionActive(_))
    ));
    assert_eq!(manager.scene().unwrap().len(), 2);
}

#[test]
fn test_failed_restore_keeps_session() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let store = SharedStore::default();
    let mut manager = support::manager_with_store(&registry, Box::new(store.clone()));
    manager.load_scene(populated_scene(&registry)).unwrap();
    let before = scene_bytes(&manager);
    let mut renderer = RecordingRenderer::new();

    manager.start_playing().unwrap();
    run_frames(&mut manager, &mut renderer, 3);
    let good = store.bytes.borrow().clone();
    *store.bytes.borrow_mut() = Some(b"(format_version: 1, game_objects: [".to_vec());

    assert!(matches!(
        manager.stop_playing(),
        Err(PlayError::Serialization(_))
    ));
    assert_eq!(manager.state(), PlayState::Playing);
    assert!(manager.has_snapshot());
    assert_eq!(root_ticks(&manager), 3);
    assert_eq!(counters.disposes.get(), 0);

    *store.bytes.borrow_mut() = good;
    manager.stop_playing().unwrap();
    assert_eq!(scene_bytes(&manager), before);
    assert_eq!(*store.bytes.borrow(), None);
}

#[test]
fn test_missing_snapshot_keeps_session() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let store = SharedStore::default();
    let mut manager = support::manager_with_store(&registry, Box::new(store.clone()));
    manager.load_scene(populated_scene(&registry)).unwrap();

    manager.start_playing().unwrap();
    *store.bytes.borrow_mut() = None;
    assert!(matches!(manager.stop_playing(), Err(PlayError::MissingSnapshot)));
    assert_eq!(manager.state(), PlayState::Playing);
}

#[test]
fn test_failed_snapshot_write_stays_stopped() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let store = SharedStore::default();
    store.fail_writes.set(true);
    let mut manager = support::manager_with_store(&registry, Box::new(store));
    manager.load_scene(populated_scene(&registry)).unwrap();

    assert!(matches!(manager.start_playing(), Err(PlayError::Snapshot(_))));
    assert_eq!(manager.state(), PlayState::Stopped);
    assert!(!manager.has_snapshot());
    assert_eq!(counters.starts.get(), 0);
    assert!(!manager.scene().unwrap().is_started());
}

#[test]
fn test_temp_file_snapshot_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("play.snapshot");
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut manager =
        support::manager_with_store(&registry, Box::new(TempFileSnapshotStore::new(&path)));
    manager.load_scene(populated_scene(&registry)).unwrap();
    let before = scene_bytes(&manager);
    let mut renderer = RecordingRenderer::new();

    manager.start_playing().unwrap();
    assert!(path.exists());
    run_frames(&mut manager, &mut renderer, 2);
    manager.stop_playing().unwrap();

    assert!(!path.exists());
    assert_eq!(scene_bytes(&manager), before);
}

#[test]
fn test_update_while_stopped_flushes_edits_only() {
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut manager = support::manager(&registry);
    manager.load_scene(populated_scene(&registry)).unwrap();

    let scene = manager.scene_mut().unwrap();
    let id = scene.commands().create_game_object("Queued", None);
    manager.update(DT).unwrap();

    let scene = manager.scene().unwrap();
    assert!(scene.find_game_object(id).is_some());
    assert_eq!(counters.updates.get(), 0);
    assert_eq!(root_ticks(&manager), 0);
}

#[test]
fn test_new_scene_defaults() {
    let registry = Rc::new(ComponentRegistry::with_builtins());
    let mut manager = support::manager(&registry);
    manager.set_new_scene_defaults(true);
    manager.create_and_load_new_scene().unwrap();

    let scene = manager.scene().unwrap();
    assert_eq!(scene.len(), 2);
    let (camera, _) = scene.find_camera().unwrap();
    assert_eq!(scene.game_object(camera).unwrap().name, "Main Camera");
    assert_eq!(scene.find_active_lights().len(), 1);
}

#[test]
fn test_save_and_load_clears_broken_references() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("level.scene");
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut assets = AssetDatabase::in_memory();
    let teapot = assets.register("models/teapot.obj");

    let mut scene = Scene::with_registry(Rc::clone(&registry));
    let target = scene.add_named_game_object("Target").id();
    let kept = scene.add_named_game_object("Kept");
    kept.add_component_with(MeshRenderer::new(AssetRef::to(teapot)))
        .unwrap();
    kept.add_component_with(Follower {
        target: GameObjectRef::to(target),
    })
    .unwrap();
    let broken = scene.add_named_game_object("Broken");
    broken
        .add_component_with(MeshRenderer::new(AssetRef::to(AssetGuid::new())))
        .unwrap();
    broken
        .add_component_with(Follower {
            target: GameObjectRef::to(GameObjectId::new()),
        })
        .unwrap();

    let mut manager = support::manager(&registry);
    manager.load_scene(scene).unwrap();
    manager.save_scene(&path).unwrap();
    manager
        .load_scene_file(&path, &assets)
        .unwrap();

    let scene = manager.scene().unwrap();
    let kept = scene.game_object(scene.find_by_name("Kept").unwrap()).unwrap();
    assert_eq!(kept.get_component::<MeshRenderer>().unwrap().model.guid(), Some(teapot));
    let follower = kept.get_component::<Follower>().unwrap();
    assert_eq!(follower.target.id(), Some(target));
    assert!(follower.target.resolve(scene).is_some());

    let broken = scene.game_object(scene.find_by_name("Broken").unwrap()).unwrap();
    assert_eq!(broken.get_component::<MeshRenderer>().unwrap().model.guid(), None);
    assert_eq!(broken.get_component::<Follower>().unwrap().target.id(), None);
}

#[test]
fn test_load_missing_file_keeps_scene() {
    let dir = tempfile::tempdir().unwrap();
    let counters = Counters::default();
    let registry = support::registry(&counters);
    let mut manager = support::manager(&registry);
    manager.load_scene(populated_scene(&registry)).unwrap();

    let result = manager.load_scene_file(&dir.path().join("missing.scene"), &AssetDatabase::in_memory());
    assert!(matches!(result, Err(PlayError::Serialization(_))));
    assert_eq!(manager.scene().unwrap().len(), 2);
}
