//! Headless play-mode host
//!
//! Builds a small scene with a spinning model, then scripts a
//! Play / Pause / Continue / Stop session against it and logs what the
//! renderer receives. Pass a TOML or RON config path as the first argument
//! to override the defaults. A project file as the second argument opens
//! that project's startup scene instead of the built-in demo scene.

use scene_engine::foundation::logging;
use scene_engine::foundation::math::position_of;
use scene_engine::prelude::*;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

const FRAME_TIME: Duration = Duration::from_millis(16);

/// Renderer that only logs what it is asked to draw
#[derive(Default)]
struct LoggingRenderer {
    frames: u64,
    draws: u64,
}

impl Renderer for LoggingRenderer {
    fn begin_frame(&mut self, _frame: &FrameView) {
        self.frames += 1;
    }

    fn draw(&mut self, call: &DrawCall) {
        self.draws += 1;
        log::trace!(
            "Draw {} at {:?} with {} lights",
            call.model,
            position_of(&call.model_matrix),
            call.lights.len()
        );
    }
}

/// Frame at which each scripted step runs
#[derive(Debug, Clone, Copy)]
struct Script {
    play: u64,
    pause: u64,
    resume: u64,
    stop: u64,
    quit: u64,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            play: 10,
            pause: 70,
            resume: 100,
            stop: 160,
            quit: 180,
        }
    }
}

struct PlayHostApp {
    script: Script,
    project: Option<PathBuf>,
    turntable: Option<GameObjectId>,
}

impl PlayHostApp {
    fn new(project: Option<PathBuf>) -> Self {
        Self {
            script: Script::default(),
            project,
            turntable: None,
        }
    }

    fn log_turntable(&self, engine: &Engine, label: &str) {
        let Some(scene) = engine.scenes.scene() else {
            return;
        };
        let Some(handle) = self.turntable.and_then(|id| scene.find_game_object(id)) else {
            return;
        };
        if let Some(object) = scene.game_object(handle) {
            log::info!(
                "{label}: '{}' euler {:?}",
                object.name,
                object.transform().local_euler_angles()
            );
        }
    }
}

impl Application for PlayHostApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Initializing play host...");
        if let Some(project) = &self.project {
            engine.load_project(project)?;
            return Ok(());
        }

        let model = engine.assets.register("models/teapot.obj");

        engine.scenes.create_and_load_new_scene()?;
        let scene = engine.scenes.scene_mut().ok_or(PlayError::NoSceneLoaded)?;
        let turntable = scene.add_named_game_object("Turntable");
        turntable
            .transform_mut()
            .set_local_position(Vec3::new(0.0, 0.0, -5.0));
        turntable
            .add_component_with(MeshRenderer::new(AssetRef::to(model)))
            .map_err(PlayError::from)?;
        turntable
            .add_component_with(Spinner {
                degrees_per_second: 90.0,
            })
            .map_err(PlayError::from)?;
        self.turntable = Some(turntable.id());

        self.log_turntable(engine, "Edit mode");
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        let frame = engine.frame_count();
        let script = self.script;
        if frame == script.play {
            engine.scenes.start_playing()?;
        } else if frame == script.pause {
            self.log_turntable(engine, "Paused");
            engine.scenes.pause_playing()?;
        } else if frame == script.resume {
            engine.scenes.continue_playing()?;
        } else if frame == script.stop {
            self.log_turntable(engine, "Before stop");
            engine.scenes.stop_playing()?;
            self.log_turntable(engine, "Restored");
        } else if frame >= script.quit {
            engine.quit();
        }
        thread::sleep(FRAME_TIME);
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!(
            "Play host finished after {} frames in state {}",
            engine.frame_count(),
            engine.scenes.state()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EngineConfig::load_or_default(path)?,
        None => EngineConfig::default(),
    };
    logging::init_with_filter(&config.logging.filter)?;

    log::info!("Starting play host");
    let mut app = PlayHostApp::new(args.next().map(PathBuf::from));
    let mut renderer = LoggingRenderer::default();

    match Engine::run(config, &mut app, &mut renderer) {
        Ok(()) => {
            log::info!(
                "Play host completed: {} frames, {} draws",
                renderer.frames,
                renderer.draws
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Play host failed: {e}");
            Err(e.into())
        }
    }
}
