//! Headless app fixtures shared by the integration tests.
//!
//! Apps built here run [`ElemancerPlugin`] on top of `MinimalPlugins` with a
//! fixed 60 Hz frame time, so every `update` advances the simulation by the
//! same amount. There is no input plugin; keys are pressed and released
//! directly on the `ButtonInput<KeyCode>` resource.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use elemancer::components::Player;
use elemancer::element::Element;
use elemancer::level::LevelId;
use elemancer::{ElemancerPlugin, GameConfig, GameScene, Tuning};

/// Length of one simulated frame.
pub const FRAME: Duration = Duration::from_nanos(16_666_667);

/// Seed used by every fixture app.
pub const SEED: u64 = 7;

/// Builds a headless app that boots into `level` with `element` forced.
pub fn headless_app(level: LevelId, element: Element) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .insert_resource(GameConfig {
            start_level: level,
            element_override: Some(element),
            seed: Some(SEED),
        })
        .insert_resource(Tuning::default())
        .add_plugins(ElemancerPlugin);
    app.finish();
    app.cleanup();
    app
}

/// Builds an app and runs it until `level` has been spawned.
///
/// # Panics
/// Panics if the level is not entered within a few frames.
pub fn app_in_level(level: LevelId, element: Element) -> App {
    let mut app = headless_app(level, element);
    for _ in 0..4 {
        app.update();
        if scene(&app) == GameScene::Level(level) && player(&mut app).is_some() {
            return app;
        }
    }
    panic!("level {level} was not entered");
}

/// Runs `frames` updates.
pub fn step(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// The current scene.
///
/// # Panics
/// Panics if the scene state is not installed.
pub fn scene(app: &App) -> GameScene {
    *app.world().resource::<State<GameScene>>().get()
}

/// The player entity, when a level is loaded.
pub fn player(app: &mut App) -> Option<Entity> {
    let world = app.world_mut();
    let mut query = world.query_filtered::<Entity, With<Player>>();
    query.single(world).ok()
}

/// The player's centre.
///
/// # Panics
/// Panics if no player exists.
pub fn player_position(app: &mut App) -> Vec2 {
    let entity = player(app).unwrap_or_else(|| panic!("no player spawned"));
    app.world()
        .get::<Transform>(entity)
        .map(|transform| transform.translation.truncate())
        .unwrap_or_else(|| panic!("player has no transform"))
}

/// Moves the player's centre to `position`.
///
/// # Panics
/// Panics if no player exists.
pub fn teleport_player(app: &mut App, position: Vec2) {
    let entity = player(app).unwrap_or_else(|| panic!("no player spawned"));
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(entity) {
        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

/// Counts entities carrying component `C`.
pub fn count<C: Component>(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut query = world.query_filtered::<(), With<C>>();
    query.iter(world).count()
}

/// Holds `key` down until [`release`] is called.
pub fn press(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
}

/// Releases `key` and clears this frame's just-pressed state.
pub fn release(app: &mut App, key: KeyCode) {
    let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    input.release(key);
    input.clear();
}

/// Presses `key` for a single frame.
pub fn tap(app: &mut App, key: KeyCode) {
    press(app, key);
    app.update();
    release(app, key);
}

/// Holds `key` for `frames` updates, then releases it.
pub fn hold(app: &mut App, key: KeyCode, frames: usize) {
    press(app, key);
    app.update();
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .clear();
    step(app, frames.saturating_sub(1));
    release(app, key);
}
