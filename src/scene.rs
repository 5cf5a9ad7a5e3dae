//! Scene states and the transitions between them.
//!
//! A run boots into its start level, advances through the levels on
//! reaching each goal and ends on either the game-over or the victory
//! screen. Both end screens wait for Enter or Space and start a fresh run
//! from level one.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::components::LevelEntity;
use crate::config::{GameConfig, Tuning};
use crate::element::{next_element, Element};
use crate::flavor::{game_over_text, victory_text, DeathCause};
use crate::level::spawn::spawn_layout;
use crate::level::{parse_layout, LevelError, LevelId};
use crate::physics::ContactCache;
use crate::session::PlayerState;

/// Top-level game flow.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameScene {
    /// Startup before the first level.
    #[default]
    Boot,
    /// Playing a level.
    Level(LevelId),
    /// The player died.
    GameOver,
    /// The last level was completed.
    Victory,
}

/// Run condition: a level is being played.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy run conditions take `Res<T>` by value."
)]
#[must_use]
pub fn in_level(scene: Res<State<GameScene>>) -> bool {
    matches!(scene.get(), GameScene::Level(_))
}

/// Run condition: the game-over or victory screen is showing.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy run conditions take `Res<T>` by value."
)]
#[must_use]
pub fn on_end_screen(scene: Res<State<GameScene>>) -> bool {
    matches!(scene.get(), GameScene::GameOver | GameScene::Victory)
}

/// Where the current run is and how the last one ended.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Progress {
    /// Level being played, or last played.
    pub level: LevelId,
    /// Element of the level being played.
    pub element: Element,
    /// Element of the previous level, never repeated by the next one.
    pub last_element: Option<Element>,
    /// How the last run ended, if it did.
    pub death: Option<DeathCause>,
    /// Text for the end screen.
    pub message: String,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            level: LevelId::One,
            element: Element::Fire,
            last_element: None,
            death: None,
            message: String::new(),
        }
    }
}

/// Random source for element choice, loot, goblin shots and flavour text.
#[derive(Resource, Debug, Clone)]
pub struct GameRng(pub ChaCha8Rng);

impl GameRng {
    /// Seeds from `seed`, or from system entropy when absent.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self(seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(None)
    }
}

/// The player died.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDied {
    /// What killed the player.
    pub cause: DeathCause,
}

/// The player reached the goal.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCompleted;

/// Raised when a level layout cannot be built.
#[derive(Event, Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load level {level}: {error}")]
pub struct LevelLoadFailed {
    /// Level that failed.
    pub level: LevelId,
    /// Why it failed.
    #[source]
    pub error: LevelError,
}

/// Reseeds the RNG when a seed was configured.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn seed_rng(config: Res<GameConfig>, mut rng: ResMut<GameRng>) {
    if let Some(seed) = config.seed {
        log::info!("using RNG seed {seed}");
        *rng = GameRng::new(Some(seed));
    }
}

/// Leaves the boot scene for the configured start level.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn boot(config: Res<GameConfig>, mut next: ResMut<NextState<GameScene>>) {
    log::info!("starting at level {}", config.start_level);
    next.set(GameScene::Level(config.start_level));
}

/// Chooses the level's element and spawns its layout.
#[expect(
    clippy::needless_pass_by_value,
    clippy::too_many_arguments,
    reason = "Bevy systems take their resources as separate by-value parameters."
)]
pub fn enter_level(
    mut commands: Commands,
    scene: Res<State<GameScene>>,
    config: Res<GameConfig>,
    tuning: Res<Tuning>,
    mut progress: ResMut<Progress>,
    mut rng: ResMut<GameRng>,
    mut state: ResMut<PlayerState>,
    mut contacts: ResMut<ContactCache>,
) {
    let GameScene::Level(level) = *scene.get() else {
        return;
    };
    let element = config
        .element_override
        .unwrap_or_else(|| next_element(progress.last_element, &mut rng.0));
    progress.level = level;
    progress.element = element;
    progress.last_element = Some(element);
    progress.death = None;
    state.begin_level(element);
    contacts.clear();

    log::info!("entering level {level} ({element})");
    match parse_layout(level.layout(), element) {
        Ok(layout) => {
            spawn_layout(&mut commands, &layout, &tuning);
        }
        Err(error) => commands.trigger(LevelLoadFailed { level, error }),
    }
}

/// Despawns everything the level spawned.
pub fn leave_level(mut commands: Commands, entities: Query<Entity, With<LevelEntity>>) {
    let mut count = 0_usize;
    for entity in &entities {
        commands.entity(entity).despawn();
        count += 1;
    }
    log::debug!("cleared {count} level entities");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_player_died(
    event: On<PlayerDied>,
    scene: Res<State<GameScene>>,
    mut progress: ResMut<Progress>,
    mut next: ResMut<NextState<GameScene>>,
) {
    if !matches!(scene.get(), GameScene::Level(_)) || progress.death.is_some() {
        return;
    }
    let cause = event.event().cause;
    log::info!("player died: {cause}");
    progress.death = Some(cause);
    next.set(GameScene::GameOver);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_level_completed(
    _event: On<LevelCompleted>,
    scene: Res<State<GameScene>>,
    progress: Res<Progress>,
    mut next: ResMut<NextState<GameScene>>,
) {
    let GameScene::Level(level) = *scene.get() else {
        return;
    };
    if progress.death.is_some() {
        return;
    }
    let following = level.next().map_or(GameScene::Victory, GameScene::Level);
    log::info!("level {level} complete, moving to {following:?}");
    next.set(following);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_level_load_failed(
    event: On<LevelLoadFailed>,
    mut progress: ResMut<Progress>,
    mut next: ResMut<NextState<GameScene>>,
) {
    log::error!("{}", event.event());
    progress.death = Some(DeathCause::LevelFailed);
    next.set(GameScene::GameOver);
}

/// Writes the game-over message.
pub fn enter_game_over(mut progress: ResMut<Progress>, mut rng: ResMut<GameRng>) {
    let cause = progress.death.unwrap_or(DeathCause::WornDown);
    progress.message = game_over_text(cause, progress.element, &mut rng.0);
    log::info!("game over ({cause})");
}

/// Writes the victory message.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn enter_victory(
    state: Res<PlayerState>,
    mut progress: ResMut<Progress>,
    mut rng: ResMut<GameRng>,
) {
    progress.message = victory_text(state.score, &mut rng.0);
    log::info!("victory with score {}", state.score);
}

/// Starts a fresh run from level one on Enter or Space.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn await_restart(
    keys: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<PlayerState>,
    mut progress: ResMut<Progress>,
    mut next: ResMut<NextState<GameScene>>,
) {
    if !keys.any_just_pressed([KeyCode::Enter, KeyCode::NumpadEnter, KeyCode::Space]) {
        return;
    }
    state.reset();
    progress.death = None;
    progress.message.clear();
    log::info!("restarting from level one");
    next.set(GameScene::Level(LevelId::One));
}

/// Installs the scene state machine.
#[derive(Debug)]
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<bevy::state::app::StatesPlugin>() {
            app.add_plugins(bevy::state::app::StatesPlugin);
        }
        app.init_state::<GameScene>()
            .init_resource::<GameConfig>()
            .init_resource::<Progress>()
            .init_resource::<GameRng>()
            .add_systems(Startup, seed_rng)
            .add_systems(Update, boot.run_if(in_state(GameScene::Boot)))
            .add_systems(Update, await_restart.run_if(on_end_screen))
            .add_systems(OnEnter(GameScene::GameOver), enter_game_over)
            .add_systems(OnEnter(GameScene::Victory), enter_victory)
            .add_observer(on_player_died)
            .add_observer(on_level_completed)
            .add_observer(on_level_load_failed);

        for level in LevelId::ALL {
            app.add_systems(OnEnter(GameScene::Level(level)), enter_level)
                .add_systems(OnExit(GameScene::Level(level)), leave_level);
        }
    }
}
