//! Presentation layer: camera, sprites and end-screen text.
//!
//! Everything here only reads simulation state. Level entities carry a
//! [`Tint`] and a [`Collider`]; this module turns those into coloured sprites
//! and keeps the camera on the player.

use bevy::prelude::*;

use crate::components::{Player, Tint};
use crate::constants::{CAMERA_LIFT, TILE_UNIT};
use crate::physics::Collider;

/// World units per screen pixel; the camera shows the level at 3x zoom.
pub const CAMERA_SCALE: f32 = 1.0 / 3.0;

/// Marker component for the main presentation camera.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct CameraController;

/// Where the camera should sit for a player at `player`.
///
/// # Examples
///
/// ```
/// use bevy::math::Vec2;
/// use elemancer::presentation::camera_target;
///
/// let target = camera_target(Vec2::new(15.0, -125.0));
/// assert_eq!(target, Vec2::new(15.0, -75.0));
/// ```
#[must_use]
pub fn camera_target(player: Vec2) -> Vec2 {
    player + Vec2::new(0.0, CAMERA_LIFT)
}

/// Converts a [`Tint`] into a Bevy colour.
#[must_use]
pub fn tint_colour(tint: Tint) -> Color {
    let [r, g, b, a] = tint.0;
    Color::srgba(r, g, b, a)
}

/// Spawns the presentation camera at startup if no camera exists.
fn camera_setup(mut commands: Commands, cameras: Query<&Camera2d>) {
    if cameras.is_empty() {
        commands.spawn((
            Camera2d,
            Projection::Orthographic(OrthographicProjection {
                scale: CAMERA_SCALE,
                ..OrthographicProjection::default_2d()
            }),
            CameraController,
            Name::new("PresentationCamera"),
        ));
    }
}

/// Keeps the camera centred slightly above the player.
pub fn camera_follow_system(
    players: Query<&Transform, With<Player>>,
    mut cameras: Query<&mut Transform, (With<CameraController>, Without<Player>)>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };
    let target = camera_target(player.translation.truncate());
    camera.translation.x = target.x;
    camera.translation.y = target.y;
}

/// Gives newly spawned tinted entities a sprite of their collider's size.
pub fn attach_sprites(
    mut commands: Commands,
    tinted: Query<(Entity, &Tint, Option<&Collider>), Added<Tint>>,
) {
    for (entity, tint, collider) in &tinted {
        let size = collider.map_or(Vec2::splat(TILE_UNIT), |found| found.size);
        commands
            .entity(entity)
            .try_insert(Sprite::from_color(tint_colour(*tint), size));
    }
}

#[cfg(feature = "text")]
mod end_screen {
    use bevy::prelude::*;

    use crate::scene::{enter_game_over, enter_victory, GameScene, Progress};

    #[derive(Component, Debug)]
    struct EndScreenText;

    pub(super) fn install(app: &mut App) {
        app.add_systems(
            OnEnter(GameScene::GameOver),
            show_end_screen.after(enter_game_over),
        )
        .add_systems(
            OnEnter(GameScene::Victory),
            show_end_screen.after(enter_victory),
        )
        .add_systems(OnExit(GameScene::GameOver), clear_end_screen)
        .add_systems(OnExit(GameScene::Victory), clear_end_screen);
    }

    /// One centred text line per line of the end-of-run message.
    #[expect(
        clippy::needless_pass_by_value,
        reason = "Bevy system parameters use `Res<T>` by value."
    )]
    fn show_end_screen(mut commands: Commands, progress: Res<Progress>) {
        commands
            .spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::Center,
                    align_items: AlignItems::Center,
                    row_gap: Val::Px(12.0),
                    ..default()
                },
                EndScreenText,
                Name::new("EndScreen"),
            ))
            .with_children(|parent| {
                for line in progress.message.lines() {
                    parent.spawn((
                        Text::new(line),
                        TextFont {
                            font_size: 24.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                }
            });
    }

    fn clear_end_screen(mut commands: Commands, screens: Query<Entity, With<EndScreenText>>) {
        for entity in &screens {
            commands.entity(entity).despawn();
        }
    }
}

/// Plugin owning the camera, sprites and end-screen text.
///
/// Added alongside [`crate::plugin::ElemancerPlugin`] by the binary; the
/// simulation runs without it in headless tests.
#[derive(Debug)]
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CameraController>()
            .insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, camera_setup)
            .add_systems(PostUpdate, (attach_sprites, camera_follow_system));

        #[cfg(feature = "text")]
        end_screen::install(app);
    }
}
