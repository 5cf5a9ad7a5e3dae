//! Entity spawning for level templates, the player and transient effects.
//!
//! Every entity spawned here carries [`LevelEntity`] so the scene can clear
//! the level in one sweep when it is left.

use bevy::prelude::*;

use crate::components::{
    AirBoost, Coin, Crate, CrumblingBlock, Enemy, EnemyKind, Explosion, ExtraBoost, Faction, Goal,
    HealthPotion, Kill, LevelEntity, NonSlippery, Player, PlayerMotion, Projectile,
    RespawningExtraBoost, Shooter, Slippery, Statuses, Terrain, Tint,
};
use crate::config::Tuning;
use crate::constants::TILE_UNIT;
use crate::enemy::boss::BossBrain;
use crate::flavor::DeathCause;
use crate::level::{Layout, Template};
use crate::physics::{Body, Collider, Mover, Solid};

const TILE_LAYER: f32 = 0.0;
const ITEM_LAYER: f32 = 1.0;
const ACTOR_LAYER: f32 = 2.0;
const PLAYER_LAYER: f32 = 3.0;
const PROJECTILE_LAYER: f32 = 4.0;
const EFFECT_LAYER: f32 = 5.0;

/// Edge length of a bullet.
pub const BULLET_SIZE: f32 = TILE_UNIT / 2.0;
/// Hit indicators grow by roughly one unit per frame at 60 Hz.
const EXPLOSION_GROWTH: f32 = 6.0;
const HIT_COLOUR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const DEATH_COLOUR: [f32; 4] = [1.0, 0.5, 0.0, 1.0];
const PLAYER_COLOUR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const PLAYER_BULLET_COLOUR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const ENEMY_BULLET_COLOUR: [f32; 4] = [0.25, 1.0, 0.1, 1.0];

/// Components shared by every template entity.
#[derive(Bundle)]
pub struct TileBundle {
    /// Cleared with the level.
    pub level: LevelEntity,
    /// Template name for debugging.
    pub name: Name,
    /// Placement in the world.
    pub transform: Transform,
    /// Box used for collisions and contacts.
    pub collider: Collider,
    /// Sprite colour.
    pub tint: Tint,
}

impl TileBundle {
    /// Builds the shared parts of `template` at `position`.
    #[must_use]
    pub fn new(template: Template, position: Vec2) -> Self {
        let layer = if template.is_body() {
            ACTOR_LAYER
        } else if template.is_solid() || template == Template::OutOfBounds {
            TILE_LAYER
        } else {
            ITEM_LAYER
        };
        Self {
            level: LevelEntity,
            name: Name::new(format!("{template:?}")),
            transform: Transform::from_translation(position.extend(layer)),
            collider: Collider {
                size: template.size(),
            },
            tint: Tint(template.colour()),
        }
    }
}

/// Bundle of components for the player entity.
#[derive(Bundle)]
pub struct PlayerBundle {
    /// Player marker.
    pub player: Player,
    /// Cleared with the level.
    pub level: LevelEntity,
    /// Debug name.
    pub name: Name,
    /// Start position.
    pub transform: Transform,
    /// Player hitbox.
    pub collider: Collider,
    /// Gravity and walking.
    pub body: Body,
    /// Contacts are reported for the player.
    pub mover: Mover,
    /// Boost and shooting state.
    pub motion: PlayerMotion,
    /// Sprite colour.
    pub tint: Tint,
}

impl PlayerBundle {
    /// Creates the player at `position` using the configured movement values.
    #[must_use]
    pub fn new(position: Vec2, tuning: &Tuning) -> Self {
        Self {
            player: Player,
            level: LevelEntity,
            name: Name::new("Player"),
            transform: Transform::from_translation(position.extend(PLAYER_LAYER)),
            collider: Collider::square(TILE_UNIT),
            body: Body::new(tuning.max_velocity),
            mover: Mover,
            motion: PlayerMotion::new(tuning.player_move_speed),
            tint: Tint(PLAYER_COLOUR),
        }
    }
}

/// Bundle of components for a bullet.
#[derive(Bundle)]
pub struct ProjectileBundle {
    /// Bullet state.
    pub projectile: Projectile,
    /// Cleared with the level.
    pub level: LevelEntity,
    /// Debug name.
    pub name: Name,
    /// Current position.
    pub transform: Transform,
    /// Bullet hitbox.
    pub collider: Collider,
    /// Contacts are reported for bullets.
    pub mover: Mover,
    /// Sprite colour.
    pub tint: Tint,
}

impl ProjectileBundle {
    /// Builds a bullet at `position`.
    #[must_use]
    pub fn new(position: Vec2, projectile: Projectile) -> Self {
        let (name, colour) = match projectile.faction {
            Faction::Player => ("PlayerBullet", PLAYER_BULLET_COLOUR),
            Faction::Enemy => ("EnemyBullet", ENEMY_BULLET_COLOUR),
        };
        Self {
            projectile,
            level: LevelEntity,
            name: Name::new(name),
            transform: Transform::from_translation(position.extend(PROJECTILE_LAYER)),
            collider: Collider::square(BULLET_SIZE),
            mover: Mover,
            tint: Tint(colour),
        }
    }
}

/// Spawns one template at `position` and returns the new entity.
pub fn spawn_template(
    commands: &mut Commands,
    template: Template,
    position: Vec2,
    tuning: &Tuning,
) -> Entity {
    let mut entity = commands.spawn(TileBundle::new(template, position));
    if template.is_solid() {
        entity.insert(Solid);
    }
    if template.is_body() {
        entity.insert(Body::new(tuning.max_velocity));
    }
    if let Some(stats) = template.enemy_stats() {
        let kind = match template {
            Template::Goblin => EnemyKind::Goblin,
            Template::Boss => EnemyKind::Boss,
            _ => EnemyKind::Slime,
        };
        entity.insert((
            Enemy {
                kind,
                strength: stats.strength,
                health: stats.health,
                max_health: stats.health,
                score_value: stats.score_value,
            },
            Statuses::default(),
            Mover,
        ));
    }

    match template {
        Template::Goal => {
            entity.insert(Goal);
        }
        Template::OutOfBounds => {
            entity.insert(Kill(DeathCause::FellOut));
        }
        Template::Ground => {
            entity.insert((Terrain, NonSlippery));
        }
        Template::Crate => {
            entity.insert(Crate);
        }
        Template::Lava => {
            entity.insert((Terrain, Kill(DeathCause::Lava)));
        }
        Template::Ice => {
            entity.insert((Terrain, Slippery));
        }
        Template::CrumblingBlock => {
            entity.insert((Terrain, CrumblingBlock));
        }
        Template::AirBoost => {
            entity.insert(AirBoost);
        }
        Template::Coin => {
            entity.insert(Coin);
        }
        Template::ExtraBoost => {
            entity.insert(ExtraBoost);
        }
        Template::RespawningExtraBoost => {
            entity.insert(RespawningExtraBoost);
        }
        Template::MinorHealthPotion => {
            entity.insert(HealthPotion { strength: 1 });
        }
        Template::MajorHealthPotion => {
            entity.insert(HealthPotion { strength: 3 });
        }
        Template::Goblin => {
            entity.insert(Shooter::default());
        }
        Template::Boss => {
            entity.insert(BossBrain::default());
        }
        Template::Slime => {}
    }
    entity.id()
}

/// Spawns every placement of `layout` plus the player. Returns the player.
pub fn spawn_layout(commands: &mut Commands, layout: &Layout, tuning: &Tuning) -> Entity {
    for placement in &layout.placements {
        spawn_template(commands, placement.template, placement.position, tuning);
    }
    log::info!(
        "spawned {} level entities ({}x{} cells, {})",
        layout.placements.len(),
        layout.width,
        layout.height,
        layout.element
    );
    commands
        .spawn(PlayerBundle::new(layout.player_start, tuning))
        .id()
}

/// Spawns a bullet and returns it.
pub fn spawn_projectile(commands: &mut Commands, position: Vec2, projectile: Projectile) -> Entity {
    commands
        .spawn(ProjectileBundle::new(position, projectile))
        .id()
}

/// Leaves a white hit indicator where a bullet was destroyed.
pub fn spawn_hit_indicator(commands: &mut Commands, position: Vec2, tuning: &Tuning) {
    spawn_explosion(commands, position, HIT_COLOUR, tuning.explosion_duration);
}

/// Leaves an orange explosion where an enemy died.
pub fn spawn_death_explosion(commands: &mut Commands, position: Vec2, tuning: &Tuning) {
    spawn_explosion(commands, position, DEATH_COLOUR, tuning.explosion_duration);
}

fn spawn_explosion(commands: &mut Commands, position: Vec2, colour: [f32; 4], duration: f32) {
    commands.spawn((
        LevelEntity,
        Name::new("Explosion"),
        Transform::from_translation(position.extend(EFFECT_LAYER)),
        Tint(colour),
        Explosion {
            remaining: duration,
            growth: EXPLOSION_GROWTH,
        },
    ));
}

/// Despawns `entity` if it still exists.
///
/// Several systems can decide to remove the same entity in one frame.
pub fn despawn(commands: &mut Commands, entity: Entity) {
    if let Ok(mut entity_commands) = commands.get_entity(entity) {
        entity_commands.try_despawn();
    }
}
