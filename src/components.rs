//! ECS component types used by the game.
//!
//! Markers tag what a level entity is (terrain, pickup, hazard); data
//! components carry the per-entity state the systems mutate.
use bevy::prelude::*;

use crate::boost::BoostState;
use crate::flavor::DeathCause;
use crate::status::{StatusEffects, StatusKind};

/// Everything spawned for a level. Despawned when the level is left.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct LevelEntity;

/// Sprite colour, turned into a sprite by the presentation layer.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Tint(pub [f32; 4]);

/// The player character.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Player;

/// Per-level player movement state. Session values live in
/// [`crate::session::PlayerState`].
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerMotion {
    /// Boost in progress, if any.
    pub boost: BoostState,
    /// Seconds until the next shot.
    pub shoot_cooldown: f32,
    /// Walk speed for the current footing.
    pub move_speed: f32,
}

impl PlayerMotion {
    /// Fresh movement state walking at `move_speed`.
    #[must_use]
    pub fn new(move_speed: f32) -> Self {
        Self {
            boost: BoostState::default(),
            shoot_cooldown: 0.0,
            move_speed,
        }
    }
}

/// Which kind of enemy an [`Enemy`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Slow walker that only hurts on contact.
    Slime,
    /// Walker that fires at the player.
    Goblin,
    /// The level three boss.
    Boss,
}

/// An enemy and its combat stats.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enemy {
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Damage dealt to the player on contact.
    pub strength: i32,
    /// Remaining health.
    pub health: i32,
    /// Health at spawn.
    pub max_health: i32,
    /// Score awarded when defeated.
    pub score_value: u32,
}

impl Enemy {
    /// True once health has run out.
    #[must_use]
    pub const fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

/// Status effects on an enemy.
#[derive(Component, Debug, Clone, Default, PartialEq, Deref, DerefMut)]
pub struct Statuses(pub StatusEffects);

/// Enemies that fire bullets.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Shooter {
    /// Seconds until the next shot is allowed.
    pub cooldown: f32,
}

/// Side a bullet was fired by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    /// Fired by the player.
    Player,
    /// Fired by an enemy or the boss.
    Enemy,
}

/// A bullet in flight.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Side that fired the bullet.
    pub faction: Faction,
    /// Travel in units per second.
    pub velocity: Vec2,
    /// Damage dealt on hit.
    pub strength: i32,
    /// Status applied to whatever the bullet damages.
    pub status: Option<StatusKind>,
    /// Seconds left before the bullet vanishes.
    pub lifetime: f32,
    /// Entity that fired the bullet.
    pub source: Option<Entity>,
}

/// Short-lived growing square left by bullet hits and enemy deaths.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    /// Seconds until the explosion disappears.
    pub remaining: f32,
    /// Scale added per second.
    pub growth: f32,
}

/// Shrinking crumbling block.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Crumbling {
    /// Seconds until the block disappears.
    pub remaining: f32,
    /// Total crumble time, used to scale the block.
    pub duration: f32,
}

/// Timer that puts a respawning boost back at `position`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Respawner {
    /// Seconds until the pickup returns.
    pub remaining: f32,
    /// Where the pickup reappears.
    pub position: Vec2,
}

/// Ends the run on contact.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kill(pub DeathCause);

/// Ground the player walks on.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Terrain;

/// Doubles walk speed while stood on.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Slippery;

/// Restores base walk speed while stood on.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct NonSlippery;

/// Ground that crumbles after the player steps on it.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct CrumblingBlock;

/// Launches the player upward.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct AirBoost;

/// Finishing the level on contact.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Goal;

/// Breaks when shot.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Crate;

/// Pickup worth one point.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Coin;

/// Pickup granting one temporary boost.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct ExtraBoost;

/// Extra boost that comes back after a delay.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct RespawningExtraBoost;

/// Pickup restoring health.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPotion {
    /// Health restored on pickup.
    pub strength: i32,
}
