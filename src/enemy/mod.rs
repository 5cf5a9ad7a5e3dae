//! Slime and goblin behaviour, enemy status effects and hazards.
//!
//! Enemies idle until the player comes within the cutoff distance. Slimes
//! and goblins then walk left; goblins also fire at the player at random.
//! The boss has its own brain in [`boss`].

pub mod boss;

use bevy::prelude::*;
use rand::Rng;
use thiserror::Error;

use crate::components::{Enemy, EnemyKind, Faction, Kill, Player, Projectile, Shooter, Statuses};
use crate::config::Tuning;
use crate::level::spawn::{despawn, spawn_projectile};
use crate::physics::{frame_secs, Body, Contact};
use crate::scene::GameRng;

use boss::BossBrain;

/// Upper bound of the per-frame goblin shot roll.
pub const SHOT_ROLL_MAX: u32 = 100;

/// Problems that stop an enemy from acting for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EnemyError {
    /// The enemy's transform holds NaN or infinity.
    #[error("enemy {entity} has a non-finite position {position}")]
    NonFinitePosition {
        /// The offending enemy.
        entity: Entity,
        /// The non-finite position.
        position: Vec2,
    },
    /// Status multipliers produced a NaN or infinite velocity.
    #[error("enemy {entity} computed a non-finite velocity {velocity}")]
    NonFiniteVelocity {
        /// The offending enemy.
        entity: Entity,
        /// The non-finite velocity.
        velocity: Vec2,
    },
}

/// Whether an enemy at `enemy` should act given the player at `player`.
#[must_use]
pub fn within_cutoff(enemy: Vec2, player: Vec2, cutoff: f32) -> bool {
    enemy.distance(player) <= cutoff
}

/// Base walk speed for `kind`. The boss walks under its own brain.
#[must_use]
pub fn walk_speed(kind: EnemyKind, tuning: &Tuning) -> f32 {
    match kind {
        EnemyKind::Slime => tuning.slime_speed,
        EnemyKind::Goblin => tuning.goblin_speed,
        EnemyKind::Boss => 0.0,
    }
}

/// Whether a goblin fires this frame.
#[must_use]
pub const fn should_fire(roll: u32, modulus: u32, cooldown_ready: bool) -> bool {
    cooldown_ready && modulus != 0 && roll % modulus == 0
}

/// Horizontal direction from `from` toward `to`; right when level.
#[must_use]
pub fn facing(from: Vec2, to: Vec2) -> f32 {
    if to.x - from.x >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Validates an enemy's walk for this frame.
///
/// # Errors
/// Returns [`EnemyError`] when either the position or the resulting
/// velocity is not finite.
pub fn plan_walk(
    entity: Entity,
    position: Vec2,
    speed: f32,
    speed_multiplier: f32,
) -> Result<Vec2, EnemyError> {
    if !position.is_finite() {
        return Err(EnemyError::NonFinitePosition { entity, position });
    }
    let velocity = Vec2::new(-speed * speed_multiplier, 0.0);
    if !velocity.is_finite() {
        return Err(EnemyError::NonFiniteVelocity { entity, velocity });
    }
    Ok(velocity)
}

type WalkerQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Transform,
        &'static Enemy,
        &'static mut Body,
        &'static Statuses,
        Option<&'static mut Shooter>,
    ),
    (Without<Player>, Without<BossBrain>),
>;

/// Walks slimes and goblins and lets goblins shoot.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn enemy_behaviour(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<Tuning>,
    mut rng: ResMut<GameRng>,
    players: Query<&Transform, With<Player>>,
    mut enemies: WalkerQuery,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let target = player.translation.truncate();
    let dt = frame_secs(&time);

    for (entity, transform, enemy, mut body, statuses, mut shooter) in &mut enemies {
        if let Some(gun) = shooter.as_deref_mut() {
            gun.cooldown = (gun.cooldown - dt).max(0.0);
        }
        let position = transform.translation.truncate();
        let speed = walk_speed(enemy.kind, &tuning);
        let velocity = match plan_walk(entity, position, speed, statuses.speed_multiplier()) {
            Ok(velocity) => velocity,
            Err(error) => {
                log::warn!("skipping enemy this frame: {error}");
                continue;
            }
        };
        if !within_cutoff(position, target, tuning.cutoff_distance) {
            continue;
        }
        body.walk(velocity);

        let Some(gun) = shooter.as_deref_mut() else {
            continue;
        };
        let roll = rng.0.gen_range(0..=SHOT_ROLL_MAX);
        if !should_fire(roll, tuning.goblin_shot_modulus, gun.cooldown <= 0.0) {
            continue;
        }
        gun.cooldown = tuning.goblin_shoot_cooldown;
        let direction = facing(position, target);
        log::debug!("{entity} fires toward {direction}");
        spawn_projectile(
            &mut commands,
            position,
            Projectile {
                faction: Faction::Enemy,
                velocity: Vec2::new(direction * tuning.bullet_speed, 0.0),
                strength: enemy.strength,
                status: None,
                lifetime: tuning.bullet_lifetime,
                source: Some(entity),
            },
        );
    }
}

/// Advances enemy status timers, applies burn damage and levitation.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn tick_enemy_statuses(
    time: Res<Time>,
    mut enemies: Query<(&mut Enemy, &mut Statuses, &mut Body)>,
) {
    let dt = frame_secs(&time);
    for (mut enemy, mut statuses, mut body) in &mut enemies {
        if statuses.is_empty() {
            body.gravity_scale = 1.0;
            continue;
        }
        let tick = statuses.tick(dt);
        if tick.damage > 0 {
            enemy.health = enemy.health.saturating_sub(tick.damage);
        }
        body.gravity_scale = statuses.gravity_multiplier();
    }
}

/// Enemies that touch a kill tile are removed without scoring.
///
/// The boss is defeated instead, so the goal still appears.
pub fn enemy_hazards(
    mut commands: Commands,
    mut contacts: MessageReader<Contact>,
    mut enemies: Query<&mut Enemy>,
    kills: Query<(), With<Kill>>,
) {
    for contact in contacts.read() {
        if !kills.contains(contact.other) {
            continue;
        }
        let Ok(mut enemy) = enemies.get_mut(contact.mover) else {
            continue;
        };
        log::debug!("enemy {} fell into a hazard", contact.mover);
        if enemy.kind == EnemyKind::Boss {
            enemy.health = 0;
        } else {
            despawn(&mut commands, contact.mover);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, true, true)]
    #[case(46, true, true)]
    #[case(46, false, false)]
    #[case(47, true, false)]
    fn goblins_fire_on_multiples_of_the_modulus(
        #[case] roll: u32,
        #[case] ready: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(should_fire(roll, 23, ready), expected);
    }

    #[test]
    fn cutoff_is_inclusive() {
        assert!(within_cutoff(Vec2::ZERO, Vec2::new(300.0, 0.0), 300.0));
        assert!(!within_cutoff(Vec2::ZERO, Vec2::new(300.1, 0.0), 300.0));
    }

    #[test]
    fn walkers_head_left_at_their_speed() {
        let tuning = Tuning::default();
        let entity = Entity::PLACEHOLDER;
        let slime = plan_walk(entity, Vec2::ZERO, walk_speed(EnemyKind::Slime, &tuning), 1.0);
        assert_eq!(slime, Ok(Vec2::new(-20.0, 0.0)));
        let chilled = plan_walk(entity, Vec2::ZERO, walk_speed(EnemyKind::Goblin, &tuning), 0.5);
        assert_eq!(chilled, Ok(Vec2::new(-25.0, 0.0)));
    }

    #[test]
    fn non_finite_positions_are_reported() {
        let result = plan_walk(Entity::PLACEHOLDER, Vec2::new(f32::NAN, 0.0), 20.0, 1.0);
        assert!(matches!(result, Err(EnemyError::NonFinitePosition { .. })));
    }

    #[test]
    fn goblins_face_the_player() {
        assert!((facing(Vec2::ZERO, Vec2::new(-3.0, 0.0)) + 1.0).abs() < f32::EPSILON);
        assert!((facing(Vec2::ZERO, Vec2::ZERO) - 1.0).abs() < f32::EPSILON);
    }
}
