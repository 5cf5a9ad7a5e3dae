//! Projectiles, crates and enemy deaths.

use bevy::prelude::*;
use hashbrown::HashSet;

use crate::components::{
    Crate, Enemy, EnemyKind, Explosion, Faction, Player, Projectile, Statuses, Terrain,
};
use crate::config::Tuning;
use crate::level::spawn::{
    despawn, spawn_death_explosion, spawn_hit_indicator, spawn_template,
};
use crate::level::Template;
use crate::loot::roll_crate_loot;
use crate::constants::TILE_UNIT;
use crate::physics::{frame_secs, Contact};
use crate::scene::GameRng;
use crate::session::PlayerState;

/// Furthest a bullet moves in one frame. Shorter than a single tile so that
/// contact detection sees every wall a bullet crosses.
pub const MAX_BULLET_STEP: f32 = TILE_UNIT;

/// Moves bullets along their velocity and runs down their lifetime.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn move_projectiles(time: Res<Time>, mut projectiles: Query<(&mut Transform, &mut Projectile)>) {
    let dt = frame_secs(&time);
    for (mut transform, mut projectile) in &mut projectiles {
        let travel = (projectile.velocity * dt).clamp_length_max(MAX_BULLET_STEP);
        transform.translation += travel.extend(0.0);
        projectile.lifetime -= dt;
    }
}

/// Removes bullets whose lifetime ran out.
pub fn expire_projectiles(mut commands: Commands, projectiles: Query<(Entity, &Projectile)>) {
    for (entity, projectile) in &projectiles {
        if projectile.lifetime <= 0.0 {
            despawn(&mut commands, entity);
        }
    }
}

/// What a bullet ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    /// Pass through without effect.
    None,
    /// Damage the enemy and destroy the bullet.
    Enemy,
    /// Break the crate and destroy the bullet.
    Crate,
    /// Destroy the bullet.
    Stop,
}

/// Decides how a bullet of `faction` reacts to what it touched.
///
/// `is_source` is true when the target fired the bullet.
#[must_use]
#[expect(
    clippy::fn_params_excessive_bools,
    reason = "Each flag is an independent property of the touched entity."
)]
pub const fn classify_impact(
    faction: Faction,
    is_enemy: bool,
    is_source: bool,
    is_crate: bool,
    is_terrain: bool,
) -> Impact {
    if is_enemy {
        return match faction {
            Faction::Player => Impact::Enemy,
            Faction::Enemy if is_source => Impact::None,
            Faction::Enemy => Impact::Stop,
        };
    }
    if is_crate {
        return Impact::Crate;
    }
    if is_terrain {
        return Impact::Stop;
    }
    Impact::None
}

type TargetQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static Transform,
        Option<&'static mut Enemy>,
        Option<&'static mut Statuses>,
        Has<Crate>,
        Has<Terrain>,
    ),
    (Without<Projectile>, Without<Player>),
>;

/// Resolves bullet hits on enemies, crates and terrain.
///
/// Bullets that hit the player are resolved by the player's contact
/// handler.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn resolve_projectile_hits(
    mut commands: Commands,
    mut contacts: MessageReader<Contact>,
    tuning: Res<Tuning>,
    mut rng: ResMut<GameRng>,
    projectiles: Query<(&Transform, &Projectile)>,
    mut targets: TargetQuery,
) {
    let mut spent = HashSet::new();
    let mut broken = HashSet::new();

    for contact in contacts.read() {
        let Ok((bullet_transform, projectile)) = projectiles.get(contact.mover) else {
            continue;
        };
        if spent.contains(&contact.mover) {
            continue;
        }
        let Ok((target_transform, enemy, statuses, is_crate, is_terrain)) =
            targets.get_mut(contact.other)
        else {
            continue;
        };

        let impact = classify_impact(
            projectile.faction,
            enemy.is_some(),
            projectile.source == Some(contact.other),
            is_crate,
            is_terrain,
        );
        match impact {
            Impact::None => continue,
            Impact::Enemy => {
                if let Some(mut hit) = enemy {
                    hit.health = hit.health.saturating_sub(projectile.strength);
                    log::debug!(
                        "{} hit for {} ({} left)",
                        contact.other,
                        projectile.strength,
                        hit.health
                    );
                }
                if let (Some(status), Some(mut effects)) = (projectile.status, statuses) {
                    effects.apply_default(status);
                }
            }
            Impact::Crate => {
                if broken.insert(contact.other) {
                    let position = target_transform.translation.truncate();
                    break_crate(&mut commands, contact.other, position, &tuning, &mut rng);
                }
            }
            Impact::Stop => {}
        }

        spent.insert(contact.mover);
        despawn(&mut commands, contact.mover);
        spawn_hit_indicator(&mut commands, bullet_transform.translation.truncate(), &tuning);
    }
}

fn break_crate(
    commands: &mut Commands,
    crate_entity: Entity,
    position: Vec2,
    tuning: &Tuning,
    rng: &mut GameRng,
) {
    despawn(commands, crate_entity);
    if let Some(loot) = roll_crate_loot(&mut rng.0) {
        log::debug!("crate dropped {loot:?}");
        spawn_template(commands, loot.template(), position, tuning);
    }
}

/// Removes defeated enemies, scoring them and leaving an explosion.
///
/// A defeated boss leaves the level goal behind.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn remove_defeated_enemies(
    mut commands: Commands,
    tuning: Res<Tuning>,
    mut state: ResMut<PlayerState>,
    enemies: Query<(Entity, &Transform, &Enemy)>,
) {
    for (entity, transform, enemy) in &enemies {
        if !enemy.is_defeated() {
            continue;
        }
        let position = transform.translation.truncate();
        despawn(&mut commands, entity);
        spawn_death_explosion(&mut commands, position, &tuning);
        state.add_score(enemy.score_value);
        log::info!("{:?} defeated, +{} score", enemy.kind, enemy.score_value);

        if enemy.kind == EnemyKind::Boss {
            spawn_template(&mut commands, Template::Goal, position, &tuning);
            log::info!("the goal appears where the boss fell");
        }
    }
}

/// Grows explosions and removes them when their time is up.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn animate_explosions(
    mut commands: Commands,
    time: Res<Time>,
    mut explosions: Query<(Entity, &mut Transform, &mut Explosion)>,
) {
    let dt = frame_secs(&time);
    for (entity, mut transform, mut explosion) in &mut explosions {
        explosion.remaining -= dt;
        if explosion.remaining <= 0.0 {
            despawn(&mut commands, entity);
            continue;
        }
        let grow = explosion.growth * dt;
        transform.scale.x += grow;
        transform.scale.y += grow;
    }
}
