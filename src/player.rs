//! Player input, movement and everything the player can touch.
//!
//! Controls: A/D walk, W jumps when grounded, Shift boosts in the held
//! direction, Space shoots. While a boost is active the player ignores
//! gravity and walking and is pulled toward the boost target instead.

use bevy::ecs::query::QueryData;
use bevy::prelude::*;
use hashbrown::HashSet;

use crate::boost::{boost_target, DirectionInput};
use crate::components::{
    AirBoost, Coin, Crumbling, CrumblingBlock, Enemy, ExtraBoost, Faction, Goal, HealthPotion,
    Kill, LevelEntity, NonSlippery, Player, PlayerMotion, Projectile, Respawner,
    RespawningExtraBoost, Slippery,
};
use crate::config::Tuning;
use crate::flavor::DeathCause;
use crate::level::spawn::{despawn, spawn_hit_indicator, spawn_projectile, spawn_template};
use crate::level::Template;
use crate::physics::{frame_secs, Body, Contact, ContactCache};
use crate::scene::{LevelCompleted, PlayerDied};
use crate::session::{DamageOutcome, PlayerState};

/// Direction of a shot for the held keys: up, else left, else down, else
/// right.
#[must_use]
pub fn shot_direction(input: DirectionInput) -> Vec2 {
    if input.up {
        Vec2::Y
    } else if input.left {
        Vec2::NEG_X
    } else if input.down {
        Vec2::NEG_Y
    } else {
        Vec2::X
    }
}

/// Horizontal walk direction; opposing keys cancel.
#[must_use]
pub const fn walk_axis(input: DirectionInput) -> f32 {
    match (input.left, input.right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

fn read_directions(keys: &ButtonInput<KeyCode>) -> DirectionInput {
    DirectionInput {
        up: keys.pressed(KeyCode::KeyW),
        down: keys.pressed(KeyCode::KeyS),
        left: keys.pressed(KeyCode::KeyA),
        right: keys.pressed(KeyCode::KeyD),
    }
}

/// Turns keyboard state into walking, jumping, boosting and shooting.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn player_input(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    tuning: Res<Tuning>,
    mut state: ResMut<PlayerState>,
    mut players: Query<(Entity, &Transform, &mut Body, &mut PlayerMotion), With<Player>>,
) {
    let Ok((entity, transform, mut body, mut motion)) = players.single_mut() else {
        return;
    };
    let dt = frame_secs(&time);
    let position = transform.translation.truncate();
    let input = read_directions(&keys);
    motion.shoot_cooldown = (motion.shoot_cooldown - dt).max(0.0);

    // A new boost replaces one still in flight.
    if keys.any_just_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight])
        && state.try_consume_boost()
    {
        let target = boost_target(position, input, body.grounded, tuning.boost_distance);
        motion.boost.start(target, tuning.boost_duration);
        log::debug!("boosting from {position} toward {target}");
    }

    if motion.boost.is_active() {
        let velocity = motion.boost.step(position, dt, tuning.boost_lerp_rate);
        body.gravity_scale = 0.0;
        body.vertical_velocity = 0.0;
        body.walk(velocity);
    } else {
        body.gravity_scale = state.statuses.gravity_multiplier();
        let speed = motion.move_speed * state.statuses.speed_multiplier();
        body.walk(Vec2::new(walk_axis(input) * speed, 0.0));
        if keys.just_pressed(KeyCode::KeyW) && body.grounded {
            body.jump(tuning.player_jump_force);
        }
    }

    if keys.pressed(KeyCode::Space) && motion.shoot_cooldown <= 0.0 {
        motion.shoot_cooldown = tuning.shoot_cooldown;
        let weapon = state.element.weapon_profile();
        let speed = tuning.bullet_speed * weapon.speed_multiplier;
        spawn_projectile(
            &mut commands,
            position,
            Projectile {
                faction: Faction::Player,
                velocity: shot_direction(input) * speed,
                strength: state.strength.saturating_add(weapon.bonus_damage),
                status: Some(weapon.status),
                lifetime: tuning.bullet_lifetime,
                source: Some(entity),
            },
        );
    }
}

/// Gives a spent boost back when the player lands.
pub fn restore_boost_on_landing(
    mut state: ResMut<PlayerState>,
    players: Query<&Body, With<Player>>,
) {
    for body in &players {
        if body.landed {
            state.restore_boost();
        }
    }
}

/// Runs down player status timers and applies burn damage.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn tick_player_statuses(time: Res<Time>, mut state: ResMut<PlayerState>) {
    if state.statuses.is_empty() {
        return;
    }
    let tick = state.statuses.tick(frame_secs(&time));
    if tick.damage > 0 {
        let outcome = state.take_status_damage(tick.damage);
        log::debug!("burning for {} ({outcome:?})", tick.damage);
    }
    for kind in tick.expired {
        log::debug!("{kind} wore off");
    }
}

/// Ends the run once health runs out.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn check_player_health(mut commands: Commands, state: Res<PlayerState>) {
    if state.is_dead() {
        commands.trigger(PlayerDied {
            cause: DeathCause::WornDown,
        });
    }
}

/// Everything the player can touch.
#[derive(QueryData)]
pub struct Touched {
    entity: Entity,
    transform: &'static Transform,
    goal: Has<Goal>,
    kill: Option<&'static Kill>,
    crumbling_block: Has<CrumblingBlock>,
    crumbling: Has<Crumbling>,
    air_boost: Has<AirBoost>,
    slippery: Has<Slippery>,
    non_slippery: Has<NonSlippery>,
    projectile: Option<&'static Projectile>,
    coin: Has<Coin>,
    potion: Option<&'static HealthPotion>,
    extra_boost: Has<ExtraBoost>,
    respawning_boost: Has<RespawningExtraBoost>,
}

fn report_damage(state: &PlayerState, outcome: DamageOutcome, what: &str) {
    match outcome {
        DamageOutcome::Ignored => {}
        DamageOutcome::Survived => log::debug!("hit by {what}, health {}", state.health),
        DamageOutcome::Died => log::debug!("killed by {what}"),
    }
}

/// Applies the effect of everything the player started touching.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn player_contacts(
    mut commands: Commands,
    mut contacts: MessageReader<Contact>,
    tuning: Res<Tuning>,
    mut state: ResMut<PlayerState>,
    mut players: Query<(&mut Body, &mut PlayerMotion), With<Player>>,
    targets: Query<Touched, Without<Player>>,
) {
    let mut consumed = HashSet::new();

    for contact in contacts.read() {
        let Ok((mut body, mut motion)) = players.get_mut(contact.mover) else {
            continue;
        };
        let Ok(touched) = targets.get(contact.other) else {
            continue;
        };
        if consumed.contains(&touched.entity) {
            continue;
        }
        let position = touched.transform.translation.truncate();

        if touched.goal {
            commands.trigger(LevelCompleted);
        }
        if let Some(Kill(cause)) = touched.kill {
            commands.trigger(PlayerDied { cause: *cause });
        }
        if touched.crumbling_block && !touched.crumbling {
            commands.entity(touched.entity).try_insert(Crumbling {
                remaining: tuning.crumble_duration,
                duration: tuning.crumble_duration,
            });
        }
        if touched.air_boost {
            body.jump(tuning.air_boost_force);
        }
        if body.grounded && touched.slippery {
            motion.move_speed = tuning.player_move_speed * tuning.ice_speed_multiplier;
        } else if body.grounded && touched.non_slippery {
            motion.move_speed = tuning.player_move_speed;
        }

        if let Some(projectile) = touched.projectile {
            if projectile.faction == Faction::Enemy {
                let outcome = state.take_damage(projectile.strength, tuning.invulnerability);
                if let Some(status) = projectile.status.filter(|_| outcome != DamageOutcome::Ignored)
                {
                    state.statuses.apply_default(status);
                }
                report_damage(&state, outcome, "a bullet");
                consumed.insert(touched.entity);
                despawn(&mut commands, touched.entity);
                spawn_hit_indicator(&mut commands, position, &tuning);
            }
        }

        if touched.coin {
            state.add_score(1);
            consumed.insert(touched.entity);
            despawn(&mut commands, touched.entity);
        }
        if let Some(potion) = touched.potion {
            state.heal(potion.strength);
            consumed.insert(touched.entity);
            despawn(&mut commands, touched.entity);
        }
        if touched.extra_boost || touched.respawning_boost {
            state.collect_temp_boost();
            consumed.insert(touched.entity);
            despawn(&mut commands, touched.entity);
        }
        if touched.respawning_boost {
            commands.spawn((
                LevelEntity,
                Name::new("BoostRespawner"),
                Respawner {
                    remaining: tuning.respawning_boost_delay,
                    position,
                },
            ));
        }
    }
}

/// Hurts the player for every enemy it is overlapping.
///
/// Runs every frame rather than on contact begin, so an enemy that stays
/// pressed against the player hits again once invulnerability wears off.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn enemy_contact_damage(
    cache: Res<ContactCache>,
    tuning: Res<Tuning>,
    mut state: ResMut<PlayerState>,
    players: Query<Entity, With<Player>>,
    enemies: Query<&Enemy>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    for other in cache.touching(player) {
        let Ok(enemy) = enemies.get(other) else {
            continue;
        };
        let outcome = state.take_damage(enemy.strength, tuning.invulnerability);
        report_damage(&state, outcome, "an enemy");
    }
}

/// Shrinks touched crumbling blocks and removes them when done.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn crumble_blocks(
    mut commands: Commands,
    time: Res<Time>,
    mut blocks: Query<(Entity, &mut Transform, &mut Crumbling)>,
) {
    let dt = frame_secs(&time);
    for (entity, mut transform, mut crumbling) in &mut blocks {
        crumbling.remaining -= dt;
        if crumbling.remaining <= 0.0 {
            despawn(&mut commands, entity);
        } else {
            transform.scale.y = crumbling.remaining / crumbling.duration;
        }
    }
}

/// Puts respawning boosts back once their delay has passed.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn respawn_boosts(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<Tuning>,
    mut respawners: Query<(Entity, &mut Respawner)>,
) {
    let dt = frame_secs(&time);
    for (entity, mut respawner) in &mut respawners {
        respawner.remaining -= dt;
        if respawner.remaining <= 0.0 {
            despawn(&mut commands, entity);
            spawn_template(
                &mut commands,
                Template::RespawningExtraBoost,
                respawner.position,
                &tuning,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::none(DirectionInput::default(), Vec2::X)]
    #[case::up_wins(DirectionInput { up: true, left: true, down: true, right: false }, Vec2::Y)]
    #[case::left_beats_down(DirectionInput { left: true, down: true, ..Default::default() }, Vec2::NEG_X)]
    #[case::down(DirectionInput { down: true, ..Default::default() }, Vec2::NEG_Y)]
    #[case::right(DirectionInput { right: true, ..Default::default() }, Vec2::X)]
    fn shots_follow_key_priority(#[case] input: DirectionInput, #[case] expected: Vec2) {
        assert_eq!(shot_direction(input), expected);
    }

    #[rstest]
    #[case(DirectionInput { left: true, ..Default::default() }, -1.0)]
    #[case(DirectionInput { right: true, ..Default::default() }, 1.0)]
    #[case(DirectionInput { left: true, right: true, ..Default::default() }, 0.0)]
    fn walking_follows_left_and_right(#[case] input: DirectionInput, #[case] expected: f32) {
        assert!((walk_axis(input) - expected).abs() < f32::EPSILON);
    }
}
