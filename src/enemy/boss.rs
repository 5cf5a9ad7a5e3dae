//! The level-three boss.
//!
//! [`BossBrain`] is a small phase machine ticked once per frame. It only
//! decides *what* to do; [`boss_behaviour`] turns each [`BossCommand`] into
//! movement and bullets.

use bevy::prelude::*;

use crate::components::{Enemy, Faction, Player, Projectile, Statuses};
use crate::config::Tuning;
use crate::level::spawn::spawn_projectile;
use crate::physics::{frame_secs, Body};
use crate::scene::Progress;

const IDLE_SECS: f32 = 1.0;
const STALK_SECS: f32 = 2.0;
const SLAM_TIMEOUT_SECS: f32 = 1.5;
/// Gap between shots in a volley.
pub const VOLLEY_INTERVAL_SECS: f32 = 0.3;
const VOLLEY_SHOTS: u8 = 3;
const ENRAGED_VOLLEY_SHOTS: u8 = 5;
/// Phase timers are multiplied by this once enraged.
const ENRAGED_TIME_SCALE: f32 = 0.6;
const ENRAGED_SPEED_SCALE: f32 = 1.5;

/// Stage of the boss's attack cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BossPhase {
    /// Standing still.
    Idle,
    /// Walking toward the player.
    Stalk,
    /// Firing aimed shots.
    Volley,
    /// Leaping at the player.
    Slam,
}

/// What the boss does this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossCommand {
    /// Stand still.
    Hold,
    /// Walk toward the player.
    Stalk,
    /// Fire one shot at the player.
    Fire,
    /// Leap toward the player.
    Slam,
    /// Keep drifting toward the player while airborne.
    Glide,
}

/// Inputs the brain reads each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossSense {
    /// Current boss health.
    pub health: i32,
    /// Boss health at spawn.
    pub max_health: i32,
    /// The boss touched down this frame.
    pub landed: bool,
}

/// Phase machine driving the boss.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct BossBrain {
    phase: BossPhase,
    timer: f32,
    shots_left: u8,
    leapt: bool,
    enraged: bool,
}

impl Default for BossBrain {
    fn default() -> Self {
        Self {
            phase: BossPhase::Idle,
            timer: IDLE_SECS,
            shots_left: 0,
            leapt: false,
            enraged: false,
        }
    }
}

impl BossBrain {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> BossPhase {
        self.phase
    }

    /// True once the boss has dropped to half health.
    #[must_use]
    pub const fn is_enraged(&self) -> bool {
        self.enraged
    }

    /// Stalk speed after the enrage bonus.
    #[must_use]
    pub fn stalk_speed(&self, base: f32) -> f32 {
        if self.enraged {
            base * ENRAGED_SPEED_SCALE
        } else {
            base
        }
    }

    fn time_scale(&self) -> f32 {
        if self.enraged {
            ENRAGED_TIME_SCALE
        } else {
            1.0
        }
    }

    fn enter(&mut self, phase: BossPhase) {
        log::debug!("boss {:?} -> {phase:?}", self.phase);
        self.phase = phase;
        match phase {
            BossPhase::Idle => self.timer = IDLE_SECS * self.time_scale(),
            BossPhase::Stalk => self.timer = STALK_SECS * self.time_scale(),
            BossPhase::Volley => {
                self.timer = 0.0;
                self.shots_left = if self.enraged {
                    ENRAGED_VOLLEY_SHOTS
                } else {
                    VOLLEY_SHOTS
                };
            }
            BossPhase::Slam => {
                self.timer = SLAM_TIMEOUT_SECS * self.time_scale();
                self.leapt = false;
            }
        }
    }

    /// Advances the brain by `dt` seconds.
    pub fn tick(&mut self, dt: f32, sense: BossSense) -> BossCommand {
        if !self.enraged && sense.health.saturating_mul(2) <= sense.max_health {
            self.enraged = true;
            log::info!("boss is enraged");
        }

        match self.phase {
            BossPhase::Idle => {
                self.timer -= dt;
                if self.timer <= 0.0 {
                    self.enter(BossPhase::Stalk);
                }
                BossCommand::Hold
            }
            BossPhase::Stalk => {
                self.timer -= dt;
                if self.timer <= 0.0 {
                    self.enter(BossPhase::Volley);
                }
                BossCommand::Stalk
            }
            BossPhase::Volley => {
                self.timer -= dt;
                if self.timer > 0.0 {
                    return BossCommand::Hold;
                }
                self.shots_left = self.shots_left.saturating_sub(1);
                if self.shots_left == 0 {
                    self.enter(BossPhase::Slam);
                } else {
                    self.timer = VOLLEY_INTERVAL_SECS;
                }
                BossCommand::Fire
            }
            BossPhase::Slam => {
                if !self.leapt {
                    self.leapt = true;
                    return BossCommand::Slam;
                }
                self.timer -= dt;
                if sense.landed || self.timer <= 0.0 {
                    self.enter(BossPhase::Idle);
                    return BossCommand::Hold;
                }
                BossCommand::Glide
            }
        }
    }
}

/// Unit vector from `from` to `to`, or left when they coincide.
#[must_use]
pub fn aim(from: Vec2, to: Vec2) -> Vec2 {
    let direction = (to - from).normalize_or_zero();
    if direction == Vec2::ZERO {
        Vec2::NEG_X
    } else {
        direction
    }
}

/// Drives every boss within range of the player.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn boss_behaviour(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<Tuning>,
    progress: Res<Progress>,
    players: Query<&Transform, With<Player>>,
    mut bosses: Query<
        (Entity, &Transform, &Enemy, &mut Body, &mut BossBrain, &Statuses),
        Without<Player>,
    >,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let target = player.translation.truncate();
    let dt = frame_secs(&time);

    for (entity, transform, enemy, mut body, mut brain, statuses) in &mut bosses {
        let position = transform.translation.truncate();
        if position.distance(target) > tuning.cutoff_distance {
            continue;
        }
        let sense = BossSense {
            health: enemy.health,
            max_health: enemy.max_health,
            landed: body.landed,
        };
        let toward = if target.x >= position.x { 1.0 } else { -1.0 };
        let speed = brain.stalk_speed(tuning.boss_stalk_speed) * statuses.speed_multiplier();

        match brain.tick(dt, sense) {
            BossCommand::Hold => {}
            BossCommand::Stalk | BossCommand::Glide => body.walk(Vec2::new(toward * speed, 0.0)),
            BossCommand::Slam => body.jump(tuning.boss_jump_force),
            BossCommand::Fire => {
                let direction = aim(position, target);
                spawn_projectile(
                    &mut commands,
                    position,
                    Projectile {
                        faction: Faction::Enemy,
                        velocity: direction * tuning.bullet_speed,
                        strength: enemy.strength,
                        status: Some(progress.element.weapon_profile().status),
                        lifetime: tuning.bullet_lifetime,
                        source: Some(entity),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const FRAME: f32 = 1.0 / 60.0;

    #[fixture]
    fn calm() -> BossSense {
        BossSense {
            health: 20,
            max_health: 20,
            landed: false,
        }
    }

    fn run_until(brain: &mut BossBrain, sense: BossSense, phase: BossPhase) -> u32 {
        let mut frames = 0;
        while brain.phase() != phase {
            brain.tick(FRAME, sense);
            frames += 1;
            assert!(frames < 10_000, "never reached {phase:?}");
        }
        frames
    }

    #[rstest]
    fn cycles_through_every_phase(calm: BossSense) {
        let mut brain = BossBrain::default();
        assert_eq!(brain.phase(), BossPhase::Idle);
        run_until(&mut brain, calm, BossPhase::Stalk);
        run_until(&mut brain, calm, BossPhase::Volley);
        run_until(&mut brain, calm, BossPhase::Slam);
        run_until(&mut brain, calm, BossPhase::Idle);
    }

    #[rstest]
    fn idle_lasts_about_a_second(calm: BossSense) {
        let mut brain = BossBrain::default();
        let frames = run_until(&mut brain, calm, BossPhase::Stalk);
        assert!((59..=61).contains(&frames), "idle took {frames} frames");
    }

    fn count_shots(brain: &mut BossBrain, sense: BossSense) -> usize {
        let mut shots = 0;
        while brain.phase() == BossPhase::Volley {
            if brain.tick(FRAME, sense) == BossCommand::Fire {
                shots += 1;
            }
        }
        shots
    }

    #[rstest]
    fn volley_fires_three_shots(calm: BossSense) {
        let mut brain = BossBrain::default();
        run_until(&mut brain, calm, BossPhase::Volley);
        assert_eq!(count_shots(&mut brain, calm), 3);
    }

    #[test]
    fn enraged_volley_fires_five_shots() {
        let hurt = BossSense {
            health: 10,
            max_health: 20,
            landed: false,
        };
        let mut brain = BossBrain::default();
        run_until(&mut brain, hurt, BossPhase::Volley);
        assert!(brain.is_enraged());
        assert_eq!(count_shots(&mut brain, hurt), 5);
    }

    #[test]
    fn enrage_shortens_phases_and_speeds_up() {
        let hurt = BossSense {
            health: 3,
            max_health: 20,
            landed: false,
        };
        let mut brain = BossBrain::default();
        brain.tick(FRAME, hurt);
        run_until(&mut brain, hurt, BossPhase::Stalk);
        let frames = run_until(&mut brain, hurt, BossPhase::Volley);
        assert!((71..=73).contains(&frames), "stalk took {frames} frames");
        assert_relative_eq!(brain.stalk_speed(40.0), 60.0);
    }

    #[rstest]
    fn slam_leaps_once_and_ends_on_landing(calm: BossSense) {
        let mut brain = BossBrain::default();
        run_until(&mut brain, calm, BossPhase::Slam);
        assert_eq!(brain.tick(FRAME, calm), BossCommand::Slam);
        assert_eq!(brain.tick(FRAME, calm), BossCommand::Glide);
        let landed = BossSense {
            landed: true,
            ..calm
        };
        assert_eq!(brain.tick(FRAME, landed), BossCommand::Hold);
        assert_eq!(brain.phase(), BossPhase::Idle);
    }

    #[test]
    fn aim_defaults_left_when_on_top_of_target() {
        assert_eq!(aim(Vec2::ONE, Vec2::ONE), Vec2::NEG_X);
        let right = aim(Vec2::ZERO, Vec2::new(5.0, 0.0));
        assert_relative_eq!(right.x, 1.0);
    }
}
