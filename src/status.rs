//! Status-effect timers shared by the player and enemies.
//!
//! A [`StatusEffects`] value holds at most one timer per [`StatusKind`].
//! Re-applying an active kind keeps whichever duration is longer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Burn damage dealt for each full second a target keeps burning.
pub const BURN_DAMAGE_PER_SECOND: i32 = 1;

/// Named status effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Takes damage over time.
    Burning,
    /// Moves at half speed.
    Chilled,
    /// Cannot walk.
    Rooted,
    /// Falls slowly.
    Levitating,
    /// Ignores contact and projectile damage.
    Invulnerable,
}

impl StatusKind {
    /// How long the effect lasts when applied without an explicit duration.
    #[must_use]
    pub const fn default_duration(self) -> f32 {
        match self {
            Self::Burning | Self::Levitating => 1.5,
            Self::Chilled => 2.0,
            Self::Rooted | Self::Invulnerable => 1.0,
        }
    }

    const fn speed_factor(self) -> f32 {
        match self {
            Self::Chilled => 0.5,
            Self::Rooted => 0.0,
            Self::Burning | Self::Levitating | Self::Invulnerable => 1.0,
        }
    }

    const fn gravity_factor(self) -> f32 {
        match self {
            Self::Levitating => 0.25,
            Self::Burning | Self::Chilled | Self::Rooted | Self::Invulnerable => 1.0,
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Burning => "Burning",
            Self::Chilled => "Chilled",
            Self::Rooted => "Rooted",
            Self::Levitating => "Levitating",
            Self::Invulnerable => "Invulnerable",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct ActiveStatus {
    kind: StatusKind,
    remaining: f32,
    /// Seconds since the last burn tick.
    elapsed: f32,
}

/// Outcome of advancing status timers by one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTick {
    /// Damage accrued from burning during this tick.
    pub damage: i32,
    /// Kinds whose timers ran out during this tick.
    pub expired: Vec<StatusKind>,
}

/// The set of active status effects on one target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    active: Vec<ActiveStatus>,
}

impl StatusEffects {
    /// Applies `kind` for `duration` seconds.
    ///
    /// An already active effect keeps the longer of its remaining time and
    /// `duration`. Non-positive durations are ignored.
    pub fn apply(&mut self, kind: StatusKind, duration: f32) {
        if duration <= 0.0 || !duration.is_finite() {
            return;
        }
        if let Some(existing) = self.active.iter_mut().find(|status| status.kind == kind) {
            existing.remaining = existing.remaining.max(duration);
            return;
        }
        self.active.push(ActiveStatus {
            kind,
            remaining: duration,
            elapsed: 0.0,
        });
    }

    /// Applies `kind` for its default duration.
    pub fn apply_default(&mut self, kind: StatusKind) {
        self.apply(kind, kind.default_duration());
    }

    /// Returns true while `kind` is active.
    #[must_use]
    pub fn has(&self, kind: StatusKind) -> bool {
        self.active.iter().any(|status| status.kind == kind)
    }

    /// Remaining seconds for `kind`, if active.
    #[must_use]
    pub fn remaining(&self, kind: StatusKind) -> Option<f32> {
        self.active
            .iter()
            .find(|status| status.kind == kind)
            .map(|status| status.remaining)
    }

    /// Active kinds with their remaining seconds, in application order.
    pub fn iter(&self) -> impl Iterator<Item = (StatusKind, f32)> + '_ {
        self.active.iter().map(|status| (status.kind, status.remaining))
    }

    /// True when no effect is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Removes every active effect.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Advances every timer by `dt` seconds.
    ///
    /// Burning deals [`BURN_DAMAGE_PER_SECOND`] each time a full second of
    /// burning has elapsed. A burn that expires mid-second deals nothing for
    /// the partial second.
    pub fn tick(&mut self, dt: f32) -> StatusTick {
        let mut outcome = StatusTick::default();
        if dt <= 0.0 || !dt.is_finite() {
            return outcome;
        }

        for status in &mut self.active {
            let step = dt.min(status.remaining);
            status.remaining -= dt;
            if status.kind == StatusKind::Burning {
                status.elapsed += step;
                while status.elapsed >= 1.0 {
                    status.elapsed -= 1.0;
                    outcome.damage += BURN_DAMAGE_PER_SECOND;
                }
            }
            if status.remaining <= 0.0 {
                outcome.expired.push(status.kind);
            }
        }

        self.active.retain(|status| status.remaining > 0.0);
        outcome
    }

    /// Combined walking-speed multiplier of every active effect.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        self.active
            .iter()
            .map(|status| status.kind.speed_factor())
            .product()
    }

    /// Combined gravity multiplier of every active effect.
    #[must_use]
    pub fn gravity_multiplier(&self) -> f32 {
        self.active
            .iter()
            .map(|status| status.kind.gravity_factor())
            .product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn applying_twice_keeps_longer_duration() {
        let mut effects = StatusEffects::default();
        effects.apply(StatusKind::Chilled, 2.0);
        effects.apply(StatusKind::Chilled, 0.5);
        assert_relative_eq!(effects.remaining(StatusKind::Chilled).unwrap_or(0.0), 2.0);

        effects.apply(StatusKind::Chilled, 3.0);
        assert_relative_eq!(effects.remaining(StatusKind::Chilled).unwrap_or(0.0), 3.0);
        assert_eq!(effects.iter().count(), 1);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f32::NAN)]
    fn ignores_degenerate_durations(#[case] duration: f32) {
        let mut effects = StatusEffects::default();
        effects.apply(StatusKind::Rooted, duration);
        assert!(effects.is_empty());
    }

    #[test]
    fn timers_expire() {
        let mut effects = StatusEffects::default();
        effects.apply(StatusKind::Rooted, 1.0);
        let first = effects.tick(0.6);
        assert!(first.expired.is_empty());
        assert!(effects.has(StatusKind::Rooted));

        let second = effects.tick(0.6);
        assert_eq!(second.expired, vec![StatusKind::Rooted]);
        assert!(!effects.has(StatusKind::Rooted));
    }

    #[test]
    fn burn_damage_accrues_per_full_second() {
        let mut effects = StatusEffects::default();
        effects.apply(StatusKind::Burning, 2.5);

        let mut total = 0;
        for _ in 0..10 {
            total += effects.tick(0.25).damage;
        }
        assert_eq!(total, 2, "2.5s of burning deals two full seconds of damage");
        assert!(effects.is_empty());
    }

    #[test]
    fn default_burn_deals_one_damage() {
        let mut effects = StatusEffects::default();
        effects.apply_default(StatusKind::Burning);
        let total: i32 = (0..20).map(|_| effects.tick(0.1).damage).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn movement_modifiers_combine() {
        let mut effects = StatusEffects::default();
        assert_relative_eq!(effects.speed_multiplier(), 1.0);

        effects.apply_default(StatusKind::Chilled);
        assert_relative_eq!(effects.speed_multiplier(), 0.5);

        effects.apply_default(StatusKind::Rooted);
        assert_relative_eq!(effects.speed_multiplier(), 0.0);

        effects.apply_default(StatusKind::Levitating);
        assert_relative_eq!(effects.gravity_multiplier(), 0.25);
    }

    #[test]
    fn zero_tick_changes_nothing() {
        let mut effects = StatusEffects::default();
        effects.apply(StatusKind::Invulnerable, 1.0);
        let outcome = effects.tick(0.0);
        assert_eq!(outcome, StatusTick::default());
        assert_relative_eq!(
            effects.remaining(StatusKind::Invulnerable).unwrap_or(0.0),
            1.0
        );
    }

    #[test]
    fn clear_removes_everything() {
        let mut effects = StatusEffects::default();
        effects.apply_default(StatusKind::Burning);
        effects.apply_default(StatusKind::Chilled);
        effects.clear();
        assert!(effects.is_empty());
    }
}
