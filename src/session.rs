//! Cross-level player progress.
//!
//! `PlayerState` is the single source of truth for health, boosts, score and
//! status effects. It outlives individual levels and is reset when a new run
//! starts after game over or victory.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::status::{StatusEffects, StatusKind};

/// Result of applying damage to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The player was invulnerable; nothing changed.
    Ignored,
    /// Health dropped but is still positive.
    Survived,
    /// Health reached zero or below.
    Died,
}

/// Player progress carried between scenes.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current health.
    pub health: i32,
    /// Health cap for healing.
    pub max_health: i32,
    /// Damage dealt by the player's bullets before weapon bonuses.
    pub strength: i32,
    /// Regular boosts left; refilled one at a time on landing.
    pub num_boosts: u32,
    /// Regular boosts restored on landing.
    pub max_boosts: u32,
    /// Extra boosts from pickups; never refilled.
    pub temp_boosts: u32,
    /// Points scored this run.
    pub score: u32,
    /// Element equipped for the current level run.
    pub element: Element,
    /// Active status effects.
    pub statuses: StatusEffects,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(Element::Fire)
    }
}

impl PlayerState {
    /// Fresh state for a new run with `element` equipped.
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self {
            health: 3,
            max_health: 3,
            strength: 1,
            num_boosts: 1,
            max_boosts: 1,
            temp_boosts: 0,
            score: 0,
            element,
            statuses: StatusEffects::default(),
        }
    }

    /// Restores starting values, keeping nothing from the previous run.
    pub fn reset(&mut self) {
        *self = Self::new(self.element);
    }

    /// Prepares the state for a freshly entered level.
    pub fn begin_level(&mut self, element: Element) {
        self.element = element;
        self.statuses.clear();
    }

    /// Heals by `strength`, never exceeding `max_health`.
    pub fn heal(&mut self, strength: i32) {
        self.health = self.health.saturating_add(strength).min(self.max_health);
    }

    /// Subtracts `amount` unless the player is invulnerable.
    ///
    /// Damage that lands grants [`StatusKind::Invulnerable`] for
    /// `invulnerability_secs`.
    pub fn take_damage(&mut self, amount: i32, invulnerability_secs: f32) -> DamageOutcome {
        if self.statuses.has(StatusKind::Invulnerable) {
            return DamageOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(amount);
        self.statuses
            .apply(StatusKind::Invulnerable, invulnerability_secs);
        if self.is_dead() {
            DamageOutcome::Died
        } else {
            DamageOutcome::Survived
        }
    }

    /// Subtracts damage that ignores invulnerability, such as burning.
    pub const fn take_status_damage(&mut self, amount: i32) -> DamageOutcome {
        if amount <= 0 {
            return DamageOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(amount);
        if self.is_dead() {
            DamageOutcome::Died
        } else {
            DamageOutcome::Survived
        }
    }

    /// True once health has run out.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Regular and temporary boosts combined.
    #[must_use]
    pub const fn available_boosts(&self) -> u32 {
        self.num_boosts + self.temp_boosts
    }

    /// Spends one boost, regular boosts first.
    ///
    /// Returns false when no boost is left.
    pub const fn try_consume_boost(&mut self) -> bool {
        if self.num_boosts > 0 {
            self.num_boosts -= 1;
            true
        } else if self.temp_boosts > 0 {
            self.temp_boosts -= 1;
            true
        } else {
            false
        }
    }

    /// Gives back one regular boost after landing.
    pub const fn restore_boost(&mut self) {
        if self.num_boosts < self.max_boosts {
            self.num_boosts += 1;
        }
    }

    /// Adds one temporary boost.
    pub const fn collect_temp_boost(&mut self) {
        self.temp_boosts = self.temp_boosts.saturating_add(1);
    }

    /// Adds `points` to the score.
    pub const fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn state() -> PlayerState {
        PlayerState::new(Element::Water)
    }

    #[rstest]
    #[case(1, 1, 2)]
    #[case(1, 3, 3)]
    #[case(2, 1, 3)]
    #[case(3, 1, 3)]
    fn healing_clamps_to_max(
        mut state: PlayerState,
        #[case] health: i32,
        #[case] strength: i32,
        #[case] expected: i32,
    ) {
        state.health = health;
        state.heal(strength);
        assert_eq!(state.health, expected);
    }

    #[rstest]
    fn damage_grants_invulnerability(mut state: PlayerState) {
        assert_eq!(state.take_damage(1, 1.0), DamageOutcome::Survived);
        assert_eq!(state.health, 2);
        assert_eq!(state.take_damage(1, 1.0), DamageOutcome::Ignored);
        assert_eq!(state.health, 2);

        let _ = state.statuses.tick(1.5);
        assert_eq!(state.take_damage(2, 1.0), DamageOutcome::Died);
        assert!(state.is_dead());
    }

    #[rstest]
    fn status_damage_ignores_invulnerability(mut state: PlayerState) {
        state.statuses.apply(StatusKind::Invulnerable, 5.0);
        assert_eq!(state.take_status_damage(1), DamageOutcome::Survived);
        assert_eq!(state.health, 2);
        assert_eq!(state.take_status_damage(0), DamageOutcome::Ignored);
    }

    #[rstest]
    fn regular_boosts_are_spent_first(mut state: PlayerState) {
        state.collect_temp_boost();
        assert_eq!(state.available_boosts(), 2);

        assert!(state.try_consume_boost());
        assert_eq!((state.num_boosts, state.temp_boosts), (0, 1));

        assert!(state.try_consume_boost());
        assert_eq!((state.num_boosts, state.temp_boosts), (0, 0));

        assert!(!state.try_consume_boost());
    }

    #[rstest]
    fn landing_restores_at_most_max_boosts(mut state: PlayerState) {
        state.restore_boost();
        assert_eq!(state.num_boosts, 1);

        assert!(state.try_consume_boost());
        state.restore_boost();
        assert_eq!(state.num_boosts, 1);
    }

    #[rstest]
    fn reset_keeps_element_only(mut state: PlayerState) {
        state.add_score(40);
        state.health = 1;
        state.collect_temp_boost();
        state.statuses.apply_default(StatusKind::Chilled);
        state.reset();
        assert_eq!(state, PlayerState::new(Element::Water));
    }

    #[rstest]
    fn begin_level_clears_statuses(mut state: PlayerState) {
        state.statuses.apply_default(StatusKind::Burning);
        state.add_score(3);
        state.begin_level(Element::Air);
        assert!(state.statuses.is_empty());
        assert_eq!(state.element, Element::Air);
        assert_eq!(state.score, 3);
    }
}
