//! Boost movement: the directional dash the player spends boosts on.
//!
//! [`boost_target`] maps the held direction keys to a target point and
//! [`BoostState`] pulls the player toward it for a fixed duration. Gravity is
//! suspended for the player while a boost is active.
//!
//! Coordinates are world space with `+y` pointing up.

use glam::Vec2;

/// Direction keys held at the moment a boost, shot or walk is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "This struct represents the pressed state of exactly four directional keys."
)]
pub struct DirectionInput {
    /// W is held.
    pub up: bool,
    /// S is held.
    pub down: bool,
    /// A is held.
    pub left: bool,
    /// D is held.
    pub right: bool,
}

/// Computes where a boost started at `position` should pull the player.
///
/// Right takes priority over left, and a horizontal key combined with up or
/// down produces a diagonal whose vertical component is halved. Down is
/// ignored while grounded. With no usable key the boost goes right.
///
/// # Examples
///
/// ```
/// use elemancer::boost::{boost_target, DirectionInput};
/// use glam::Vec2;
///
/// let input = DirectionInput { right: true, up: true, ..Default::default() };
/// let target = boost_target(Vec2::ZERO, input, false, 200.0);
/// assert_eq!(target, Vec2::new(200.0, 100.0));
/// ```
#[must_use]
pub fn boost_target(position: Vec2, input: DirectionInput, grounded: bool, distance: f32) -> Vec2 {
    let half = distance / 2.0;
    let diagonal_y = |horizontal: f32| {
        if input.up {
            Vec2::new(horizontal, half)
        } else if input.down && !grounded {
            Vec2::new(horizontal, -half)
        } else {
            Vec2::new(horizontal, 0.0)
        }
    };

    let offset = if input.right {
        diagonal_y(distance)
    } else if input.left {
        diagonal_y(-distance)
    } else if input.up {
        Vec2::new(0.0, half)
    } else if input.down && !grounded {
        Vec2::new(0.0, -distance)
    } else {
        Vec2::new(distance, 0.0)
    };

    position + offset
}

/// State of the player's current boost, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoostState {
    target: Option<Vec2>,
    remaining: f32,
}

impl BoostState {
    /// Begins pulling toward `target` for `duration` seconds.
    ///
    /// Starting a new boost replaces any boost in progress, including its
    /// timer.
    pub fn start(&mut self, target: Vec2, duration: f32) {
        self.target = Some(target);
        self.remaining = duration;
    }

    /// Current target while boosting.
    #[must_use]
    pub const fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Returns true while a boost is pulling the player.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.target.is_some()
    }

    /// Cancels the boost.
    pub fn stop(&mut self) {
        self.target = None;
        self.remaining = 0.0;
    }

    /// Advances the boost by `dt` and returns the velocity to apply this
    /// frame.
    ///
    /// The velocity covers `lerp_rate` times the remaining offset per second.
    /// The boost ends once the player is within half a unit of the target or
    /// when its duration runs out.
    pub fn step(&mut self, position: Vec2, dt: f32, lerp_rate: f32) -> Vec2 {
        let Some(target) = self.target else {
            return Vec2::ZERO;
        };

        let offset = target - position;
        if offset.length().round() == 0.0 {
            self.stop();
            return Vec2::ZERO;
        }

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.stop();
        }

        offset * lerp_rate
    }
}
