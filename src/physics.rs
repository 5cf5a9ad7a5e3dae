//! Kinematic bodies and contact reporting.
//!
//! Bevy ships no physics, so the game carries the small subset it needs:
//! gravity with a terminal fall speed, axis-separated push-out against
//! [`Solid`] colliders, grounded detection, and begin-contact messages for
//! everything that moves. Colliders are axis-aligned boxes centred on the
//! entity's `Transform`.

use bevy::prelude::*;
use hashbrown::HashSet;

use crate::config::Tuning;

/// Longest frame the simulation will integrate in one step.
pub const MAX_FRAME_SECS: f32 = 1.0 / 20.0;
/// Simulation time for this frame, capped at [`MAX_FRAME_SECS`].
///
/// Every gameplay timer and mover advances by this amount, so a stalled
/// frame slows the game down instead of letting things skip through walls.
#[must_use]
pub fn frame_secs(time: &Time) -> f32 {
    time.delta_secs().min(MAX_FRAME_SECS)
}

/// Longest distance a body travels between collision checks.
const MAX_SUBSTEP: f32 = 2.0;
const MAX_SUBSTEPS: u16 = 64;
/// Depth of the foot check below a body used for grounded detection.
const GROUND_CHECK: f32 = 0.5;
/// Margin within which two boxes count as touching.
pub const CONTACT_SLOP: f32 = 0.5;
/// Boxes are shrunk by this much on the cross axis while resolving so that
/// resting contact does not register as a side collision.
const SKIN: f32 = 0.05;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl Aabb {
    /// Box of `size` centred on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Grows the box by `margin` on every side.
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Strict overlap; boxes that only share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Box collider centred on the entity's translation.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Width and height.
    pub size: Vec2,
}

impl Collider {
    /// Square collider with sides of `edge`.
    #[must_use]
    pub const fn square(edge: f32) -> Self {
        Self {
            size: Vec2::splat(edge),
        }
    }

    /// World-space box for an entity at `transform`.
    #[must_use]
    pub fn aabb(&self, transform: &Transform) -> Aabb {
        Aabb::from_center(transform.translation.truncate(), self.size)
    }
}

/// Blocks bodies.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Solid;

/// Marks entities whose contacts are reported.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Mover;

/// A gravity-affected body.
///
/// Horizontal motion is requested each frame through [`Body::walk`] and
/// consumed by the next physics step. Vertical motion is carried in
/// `vertical_velocity`.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Upward speed; negative while falling.
    pub vertical_velocity: f32,
    /// Terminal fall speed.
    pub max_velocity: f32,
    /// Multiplier on world gravity. Zero while boosting.
    pub gravity_scale: f32,
    /// Resting on a solid this step.
    pub grounded: bool,
    /// True on the step the body touched down.
    pub landed: bool,
    pending: Vec2,
}

impl Body {
    /// Body at rest with the given terminal fall speed.
    #[must_use]
    pub const fn new(max_velocity: f32) -> Self {
        Self {
            vertical_velocity: 0.0,
            max_velocity,
            gravity_scale: 1.0,
            grounded: false,
            landed: false,
            pending: Vec2::ZERO,
        }
    }

    /// Requests movement at `velocity` units per second for this frame.
    pub fn walk(&mut self, velocity: Vec2) {
        self.pending += velocity;
    }

    /// Launches the body upward.
    pub const fn jump(&mut self, force: f32) {
        self.vertical_velocity = force;
        self.grounded = false;
    }

    /// Movement requested so far this frame.
    #[must_use]
    pub const fn pending(&self) -> Vec2 {
        self.pending
    }
}

/// Raised when a [`Mover`] starts touching another collider.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// Entity whose movement caused the contact.
    pub mover: Entity,
    /// Entity it touched.
    pub other: Entity,
}

/// Pairs that were touching at the end of the last physics step.
#[derive(Resource, Debug, Default)]
pub struct ContactCache {
    touching: HashSet<(Entity, Entity)>,
}

impl ContactCache {
    /// Everything `mover` was touching at the end of the last physics step.
    pub fn touching(&self, mover: Entity) -> impl Iterator<Item = Entity> + '_ {
        self.touching
            .iter()
            .filter(move |(from, _)| *from == mover)
            .map(|(_, other)| *other)
    }

    /// Forgets every touching pair.
    pub fn clear(&mut self) {
        self.touching.clear();
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

fn resolve_axis(pos: &mut Vec2, size: Vec2, solids: &[Aabb], axis: Axis, step: f32) -> bool {
    if step == 0.0 {
        return false;
    }
    let half = size / 2.0;
    let swept_size = match axis {
        Axis::X => Vec2::new(size.x, size.y - SKIN),
        Axis::Y => Vec2::new(size.x - SKIN, size.y),
    };
    let mut hit = false;
    for solid in solids {
        if !Aabb::from_center(*pos, swept_size).overlaps(solid) {
            continue;
        }
        hit = true;
        match (axis, step > 0.0) {
            (Axis::X, true) => pos.x = solid.min.x - half.x,
            (Axis::X, false) => pos.x = solid.max.x + half.x,
            (Axis::Y, true) => pos.y = solid.min.y - half.y,
            (Axis::Y, false) => pos.y = solid.max.y + half.y,
        }
    }
    hit
}

/// Advances one body by `dt` and returns its new centre.
///
/// Gravity is applied first, then the frame's walk request and vertical
/// velocity are integrated in small substeps, resolving the X axis before Y
/// against every solid box.
pub fn step_body(
    center: Vec2,
    size: Vec2,
    body: &mut Body,
    dt: f32,
    gravity: f32,
    solids: &[Aabb],
) -> Vec2 {
    let was_grounded = body.grounded;
    body.vertical_velocity =
        (body.vertical_velocity - gravity * body.gravity_scale * dt).max(-body.max_velocity);

    let delta = body.pending * dt + Vec2::new(0.0, body.vertical_velocity * dt);
    body.pending = Vec2::ZERO;

    let longest = delta.abs().max_element();
    let mut steps = 1_u16;
    while steps < MAX_SUBSTEPS && longest / f32::from(steps) > MAX_SUBSTEP {
        steps += 1;
    }
    let step = delta / f32::from(steps);

    let mut pos = center;
    for _ in 0..steps {
        pos.x += step.x;
        resolve_axis(&mut pos, size, solids, Axis::X, step.x);

        pos.y += step.y;
        if resolve_axis(&mut pos, size, solids, Axis::Y, step.y) {
            body.vertical_velocity = 0.0;
        }
    }

    let feet = Aabb::from_center(pos - Vec2::new(0.0, GROUND_CHECK), size - Vec2::new(SKIN, 0.0));
    body.grounded = body.vertical_velocity <= 0.0 && solids.iter().any(|s| feet.overlaps(s));
    body.landed = body.grounded && !was_grounded;
    pos
}

/// Integrates every [`Body`] against the level's solids.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn integrate_bodies(
    time: Res<Time>,
    tuning: Res<Tuning>,
    solids: Query<(&Transform, &Collider), With<Solid>>,
    mut bodies: Query<(&mut Transform, &Collider, &mut Body), Without<Solid>>,
) {
    let dt = frame_secs(&time);
    if dt <= 0.0 {
        return;
    }
    let boxes: Vec<Aabb> = solids
        .iter()
        .map(|(transform, collider)| collider.aabb(transform))
        .collect();

    for (mut transform, collider, mut body) in &mut bodies {
        let center = transform.translation.truncate();
        let next = step_body(center, collider.size, &mut body, dt, tuning.gravity, &boxes);
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}

/// Emits a [`Contact`] for every mover/collider pair that started touching
/// this frame.
pub fn detect_contacts(
    movers: Query<(Entity, &Transform, &Collider), With<Mover>>,
    colliders: Query<(Entity, &Transform, &Collider)>,
    mut cache: ResMut<ContactCache>,
    mut contacts: MessageWriter<Contact>,
) {
    let boxes: Vec<(Entity, Aabb)> = colliders
        .iter()
        .map(|(entity, transform, collider)| (entity, collider.aabb(transform)))
        .collect();

    let mut touching = HashSet::new();
    for (mover, transform, collider) in &movers {
        let reach = collider.aabb(transform).expanded(CONTACT_SLOP);
        for (other, aabb) in &boxes {
            if *other == mover || !reach.overlaps(aabb) {
                continue;
            }
            let pair = (mover, *other);
            if !cache.touching.contains(&pair) {
                contacts.write(Contact {
                    mover,
                    other: *other,
                });
            }
            touching.insert(pair);
        }
    }
    cache.touching = touching;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn floor() -> Vec<Aabb> {
        (0..10_u8)
            .map(|i| Aabb::from_center(Vec2::new(f32::from(i) * 10.0 + 5.0, -5.0), Vec2::splat(10.0)))
            .collect()
    }

    #[test]
    fn long_frames_are_capped() {
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(500));
        assert_relative_eq!(frame_secs(&time), MAX_FRAME_SECS);

        time.advance_by(Duration::from_millis(10));
        assert_relative_eq!(frame_secs(&time), 0.01, epsilon = 1e-6);
    }

    #[test]
    fn overlap_is_strict() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = Aabb::from_center(Vec2::new(9.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(a.expanded(CONTACT_SLOP).overlaps(&touching));
    }

    #[test]
    fn falling_body_lands_on_floor() {
        let solids = floor();
        let mut body = Body::new(200.0);
        let mut pos = Vec2::new(50.0, 40.0);
        let mut landed_frames = 0;
        for _ in 0..120 {
            pos = step_body(pos, Vec2::splat(10.0), &mut body, 1.0 / 60.0, 980.0, &solids);
            if body.landed {
                landed_frames += 1;
            }
        }
        assert!(body.grounded);
        assert_eq!(landed_frames, 1, "landing is reported once");
        assert_relative_eq!(pos.y, 5.0, epsilon = 1e-3);
    }

    #[test]
    fn fall_speed_is_capped() {
        let mut body = Body::new(200.0);
        let _ = step_body(Vec2::ZERO, Vec2::splat(10.0), &mut body, 1.0, 980.0, &[]);
        assert_relative_eq!(body.vertical_velocity, -200.0);
    }

    #[test]
    fn walking_into_wall_stops_at_its_face() {
        let wall = [Aabb::from_center(Vec2::new(30.0, 0.0), Vec2::splat(10.0))];
        let mut body = Body::new(200.0);
        body.gravity_scale = 0.0;
        body.walk(Vec2::new(600.0, 0.0));
        let pos = step_body(Vec2::ZERO, Vec2::splat(10.0), &mut body, 0.05, 980.0, &wall);
        assert_relative_eq!(pos.x, 20.0, epsilon = 1e-3);
        assert_eq!(body.pending(), Vec2::ZERO, "walk requests are consumed");
    }

    #[test]
    fn resting_body_walks_along_floor() {
        let solids = floor();
        let mut body = Body::new(200.0);
        let mut pos = Vec2::new(20.0, 5.0);
        for _ in 0..30 {
            body.walk(Vec2::new(125.0, 0.0));
            pos = step_body(pos, Vec2::splat(10.0), &mut body, 1.0 / 60.0, 980.0, &solids);
        }
        assert!(pos.x > 80.0, "body should slide along the floor, got {pos:?}");
        assert!(body.grounded);
    }

    #[test]
    fn jump_leaves_the_ground() {
        let solids = floor();
        let mut body = Body::new(200.0);
        let mut pos = Vec2::new(50.0, 5.0);
        pos = step_body(pos, Vec2::splat(10.0), &mut body, 1.0 / 60.0, 980.0, &solids);
        assert!(body.grounded);

        body.jump(250.0);
        pos = step_body(pos, Vec2::splat(10.0), &mut body, 1.0 / 60.0, 980.0, &solids);
        assert!(!body.grounded);
        assert!(pos.y > 5.0);
    }
}
