//! Default gameplay tuning values.
//!
//! These are the defaults behind [`crate::config::Tuning`]. Systems read the
//! `Tuning` resource rather than these constants so a JSON override can
//! adjust them at startup.

/// Edge length of one level cell in world units.
pub const TILE_UNIT: f32 = 10.0;
/// Enemies further than this from the player do not act.
pub const CUTOFF_DISTANCE: f32 = 300.0;

/// Bullet speed before element multipliers.
pub const BULLET_SPEED: f32 = 300.0;
/// Seconds a bullet lives.
pub const BULLET_LIFETIME_SECS: f32 = 1.0;
/// Player walk speed.
pub const PLAYER_MOVE_SPEED: f32 = 125.0;
/// Distance covered by a full boost. The vertical component of diagonal and
/// upward boosts is halved.
pub const PLAYER_BOOST_DISTANCE: f32 = 200.0;
/// Upward speed of a jump.
pub const PLAYER_JUMP_FORCE: f32 = 250.0;
/// Seconds between player shots.
pub const PLAYER_SHOOT_COOLDOWN_SECS: f32 = 0.25;
/// Terminal fall speed.
pub const MAX_VELOCITY: f32 = 200.0;
/// Downward acceleration.
pub const GRAVITY: f32 = 980.0;
/// Upward speed from an air boost pad.
pub const AIR_BOOST_FORCE: f32 = 100.0;
/// Walk speed multiplier on ice.
pub const ICE_SPEED_MULTIPLIER: f32 = 2.0;

/// Seconds a boost lasts.
pub const BOOST_DURATION_SECS: f32 = 0.25;
/// Fraction of the remaining distance to the boost target covered per second.
pub const BOOST_LERP_RATE: f32 = 3.0;

/// Seconds of invulnerability after a hit.
pub const INVULNERABILITY_SECS: f32 = 1.0;
/// Seconds before a respawning boost returns.
pub const RESPAWNING_BOOST_SECS: f32 = 5.0;
/// Seconds a crumbling block takes to vanish.
pub const CRUMBLE_SECS: f32 = 0.25;
/// Seconds a hit indicator lasts.
pub const EXPLOSION_SECS: f32 = 0.125;

/// Walk speed of slimes.
pub const SLIME_SPEED: f32 = 20.0;
/// Walk speed of goblins.
pub const GOBLIN_SPEED: f32 = 50.0;
/// Seconds between goblin shots.
pub const GOBLIN_SHOOT_COOLDOWN_SECS: f32 = 1.0;
/// A goblin fires when a 0..=100 roll is divisible by this.
pub const GOBLIN_SHOT_MODULUS: u32 = 23;

/// Boss walk speed while stalking.
pub const BOSS_STALK_SPEED: f32 = 40.0;
/// Upward speed of the boss slam.
pub const BOSS_JUMP_FORCE: f32 = 300.0;

/// Vertical offset of the camera above the player.
pub const CAMERA_LIFT: f32 = 50.0;
