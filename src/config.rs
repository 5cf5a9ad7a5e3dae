//! Command-line and file configuration.
//!
//! [`Args`] is the `clap` surface of the binary. It resolves into a
//! [`GameConfig`] (scene and element overrides, RNG seed) and a [`Tuning`]
//! resource holding every gameplay constant, optionally overridden from a
//! JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::Resource;
use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    AIR_BOOST_FORCE, BOOST_DURATION_SECS, BOOST_LERP_RATE, BOSS_JUMP_FORCE, BOSS_STALK_SPEED,
    BULLET_LIFETIME_SECS, BULLET_SPEED, CRUMBLE_SECS, CUTOFF_DISTANCE, EXPLOSION_SECS,
    GOBLIN_SHOOT_COOLDOWN_SECS, GOBLIN_SHOT_MODULUS, GOBLIN_SPEED, GRAVITY, ICE_SPEED_MULTIPLIER,
    INVULNERABILITY_SECS, MAX_VELOCITY, PLAYER_BOOST_DISTANCE, PLAYER_JUMP_FORCE,
    PLAYER_MOVE_SPEED, PLAYER_SHOOT_COOLDOWN_SECS, RESPAWNING_BOOST_SECS, SLIME_SPEED,
};
use crate::element::Element;
use crate::level::LevelId;

/// An elemental 2D platformer
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Level to start on (one, two or three)
    #[arg(long)]
    pub level: Option<LevelId>,

    /// Element to use for every level instead of a random one
    #[arg(long)]
    pub element: Option<Element>,

    /// Seed for the random number generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file overriding gameplay tuning values
    #[arg(long)]
    pub tuning: Option<PathBuf>,
}

impl Args {
    /// Splits the arguments into the startup overrides and the tuning table.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the tuning file cannot be read, parsed or
    /// validated.
    pub fn resolve(&self) -> Result<(GameConfig, Tuning), ConfigError> {
        let tuning = match &self.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let config = GameConfig {
            start_level: self.level.unwrap_or_default(),
            element_override: self.element,
            seed: self.seed,
        };
        Ok((config, tuning))
    }
}

/// Startup overrides chosen on the command line.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct GameConfig {
    /// Scene the game boots into.
    pub start_level: LevelId,
    /// When set, every level uses this element.
    pub element_override: Option<Element>,
    /// When set, the RNG is seeded for reproducible runs.
    pub seed: Option<u64>,
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tuning file could not be read.
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The tuning file is not valid tuning JSON.
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    /// A tuning value is out of range.
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Every gameplay constant the systems read at runtime.
///
/// Missing JSON fields fall back to the defaults in [`crate::constants`].
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
    /// Terminal fall speed.
    pub max_velocity: f32,
    /// Enemies further than this from the player stay idle.
    pub cutoff_distance: f32,
    /// Base walk speed of the player.
    pub player_move_speed: f32,
    /// Upward speed of a jump.
    pub player_jump_force: f32,
    /// Walk speed multiplier on ice.
    pub ice_speed_multiplier: f32,
    /// Upward speed from an air boost pad.
    pub air_boost_force: f32,
    /// Horizontal reach of a boost.
    pub boost_distance: f32,
    /// Seconds a boost lasts.
    pub boost_duration: f32,
    /// Share of the remaining boost distance covered per second.
    pub boost_lerp_rate: f32,
    /// Base bullet speed before element multipliers.
    pub bullet_speed: f32,
    /// Seconds a bullet lives.
    pub bullet_lifetime: f32,
    /// Seconds between player shots.
    pub shoot_cooldown: f32,
    /// Seconds of invulnerability after taking damage.
    pub invulnerability: f32,
    /// Seconds before a respawning boost returns.
    pub respawning_boost_delay: f32,
    /// Seconds a crumbling block takes to vanish.
    pub crumble_duration: f32,
    /// Seconds a hit indicator or explosion lasts.
    pub explosion_duration: f32,
    /// Walk speed of slimes.
    pub slime_speed: f32,
    /// Walk speed of goblins.
    pub goblin_speed: f32,
    /// Seconds between goblin shots.
    pub goblin_shoot_cooldown: f32,
    /// A goblin fires when its roll is divisible by this.
    pub goblin_shot_modulus: u32,
    /// Boss walk speed while stalking.
    pub boss_stalk_speed: f32,
    /// Upward speed of the boss slam.
    pub boss_jump_force: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            max_velocity: MAX_VELOCITY,
            cutoff_distance: CUTOFF_DISTANCE,
            player_move_speed: PLAYER_MOVE_SPEED,
            player_jump_force: PLAYER_JUMP_FORCE,
            ice_speed_multiplier: ICE_SPEED_MULTIPLIER,
            air_boost_force: AIR_BOOST_FORCE,
            boost_distance: PLAYER_BOOST_DISTANCE,
            boost_duration: BOOST_DURATION_SECS,
            boost_lerp_rate: BOOST_LERP_RATE,
            bullet_speed: BULLET_SPEED,
            bullet_lifetime: BULLET_LIFETIME_SECS,
            shoot_cooldown: PLAYER_SHOOT_COOLDOWN_SECS,
            invulnerability: INVULNERABILITY_SECS,
            respawning_boost_delay: RESPAWNING_BOOST_SECS,
            crumble_duration: CRUMBLE_SECS,
            explosion_duration: EXPLOSION_SECS,
            slime_speed: SLIME_SPEED,
            goblin_speed: GOBLIN_SPEED,
            goblin_shoot_cooldown: GOBLIN_SHOOT_COOLDOWN_SECS,
            goblin_shot_modulus: GOBLIN_SHOT_MODULUS,
            boss_stalk_speed: BOSS_STALK_SPEED,
            boss_jump_force: BOSS_JUMP_FORCE,
        }
    }
}

impl Tuning {
    /// Parses and validates a JSON tuning document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reads a JSON tuning file from `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`Tuning::from_json`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Rejects values that would stall or invert the simulation.
    ///
    /// # Errors
    /// Returns the first offending field as [`ConfigError::Invalid`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("gravity", self.gravity),
            ("max_velocity", self.max_velocity),
            ("cutoff_distance", self.cutoff_distance),
            ("player_move_speed", self.player_move_speed),
            ("player_jump_force", self.player_jump_force),
            ("ice_speed_multiplier", self.ice_speed_multiplier),
            ("air_boost_force", self.air_boost_force),
            ("boost_distance", self.boost_distance),
            ("boost_duration", self.boost_duration),
            ("boost_lerp_rate", self.boost_lerp_rate),
            ("bullet_speed", self.bullet_speed),
            ("bullet_lifetime", self.bullet_lifetime),
            ("shoot_cooldown", self.shoot_cooldown),
            ("respawning_boost_delay", self.respawning_boost_delay),
            ("crumble_duration", self.crumble_duration),
            ("explosion_duration", self.explosion_duration),
            ("goblin_shoot_cooldown", self.goblin_shoot_cooldown),
            ("boss_jump_force", self.boss_jump_force),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }

        let non_negative = [
            ("invulnerability", self.invulnerability),
            ("slime_speed", self.slime_speed),
            ("goblin_speed", self.goblin_speed),
            ("boss_stalk_speed", self.boss_stalk_speed),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be negative",
                });
            }
        }

        if self.goblin_shot_modulus == 0 {
            return Err(ConfigError::Invalid {
                field: "goblin_shot_modulus",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 500.0 }"#).expect("valid tuning");
        assert!((tuning.gravity - 500.0).abs() < f32::EPSILON);
        assert!((tuning.player_move_speed - PLAYER_MOVE_SPEED).abs() < f32::EPSILON);
    }

    #[rstest]
    #[case(r#"{ "gravity": -1.0 }"#, "gravity")]
    #[case(r#"{ "boost_duration": 0.0 }"#, "boost_duration")]
    #[case(r#"{ "slime_speed": -3.0 }"#, "slime_speed")]
    #[case(r#"{ "goblin_shot_modulus": 0 }"#, "goblin_shot_modulus")]
    fn rejects_out_of_range_values(#[case] json: &str, #[case] expected_field: &str) {
        match Tuning::from_json(json) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected invalid {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(matches!(
            Tuning::from_json(r#"{ "gravityy": 1.0 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Tuning::load(Path::new("/definitely/not/here.json")).expect_err("missing file");
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn args_parse_overrides() {
        let args = Args::parse_from([
            "elemancer",
            "--level",
            "two",
            "--element",
            "air",
            "--seed",
            "9",
            "-v",
        ]);
        let (config, tuning) = args.resolve().expect("no tuning file to fail");
        assert_eq!(
            config,
            GameConfig {
                start_level: LevelId::Two,
                element_override: Some(Element::Air),
                seed: Some(9),
            }
        );
        assert!(args.verbose);
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn args_default_to_level_one() {
        let args = Args::parse_from(["elemancer"]);
        let (config, _) = args.resolve().expect("defaults resolve");
        assert_eq!(config.start_level, LevelId::One);
        assert!(config.element_override.is_none());
    }
}
