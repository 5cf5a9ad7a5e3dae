//! Top-level gameplay plugin.
//!
//! Gameplay systems run in [`GameSet`] order every `Update` while a level is
//! loaded: input first, then enemy decisions, movement and contact
//! detection, contact resolution and finally cleanup of anything spent.

use bevy::prelude::*;

use crate::combat::{
    animate_explosions, expire_projectiles, move_projectiles, remove_defeated_enemies,
    resolve_projectile_hits,
};
use crate::config::Tuning;
use crate::enemy::boss::boss_behaviour;
use crate::enemy::{enemy_behaviour, enemy_hazards, tick_enemy_statuses};
use crate::physics::{detect_contacts, integrate_bodies, Contact, ContactCache};
use crate::player::{
    check_player_health, crumble_blocks, enemy_contact_damage, player_contacts, player_input,
    respawn_boosts, restore_boost_on_landing, tick_player_statuses,
};
use crate::scene::{in_level, ScenePlugin};
use crate::session::PlayerState;

/// Ordered stages of a gameplay frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Player input and timers.
    Input,
    /// Enemy and boss decisions.
    Ai,
    /// Movement and contact detection.
    Physics,
    /// Contact effects.
    Resolve,
    /// Removal of spent entities.
    Cleanup,
}

/// Registers the scene flow and every gameplay system.
///
/// The host supplies time and keyboard input; headless tests insert
/// `ButtonInput<KeyCode>` themselves when no input plugin is present.
#[derive(Debug)]
pub struct ElemancerPlugin;

impl Plugin for ElemancerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ScenePlugin)
            .init_resource::<Tuning>()
            .init_resource::<PlayerState>()
            .init_resource::<ContactCache>()
            .init_resource::<ButtonInput<KeyCode>>()
            .add_message::<Contact>();

        app.configure_sets(
            Update,
            (
                GameSet::Input,
                GameSet::Ai,
                GameSet::Physics,
                GameSet::Resolve,
                GameSet::Cleanup,
            )
                .chain()
                .run_if(in_level),
        );

        app.add_systems(
            Update,
            (
                (tick_player_statuses, player_input).chain().in_set(GameSet::Input),
                (enemy_behaviour, boss_behaviour, tick_enemy_statuses).in_set(GameSet::Ai),
                (integrate_bodies, move_projectiles, detect_contacts)
                    .chain()
                    .in_set(GameSet::Physics),
                (
                    (player_contacts, enemy_contact_damage).chain(),
                    resolve_projectile_hits,
                    enemy_hazards,
                    restore_boost_on_landing,
                )
                    .in_set(GameSet::Resolve),
                (
                    remove_defeated_enemies,
                    expire_projectiles,
                    animate_explosions,
                    crumble_blocks,
                    respawn_boosts,
                    check_player_health,
                )
                    .in_set(GameSet::Cleanup),
            ),
        );
    }
}
