//! Flavour text for the end-of-run screens.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::element::Element;

/// Prompt shown under every game-over message.
pub const RETRY_PROMPT: &str = "Game Over. Press ENTER to try again";
/// Prompt shown under the victory message.
pub const REPLAY_PROMPT: &str = "Press ENTER to play again";

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Health ran out.
    WornDown,
    /// Touched lava.
    Lava,
    /// Fell below the level.
    FellOut,
    /// The level could not be built.
    LevelFailed,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::WornDown => "worn down",
            Self::Lava => "lava",
            Self::FellOut => "fell out",
            Self::LevelFailed => "level failed",
        };
        f.write_str(text)
    }
}

const WORN_DOWN_LINES: &[&str] = &[
    "You ran out of steam.",
    "One hit too many.",
    "The goblins will be insufferable about this.",
];

const LAVA_LINES: &[&str] = &[
    "Lava: still hot.",
    "You found out the floor was, in fact, lava.",
];

const FELL_OUT_LINES: &[&str] = &[
    "Gravity wins again.",
    "That was a long way down.",
    "The pit sends its regards.",
];

const LEVEL_FAILED_LINES: &[&str] = &["The level crumbled before you arrived."];

const VICTORY_LINES: &[&str] = &[
    "The elements bow to you.",
    "The boss is dust and the day is yours.",
    "Fire, water, earth and air: mastered.",
];

fn element_quip(element: Element) -> &'static str {
    match element {
        Element::Fire => "Everything smells of smoke.",
        Element::Water => "The ice was slicker than it looked.",
        Element::Earth => "The ground gave way.",
        Element::Air => "The wind had other plans.",
    }
}

fn pick<'a, R: Rng + ?Sized>(lines: &[&'a str], rng: &mut R) -> &'a str {
    lines.choose(rng).copied().unwrap_or_default()
}

/// Builds the game-over message for `cause` in a level themed on `element`.
///
/// The last line is always [`RETRY_PROMPT`].
pub fn game_over_text<R: Rng + ?Sized>(cause: DeathCause, element: Element, rng: &mut R) -> String {
    let lines = match cause {
        DeathCause::WornDown => WORN_DOWN_LINES,
        DeathCause::Lava => LAVA_LINES,
        DeathCause::FellOut => FELL_OUT_LINES,
        DeathCause::LevelFailed => LEVEL_FAILED_LINES,
    };
    let headline = pick(lines, rng);
    if rng.gen_bool(0.5) {
        format!("{headline}\n{}\n{RETRY_PROMPT}", element_quip(element))
    } else {
        format!("{headline}\n{RETRY_PROMPT}")
    }
}

/// Builds the victory message with the final `score`.
pub fn victory_text<R: Rng + ?Sized>(score: u32, rng: &mut R) -> String {
    format!(
        "{}\nFinal score: {score}\n{REPLAY_PROMPT}",
        pick(VICTORY_LINES, rng)
    )
}
