//! Level layouts and their parsing.
//!
//! Levels are written as rows of single-character tokens. Row 0 is the top
//! of the level and each cell is [`TILE_UNIT`] world units square. Parsing is
//! pure: it turns the rows into a [`Layout`] of [`Placement`]s that
//! [`spawn`] later materialises as entities.

pub mod spawn;
pub mod templates;

use std::fmt;
use std::str::FromStr;

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::TILE_UNIT;
use crate::element::Element;

pub use templates::{Cell, Template};

/// The levels of a run, in play order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelId {
    /// The opening level.
    #[default]
    One,
    /// The crate level.
    Two,
    /// Boss arena.
    Three,
}

impl LevelId {
    /// Every level in play order.
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    /// The level that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }

    /// Lower-case name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Two => "two",
            Self::Three => "three",
        }
    }

    /// The ASCII rows describing this level.
    #[must_use]
    pub const fn layout(self) -> &'static [&'static str] {
        match self {
            Self::One => LEVEL_ONE,
            Self::Two => LEVEL_TWO,
            Self::Three => LEVEL_THREE,
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown level `{0}` (expected one, two or three)")]
pub struct ParseLevelError(pub String);

impl FromStr for LevelId {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one" | "1" => Ok(Self::One),
            "two" | "2" => Ok(Self::Two),
            "three" | "3" => Ok(Self::Three),
            _ => Err(ParseLevelError(s.to_owned())),
        }
    }
}

const LEVEL_ONE: &[&str] = &[
    "==============================",
    "=                            =",
    "=                            =",
    "=                          * =",
    "=            o           =====",
    "=          o ==              =",
    "=        o                   =",
    "=      o                     =",
    "=ooo o                       =",
    "====                     oooo=",
    "=                 o o    =====",
    "=              o  ====       =",
    "=P          o                =",
    "=================######=======",
    "                              ",
    "                              ",
    "                              ",
    "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
];

const LEVEL_TWO: &[&str] = &[
    "====================================================",
    "=                                   %              =",
    "=                                   %              =",
    "=                                   %              =",
    "=                                   %              =",
    "=                                   %              =",
    "=          oo           o           %     oo   S * =",
    "=          ==          ===          ================",
    "=                                                  =",
    "=                                                  =",
    "=   ==                                             =",
    "=                                                  =",
    "= P     ooo             S      ooo                 =",
    "================!!!!================================",
    "                                                    ",
    "                                                    ",
    "                                                    ",
    "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
];

// The goal is spawned where the boss falls. Hazard tiles stay out of the
// boss's reach so it cannot leave the arena.
const LEVEL_THREE: &[&str] = &[
    "========================================",
    "=                                      =",
    "=                                      =",
    "=                                      =",
    "=        ===        h       ===        =",
    "=                                      =",
    "=   §                              ^   =",
    "=  ===         ##########         ===  =",
    "=                                      =",
    "=                                      =",
    "=        %                    %        =",
    "=       %%                    %%       =",
    "= P    %%%    o    G    o    %%%  B    =",
    "========================================",
    "                                        ",
    "                                        ",
    "                                        ",
    "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
];

/// Errors raised while parsing a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    /// A character that maps to no template.
    #[error("unknown token `{token}` at row {row}, column {column}")]
    UnknownToken {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
        /// The offending character.
        token: char,
    },
    /// The layout has no `P` start marker.
    #[error("layout has no player start (`P`)")]
    MissingPlayerStart,
}

/// One spawned template and where it goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// What spawns here.
    pub template: Template,
    /// Layout row.
    pub row: usize,
    /// Layout column.
    pub column: usize,
    /// Centre of the template in world space.
    pub position: Vec2,
}

/// A parsed level.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Element the hazards were resolved for.
    pub element: Element,
    /// Everything to spawn, in layout order.
    pub placements: Vec<Placement>,
    /// Centre of the player's starting cell.
    pub player_start: Vec2,
    /// Widest row in cells.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Layout {
    /// Placements using `template`.
    pub fn placements_of(&self, template: Template) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(move |placement| placement.template == template)
    }
}

/// World-space centre of the cell at `row`, `column`.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "Layouts are a few dozen cells across."
)]
pub fn cell_center(row: usize, column: usize) -> Vec2 {
    Vec2::new(
        column as f32 * TILE_UNIT + TILE_UNIT / 2.0,
        -(row as f32 * TILE_UNIT + TILE_UNIT / 2.0),
    )
}

/// Parses `rows` into a [`Layout`], resolving hazard tokens for `element`.
///
/// # Errors
/// [`LevelError::UnknownToken`] for a character with no template and
/// [`LevelError::MissingPlayerStart`] when no `P` is present.
pub fn parse_layout(rows: &[&str], element: Element) -> Result<Layout, LevelError> {
    let mut placements = Vec::new();
    let mut start = None;
    let mut width = 0;

    for (row, line) in rows.iter().enumerate() {
        let mut columns = 0;
        for (column, token) in line.chars().enumerate() {
            columns = column + 1;
            let cell = Cell::from_token(token, element)
                .ok_or(LevelError::UnknownToken { row, column, token })?;
            let center = cell_center(row, column);
            match cell {
                Cell::Empty => {}
                Cell::PlayerStart if start.is_some() => {
                    log::warn!("ignoring extra player start at row {row}, column {column}");
                }
                Cell::PlayerStart => start = Some(center),
                Cell::Spawn(template) => placements.push(Placement {
                    template,
                    row,
                    column,
                    position: template.anchor(center),
                }),
            }
        }
        width = width.max(columns);
    }

    let player_start = start.ok_or(LevelError::MissingPlayerStart)?;
    Ok(Layout {
        element,
        placements,
        player_start,
        width,
        height: rows.len(),
    })
}
