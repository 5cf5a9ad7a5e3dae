//! Token to template mapping.

use bevy::math::Vec2;

use crate::constants::TILE_UNIT;
use crate::element::{Element, HazardFeature, HazardTerrain};

/// What a single layout character stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Nothing spawns.
    Empty,
    /// Where the player starts.
    PlayerStart,
    /// Spawns a template.
    Spawn(Template),
}

impl Cell {
    /// Resolves `token` for a level themed on `element`.
    ///
    /// Returns `None` for characters that are not part of the token set.
    #[must_use]
    pub const fn from_token(token: char, element: Element) -> Option<Self> {
        let cell = match token {
            ' ' => Self::Empty,
            'P' => Self::PlayerStart,
            '*' => Self::Spawn(Template::Goal),
            'x' => Self::Spawn(Template::OutOfBounds),
            '=' => Self::Spawn(Template::Ground),
            '%' => Self::Spawn(Template::Crate),
            '#' => match element.hazard_terrain() {
                HazardTerrain::Lava => Self::Spawn(Template::Lava),
                HazardTerrain::Ice => Self::Spawn(Template::Ice),
                HazardTerrain::CrumblingBlock => Self::Spawn(Template::CrumblingBlock),
                HazardTerrain::Pit => Self::Empty,
            },
            '!' => match element.hazard_feature() {
                Some(HazardFeature::AirBoost) => Self::Spawn(Template::AirBoost),
                None => Self::Empty,
            },
            'o' => Self::Spawn(Template::Coin),
            '^' => Self::Spawn(Template::ExtraBoost),
            '§' => Self::Spawn(Template::RespawningExtraBoost),
            'h' => Self::Spawn(Template::MinorHealthPotion),
            'H' => Self::Spawn(Template::MajorHealthPotion),
            'S' => Self::Spawn(Template::Slime),
            'G' => Self::Spawn(Template::Goblin),
            'B' => Self::Spawn(Template::Boss),
            _ => return None,
        };
        Some(cell)
    }
}

/// Everything a level cell can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// Level exit.
    Goal,
    /// Invisible kill zone below the level.
    OutOfBounds,
    /// Plain solid ground.
    Ground,
    /// Breakable crate.
    Crate,
    /// Deadly lava floor.
    Lava,
    /// Slippery ice floor.
    Ice,
    /// Floor that crumbles underfoot.
    CrumblingBlock,
    /// Pad launching the player upward.
    AirBoost,
    /// Score pickup.
    Coin,
    /// One-off boost pickup.
    ExtraBoost,
    /// Boost pickup that comes back.
    RespawningExtraBoost,
    /// Potion healing one point.
    MinorHealthPotion,
    /// Potion healing three points.
    MajorHealthPotion,
    /// Slime enemy.
    Slime,
    /// Goblin enemy.
    Goblin,
    /// The boss.
    Boss,
}

/// Stats shared by every enemy template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStats {
    /// Contact damage.
    pub strength: i32,
    /// Starting health.
    pub health: i32,
    /// Score when defeated.
    pub score_value: u32,
}

const SMALL: f32 = TILE_UNIT / 2.0;

impl Template {
    /// Collider and sprite size.
    #[must_use]
    pub const fn size(self) -> Vec2 {
        match self {
            Self::Goal
            | Self::Coin
            | Self::ExtraBoost
            | Self::RespawningExtraBoost
            | Self::MinorHealthPotion
            | Self::Slime => Vec2::splat(SMALL),
            Self::Boss => Vec2::splat(TILE_UNIT * 2.0),
            Self::OutOfBounds
            | Self::Ground
            | Self::Crate
            | Self::Lava
            | Self::Ice
            | Self::CrumblingBlock
            | Self::AirBoost
            | Self::MajorHealthPotion
            | Self::Goblin => Vec2::splat(TILE_UNIT),
        }
    }

    /// Sprite colour as linear sRGBA.
    #[must_use]
    pub const fn colour(self) -> [f32; 4] {
        match self {
            Self::Goal => [1.0, 1.0, 1.0, 1.0],
            Self::OutOfBounds => [0.0, 0.0, 0.0, 0.0],
            Self::Ground => [0.45, 0.1, 0.1, 1.0],
            Self::Crate => [0.25, 0.25, 0.25, 1.0],
            Self::Lava => [1.0, 0.75, 0.0, 1.0],
            Self::Ice | Self::ExtraBoost => [0.0, 1.0, 1.0, 1.0],
            Self::CrumblingBlock => [0.25, 0.1, 0.1, 1.0],
            Self::AirBoost => [0.75, 0.75, 0.75, 1.0],
            Self::Coin => [1.0, 1.0, 0.0, 1.0],
            Self::RespawningExtraBoost => [1.0, 0.0, 1.0, 1.0],
            Self::MinorHealthPotion | Self::MajorHealthPotion => [1.0, 0.0, 0.5, 1.0],
            Self::Slime => [0.25, 0.75, 0.95, 1.0],
            Self::Goblin => [0.0, 1.0, 0.0, 1.0],
            Self::Boss => [0.6, 0.1, 0.8, 1.0],
        }
    }

    /// Whether the template falls under gravity.
    #[must_use]
    pub const fn is_body(self) -> bool {
        matches!(
            self,
            Self::MinorHealthPotion
                | Self::MajorHealthPotion
                | Self::Slime
                | Self::Goblin
                | Self::Boss
        )
    }

    /// Blocks bodies.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(
            self,
            Self::Ground | Self::Crate | Self::Lava | Self::Ice | Self::CrumblingBlock
        )
    }

    /// Combat stats for enemy templates.
    #[must_use]
    pub const fn enemy_stats(self) -> Option<EnemyStats> {
        match self {
            Self::Slime => Some(EnemyStats {
                strength: 1,
                health: 1,
                score_value: 1,
            }),
            Self::Goblin => Some(EnemyStats {
                strength: 1,
                health: 2,
                score_value: 5,
            }),
            Self::Boss => Some(EnemyStats {
                strength: 2,
                health: 20,
                score_value: 50,
            }),
            _ => None,
        }
    }

    /// Places the template inside the cell centred on `cell_center`.
    ///
    /// The goal floats in the middle of its cell; everything else sits on
    /// the cell's floor so oversized and undersized templates neither sink
    /// into nor hover above the row below.
    #[must_use]
    pub fn anchor(self, cell_center: Vec2) -> Vec2 {
        if self == Self::Goal {
            return cell_center;
        }
        let floor = cell_center.y - TILE_UNIT / 2.0;
        Vec2::new(cell_center.x, floor + self.size().y / 2.0)
    }
}
