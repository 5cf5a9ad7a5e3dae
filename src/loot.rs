//! Crate drop table.

use rand::Rng;

use crate::level::Template;

/// Items that can fall out of a broken crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Loot {
    /// An extra boost.
    ExtraBoost,
    /// A potion healing three points.
    MajorHealthPotion,
    /// A potion healing one point.
    MinorHealthPotion,
    /// A coin.
    Coin,
}

impl Loot {
    /// Pickup spawned where the crate stood.
    #[must_use]
    pub const fn template(self) -> Template {
        match self {
            Self::ExtraBoost => Template::ExtraBoost,
            Self::MajorHealthPotion => Template::MajorHealthPotion,
            Self::MinorHealthPotion => Template::MinorHealthPotion,
            Self::Coin => Template::Coin,
        }
    }
}

/// Highest value of a loot roll (inclusive).
pub const LOOT_ROLL_MAX: u32 = 1000;

/// Maps four independent rolls to a drop.
///
/// The first matching rule wins: an exact 71 on the first roll gives an
/// extra boost, then a multiple of 100 gives a major potion, a multiple of 50
/// a minor potion and a multiple of 10 a coin.
#[must_use]
pub const fn loot_for_rolls(rolls: [u32; 4]) -> Option<Loot> {
    let [boost, major, minor, coin] = rolls;
    if boost == 71 {
        Some(Loot::ExtraBoost)
    } else if major % 100 == 0 {
        Some(Loot::MajorHealthPotion)
    } else if minor % 50 == 0 {
        Some(Loot::MinorHealthPotion)
    } else if coin % 10 == 0 {
        Some(Loot::Coin)
    } else {
        None
    }
}

/// Rolls the drop for one broken crate.
pub fn roll_crate_loot<R: Rng + ?Sized>(rng: &mut R) -> Option<Loot> {
    let mut roll = || rng.gen_range(0..=LOOT_ROLL_MAX);
    let rolls = [roll(), roll(), roll(), roll()];
    loot_for_rolls(rolls)
}
