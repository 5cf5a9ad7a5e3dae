//! Elements drive both level hazards and the player's weapon.
//!
//! Each level run is assigned an element. The element decides what the `#`
//! and `!` level tokens become and which status effect the player's bullets
//! inflict.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::StatusKind;

/// One of the four elements a level run can be themed around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// Lava floors; burning shots.
    Fire,
    /// Ice floors; chilling shots.
    Water,
    /// Crumbling floors; rooting shots.
    Earth,
    /// Open pits and boost pads; levitating shots.
    Air,
}

impl Element {
    /// Every element, in declaration order.
    pub const ALL: [Self; 4] = [Self::Fire, Self::Water, Self::Earth, Self::Air];

    /// Lowercase name used on the command line and in the HUD.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Earth => "earth",
            Self::Air => "air",
        }
    }

    /// Terrain produced by the `#` level token.
    #[must_use]
    pub const fn hazard_terrain(self) -> HazardTerrain {
        match self {
            Self::Fire => HazardTerrain::Lava,
            Self::Water => HazardTerrain::Ice,
            Self::Earth => HazardTerrain::CrumblingBlock,
            Self::Air => HazardTerrain::Pit,
        }
    }

    /// Feature produced by the `!` level token, if any.
    #[must_use]
    pub const fn hazard_feature(self) -> Option<HazardFeature> {
        match self {
            Self::Air => Some(HazardFeature::AirBoost),
            Self::Fire | Self::Water | Self::Earth => None,
        }
    }

    /// Weapon behaviour while this element is equipped.
    #[must_use]
    pub const fn weapon_profile(self) -> WeaponProfile {
        match self {
            Self::Fire => WeaponProfile {
                speed_multiplier: 1.0,
                bonus_damage: 1,
                status: StatusKind::Burning,
            },
            Self::Water => WeaponProfile {
                speed_multiplier: 1.0,
                bonus_damage: 0,
                status: StatusKind::Chilled,
            },
            Self::Earth => WeaponProfile {
                speed_multiplier: 0.75,
                bonus_damage: 1,
                status: StatusKind::Rooted,
            },
            Self::Air => WeaponProfile {
                speed_multiplier: 1.5,
                bonus_damage: 0,
                status: StatusKind::Levitating,
            },
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a string does not name an element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown element `{0}` (expected fire, water, earth or air)")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|element| element.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseElementError(s.to_owned()))
    }
}

/// Picks the element for the next level run.
///
/// The previous run's element is excluded so the same element never comes up
/// twice in a row.
///
/// # Examples
///
/// ```
/// use elemancer::element::{next_element, Element};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let next = next_element(Some(Element::Fire), &mut rng);
/// assert_ne!(next, Element::Fire);
/// ```
pub fn next_element<R: Rng + ?Sized>(last: Option<Element>, rng: &mut R) -> Element {
    let candidates: Vec<Element> = Element::ALL
        .into_iter()
        .filter(|element| Some(*element) != last)
        .collect();
    candidates.choose(rng).copied().unwrap_or(Element::Fire)
}

/// Terrain variants behind the `#` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardTerrain {
    /// Solid and deadly.
    Lava,
    /// Solid and slippery.
    Ice,
    /// Solid until the player steps on it.
    CrumblingBlock,
    /// Nothing at all.
    Pit,
}

/// Feature variants behind the `!` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardFeature {
    /// Launches the player upwards on contact.
    AirBoost,
}

/// How the equipped element changes the player's bullets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    /// Multiplier applied to the base bullet speed.
    pub speed_multiplier: f32,
    /// Damage added to the player's strength on hit.
    pub bonus_damage: i32,
    /// Status inflicted on the target.
    pub status: StatusKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    #[rstest]
    #[case("fire", Element::Fire)]
    #[case("WATER", Element::Water)]
    #[case(" Earth ", Element::Earth)]
    #[case("air", Element::Air)]
    fn parses_element_names(#[case] input: &str, #[case] expected: Element) {
        assert_eq!(input.parse::<Element>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_element() {
        let err = "plasma".parse::<Element>().expect_err("plasma is not an element");
        assert!(err.to_string().contains("plasma"));
    }

    #[rstest]
    #[case(Element::Fire)]
    #[case(Element::Water)]
    #[case(Element::Earth)]
    #[case(Element::Air)]
    fn never_repeats_last_element(#[case] last: Element) {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..200 {
            assert_ne!(next_element(Some(last), &mut rng), last);
        }
    }

    #[test]
    fn first_pick_can_be_any_element() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(next_element(None, &mut rng));
        }
        assert_eq!(seen.len(), Element::ALL.len());
    }

    #[rstest]
    #[case(Element::Fire, HazardTerrain::Lava)]
    #[case(Element::Water, HazardTerrain::Ice)]
    #[case(Element::Earth, HazardTerrain::CrumblingBlock)]
    #[case(Element::Air, HazardTerrain::Pit)]
    fn hazard_terrain_follows_element(#[case] element: Element, #[case] terrain: HazardTerrain) {
        assert_eq!(element.hazard_terrain(), terrain);
    }

    #[test]
    fn only_air_has_a_hazard_feature() {
        assert_eq!(Element::Air.hazard_feature(), Some(HazardFeature::AirBoost));
        assert!(Element::Fire.hazard_feature().is_none());
        assert!(Element::Water.hazard_feature().is_none());
        assert!(Element::Earth.hazard_feature().is_none());
    }

    #[test]
    fn element_round_trips_through_display() {
        for element in Element::ALL {
            assert_eq!(element.to_string().parse::<Element>(), Ok(element));
        }
    }
}
