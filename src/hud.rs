//! Heads-up display text.
//!
//! The string builders are always available; the on-screen HUD that shows
//! them needs the `text` feature.

use crate::status::StatusEffects;

/// `Score: N`.
#[must_use]
pub fn score_text(score: u32) -> String {
    format!("Score: {score}")
}

/// One star per available boost, or a blank when none are left.
#[must_use]
pub fn boost_text(available: u32) -> String {
    let row = stars(i64::from(available));
    if row.is_empty() {
        "Boosts:  ".to_owned()
    } else {
        format!("Boosts: {row}")
    }
}

/// One star per point of health. Non-positive health shows no stars.
#[must_use]
pub fn health_text(health: i32) -> String {
    format!("Health: {}", stars(i64::from(health)))
}

/// Active statuses with their remaining time, e.g. `Burning 1.2s`.
#[must_use]
pub fn status_text(statuses: &StatusEffects) -> String {
    statuses
        .iter()
        .map(|(kind, remaining)| format!("{kind} {remaining:.1}s"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn stars(count: i64) -> String {
    "*".repeat(usize::try_from(count).unwrap_or(0))
}

#[cfg(feature = "text")]
pub use overlay::{HudLine, HudPlugin};

#[cfg(feature = "text")]
mod overlay {
    use bevy::prelude::*;

    use super::{boost_text, health_text, score_text, status_text};
    use crate::scene::in_level;
    use crate::session::PlayerState;

    /// Which value a HUD text node displays.
    #[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum HudLine {
        /// Score counter.
        Score,
        /// Available boosts.
        Boosts,
        /// Remaining health.
        Health,
        /// Active status effects.
        Status,
    }

    impl HudLine {
        const ALL: [Self; 4] = [Self::Score, Self::Boosts, Self::Health, Self::Status];

        fn render(self, state: &PlayerState) -> String {
            match self {
                Self::Score => score_text(state.score),
                Self::Boosts => boost_text(state.available_boosts()),
                Self::Health => health_text(state.health),
                Self::Status => status_text(&state.statuses),
            }
        }

        fn colour(self) -> Color {
            match self {
                Self::Score => Color::srgb(1.0, 1.0, 0.0),
                Self::Boosts => Color::srgb(0.0, 1.0, 1.0),
                Self::Health => Color::srgb(1.0, 0.0, 0.0),
                Self::Status => Color::srgb(0.9, 0.9, 0.9),
            }
        }
    }

    #[derive(Component, Debug)]
    struct HudRoot;

    /// Shows score, boosts, health and statuses along the top of the screen.
    #[derive(Debug)]
    pub struct HudPlugin;

    impl Plugin for HudPlugin {
        fn build(&self, app: &mut App) {
            app.add_systems(Startup, spawn_hud);
            app.add_systems(Update, (refresh_hud, toggle_hud));
        }
    }

    fn spawn_hud(mut commands: Commands) {
        commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(8.0),
                    left: Val::Px(8.0),
                    column_gap: Val::Px(24.0),
                    ..default()
                },
                Visibility::Hidden,
                HudRoot,
                Name::new("Hud"),
            ))
            .with_children(|parent| {
                for line in HudLine::ALL {
                    parent.spawn((
                        Text::new(""),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(line.colour()),
                        line,
                    ));
                }
            });
    }

    #[expect(
        clippy::needless_pass_by_value,
        reason = "Bevy system parameters use `Res<T>` by value."
    )]
    fn refresh_hud(state: Res<PlayerState>, mut lines: Query<(&HudLine, &mut Text)>) {
        for (line, mut text) in &mut lines {
            let rendered = line.render(&state);
            if text.0 != rendered {
                text.0 = rendered;
            }
        }
    }

    fn toggle_hud(
        scene: Res<State<crate::scene::GameScene>>,
        mut roots: Query<&mut Visibility, With<HudRoot>>,
    ) {
        let wanted = if in_level(scene) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        for mut visibility in &mut roots {
            if *visibility != wanted {
                *visibility = wanted;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusKind;
    use rstest::rstest;

    #[test]
    fn score_text_formats_value() {
        assert_eq!(score_text(0), "Score: 0");
        assert_eq!(score_text(42), "Score: 42");
    }

    #[rstest]
    #[case(0, "Boosts:  ")]
    #[case(1, "Boosts: *")]
    #[case(3, "Boosts: ***")]
    fn boost_text_uses_stars(#[case] available: u32, #[case] expected: &str) {
        assert_eq!(boost_text(available), expected);
    }

    #[rstest]
    #[case(3, "Health: ***")]
    #[case(0, "Health: ")]
    #[case(-2, "Health: ")]
    fn health_text_uses_stars(#[case] health: i32, #[case] expected: &str) {
        assert_eq!(health_text(health), expected);
    }

    #[test]
    fn status_text_lists_active_effects() {
        let mut statuses = StatusEffects::default();
        assert_eq!(status_text(&statuses), "");

        statuses.apply(StatusKind::Burning, 1.3);
        statuses.apply(StatusKind::Chilled, 2.0);
        assert_eq!(status_text(&statuses), "Burning 1.3s, Chilled 2.0s");
    }
}
