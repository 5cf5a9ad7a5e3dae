//! Scene transitions driven through a headless app.

use bevy::prelude::*;
use elemancer::components::{Goal, Kill, LevelEntity, Player};
use elemancer::element::Element;
use elemancer::flavor::DeathCause;
use elemancer::level::LevelId;
use elemancer::scene::LevelCompleted;
use elemancer::{GameScene, PlayerState, Progress};
use rstest::{fixture, rstest};

#[fixture]
fn level_one() -> App {
    test_utils::app_in_level(LevelId::One, Element::Fire)
}

fn position_of<C: Component>(app: &mut App, matches: impl Fn(&C) -> bool) -> Vec2 {
    let world = app.world_mut();
    let mut query = world.query::<(&Transform, &C)>();
    query
        .iter(world)
        .find(|(_, component)| matches(component))
        .map(|(transform, _)| transform.translation.truncate())
        .expect("component present in level")
}

#[test]
fn boot_enters_the_configured_level() {
    let mut app = test_utils::headless_app(LevelId::Two, Element::Water);
    assert_eq!(test_utils::scene(&app), GameScene::Boot);

    test_utils::step(&mut app, 2);

    assert_eq!(test_utils::scene(&app), GameScene::Level(LevelId::Two));
    assert_eq!(test_utils::count::<Player>(&mut app), 1);
    let progress = app.world().resource::<Progress>();
    assert_eq!(progress.level, LevelId::Two);
    assert_eq!(progress.element, Element::Water);
}

#[rstest]
fn reaching_the_goal_loads_the_next_level(mut level_one: App) {
    let goal = position_of::<Goal>(&mut level_one, |_| true);
    test_utils::teleport_player(&mut level_one, goal);
    test_utils::step(&mut level_one, 2);

    assert_eq!(test_utils::scene(&level_one), GameScene::Level(LevelId::Two));
    assert_eq!(test_utils::count::<Player>(&mut level_one), 1);
    assert_eq!(test_utils::count::<Goal>(&mut level_one), 1);
}

#[rstest]
fn completing_the_last_level_is_a_victory() {
    let mut app = test_utils::app_in_level(LevelId::Three, Element::Air);
    app.world_mut().trigger(LevelCompleted);
    test_utils::step(&mut app, 1);

    assert_eq!(test_utils::scene(&app), GameScene::Victory);
    let progress = app.world().resource::<Progress>();
    assert!(!progress.message.is_empty());
}

#[rstest]
fn falling_out_ends_the_run(mut level_one: App) {
    let pit = position_of::<Kill>(&mut level_one, |kill| kill.0 == DeathCause::FellOut);
    test_utils::teleport_player(&mut level_one, pit);
    test_utils::step(&mut level_one, 2);

    assert_eq!(test_utils::scene(&level_one), GameScene::GameOver);
    let progress = level_one.world().resource::<Progress>();
    assert_eq!(progress.death, Some(DeathCause::FellOut));
    assert!(!progress.message.is_empty());
    assert_eq!(test_utils::count::<LevelEntity>(&mut level_one), 0);
}

#[rstest]
fn standing_in_lava_ends_the_run(mut level_one: App) {
    let lava = position_of::<Kill>(&mut level_one, |kill| kill.0 == DeathCause::Lava);
    test_utils::teleport_player(&mut level_one, lava + Vec2::new(0.0, 10.0));
    test_utils::step(&mut level_one, 2);

    assert_eq!(test_utils::scene(&level_one), GameScene::GameOver);
    assert_eq!(
        level_one.world().resource::<Progress>().death,
        Some(DeathCause::Lava)
    );
}

#[rstest]
fn running_out_of_health_ends_the_run(mut level_one: App) {
    level_one.world_mut().resource_mut::<PlayerState>().health = 0;
    test_utils::step(&mut level_one, 2);

    assert_eq!(test_utils::scene(&level_one), GameScene::GameOver);
    assert_eq!(
        level_one.world().resource::<Progress>().death,
        Some(DeathCause::WornDown)
    );
}

#[rstest]
fn retry_starts_a_fresh_run_from_level_one() {
    let mut app = test_utils::app_in_level(LevelId::Two, Element::Earth);
    {
        let mut state = app.world_mut().resource_mut::<PlayerState>();
        state.score = 12;
        state.health = 0;
    }
    test_utils::step(&mut app, 2);
    assert_eq!(test_utils::scene(&app), GameScene::GameOver);

    test_utils::tap(&mut app, KeyCode::Enter);
    test_utils::step(&mut app, 1);

    assert_eq!(test_utils::scene(&app), GameScene::Level(LevelId::One));
    let state = app.world().resource::<PlayerState>();
    assert_eq!(state.score, 0);
    assert_eq!(state.health, state.max_health);
    assert_eq!(app.world().resource::<Progress>().death, None);
}

#[rstest]
fn end_screens_ignore_other_keys() {
    let mut app = test_utils::app_in_level(LevelId::One, Element::Fire);
    app.world_mut().resource_mut::<PlayerState>().health = 0;
    test_utils::step(&mut app, 2);

    test_utils::tap(&mut app, KeyCode::KeyD);
    test_utils::step(&mut app, 2);

    assert_eq!(test_utils::scene(&app), GameScene::GameOver);
}
