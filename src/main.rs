//! Elemancer game binary.

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use elemancer::hud::HudPlugin;
use elemancer::{init_logging, Args, ElemancerPlugin, PresentationPlugin};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let (config, tuning) = args.resolve().context("failed to load configuration")?;
    log::info!(
        "starting on level {} with element {}",
        config.start_level,
        config
            .element_override
            .map_or_else(|| "random".to_owned(), |element| element.to_string())
    );

    App::new()
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>().set(WindowPlugin {
            primary_window: Some(Window {
                title: "Elemancer".to_owned(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(config)
        .insert_resource(tuning)
        .add_plugins((ElemancerPlugin, PresentationPlugin, HudPlugin))
        .run();
    Ok(())
}
