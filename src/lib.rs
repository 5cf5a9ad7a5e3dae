#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate for the Elemancer platformer.
//!
//! Pure game rules (elements, statuses, boosts, levels, loot) live in plain
//! modules; Bevy systems built on them are installed by
//! [`ElemancerPlugin`]. Rendering is optional behind the `render` feature.
pub mod boost;
pub mod combat;
pub mod components;
pub mod config;
pub mod constants;
pub mod element;
pub mod enemy;
pub mod flavor;
pub mod hud;
pub mod level;
pub mod logging;
pub mod loot;
pub mod physics;
pub mod player;
pub mod plugin;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod presentation;
pub mod scene;
pub mod session;
pub mod status;

pub use config::{Args, ConfigError, GameConfig, Tuning};
pub use element::Element;
pub use level::{LevelError, LevelId};
pub use logging::init as init_logging;
pub use plugin::{ElemancerPlugin, GameSet};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use presentation::PresentationPlugin;
pub use scene::{GameScene, Progress};
pub use session::PlayerState;
