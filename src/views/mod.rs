// src/views/mod.rs

pub mod background;
pub mod hud;
pub mod surface;

pub use background::BackgroundManager;
pub use hud::Hud;
pub use surface::{active_visual, ActiveVisual, VisualSurface};
