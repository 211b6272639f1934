pub mod color;
pub mod scene_state;
pub mod show;

pub use color::ColorTriple;
pub use scene_state::{
    rotation_period_for, BandEnergy, SceneMode, SceneState, MAX_ROTATION_PERIOD_S,
    MAX_TEXT_OFFSET_FRACTION, MIN_ROTATION_PERIOD_S,
};
pub use show::{
    Backdrop, ControlIds, FixedAxis, FontAxisSpec, FontConfig, ImageScene, ModeTriggers, Palette,
    Show, TextSet,
};
