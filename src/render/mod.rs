// src/render/mod.rs
// Per-frame text styling and its nannou drawing

pub mod frame;
pub mod text_renderer;

pub use frame::{GlyphStyle, TextFrame};
pub use text_renderer::{FontLibrary, TextRenderer};
