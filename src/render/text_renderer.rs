// src/render/text_renderer.rs
//
// Draws a TextFrame with nannou. Static font files cannot vary their
// outlines, so weight is drawn as stacked passes and width as a
// horizontal scale of each character.

use nannou::prelude::*;
use nannou::text::{Font, Scale};
use std::path::Path;

use super::frame::{GlyphStyle, TextFrame};
use crate::models::{FontConfig, Show};
use crate::utilities::easing::ease_towards;

const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// Extra passes at full weight
const MAX_WEIGHT_PASSES: usize = 3;
/// Horizontal shift between passes, as a fraction of the font size
const WEIGHT_PASS_SHIFT: f32 = 0.012;
const MIN_WIDTH_SCALE: f32 = 0.6;
const WIDTH_SCALE_SPAN: f32 = 0.8;

/// Font files by show font index; `None` draws with nannou's default font.
pub struct FontLibrary {
    fonts: Vec<Option<Font>>,
}

impl FontLibrary {
    pub fn load(show: &Show, assets_dir: &Path) -> Self {
        let dir = assets_dir.join("fonts");
        let fonts = show
            .fonts
            .iter()
            .map(|config| {
                let path = FONT_EXTENSIONS
                    .iter()
                    .map(|ext| dir.join(format!("{}.{}", config.name, ext)))
                    .find(|p| p.exists());
                match path.map(|p| (nannou::text::font::from_file(&p), p)) {
                    Some((Ok(font), _)) => Some(font),
                    Some((Err(e), p)) => {
                        log::warn!("Failed to load font {}: {:?}", p.display(), e);
                        None
                    }
                    None => {
                        log::warn!("No font file for {}, using the default font", config.name);
                        None
                    }
                }
            })
            .collect();
        Self { fonts }
    }

    pub fn get(&self, index: usize) -> Option<&Font> {
        self.fonts.get(index).and_then(|f| f.as_ref())
    }
}

pub struct TextRenderer {
    fonts: FontLibrary,
    fade_seconds: f32,
    opacity: f32,
    /// Unscaled advance of every character, per line
    advances: Vec<Vec<f32>>,
}

impl TextRenderer {
    pub fn new(fonts: FontLibrary, fade_seconds: f32) -> Self {
        Self {
            fonts,
            fade_seconds,
            opacity: 0.0,
            advances: Vec::new(),
        }
    }

    /// Recomputes character advances for new lines, font or size.
    pub fn relayout(&mut self, frame: &TextFrame) {
        let font = self.fonts.get(frame.font_index);
        self.advances = frame
            .lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|g| advance_width(font, g.ch, frame.font_size))
                    .collect()
            })
            .collect();
    }

    /// Eases the drawn opacity towards the frame's target.
    pub fn update(&mut self, frame: &TextFrame, dt: f32) {
        self.opacity = ease_towards(self.opacity, frame.opacity, dt, self.fade_seconds);
        if self.advances.len() != frame.lines.len() {
            self.relayout(frame);
        }
    }

    pub fn draw(&self, draw: &Draw, frame: &TextFrame, show: &Show) {
        if !frame.visible || self.opacity <= 0.0 {
            return;
        }
        let Some(config) = show.font(frame.font_index) else {
            return;
        };
        let font = self.fonts.get(frame.font_index);
        let (r, g, b) = frame.color.to_f32();
        let color = rgba(r, g, b, self.opacity);

        let line_px = frame.font_size * frame.line_height;
        let block_h = line_px * frame.lines.len() as f32;
        // offsets are screen space, nannou's y points up
        let origin = pt2(frame.offset.0, -frame.offset.1);

        for (row, line) in frame.lines.iter().enumerate() {
            let advances = self.advances.get(row);
            let scales: Vec<f32> = line.iter().map(|g| width_scale(config, g)).collect();
            let line_w: f32 = line
                .iter()
                .enumerate()
                .map(|(col, _)| advance_at(advances, col) * scales[col])
                .sum();

            let y = origin.y + block_h / 2.0 - line_px * (row as f32 + 0.5);
            let mut x = origin.x - line_w / 2.0;

            for (col, glyph) in line.iter().enumerate() {
                let w = advance_at(advances, col) * scales[col];
                if !glyph.ch.is_whitespace() {
                    let passes = weight_passes(config, glyph);
                    let shift = frame.font_size * WEIGHT_PASS_SHIFT;
                    for pass in 0..=passes {
                        let glyph_draw = draw
                            .x_y(x + w / 2.0 + pass as f32 * shift, y)
                            .scale_x(scales[col]);
                        let text = glyph_draw
                            .text(&glyph.ch.to_string())
                            .font_size(frame.font_size.round().max(1.0) as u32)
                            .w_h(frame.font_size * 2.0, line_px)
                            .color(color);
                        if let Some(font) = font {
                            text.font(font.clone());
                        }
                    }
                }
                x += w;
            }
        }
    }
}

fn advance_at(advances: Option<&Vec<f32>>, col: usize) -> f32 {
    advances.and_then(|a| a.get(col)).copied().unwrap_or(0.0)
}

fn advance_width(font: Option<&Font>, ch: char, size: f32) -> f32 {
    match font {
        Some(font) => font
            .glyph(ch)
            .scaled(Scale::uniform(size))
            .h_metrics()
            .advance_width,
        None => size * 0.6,
    }
}

/// Position of an animated axis value within its declared range, 0-1.
/// `None` when the font does not animate `tag`.
pub fn axis_norm(config: &FontConfig, tag: &str, value: f32) -> Option<f32> {
    let spec = config.animated_axes.iter().find(|a| a.tag == tag)?;
    let span = spec.max - spec.min;
    if span == 0.0 {
        return Some(0.5);
    }
    Some(((value - spec.min) / span).clamp(0.0, 1.0))
}

pub fn weight_passes(config: &FontConfig, glyph: &GlyphStyle) -> usize {
    glyph
        .axis("wght")
        .and_then(|v| axis_norm(config, "wght", v))
        .map(|n| (n * MAX_WEIGHT_PASSES as f32).round() as usize)
        .unwrap_or(1)
}

pub fn width_scale(config: &FontConfig, glyph: &GlyphStyle) -> f32 {
    glyph
        .axis("wdth")
        .and_then(|v| axis_norm(config, "wdth", v))
        .map(|n| MIN_WIDTH_SCALE + WIDTH_SCALE_SPAN * n)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(axes: &[(&str, f32)]) -> GlyphStyle {
        GlyphStyle {
            ch: 'A',
            axes: axes.iter().map(|(t, v)| (t.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn test_weight_passes() {
        let show = Show::builtin();
        let chivo = &show.fonts[0];
        let tests = vec![
            (glyph(&[("wght", 100.0)]), 0),
            (glyph(&[("wght", 500.0)]), 2),
            (glyph(&[("wght", 900.0)]), 3),
            (glyph(&[("wdth", 120.0)]), 1),
        ];
        for (g, expected) in tests {
            assert_eq!(weight_passes(chivo, &g), expected, "Failed for {:?}", g.axes);
        }
    }

    #[test]
    fn test_width_scale_only_for_animated_width() {
        let show = Show::builtin();
        // Chivo's wdth is fixed: drawn at natural width
        assert_eq!(width_scale(&show.fonts[0], &glyph(&[("wdth", 120.0)])), 1.0);

        let fit = &show.fonts[1];
        assert_eq!(width_scale(fit, &glyph(&[("wdth", 0.0)])), MIN_WIDTH_SCALE);
        assert_eq!(width_scale(fit, &glyph(&[("wdth", 1000.0)])), MIN_WIDTH_SCALE + WIDTH_SCALE_SPAN);
    }

    #[test]
    fn test_axis_norm_clamps() {
        let show = Show::builtin();
        let grade = &show.fonts[2];
        assert_eq!(axis_norm(grade, "wght", 50.0), Some(0.0));
        assert_eq!(axis_norm(grade, "wght", 500.0), Some(1.0));
        assert_eq!(axis_norm(grade, "wdth", 90.0), None);
    }
}
