// src/render/frame.rs
//
// The per-frame render step: scene state in, style instructions out.
// Nothing here touches nannou so it can run under test.

use crate::animation::axis_mapper::{band_energy, band_for_tag, map_axis, map_energy, wave_fraction};
use crate::models::{ColorTriple, FontConfig, SceneMode, SceneState, Show};
use std::f32::consts::TAU;

/// Axis settings of one character.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphStyle {
    pub ch: char,
    /// Axis tag and value, in font-variation-settings order
    pub axes: Vec<(String, f32)>,
}

impl GlyphStyle {
    pub fn axis(&self, tag: &str) -> Option<f32> {
        self.axes.iter().find(|(t, _)| t == tag).map(|(_, v)| *v)
    }

    /// e.g. `'wdth' 120, 'wght' 436`, or `normal` without axes.
    pub fn variation_settings(&self) -> String {
        if self.axes.is_empty() {
            return "normal".to_string();
        }
        self.axes
            .iter()
            .map(|(tag, value)| format!("'{}' {}", tag, value.round() as i64))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    /// False while an image scene hides the text
    pub visible: bool,
    pub lines: Vec<Vec<GlyphStyle>>,
    pub font_index: usize,
    pub font_size: f32,
    pub line_height: f32,
    pub color: ColorTriple,
    /// Target opacity of the whole text block
    pub opacity: f32,
    /// Screen pixels, y down
    pub offset: (f32, f32),
}

impl Default for TextFrame {
    fn default() -> Self {
        Self {
            visible: false,
            lines: Vec::new(),
            font_index: 0,
            font_size: 0.0,
            line_height: 1.0,
            color: ColorTriple::default(),
            opacity: 0.0,
            offset: (0.0, 0.0),
        }
    }
}

/// Inserts or overwrites `tag`, keeping the position of an existing entry.
fn upsert(axes: &mut Vec<(String, f32)>, tag: &str, value: f32) {
    match axes.iter_mut().find(|(t, _)| t == tag) {
        Some(entry) => entry.1 = value,
        None => axes.push((tag.to_string(), value)),
    }
}

fn insert_missing(axes: &mut Vec<(String, f32)>, tag: &str, value: f32) {
    if !axes.iter().any(|(t, _)| t == tag) {
        axes.push((tag.to_string(), value));
    }
}

/// Axis values of the character at `row`, `col`.
pub fn glyph_axes(font: &FontConfig, scene: &SceneState, row: usize, col: usize) -> Vec<(String, f32)> {
    let mut axes: Vec<(String, f32)> = font
        .fixed_axes
        .iter()
        .map(|a| (a.tag.clone(), a.value))
        .collect();

    match scene.mode {
        SceneMode::TextWave => {
            let fraction = wave_fraction(scene.wave_phase, row, col);
            for axis in &font.animated_axes {
                upsert(&mut axes, &axis.tag, map_axis(axis, fraction, scene.axis_range()));
            }
        }
        SceneMode::TextAudioReactive => {
            for axis in &font.animated_axes {
                match band_for_tag(&axis.tag) {
                    Some(band) => upsert(&mut axes, &axis.tag, map_energy(axis, scene.bands.get(band))),
                    None => insert_missing(&mut axes, &axis.tag, (axis.min + axis.max) / 2.0),
                }
            }
        }
        SceneMode::TextStatic => {
            for axis in &font.animated_axes {
                insert_missing(&mut axes, &axis.tag, (axis.min + axis.max) / 2.0);
            }
        }
        SceneMode::ImageScene(_) => {}
    }
    axes
}

/// Builds the style instructions for the current state. Pure.
pub fn compose(scene: &SceneState, show: &Show) -> TextFrame {
    let base = TextFrame {
        visible: false,
        lines: Vec::new(),
        font_index: scene.font_index,
        font_size: scene.font_size,
        line_height: scene.line_height,
        color: scene.text_color,
        opacity: scene.container_opacity(),
        offset: scene.offset,
    };

    let Some(font) = show.font(scene.font_index) else {
        return base;
    };
    if scene.mode.is_image() {
        return base;
    }

    let lines = scene
        .lines
        .iter()
        .enumerate()
        .map(|(row, line)| {
            line.chars()
                .enumerate()
                .map(|(col, ch)| GlyphStyle {
                    ch,
                    axes: glyph_axes(font, scene, row, col),
                })
                .collect()
        })
        .collect();

    TextFrame {
        visible: true,
        lines,
        ..base
    }
}

/// One display frame: drift the text, sample audio if reacting to it,
/// compose, then move the wave along.
pub fn step(scene: &mut SceneState, show: &Show, bins: Option<&[u8]>, viewport: (f32, f32)) -> TextFrame {
    scene.integrate_offset(viewport);

    if scene.mode == SceneMode::TextAudioReactive {
        if let Some(bins) = bins {
            scene.bands = band_energy(bins);
        }
    }

    let frame = compose(scene, show);

    if scene.mode == SceneMode::TextWave {
        // wrapped so small speeds survive hours of running
        scene.wave_phase = (scene.wave_phase + scene.wave_speed).rem_euclid(TAU);
    }
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    fn setup() -> (Show, SceneState) {
        let show = Show::builtin();
        let scene = SceneState::new(&show, &SceneConfig::default());
        (show, scene)
    }

    #[test]
    fn test_wave_frame_ripples_across_characters() {
        let (show, mut scene) = setup();
        scene.wave_phase = 0.0;
        let frame = compose(&scene, &show);

        assert!(frame.visible);
        assert_eq!(frame.lines.len(), 3);
        assert_eq!(frame.lines[0].len(), "FEIRA DAS".chars().count());

        // Chivo: fixed wdth first, then animated wght
        let first = &frame.lines[0][0];
        assert_eq!(first.axes[0], ("wdth".to_string(), 120.0));
        assert_eq!(first.axis("wght"), Some(500.0));
        assert_eq!(first.variation_settings(), "'wdth' 120, 'wght' 500");

        let second = frame.lines[0][1].axis("wght").unwrap();
        let expected = 100.0 + 800.0 * ((0.7f32.sin() + 1.0) / 2.0);
        assert!((second - expected).abs() < 1e-3);

        let below = frame.lines[1][0].axis("wght").unwrap();
        let expected = 100.0 + 800.0 * ((0.5f32.sin() + 1.0) / 2.0);
        assert!((below - expected).abs() < 1e-3);
    }

    #[test]
    fn test_step_advances_phase_only_in_wave() {
        let (show, mut scene) = setup();
        scene.wave_speed = 0.1;
        step(&mut scene, &show, None, (800.0, 600.0));
        step(&mut scene, &show, None, (800.0, 600.0));
        assert!((scene.wave_phase - 0.2).abs() < 1e-6);

        scene.disable_wave();
        step(&mut scene, &show, None, (800.0, 600.0));
        assert!((scene.wave_phase - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_phase_keeps_moving_after_hours() {
        let (show, mut scene) = setup();
        scene.wave_phase = 38880.0;
        scene.wave_speed = 0.001;
        step(&mut scene, &show, None, (800.0, 600.0));
        assert!(scene.wave_phase < TAU);

        let start = scene.wave_phase;
        for _ in 0..600 {
            step(&mut scene, &show, None, (800.0, 600.0));
        }
        let moved = (scene.wave_phase - start).rem_euclid(TAU);
        assert!((moved - 0.6).abs() < 1e-3, "moved {}", moved);
    }

    #[test]
    fn test_static_frame_uses_midpoints() {
        let (show, mut scene) = setup();
        scene.disable_wave();
        scene.set_axis_range_max(0.1);
        let frame = compose(&scene, &show);
        for glyph in frame.lines.iter().flatten() {
            assert_eq!(glyph.variation_settings(), "'wdth' 120, 'wght' 500");
        }
    }

    #[test]
    fn test_audio_frame_follows_bands() {
        let (show, mut scene) = setup();
        assert!(scene.toggle_audio_reactive(true));
        scene.select_font(3); // Zeitung: animated wght, fixed opsz

        let mut bins = vec![0u8; 128];
        for b in bins.iter_mut().take(12) {
            *b = 255;
        }
        let frame = step(&mut scene, &show, Some(bins.as_slice()), (800.0, 600.0));
        let glyph = &frame.lines[0][0];
        assert_eq!(glyph.axis("wght"), Some(900.0));
        assert_eq!(glyph.axis("opsz"), Some(20.0));
        assert_eq!(scene.wave_phase, 0.0);

        scene.select_font(1); // Fit: animated wdth on the high band
        let frame = compose(&scene, &show);
        assert_eq!(frame.lines[0][0].axis("wdth"), Some(0.0));
    }

    #[test]
    fn test_image_scene_skips_text() {
        let (show, mut scene) = setup();
        scene.enter_image_scene(0, &show.image_scenes[0]);
        scene.velocity = (5.0, 5.0);
        let phase = scene.wave_phase;
        let frame = step(&mut scene, &show, None, (800.0, 600.0));
        assert!(!frame.visible);
        assert!(frame.lines.is_empty());
        assert_eq!(frame.opacity, 0.0);
        assert_eq!(scene.offset, (0.0, 0.0));
        assert_eq!(scene.wave_phase, phase);
    }

    #[test]
    fn test_offset_integrates_every_text_frame() {
        let (show, mut scene) = setup();
        scene.velocity = (2.0, -1.0);
        scene.disable_wave();
        for _ in 0..3 {
            step(&mut scene, &show, None, (800.0, 600.0));
        }
        assert_eq!(scene.offset, (6.0, -3.0));
        assert_eq!(compose(&scene, &show).offset, (6.0, -3.0));
    }

    #[test]
    fn test_variation_settings_rounding() {
        let glyph = GlyphStyle {
            ch: 'a',
            axes: vec![("wght".into(), 436.5), ("wdth".into(), 87.2)],
        };
        assert_eq!(glyph.variation_settings(), "'wght' 437, 'wdth' 87");
        let bare = GlyphStyle { ch: ' ', axes: vec![] };
        assert_eq!(bare.variation_settings(), "normal");
    }
}
