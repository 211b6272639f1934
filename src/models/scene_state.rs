// src/models/scene_state.rs
//
// The single mutable scene. Only the dispatcher, the scheduler tasks and
// the auto-transition timer write to it; the render step reads it.

use crate::config::SceneConfig;
use crate::utilities::easing::map_midi;
use crate::models::{ColorTriple, ImageScene, Palette, Show};

/// Fraction of the viewport the text may drift from centre.
pub const MAX_TEXT_OFFSET_FRACTION: f32 = 0.35;

/// Background revolution period at MIDI 0 (fastest) and 127 (slowest).
pub const MIN_ROTATION_PERIOD_S: f32 = 10.0;
pub const MAX_ROTATION_PERIOD_S: f32 = 300.0;

pub fn rotation_period_for(raw: u8) -> f32 {
    map_midi(raw, MIN_ROTATION_PERIOD_S, MAX_ROTATION_PERIOD_S)
        .clamp(MIN_ROTATION_PERIOD_S, MAX_ROTATION_PERIOD_S)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneMode {
    TextWave,
    TextAudioReactive,
    TextStatic,
    /// Index into `Show::image_scenes`
    ImageScene(usize),
}

impl SceneMode {
    pub fn is_image(&self) -> bool {
        matches!(self, SceneMode::ImageScene(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SceneMode::TextWave => "WAVE",
            SceneMode::TextAudioReactive => "AUDIO",
            SceneMode::TextStatic => "STOP",
            SceneMode::ImageScene(_) => "IMAGE",
        }
    }
}

/// Mean energy of the two analysed bands, 0-255.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandEnergy {
    pub low: f32,
    pub high: f32,
}

#[derive(Debug, Clone)]
pub struct SceneState {
    pub mode: SceneMode,
    pub font_index: usize,
    pub lines: Vec<String>,

    pub background: ColorTriple,
    pub text_color: ColorTriple,
    /// Index into `Show::backdrops` of the visible backdrop
    pub backdrop: Option<usize>,
    /// Seconds per background revolution
    pub rotation_period: f32,

    pub wave_phase: f32,
    pub wave_speed: f32,
    pub bands: BandEnergy,

    pub font_size: f32,
    pub line_height: f32,
    /// Opacity the performer asked for; see `container_opacity`
    pub text_opacity: f32,

    pub offset: (f32, f32),
    pub velocity: (f32, f32),

    axis_range: (f32, f32),

    pub hud_visible: bool,
    pub last_cc: Option<(u8, u8)>,
    text_changing: bool,
}

impl SceneState {
    pub fn new(show: &Show, config: &SceneConfig) -> Self {
        let mut state = Self {
            mode: SceneMode::TextWave,
            font_index: 0,
            lines: show
                .text_sets
                .first()
                .map(|s| s.lines.clone())
                .unwrap_or_default(),
            background: show.initial_background,
            text_color: show.initial_text_color,
            backdrop: None,
            rotation_period: rotation_period_for(config.rotation_midi),
            wave_phase: 0.0,
            wave_speed: config.wave_speed,
            bands: BandEnergy::default(),
            font_size: config.font_size,
            line_height: config.line_height,
            text_opacity: config.opacity,
            offset: (0.0, 0.0),
            velocity: (0.0, 0.0),
            axis_range: (0.0, 1.0),
            hud_visible: true,
            last_cc: None,
            text_changing: false,
        };
        if let Some(palette) = show.palette_by_trigger(show.initial_palette) {
            state.apply_palette(palette);
        }
        state
    }

    /// Effective opacity of the text container: hidden behind an image
    /// scene and while a text swap is fading.
    pub fn container_opacity(&self) -> f32 {
        if self.mode.is_image() || self.text_changing {
            0.0
        } else {
            self.text_opacity
        }
    }

    pub fn is_text_changing(&self) -> bool {
        self.text_changing
    }

    pub fn axis_range(&self) -> (f32, f32) {
        self.axis_range
    }

    /*********************** Scene transitions ***********************/

    pub fn enter_image_scene(&mut self, index: usize, scene: &ImageScene) {
        self.mode = SceneMode::ImageScene(index);
        self.backdrop = None;
        self.background = ColorTriple::from_hex(&scene.background_hex);
    }

    /// Leaves an image scene for the wave text scene. Returns whether an
    /// image scene was active.
    pub fn exit_image_scene(&mut self) -> bool {
        if self.mode.is_image() {
            self.mode = SceneMode::TextWave;
            true
        } else {
            false
        }
    }

    pub fn enable_wave(&mut self) {
        self.mode = SceneMode::TextWave;
    }

    pub fn disable_wave(&mut self) {
        self.mode = SceneMode::TextStatic;
    }

    /// Returns false, leaving the mode untouched, when audio is not ready.
    pub fn toggle_audio_reactive(&mut self, audio_ready: bool) -> bool {
        if !audio_ready {
            return false;
        }
        self.mode = match self.mode {
            SceneMode::TextAudioReactive => SceneMode::TextWave,
            _ => SceneMode::TextAudioReactive,
        };
        true
    }

    /// First half of a text swap: starts the fade-out. Returns false when
    /// a swap is already in flight.
    pub fn begin_text_swap(&mut self) -> bool {
        if self.text_changing {
            return false;
        }
        self.text_changing = true;
        self.text_opacity = 1.0;
        true
    }

    /// Second half: new lines in, fade back up.
    pub fn complete_text_swap(&mut self, lines: &[String]) {
        self.lines = lines.to_vec();
        self.text_changing = false;
    }

    pub fn apply_palette(&mut self, palette: &Palette) {
        self.background = palette.background;
        self.text_color = palette.text;
        self.backdrop = palette.backdrop;
    }

    pub fn select_font(&mut self, index: usize) {
        self.reset_position();
        self.text_opacity = 1.0;
        self.font_index = index;
    }

    pub fn toggle_hud(&mut self) {
        self.hud_visible = !self.hud_visible;
    }

    /*********************** Continuous controls ***********************/

    /// Lower bound of the controlled sub-range, never above the upper one.
    pub fn set_axis_range_min(&mut self, value: f32) {
        self.axis_range.0 = value.clamp(0.0, 1.0).min(self.axis_range.1);
    }

    /// Upper bound of the controlled sub-range, never below the lower one.
    pub fn set_axis_range_max(&mut self, value: f32) {
        self.axis_range.1 = value.clamp(0.0, 1.0).max(self.axis_range.0);
    }

    pub fn reset_position(&mut self) {
        self.offset = (0.0, 0.0);
        self.velocity = (0.0, 0.0);
    }

    /// Applies one frame of joystick drift, clamped to the viewport.
    /// Offsets are in screen pixels with y growing downwards.
    pub fn integrate_offset(&mut self, viewport: (f32, f32)) {
        if self.mode.is_image() {
            return;
        }
        let max_x = viewport.0 * MAX_TEXT_OFFSET_FRACTION;
        let max_y = viewport.1 * MAX_TEXT_OFFSET_FRACTION;
        self.offset.0 = (self.offset.0 + self.velocity.0).clamp(-max_x, max_x);
        self.offset.1 = (self.offset.1 + self.velocity.1).clamp(-max_y, max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> (Show, SceneState) {
        let show = Show::builtin();
        let state = SceneState::new(&show, &SceneConfig::default());
        (show, state)
    }

    #[test]
    fn test_startup_defaults() {
        let (show, state) = state();
        assert_eq!(state.mode, SceneMode::TextWave);
        assert_eq!(state.font_index, 0);
        assert_eq!(state.lines, show.text_sets[0].lines);
        // initial palette 36 shows the first backdrop
        assert_eq!(state.backdrop, Some(0));
        assert_eq!(state.background, ColorTriple::new(81, 106, 174));
        assert_eq!(state.axis_range(), (0.0, 1.0));
    }

    #[test]
    fn test_axis_range_stays_ordered() {
        let (_, mut state) = state();
        state.set_axis_range_max(0.4);
        state.set_axis_range_min(0.9);
        assert_eq!(state.axis_range(), (0.4, 0.4));

        state.set_axis_range_min(0.2);
        state.set_axis_range_max(0.1);
        assert_eq!(state.axis_range(), (0.2, 0.2));

        for v in [0.0, 0.3, 1.0, 0.7, 0.05] {
            state.set_axis_range_min(v);
            let (lo, hi) = state.axis_range();
            assert!(lo <= hi);
            state.set_axis_range_max(1.0 - v);
            let (lo, hi) = state.axis_range();
            assert!(lo <= hi);
        }
    }

    #[test]
    fn test_rotation_period_mapping() {
        assert_eq!(rotation_period_for(0), MIN_ROTATION_PERIOD_S);
        assert_eq!(rotation_period_for(127), MAX_ROTATION_PERIOD_S);
        let mid = rotation_period_for(64);
        let expected = 10.0 + 64.0 / 127.0 * 290.0;
        assert!((mid - expected).abs() < 1e-3);
        let mut last = 0.0;
        for raw in 0..=127u8 {
            let period = rotation_period_for(raw);
            assert!(period >= last);
            last = period;
        }
    }

    #[test]
    fn test_audio_toggle_requires_ready() {
        let (_, mut state) = state();
        assert!(!state.toggle_audio_reactive(false));
        assert_eq!(state.mode, SceneMode::TextWave);

        assert!(state.toggle_audio_reactive(true));
        assert_eq!(state.mode, SceneMode::TextAudioReactive);
        assert!(state.toggle_audio_reactive(true));
        assert_eq!(state.mode, SceneMode::TextWave);
    }

    #[test]
    fn test_offset_clamped_to_viewport() {
        let (_, mut state) = state();
        state.velocity = (50.0, -50.0);
        for _ in 0..100 {
            state.integrate_offset((1000.0, 800.0));
        }
        assert_eq!(state.offset, (350.0, -280.0));

        state.select_font(2);
        assert_eq!(state.offset, (0.0, 0.0));
        assert_eq!(state.velocity, (0.0, 0.0));
        assert_eq!(state.font_index, 2);
    }

    #[test]
    fn test_text_swap_busy_flag() {
        let (_, mut state) = state();
        state.text_opacity = 0.4;
        assert!(state.begin_text_swap());
        assert_eq!(state.container_opacity(), 0.0);
        assert!(!state.begin_text_swap());

        state.complete_text_swap(&["A".to_string()]);
        assert!(!state.is_text_changing());
        assert_eq!(state.container_opacity(), 1.0);
        assert_eq!(state.lines, vec!["A".to_string()]);
    }
}
