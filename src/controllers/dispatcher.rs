// src/controllers/dispatcher.rs
//
// Turns decoded MIDI events into scene transitions. Never draws: it
// mutates the SceneState and reports what needs redrawing.

use std::collections::HashSet;

use super::midi::{MidiEvent, MidiEventKind};
use super::routes::{ControlRoute, ModeRoute, NoteRoute, RouteTable};
use crate::config::TimingConfig;
use crate::models::{rotation_period_for, SceneState, Show};
use crate::services::Scheduler;
use crate::utilities::easing::map_midi;

const JOYSTICK_CENTER: i16 = 64;
const JOYSTICK_DEAD_ZONE: i16 = 5;
/// Pixels per frame at full deflection
const JOYSTICK_MAX_SPEED: f32 = 10.0;

const FONT_SIZE_RANGE: (f32, f32) = (10.0, 350.0);
const MIN_FONT_SIZE: f32 = 8.0;
const LINE_HEIGHT_RANGE: (f32, f32) = (0.7, 3.0);
const WAVE_SPEED_RANGE: (f32, f32) = (0.001, 0.15);

/// What the visual side has to act on after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideEffects {
    pub relayout_text: bool,
    pub swap_background: bool,
    pub refresh_hud: bool,
}

impl SideEffects {
    pub fn merge(&mut self, other: SideEffects) {
        self.relayout_text |= other.relayout_text;
        self.swap_background |= other.swap_background;
        self.refresh_hud |= other.refresh_hud;
    }

    pub fn is_empty(&self) -> bool {
        *self == SideEffects::default()
    }
}

/// Deferred halves of two-phase transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTask {
    CompleteTextSwap { text_set: usize },
}

pub struct DispatchContext<'a> {
    pub now: f32,
    pub audio_ready: bool,
    pub scheduler: &'a mut Scheduler<SceneTask>,
}

pub struct Dispatcher {
    routes: RouteTable,
    fade_seconds: f32,
    missing_scenes: HashSet<usize>,
}

impl Dispatcher {
    pub fn new(show: &Show, timing: &TimingConfig) -> Self {
        Self {
            routes: RouteTable::from_show(show),
            fade_seconds: timing.text_fade_seconds,
            missing_scenes: HashSet::new(),
        }
    }

    /// Makes an image scene permanently unselectable.
    pub fn mark_scene_missing(&mut self, index: usize) {
        self.missing_scenes.insert(index);
    }

    pub fn dispatch(
        &self,
        show: &Show,
        scene: &mut SceneState,
        event: &MidiEvent,
        ctx: &mut DispatchContext,
    ) -> SideEffects {
        match event.kind {
            MidiEventKind::NoteOn => self.dispatch_note(show, scene, event.id, ctx),
            MidiEventKind::ControlChange => {
                scene.last_cc = Some((event.id, event.value));
                let mut effects = SideEffects {
                    refresh_hud: true,
                    ..Default::default()
                };
                if let Some(route) = self.routes.resolve_control(event.id) {
                    effects.merge(apply_control(scene, route, event.value));
                }
                effects
            }
        }
    }

    fn dispatch_note(
        &self,
        show: &Show,
        scene: &mut SceneState,
        id: u8,
        ctx: &mut DispatchContext,
    ) -> SideEffects {
        let mut effects = SideEffects::default();

        match self.routes.resolve_note(id) {
            Some(NoteRoute::ImageScene(index)) => {
                if self.missing_scenes.contains(&index) {
                    log::error!(
                        "Image scene #{} (note {}) has no visual element, ignoring",
                        show.image_scenes[index].element_id,
                        id
                    );
                    return effects;
                }
                scene.enter_image_scene(index, &show.image_scenes[index]);
                log::debug!("Image scene {} active", show.image_scenes[index].element_id);
                effects.swap_background = true;
                effects.refresh_hud = true;
            }
            Some(NoteRoute::Mode(ModeRoute::AudioToggle)) if !ctx.audio_ready => {
                log::warn!("Audio-reactive mode requested but audio input is not ready");
                return effects;
            }
            Some(NoteRoute::TextSet(_)) if scene.is_text_changing() => {
                log::debug!("Text change in progress, dropping note {}", id);
                return effects;
            }
            Some(route) => {
                if scene.exit_image_scene() {
                    effects.swap_background = true;
                }
                effects.merge(self.apply_text_route(show, scene, route, ctx));
                effects.refresh_hud = true;
            }
            None => {}
        }

        if self.routes.is_status_toggle(id) {
            scene.toggle_hud();
            effects.refresh_hud = true;
        }
        effects
    }

    fn apply_text_route(
        &self,
        show: &Show,
        scene: &mut SceneState,
        route: NoteRoute,
        ctx: &mut DispatchContext,
    ) -> SideEffects {
        let mut effects = SideEffects::default();
        match route {
            NoteRoute::Mode(ModeRoute::WaveOn) => scene.enable_wave(),
            NoteRoute::Mode(ModeRoute::WaveOff) => scene.disable_wave(),
            NoteRoute::Mode(ModeRoute::AudioToggle) => {
                scene.toggle_audio_reactive(ctx.audio_ready);
                log::info!("Text animation: {}", scene.mode.label());
            }
            NoteRoute::TextSet(index) => {
                if scene.begin_text_swap() {
                    ctx.scheduler.schedule(
                        ctx.now,
                        self.fade_seconds,
                        SceneTask::CompleteTextSwap { text_set: index },
                    );
                }
            }
            NoteRoute::Palette(index) => {
                let palette = &show.palettes[index];
                scene.apply_palette(palette);
                log::info!(
                    "Note {}: background {}, text {}",
                    palette.trigger,
                    palette.background,
                    palette.text
                );
                effects.swap_background = true;
                effects.relayout_text = true;
            }
            NoteRoute::Font(index) => {
                scene.select_font(index);
                effects.relayout_text = true;
            }
            NoteRoute::ImageScene(_) => {}
        }
        effects
    }

    /// Runs a task the scheduler handed back.
    pub fn run_task(&self, show: &Show, scene: &mut SceneState, task: SceneTask) -> SideEffects {
        match task {
            SceneTask::CompleteTextSwap { text_set } => {
                if let Some(set) = show.text_sets.get(text_set) {
                    scene.complete_text_swap(&set.lines);
                }
                SideEffects {
                    relayout_text: true,
                    refresh_hud: true,
                    ..Default::default()
                }
            }
        }
    }
}

fn joystick_speed(value: u8) -> f32 {
    let diff = value as i16 - JOYSTICK_CENTER;
    if diff.abs() < JOYSTICK_DEAD_ZONE {
        0.0
    } else {
        diff as f32 / (127 - JOYSTICK_CENTER) as f32 * JOYSTICK_MAX_SPEED
    }
}

fn channel_value(value: u8) -> u8 {
    map_midi(value, 0.0, 255.0).round() as u8
}

fn apply_control(scene: &mut SceneState, route: ControlRoute, value: u8) -> SideEffects {
    let mut effects = SideEffects::default();
    let normalized = value as f32 / 127.0;

    match route {
        ControlRoute::JoystickX => scene.velocity.0 = joystick_speed(value),
        // screen y grows downwards, pushing the stick up moves text up
        ControlRoute::JoystickY => scene.velocity.1 = -joystick_speed(value),
        ControlRoute::RotationSpeed => {
            scene.rotation_period = rotation_period_for(value);
            effects.swap_background = true;
        }
        ControlRoute::FontSize => {
            scene.font_size = map_midi(value, FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1).max(MIN_FONT_SIZE);
            effects.relayout_text = true;
        }
        ControlRoute::LineHeight => {
            scene.line_height = map_midi(value, LINE_HEIGHT_RANGE.0, LINE_HEIGHT_RANGE.1);
            effects.relayout_text = true;
        }
        ControlRoute::AxisRangeMin => scene.set_axis_range_min(normalized),
        ControlRoute::AxisRangeMax => scene.set_axis_range_max(normalized),
        ControlRoute::WaveSpeed => {
            scene.wave_speed = map_midi(value, WAVE_SPEED_RANGE.0, WAVE_SPEED_RANGE.1);
        }
        ControlRoute::TextOpacity => scene.text_opacity = normalized,
        ControlRoute::BackgroundChannel(channel) => {
            scene.background.set_channel(channel, channel_value(value));
        }
        ControlRoute::TextChannel(channel) => {
            scene.text_color.set_channel(channel, channel_value(value));
        }
    }
    effects
}
