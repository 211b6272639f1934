// src/controllers/routes.rs
//
// Trigger id -> route lookup tables built from the show.
// A note id may match several tables; the dispatcher takes the route with
// the lowest precedence value.

use std::collections::HashMap;

use crate::models::Show;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRoute {
    WaveOn,
    WaveOff,
    AudioToggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRoute {
    ImageScene(usize),
    Mode(ModeRoute),
    TextSet(usize),
    Palette(usize),
    Font(usize),
}

impl NoteRoute {
    pub fn precedence(&self) -> u8 {
        match self {
            NoteRoute::ImageScene(_) => 1,
            NoteRoute::Mode(_) => 2,
            NoteRoute::TextSet(_) => 3,
            NoteRoute::Palette(_) => 4,
            NoteRoute::Font(_) => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRoute {
    JoystickX,
    JoystickY,
    RotationSpeed,
    FontSize,
    LineHeight,
    AxisRangeMin,
    AxisRangeMax,
    WaveSpeed,
    TextOpacity,
    BackgroundChannel(usize),
    TextChannel(usize),
}

#[derive(Debug, Default)]
pub struct RouteTable {
    notes: HashMap<u8, Vec<NoteRoute>>,
    controls: HashMap<u8, ControlRoute>,
    status_toggle: Option<u8>,
}

impl RouteTable {
    pub fn from_show(show: &Show) -> Self {
        let mut table = Self::default();

        for (i, scene) in show.image_scenes.iter().enumerate() {
            table.add_note(scene.trigger, NoteRoute::ImageScene(i));
        }
        table.add_note(show.modes.wave_enable, NoteRoute::Mode(ModeRoute::WaveOn));
        table.add_note(show.modes.wave_disable, NoteRoute::Mode(ModeRoute::WaveOff));
        table.add_note(show.modes.audio_toggle, NoteRoute::Mode(ModeRoute::AudioToggle));
        for (i, set) in show.text_sets.iter().enumerate() {
            table.add_note(set.trigger, NoteRoute::TextSet(i));
        }
        for (i, palette) in show.palettes.iter().enumerate() {
            table.add_note(palette.trigger, NoteRoute::Palette(i));
        }
        for (i, font) in show.fonts.iter().enumerate() {
            table.add_note(font.trigger, NoteRoute::Font(i));
        }
        table.status_toggle = Some(show.modes.status_box_toggle);

        let c = &show.controls;
        let fixed = [
            (c.joystick_x, ControlRoute::JoystickX),
            (c.joystick_y, ControlRoute::JoystickY),
            (c.rotation_speed, ControlRoute::RotationSpeed),
            (c.font_size, ControlRoute::FontSize),
            (c.line_height, ControlRoute::LineHeight),
            (c.axis_range_min, ControlRoute::AxisRangeMin),
            (c.axis_range_max, ControlRoute::AxisRangeMax),
            (c.wave_speed, ControlRoute::WaveSpeed),
            (c.text_opacity, ControlRoute::TextOpacity),
        ];
        for (id, route) in fixed {
            table.controls.insert(id, route);
        }
        for (channel, id) in c.background_channels.iter().enumerate() {
            table
                .controls
                .insert(*id, ControlRoute::BackgroundChannel(channel));
        }
        for (channel, id) in c.text_channels.iter().enumerate() {
            table.controls.insert(*id, ControlRoute::TextChannel(channel));
        }

        table
    }

    fn add_note(&mut self, id: u8, route: NoteRoute) {
        let routes = self.notes.entry(id).or_default();
        routes.push(route);
        routes.sort_by_key(|r| r.precedence());
    }

    /// The winning route for a note, if any.
    pub fn resolve_note(&self, id: u8) -> Option<NoteRoute> {
        self.notes.get(&id).and_then(|routes| routes.first().copied())
    }

    pub fn is_status_toggle(&self, id: u8) -> bool {
        self.status_toggle == Some(id)
    }

    pub fn resolve_control(&self, id: u8) -> Option<ControlRoute> {
        self.controls.get(&id).copied()
    }
}
