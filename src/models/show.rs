// src/models/show.rs
//
// The compiled-in show: text sets, fonts, palettes, backgrounds,
// image scenes and the trigger ids that select them.

use std::collections::HashSet;

use crate::error::{Result, StageError};
use crate::models::ColorTriple;

#[derive(Debug, Clone)]
pub struct TextSet {
    pub trigger: u8,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontAxisSpec {
    pub tag: String,
    pub min: f32,
    pub max: f32,
    pub use_global_range: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedAxis {
    pub tag: String,
    pub value: f32,
}

#[derive(Debug, Clone)]
pub struct FontConfig {
    pub trigger: u8,
    pub name: String,
    pub font_family: String,
    pub animated_axes: Vec<FontAxisSpec>,
    pub fixed_axes: Vec<FixedAxis>,
}

/// A rotating background visual, looked up on the visual surface by id.
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub element_id: String,
}

#[derive(Debug, Clone)]
pub struct Palette {
    pub trigger: u8,
    pub background: ColorTriple,
    pub text: ColorTriple,
    /// Index into `Show::backdrops`; `None` hides every backdrop.
    pub backdrop: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ImageScene {
    pub trigger: u8,
    pub background_hex: String,
    pub element_id: String,
}

/// Note ids of the single-purpose pads.
#[derive(Debug, Clone)]
pub struct ModeTriggers {
    pub wave_enable: u8,
    pub wave_disable: u8,
    pub audio_toggle: u8,
    pub status_box_toggle: u8,
}

/// Controller ids of the continuous controls.
#[derive(Debug, Clone)]
pub struct ControlIds {
    pub joystick_x: u8,
    pub joystick_y: u8,
    pub rotation_speed: u8,
    pub font_size: u8,
    pub line_height: u8,
    pub axis_range_min: u8,
    pub axis_range_max: u8,
    pub wave_speed: u8,
    pub text_opacity: u8,
    pub background_channels: [u8; 3],
    pub text_channels: [u8; 3],
}

#[derive(Debug, Clone)]
pub struct Show {
    pub text_sets: Vec<TextSet>,
    pub fonts: Vec<FontConfig>,
    pub backdrops: Vec<Backdrop>,
    pub palettes: Vec<Palette>,
    pub image_scenes: Vec<ImageScene>,
    pub modes: ModeTriggers,
    pub controls: ControlIds,
    /// Palette applied at startup.
    pub initial_palette: u8,
    /// Colors in effect before any palette has been applied.
    pub initial_background: ColorTriple,
    pub initial_text_color: ColorTriple,
}

impl Show {
    /// Checks the per-font axis uniqueness and that every table is usable.
    pub fn validate(&self) -> Result<()> {
        if self.text_sets.is_empty() {
            return Err(StageError::InvalidShow("no text sets defined".into()));
        }
        if self.fonts.is_empty() {
            return Err(StageError::InvalidShow("no fonts defined".into()));
        }

        for font in &self.fonts {
            let mut tags = HashSet::new();
            let all_tags = font
                .animated_axes
                .iter()
                .map(|a| &a.tag)
                .chain(font.fixed_axes.iter().map(|a| &a.tag));
            for tag in all_tags {
                if tag.len() != 4 {
                    return Err(StageError::InvalidShow(format!(
                        "font {}: axis tag '{}' is not four characters",
                        font.name, tag
                    )));
                }
                if !tags.insert(tag) {
                    return Err(StageError::InvalidShow(format!(
                        "font {}: axis '{}' defined twice",
                        font.name, tag
                    )));
                }
            }
        }

        for palette in &self.palettes {
            if let Some(index) = palette.backdrop {
                if index >= self.backdrops.len() {
                    return Err(StageError::InvalidShow(format!(
                        "palette {} references backdrop {} of {}",
                        palette.trigger,
                        index,
                        self.backdrops.len()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn text_set_index(&self, trigger: u8) -> Option<usize> {
        self.text_sets.iter().position(|s| s.trigger == trigger)
    }

    pub fn palette_by_trigger(&self, trigger: u8) -> Option<&Palette> {
        self.palettes.iter().find(|p| p.trigger == trigger)
    }

    pub fn font(&self, index: usize) -> Option<&FontConfig> {
        self.fonts.get(index)
    }

    /// The installation as shipped.
    pub fn builtin() -> Self {
        let mut text_sets = vec![
            text_set(56, &["FEIRA DAS", "PROFISSÕES", "UFC 2025"]),
            text_set(57, &["Projeto", "Paisagens", "Tipográficas", "Interativas"]),
            text_set(58, &["A tipografia", "está em todos", "os lugares"]),
            text_set(59, &["Design", "Coding", "Typography"]),
        ];
        for note in 60..=71u8 {
            text_sets.push(TextSet {
                trigger: note,
                lines: vec!["Exemplo".into(), "Teste".into(), note.to_string()],
            });
        }

        let fonts = vec![
            font(16, "Chivo", "'Chivo', sans-serif", &[("wght", 100.0, 900.0)], &[("wdth", 120.0)]),
            font(17, "Fit", "'Fit', sans-serif", &[("wdth", 0.0, 1000.0)], &[]),
            font(18, "Grade", "'Grade', serif", &[("wght", 80.0, 150.0)], &[("wdth", 90.0)]),
            font(19, "Zeitung", "'Zeitung', serif", &[("wght", 100.0, 900.0)], &[("opsz", 20.0)]),
            font(20, "Hela", "'Hela', sans-serif", &[("wght", 100.0, 700.0)], &[]),
            font(21, "Tonal", "'tonal-variable', sans-serif", &[("wdth", 20.0, 100.0)], &[]),
        ];

        let backdrops = (1..=4)
            .map(|i| Backdrop {
                element_id: format!("background-svg-container-{i}"),
            })
            .collect();

        let white = ColorTriple::new(255, 255, 255);
        let palettes = vec![
            palette(36, (81, 106, 174), white, Some(0)),
            palette(37, (19, 42, 54), white, Some(1)),
            palette(38, (186, 147, 45), white, Some(2)),
            palette(39, (81, 106, 174), white, Some(3)),
            palette(40, (153, 204, 51), white, None),
            palette(41, (102, 102, 102), white, None),
            palette(42, (51, 51, 51), ColorTriple::new(204, 204, 204), None),
        ];

        let image_scenes = [
            (44, "#516AAE"),
            (45, "#CF4A35"),
            (46, "#1FA69B"),
            (47, "#DA8CB7"),
            (48, "#FFFFFF"),
            (49, "#FFFFFF"),
            (50, "#FFFFFF"),
            (51, "#FFFFFF"),
        ]
        .iter()
        .map(|(note, hex)| ImageScene {
            trigger: *note,
            background_hex: hex.to_string(),
            element_id: format!("image-scene-{note}"),
        })
        .collect();

        Self {
            text_sets,
            fonts,
            backdrops,
            palettes,
            image_scenes,
            modes: ModeTriggers {
                wave_enable: 77,
                wave_disable: 76,
                audio_toggle: 78,
                status_box_toggle: 43,
            },
            controls: ControlIds {
                joystick_x: 80,
                joystick_y: 81,
                rotation_speed: 4,
                font_size: 16,
                line_height: 17,
                axis_range_min: 18,
                axis_range_max: 19,
                wave_speed: 20,
                text_opacity: 21,
                background_channels: [5, 6, 7],
                text_channels: [1, 2, 3],
            },
            initial_palette: 36,
            initial_background: ColorTriple::new(25, 29, 59),
            initial_text_color: ColorTriple::new(230, 226, 190),
        }
    }
}

fn text_set(trigger: u8, lines: &[&str]) -> TextSet {
    TextSet {
        trigger,
        lines: lines.iter().map(|l| l.to_string()).collect(),
    }
}

fn font(
    trigger: u8,
    name: &str,
    family: &str,
    animated: &[(&str, f32, f32)],
    fixed: &[(&str, f32)],
) -> FontConfig {
    FontConfig {
        trigger,
        name: name.to_string(),
        font_family: family.to_string(),
        animated_axes: animated
            .iter()
            .map(|(tag, min, max)| FontAxisSpec {
                tag: tag.to_string(),
                min: *min,
                max: *max,
                use_global_range: true,
            })
            .collect(),
        fixed_axes: fixed
            .iter()
            .map(|(tag, value)| FixedAxis {
                tag: tag.to_string(),
                value: *value,
            })
            .collect(),
    }
}

fn palette(trigger: u8, bg: (u8, u8, u8), text: ColorTriple, backdrop: Option<usize>) -> Palette {
    Palette {
        trigger,
        background: ColorTriple::new(bg.0, bg.1, bg.2),
        text,
        backdrop,
    }
}
