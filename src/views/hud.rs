// src/views/hud.rs
//
// The status box: a single block of text, rebuilt wholesale whenever
// something it shows changes.

use nannou::prelude::*;

use crate::models::{SceneMode, SceneState, Show};

const HUD_FONT_SIZE: u32 = 14;
const HUD_MARGIN: f32 = 20.0;
const HUD_WIDTH: f32 = 320.0;

#[derive(Default)]
pub struct Hud {
    content: String,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(&mut self, scene: &SceneState, show: &Show, midi_status: &str, connected: bool) {
        self.content = hud_text(scene, show, midi_status, connected);
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn draw(&self, draw: &Draw, scene: &SceneState, rect: Rect) {
        if !scene.hud_visible {
            return;
        }
        let line_count = self.content.lines().count().max(1) as f32;
        let h = line_count * HUD_FONT_SIZE as f32 * 1.6 + HUD_MARGIN;
        let x = rect.left() + HUD_MARGIN + HUD_WIDTH / 2.0;
        let y = rect.top() - HUD_MARGIN - h / 2.0;

        draw.rect()
            .x_y(x, y)
            .w_h(HUD_WIDTH, h)
            .color(rgba(0.0, 0.0, 0.0, 0.6));
        draw.text(&self.content)
            .x_y(x, y)
            .w_h(HUD_WIDTH - HUD_MARGIN, h - HUD_MARGIN)
            .font_size(HUD_FONT_SIZE)
            .left_justify()
            .align_text_top()
            .color(WHITE);
    }
}

pub fn hud_text(scene: &SceneState, show: &Show, midi_status: &str, connected: bool) -> String {
    let mut lines = vec!["STATS FOR NERDS".to_string(), "---".to_string()];

    match scene.mode {
        SceneMode::ImageScene(index) => {
            let id = show
                .image_scenes
                .get(index)
                .map(|s| s.element_id.as_str())
                .unwrap_or("?");
            lines.push(format!("Image: {}", id));
        }
        mode => {
            let font = show.font(scene.font_index).map(|f| f.name.as_str()).unwrap_or("?");
            lines.push(format!("Font: {}", font));
            lines.push(format!("Animation: {}", mode.label()));
        }
    }

    lines.push(format!("MIDI: {}", midi_status));
    if connected {
        if let Some((id, value)) = scene.last_cc {
            lines.push(format!("Last CC: #{} | Value: {}", id, value));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    #[test]
    fn test_hud_text() {
        let show = Show::builtin();
        let mut scene = SceneState::new(&show, &SceneConfig::default());
        scene.last_cc = Some((21, 64));

        let text = hud_text(&scene, &show, "Connected: nanoKONTROL", true);
        assert_eq!(
            text,
            "STATS FOR NERDS\n---\nFont: Chivo\nAnimation: WAVE\nMIDI: Connected: nanoKONTROL\nLast CC: #21 | Value: 64"
        );

        scene.disable_wave();
        let text = hud_text(&scene, &show, "no MIDI input device found", false);
        assert!(text.contains("Animation: STOP"));
        assert!(!text.contains("Last CC"));

        scene.enter_image_scene(2, &show.image_scenes[2]);
        let text = hud_text(&scene, &show, "x", false);
        assert!(text.contains("Image: image-scene-46"));
        assert!(!text.contains("Font:"));
    }

    #[test]
    fn test_refresh_replaces_content() {
        let show = Show::builtin();
        let mut scene = SceneState::new(&show, &SceneConfig::default());
        let mut hud = Hud::new();
        hud.refresh(&scene, &show, "a", false);
        scene.select_font(4);
        hud.refresh(&scene, &show, "b", false);
        assert!(hud.content().contains("Font: Hela"));
        assert!(!hud.content().contains("MIDI: a"));
    }
}
