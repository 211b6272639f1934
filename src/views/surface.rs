// src/views/surface.rs
//
// The registry of named visuals the show refers to, and which of them the
// scene currently shows.

use crate::models::{SceneMode, SceneState};

/// Element lookup by id. Implemented by the background view; tests use a
/// plain set of names.
pub trait VisualSurface {
    fn has_element(&self, element_id: &str) -> bool;
}

/// At most one visual is on screen at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveVisual {
    None,
    /// Index into `Show::backdrops`
    Backdrop(usize),
    /// Index into `Show::image_scenes`
    Scene(usize),
}

pub fn active_visual(scene: &SceneState) -> ActiveVisual {
    match (scene.mode, scene.backdrop) {
        (SceneMode::ImageScene(index), _) => ActiveVisual::Scene(index),
        (_, Some(index)) => ActiveVisual::Backdrop(index),
        (_, None) => ActiveVisual::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::models::Show;

    #[test]
    fn test_single_active_visual() {
        let show = Show::builtin();
        let mut scene = SceneState::new(&show, &SceneConfig::default());
        assert_eq!(active_visual(&scene), ActiveVisual::Backdrop(0));

        scene.apply_palette(&show.palettes[5]);
        assert_eq!(active_visual(&scene), ActiveVisual::None);

        scene.apply_palette(&show.palettes[2]);
        scene.enter_image_scene(3, &show.image_scenes[3]);
        assert_eq!(active_visual(&scene), ActiveVisual::Scene(3));

        scene.exit_image_scene();
        assert_eq!(active_visual(&scene), ActiveVisual::None);
    }
}
