// src/views/background.rs
//
// Manages the background layer: flat color, the rotating backdrop of the
// current palette, or a full-screen image scene.

use nannou::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::surface::{active_visual, ActiveVisual, VisualSurface};
use crate::models::{SceneState, Show};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub struct BackgroundManager {
    backdrops: Vec<Option<wgpu::Texture>>,
    scenes: Vec<Option<wgpu::Texture>>,
    element_ids: HashSet<String>,
    active: ActiveVisual,
    rotation: f32,
}

impl BackgroundManager {
    /// Loads `backgrounds/<element_id>.*` and `scenes/<element_id>.*` from
    /// the assets directory. Missing files are left for the stage
    /// controller to report.
    pub fn load(app: &App, show: &Show, assets_dir: &Path) -> Self {
        let mut element_ids = HashSet::new();

        let mut load_all = |dir: &str, ids: Vec<&String>| -> Vec<Option<wgpu::Texture>> {
            ids.into_iter()
                .map(|id| {
                    let texture = find_image(&assets_dir.join(dir), id)
                        .and_then(|path| match wgpu::Texture::from_path(app, &path) {
                            Ok(texture) => Some(texture),
                            Err(e) => {
                                log::warn!("Failed to load {}: {}", path.display(), e);
                                None
                            }
                        });
                    if texture.is_some() {
                        element_ids.insert(id.clone());
                    }
                    texture
                })
                .collect()
        };

        let backdrops = load_all(
            "backgrounds",
            show.backdrops.iter().map(|b| &b.element_id).collect(),
        );
        let scenes = load_all(
            "scenes",
            show.image_scenes.iter().map(|s| &s.element_id).collect(),
        );

        log::info!(
            "Loaded {} of {} background visuals",
            element_ids.len(),
            backdrops.len() + scenes.len()
        );

        Self {
            backdrops,
            scenes,
            element_ids,
            active: ActiveVisual::None,
            rotation: 0.0,
        }
    }

    /// Picks up the visual the scene asks for.
    pub fn sync(&mut self, scene: &SceneState) {
        let next = active_visual(scene);
        if next != self.active {
            log::debug!("Background visual {:?} -> {:?}", self.active, next);
            self.active = next;
        }
    }

    pub fn update(&mut self, dt: f32, scene: &SceneState) {
        self.rotation = advance_rotation(self.rotation, dt, scene.rotation_period);
    }

    pub fn draw(&self, draw: &Draw, scene: &SceneState, rect: Rect) {
        let (r, g, b) = scene.background.to_f32();
        draw.background().color(rgb(r, g, b));

        match self.active {
            ActiveVisual::None => {}
            ActiveVisual::Backdrop(index) => {
                if let Some(Some(texture)) = self.backdrops.get(index) {
                    // window diagonal, so no corner shows while rotating
                    let side = rect.w().hypot(rect.h());
                    draw.texture(texture)
                        .w_h(side, side)
                        .rotate(-self.rotation);
                }
            }
            ActiveVisual::Scene(index) => {
                if let Some(Some(texture)) = self.scenes.get(index) {
                    let [w, h] = texture.size();
                    let scale = (rect.w() / w as f32).min(rect.h() / h as f32);
                    draw.texture(texture)
                        .w_h(w as f32 * scale, h as f32 * scale);
                }
            }
        }
    }
}

impl VisualSurface for BackgroundManager {
    fn has_element(&self, element_id: &str) -> bool {
        self.element_ids.contains(element_id)
    }
}

fn find_image(dir: &Path, id: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{id}.{ext}")))
        .find(|path| path.exists())
}

/// Angle after `dt` seconds at one revolution per `period` seconds,
/// wrapped to [0, TAU).
pub fn advance_rotation(angle: f32, dt: f32, period: f32) -> f32 {
    if period <= 0.0 {
        return angle;
    }
    (angle + dt / period * TAU).rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_rotation() {
        let tests = vec![
            (0.0, 1.0, 10.0, TAU / 10.0),
            (0.0, 5.0, 10.0, PI),
            (0.0, 10.0, 10.0, 0.0),
            (PI, 0.0, 300.0, PI),
            (1.0, 1.0, 0.0, 1.0),
        ];
        for (angle, dt, period, expected) in tests {
            let result = advance_rotation(angle, dt, period);
            assert!(
                (result - expected).abs() < 1e-4 || (result - expected).abs() > TAU - 1e-4,
                "Failed for angle {} dt {} period {}: {}",
                angle,
                dt,
                period,
                result
            );
        }
    }

    #[test]
    fn test_period_change_keeps_angle() {
        let angle = advance_rotation(0.0, 2.0, 10.0);
        // a slower period continues from where the faster one left off
        let next = advance_rotation(angle, 0.0, 300.0);
        assert_eq!(angle, next);
    }
}
