// src/controllers/stage_controller.rs
/// StageController owns the show and the one SceneState and coordinates
/// everything that writes to it: MIDI events, scheduled transition halves
/// and the auto-transition timer. The render step reads from it.
use crate::animation::AutoTransition;
use crate::config::Config;
use crate::error::{Result, StageError};
use crate::models::{SceneState, Show};
use crate::render::frame::{self, TextFrame};
use crate::services::Scheduler;
use crate::views::VisualSurface;

use super::dispatcher::{DispatchContext, Dispatcher, SceneTask, SideEffects};
use super::midi::MidiEvent;

pub struct StageController {
    pub show: Show,
    pub scene: SceneState,
    dispatcher: Dispatcher,
    scheduler: Scheduler<SceneTask>,
    pub auto_transition: AutoTransition,
}

impl StageController {
    /// Fails only on a malformed show. Visuals missing from the surface
    /// are logged; their image scenes can never be selected.
    pub fn new(show: Show, config: &Config, surface: &dyn VisualSurface) -> Result<Self> {
        show.validate()?;

        let scene = SceneState::new(&show, &config.scene);
        let mut dispatcher = Dispatcher::new(&show, &config.timing);

        for backdrop in &show.backdrops {
            if !surface.has_element(&backdrop.element_id) {
                let trigger = show
                    .palettes
                    .iter()
                    .find(|p| {
                        p.backdrop
                            .and_then(|i| show.backdrops.get(i))
                            .is_some_and(|b| b.element_id == backdrop.element_id)
                    })
                    .map(|p| p.trigger)
                    .unwrap_or_default();
                log::error!(
                    "{}",
                    StageError::MissingVisualElement {
                        element_id: backdrop.element_id.clone(),
                        trigger,
                    }
                );
            }
        }
        for (index, image) in show.image_scenes.iter().enumerate() {
            if !surface.has_element(&image.element_id) {
                log::error!(
                    "{}",
                    StageError::MissingVisualElement {
                        element_id: image.element_id.clone(),
                        trigger: image.trigger,
                    }
                );
                dispatcher.mark_scene_missing(index);
            }
        }

        let auto_transition = AutoTransition::new(&config.auto_transition, &show);

        Ok(Self {
            show,
            scene,
            dispatcher,
            scheduler: Scheduler::new(),
            auto_transition,
        })
    }

    pub fn handle_midi(&mut self, event: &MidiEvent, now: f32, audio_ready: bool) -> SideEffects {
        log::debug!("MIDI {:?} {} = {}", event.kind, event.id, event.value);
        let mut ctx = DispatchContext {
            now,
            audio_ready,
            scheduler: &mut self.scheduler,
        };
        self.dispatcher
            .dispatch(&self.show, &mut self.scene, event, &mut ctx)
    }

    /// Runs scheduled transition halves and the auto-transition timer.
    pub fn tick(&mut self, now: f32, audio_ready: bool) -> SideEffects {
        let mut effects = SideEffects::default();
        for task in self.scheduler.take_due(now) {
            effects.merge(self.dispatcher.run_task(&self.show, &mut self.scene, task));
        }
        if let Some(event) = self.auto_transition.tick(now) {
            effects.merge(self.handle_midi(&event, now, audio_ready));
        }
        effects
    }

    /// One render step. `bins` is only read in audio-reactive mode.
    pub fn frame(&mut self, bins: Option<&[u8]>, viewport: (f32, f32)) -> TextFrame {
        frame::step(&mut self.scene, &self.show, bins, viewport)
    }

    /// Recentres the text unless an image scene is showing.
    pub fn window_resized(&mut self) {
        if !self.scene.mode.is_image() {
            self.scene.reset_position();
        }
    }

    /// Stops background activity before exit.
    pub fn shutdown(&mut self) {
        self.auto_transition.stop();
    }
}
