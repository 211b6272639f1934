// src/animation/auto_transition.rs
//
// Keeps the installation moving when nobody is playing: every interval a
// random text set, palette or font pad is "pressed".

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::AutoTransitionConfig;
use crate::controllers::midi::MidiEvent;
use crate::models::Show;

const AUTO_VELOCITY: u8 = 100;

pub struct AutoTransition {
    interval: f32,
    next_due: Option<f32>,
    rng: StdRng,
    triggers: Vec<u8>,
}

impl AutoTransition {
    pub fn new(config: &AutoTransitionConfig, show: &Show) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let triggers = show
            .text_sets
            .iter()
            .map(|s| s.trigger)
            .chain(show.palettes.iter().map(|p| p.trigger))
            .chain(show.fonts.iter().map(|f| f.trigger))
            .collect();

        Self {
            interval: config.interval_seconds.max(0.1),
            next_due: None,
            rng,
            triggers,
        }
    }

    pub fn start(&mut self, now: f32) {
        if self.next_due.is_none() {
            log::info!("Auto transition started ({}s)", self.interval);
        }
        self.next_due = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        if self.next_due.take().is_some() {
            log::info!("Auto transition stopped");
        }
    }

    pub fn toggle(&mut self, now: f32) {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// The synthetic note to dispatch when the interval has elapsed.
    pub fn tick(&mut self, now: f32) -> Option<MidiEvent> {
        let due = self.next_due?;
        if now < due {
            return None;
        }
        self.next_due = Some(now + self.interval);

        let note = *self.triggers.choose(&mut self.rng)?;
        log::debug!("Auto transition fires note {}", note);
        Some(MidiEvent::note_on(note, AUTO_VELOCITY))
    }
}
