pub mod dispatcher;
pub mod midi;
pub mod routes;
pub mod stage_controller;

pub use dispatcher::{Dispatcher, SideEffects};
pub use midi::{MidiController, MidiEvent, MidiEventKind};
pub use stage_controller::StageController;
