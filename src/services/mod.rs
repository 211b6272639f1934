pub mod audio_service;
pub mod scheduler;
pub mod spectrum;

pub use audio_service::{AudioInput, AudioService};
pub use scheduler::Scheduler;
pub use spectrum::Spectrum;
