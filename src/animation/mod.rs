pub mod auto_transition;
pub mod axis_mapper;

pub use auto_transition::AutoTransition;
pub use axis_mapper::{band_energy, map_axis, map_energy, wave_fraction, Band};
