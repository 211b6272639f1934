// src/error.rs
//
// Failures that are reported and degraded, never fatal

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageError {
    /// No MIDI backend, no input port, no microphone
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A show entry points at an element the visual surface does not have
    #[error("visual element #{element_id} not found (trigger {trigger})")]
    MissingVisualElement { element_id: String, trigger: u8 },

    #[error("invalid show: {0}")]
    InvalidShow(String),

    #[error("config io error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, StageError>;
