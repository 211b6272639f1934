// src/config/config_types.rs
//
// Config types for the app. Every field has a default so a partial or
// missing config.toml still starts the installation.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "typoscape".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MidiConfig {
    pub client_name: String,
    /// Connect to the first port whose name contains this; first port otherwise
    pub port_filter: Option<String>,
    /// Seconds between checks of the port list
    pub port_poll_interval: f32,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            client_name: "typoscape".to_string(),
            port_filter: None,
            port_poll_interval: 2.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub fft_size: usize, // power of two, bins = fft_size / 2
    pub smoothing: f32,  // 0.0-1.0, weight of the previous frame
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fft_size: 256,
            smoothing: 0.8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SceneConfig {
    pub font_size: f32,
    pub line_height: f32,
    pub wave_speed: f32,
    pub opacity: f32,
    pub rotation_midi: u8,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            font_size: 90.0,
            line_height: 1.2,
            wave_speed: 0.03,
            opacity: 1.0,
            rotation_midi: 64,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimingConfig {
    pub text_fade_seconds: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            text_fade_seconds: 0.3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AutoTransitionConfig {
    pub enabled: bool,
    pub interval_seconds: f32,
    pub seed: Option<u64>,
}

impl Default for AutoTransitionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: 8.0,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PathConfig {
    pub assets_directory: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            assets_directory: "assets".to_string(),
        }
    }
}
