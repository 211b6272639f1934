// src/services/audio_service.rs
//
// Microphone capture. cpal pushes samples from its own thread into a
// shared ring; the frame loop pulls a spectrum from it once per frame.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::spectrum::Spectrum;
use crate::config::AudioConfig;
use crate::error::{Result, StageError};

/// Anything that can hand the render step a byte spectrum.
pub trait AudioInput {
    fn is_ready(&self) -> bool;
    /// `None` until the input is ready.
    fn frequency_bins(&mut self) -> Option<&[u8]>;
}

type SampleRing = Arc<Mutex<VecDeque<f32>>>;

pub struct AudioService {
    stream: Option<cpal::Stream>,
    samples: SampleRing,
    scratch: Vec<f32>,
    spectrum: Spectrum,
    status: String,
}

impl AudioService {
    /// Opens the default input device. Failure leaves the service not
    /// ready; the audio toggle then does nothing.
    pub fn new(config: &AudioConfig) -> Self {
        if !config.enabled {
            return Self::disabled(config, "audio disabled in config");
        }

        let samples: SampleRing = Arc::new(Mutex::new(VecDeque::new()));
        let spectrum = Spectrum::new(config.fft_size, config.smoothing);

        match open_input(samples.clone(), spectrum.fft_size()) {
            Ok((stream, name)) => {
                log::info!("Audio input ready: {}", name);
                Self {
                    stream: Some(stream),
                    samples,
                    scratch: Vec::with_capacity(spectrum.fft_size()),
                    spectrum,
                    status: format!("Audio: {}", name),
                }
            }
            Err(e) => {
                log::warn!("Audio input unavailable, audio mode disabled: {}", e);
                Self::disabled(config, &e.to_string())
            }
        }
    }

    pub fn disabled(config: &AudioConfig, reason: &str) -> Self {
        Self {
            stream: None,
            samples: Arc::new(Mutex::new(VecDeque::new())),
            scratch: Vec::new(),
            spectrum: Spectrum::new(config.fft_size, config.smoothing),
            status: reason.to_string(),
        }
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }
}

impl AudioInput for AudioService {
    fn is_ready(&self) -> bool {
        self.stream.is_some()
    }

    fn frequency_bins(&mut self) -> Option<&[u8]> {
        self.stream.as_ref()?;
        self.scratch.clear();
        match self.samples.lock() {
            Ok(ring) => self.scratch.extend(ring.iter().copied()),
            Err(_) => {
                log::error!("Audio sample buffer poisoned");
                return None;
            }
        }
        Some(self.spectrum.analyse(&self.scratch))
    }
}

fn open_input(samples: SampleRing, capacity: usize) -> Result<(cpal::Stream, String)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| StageError::DeviceUnavailable("no default input device".into()))?;
    let name = device.name().unwrap_or_else(|_| "<unknown>".to_string());

    let supported = device
        .default_input_config()
        .map_err(|e| StageError::DeviceUnavailable(format!("input config: {e}")))?;
    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let channels = config.channels as usize;

    let on_error = |e: cpal::StreamError| log::error!("Audio stream error: {}", e);

    let stream = match sample_format {
        cpal::SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                push_frames(&samples, data.iter().copied(), channels, capacity)
            },
            on_error,
            None,
        ),
        cpal::SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let converted = data.iter().map(|&s| s as f32 / i16::MAX as f32);
                push_frames(&samples, converted, channels, capacity)
            },
            on_error,
            None,
        ),
        other => {
            return Err(StageError::DeviceUnavailable(format!(
                "unsupported sample format {other:?}"
            )))
        }
    }
    .map_err(|e| StageError::DeviceUnavailable(format!("input stream: {e}")))?;

    stream
        .play()
        .map_err(|e| StageError::DeviceUnavailable(format!("start input: {e}")))?;

    Ok((stream, name))
}

/// Keeps the first channel of each frame, dropping the oldest samples
/// beyond `capacity`.
fn push_frames(
    samples: &SampleRing,
    data: impl Iterator<Item = f32>,
    channels: usize,
    capacity: usize,
) {
    let Ok(mut ring) = samples.lock() else {
        return;
    };
    ring.extend(data.step_by(channels.max(1)));
    let excess = ring.len().saturating_sub(capacity);
    ring.drain(..excess);
}
