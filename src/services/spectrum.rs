// src/services/spectrum.rs
//
// Byte frequency spectrum in the shape browsers' analyser nodes produce:
// Hann window, |X|/N, temporal smoothing, dB range squeezed into 0..255.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

pub const MIN_DECIBELS: f32 = -100.0;
pub const MAX_DECIBELS: f32 = -30.0;
/// Smallest transform that still yields 128 bins
pub const MIN_FFT_SIZE: usize = 256;

pub struct Spectrum {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
    smoothing: f32,
}

impl Spectrum {
    pub fn new(fft_size: usize, smoothing: f32) -> Self {
        let fft_size = fft_size.max(MIN_FFT_SIZE).next_power_of_two();
        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        let window = (0..fft_size)
            .map(|i| {
                let t = i as f32 / fft_size as f32;
                0.5 * (1.0 - (std::f32::consts::TAU * t).cos())
            })
            .collect();

        Self {
            fft,
            fft_size,
            window,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
            bytes: vec![0; fft_size / 2],
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Analyses the most recent `fft_size` samples (zero-padded in front
    /// when fewer are given) and returns the byte bins.
    pub fn analyse(&mut self, samples: &[f32]) -> &[u8] {
        let n = self.fft_size;
        let tail = &samples[samples.len().saturating_sub(n)..];
        let pad = n - tail.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { tail[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let scale = 1.0 / n as f32;
        let range = MAX_DECIBELS - MIN_DECIBELS;
        for (i, byte) in self.bytes.iter_mut().enumerate() {
            let magnitude = self.buffer[i].norm() * scale;
            let smoothed = self.smoothing * self.smoothed[i] + (1.0 - self.smoothing) * magnitude;
            self.smoothed[i] = smoothed;

            let db = if smoothed > 0.0 {
                20.0 * smoothed.log10()
            } else {
                f32::NEG_INFINITY
            };
            *byte = ((db - MIN_DECIBELS) / range * 255.0).clamp(0.0, 255.0) as u8;
        }
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(bin: usize, n: usize, amplitude: f32) -> Vec<f32> {
        (0..n)
            .map(|i| amplitude * (std::f32::consts::TAU * bin as f32 * i as f32 / n as f32).sin())
            .collect()
    }

    #[test]
    fn test_silence_is_zero() {
        let mut spectrum = Spectrum::new(256, 0.8);
        let bins = spectrum.analyse(&[0.0; 256]);
        assert_eq!(bins.len(), 128);
        assert!(bins.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sine_peaks_in_its_bin() {
        let mut spectrum = Spectrum::new(256, 0.0);
        let bins = spectrum.analyse(&sine(20, 256, 1.0)).to_vec();
        assert_eq!(bins[20], 255);
        assert!(bins[19] > 0);
        assert_eq!(bins[100], 0);
        assert_eq!(bins[0], 0);
    }

    #[test]
    fn test_smoothing_rises_gradually() {
        let quiet = sine(10, 256, 0.001);
        let mut spectrum = Spectrum::new(256, 0.8);
        let first = spectrum.analyse(&quiet)[10];
        let second = spectrum.analyse(&quiet)[10];
        let third = spectrum.analyse(&quiet)[10];
        assert!(first < second && second < third, "{first} {second} {third}");
    }

    #[test]
    fn test_fft_size_sanitised() {
        let tests = vec![(0, 256), (100, 256), (256, 256), (300, 512), (1024, 1024)];
        for (requested, expected) in tests {
            let spectrum = Spectrum::new(requested, 0.8);
            assert_eq!(spectrum.fft_size(), expected, "Failed for {}", requested);
        }
    }

    #[test]
    fn test_short_input_is_padded() {
        let mut spectrum = Spectrum::new(256, 0.0);
        assert_eq!(spectrum.analyse(&[0.5; 10]).len(), 128);
    }
}
