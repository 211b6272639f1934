// src/animation/axis_mapper.rs
//
// Maps animation inputs onto variable-font axis values

use crate::models::{BandEnergy, FontAxisSpec};
use crate::utilities::easing::lerp;

/// Column and row contributions to the per-character wave offset.
const WAVE_COL_STEP: f32 = 0.7;
const WAVE_ROW_STEP: f32 = 0.5;

/// Fraction of the spectrum, from the bottom, averaged into the low band.
const LOW_BAND_FRACTION: f32 = 0.1;
/// Fraction of the spectrum, from the top, averaged into the high band.
const HIGH_BAND_FRACTION: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    High,
}

/// Axis value for a wave fraction `phase` in [0, 1]. Axes using the global
/// range are narrowed to the controlled sub-range first; swapped bounds
/// are tolerated.
pub fn map_axis(spec: &FontAxisSpec, phase: f32, global_range: (f32, f32)) -> f32 {
    let (mut lo, mut hi) = if spec.use_global_range {
        let range = spec.max - spec.min;
        (
            spec.min + global_range.0 * range,
            spec.min + global_range.1 * range,
        )
    } else {
        (spec.min, spec.max)
    };
    if lo > hi {
        std::mem::swap(&mut lo, &mut hi);
    }
    lerp(lo, hi, phase.clamp(0.0, 1.0))
}

/// The ripple: each character sits at its own point of the sine wave.
pub fn wave_fraction(phase: f32, row: usize, col: usize) -> f32 {
    ((phase + col as f32 * WAVE_COL_STEP + row as f32 * WAVE_ROW_STEP).sin() + 1.0) / 2.0
}

/// Axis value driven by a 0-255 energy reading; ignores the global range.
pub fn map_energy(spec: &FontAxisSpec, energy: f32) -> f32 {
    lerp(spec.min, spec.max, (energy / 255.0).clamp(0.0, 1.0))
}

/// Which band drives an axis. Fixed by tag.
pub fn band_for_tag(tag: &str) -> Option<Band> {
    match tag {
        "wght" => Some(Band::Low),
        "opsz" | "wdth" => Some(Band::High),
        _ => None,
    }
}

impl BandEnergy {
    pub fn get(&self, band: Band) -> f32 {
        match band {
            Band::Low => self.low,
            Band::High => self.high,
        }
    }
}

/// Low band = mean of the bottom tenth of the bins, high band = mean of
/// the top half.
pub fn band_energy(bins: &[u8]) -> BandEnergy {
    if bins.is_empty() {
        return BandEnergy::default();
    }
    let n = bins.len();
    let low_end = ((n as f32 * LOW_BAND_FRACTION) as usize).max(1);
    let high_start = ((n as f32 * (1.0 - HIGH_BAND_FRACTION)) as usize).min(n - 1);

    BandEnergy {
        low: mean(&bins[..low_end]),
        high: mean(&bins[high_start..]),
    }
}

fn mean(bins: &[u8]) -> f32 {
    bins.iter().map(|&b| b as f32).sum::<f32>() / bins.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(min: f32, max: f32, use_global_range: bool) -> FontAxisSpec {
        FontAxisSpec {
            tag: "wght".into(),
            min,
            max,
            use_global_range,
        }
    }

    #[test]
    fn test_map_axis_endpoints() {
        let spec = axis(100.0, 900.0, true);
        assert_eq!(map_axis(&spec, 0.0, (0.0, 1.0)), 100.0);
        assert_eq!(map_axis(&spec, 1.0, (0.0, 1.0)), 900.0);
        assert_eq!(map_axis(&spec, 0.5, (0.0, 1.0)), 500.0);
        // narrowed to the middle half
        assert_eq!(map_axis(&spec, 0.0, (0.25, 0.75)), 300.0);
        assert_eq!(map_axis(&spec, 1.0, (0.25, 0.75)), 700.0);
    }

    #[test]
    fn test_map_axis_ignores_global_range_when_disabled() {
        let spec = axis(20.0, 100.0, false);
        assert_eq!(map_axis(&spec, 1.0, (0.0, 0.1)), 100.0);
    }

    #[test]
    fn test_map_axis_stays_in_range_with_swapped_bounds() {
        let spec = axis(80.0, 150.0, true);
        let ranges = [(0.9, 0.1), (1.0, 0.0), (0.3, 0.3), (0.0, 1.0), (0.6, 0.2)];
        for range in ranges {
            for step in 0..=20 {
                let phase = step as f32 / 20.0;
                let value = map_axis(&spec, phase, range);
                assert!(
                    (80.0..=150.0).contains(&value),
                    "Failed for phase {} range {:?}: {}",
                    phase,
                    range,
                    value
                );
            }
        }
        // swapped bounds interpolate from the smaller end
        assert!((map_axis(&spec, 0.0, (0.9, 0.1)) - 87.0).abs() < 1e-4);
    }

    #[test]
    fn test_wave_fraction_in_unit_range() {
        for row in 0..4 {
            for col in 0..12 {
                let f = wave_fraction(1.3, row, col);
                assert!((0.0..=1.0).contains(&f));
            }
        }
        assert!((wave_fraction(0.0, 0, 0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_map_energy_clamped() {
        let spec = axis(100.0, 900.0, true);
        assert_eq!(map_energy(&spec, 0.0), 100.0);
        assert_eq!(map_energy(&spec, 255.0), 900.0);
        assert_eq!(map_energy(&spec, 400.0), 900.0);
        assert_eq!(map_energy(&spec, -3.0), 100.0);
    }

    #[test]
    fn test_band_assignment() {
        assert_eq!(band_for_tag("wght"), Some(Band::Low));
        assert_eq!(band_for_tag("opsz"), Some(Band::High));
        assert_eq!(band_for_tag("wdth"), Some(Band::High));
        assert_eq!(band_for_tag("slnt"), None);
    }

    #[test]
    fn test_band_energy() {
        let mut bins = vec![0u8; 128];
        for b in bins.iter_mut().take(12) {
            *b = 200;
        }
        for b in bins.iter_mut().skip(64) {
            *b = 50;
        }
        let energy = band_energy(&bins);
        assert_eq!(energy.low, 200.0);
        assert_eq!(energy.high, 50.0);
        assert_eq!(band_energy(&[]), BandEnergy::default());
    }
}
