//src/utilities/easing.rs

// interpolation helpers shared by the dispatcher, the axis mapper
// and the renderer

pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Linear remap without clamping.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if in_max == in_min {
        return out_min;
    }
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

/// Remap of a 7-bit MIDI value onto `[out_min, out_max]`.
pub fn map_midi(value: u8, out_min: f32, out_max: f32) -> f32 {
    map_range(value as f32, 0.0, 127.0, out_min, out_max)
}

/// Moves `current` towards `target`, covering the distance in roughly
/// `duration` seconds. Stands in for a CSS opacity transition.
pub fn ease_towards(current: f32, target: f32, dt: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return target;
    }
    let step = dt / duration;
    if (target - current).abs() <= step {
        target
    } else {
        current + step.copysign(target - current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_midi_bounds() {
        assert_eq!(map_midi(0, 10.0, 300.0), 10.0);
        assert_eq!(map_midi(127, 10.0, 300.0), 300.0);
        assert!((map_midi(64, 0.0, 127.0) - 64.0).abs() < 1e-4);
    }

    #[test]
    fn test_ease_towards_reaches_target() {
        let mut opacity = 1.0;
        for _ in 0..20 {
            opacity = ease_towards(opacity, 0.0, 1.0 / 60.0, 0.3);
        }
        assert_eq!(opacity, 0.0);
        assert_eq!(ease_towards(0.2, 0.8, 0.1, 0.0), 0.8);
        assert!((ease_towards(0.0, 1.0, 0.1, 1.0) - 0.1).abs() < 1e-6);
    }
}
