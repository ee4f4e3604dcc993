//! Easing and interpolation helpers for time-based transitions.

/// Cubic ease-in-out: slow start, fast middle, slow finish.
/// t is clamped to [0, 1]
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Linear interpolation for f32. Exact at both endpoints.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Raw (un-eased) progress of a transition at `now_ms`, clamped to [0, 1].
///
/// A zero or negative duration counts as already finished.
#[inline]
pub fn progress(start_ms: f64, duration_ms: f64, now_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    ((now_ms - start_ms) / duration_ms).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ease_is_symmetric() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let a = ease_in_out_cubic(t);
            let b = 1.0 - ease_in_out_cubic(1.0 - t);
            assert!((a - b).abs() < 1e-5, "asymmetric at {t}");
        }
    }

    #[test]
    fn ease_clamps_out_of_range() {
        assert_eq!(ease_in_out_cubic(-1.0), 0.0);
        assert_eq!(ease_in_out_cubic(2.0), 1.0);
    }

    #[test]
    fn lerp_hits_endpoints_exactly() {
        assert_eq!(lerp_f32(0.37, 0.18, 0.0), 0.37);
        assert_eq!(lerp_f32(0.37, 0.18, 1.0), 0.18);
        assert_eq!(lerp_f32(-400.0, 260.0, 0.5), -70.0);
    }

    #[test]
    fn progress_clamps() {
        assert_eq!(progress(100.0, 200.0, 50.0), 0.0);
        assert_eq!(progress(100.0, 200.0, 200.0), 0.5);
        assert_eq!(progress(100.0, 200.0, 900.0), 1.0);
        assert_eq!(progress(100.0, 0.0, 100.0), 1.0);
    }
}
