//! Hue-shift rotation of RGB mixing weights

use crate::config::EstimatorConfig;

/// Rotate an RGB triple by `angle` degrees.
///
/// The coefficients are the luma-preserving red-rotation weights the filter
/// was calibrated with.
pub(crate) fn hue_shift_red(r: f64, g: f64, b: f64, angle: f64) -> [f64; 3] {
    let radians = angle * std::f64::consts::PI / 180.0;
    let u = radians.cos();
    let w = radians.sin();

    [
        (0.299 + 0.701 * u + 0.168 * w) * r,
        (0.587 - 0.587 * u + 0.330 * w) * g,
        (0.114 - 0.114 * u - 0.497 * w) * b,
    ]
}

/// Search for the hue shift lifting the rotated mean's component sum to
/// `min_avg_red`.
///
/// Advances one degree per iteration. Past `max_hue_shift` the target is
/// treated as reached and the shift clamps to the bound; the search never
/// fails and runs at most `max_hue_shift + 1` iterations.
pub(crate) fn find_hue_shift(mean: [f64; 3], config: &EstimatorConfig) -> u32 {
    let mut shift = 0u32;
    let mut shifted_sum = mean[0];

    while shifted_sum < config.min_avg_red && shift <= config.max_hue_shift {
        let rotated = hue_shift_red(mean[0], mean[1], mean[2], shift as f64);
        shifted_sum = rotated[0] + rotated[1] + rotated[2];
        shift += 1;
    }

    shift.min(config.max_hue_shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_angle_is_the_identity_rotation() {
        let [r, g, b] = hue_shift_red(100.0, 50.0, 25.0, 0.0);
        // cos(0)=1, sin(0)=0 collapses the weights to (1, 0, 0)
        assert!((r - 100.0).abs() < 1e-9, "expected r=100, got {}", r);
        assert!(g.abs() < 1e-9, "expected g=0, got {}", g);
        assert!(b.abs() < 1e-9, "expected b=0, got {}", b);
    }

    #[test]
    fn search_skips_when_mean_red_already_high() {
        let config = EstimatorConfig::default();
        assert_eq!(find_hue_shift([128.0, 128.0, 128.0], &config), 0);
        assert_eq!(find_hue_shift([60.0, 0.0, 0.0], &config), 0);
    }

    #[test]
    fn search_clamps_at_the_bound_for_black() {
        let config = EstimatorConfig::default();
        // A zero mean can never reach the target; the shift clamps.
        assert_eq!(find_hue_shift([0.0, 0.0, 0.0], &config), config.max_hue_shift);
    }

    #[test]
    fn search_converges_within_bound_for_blue_cast() {
        let config = EstimatorConfig::default();
        let shift = find_hue_shift([20.0, 90.0, 120.0], &config);
        assert!(shift >= 1, "a red-starved mean must shift at least once");
        assert!(
            shift <= config.max_hue_shift,
            "shift {} exceeds bound {}",
            shift,
            config.max_hue_shift
        );
    }
}
