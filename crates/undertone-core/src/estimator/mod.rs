//! Histogram-based filter estimation
//!
//! Derives a color-correction filter from image statistics: the mean color is
//! hue-shifted until the red content reaches a minimum target, per-channel
//! histograms are scanned for the widest underpopulated interval, and that
//! interval is stretched to the full output range.

mod histogram;
mod hue_shift;


pub use histogram::{ChannelHistograms, NormalizationInterval};

use crate::config::EstimatorConfig;
use crate::models::{ChannelCoefficients, FilterDescriptor, PixelBuffer, BYTES_PER_PIXEL};
use histogram::normalizing_interval;
use hue_shift::{find_hue_shift, hue_shift_red};

/// Estimate a color-correction filter for a pixel buffer.
///
/// Deterministic and side-effect free: the same buffer and config always
/// produce a bit-identical descriptor.
pub fn estimate_filter(
    buffer: &PixelBuffer,
    config: &EstimatorConfig,
) -> Result<FilterDescriptor, String> {
    let pixel_count = buffer.pixel_count();
    if pixel_count == 0 {
        return Err("Cannot estimate a filter for an image with no pixels".to_string());
    }

    let mean = mean_color(buffer);
    let shift = find_hue_shift(mean, config);
    log::debug!(
        "Mean color [{:.2}, {:.2}, {:.2}], converged hue shift {} deg",
        mean[0],
        mean[1],
        mean[2],
        shift
    );

    let hist = ChannelHistograms::build(buffer, shift);
    let threshold = pixel_count as f64 / config.threshold_ratio;

    let red = normalizing_interval(&hist.r, threshold);
    let green = normalizing_interval(&hist.g, threshold);
    let blue = normalizing_interval(&hist.b, threshold);
    log::debug!(
        "Normalization intervals r={:?} g={:?} b={:?} (threshold {:.3})",
        red,
        green,
        blue,
        threshold
    );

    let (red_gain, red_offset) = interval_gain_offset(red);
    let (green_gain, green_offset) = interval_gain_offset(green);
    let (blue_gain, blue_offset) = interval_gain_offset(blue);

    // The red output mixes all three input channels through the converged
    // hue-shift rotation of the unit vector.
    let mix = hue_shift_red(1.0, 1.0, 1.0, shift as f64);

    Ok(FilterDescriptor {
        red: ChannelCoefficients {
            r: mix[0] * red_gain,
            g: mix[1] * red_gain,
            b: mix[2] * red_gain * config.blue_mix_multiplier,
            a: 0.0,
            offset: red_offset,
        },
        green: ChannelCoefficients {
            r: 0.0,
            g: green_gain,
            b: 0.0,
            a: 0.0,
            offset: green_offset,
        },
        blue: ChannelCoefficients {
            r: 0.0,
            g: 0.0,
            b: blue_gain,
            a: 0.0,
            offset: blue_offset,
        },
        alpha: ChannelCoefficients {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
            offset: 0.0,
        },
    })
}

/// Gain stretching the interval to the full 0-255 range, plus the matching
/// offset (expressed as a fraction of 255, like the descriptor stores it).
fn interval_gain_offset(interval: NormalizationInterval) -> (f64, f64) {
    let gain = 256.0 / (interval.high as f64 - interval.low as f64);
    let offset = (-(interval.low as f64) / 256.0) * gain;
    (gain, offset)
}

/// Mean R, G, B across all pixels.
///
/// Summation stays sequential so the result is bit-stable run to run.
fn mean_color(buffer: &PixelBuffer) -> [f64; 3] {
    let mut sums = [0.0f64; 3];
    for pixel in buffer.data.chunks_exact(BYTES_PER_PIXEL) {
        sums[0] += pixel[0] as f64;
        sums[1] += pixel[1] as f64;
        sums[2] += pixel[2] as f64;
    }

    let count = buffer.pixel_count() as f64;
    [sums[0] / count, sums[1] / count, sums[2] / count]
}
