//! Channel histograms and normalization interval selection

use super::hue_shift::hue_shift_red;
use crate::models::{PixelBuffer, BYTES_PER_PIXEL};

/// Number of intensity buckets per channel.
pub const NUM_BUCKETS: usize = 256;

/// Per-channel pixel counts at each of 256 intensity levels.
///
/// Invariant: every array sums to the buffer's pixel count.
#[derive(Debug, Clone)]
pub struct ChannelHistograms {
    pub r: [u32; NUM_BUCKETS],
    pub g: [u32; NUM_BUCKETS],
    pub b: [u32; NUM_BUCKETS],
}

impl ChannelHistograms {
    /// Build histograms for a buffer.
    ///
    /// Green and blue bucket by their raw values. Red buckets by the summed
    /// hue-shift rotation of the whole pixel at `hue_shift` degrees, clamped
    /// into 0-255.
    pub fn build(buffer: &PixelBuffer, hue_shift: u32) -> Self {
        let mut hist = Self {
            r: [0; NUM_BUCKETS],
            g: [0; NUM_BUCKETS],
            b: [0; NUM_BUCKETS],
        };

        for pixel in buffer.data.chunks_exact(BYTES_PER_PIXEL) {
            let rotated = hue_shift_red(
                pixel[0] as f64,
                pixel[1] as f64,
                pixel[2] as f64,
                hue_shift as f64,
            );
            let red = (rotated[0] + rotated[1] + rotated[2])
                .clamp(0.0, 255.0)
                .round() as usize;

            hist.r[red] += 1;
            hist.g[pixel[1] as usize] += 1;
            hist.b[pixel[2] as usize] += 1;
        }

        hist
    }
}

/// Intensity range selected to stretch into the full output range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizationInterval {
    pub low: u8,
    pub high: u8,
}

impl Default for NormalizationInterval {
    fn default() -> Self {
        Self { low: 0, high: 255 }
    }
}

/// Pick the normalization interval for one channel histogram.
///
/// Marks every bucket whose count sits below the significance threshold,
/// brackets the marks with 0 and 255, and returns the widest gap between
/// consecutive marks. Falls back to the full 0-255 range when no gap stands
/// out. The result always satisfies `low < high`.
pub(crate) fn normalizing_interval(
    hist: &[u32; NUM_BUCKETS],
    threshold: f64,
) -> NormalizationInterval {
    widest_gap(&normalization_marks(hist, threshold))
}

/// Bucket indices whose counts fall under the threshold, bracketed by 0 and 255.
fn normalization_marks(hist: &[u32; NUM_BUCKETS], threshold: f64) -> Vec<u16> {
    let mut marks = Vec::with_capacity(NUM_BUCKETS + 2);
    marks.push(0);
    for (i, &count) in hist.iter().enumerate() {
        if (count as f64) - threshold < 2.0 {
            marks.push(i as u16);
        }
    }
    marks.push(255);
    marks
}

/// Widest gap between consecutive marks; the first maximum wins.
fn widest_gap(marks: &[u16]) -> NormalizationInterval {
    let mut interval = NormalizationInterval::default();
    let mut max_dist = 0u16;

    for pair in marks.windows(2) {
        let dist = pair[1] - pair[0];
        if dist > max_dist {
            max_dist = dist;
            interval = NormalizationInterval {
                low: pair[0] as u8,
                high: pair[1] as u8,
            };
        }
    }

    interval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_spike_yields_interval_around_it() {
        let mut hist = [0u32; NUM_BUCKETS];
        hist[128] = 4;

        // Threshold well under the spike: every bucket except 128 is marked,
        // so the widest gap straddles the spike.
        let interval = normalizing_interval(&hist, 0.002);
        assert_eq!(interval, NormalizationInterval { low: 127, high: 129 });
    }

    #[test]
    fn flat_histogram_defaults_to_full_range() {
        // Every bucket over the threshold: marks collapse to [0, 255] and the
        // only gap is the full range.
        let hist = [100u32; NUM_BUCKETS];
        let interval = normalizing_interval(&hist, 10_000.0 / 2000.0);
        // threshold 5, counts 100: nothing marked besides the brackets
        assert_eq!(interval, NormalizationInterval { low: 0, high: 255 });
    }

    #[test]
    fn interval_always_valid() {
        // Spike at the extreme ends must still produce low < high.
        for spike in [0usize, 1, 254, 255] {
            let mut hist = [0u32; NUM_BUCKETS];
            hist[spike] = 1000;
            let interval = normalizing_interval(&hist, 0.5);
            assert!(
                interval.low < interval.high,
                "invalid interval {:?} for spike at {}",
                interval,
                spike
            );
        }
    }

    #[test]
    fn first_widest_gap_wins_on_ties() {
        let interval = widest_gap(&[0, 10, 100, 190, 255]);
        // Gaps: 10, 90, 90, 65 - the first 90 is chosen.
        assert_eq!(interval, NormalizationInterval { low: 10, high: 100 });
    }
}
