//! Adaptive peak detection over a sampled signal in a single forward pass.
//!
//! A sample is selected when either:
//! 1. Its X value lies strictly inside one of the configured [`InclusionRange`]s
//!    and it is a strict local maximum. These peaks are taken unconditionally.
//! 2. It stands more than `n_sigma` standard deviations above the mean of a
//!    local window of `2 * window_size + 1` samples and above `high_pass`.
//!    Candidates closer than `coalesce_window` indices to the previous candidate
//!    are merged, keeping the more intense of the two.
//!
//! Samples whose X value exceeds `x_cutoff` are skipped without being
//! removed, so returned indices always refer to the caller's arrays.
//!
//! The method is based upon the moving window statistics described in
//! "Simple Algorithms for Peak Detection in Time-Series" (Palshikar, 2009), and
//! like that method assumes the samples are approximately evenly spaced.
use log::{debug, trace};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arrayops::mean_and_stdev;
use crate::spectrum::SampledSpectrum;

/// An open interval on the X axis inside which every local maximum is reported
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InclusionRange {
    pub low: f64,
    pub high: f64,
}

impl InclusionRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Whether `x` lies strictly between the bounds
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        x > self.low && x < self.high
    }
}

impl From<(f64, f64)> for InclusionRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

/// All the ways peak detection can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PeakDetectorError {
    #[error("The x and y arrays do not match in length ({x} and {y})")]
    XYLengthMismatch { x: usize, y: usize },
    #[error("A window of {window} samples does not fit in {length} samples")]
    WindowTooLarge { window: usize, length: usize },
}

/// The coalescing state carried across the scan.
///
/// Forced inclusions return the tracker to [`PeakTracker::Idle`] so they are
/// never merged with a later statistical candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PeakTracker {
    #[default]
    Idle,
    /// The last accepted statistical peak, its sample `index` and its `slot` in the output
    Pending { index: usize, slot: usize },
}

impl PeakTracker {
    /// Append a forced peak and forget any pending statistical peak
    pub fn offer_forced(&mut self, index: usize, peaks: &mut Vec<usize>) {
        peaks.push(index);
        *self = PeakTracker::Idle;
    }

    /// Offer a statistical candidate, merging it with the pending peak if
    /// it lies within `coalesce_window` samples of it.
    ///
    /// Candidates are expected in ascending index order. An index at or below
    /// the pending one counts as within the window.
    pub fn offer_candidate(
        &mut self,
        index: usize,
        y_array: &[f64],
        coalesce_window: usize,
        peaks: &mut Vec<usize>,
    ) {
        match *self {
            PeakTracker::Pending { index: last, slot }
                if index.saturating_sub(last) < coalesce_window =>
            {
                if y_array[index] > y_array[last] {
                    trace!("Replacing peak {last} with {index}");
                    peaks[slot] = index;
                    *self = PeakTracker::Pending { index, slot };
                } else {
                    trace!("Dropping candidate {index} in favor of {last}");
                }
            }
            _ => {
                trace!("Accepting candidate {index}");
                peaks.push(index);
                *self = PeakTracker::Pending {
                    index,
                    slot: peaks.len() - 1,
                };
            }
        }
    }
}

/// Check if `y_array[index]` is strictly greater than both of its neighbors.
/// The first and last samples never qualify.
#[inline]
pub fn is_local_max(y_array: &[f64], index: usize) -> bool {
    if index > 0 && index + 1 < y_array.len() {
        let y = y_array[index];
        y > y_array[index - 1] && y > y_array[index + 1]
    } else {
        false
    }
}

/// The `2 * half_width + 1` samples centered on `center`, shifted to stay
/// inside `y_array` near either end rather than shrinking.
///
/// The caller must ensure the window fits in `y_array`.
#[inline]
pub fn local_window(y_array: &[f64], center: usize, half_width: usize) -> &[f64] {
    let size = 2 * half_width + 1;
    let start = center
        .saturating_sub(half_width)
        .min(y_array.len() - size);
    &y_array[start..start + size]
}

/// An adaptive peak detector. The fields form a detection profile, and several
/// detectors with different profiles may run at once.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakDetector {
    /// Samples whose X value is above this are never reported
    pub x_cutoff: f64,
    /// The number of samples either side of a point used for local statistics
    pub window_size: usize,
    /// How many local standard deviations above the local mean a candidate must be
    pub n_sigma: f64,
    /// Candidates closer than this many samples are merged
    pub coalesce_window: usize,
    /// The intensity a statistical candidate must exceed
    pub high_pass: f64,
    /// Regions where every local maximum is reported
    pub inclusion_ranges: Vec<InclusionRange>,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            x_cutoff: 25.0,
            window_size: 20,
            n_sigma: 0.5,
            coalesce_window: 9,
            high_pass: 9.0,
            inclusion_ranges: Vec::new(),
        }
    }
}

/// A builder for configuring [`PeakDetector`]
#[derive(Debug, Clone, Default)]
pub struct PeakDetectorBuilder {
    inner: PeakDetector,
}

impl PeakDetectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x_cutoff(&mut self, x_cutoff: f64) -> &mut Self {
        self.inner.x_cutoff = x_cutoff;
        self
    }

    pub fn window_size(&mut self, window_size: usize) -> &mut Self {
        self.inner.window_size = window_size;
        self
    }

    pub fn n_sigma(&mut self, n_sigma: f64) -> &mut Self {
        self.inner.n_sigma = n_sigma;
        self
    }

    pub fn coalesce_window(&mut self, coalesce_window: usize) -> &mut Self {
        self.inner.coalesce_window = coalesce_window;
        self
    }

    pub fn high_pass(&mut self, high_pass: f64) -> &mut Self {
        self.inner.high_pass = high_pass;
        self
    }

    pub fn include_range<R: Into<InclusionRange>>(&mut self, range: R) -> &mut Self {
        self.inner.inclusion_ranges.push(range.into());
        self
    }

    pub fn build(&self) -> PeakDetector {
        self.inner.clone()
    }
}

impl From<PeakDetectorBuilder> for PeakDetector {
    fn from(value: PeakDetectorBuilder) -> Self {
        value.inner
    }
}

impl PeakDetector {
    pub fn new(
        x_cutoff: f64,
        window_size: usize,
        n_sigma: f64,
        coalesce_window: usize,
        high_pass: f64,
        inclusion_ranges: Vec<InclusionRange>,
    ) -> Self {
        Self {
            x_cutoff,
            window_size,
            n_sigma,
            coalesce_window,
            high_pass,
            inclusion_ranges,
        }
    }

    pub fn builder() -> PeakDetectorBuilder {
        PeakDetectorBuilder::new()
    }

    /// The number of samples in each local statistics window
    pub fn window_length(&self) -> usize {
        2 * self.window_size + 1
    }

    fn is_forced(&self, x: f64) -> bool {
        self.inclusion_ranges.iter().any(|r| r.contains(x))
    }

    /// Whether `y_array[index]` passes the local window significance test
    fn is_significant(&self, y_array: &[f64], index: usize) -> bool {
        let y = y_array[index];
        if y <= self.high_pass {
            return false;
        }
        let (mean, stdev) = mean_and_stdev(local_window(y_array, index, self.window_size));
        y - mean > self.n_sigma * stdev
    }

    /// Find peaks in paired `x_array` and `y_array`.
    ///
    /// Returns the selected indices in strictly increasing order.
    pub fn detect_peaks(
        &self,
        x_array: &[f64],
        y_array: &[f64],
    ) -> Result<Vec<usize>, PeakDetectorError> {
        let n = y_array.len();
        if x_array.len() != n {
            return Err(PeakDetectorError::XYLengthMismatch {
                x: x_array.len(),
                y: n,
            });
        }
        let window = self.window_length();
        if window > n {
            return Err(PeakDetectorError::WindowTooLarge { window, length: n });
        }

        let mut peaks = Vec::new();
        let mut tracker = PeakTracker::default();
        let mut n_forced = 0usize;

        for (index, x) in x_array.iter().copied().enumerate() {
            if x > self.x_cutoff {
                continue;
            }

            if self.is_forced(x) && is_local_max(y_array, index) {
                trace!("Forcing local maximum {index} at {x}");
                tracker.offer_forced(index, &mut peaks);
                n_forced += 1;
                continue;
            }

            if self.is_significant(y_array, index) {
                tracker.offer_candidate(index, y_array, self.coalesce_window, &mut peaks);
            }
        }

        debug!(
            "Detected {} peaks ({} forced) in {} samples",
            peaks.len(),
            n_forced,
            n
        );
        Ok(peaks)
    }

    /// Find peaks in a [`SampledSpectrum`]
    pub fn detect_peaks_in(
        &self,
        spectrum: &SampledSpectrum,
    ) -> Result<Vec<usize>, PeakDetectorError> {
        self.detect_peaks(&spectrum.x_array, &spectrum.y_array)
    }
}

/// A convenience function that builds a [`PeakDetector`] from loose parameters
/// and runs it once.
#[allow(clippy::too_many_arguments)]
pub fn find_peaks(
    x_array: &[f64],
    y_array: &[f64],
    x_cutoff: f64,
    window_size: usize,
    n_sigma: f64,
    coalesce_window: usize,
    high_pass: f64,
    inclusion_ranges: &[InclusionRange],
) -> Result<Vec<usize>, PeakDetectorError> {
    PeakDetector::new(
        x_cutoff,
        window_size,
        n_sigma,
        coalesce_window,
        high_pass,
        inclusion_ranges.to_vec(),
    )
    .detect_peaks(x_array, y_array)
}
