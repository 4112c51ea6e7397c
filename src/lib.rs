//! `vibspectra` turns discrete vibrational line data into continuous spectra
//! and picks out the peaks an analyst would annotate.
//!
//! Broadening is done by [`SpectralConvolver`], which sums a [`LineShape`] such as
//! [`Lorentzian`] over every line at each point of an evenly spaced grid. Peak
//! detection is done by [`PeakDetector`], which combines forced inclusion regions
//! with a moving window significance test and merges nearby candidates. See its
//! documentation for the thresholds that can be tuned.
//!
//! # Usage
//! ```
//! use vibspectra::{Lorentzian, PeakDetector, SpectralConvolver, SpectralLine};
//!
//! let lines = vec![
//!     SpectralLine::new(1000.0, 40.0),
//!     SpectralLine::new(1600.0, 60.0),
//! ];
//! let spectrum = SpectralConvolver::new(400.0, 4000.0, 1801, 10.0)
//!     .broaden(&lines, &Lorentzian)
//!     .unwrap();
//! assert_eq!(spectrum.len(), 1801);
//!
//! let detector = PeakDetector {
//!     x_cutoff: 5000.0,
//!     ..PeakDetector::default()
//! };
//! let peaks = detector.detect_peaks_in(&spectrum).unwrap();
//! for (x, y) in spectrum.points_at(&peaks) {
//!     println!("{x}\t{y}");
//! }
//! assert_eq!(peaks.len(), 2);
//! ```
pub mod arrayops;
pub mod convolve;
pub mod line;
pub mod lineshape;
pub mod peak_detector;
pub mod prelude;
pub mod spectrum;

pub use crate::convolve::{
    broaden_spectrum, ConvolutionError, SpectralConvolver, SpectralConvolverBuilder,
};
pub use crate::line::SpectralLine;
pub use crate::lineshape::{Delta, Gaussian, LineShape, LineShapeKind, Lorentzian};
pub use crate::peak_detector::{
    find_peaks, InclusionRange, PeakDetector, PeakDetectorBuilder, PeakDetectorError,
};
pub use crate::spectrum::{SampledSpectrum, SpectrumError};
