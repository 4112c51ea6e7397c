//! Broaden a discrete line list into a densely sampled spectrum.
//!
//! Each grid point receives the sum of a [`LineShape`] evaluated for every
//! line. Grid points are independent of one another, so with the `parallelism`
//! feature enabled the outer loop is spread across a `rayon` thread pool.
use log::debug;
use thiserror::Error;

#[cfg(feature = "parallelism")]
use rayon::prelude::*;

use crate::arrayops::{linspace, snap_to_noise_floor};
use crate::line::SpectralLine;
use crate::lineshape::LineShape;
use crate::spectrum::SampledSpectrum;

/// All the ways broadening can fail
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConvolutionError {
    #[error("The lineshape width must be positive and finite, received {0}")]
    InvalidWidth(f64),
    #[error("At least two grid points are required, received {0}")]
    TooFewPoints(usize),
    #[error("The grid bounds {start} and {end} do not describe a non-empty finite interval")]
    EmptyInterval { start: f64, end: f64 },
}

/// Broadening parameters: the sampling grid and the lineshape width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralConvolver {
    /// The first X value of the grid
    pub start: f64,
    /// The last X value of the grid
    pub end: f64,
    /// The number of grid points, including both ends
    pub numpts: usize,
    /// The width parameter passed to the lineshape, the FWHM for continuous shapes
    pub width: f64,
}

impl Default for SpectralConvolver {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 4000.0,
            numpts: 500,
            width: 10.0,
        }
    }
}

/// A builder for configuring [`SpectralConvolver`]
#[derive(Debug, Clone, Default)]
pub struct SpectralConvolverBuilder {
    inner: SpectralConvolver,
}

impl SpectralConvolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, start: f64) -> &mut Self {
        self.inner.start = start;
        self
    }

    pub fn end(&mut self, end: f64) -> &mut Self {
        self.inner.end = end;
        self
    }

    pub fn numpts(&mut self, numpts: usize) -> &mut Self {
        self.inner.numpts = numpts;
        self
    }

    pub fn width(&mut self, width: f64) -> &mut Self {
        self.inner.width = width;
        self
    }

    pub fn build(&self) -> SpectralConvolver {
        self.inner
    }
}

impl From<SpectralConvolverBuilder> for SpectralConvolver {
    fn from(value: SpectralConvolverBuilder) -> Self {
        value.build()
    }
}

impl SpectralConvolver {
    pub fn new(start: f64, end: f64, numpts: usize, width: f64) -> Self {
        Self {
            start,
            end,
            numpts,
            width,
        }
    }

    pub fn builder() -> SpectralConvolverBuilder {
        SpectralConvolverBuilder::new()
    }

    /// The distance between consecutive grid points
    pub fn step(&self) -> f64 {
        (self.end - self.start) / (self.numpts.saturating_sub(1).max(1)) as f64
    }

    /// Check the grid and width without doing any work
    pub fn validate(&self) -> Result<(), ConvolutionError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ConvolutionError::InvalidWidth(self.width));
        }
        if self.numpts < 2 {
            return Err(ConvolutionError::TooFewPoints(self.numpts));
        }
        if !(self.start.is_finite() && self.end.is_finite()) || self.start == self.end {
            return Err(ConvolutionError::EmptyInterval {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Broaden `lines` with `shape` over this grid, returning a new spectrum
    pub fn broaden<S: LineShape>(
        &self,
        lines: &[SpectralLine],
        shape: &S,
    ) -> Result<SampledSpectrum, ConvolutionError> {
        let mut spectrum = SampledSpectrum::default();
        self.broaden_into(lines, shape, &mut spectrum)?;
        Ok(spectrum)
    }

    /// Broaden `lines` with `shape` into `spectrum`, replacing its contents but
    /// reusing its allocations.
    pub fn broaden_into<S: LineShape>(
        &self,
        lines: &[SpectralLine],
        shape: &S,
        spectrum: &mut SampledSpectrum,
    ) -> Result<(), ConvolutionError> {
        self.validate()?;
        debug!(
            "Broadening {} lines over {} points from {} to {} with width {}",
            lines.len(),
            self.numpts,
            self.start,
            self.end,
            self.width
        );

        spectrum.x_array.clear();
        spectrum.x_array.extend(linspace(self.start, self.end, self.numpts));
        spectrum.y_array.clear();
        spectrum.y_array.resize(self.numpts, 0.0);

        sum_contributions(
            &spectrum.x_array,
            &mut spectrum.y_array,
            lines,
            shape,
            self.width,
        );
        snap_to_noise_floor(&mut spectrum.y_array);
        Ok(())
    }
}

#[inline]
fn contribution_at<S: LineShape>(x: f64, lines: &[SpectralLine], shape: &S, width: f64) -> f64 {
    lines.iter().fold(0.0, |acc, line| {
        acc + shape.evaluate(x, line.position, line.intensity, width)
    })
}

// Can't inline cfg-if
cfg_if::cfg_if! {
    if #[cfg(feature = "parallelism")] {
        fn sum_contributions<S: LineShape>(
            x_array: &[f64],
            y_array: &mut [f64],
            lines: &[SpectralLine],
            shape: &S,
            width: f64,
        ) {
            y_array
                .par_iter_mut()
                .zip(x_array.par_iter())
                .for_each(|(y, x)| *y = contribution_at(*x, lines, shape, width));
        }
    } else {
        fn sum_contributions<S: LineShape>(
            x_array: &[f64],
            y_array: &mut [f64],
            lines: &[SpectralLine],
            shape: &S,
            width: f64,
        ) {
            y_array
                .iter_mut()
                .zip(x_array.iter())
                .for_each(|(y, x)| *y = contribution_at(*x, lines, shape, width));
        }
    }
}

/// A convenience function that broadens `lines` over `numpts` points from
/// `start` to `end` inclusive in a single call.
pub fn broaden_spectrum<S: LineShape>(
    start: f64,
    end: f64,
    numpts: usize,
    lines: &[SpectralLine],
    width: f64,
    shape: &S,
) -> Result<SampledSpectrum, ConvolutionError> {
    SpectralConvolver::new(start, end, numpts, width).broaden(lines, shape)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lineshape::{Delta, Gaussian, LineShapeKind, Lorentzian};
    use rstest::rstest;

    fn mixed_lines() -> Vec<SpectralLine> {
        vec![
            SpectralLine::new(1020.0, 3.5),
            SpectralLine::new(1650.0, 12.0),
            SpectralLine::new(1655.0, 4.0),
            SpectralLine::new(2950.0, 20.0),
        ]
    }

    #[test_log::test]
    fn test_single_lorentzian() {
        let lines = [SpectralLine::new(1000.0, 5.0)];
        let spectrum = broaden_spectrum(900.0, 1100.0, 201, &lines, 10.0, &Lorentzian).unwrap();
        assert_eq!(spectrum.len(), 201);
        let apex = spectrum.argmax().unwrap();
        assert_eq!(apex, spectrum.find(1000.0).unwrap());
        let (x, y) = spectrum.get(apex).unwrap();
        assert!((x - 1000.0).abs() < 1e-9);
        assert!((y - 5.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(900.0, 1100.0, 201)]
    #[case(8.0, 4000.0, 500)]
    #[case(0.0, 1.0, 2)]
    #[case(4000.0, 400.0, 1000)]
    fn test_grid_exactness(#[case] start: f64, #[case] end: f64, #[case] numpts: usize) {
        let spectrum =
            broaden_spectrum(start, end, numpts, &mixed_lines(), 10.0, &Lorentzian).unwrap();
        assert_eq!(spectrum.len(), numpts);
        assert_eq!(spectrum.x_array[0], start);
        assert_eq!(spectrum.x_array[numpts - 1], end);
        let step = (end - start) / (numpts - 1) as f64;
        for w in spectrum.x_array.windows(2) {
            assert!(((w[1] - w[0]) - step).abs() < 1e-9 * step.abs().max(1.0));
        }
    }

    #[test]
    fn test_noise_floor() {
        let lines = [SpectralLine::new(100.0, 1e-18)];
        let spectrum = broaden_spectrum(0.0, 10000.0, 1001, &lines, 1.0, &Gaussian).unwrap();
        assert!(spectrum.y_array.iter().all(|y| *y == 0.0 || y.abs() >= 1e-20));
        assert!(spectrum.y_array.iter().filter(|y| **y == 0.0).count() > 900);
        assert!(spectrum.y_array.iter().any(|y| *y > 0.0));
    }

    #[rstest]
    #[case(LineShapeKind::Lorentzian)]
    #[case(LineShapeKind::Gaussian)]
    #[case(LineShapeKind::Delta)]
    fn test_superposition(#[case] shape: LineShapeKind) {
        let convolver = SpectralConvolver::new(800.0, 3200.0, 481, 10.0);
        let lines = mixed_lines();
        let (a, b) = lines.split_at(2);

        let mut sum = convolver.broaden(a, &shape).unwrap();
        sum.accumulate(&convolver.broaden(b, &shape).unwrap()).unwrap();
        let whole = convolver.broaden(&lines, &shape).unwrap();

        for (s, w) in sum.y_array.iter().zip(whole.y_array.iter()) {
            assert!((s - w).abs() <= 1e-9 * w.abs().max(1.0), "{s} != {w}");
        }
    }

    #[rstest]
    #[case(0.0)]
    #[case(-3.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_width(#[case] width: f64) {
        let err = broaden_spectrum(0.0, 100.0, 10, &mixed_lines(), width, &Lorentzian).unwrap_err();
        assert!(matches!(err, ConvolutionError::InvalidWidth(_)));
    }

    #[test]
    fn test_invalid_grid() {
        let lines = mixed_lines();
        assert_eq!(
            broaden_spectrum(0.0, 100.0, 1, &lines, 10.0, &Lorentzian).unwrap_err(),
            ConvolutionError::TooFewPoints(1)
        );
        assert_eq!(
            broaden_spectrum(0.0, 100.0, 0, &lines, 10.0, &Lorentzian).unwrap_err(),
            ConvolutionError::TooFewPoints(0)
        );
        assert!(matches!(
            broaden_spectrum(50.0, 50.0, 10, &lines, 10.0, &Lorentzian).unwrap_err(),
            ConvolutionError::EmptyInterval { .. }
        ));
        assert!(matches!(
            broaden_spectrum(f64::NEG_INFINITY, 50.0, 10, &lines, 10.0, &Lorentzian).unwrap_err(),
            ConvolutionError::EmptyInterval { .. }
        ));
    }

    #[test]
    fn test_empty_lines_and_buffer_reuse() {
        let convolver = SpectralConvolver::builder()
            .start(0.0)
            .end(50.0)
            .numpts(11)
            .width(2.0)
            .build();
        let mut spectrum = convolver.broaden(&[], &Delta).unwrap();
        assert_eq!(spectrum.y_array, vec![0.0; 11]);

        let lines = [SpectralLine::new(25.0, 7.0)];
        convolver.broaden_into(&lines, &Delta, &mut spectrum).unwrap();
        assert_eq!(spectrum.len(), 11);
        assert_eq!(spectrum.y_array[5], 7.0);
        assert_eq!(spectrum.y_array.iter().sum::<f64>(), 7.0);
        assert_eq!(convolver.step(), 5.0);
    }

    #[test]
    fn test_order_independent() {
        let convolver = SpectralConvolver::default();
        let lines = mixed_lines();
        let reversed: Vec<SpectralLine> = lines.iter().rev().copied().collect();
        let a = convolver.broaden(&lines, &Lorentzian).unwrap();
        let b = convolver.broaden(&reversed, &Lorentzian).unwrap();
        for (ya, yb) in a.y_array.iter().zip(b.y_array.iter()) {
            assert!((ya - yb).abs() <= 1e-9 * ya.abs().max(1.0));
        }
    }
}
