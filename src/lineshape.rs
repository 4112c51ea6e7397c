//! Lineshapes describing how one line's intensity spreads over neighboring X values.
//!
//! Every shape here is parameterized the same way: the line's `position`, its
//! apex `height`, and a `width` which is the full width at half maximum for the
//! continuous shapes. Contributions from many lines are combined by summing.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ratio between a Gaussian's full width at half max and its standard deviation
pub const FWHM_TO_SIGMA: f64 = 2.35482;

/// A kernel which, evaluated at `x`, gives the contribution of a line at
/// `position` with apex `height` and shape parameter `width`.
///
/// Implementations must depend on nothing but their four arguments so that
/// evaluations can be summed in any order and from any thread.
pub trait LineShape: Sync {
    fn evaluate(&self, x: f64, position: f64, height: f64, width: f64) -> f64;
}

impl<T: LineShape + ?Sized> LineShape for &T {
    #[inline]
    fn evaluate(&self, x: f64, position: f64, height: f64, width: f64) -> f64 {
        (**self).evaluate(x, position, height, width)
    }
}

/// The Lorentzian (Cauchy) profile, `h * a / ((p - x)^2 + a)` where `a = width^2 / 4`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Lorentzian;

impl LineShape for Lorentzian {
    #[inline]
    fn evaluate(&self, x: f64, position: f64, height: f64, width: f64) -> f64 {
        let a = width * width / 4.0;
        let delta = position - x;
        height * a / (delta * delta + a)
    }
}

/// A Gaussian profile with its apex at `height`
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Gaussian;

impl LineShape for Gaussian {
    #[inline]
    fn evaluate(&self, x: f64, position: f64, height: f64, width: f64) -> f64 {
        let spread = width / FWHM_TO_SIGMA;
        let delta = x - position;
        height * (-(delta * delta) / (2.0 * spread * spread)).exp()
    }
}

/// A stick spectrum. A sample receives the full `height` of every line whose
/// position lies within half a `width` of it and nothing from any other line.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Delta;

impl LineShape for Delta {
    #[inline]
    fn evaluate(&self, x: f64, position: f64, height: f64, width: f64) -> f64 {
        if (x - position).abs() <= width / 2.0 {
            height
        } else {
            0.0
        }
    }
}

/// Select a [`LineShape`] by name, e.g. from a configuration value
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LineShapeKind {
    #[default]
    Lorentzian,
    Gaussian,
    Delta,
}

impl LineShape for LineShapeKind {
    #[inline]
    fn evaluate(&self, x: f64, position: f64, height: f64, width: f64) -> f64 {
        match self {
            LineShapeKind::Lorentzian => Lorentzian.evaluate(x, position, height, width),
            LineShapeKind::Gaussian => Gaussian.evaluate(x, position, height, width),
            LineShapeKind::Delta => Delta.evaluate(x, position, height, width),
        }
    }
}
