use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// A single discrete spectral line before broadening, e.g. one vibrational
/// mode's scaled frequency and its IR activity or Raman intensity.
pub struct SpectralLine {
    /// The location of the line on the spectrum's X axis
    pub position: f64,
    /// The height the line contributes at its own position
    pub intensity: f64,
}

impl SpectralLine {
    pub fn new(position: f64, intensity: f64) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

impl From<(f64, f64)> for SpectralLine {
    fn from((position, intensity): (f64, f64)) -> Self {
        Self::new(position, intensity)
    }
}

impl From<SpectralLine> for (f64, f64) {
    fn from(line: SpectralLine) -> Self {
        (line.position, line.intensity)
    }
}

impl fmt::Display for SpectralLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SpectralLine({}, {})", self.position, self.intensity)
    }
}

/// Build a line list from paired position and intensity arrays, stopping at
/// the shorter of the two.
pub fn lines_from_arrays(positions: &[f64], intensities: &[f64]) -> Vec<SpectralLine> {
    positions
        .iter()
        .zip(intensities.iter())
        .map(|(p, i)| SpectralLine::new(*p, *i))
        .collect()
}
