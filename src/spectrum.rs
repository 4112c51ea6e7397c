//! A densely sampled spectrum over an evenly spaced X axis
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use thiserror::Error;

use crate::arrayops::{minmax, trapz};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SpectrumError {
    #[error("The spectra have different lengths ({0} and {1}) and cannot be combined")]
    GridMismatch(usize, usize),
    #[error("The x and y arrays do not match in length ({0} and {1})")]
    XYLengthMismatch(usize, usize),
}

/// Paired X and Y arrays produced by broadening a line list, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampledSpectrum {
    pub x_array: Vec<f64>,
    pub y_array: Vec<f64>,
}

impl SampledSpectrum {
    /// Pair up `x_array` and `y_array`, which must be the same length
    pub fn new(x_array: Vec<f64>, y_array: Vec<f64>) -> Result<Self, SpectrumError> {
        if x_array.len() != y_array.len() {
            return Err(SpectrumError::XYLengthMismatch(
                x_array.len(),
                y_array.len(),
            ));
        }
        Ok(Self { x_array, y_array })
    }

    /// An all-zero spectrum over `x_array`
    pub fn zeros(x_array: Vec<f64>) -> Self {
        let y_array = vec![0.0; x_array.len()];
        Self { x_array, y_array }
    }

    pub fn len(&self) -> usize {
        self.x_array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_array.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<(f64, f64)> {
        match (self.x_array.get(index), self.y_array.get(index)) {
            (Some(x), Some(y)) => Some((*x, *y)),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x_array
            .iter()
            .copied()
            .zip(self.y_array.iter().copied())
    }

    /// The index of the most intense sample, the first one on ties
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, y) in self.y_array.iter().enumerate() {
            match best {
                Some((_, b)) if *y <= b => {}
                _ => best = Some((i, *y)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// The index of the sample whose X value is nearest to `x`, regardless
    /// of whether the axis ascends or descends
    pub fn find(&self, x: f64) -> Option<usize> {
        self.x_array
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (**a - x).abs().total_cmp(&(**b - x).abs()))
            .map(|(i, _)| i)
    }

    /// The lowest and highest X value
    pub fn x_range(&self) -> (f64, f64) {
        minmax(&self.x_array)
    }

    /// Create a new spectrum with the same Y values over a transformed X axis,
    /// e.g. `|x| 10000.0 / x` to move from wavenumbers to wavelengths
    pub fn map_x<F: Fn(f64) -> f64>(&self, f: F) -> SampledSpectrum {
        SampledSpectrum {
            x_array: self.x_array.iter().map(|x| f(*x)).collect(),
            y_array: self.y_array.clone(),
        }
    }

    /// Add the Y values of `other`, which must be sampled on the same grid
    pub fn accumulate(&mut self, other: &SampledSpectrum) -> Result<(), SpectrumError> {
        if self.len() != other.len() {
            return Err(SpectrumError::GridMismatch(self.len(), other.len()));
        }
        self.y_array
            .iter_mut()
            .zip(other.y_array.iter())
            .for_each(|(a, b)| *a += *b);
        Ok(())
    }

    /// The trapezoidal integral of the spectrum, positive for an ascending axis
    pub fn area(&self) -> f64 {
        trapz(&self.x_array, &self.y_array)
    }

    /// Look up the `(x, y)` pairs of selected indices, skipping any that are out of range
    pub fn points_at(&self, indices: &[usize]) -> Vec<(f64, f64)> {
        indices.iter().filter_map(|i| self.get(*i)).collect()
    }
}

impl fmt::Display for SampledSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (x, y) in self.iter() {
            writeln!(f, "{}\t{}", x, y)?;
        }
        Ok(())
    }
}
