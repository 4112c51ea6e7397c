use std::iter::Sum;

use num_traits::{AsPrimitive, Float, FromPrimitive};

/// Magnitudes below this are written out as exactly zero
pub const NOISE_FLOOR: f64 = 1e-20;

/// Create `numpts` evenly spaced values from `start` to `end`, both included.
///
/// The last value is set to `end` directly rather than accumulated so the
/// upper bound is exact. `start` may be greater than `end`, producing a
/// descending grid.
pub fn linspace<T: Float + FromPrimitive>(start: T, end: T, numpts: usize) -> Vec<T> {
    match numpts {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / T::from_usize(numpts - 1).unwrap();
            let mut result: Vec<T> = (0..numpts)
                .map(|i| start + T::from_usize(i).unwrap() * step)
                .collect();
            result[numpts - 1] = end;
            result
        }
    }
}

pub fn minmax<T: Float>(values: &[T]) -> (T, T) {
    let mut max = -T::infinity();
    let mut min = T::infinity();

    for v in values.iter() {
        if *v > max {
            max = *v;
        }
        if *v < min {
            min = *v
        }
    }
    (min, max)
}

/// Arithmetic mean, `NaN` for an empty slice
pub fn mean<T: Float + FromPrimitive>(values: &[T]) -> T {
    if values.is_empty() {
        return T::nan();
    }
    let total = values.iter().fold(T::zero(), |acc, v| acc + *v);
    total / T::from_usize(values.len()).unwrap()
}

/// Population standard deviation (divisor `n`, not `n - 1`)
pub fn population_stdev<T: Float + FromPrimitive>(values: &[T]) -> T {
    let m = mean(values);
    let ss = values.iter().fold(T::zero(), |acc, v| {
        let d = *v - m;
        acc + d * d
    });
    (ss / T::from_usize(values.len()).unwrap()).sqrt()
}

/// Compute the mean and population standard deviation in one call
pub fn mean_and_stdev<T: Float + FromPrimitive>(values: &[T]) -> (T, T) {
    (mean(values), population_stdev(values))
}

/// Trapezoidal integration of `y` over `x`. The sign follows the direction of `x`.
pub fn trapz<
    A: Float + Clone + AsPrimitive<B> + 'static,
    B: Float + Clone + AsPrimitive<A> + 'static + Sum,
>(
    x: &[A],
    y: &[B],
) -> B {
    let n = x.len().min(y.len());
    if n < 2 {
        return B::zero();
    }
    (0..n - 1)
        .map(|i| {
            let delta = x[i + 1] - x[i];
            delta.as_() * B::from(0.5).unwrap() * (y[i + 1] + y[i])
        })
        .sum()
}

#[inline]
pub fn snap_value(value: f64) -> f64 {
    if value.abs() < NOISE_FLOOR {
        0.0
    } else {
        value
    }
}

/// Replace every value whose magnitude is below [`NOISE_FLOOR`] with `0.0`
pub fn snap_to_noise_floor(values: &mut [f64]) {
    values.iter_mut().for_each(|v| *v = snap_value(*v));
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(900.0, 1100.0, 201)]
    #[case(8.0, 4000.0, 500)]
    #[case(0.1, 0.3, 3)]
    #[case(4000.0, 8.0, 17)]
    fn test_linspace_endpoints(#[case] start: f64, #[case] end: f64, #[case] n: usize) {
        let grid = linspace(start, end, n);
        assert_eq!(grid.len(), n);
        assert_eq!(grid[0], start);
        assert_eq!(grid[n - 1], end);
        let step = (end - start) / (n - 1) as f64;
        for w in grid.windows(2) {
            assert!(((w[1] - w[0]) - step).abs() < 1e-9 * step.abs().max(1.0));
        }
    }

    #[test]
    fn test_linspace_degenerate() {
        assert!(linspace(0.0f64, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0f64, 1.0, 1), vec![3.0]);
    }

    #[test]
    fn test_mean_stdev() {
        let data = [0.0, 0.0, 10.0, 0.0, 0.0];
        let (m, s) = mean_and_stdev(&data);
        assert!((m - 2.0f64).abs() < 1e-12);
        assert!((s - 4.0f64).abs() < 1e-12);

        let flat = [3.0f64; 7];
        assert_eq!(population_stdev(&flat), 0.0);
        assert!(mean::<f64>(&[]).is_nan());
    }

    #[test]
    fn test_trapz() {
        let x = linspace(0.0f64, 1.0, 11);
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
        assert!((trapz(&x, &y) - 1.0).abs() < 1e-12);

        let xr: Vec<f64> = x.iter().rev().copied().collect();
        let yr: Vec<f64> = y.iter().rev().copied().collect();
        assert!((trapz(&xr, &yr) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_noise_floor() {
        let mut values = [1e-21, -1e-25, 1e-20, 0.5, -3e-30, -2.0];
        snap_to_noise_floor(&mut values);
        assert_eq!(values, [0.0, 0.0, 1e-20, 0.5, 0.0, -2.0]);
        assert!(values[1].is_sign_positive());
    }

    #[test]
    fn test_minmax() {
        let (lo, hi) = minmax(&[3.0, -1.0, 7.5, 2.0]);
        assert_eq!(lo, -1.0);
        assert_eq!(hi, 7.5);
    }
}
