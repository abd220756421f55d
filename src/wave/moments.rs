//! Trapezoidal spectral moments.
//!
//! `raw[n + RAW_OFFSET]` holds `∫ S(f)·fⁿ df` for `n ∈ [-2, 4]` and
//! `squared[n + SQUARED_OFFSET]` holds `∫ S(f)²·fⁿ df` for `n ∈ [-4, 8]`.
//! Slot 0 of each vector is never written.  Integration runs over
//! consecutive bins in on-disk order; the bins are not re-sorted.

use std::ops::RangeInclusive;

use crate::spectral::SpectralBin;

pub const RAW_OFFSET:     usize = 3;
pub const SQUARED_OFFSET: usize = 5;
pub const RAW_ORDERS:     RangeInclusive<i32> = -2..=4;
pub const SQUARED_ORDERS: RangeInclusive<i32> = -4..=8;

#[derive(Debug, Clone, PartialEq)]
pub struct Moments {
    pub raw:     [f64; 8],
    pub squared: [f64; 14],
}

impl Moments {
    /// Integrate over `(frequency, power)` points.
    pub fn integrate<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut raw     = [0.0f64; 8];
        let mut squared = [0.0f64; 14];

        let mut prev: Option<(f64, f64)> = None;
        for (f, p) in points {
            if let Some((f0, p0)) = prev {
                let df = f - f0;
                for n in RAW_ORDERS {
                    let y0 = p0 * f0.powi(n);
                    let y1 = p * f.powi(n);
                    raw[slot(n, RAW_OFFSET)] += 0.5 * (y1 + y0) * df;
                }
                for n in SQUARED_ORDERS {
                    let y0 = p0.powi(2) * f0.powi(n);
                    let y1 = p.powi(2) * f.powi(n);
                    squared[slot(n, SQUARED_OFFSET)] += 0.5 * (y1 + y0) * df;
                }
            }
            prev = Some((f, p));
        }

        Self { raw, squared }
    }

    pub fn from_bins(bins: &[SpectralBin]) -> Self {
        Self::integrate(bins.iter().map(|b| (b.frequency_hz, b.power)))
    }

    /// `mₙ` for `n ∈ [-2, 4]`.
    pub fn raw(&self, n: i32) -> f64 {
        self.raw[slot(n, RAW_OFFSET)]
    }

    /// Squared-power moment of order `n ∈ [-4, 8]`.
    pub fn squared(&self, n: i32) -> f64 {
        self.squared[slot(n, SQUARED_OFFSET)]
    }
}

fn slot(n: i32, offset: usize) -> usize {
    (n + offset as i32) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_point_contribution_is_single_trapezoid() {
        let (f0, p0) = (0.05, 2.0);
        let (f1, p1) = (0.12, 3.5);
        let m = Moments::integrate([(f0, p0), (f1, p1)]);

        for n in RAW_ORDERS {
            let expected = 0.5 * (p1 * f1.powi(n) + p0 * f0.powi(n)) * (f1 - f0);
            assert_eq!(m.raw(n), expected, "raw n={n}");
        }
        for n in SQUARED_ORDERS {
            let expected = 0.5 * (p1.powi(2) * f1.powi(n) + p0.powi(2) * f0.powi(n)) * (f1 - f0);
            assert_eq!(m.squared(n), expected, "squared n={n}");
        }
        assert_eq!(m.raw[0], 0.0);
        assert_eq!(m.squared[0], 0.0);
    }

    #[test]
    fn single_point_integrates_to_zero() {
        let m = Moments::integrate([(0.1, 9.0)]);
        assert!(m.raw.iter().all(|&v| v == 0.0));
        assert!(m.squared.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn flat_spectrum_zeroth_moment_is_area() {
        let pts: Vec<(f64, f64)> = (0..=10).map(|i| (0.1 + i as f64 * 0.01, 4.0)).collect();
        let m = Moments::integrate(pts);
        assert!((m.raw(0) - 0.4).abs() < 1e-12);
        assert!((m.squared(0) - 1.6).abs() < 1e-12);
    }

    #[test]
    fn repeated_frequency_adds_nothing() {
        let a = Moments::integrate([(0.1, 1.0), (0.2, 2.0)]);
        let b = Moments::integrate([(0.1, 1.0), (0.2, 2.0), (0.2, 7.0)]);
        assert_eq!(a, b);
    }
}
