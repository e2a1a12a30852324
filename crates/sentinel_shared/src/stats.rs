//! # Statistics
//!
//! Small closed-form statistics over fixed-size sample windows.
//!
//! Every function here is total: empty or degenerate input yields a neutral
//! value (`0.0`, an empty list) instead of a panic or a NaN.

/// Fixed-point scale applied to rotation deltas before integer GCD analysis (2^24).
pub const EXPANDER: f64 = 16_777_216.0;

/// The floored Euclid stops once the divisor drops to this value or below.
pub const GCD_FLOOR: u64 = 16384;

/// Arithmetic mean. Returns `0.0` for an empty slice.
#[must_use]
pub fn mean<T: Copy + Into<f64>>(data: &[T]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|&v| v.into()).sum::<f64>() / data.len() as f64
}

/// Population standard deviation. Returns `0.0` for an empty slice.
#[must_use]
pub fn std_dev<T: Copy + Into<f64>>(data: &[T]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let avg = mean(data);
    let variance = data
        .iter()
        .map(|&v| {
            let d = v.into() - avg;
            d * d
        })
        .sum::<f64>()
        / data.len() as f64;
    variance.sqrt()
}

/// Finite-difference transform ("jiff") of the given depth.
///
/// Each pass replaces the sequence with `| |x[i]| - |x[i-1]| |` over
/// consecutive pairs, so the output has `max(0, n - depth)` elements.
/// Depth 0 is the identity.
#[must_use]
pub fn finite_difference(data: &[f32], depth: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(data.len());
    finite_difference_into(data, depth, &mut out);
    out
}

/// [`finite_difference`] writing into a reusable buffer.
///
/// `out` is cleared first; once it has grown to the window size no further
/// allocation happens.
pub fn finite_difference_into(data: &[f32], depth: usize, out: &mut Vec<f32>) {
    out.clear();
    out.extend_from_slice(data);
    for _ in 0..depth {
        if out.is_empty() {
            break;
        }
        // In place: slot i reads i and i+1 before i+1 is overwritten.
        for i in 0..out.len() - 1 {
            out[i] = (out[i + 1].abs() - out[i].abs()).abs();
        }
        out.pop();
    }
}

/// Interquartile range `sorted[3n/4] - sorted[n/4]`.
///
/// Sorts `values` in place. Returns `0.0` when fewer than four values are
/// given. Infinities sort last and may produce an infinite range.
#[must_use]
pub fn interquartile_range(values: &mut [f32]) -> f64 {
    let n = values.len();
    if n < 4 {
        return 0.0;
    }
    values.sort_unstable_by(f32::total_cmp);
    let q1 = f64::from(values[n / 4]);
    let q3 = f64::from(values[3 * n / 4]);
    q3 - q1
}

/// Values whose z-score magnitude exceeds `threshold`.
///
/// Empty when fewer than three values are given or when their standard
/// deviation is below `1e-6`.
#[must_use]
pub fn zscore_outliers(data: &[f64], threshold: f64) -> Vec<f64> {
    if data.len() < 3 {
        return Vec::new();
    }
    let avg = mean(data);
    let sd = std_dev(data);
    if sd < 1e-6 {
        return Vec::new();
    }
    data.iter()
        .copied()
        .filter(|v| ((v - avg) / sd).abs() > threshold)
        .collect()
}

/// Number of bit-distinct values.
///
/// Quadratic, intended for the short chunk transforms the detectors use.
#[must_use]
pub fn distinct_count(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .filter(|&(i, v)| !values[..i].iter().any(|u| u.to_bits() == v.to_bits()))
        .count()
}

/// Scales a non-negative delta into the integer GCD domain, truncating.
#[inline]
#[must_use]
pub fn expand(value: f32) -> u64 {
    // Saturating cast: negatives and NaN land on 0.
    (EXPANDER * f64::from(value)) as u64
}

/// Euclid's algorithm with an early exit once the divisor reaches
/// [`GCD_FLOOR`]. Returns the dividend at that point, a coarse lower bound
/// rather than the exact GCD.
#[must_use]
pub fn floored_gcd(mut a: u64, mut b: u64) -> u64 {
    while b > GCD_FLOOR {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
