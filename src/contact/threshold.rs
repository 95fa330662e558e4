//! Contact threshold selection by two-segment line fitting
//!
//! The sorted sub-cap distances are modelled as two straight segments: a flat
//! "contact" regime followed by a steeper "non-contact" regime. The split that
//! minimises the summed residual norms of the two least-squares lines marks the
//! elbow of the curve, and the distance at that split is the threshold.

use crate::contact::types::{DistanceField, ThresholdFit};
use crate::error::{CsaError, Result};

/// Fewest sub-cap samples for which the split range `[2, n-2)` is non-empty
pub const MIN_THRESHOLD_SAMPLES: usize = 5;

/// Default soft distance cap, in mesh coordinate units
pub const DEFAULT_SOFT_CAP: f64 = 10.0;

/// Select the contact threshold from a distance field
///
/// Only distances strictly below `soft_cap` take part in the fit.
pub fn select_threshold(distances: &DistanceField, soft_cap: f64) -> Result<ThresholdFit> {
    let sorted = distances.sorted_below(soft_cap);

    log::info!(
        "Fitting threshold over {} of {} distances below soft cap {}",
        sorted.len(),
        distances.len(),
        soft_cap
    );

    fit_two_segments(&sorted).ok_or(CsaError::InsufficientSamples {
        available: sorted.len(),
        required: MIN_THRESHOLD_SAMPLES,
        soft_cap,
    })
}

/// Find the best two-segment split of an ascending sequence
///
/// For each split `s` in `[2, n-2)`, one line is fitted to `d[0..s)` and a
/// second to `d[s..n-1)`, both against their index positions. The split with
/// the smallest summed residual norm wins, ties going to the lowest `s`.
/// Returns `None` when fewer than [`MIN_THRESHOLD_SAMPLES`] values are given.
pub fn fit_two_segments(sorted: &[f64]) -> Option<ThresholdFit> {
    let n = sorted.len();
    if n < MIN_THRESHOLD_SAMPLES {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for split in 2..n - 2 {
        let residual =
            line_fit_residual(&sorted[..split], 0) + line_fit_residual(&sorted[split..n - 1], split);

        match best {
            Some((_, best_residual)) if residual >= best_residual => {}
            _ => best = Some((split, residual)),
        }
    }

    let (split_index, residual) = best?;
    log::debug!(
        "Threshold split at {} of {} (residual {:.6e})",
        split_index,
        n,
        residual
    );

    Some(ThresholdFit {
        threshold: sorted[split_index],
        split_index,
        residual,
        samples: n,
    })
}

/// Residual Euclidean norm of a degree-1 least-squares fit
///
/// `values[j]` is sampled at `x = first_x + j`. Fewer than three points are
/// always fitted exactly.
fn line_fit_residual(values: &[f64], first_x: usize) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }

    let count = n as f64;
    let mean_x = first_x as f64 + (count - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / count;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (j, &y) in values.iter().enumerate() {
        let dx = (first_x + j) as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }
    let slope = sxy / sxx;

    values
        .iter()
        .enumerate()
        .map(|(j, &y)| {
            let dx = (first_x + j) as f64 - mean_x;
            let r = y - (mean_y + slope * dx);
            r * r
        })
        .sum::<f64>()
        .sqrt()
}
