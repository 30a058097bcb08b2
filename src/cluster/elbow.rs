//! WCSS elbow diagnostic
//!
//! Read-only analysis of how within-cluster spread falls as k grows. None
//! of these functions feed back into the assignment used for selection.

use super::{ClusterAssignment, KMeans};
use crate::vectorize::WeightMatrix;
use rayon::prelude::*;
use serde::Serialize;

/// One point on the WCSS curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElbowPoint {
    pub k: usize,
    pub wcss: f64,
}

/// Read `(k, wcss)` off a set of already computed clusterings, sorted by k
pub fn elbow_points(candidates: &[ClusterAssignment]) -> Vec<ElbowPoint> {
    let mut points: Vec<ElbowPoint> = candidates
        .iter()
        .map(|a| ElbowPoint {
            k: a.k(),
            wcss: a.wcss(),
        })
        .collect();
    points.sort_by_key(|p| p.k);
    points
}

/// Fit one clustering per k in `min_k..=max_k` and return the WCSS curve.
///
/// Each k runs independently with the settings (and seed) of `base`, in
/// parallel; the result is identical to a sequential sweep.
pub fn wcss_curve(matrix: &WeightMatrix, min_k: usize, max_k: usize, base: &KMeans) -> Vec<ElbowPoint> {
    if min_k > max_k {
        return Vec::new();
    }
    let candidates: Vec<ClusterAssignment> = (min_k..=max_k)
        .into_par_iter()
        .map(|k| base.clone().with_k(k).fit(matrix))
        .collect();
    elbow_points(&candidates)
}

/// The k at the knee of the curve.
///
/// Both axes are scaled to `[0, 1]` and the knee is the point farthest from
/// the chord joining the first and last points; ties go to the smaller k.
/// Curves with fewer than three points return their smallest k.
pub fn find_elbow(points: &[ElbowPoint]) -> Option<usize> {
    let first = points.first()?;
    let last = points.last()?;
    if points.len() < 3 {
        return Some(first.k);
    }

    let k_span = (last.k - first.k) as f64;
    let (w_min, w_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.wcss), hi.max(p.wcss))
        });
    let w_span = w_max - w_min;

    let scale = |p: &ElbowPoint| {
        let x = if k_span > 0.0 {
            (p.k - first.k) as f64 / k_span
        } else {
            0.0
        };
        let y = if w_span > 0.0 {
            (p.wcss - w_min) / w_span
        } else {
            0.0
        };
        (x, y)
    };

    let (x1, y1) = scale(first);
    let (x2, y2) = scale(last);
    let chord = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
    if chord == 0.0 {
        return Some(first.k);
    }

    let mut best = first.k;
    let mut best_dist = 0.0;
    for p in points {
        let (x, y) = scale(p);
        let dist = ((y2 - y1) * x - (x2 - x1) * y + x2 * y1 - y2 * x1).abs() / chord;
        if dist > best_dist {
            best_dist = dist;
            best = p.k;
        }
    }
    Some(best)
}
