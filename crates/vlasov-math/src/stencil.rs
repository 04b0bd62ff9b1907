// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Staggered Stencils
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Neighbour averages and finite differences on periodic-rolled arrays.
//!
//! All stencils wrap at the array edge; outermost ghost cells therefore hold
//! meaningless values and must be refreshed by a halo fill before reuse.

use crate::shift::shift;
use ndarray::{Array, ArrayBase, Axis, Data, Dimension};

/// `0.5 * (x[i-1] + x[i])` along `axis`.
pub fn avg_with_prev<S, D>(x: &ArrayBase<S, D>, axis: Axis) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    (x.to_owned() + shift(x, axis, 1)) * 0.5
}

/// `0.5 * (x[i] + x[i+1])` along `axis`.
pub fn avg_with_next<S, D>(x: &ArrayBase<S, D>, axis: Axis) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    (x.to_owned() + shift(x, axis, -1)) * 0.5
}

/// `(x[i+1] - x[i]) / dx` along `axis`.
pub fn diff_forward<S, D>(x: &ArrayBase<S, D>, axis: Axis, dx: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    (shift(x, axis, -1) - x) / dx
}

/// `(x[i] - x[i-1]) / dx` along `axis`.
pub fn diff_backward<S, D>(x: &ArrayBase<S, D>, axis: Axis, dx: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    (x.to_owned() - shift(x, axis, 1)) / dx
}

/// Fourth-order centred first derivative:
/// `(-x[i+2] + 8 x[i+1] - 8 x[i-1] + x[i-2]) / (12 dx)`.
pub fn central_diff4<S, D>(x: &ArrayBase<S, D>, axis: Axis, dx: f64) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let p2 = shift(x, axis, -2);
    let p1 = shift(x, axis, -1);
    let m1 = shift(x, axis, 1);
    let m2 = shift(x, axis, 2);
    (-p2 + p1 * 8.0 - m1 * 8.0 + m2) / (12.0 * dx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use std::f64::consts::PI;

    fn periodic_sine(n: usize) -> (Array1<f64>, f64) {
        let dx = 2.0 * PI / n as f64;
        (Array1::from_shape_fn(n, |i| (i as f64 * dx).sin()), dx)
    }

    #[test]
    fn test_averages_are_mirror_images() {
        let x = Array1::from_vec(vec![1.0, 2.0, 4.0, 8.0]);
        let prev = avg_with_prev(&x, Axis(0));
        let next = avg_with_next(&x, Axis(0));
        assert!((prev[2] - 3.0).abs() < 1e-15);
        assert!((next[1] - 3.0).abs() < 1e-15);
        assert!((prev[0] - 4.5).abs() < 1e-15);
    }

    #[test]
    fn test_forward_and_backward_are_offset_by_one() {
        let x = Array1::from_vec(vec![0.0, 1.0, 4.0, 9.0, 16.0]);
        let f = diff_forward(&x, Axis(0), 0.5);
        let b = diff_backward(&x, Axis(0), 0.5);
        for i in 1..4 {
            assert!((f[i - 1] - b[i]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_central_diff4_is_fourth_order() {
        // Error drops by ~16x when the grid is refined 2x
        let err = |n: usize| {
            let (x, dx) = periodic_sine(n);
            let d = central_diff4(&x, Axis(0), dx);
            (0..n)
                .map(|i| (d[i] - (i as f64 * dx).cos()).abs())
                .fold(0.0, f64::max)
        };
        let ratio = err(32) / err(64);
        assert!(ratio > 14.0 && ratio < 18.0, "convergence ratio {ratio}");
    }

    #[test]
    fn test_central_diff4_exact_for_linear_interior() {
        let x = Array1::from_shape_fn(10, |i| 3.0 * i as f64);
        let d = central_diff4(&x, Axis(0), 1.0);
        for i in 2..8 {
            assert!((d[i] - 3.0).abs() < 1e-12);
        }
    }
}
