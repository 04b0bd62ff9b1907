// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Reconstruction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Face extrapolation of cell averages.

use ndarray::{Array4, Axis, Zip};
use vlasov_math::shift::shift;
use vlasov_types::error::VlasovResult;

pub use vlasov_types::config::ReconstructionScheme;

/// Produces the values a cell extrapolates to its own low and high faces.
///
/// Returns `(low_face, high_face)`, each shaped like `f`. Neighbouring-cell
/// states are obtained by the caller through a one-cell shift.
pub trait FaceValueProvider: Send + Sync {
    fn reconstruct(&self, f: &Array4<f64>, axis: Axis) -> VlasovResult<(Array4<f64>, Array4<f64>)>;
}

/// First order: both faces carry the cell average.
#[derive(Debug, Clone, Copy, Default)]
pub struct PiecewiseConstant;

impl FaceValueProvider for PiecewiseConstant {
    fn reconstruct(&self, f: &Array4<f64>, _axis: Axis) -> VlasovResult<(Array4<f64>, Array4<f64>)> {
        Ok((f.clone(), f.clone()))
    }
}

/// Minmod-limited piecewise-linear reconstruction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Minmod;

impl Minmod {
    /// Minmod limiter.
    fn limit(a: f64, b: f64) -> f64 {
        if a * b > 0.0 {
            if a.abs() < b.abs() {
                a
            } else {
                b
            }
        } else {
            0.0
        }
    }
}

impl FaceValueProvider for Minmod {
    fn reconstruct(&self, f: &Array4<f64>, axis: Axis) -> VlasovResult<(Array4<f64>, Array4<f64>)> {
        let next = shift(f, axis, -1);
        let prev = shift(f, axis, 1);
        let mut low = Array4::zeros(f.raw_dim());
        let mut high = Array4::zeros(f.raw_dim());
        Zip::from(&mut low)
            .and(&mut high)
            .and(f)
            .and(&next)
            .and(&prev)
            .par_for_each(|lo, hi, &c, &n, &p| {
                let half_slope = 0.5 * Self::limit(n - c, c - p);
                *lo = c - half_slope;
                *hi = c + half_slope;
            });
        Ok((low, high))
    }
}

/// Bind a scheme to its provider.
pub fn provider_for(scheme: ReconstructionScheme) -> Box<dyn FaceValueProvider> {
    match scheme {
        ReconstructionScheme::PiecewiseConstant => Box::new(PiecewiseConstant),
        ReconstructionScheme::Minmod => Box::new(Minmod),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minmod_limiter() {
        assert_eq!(Minmod::limit(1.0, 2.0), 1.0);
        assert_eq!(Minmod::limit(-3.0, -2.0), -2.0);
        assert_eq!(Minmod::limit(1.0, -1.0), 0.0);
        assert_eq!(Minmod::limit(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_minmod_exact_on_linear_interior() {
        let f = Array4::from_shape_fn((8, 1, 1, 1), |(i, _, _, _)| 2.0 * i as f64);
        let (low, high) = Minmod.reconstruct(&f, Axis(0)).unwrap();
        for i in 1..7 {
            assert!((low[[i, 0, 0, 0]] - (2.0 * i as f64 - 1.0)).abs() < 1e-14);
            assert!((high[[i, 0, 0, 0]] - (2.0 * i as f64 + 1.0)).abs() < 1e-14);
        }
    }

    #[test]
    fn test_minmod_flat_at_extremum() {
        let f = Array4::from_shape_fn((5, 1, 1, 1), |(i, _, _, _)| if i == 2 { 1.0 } else { 0.0 });
        let (low, high) = Minmod.reconstruct(&f, Axis(0)).unwrap();
        assert_eq!(low[[2, 0, 0, 0]], 1.0);
        assert_eq!(high[[2, 0, 0, 0]], 1.0);
    }

    #[test]
    fn test_minmod_reconstructs_along_requested_axis_only() {
        let f = Array4::from_shape_fn((3, 6, 1, 2), |(_, j, _, _)| j as f64);
        let (low, _) = Minmod.reconstruct(&f, Axis(1)).unwrap();
        assert!((low[[1, 3, 0, 1]] - 2.5).abs() < 1e-14);
        let (low_q1, _) = Minmod.reconstruct(&f, Axis(0)).unwrap();
        assert_eq!(low_q1, f);
    }

    #[test]
    fn test_piecewise_constant_copies() {
        let f = Array4::from_shape_fn((3, 3, 1, 2), |(i, j, _, p)| (i * j + p) as f64);
        let (low, high) = provider_for(ReconstructionScheme::PiecewiseConstant)
            .reconstruct(&f, Axis(0))
            .unwrap();
        assert_eq!(low, f);
        assert_eq!(high, f);
    }
}
