// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Phase-Space Layout
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reshape adapter between the two storage layouts of the distribution function.
//!
//! - q-expanded: `(Nq1, Nq2, Ns, Np1 * Np2 * Np3)`, position axes leading.
//! - p-expanded: `(Nq1 * Nq2 * Ns, Np1, Np2, Np3)`, momentum axes trailing.
//!
//! Both are row-major views of the same logical array, so conversion is a pure
//! reshape and round-trips bit for bit.

use ndarray::Array4;
use vlasov_types::error::{VlasovError, VlasovResult};
use vlasov_types::state::PhaseSpaceGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSpaceLayout {
    pub n_q1: usize,
    pub n_q2: usize,
    pub n_species: usize,
    pub n_p1: usize,
    pub n_p2: usize,
    pub n_p3: usize,
}

impl PhaseSpaceLayout {
    /// Layout of a tile including its ghost cells.
    pub fn from_grid(grid: &PhaseSpaceGrid, n_species: usize) -> Self {
        PhaseSpaceLayout {
            n_q1: grid.n_q1_total(),
            n_q2: grid.n_q2_total(),
            n_species,
            n_p1: grid.n_p1_total(),
            n_p2: grid.n_p2_total(),
            n_p3: grid.n_p3_total(),
        }
    }

    pub fn q_shape(&self) -> [usize; 4] {
        [
            self.n_q1,
            self.n_q2,
            self.n_species,
            self.n_p1 * self.n_p2 * self.n_p3,
        ]
    }

    pub fn p_shape(&self) -> [usize; 4] {
        [
            self.n_q1 * self.n_q2 * self.n_species,
            self.n_p1,
            self.n_p2,
            self.n_p3,
        ]
    }

    pub fn to_p_expanded(&self, f: &Array4<f64>) -> VlasovResult<Array4<f64>> {
        reshape(f, self.q_shape(), self.p_shape(), "to_p_expanded")
    }

    pub fn to_q_expanded(&self, f: &Array4<f64>) -> VlasovResult<Array4<f64>> {
        reshape(f, self.p_shape(), self.q_shape(), "to_q_expanded")
    }

    /// Check that `f` is a q-expanded array of this layout.
    pub fn check_q_expanded(&self, f: &Array4<f64>, context: &'static str) -> VlasovResult<()> {
        if f.shape() != self.q_shape() {
            return Err(VlasovError::shape(context, &self.q_shape(), f.shape()));
        }
        Ok(())
    }
}

fn reshape(
    f: &Array4<f64>,
    from: [usize; 4],
    to: [usize; 4],
    context: &'static str,
) -> VlasovResult<Array4<f64>> {
    if f.shape() != from {
        return Err(VlasovError::shape(context, &from, f.shape()));
    }
    f.as_standard_layout()
        .into_owned()
        .into_shape_with_order(to)
        .map_err(|_| VlasovError::shape(context, &to, f.shape()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> PhaseSpaceLayout {
        PhaseSpaceLayout {
            n_q1: 5,
            n_q2: 4,
            n_species: 2,
            n_p1: 3,
            n_p2: 2,
            n_p3: 2,
        }
    }

    #[test]
    fn test_round_trip_is_bit_exact() {
        let l = layout();
        let f = Array4::from_shape_fn(l.q_shape(), |(i, j, s, p)| {
            (i as f64).sin() + 0.1 * j as f64 - s as f64 * 1e-7 + (p as f64).sqrt()
        });
        let back = l.to_q_expanded(&l.to_p_expanded(&f).unwrap()).unwrap();
        assert_eq!(f, back);
    }

    #[test]
    fn test_p_expanded_indexing() {
        let l = layout();
        let f = Array4::from_shape_fn(l.q_shape(), |(i, j, s, p)| {
            (1000 * i + 100 * j + 10 * s + p) as f64
        });
        let p = l.to_p_expanded(&f).unwrap();
        // q1=2, q2=3, s=1 → row (2*4 + 3)*2 + 1; p-index (1,0,1) → 1*4 + 0*2 + 1
        let row = (2 * 4 + 3) * 2 + 1;
        assert_eq!(p[[row, 1, 0, 1]], f[[2, 3, 1, 5]]);
    }

    #[test]
    fn test_non_standard_input_is_reordered() {
        let l = layout();
        let f = Array4::from_shape_fn(l.q_shape(), |(i, j, s, p)| (i + j + s + p) as f64);
        let mut fortran = Array4::zeros(ndarray::ShapeBuilder::f(l.q_shape()));
        fortran.assign(&f);
        let a = l.to_p_expanded(&f).unwrap();
        let b = l.to_p_expanded(&fortran).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shape_mismatch_is_error() {
        let l = layout();
        let f = Array4::<f64>::zeros([5, 4, 1, 12]);
        let err = l.to_p_expanded(&f).unwrap_err();
        assert!(matches!(err, VlasovError::ShapeMismatch { .. }));
    }
}
