// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Spectral Maxwell
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Time derivative of Fourier-mode field amplitudes.
//!
//! Amplitude convention: a real field `g` is stored as `2·fft2(g)/N` with
//! `N = Nq1·Nq2`, so `g = Re(ifft2(g_hat))·N/2`.

use crate::moments::{Moment, MomentIntegrator};
use ndarray::{Array1, Array2, Array3, Array4, Axis, Zip};
use num_complex::Complex64;
use vlasov_math::fft::{fft2, ifft2_complex, wavenumbers};
use vlasov_types::error::{VlasovError, VlasovResult};
use vlasov_types::state::{PhaseSpaceGrid, Species};

const I: Complex64 = Complex64::new(0.0, 1.0);

/// Component order of `fields_hat`: E1, E2, E3, B1, B2, B3.
pub const N_FIELD_COMPONENTS: usize = 6;

/// Stateless Maxwell right-hand side for the linearized spectral solver.
#[derive(Debug, Clone)]
pub struct SpectralFieldDerivative {
    n_q1: usize,
    n_q2: usize,
    k_q1: Array1<f64>,
    k_q2: Array1<f64>,
    charges: Vec<f64>,
    integrator: MomentIntegrator,
}

impl SpectralFieldDerivative {
    /// The spectral solver works on the interior modes only; position ghost
    /// cells of `grid` are ignored.
    pub fn new(grid: &PhaseSpaceGrid, species: &[Species]) -> VlasovResult<Self> {
        if species.is_empty() {
            return Err(VlasovError::ConfigError(
                "spectral field derivative needs at least one species".to_string(),
            ));
        }
        let (length_q1, length_q2) = grid.q_lengths();
        Ok(SpectralFieldDerivative {
            n_q1: grid.n_q1,
            n_q2: grid.n_q2,
            k_q1: wavenumbers(grid.n_q1, length_q1),
            k_q2: wavenumbers(grid.n_q2, length_q2),
            charges: species.iter().map(|s| s.charge).collect(),
            integrator: MomentIntegrator::new(grid),
        })
    }

    pub fn k_q1(&self) -> &Array1<f64> {
        &self.k_q1
    }

    pub fn k_q2(&self) -> &Array1<f64> {
        &self.k_q2
    }

    /// Fourier amplitudes of `J_k = Σ_s q_s ∫ p_k f_s d³p`, shape `(Nq1, Nq2)`.
    pub fn current_hat(&self, f_hat: &Array4<Complex64>, moment: Moment) -> VlasovResult<Array2<Complex64>> {
        let m_hat = self.integrator.compute(moment, f_hat.view())?;
        let n = (self.n_q1 * self.n_q2) as f64;
        let mut j_hat = Array2::zeros((self.n_q1, self.n_q2));
        for (s, &charge) in self.charges.iter().enumerate() {
            // Back to real space, keep the physical (real) part, forward again.
            let j_s = ifft2_complex(m_hat.index_axis(Axis(2), s)).mapv(|c| c.re * 0.5 * n);
            let scale = 2.0 * charge / n;
            Zip::from(&mut j_hat)
                .and(&fft2(&j_s))
                .for_each(|acc, &v| *acc += v * scale);
        }
        Ok(j_hat)
    }

    /// `d(fields_hat)/dt` from Ampère and Faraday in Fourier space.
    pub fn compute_dfields_hat_dt(
        &self,
        f_hat: &Array4<Complex64>,
        fields_hat: &Array3<Complex64>,
    ) -> VlasovResult<Array3<Complex64>> {
        let (n1, n2) = (self.n_q1, self.n_q2);
        let (f1, f2, ns, np) = f_hat.dim();
        if (f1, f2, ns, np) != (n1, n2, self.charges.len(), self.integrator.n_p()) {
            return Err(VlasovError::shape(
                "spectral distribution function",
                &[n1, n2, self.charges.len(), self.integrator.n_p()],
                f_hat.shape(),
            ));
        }
        if fields_hat.dim() != (N_FIELD_COMPONENTS, n1, n2) {
            return Err(VlasovError::shape(
                "spectral fields",
                &[N_FIELD_COMPONENTS, n1, n2],
                fields_hat.shape(),
            ));
        }

        let j1 = self.current_hat(f_hat, Moment::MomV1Bulk)?;
        let j2 = self.current_hat(f_hat, Moment::MomV2Bulk)?;
        let j3 = self.current_hat(f_hat, Moment::MomV3Bulk)?;

        let e1 = fields_hat.index_axis(Axis(0), 0);
        let e2 = fields_hat.index_axis(Axis(0), 1);
        let e3 = fields_hat.index_axis(Axis(0), 2);
        let b1 = fields_hat.index_axis(Axis(0), 3);
        let b2 = fields_hat.index_axis(Axis(0), 4);
        let b3 = fields_hat.index_axis(Axis(0), 5);

        let mut out = Array3::zeros((N_FIELD_COMPONENTS, n1, n2));
        Zip::indexed(out.lanes_mut(Axis(0))).for_each(|(i, j), mut d| {
            let ik1 = I * self.k_q1[i];
            let ik2 = I * self.k_q2[j];
            let at = (i, j);
            d[0] = ik2 * b3[at] - j1[at];
            d[1] = -ik1 * b3[at] - j2[at];
            d[2] = ik1 * b2[at] - ik2 * b1[at] - j3[at];
            d[3] = -ik2 * e3[at];
            d[4] = ik1 * e3[at];
            d[5] = ik2 * e1[at] - ik1 * e2[at];
        });
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn grid() -> PhaseSpaceGrid {
        PhaseSpaceGrid::new(
            [4, 4, 2, 1, 1],
            [0.0, 0.0, -1.0, -0.5, -0.5],
            [2.0 * PI, 2.0 * PI, 1.0, 0.5, 0.5],
            0,
            0,
        )
        .unwrap()
    }

    fn electron() -> Species {
        Species {
            mass: 1.0,
            charge: -1.0,
        }
    }

    fn close(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn test_static_single_mode() {
        let g = grid();
        let solver = SpectralFieldDerivative::new(&g, &[electron()]).unwrap();
        assert!((solver.k_q1()[1] - 1.0).abs() < 1e-14);
        assert!(solver.k_q2()[0].abs() < 1e-14);

        let f_hat = Array4::zeros((4, 4, 1, 2));
        let mut fields_hat = Array3::zeros((6, 4, 4));
        fields_hat[[5, 1, 0]] = Complex64::new(1.0, 0.0); // B3
        fields_hat[[2, 1, 0]] = Complex64::new(2.0, 0.0); // E3
        let d = solver.compute_dfields_hat_dt(&f_hat, &fields_hat).unwrap();

        assert!(close(d[[0, 1, 0]], Complex64::new(0.0, 0.0)));
        assert!(close(d[[1, 1, 0]], Complex64::new(0.0, -1.0)));
        assert!(close(d[[3, 1, 0]], Complex64::new(0.0, 0.0)));
        assert!(close(d[[4, 1, 0]], Complex64::new(0.0, 2.0)));
        assert!(close(d[[5, 1, 0]], Complex64::new(0.0, 0.0)));
        assert!(d.iter().enumerate().all(|(idx, v)| {
            let (c, i, j) = (idx / 16, (idx / 4) % 4, idx % 4);
            (i, j) == (1, 0) && (c == 1 || c == 4) || v.norm() < 1e-12
        }));
    }

    #[test]
    fn test_uniform_current_drives_e1() {
        let g = grid();
        let solver = SpectralFieldDerivative::new(&g, &[electron()]).unwrap();
        // f = 3 in the p1 = +0.5 cell, uniform in q
        let mut f_hat = Array4::zeros((4, 4, 1, 2));
        f_hat[[0, 0, 0, 1]] = Complex64::new(6.0, 0.0);
        let fields_hat = Array3::zeros((6, 4, 4));
        let d = solver.compute_dfields_hat_dt(&f_hat, &fields_hat).unwrap();
        // J1 = -1 * 0.5 * 3 = -1.5, stored as 2·J = -3
        assert!(close(d[[0, 0, 0]], Complex64::new(3.0, 0.0)), "{}", d[[0, 0, 0]]);
        assert!(d[[0, 1, 1]].norm() < 1e-12);
        assert!(d[[1, 0, 0]].norm() < 1e-12);
    }

    #[test]
    fn test_shape_errors() {
        let g = grid();
        let solver = SpectralFieldDerivative::new(&g, &[electron()]).unwrap();
        let f_hat = Array4::zeros((4, 4, 1, 2));
        assert!(matches!(
            solver.compute_dfields_hat_dt(&f_hat, &Array3::zeros((5, 4, 4))),
            Err(VlasovError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            solver.compute_dfields_hat_dt(&Array4::zeros((4, 4, 2, 2)), &Array3::zeros((6, 4, 4))),
            Err(VlasovError::ShapeMismatch { .. })
        ));
    }
}
