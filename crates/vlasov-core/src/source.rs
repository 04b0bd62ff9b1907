// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Collision Source
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Local source terms added to df/dt at cell centres.

use crate::moments::{Moment, MomentIntegrator};
use ndarray::{Array1, Array4, Axis, Zip};
use vlasov_types::error::{VlasovError, VlasovResult};
use vlasov_types::state::PhaseSpaceGrid;

/// Source/sink term `C[f]` evaluated on the q-expanded array.
pub trait SourceTerm: Send + Sync {
    fn evaluate(&self, f: &Array4<f64>, t: f64) -> VlasovResult<Array4<f64>>;
}

/// Density floor below which a cell is treated as vacuum.
pub(crate) const VACUUM_DENSITY: f64 = 1e-14;

/// BGK relaxation `C[f] = -(f - f_M) / τ` toward the local Maxwellian.
///
/// `f_M` is built from the density, bulk velocity and temperature of `f`
/// itself, over the momentum axes that have more than one cell, and is
/// rescaled so that its discrete density equals that of `f`.
#[derive(Debug, Clone)]
pub struct BgkRelaxation {
    tau: f64,
    integrator: MomentIntegrator,
    /// Momentum axes with more than one cell.
    active: [bool; 3],
}

impl BgkRelaxation {
    pub fn new(grid: &PhaseSpaceGrid, tau: f64) -> VlasovResult<Self> {
        if !tau.is_finite() || tau <= 0.0 {
            return Err(VlasovError::ConfigError(format!(
                "BGK relaxation time must be finite and > 0, got {tau}"
            )));
        }
        Ok(BgkRelaxation {
            tau,
            integrator: MomentIntegrator::new(grid),
            active: [grid.n_p1 > 1, grid.n_p2 > 1, grid.n_p3 > 1],
        })
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Local Maxwellian with the density, drift and temperature of `f`.
    pub fn maxwellian(&self, f: &Array4<f64>) -> VlasovResult<Array4<f64>> {
        let view = f.view();
        let n = self.integrator.compute(Moment::Density, view)?;
        let p = self.integrator.p_centers();
        let bulk = [Moment::MomV1Bulk, Moment::MomV2Bulk, Moment::MomV3Bulk];

        let mut drift = Vec::with_capacity(3);
        let mut second = Vec::with_capacity(3);
        for axis in 0..3 {
            drift.push(self.integrator.compute(bulk[axis], view)? / &n);
            let w: Array1<f64> = self.integrator.weights(Moment::Density) * &p[axis].mapv(|v| v * v);
            second.push(self.integrator.integrate(&w, view)? / &n);
        }
        let dims = self.active.iter().filter(|&&a| a).count().max(1) as f64;
        let mut theta = n.mapv(|_| 0.0);
        for axis in (0..3).filter(|&a| self.active[a]) {
            theta = theta + (&second[axis] - &(&drift[axis] * &drift[axis]));
        }
        theta.mapv_inplace(|t| (t / dims).max(f64::EPSILON));

        let mut shape = Array4::zeros(f.raw_dim());
        let active = self.active;
        Zip::indexed(&mut shape).par_for_each(|(i, j, s, k), out| {
            if n[[i, j, s]].abs() <= VACUUM_DENSITY {
                *out = 0.0;
                return;
            }
            let th = theta[[i, j, s]];
            let mut r2 = 0.0;
            for axis in (0..3).filter(|&a| active[a]) {
                let d = p[axis][k] - drift[axis][[i, j, s]];
                r2 += d * d;
            }
            *out = (-0.5 * r2 / th).exp();
        });

        // Rescale each cell so the discrete density matches f
        let shape_density = self.integrator.compute(Moment::Density, shape.view())?;
        Zip::from(shape.lanes_mut(Axis(3)))
            .and(&n)
            .and(&shape_density)
            .par_for_each(|mut lane, &target, &current| {
                let scale = if target.abs() > VACUUM_DENSITY && current > 0.0 {
                    target / current
                } else {
                    0.0
                };
                lane.mapv_inplace(|v| v * scale);
            });
        Ok(shape)
    }
}

impl SourceTerm for BgkRelaxation {
    fn evaluate(&self, f: &Array4<f64>, _t: f64) -> VlasovResult<Array4<f64>> {
        let f_m = self.maxwellian(f)?;
        let inv_tau = 1.0 / self.tau;
        Ok(Zip::from(f)
            .and(&f_m)
            .par_map_collect(|&v, &m| -(v - m) * inv_tau))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vlasov_types::state::MomentumFace;

    fn grid() -> PhaseSpaceGrid {
        PhaseSpaceGrid::new(
            [2, 2, 32, 32, 1],
            [0.0, 0.0, -8.0, -8.0, -0.5],
            [1.0, 1.0, 8.0, 8.0, 0.5],
            1,
            0,
        )
        .unwrap()
    }

    /// Two counter-streaming beams: far from equilibrium.
    fn two_stream(grid: &PhaseSpaceGrid) -> Array4<f64> {
        let [p1, p2, _] = grid.p_coords(MomentumFace::Center);
        Array4::from_shape_fn(
            (grid.n_q1_total(), grid.n_q2_total(), 1, grid.n_p_total()),
            |(i, _, _, k)| {
                let amp = 1.0 + 0.2 * i as f64;
                amp * ((-2.0 * (p1[k] - 2.0).powi(2)).exp() + (-2.0 * (p1[k] + 1.5).powi(2)).exp())
                    * (-0.5 * p2[k] * p2[k]).exp()
            },
        )
    }

    #[test]
    fn test_bgk_conserves_density() {
        let g = grid();
        let bgk = BgkRelaxation::new(&g, 0.1).unwrap();
        let f = two_stream(&g);
        let c = bgk.evaluate(&f, 0.0).unwrap();
        let integ = MomentIntegrator::new(&g);
        let dn = integ.compute(Moment::Density, c.view()).unwrap();
        let n = integ.compute(Moment::Density, f.view()).unwrap();
        for ((idx, &d), &nn) in dn.indexed_iter().zip(n.iter()) {
            assert!(d.abs() < 1e-10 * nn, "density source {d} at {idx:?}");
        }
    }

    #[test]
    fn test_bgk_nearly_conserves_momentum() {
        let g = grid();
        let bgk = BgkRelaxation::new(&g, 0.1).unwrap();
        let f = two_stream(&g);
        let c = bgk.evaluate(&f, 0.0).unwrap();
        let integ = MomentIntegrator::new(&g);
        let dm = integ.compute(Moment::MomV1Bulk, c.view()).unwrap();
        let m = integ.compute(Moment::MomV1Bulk, f.view()).unwrap();
        assert!(m[[1, 1, 0]].abs() > 0.01);
        assert!(dm[[1, 1, 0]].abs() < 1e-4, "momentum source {}", dm[[1, 1, 0]]);
    }

    #[test]
    fn test_bgk_vanishes_on_maxwellian() {
        let g = grid();
        let bgk = BgkRelaxation::new(&g, 0.5).unwrap();
        let [p1, p2, _] = g.p_coords(MomentumFace::Center);
        let f = Array4::from_shape_fn((4, 4, 1, g.n_p_total()), |(_, _, _, k)| {
            3.0 * (-0.5 * ((p1[k] - 0.5).powi(2) + p2[k].powi(2)) / 1.5).exp()
        });
        let c = bgk.evaluate(&f, 0.0).unwrap();
        let max = c.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!(max < 1e-6, "max |C[f_M]| = {max}");
    }

    #[test]
    fn test_vacuum_cells_relax_to_zero() {
        let g = grid();
        let bgk = BgkRelaxation::new(&g, 1.0).unwrap();
        let f = Array4::zeros((4, 4, 1, g.n_p_total()));
        let c = bgk.evaluate(&f, 0.0).unwrap();
        assert!(c.iter().all(|v| v.is_finite() && *v == 0.0));
    }

    #[test]
    fn test_rejects_non_positive_tau() {
        assert!(BgkRelaxation::new(&grid(), 0.0).is_err());
    }
}
