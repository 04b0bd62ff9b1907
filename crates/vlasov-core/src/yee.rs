// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Periodic Yee Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reference field solver for a single periodic tile.
//!
//! Electrostatic: spectral Poisson solve `φ_k = ρ_k / k²`, `E = -∇φ`.
//! Electrodynamic: FDTD leapfrog on the Yee grid, normalized so that
//! `∂E/∂t = ∇×B - J` and `∂B/∂t = -∇×E`.

use crate::fields::{FieldComponents, FieldSolver, FieldState, Stagger, TimeLevel};
use ndarray::{s, Array2, Axis};
use num_complex::Complex64;
use vlasov_math::fft::{fft2, ifft2, wavenumbers};
use vlasov_math::halo::apply_periodic_halo;
use vlasov_math::stencil::{avg_with_next, avg_with_prev, diff_backward, diff_forward};
use vlasov_types::error::{VlasovError, VlasovResult};
use vlasov_types::state::PhaseSpaceGrid;

pub struct PeriodicYeeSolver {
    n_q1: usize,
    n_q2: usize,
    n_ghost: usize,
    dq1: f64,
    dq2: f64,
    length_q1: f64,
    length_q2: f64,
    state: FieldState,
}

impl PeriodicYeeSolver {
    pub fn new(grid: &PhaseSpaceGrid) -> Self {
        let (length_q1, length_q2) = grid.q_lengths();
        PeriodicYeeSolver {
            n_q1: grid.n_q1,
            n_q2: grid.n_q2,
            n_ghost: grid.n_ghost_q,
            dq1: grid.dq1,
            dq2: grid.dq2,
            length_q1,
            length_q2,
            state: FieldState::zeros((grid.n_q1_total(), grid.n_q2_total())),
        }
    }

    /// Start from the given Yee-grid fields; both cell-centred levels are
    /// initialised from them.
    pub fn with_yee_fields(grid: &PhaseSpaceGrid, yee: FieldComponents) -> VlasovResult<Self> {
        let mut solver = Self::new(grid);
        if yee.dim() != solver.shape() {
            return Err(VlasovError::shape(
                "initial yee fields",
                &[solver.shape().0, solver.shape().1],
                &[yee.dim().0, yee.dim().1],
            ));
        }
        solver.state.yee = yee;
        solver.communicate_fields()?;
        let centered = solver.yee_to_centered(&solver.state.yee)?;
        solver.state.centered_at_n = centered.clone();
        solver.state.centered_at_n_plus_half = centered;
        Ok(solver)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_q1 + 2 * self.n_ghost, self.n_q2 + 2 * self.n_ghost)
    }

    fn halo(&self, a: &mut Array2<f64>) -> VlasovResult<()> {
        apply_periodic_halo(a, &[Axis(0), Axis(1)], self.n_ghost)
    }

    /// Average each Yee component to the cell centre.
    fn yee_to_centered(&self, yee: &FieldComponents) -> VlasovResult<FieldComponents> {
        let mut c = FieldComponents {
            e1: avg_with_next(&yee.e1, Axis(0)),
            e2: avg_with_next(&yee.e2, Axis(1)),
            e3: yee.e3.clone(),
            b1: avg_with_next(&yee.b1, Axis(1)),
            b2: avg_with_next(&yee.b2, Axis(0)),
            b3: avg_with_next(&avg_with_next(&yee.b3, Axis(0)), Axis(1)),
        };
        for a in c.iter_mut() {
            self.halo(a)?;
        }
        Ok(c)
    }

    fn check_shape(&self, a: &Array2<f64>, context: &'static str) -> VlasovResult<()> {
        let (n1, n2) = self.shape();
        if a.dim() != (n1, n2) {
            return Err(VlasovError::shape(context, &[n1, n2], a.shape()));
        }
        Ok(())
    }
}

impl FieldSolver for PeriodicYeeSolver {
    fn compute_electrostatic_fields(&mut self, rho: &Array2<f64>) -> VlasovResult<()> {
        self.check_shape(rho, "electrostatic charge density")?;
        let g = self.n_ghost;
        let interior = rho
            .slice(s![g..g + self.n_q1, g..g + self.n_q2])
            .to_owned();
        let rho_hat = fft2(&interior);
        let k1 = wavenumbers(self.n_q1, self.length_q1);
        let k2 = wavenumbers(self.n_q2, self.length_q2);

        let mut e1_hat = Array2::<Complex64>::zeros(rho_hat.dim());
        let mut e2_hat = Array2::<Complex64>::zeros(rho_hat.dim());
        for ((i, j), &r) in rho_hat.indexed_iter() {
            let k_sq = k1[i] * k1[i] + k2[j] * k2[j];
            if k_sq == 0.0 {
                continue;
            }
            let phi = r / k_sq;
            e1_hat[[i, j]] = Complex64::new(0.0, -k1[i]) * phi;
            e2_hat[[i, j]] = Complex64::new(0.0, -k2[j]) * phi;
        }

        let mut e1 = Array2::zeros(self.shape());
        let mut e2 = Array2::zeros(self.shape());
        e1.slice_mut(s![g..g + self.n_q1, g..g + self.n_q2])
            .assign(&ifft2(&e1_hat));
        e2.slice_mut(s![g..g + self.n_q1, g..g + self.n_q2])
            .assign(&ifft2(&e2_hat));
        self.halo(&mut e1)?;
        self.halo(&mut e2)?;

        for level in [
            &mut self.state.centered_at_n,
            &mut self.state.centered_at_n_plus_half,
        ] {
            level.e1 = e1.clone();
            level.e2 = e2.clone();
            level.e3.fill(0.0);
        }
        let yee_e1 = avg_with_prev(&e1, Axis(0));
        let yee_e2 = avg_with_prev(&e2, Axis(1));
        self.state.yee.e1 = yee_e1;
        self.state.yee.e2 = yee_e2;
        self.state.yee.e3.fill(0.0);
        self.communicate_fields()?;
        log::trace!("electrostatic solve on {}x{} interior", self.n_q1, self.n_q2);
        Ok(())
    }

    fn evolve_electrodynamic_fields(
        &mut self,
        j1: &Array2<f64>,
        j2: &Array2<f64>,
        j3: &Array2<f64>,
        dt: f64,
    ) -> VlasovResult<()> {
        self.check_shape(j1, "current J1")?;
        self.check_shape(j2, "current J2")?;
        self.check_shape(j3, "current J3")?;
        let (dq1, dq2) = (self.dq1, self.dq2);
        let old = self.state.yee.clone();

        // E^n -> E^{n+1}
        let curl_b1 = diff_forward(&old.b3, Axis(1), dq2);
        let curl_b2 = -diff_forward(&old.b3, Axis(0), dq1);
        let curl_b3 = diff_forward(&old.b2, Axis(0), dq1) - diff_forward(&old.b1, Axis(1), dq2);
        let mut e1 = &old.e1 + &((curl_b1 - j1) * dt);
        let mut e2 = &old.e2 + &((curl_b2 - j2) * dt);
        let mut e3 = &old.e3 + &((curl_b3 - j3) * dt);
        self.halo(&mut e1)?;
        self.halo(&mut e2)?;
        self.halo(&mut e3)?;

        // B^{n+1/2} -> B^{n+3/2}
        let mut b1 = &old.b1 - &(diff_backward(&e3, Axis(1), dq2) * dt);
        let mut b2 = &old.b2 + &(diff_backward(&e3, Axis(0), dq1) * dt);
        let mut b3 = &old.b3
            - &((diff_backward(&e2, Axis(0), dq1) - diff_backward(&e1, Axis(1), dq2)) * dt);
        self.halo(&mut b1)?;
        self.halo(&mut b2)?;
        self.halo(&mut b3)?;

        let new = FieldComponents::from_arrays([e1, e2, e3, b1, b2, b3])?;
        let old_c = self.yee_to_centered(&old)?;
        let new_c = self.yee_to_centered(&new)?;

        // Level n+1: (E^{n+1}, mean of B^{n+1/2} and B^{n+3/2})
        let mut at_n = new_c.clone();
        at_n.b1 = (&old_c.b1 + &new_c.b1) * 0.5;
        at_n.b2 = (&old_c.b2 + &new_c.b2) * 0.5;
        at_n.b3 = (&old_c.b3 + &new_c.b3) * 0.5;

        // Level n+1/2: (mean of E^n and E^{n+1}, B^{n+1/2})
        let mut at_half = old_c;
        at_half.e1 = (&at_half.e1 + &new_c.e1) * 0.5;
        at_half.e2 = (&at_half.e2 + &new_c.e2) * 0.5;
        at_half.e3 = (&at_half.e3 + &new_c.e3) * 0.5;

        self.state.yee = new;
        self.state.centered_at_n = at_n;
        self.state.centered_at_n_plus_half = at_half;
        Ok(())
    }

    fn get_fields(&self, stagger: Stagger, level: TimeLevel) -> VlasovResult<FieldComponents> {
        let mut out = self.state.centered(level).centered_to(stagger);
        for a in out.iter_mut() {
            self.halo(a)?;
        }
        Ok(out)
    }

    fn state(&self) -> &FieldState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FieldState {
        &mut self.state
    }

    fn communicate_fields(&mut self) -> VlasovResult<()> {
        let g = self.n_ghost;
        for a in self.state.yee.iter_mut() {
            apply_periodic_halo(a, &[Axis(0), Axis(1)], g)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn grid(n1: usize, n2: usize, g: usize) -> PhaseSpaceGrid {
        PhaseSpaceGrid::new(
            [n1, n2, 4, 1, 1],
            [0.0, 0.0, -1.0, -0.5, -0.5],
            [2.0 * PI, 2.0 * PI, 1.0, 0.5, 0.5],
            g,
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_electrostatic_single_mode() {
        // ρ = cos(q1) gives E1 = sin(q1)
        let grid = grid(32, 4, 2);
        let q1 = grid.q1_coords(vlasov_types::state::QLocation::Center);
        let rho = Array2::from_shape_fn((grid.n_q1_total(), grid.n_q2_total()), |(i, _)| {
            q1[i].cos() + 3.0
        });
        let mut solver = PeriodicYeeSolver::new(&grid);
        solver.compute_electrostatic_fields(&rho).unwrap();
        let e = solver.get_fields(Stagger::CenterCenter, TimeLevel::N).unwrap();
        for i in 0..grid.n_q1_total() {
            for j in 0..grid.n_q2_total() {
                assert!(
                    (e.e1[[i, j]] - q1[i].sin()).abs() < 1e-10,
                    "E1[{i},{j}] = {} vs {}",
                    e.e1[[i, j]],
                    q1[i].sin()
                );
                assert!(e.e2[[i, j]].abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_electrostatic_rejects_wrong_shape() {
        let grid = grid(8, 8, 1);
        let mut solver = PeriodicYeeSolver::new(&grid);
        assert!(solver
            .compute_electrostatic_fields(&Array2::zeros((8, 8)))
            .is_err());
    }

    #[test]
    fn test_yee_update_preserves_div_b() {
        let grid = grid(16, 12, 1);
        let (n1, n2) = (grid.n_q1_total(), grid.n_q2_total());
        let mut yee = FieldComponents::zeros((n1, n2));
        // B starts at zero, so its discrete divergence must stay zero
        yee.e3 = Array2::from_shape_fn((n1, n2), |(i, j)| (0.3 * i as f64).sin() * (0.2 * j as f64).cos());
        yee.e1 = Array2::from_shape_fn((n1, n2), |(i, j)| (0.1 * (i + 2 * j) as f64).cos());
        let mut solver = PeriodicYeeSolver::with_yee_fields(&grid, yee).unwrap();
        let j = Array2::from_shape_fn((n1, n2), |(i, j)| 0.01 * (i as f64 - j as f64));
        for _ in 0..5 {
            solver.evolve_electrodynamic_fields(&j, &j, &j, 0.05).unwrap();
        }
        let b = &solver.state().yee;
        // div B at the corner (i, j) from B1 at (i+1/2, j) and B2 at (i, j+1/2)
        for i in 1..n1 {
            for jj in 1..n2 {
                let div = (b.b1[[i, jj]] - b.b1[[i - 1, jj]]) / grid.dq1
                    + (b.b2[[i, jj]] - b.b2[[i, jj - 1]]) / grid.dq2;
                assert!(div.abs() < 1e-11, "div B = {div} at ({i}, {jj})");
            }
        }
    }

    #[test]
    fn test_vacuum_wave_levels() {
        let grid = grid(16, 4, 1);
        let (n1, n2) = (grid.n_q1_total(), grid.n_q2_total());
        let mut yee = FieldComponents::zeros((n1, n2));
        yee.b3 = Array2::from_elem((n1, n2), 2.0);
        let mut solver = PeriodicYeeSolver::with_yee_fields(&grid, yee).unwrap();
        let zero = Array2::zeros((n1, n2));
        solver
            .evolve_electrodynamic_fields(&zero, &zero, &zero, 0.1)
            .unwrap();
        // Uniform B3 has no curl: E stays zero, B unchanged at both levels
        let at_n = solver.get_fields(Stagger::CenterCenter, TimeLevel::N).unwrap();
        let at_half = solver
            .get_fields(Stagger::CenterCenter, TimeLevel::NPlusHalf)
            .unwrap();
        assert!(at_n.e1.iter().all(|v| v.abs() < 1e-14));
        assert!(at_half.b3.iter().all(|v| (v - 2.0).abs() < 1e-14));
        assert!(at_n.b3.iter().all(|v| (v - 2.0).abs() < 1e-14));
    }

    #[test]
    fn test_current_drives_electric_field() {
        let grid = grid(8, 8, 1);
        let (n1, n2) = (grid.n_q1_total(), grid.n_q2_total());
        let mut solver = PeriodicYeeSolver::new(&grid);
        let j1 = Array2::from_elem((n1, n2), 1.5);
        let zero = Array2::zeros((n1, n2));
        solver.evolve_electrodynamic_fields(&j1, &zero, &zero, 0.2).unwrap();
        assert!(solver.state().yee.e1.iter().all(|v| (v + 0.3).abs() < 1e-14));
        let half = solver
            .get_fields(Stagger::LeftCenter, TimeLevel::NPlusHalf)
            .unwrap();
        assert!(half.e1.iter().all(|v| (v + 0.15).abs() < 1e-14));
    }
}
