// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Field Coupling
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Feeds charge and current moments of f to the field solver.
//!
//! Electrodynamic coupling runs on a leapfrog: the field update happens only
//! on the half-step call, and every electrodynamic call flips the stage's
//! time level exactly once.

use crate::fields::{FieldComponents, FieldSolver, TimeLevel};
use crate::moments::{Moment, MomentIntegrator};
use crate::source::VACUUM_DENSITY;
use ndarray::{Array2, Array4, Axis};
use vlasov_math::stencil::{avg_with_next, avg_with_prev, central_diff4, diff_forward};
use vlasov_types::config::{FieldModel, FieldOptions};
use vlasov_types::error::{VlasovError, VlasovResult};
use vlasov_types::state::{PhaseSpaceGrid, Species};

/// The distribution function sampled at the three current staggers.
#[derive(Debug, Clone, Copy)]
pub struct FaceDistributions<'a> {
    /// Cell centre `(i+1/2, j+1/2)`.
    pub center: &'a Array4<f64>,
    /// q1 face `(i, j+1/2)`.
    pub q1_left: &'a Array4<f64>,
    /// q2 face `(i+1/2, j)`.
    pub q2_bottom: &'a Array4<f64>,
}

/// Ohm's-law electric field and the curl-derived current, each on its Yee stagger.
#[derive(Debug, Clone)]
pub struct HybridFields {
    pub e1: Array2<f64>,
    pub e2: Array2<f64>,
    pub e3: Array2<f64>,
    pub j1: Array2<f64>,
    pub j2: Array2<f64>,
    pub j3: Array2<f64>,
}

/// Density and bulk velocity of the single kinetic species.
struct Fluid {
    n: Array2<f64>,
    v1: Array2<f64>,
    v2: Array2<f64>,
    v3: Array2<f64>,
}

#[derive(Debug, Clone)]
pub struct FieldCouplingStage {
    options: FieldOptions,
    species: Vec<Species>,
    integrator: MomentIntegrator,
    dq1: f64,
    dq2: f64,
    dt: f64,
    time_level: TimeLevel,
}

impl FieldCouplingStage {
    pub fn new(
        options: FieldOptions,
        species: &[Species],
        grid: &PhaseSpaceGrid,
        dt: f64,
    ) -> VlasovResult<Self> {
        if species.is_empty() {
            return Err(VlasovError::ConfigError(
                "field coupling needs at least one species".to_string(),
            ));
        }
        if options.model == FieldModel::ElectrodynamicHybrid && species.len() != 1 {
            return Err(VlasovError::ConfigError(format!(
                "hybrid Ohm's law expects a single kinetic ion species, got {}",
                species.len()
            )));
        }
        // The 4th-order density gradient averaged to a face reaches three
        // cells out; with no halo the wrap-around is itself periodic.
        if options.model == FieldModel::ElectrodynamicHybrid && matches!(grid.n_ghost_q, 1 | 2) {
            return Err(VlasovError::ConfigError(format!(
                "hybrid Ohm's law needs n_ghost_q >= 3 (or 0 for a single periodic tile), got {}",
                grid.n_ghost_q
            )));
        }
        Ok(FieldCouplingStage {
            options,
            species: species.to_vec(),
            integrator: MomentIntegrator::new(grid),
            dq1: grid.dq1,
            dq2: grid.dq2,
            dt,
            time_level: TimeLevel::N,
        })
    }

    /// Start the leapfrog from a given level.
    pub fn with_time_level(mut self, level: TimeLevel) -> Self {
        self.time_level = level;
        self
    }

    pub fn time_level(&self) -> TimeLevel {
        self.time_level
    }

    pub fn model(&self) -> FieldModel {
        self.options.model
    }

    /// Update the solver's fields from `faces` and return the time level the
    /// momentum coefficients should be evaluated at.
    pub fn couple(
        &mut self,
        faces: &FaceDistributions<'_>,
        solver: &mut dyn FieldSolver,
        caller_level: TimeLevel,
    ) -> VlasovResult<TimeLevel> {
        match self.options.model {
            FieldModel::Electrostatic => {
                let rho = self.charge_weighted(Moment::Density, faces.center)?;
                solver.compute_electrostatic_fields(&rho)?;
                Ok(caller_level)
            }
            FieldModel::ElectrodynamicDirect | FieldModel::ElectrodynamicHybrid => {
                let active = self.time_level;
                if active == TimeLevel::NPlusHalf {
                    let (j1, j2, j3) = if self.options.model == FieldModel::ElectrodynamicHybrid {
                        solver.communicate_fields()?;
                        let h = self.hybrid_fields(faces, &solver.state().yee)?;
                        let yee = &mut solver.state_mut().yee;
                        yee.e1 = h.e1;
                        yee.e2 = h.e2;
                        yee.e3 = h.e3;
                        (h.j1, h.j2, h.j3)
                    } else {
                        self.direct_currents(faces)?
                    };
                    solver.evolve_electrodynamic_fields(&j1, &j2, &j3, self.dt)?;
                }
                self.time_level = active.flipped();
                log::trace!(
                    "electrodynamic coupling at {:?}, next {:?}",
                    active,
                    self.time_level
                );
                Ok(active)
            }
        }
    }

    /// `Σ_s q_s · moment_s(f)`.
    pub fn charge_weighted(&self, moment: Moment, f: &Array4<f64>) -> VlasovResult<Array2<f64>> {
        let m = self.integrator.compute(moment, f.view())?;
        let (n1, n2, ns) = m.dim();
        if ns != self.species.len() {
            return Err(VlasovError::shape(
                "charge-weighted moment",
                &[n1, n2, self.species.len()],
                &[n1, n2, ns],
            ));
        }
        let mut out = Array2::zeros((n1, n2));
        for (s, sp) in self.species.iter().enumerate() {
            out.scaled_add(sp.charge, &m.index_axis(Axis(2), s));
        }
        Ok(out)
    }

    /// Kinetic currents at the E staggers: J1 from the q1 face, J2 from the q2
    /// face, J3 from the cell centre.
    pub fn direct_currents(
        &self,
        faces: &FaceDistributions<'_>,
    ) -> VlasovResult<(Array2<f64>, Array2<f64>, Array2<f64>)> {
        Ok((
            self.charge_weighted(Moment::MomV1Bulk, faces.q1_left)?,
            self.charge_weighted(Moment::MomV2Bulk, faces.q2_bottom)?,
            self.charge_weighted(Moment::MomV3Bulk, faces.center)?,
        ))
    }

    fn fluid(&self, f: &Array4<f64>) -> VlasovResult<Fluid> {
        let single = |moment: Moment| -> VlasovResult<Array2<f64>> {
            Ok(self
                .integrator
                .compute(moment, f.view())?
                .index_axis(Axis(2), 0)
                .to_owned())
        };
        // Floor vacuum cells so the Ohm's-law divisions stay finite; their
        // momenta vanish with f, so the bulk velocity there is zero.
        let raw = single(Moment::Density)?;
        let n_vacuum = raw.iter().filter(|&&v| v < VACUUM_DENSITY).count();
        if n_vacuum > 0 {
            log::warn!("hybrid Ohm's law: {n_vacuum} vacuum cells floored to density {VACUUM_DENSITY:e}");
        }
        let n = raw.mapv(|v| v.max(VACUUM_DENSITY));
        Ok(Fluid {
            v1: single(Moment::MomV1Bulk)? / &n,
            v2: single(Moment::MomV2Bulk)? / &n,
            v3: single(Moment::MomV3Bulk)? / &n,
            n,
        })
    }

    /// Generalized Ohm's law `E = -(v×B) + (J×B)/(e n) - T_e ∇n/(e n)` with
    /// `J = ∇×B / μ`, every product formed at the stagger of the E component.
    pub fn hybrid_fields(
        &self,
        faces: &FaceDistributions<'_>,
        yee: &FieldComponents,
    ) -> VlasovResult<HybridFields> {
        let charge = self.species[0].charge;
        let mu = self.options.mu;
        let t_e = self.options.electron_temperature;
        let (dq1, dq2) = (self.dq1, self.dq2);
        let (b1, b2, b3) = (&yee.b1, &yee.b2, &yee.b3);

        // Ampère without displacement current
        let j1 = diff_forward(b3, Axis(1), dq2) / mu; // (i, j+1/2)
        let j2 = -diff_forward(b3, Axis(0), dq1) / mu; // (i+1/2, j)
        let j3 = (diff_forward(b2, Axis(0), dq1) - diff_forward(b1, Axis(1), dq2)) / mu; // (i+1/2, j+1/2)

        let left = self.fluid(faces.q1_left)?;
        let bottom = self.fluid(faces.q2_bottom)?;
        let center = self.fluid(faces.center)?;
        if left.n.dim() != b1.dim() {
            return Err(VlasovError::shape(
                "hybrid fields",
                b1.shape(),
                left.n.shape(),
            ));
        }

        let dn1 = central_diff4(&center.n, Axis(0), dq1);
        let dn2 = central_diff4(&center.n, Axis(1), dq2);

        // E1 at (i, j+1/2)
        let b3_e1 = avg_with_next(b3, Axis(1));
        let j2_e1 = avg_with_prev(&avg_with_next(&j2, Axis(1)), Axis(0));
        let j3_e1 = avg_with_prev(&j3, Axis(0));
        let en_e1 = &left.n * charge;
        let e1 = -(&left.v2 * &b3_e1 - &left.v3 * b2)
            + (&j2_e1 * &b3_e1 - &j3_e1 * b2) / &en_e1
            - avg_with_prev(&dn1, Axis(0)) * t_e / &en_e1;

        // E2 at (i+1/2, j)
        let b3_e2 = avg_with_next(b3, Axis(0));
        let j1_e2 = avg_with_prev(&avg_with_next(&j1, Axis(0)), Axis(1));
        let j3_e2 = avg_with_prev(&j3, Axis(1));
        let en_e2 = &bottom.n * charge;
        let e2 = -(&bottom.v3 * b1 - &bottom.v1 * &b3_e2)
            + (&j3_e2 * b1 - &j1_e2 * &b3_e2) / &en_e2
            - avg_with_prev(&dn2, Axis(1)) * t_e / &en_e2;

        // E3 at (i+1/2, j+1/2)
        let b1_e3 = avg_with_next(b1, Axis(1));
        let b2_e3 = avg_with_next(b2, Axis(0));
        let j1_e3 = avg_with_next(&j1, Axis(0));
        let j2_e3 = avg_with_next(&j2, Axis(1));
        let en_e3 = &center.n * charge;
        let e3 = -(&center.v1 * &b2_e3 - &center.v2 * &b1_e3)
            + (&j1_e3 * &b2_e3 - &j2_e3 * &b1_e3) / &en_e3;

        Ok(HybridFields {
            e1,
            e2,
            e3,
            j1,
            j2,
            j3,
        })
    }
}
