// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Advection Models
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Phase-space transport coefficients.
//!
//! A model gives the characteristic speeds `C_q = dq/dt` and `C_p = dp/dt` at a
//! single phase-space point. The grid evaluators below sample a model over a
//! whole tile at the face locations the kernel needs.

use crate::fields::{FieldComponents, FieldSample};
use ndarray::{Array4, Zip};
use vlasov_types::error::{VlasovError, VlasovResult};
use vlasov_types::state::{MomentumFace, PhaseSpaceGrid, QLocation, Species};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseSpacePoint {
    pub t: f64,
    pub q1: f64,
    pub q2: f64,
    pub p1: f64,
    pub p2: f64,
    pub p3: f64,
}

pub trait AdvectionModel: Send + Sync {
    /// `(C_q1, C_q2)`.
    fn c_q(&self, point: &PhaseSpacePoint, species: &Species) -> (f64, f64);

    /// `(C_p1, C_p2, C_p3)` given the fields at the point.
    fn c_p(&self, point: &PhaseSpacePoint, fields: &FieldSample, species: &Species) -> (f64, f64, f64);
}

/// Non-relativistic Vlasov: `C_q = (p1, p2)`, `C_p = q/m (E + p × B)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonrelativisticBoltzmann;

impl AdvectionModel for NonrelativisticBoltzmann {
    fn c_q(&self, point: &PhaseSpacePoint, _species: &Species) -> (f64, f64) {
        (point.p1, point.p2)
    }

    fn c_p(&self, point: &PhaseSpacePoint, fields: &FieldSample, species: &Species) -> (f64, f64, f64) {
        let qm = species.charge / species.mass;
        let (p1, p2, p3) = (point.p1, point.p2, point.p3);
        (
            qm * (fields.e1 + p2 * fields.b3 - p3 * fields.b2),
            qm * (fields.e2 + p3 * fields.b1 - p1 * fields.b3),
            qm * (fields.e3 + p1 * fields.b2 - p2 * fields.b1),
        )
    }
}

/// Where and when a coefficient array is sampled.
#[derive(Debug, Clone, Copy)]
pub struct SampleLocation {
    pub t: f64,
    pub q1: QLocation,
    pub q2: QLocation,
    pub p: MomentumFace,
}

/// `[C_q1, C_q2]` over the q-expanded tile.
pub fn c_q_on_grid(
    model: &dyn AdvectionModel,
    grid: &PhaseSpaceGrid,
    species: &[Species],
    at: SampleLocation,
) -> [Array4<f64>; 2] {
    let q1 = grid.q1_coords(at.q1);
    let q2 = grid.q2_coords(at.q2);
    let [p1, p2, p3] = grid.p_coords(at.p);
    let shape = (q1.len(), q2.len(), species.len(), p1.len());
    let mut c1 = Array4::zeros(shape);
    let mut c2 = Array4::zeros(shape);
    Zip::indexed(&mut c1)
        .and(&mut c2)
        .par_for_each(|(i, j, s, k), a, b| {
            let point = PhaseSpacePoint {
                t: at.t,
                q1: q1[i],
                q2: q2[j],
                p1: p1[k],
                p2: p2[k],
                p3: p3[k],
            };
            let (v1, v2) = model.c_q(&point, &species[s]);
            *a = v1;
            *b = v2;
        });
    [c1, c2]
}

/// `[C_p1, C_p2, C_p3]` over the q-expanded tile, with `fields` already
/// interpolated to the position stagger named in `at`.
pub fn c_p_on_grid(
    model: &dyn AdvectionModel,
    grid: &PhaseSpaceGrid,
    species: &[Species],
    fields: &FieldComponents,
    at: SampleLocation,
) -> VlasovResult<[Array4<f64>; 3]> {
    let q1 = grid.q1_coords(at.q1);
    let q2 = grid.q2_coords(at.q2);
    if fields.dim() != (q1.len(), q2.len()) {
        return Err(VlasovError::shape(
            "momentum coefficients",
            &[q1.len(), q2.len()],
            &[fields.dim().0, fields.dim().1],
        ));
    }
    let [p1, p2, p3] = grid.p_coords(at.p);
    let shape = (q1.len(), q2.len(), species.len(), p1.len());
    let mut c1 = Array4::zeros(shape);
    let mut c2 = Array4::zeros(shape);
    let mut c3 = Array4::zeros(shape);
    Zip::indexed(&mut c1)
        .and(&mut c2)
        .and(&mut c3)
        .par_for_each(|(i, j, s, k), a, b, c| {
            let point = PhaseSpacePoint {
                t: at.t,
                q1: q1[i],
                q2: q2[j],
                p1: p1[k],
                p2: p2[k],
                p3: p3[k],
            };
            let (v1, v2, v3) = model.c_p(&point, &fields.sample(i, j), &species[s]);
            *a = v1;
            *b = v2;
            *c = v3;
        });
    Ok([c1, c2, c3])
}
