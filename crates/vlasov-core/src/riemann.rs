// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Riemann Solvers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Numerical fluxes at cell faces.
//!
//! `left` always means the state on the low side of a face (the high-side
//! extrapolation of cell `i-1`), `right` the state on the high side (the
//! low-side extrapolation of cell `i`).

use ndarray::{Array, ArrayView, Dimension, Zip};
use std::str::FromStr;
use vlasov_types::error::{VlasovError, VlasovResult};
use vlasov_types::state::PhaseSpaceGrid;

pub use vlasov_types::config::RiemannScheme;

/// Phase-space axis a flux is resolved along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FluxDimension {
    Q1,
    Q2,
    P1,
    P2,
    P3,
}

impl FluxDimension {
    fn index(self) -> usize {
        match self {
            FluxDimension::Q1 => 0,
            FluxDimension::Q2 => 1,
            FluxDimension::P1 => 2,
            FluxDimension::P2 => 3,
            FluxDimension::P3 => 4,
        }
    }
}

impl FromStr for FluxDimension {
    type Err = VlasovError;

    fn from_str(s: &str) -> VlasovResult<Self> {
        match s {
            "q1" => Ok(FluxDimension::Q1),
            "q2" => Ok(FluxDimension::Q2),
            "p1" => Ok(FluxDimension::P1),
            "p2" => Ok(FluxDimension::P2),
            "p3" => Ok(FluxDimension::P3),
            other => Err(VlasovError::unknown("flux dimension", other)),
        }
    }
}

fn broadcast_speed<'a, D: Dimension>(
    speed: &'a Array<f64, D>,
    target: &D,
    context: &'static str,
) -> VlasovResult<ArrayView<'a, f64, D>> {
    speed
        .broadcast(target.clone())
        .ok_or_else(|| VlasovError::shape(context, target.slice(), speed.shape()))
}

/// First-order upwind selection: `left` where `velocity > 0`, else `right`.
///
/// `velocity` is broadcast to the state shape when its extents differ.
pub fn upwind_flux<D: Dimension>(
    left: &Array<f64, D>,
    right: &Array<f64, D>,
    velocity: &Array<f64, D>,
) -> VlasovResult<Array<f64, D>> {
    if left.shape() != right.shape() {
        return Err(VlasovError::shape("upwind flux", left.shape(), right.shape()));
    }
    let v = broadcast_speed(velocity, &left.raw_dim(), "upwind flux")?;
    Ok(Zip::from(left)
        .and(right)
        .and(&v)
        .par_map_collect(|&l, &r, &c| if c > 0.0 { l } else { r }))
}

/// Local Lax-Friedrichs flux:
/// `0.5 * (left_flux + right_flux) - 0.5 * c_lax * (right_f - left_f)`.
pub fn lax_friedrichs_flux<D: Dimension>(
    left_flux: &Array<f64, D>,
    right_flux: &Array<f64, D>,
    left_f: &Array<f64, D>,
    right_f: &Array<f64, D>,
    c_lax: f64,
) -> VlasovResult<Array<f64, D>> {
    let shape = left_flux.shape();
    for other in [right_flux, left_f, right_f] {
        if other.shape() != shape {
            return Err(VlasovError::shape("lax-friedrichs flux", shape, other.shape()));
        }
    }
    Ok(Zip::from(left_flux)
        .and(right_flux)
        .and(left_f)
        .and(right_f)
        .par_map_collect(|&fl, &fr, &ul, &ur| 0.5 * (fl + fr) - 0.5 * c_lax * (ur - ul)))
}

/// Scheme bound to the per-dimension dissipation coefficients `dt / d(dim)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiemannSolver {
    scheme: RiemannScheme,
    c_lax: [f64; 5],
}

impl RiemannSolver {
    pub fn new(scheme: RiemannScheme, dt: f64, grid: &PhaseSpaceGrid) -> Self {
        let widths = [grid.dq1, grid.dq2, grid.dp1, grid.dp2, grid.dp3];
        RiemannSolver {
            scheme,
            c_lax: widths.map(|w| dt / w),
        }
    }

    pub fn scheme(&self) -> RiemannScheme {
        self.scheme
    }

    pub fn c_lax(&self, dim: FluxDimension) -> f64 {
        self.c_lax[dim.index()]
    }

    /// Numerical flux `C·f` through each low face.
    pub fn face_flux<D: Dimension>(
        &self,
        left_f: &Array<f64, D>,
        right_f: &Array<f64, D>,
        speed: &Array<f64, D>,
        dim: FluxDimension,
    ) -> VlasovResult<Array<f64, D>> {
        let c = broadcast_speed(speed, &left_f.raw_dim(), "face flux")?;
        match self.scheme {
            RiemannScheme::Upwind => {
                let state = upwind_flux(left_f, right_f, speed)?;
                Ok(state * &c)
            }
            RiemannScheme::LaxFriedrichs => {
                if right_f.shape() != left_f.shape() {
                    return Err(VlasovError::shape(
                        "face flux",
                        left_f.shape(),
                        right_f.shape(),
                    ));
                }
                let left_flux = left_f * &c;
                let right_flux = right_f * &c;
                lax_friedrichs_flux(&left_flux, &right_flux, left_f, right_f, self.c_lax(dim))
            }
        }
    }

    /// Face-valued distribution used for moments at faces: the upwind state,
    /// or the mean of the two states for Lax-Friedrichs.
    pub fn face_value<D: Dimension>(
        &self,
        left_f: &Array<f64, D>,
        right_f: &Array<f64, D>,
        speed: &Array<f64, D>,
    ) -> VlasovResult<Array<f64, D>> {
        match self.scheme {
            RiemannScheme::Upwind => upwind_flux(left_f, right_f, speed),
            RiemannScheme::LaxFriedrichs => {
                if right_f.shape() != left_f.shape() {
                    return Err(VlasovError::shape(
                        "face value",
                        left_f.shape(),
                        right_f.shape(),
                    ));
                }
                Ok(Zip::from(left_f)
                    .and(right_f)
                    .par_map_collect(|&l, &r| 0.5 * (l + r)))
            }
        }
    }
}
