// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Moments
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Velocity-space integrals of the distribution function.

use ndarray::{Array1, Array3, ArrayView4, Axis, Zip};
use std::ops::{Add, Mul};
use std::str::FromStr;
use vlasov_types::error::{VlasovError, VlasovResult};
use vlasov_types::state::{MomentumFace, PhaseSpaceGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Moment {
    /// `∫ f d³p`
    Density,
    /// `∫ p1 f d³p`
    MomV1Bulk,
    MomV2Bulk,
    MomV3Bulk,
    /// `∫ ½|p|² f d³p`
    Energy,
}

impl FromStr for Moment {
    type Err = VlasovError;

    fn from_str(s: &str) -> VlasovResult<Self> {
        match s {
            "density" => Ok(Moment::Density),
            "mom_v1_bulk" => Ok(Moment::MomV1Bulk),
            "mom_v2_bulk" => Ok(Moment::MomV2Bulk),
            "mom_v3_bulk" => Ok(Moment::MomV3Bulk),
            "energy" => Ok(Moment::Energy),
            other => Err(VlasovError::unknown("moment", other)),
        }
    }
}

/// Quadrature over the interior momentum cells of a grid.
#[derive(Debug, Clone)]
pub struct MomentIntegrator {
    p1: Array1<f64>,
    p2: Array1<f64>,
    p3: Array1<f64>,
    /// Interior mask times the cell volume.
    volume: Array1<f64>,
}

impl MomentIntegrator {
    pub fn new(grid: &PhaseSpaceGrid) -> Self {
        let [p1, p2, p3] = grid.p_coords(MomentumFace::Center);
        let volume = grid.p_interior_mask() * grid.dp3_volume();
        MomentIntegrator { p1, p2, p3, volume }
    }

    pub fn n_p(&self) -> usize {
        self.volume.len()
    }

    pub fn p_centers(&self) -> [&Array1<f64>; 3] {
        [&self.p1, &self.p2, &self.p3]
    }

    /// Quadrature weights `g(p) dp³` for a moment kernel `g`.
    pub fn weights(&self, moment: Moment) -> Array1<f64> {
        let kernel = |k: usize| match moment {
            Moment::Density => 1.0,
            Moment::MomV1Bulk => self.p1[k],
            Moment::MomV2Bulk => self.p2[k],
            Moment::MomV3Bulk => self.p3[k],
            Moment::Energy => 0.5 * (self.p1[k].powi(2) + self.p2[k].powi(2) + self.p3[k].powi(2)),
        };
        Array1::from_shape_fn(self.n_p(), |k| kernel(k) * self.volume[k])
    }

    /// Moment of a q-expanded `(Nq1, Nq2, Ns, Np)` array, shape `(Nq1, Nq2, Ns)`.
    pub fn compute<T>(&self, moment: Moment, f: ArrayView4<'_, T>) -> VlasovResult<Array3<T>>
    where
        T: Copy + Default + Add<Output = T> + Mul<f64, Output = T> + Send + Sync,
    {
        self.integrate(&self.weights(moment), f)
    }

    /// Contract the momentum axis of `f` against arbitrary weights.
    pub fn integrate<T>(&self, weights: &Array1<f64>, f: ArrayView4<'_, T>) -> VlasovResult<Array3<T>>
    where
        T: Copy + Default + Add<Output = T> + Mul<f64, Output = T> + Send + Sync,
    {
        let (n1, n2, ns, np) = f.dim();
        if np != weights.len() {
            return Err(VlasovError::shape(
                "moment integration",
                &[n1, n2, ns, weights.len()],
                f.shape(),
            ));
        }
        let mut out = Array3::from_elem((n1, n2, ns), T::default());
        Zip::from(&mut out)
            .and(f.lanes(Axis(3)))
            .par_for_each(|m, lane| {
                *m = lane
                    .iter()
                    .zip(weights.iter())
                    .fold(T::default(), |acc, (&v, &w)| acc + v * w);
            });
        Ok(out)
    }
}
