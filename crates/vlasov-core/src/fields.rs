// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Field Solver Contract
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Electromagnetic field storage and the solver interface the kernel calls.
//!
//! Index `[i, j]` of a staggered array addresses the node
//! `(i + a, j + b)` in cell units, where `(a, b)` is `(1/2, 1/2)` for
//! `CenterCenter`, `(0, 1/2)` for `LeftCenter`, `(1/2, 0)` for `CenterBottom`
//! and `(0, 0)` for `LeftBottom`. On the Yee grid E1 and B2 live at
//! `LeftCenter`, E2 and B1 at `CenterBottom`, E3 at `CenterCenter` and B3 at
//! `LeftBottom`.

use ndarray::{Array2, Axis};
use vlasov_math::stencil::avg_with_prev;
use vlasov_types::error::{VlasovError, VlasovResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stagger {
    CenterCenter,
    LeftCenter,
    CenterBottom,
    LeftBottom,
}

/// Time level of the leapfrog scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLevel {
    N,
    NPlusHalf,
}

impl TimeLevel {
    pub fn flipped(self) -> Self {
        match self {
            TimeLevel::N => TimeLevel::NPlusHalf,
            TimeLevel::NPlusHalf => TimeLevel::N,
        }
    }

    pub fn from_half_step(at_half_step: bool) -> Self {
        if at_half_step {
            TimeLevel::NPlusHalf
        } else {
            TimeLevel::N
        }
    }
}

/// All six components at a single point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldSample {
    pub e1: f64,
    pub e2: f64,
    pub e3: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
}

/// Six `(Nq1_total, Nq2_total)` component arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldComponents {
    pub e1: Array2<f64>,
    pub e2: Array2<f64>,
    pub e3: Array2<f64>,
    pub b1: Array2<f64>,
    pub b2: Array2<f64>,
    pub b3: Array2<f64>,
}

impl FieldComponents {
    pub fn zeros(shape: (usize, usize)) -> Self {
        FieldComponents {
            e1: Array2::zeros(shape),
            e2: Array2::zeros(shape),
            e3: Array2::zeros(shape),
            b1: Array2::zeros(shape),
            b2: Array2::zeros(shape),
            b3: Array2::zeros(shape),
        }
    }

    /// Build from six arrays, checking they share one shape.
    pub fn from_arrays(arrays: [Array2<f64>; 6]) -> VlasovResult<Self> {
        let shape = arrays[0].shape().to_vec();
        for a in &arrays[1..] {
            if a.shape() != shape.as_slice() {
                return Err(VlasovError::shape("field components", &shape, a.shape()));
            }
        }
        let [e1, e2, e3, b1, b2, b3] = arrays;
        Ok(FieldComponents {
            e1,
            e2,
            e3,
            b1,
            b2,
            b3,
        })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.e1.dim()
    }

    pub fn sample(&self, i: usize, j: usize) -> FieldSample {
        FieldSample {
            e1: self.e1[[i, j]],
            e2: self.e2[[i, j]],
            e3: self.e3[[i, j]],
            b1: self.b1[[i, j]],
            b2: self.b2[[i, j]],
            b3: self.b3[[i, j]],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Array2<f64>> {
        [&self.e1, &self.e2, &self.e3, &self.b1, &self.b2, &self.b3].into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Array2<f64>> {
        [
            &mut self.e1,
            &mut self.e2,
            &mut self.e3,
            &mut self.b1,
            &mut self.b2,
            &mut self.b3,
        ]
        .into_iter()
    }

    /// Interpolate cell-centred components to another stagger.
    pub fn centered_to(&self, stagger: Stagger) -> FieldComponents {
        let map = |a: &Array2<f64>| match stagger {
            Stagger::CenterCenter => a.clone(),
            Stagger::LeftCenter => avg_with_prev(a, Axis(0)),
            Stagger::CenterBottom => avg_with_prev(a, Axis(1)),
            Stagger::LeftBottom => avg_with_prev(&avg_with_prev(a, Axis(0)), Axis(1)),
        };
        FieldComponents {
            e1: map(&self.e1),
            e2: map(&self.e2),
            e3: map(&self.e3),
            b1: map(&self.b1),
            b2: map(&self.b2),
            b3: map(&self.b3),
        }
    }
}

/// Yee-grid fields plus cell-centred copies at both leapfrog levels.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub yee: FieldComponents,
    pub centered_at_n: FieldComponents,
    pub centered_at_n_plus_half: FieldComponents,
}

impl FieldState {
    pub fn zeros(shape: (usize, usize)) -> Self {
        FieldState {
            yee: FieldComponents::zeros(shape),
            centered_at_n: FieldComponents::zeros(shape),
            centered_at_n_plus_half: FieldComponents::zeros(shape),
        }
    }

    pub fn centered(&self, level: TimeLevel) -> &FieldComponents {
        match level {
            TimeLevel::N => &self.centered_at_n,
            TimeLevel::NPlusHalf => &self.centered_at_n_plus_half,
        }
    }
}

/// Field solver driven by the coupling stage.
///
/// Implementations own their [`FieldState`]; the kernel only reaches it through
/// these calls.
pub trait FieldSolver: Send {
    /// Solve Poisson's equation for the given charge density and store E.
    fn compute_electrostatic_fields(&mut self, rho: &Array2<f64>) -> VlasovResult<()>;

    /// Leapfrog step: E^n to E^{n+1}, B^{n+1/2} to B^{n+3/2}, with currents at
    /// the E staggers (J1 `LeftCenter`, J2 `CenterBottom`, J3 `CenterCenter`).
    fn evolve_electrodynamic_fields(
        &mut self,
        j1: &Array2<f64>,
        j2: &Array2<f64>,
        j3: &Array2<f64>,
        dt: f64,
    ) -> VlasovResult<()>;

    /// Fields interpolated to `stagger` at `level`.
    fn get_fields(&self, stagger: Stagger, level: TimeLevel) -> VlasovResult<FieldComponents>;

    fn state(&self) -> &FieldState;

    fn state_mut(&mut self) -> &mut FieldState;

    /// Refresh the ghost cells of the Yee components.
    fn communicate_fields(&mut self) -> VlasovResult<()> {
        Ok(())
    }
}
