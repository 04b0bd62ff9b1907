// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Phase-Space Flux Assembler
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Finite-volume right-hand side `df/dt` of the Vlasov equation.
//!
//! ```text
//!                  (i+1/2, j+1)
//!              X-------o-------X
//!              |               |
//!   (i, j+1/2) o       o       o (i+1, j+1/2)
//!              | (i+1/2, j+1/2)|
//!              X-------o-------X
//!                  (i+1/2, j)
//! ```
//!
//! Every cell stores its own low faces (`left` along q1/p1, `bottom` along
//! q2/p2, `back` along p3). The flux through the high face of cell `i` is the
//! low-face flux of cell `i+1`, obtained by a one-cell shift, so adjacent
//! cells see bit-identical face fluxes.

use crate::advection::{c_p_on_grid, c_q_on_grid, AdvectionModel, NonrelativisticBoltzmann, SampleLocation};
use crate::coupling::{FaceDistributions, FieldCouplingStage};
use crate::fields::{FieldSolver, Stagger, TimeLevel};
use crate::layout::PhaseSpaceLayout;
use crate::reconstruct::{provider_for, FaceValueProvider};
use crate::riemann::{FluxDimension, RiemannSolver};
use crate::source::{BgkRelaxation, SourceTerm};
use ndarray::{Array4, Axis};
use std::str::FromStr;
use vlasov_math::shift::shift;
use vlasov_types::config::{ResolvedOptions, SimulationConfig, SolverMethod};
use vlasov_types::error::{VlasovError, VlasovResult};
use vlasov_types::state::{MomentumFace, PhaseSpaceGrid, QLocation, Species};

/// Which part of `df/dt` to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfDtTerm {
    /// The full right-hand side.
    All,
    /// `-(right-left)/dq1 - (top-bottom)/dq2` plus the source.
    PositionContribution,
    /// `(right-left)/dp1` of the momentum flux, sign as a divergence.
    DFluxP1Dp1,
    DFluxP2Dp2,
    DFluxP3Dp3,
}

impl FromStr for DfDtTerm {
    type Err = VlasovError;

    fn from_str(s: &str) -> VlasovResult<Self> {
        match s {
            "all" => Ok(DfDtTerm::All),
            "position_contribution" => Ok(DfDtTerm::PositionContribution),
            "d_flux_p1_dp1" => Ok(DfDtTerm::DFluxP1Dp1),
            "d_flux_p2_dp2" => Ok(DfDtTerm::DFluxP2Dp2),
            "d_flux_p3_dp3" => Ok(DfDtTerm::DFluxP3Dp3),
            other => Err(VlasovError::unknown("df/dt term", other)),
        }
    }
}

/// Position-space face quantities of one call, all q-expanded.
#[derive(Debug, Clone)]
pub struct PositionFaces {
    /// `C_q1` at `(i, j+1/2)`.
    pub c_q1: Array4<f64>,
    /// `C_q2` at `(i+1/2, j)`.
    pub c_q2: Array4<f64>,
    pub left_flux: Array4<f64>,
    pub bottom_flux: Array4<f64>,
    /// Face-valued f at the q1 face, as seen by the Riemann solver.
    pub f_q1_left: Array4<f64>,
    /// Face-valued f at the q2 face.
    pub f_q2_bottom: Array4<f64>,
}

/// Momentum-space coefficients at the low p faces, q-expanded.
#[derive(Debug, Clone)]
pub struct MomentumFaces {
    pub c_p1: Array4<f64>,
    pub c_p2: Array4<f64>,
    pub c_p3: Array4<f64>,
    /// Field time level the coefficients were evaluated at.
    pub level: TimeLevel,
}

/// Positive flux divergences along the three momentum axes, at cell centres.
#[derive(Debug, Clone)]
pub struct MomentumDivergence {
    pub d_flux_p1_dp1: Array4<f64>,
    pub d_flux_p2_dp2: Array4<f64>,
    pub d_flux_p3_dp3: Array4<f64>,
}

pub struct PhaseSpaceFluxAssembler {
    grid: PhaseSpaceGrid,
    layout: PhaseSpaceLayout,
    species: Vec<Species>,
    position_enabled: bool,
    energy_conserving: bool,
    riemann_q: RiemannSolver,
    riemann_p: RiemannSolver,
    reconstruct_q: Box<dyn FaceValueProvider>,
    reconstruct_p: Box<dyn FaceValueProvider>,
    model: Box<dyn AdvectionModel>,
    source: Option<Box<dyn SourceTerm>>,
    /// Present exactly when the momentum stage runs.
    coupling: Option<FieldCouplingStage>,
}

impl PhaseSpaceFluxAssembler {
    pub fn new(
        grid: PhaseSpaceGrid,
        options: &ResolvedOptions,
        model: Box<dyn AdvectionModel>,
    ) -> VlasovResult<Self> {
        if options.species.is_empty() {
            return Err(VlasovError::ConfigError(
                "flux assembler needs at least one species".to_string(),
            ));
        }
        let source: Option<Box<dyn SourceTerm>> = match options.source_tau {
            Some(tau) => Some(Box::new(BgkRelaxation::new(&grid, tau)?)),
            None => None,
        };
        let coupling = match (options.method_p, options.fields) {
            (SolverMethod::FiniteVolume, Some(fields)) => Some(FieldCouplingStage::new(
                fields,
                &options.species,
                &grid,
                options.dt,
            )?),
            _ => None,
        };
        let position_enabled = options.method_q == SolverMethod::FiniteVolume;
        log::debug!(
            "flux assembler: {} species, position stage {}, momentum stage {}, energy conserving {}",
            options.species.len(),
            position_enabled,
            coupling.is_some(),
            options.energy_conserving
        );
        Ok(PhaseSpaceFluxAssembler {
            layout: PhaseSpaceLayout::from_grid(&grid, options.species.len()),
            species: options.species.clone(),
            position_enabled,
            energy_conserving: options.energy_conserving,
            riemann_q: RiemannSolver::new(options.riemann_q, options.dt, &grid),
            riemann_p: RiemannSolver::new(options.riemann_p, options.dt, &grid),
            reconstruct_q: provider_for(options.reconstruction_q),
            reconstruct_p: provider_for(options.reconstruction_p),
            model,
            source,
            coupling,
            grid,
        })
    }

    /// Grid, options and the non-relativistic model straight from a config file.
    pub fn from_config(config: &SimulationConfig) -> VlasovResult<Self> {
        let grid = config.create_grid()?;
        let options = config.resolve()?;
        Self::new(grid, &options, Box::new(NonrelativisticBoltzmann))
    }

    /// Replace the q-space reconstruction.
    pub fn with_position_reconstruction(mut self, provider: Box<dyn FaceValueProvider>) -> Self {
        self.reconstruct_q = provider;
        self
    }

    /// Replace the p-space reconstruction.
    pub fn with_momentum_reconstruction(mut self, provider: Box<dyn FaceValueProvider>) -> Self {
        self.reconstruct_p = provider;
        self
    }

    /// Replace (or remove) the source term.
    pub fn with_source(mut self, source: Option<Box<dyn SourceTerm>>) -> Self {
        self.source = source;
        self
    }

    pub fn grid(&self) -> &PhaseSpaceGrid {
        &self.grid
    }

    pub fn layout(&self) -> &PhaseSpaceLayout {
        &self.layout
    }

    pub fn coupling(&self) -> Option<&FieldCouplingStage> {
        self.coupling.as_ref()
    }

    pub fn position_enabled(&self) -> bool {
        self.position_enabled
    }

    pub fn momentum_enabled(&self) -> bool {
        self.coupling.is_some()
    }

    fn check_term(&self, term: DfDtTerm) -> VlasovResult<()> {
        let available = match term {
            DfDtTerm::All => true,
            DfDtTerm::PositionContribution => self.position_enabled,
            DfDtTerm::DFluxP1Dp1 | DfDtTerm::DFluxP2Dp2 | DfDtTerm::DFluxP3Dp3 => {
                self.momentum_enabled()
            }
        };
        if available {
            Ok(())
        } else {
            Err(VlasovError::ConfigError(format!(
                "{term:?} requested but the stage producing it is disabled"
            )))
        }
    }

    /// Evaluate `df/dt` (or one of its parts) for the q-expanded `f`.
    ///
    /// Both enabled stages always run, so every call advances the field
    /// coupling exactly once regardless of the requested term. The halo of
    /// `f` must be valid.
    ///
    /// `time` is the physical time of this evaluation and is the only input
    /// to the transport coefficients: a driver evaluating at the half step
    /// passes the half-step time. `at_half_step` selects the field level of
    /// the non-conserving momentum stage and of electrostatic coupling.
    pub fn compute_df_dt(
        &mut self,
        f: &Array4<f64>,
        fields: &mut dyn FieldSolver,
        time: f64,
        at_half_step: bool,
        term: DfDtTerm,
    ) -> VlasovResult<Array4<f64>> {
        self.check_term(term)?;
        self.layout.check_q_expanded(f, "df/dt")?;
        let caller_level = TimeLevel::from_half_step(at_half_step);

        if !self.position_enabled && !self.momentum_enabled() {
            return Ok(Array4::zeros(f.raw_dim()));
        }
        let faces = self.position_fluxes(f, time)?;

        let position = if self.position_enabled {
            Some(self.position_contribution(f, &faces, time)?)
        } else {
            None
        };
        let momentum = if self.momentum_enabled() {
            Some(self.momentum_stage(f, &faces, fields, time, caller_level)?)
        } else {
            None
        };

        let out = match (term, position, momentum) {
            (DfDtTerm::PositionContribution, Some(p), _) => p,
            (DfDtTerm::DFluxP1Dp1, _, Some(m)) => m.d_flux_p1_dp1,
            (DfDtTerm::DFluxP2Dp2, _, Some(m)) => m.d_flux_p2_dp2,
            (DfDtTerm::DFluxP3Dp3, _, Some(m)) => m.d_flux_p3_dp3,
            (DfDtTerm::All, p, m) => {
                let mut df_dt = p.unwrap_or_else(|| Array4::zeros(f.raw_dim()));
                if let Some(m) = m {
                    df_dt -= &m.d_flux_p1_dp1;
                    df_dt -= &m.d_flux_p2_dp2;
                    df_dt -= &m.d_flux_p3_dp3;
                }
                df_dt
            }
            (term, _, _) => {
                return Err(VlasovError::ConfigError(format!(
                    "{term:?} requested but the stage producing it is disabled"
                )))
            }
        };
        Ok(out)
    }

    /// Low-face numerical flux and face-valued f along one position axis.
    fn q_face(
        &self,
        f: &Array4<f64>,
        axis: Axis,
        speed: &Array4<f64>,
        dim: FluxDimension,
    ) -> VlasovResult<(Array4<f64>, Array4<f64>)> {
        let (low, high) = self.reconstruct_q.reconstruct(f, axis)?;
        // The state below face i is the high-face value of cell i-1.
        let below = shift(&high, axis, 1);
        let flux = self.riemann_q.face_flux(&below, &low, speed, dim)?;
        let value = self.riemann_q.face_value(&below, &low, speed)?;
        Ok((flux, value))
    }

    /// Left and bottom fluxes, their coefficients and the face-valued f.
    pub fn position_fluxes(&self, f: &Array4<f64>, time: f64) -> VlasovResult<PositionFaces> {
        self.layout.check_q_expanded(f, "position fluxes")?;
        let at = |q1, q2| SampleLocation {
            t: time,
            q1,
            q2,
            p: MomentumFace::Center,
        };
        let [c_q1, _] = c_q_on_grid(
            self.model.as_ref(),
            &self.grid,
            &self.species,
            at(QLocation::Low, QLocation::Center),
        );
        let [_, c_q2] = c_q_on_grid(
            self.model.as_ref(),
            &self.grid,
            &self.species,
            at(QLocation::Center, QLocation::Low),
        );

        let (along_q1, along_q2) = rayon::join(
            || self.q_face(f, Axis(0), &c_q1, FluxDimension::Q1),
            || self.q_face(f, Axis(1), &c_q2, FluxDimension::Q2),
        );
        let (left_flux, f_q1_left) = along_q1?;
        let (bottom_flux, f_q2_bottom) = along_q2?;
        Ok(PositionFaces {
            c_q1,
            c_q2,
            left_flux,
            bottom_flux,
            f_q1_left,
            f_q2_bottom,
        })
    }

    fn position_contribution(
        &self,
        f: &Array4<f64>,
        faces: &PositionFaces,
        time: f64,
    ) -> VlasovResult<Array4<f64>> {
        let right_flux = shift(&faces.left_flux, Axis(0), -1);
        let top_flux = shift(&faces.bottom_flux, Axis(1), -1);
        let mut df_dt = -(right_flux - &faces.left_flux) / self.grid.dq1
            - (top_flux - &faces.bottom_flux) / self.grid.dq2;
        if let Some(source) = &self.source {
            df_dt += &source.evaluate(f, time)?;
        }
        log::trace!("position stage done at t = {time}");
        Ok(df_dt)
    }

    /// `C_p` at the low momentum faces.
    ///
    /// Energy-conserving: `C_p1` at the q1 face with `LeftCenter` fields,
    /// `C_p2` at the q2 face with `CenterBottom` fields, `C_p3` at the centre.
    /// Otherwise all three at the cell centre with centred fields.
    pub fn momentum_coefficients(
        &self,
        fields: &dyn FieldSolver,
        time: f64,
        level: TimeLevel,
    ) -> VlasovResult<MomentumFaces> {
        let at = |q1, q2, p| SampleLocation { t: time, q1, q2, p };
        let model = self.model.as_ref();
        let (at_p1, at_p2, stagger_p1, stagger_p2) = if self.energy_conserving {
            (
                at(QLocation::Low, QLocation::Center, MomentumFace::Left),
                at(QLocation::Center, QLocation::Low, MomentumFace::Bottom),
                Stagger::LeftCenter,
                Stagger::CenterBottom,
            )
        } else {
            (
                at(QLocation::Center, QLocation::Center, MomentumFace::Left),
                at(QLocation::Center, QLocation::Center, MomentumFace::Bottom),
                Stagger::CenterCenter,
                Stagger::CenterCenter,
            )
        };
        let at_p3 = at(QLocation::Center, QLocation::Center, MomentumFace::Back);

        let centered = fields.get_fields(Stagger::CenterCenter, level)?;
        let [c_p1, _, _] = if stagger_p1 == Stagger::CenterCenter {
            c_p_on_grid(model, &self.grid, &self.species, &centered, at_p1)?
        } else {
            let e = fields.get_fields(stagger_p1, level)?;
            c_p_on_grid(model, &self.grid, &self.species, &e, at_p1)?
        };
        let [_, c_p2, _] = if stagger_p2 == Stagger::CenterCenter {
            c_p_on_grid(model, &self.grid, &self.species, &centered, at_p2)?
        } else {
            let e = fields.get_fields(stagger_p2, level)?;
            c_p_on_grid(model, &self.grid, &self.species, &e, at_p2)?
        };
        let [_, _, c_p3] = c_p_on_grid(model, &self.grid, &self.species, &centered, at_p3)?;
        Ok(MomentumFaces {
            c_p1,
            c_p2,
            c_p3,
            level,
        })
    }

    /// Single-sided `(high-low)/dp` flux divergence of `f` along one momentum
    /// axis, with `speed` given at the low faces. Both arrays are q-expanded.
    pub fn momentum_divergence(
        &self,
        f: &Array4<f64>,
        speed: &Array4<f64>,
        dim: FluxDimension,
    ) -> VlasovResult<Array4<f64>> {
        let (axis, dp) = match dim {
            FluxDimension::P1 => (Axis(1), self.grid.dp1),
            FluxDimension::P2 => (Axis(2), self.grid.dp2),
            FluxDimension::P3 => (Axis(3), self.grid.dp3),
            FluxDimension::Q1 | FluxDimension::Q2 => {
                return Err(VlasovError::ConfigError(format!(
                    "{dim:?} is not a momentum dimension"
                )))
            }
        };
        let f_p = self.layout.to_p_expanded(f)?;
        let c_p = self.layout.to_p_expanded(speed)?;
        let (low, high) = self.reconstruct_p.reconstruct(&f_p, axis)?;
        let below = shift(&high, axis, 1);
        let low_flux = self.riemann_p.face_flux(&below, &low, &c_p, dim)?;
        let high_flux = shift(&low_flux, axis, -1);
        self.layout.to_q_expanded(&((high_flux - &low_flux) / dp))
    }

    fn momentum_stage(
        &mut self,
        f: &Array4<f64>,
        faces: &PositionFaces,
        fields: &mut dyn FieldSolver,
        time: f64,
        caller_level: TimeLevel,
    ) -> VlasovResult<MomentumDivergence> {
        let distributions = FaceDistributions {
            center: f,
            q1_left: &faces.f_q1_left,
            q2_bottom: &faces.f_q2_bottom,
        };
        let coupled_level = match self.coupling.as_mut() {
            Some(stage) => stage.couple(&distributions, fields, caller_level)?,
            None => {
                return Err(VlasovError::ConfigError(
                    "momentum stage needs field coupling".to_string(),
                ))
            }
        };

        // The non-conserving form samples centred fields at the caller's level.
        let level = if self.energy_conserving {
            coupled_level
        } else {
            caller_level
        };
        let coefficients = self.momentum_coefficients(fields, time, level)?;
        let (f_p1, f_p2) = if self.energy_conserving {
            (&faces.f_q1_left, &faces.f_q2_bottom)
        } else {
            (f, f)
        };

        let (d1, (d2, d3)) = rayon::join(
            || self.momentum_divergence(f_p1, &coefficients.c_p1, FluxDimension::P1),
            || {
                rayon::join(
                    || self.momentum_divergence(f_p2, &coefficients.c_p2, FluxDimension::P2),
                    || self.momentum_divergence(f, &coefficients.c_p3, FluxDimension::P3),
                )
            },
        );
        let (mut d1, mut d2, d3) = (d1?, d2?, d3?);

        if self.energy_conserving {
            // Mean of the values at the low and high position faces.
            d1 = (shift(&d1, Axis(0), -1) + &d1) * 0.5;
            d2 = (shift(&d2, Axis(1), -1) + &d2) * 0.5;
        }
        log::trace!(
            "momentum stage done at t = {time}, fields at {:?}",
            coefficients.level
        );
        Ok(MomentumDivergence {
            d_flux_p1_dp1: d1,
            d_flux_p2_dp2: d2,
            d_flux_p3_dp3: d3,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yee::PeriodicYeeSolver;
    use vlasov_types::config::{FieldModel, FieldOptions, ReconstructionScheme, RiemannScheme};

    fn grid() -> PhaseSpaceGrid {
        PhaseSpaceGrid::new(
            [6, 5, 4, 3, 2],
            [0.0, 0.0, -2.0, -1.5, -1.0],
            [1.0, 1.0, 2.0, 1.5, 1.0],
            2,
            1,
        )
        .unwrap()
    }

    fn options(method_q: SolverMethod, fields: Option<FieldModel>) -> ResolvedOptions {
        ResolvedOptions {
            dt: 0.01,
            method_q,
            method_p: SolverMethod::FiniteVolume,
            riemann_q: RiemannScheme::Upwind,
            riemann_p: RiemannScheme::Upwind,
            reconstruction_q: ReconstructionScheme::Minmod,
            reconstruction_p: ReconstructionScheme::Minmod,
            energy_conserving: false,
            fields: fields.map(|model| FieldOptions {
                model,
                mu: 1.0,
                electron_temperature: 0.0,
            }),
            source_tau: None,
            species: vec![Species {
                mass: 1.0,
                charge: -1.0,
            }],
        }
    }

    fn assembler(method_q: SolverMethod, fields: Option<FieldModel>) -> PhaseSpaceFluxAssembler {
        PhaseSpaceFluxAssembler::new(
            grid(),
            &options(method_q, fields),
            Box::new(NonrelativisticBoltzmann),
        )
        .unwrap()
    }

    fn smooth_f(layout: &PhaseSpaceLayout) -> Array4<f64> {
        let [n1, n2, ns, np] = layout.q_shape();
        Array4::from_shape_fn((n1, n2, ns, np), |(i, j, _, k)| {
            1.0 + 0.3 * (i as f64 * 0.7).sin() * (j as f64 * 0.4).cos() + 0.05 * k as f64
        })
    }

    #[test]
    fn test_term_names() {
        assert_eq!("d_flux_p2_dp2".parse::<DfDtTerm>().unwrap(), DfDtTerm::DFluxP2Dp2);
        assert!(matches!(
            "flux_q".parse::<DfDtTerm>(),
            Err(VlasovError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_momentum_term_without_fields_is_error() {
        let mut a = assembler(SolverMethod::FiniteVolume, None);
        let f = smooth_f(a.layout());
        let mut solver = PeriodicYeeSolver::new(a.grid());
        let err = a.compute_df_dt(&f, &mut solver, 0.0, false, DfDtTerm::DFluxP1Dp1);
        assert!(matches!(err, Err(VlasovError::ConfigError(_))));
    }

    #[test]
    fn test_position_term_without_position_stage_is_error() {
        let mut a = assembler(SolverMethod::SemiLagrangian, Some(FieldModel::Electrostatic));
        let f = smooth_f(a.layout());
        let mut solver = PeriodicYeeSolver::new(a.grid());
        let err = a.compute_df_dt(&f, &mut solver, 0.0, false, DfDtTerm::PositionContribution);
        assert!(matches!(err, Err(VlasovError::ConfigError(_))));
    }

    #[test]
    fn test_wrong_shape_is_error() {
        let mut a = assembler(SolverMethod::FiniteVolume, None);
        let f = Array4::zeros((3, 3, 1, 2));
        let mut solver = PeriodicYeeSolver::new(a.grid());
        assert!(matches!(
            a.compute_df_dt(&f, &mut solver, 0.0, false, DfDtTerm::All),
            Err(VlasovError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_uniform_f_has_no_position_contribution() {
        let mut a = assembler(SolverMethod::FiniteVolume, None);
        let [n1, n2, ns, np] = a.layout().q_shape();
        let f = Array4::from_elem((n1, n2, ns, np), 2.5);
        let mut solver = PeriodicYeeSolver::new(a.grid());
        let d = a
            .compute_df_dt(&f, &mut solver, 0.0, false, DfDtTerm::All)
            .unwrap();
        assert!(d.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_all_is_position_minus_momentum() {
        let f = smooth_f(&assembler(SolverMethod::FiniteVolume, None).layout);
        let run = |term| {
            let mut a = assembler(SolverMethod::FiniteVolume, Some(FieldModel::Electrostatic));
            let mut solver = PeriodicYeeSolver::new(a.grid());
            a.compute_df_dt(&f, &mut solver, 0.0, false, term).unwrap()
        };
        let all = run(DfDtTerm::All);
        let expected = run(DfDtTerm::PositionContribution)
            - run(DfDtTerm::DFluxP1Dp1)
            - run(DfDtTerm::DFluxP2Dp2)
            - run(DfDtTerm::DFluxP3Dp3);
        for (a, b) in all.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_position_faces_match_coefficient_locations() {
        let a = assembler(SolverMethod::FiniteVolume, None);
        let f = smooth_f(a.layout());
        let faces = a.position_fluxes(&f, 0.0).unwrap();
        let [p1_centres, p2_centres, _] = a.grid().p_coords(MomentumFace::Center);
        // C_q1 = p1 and C_q2 = p2 for every position face
        assert_eq!(faces.c_q1[[3, 2, 0, 7]], p1_centres[7]);
        assert_eq!(faces.c_q2[[1, 4, 0, 7]], p2_centres[7]);
        assert_eq!(faces.left_flux.dim(), f.dim());
        assert_eq!(faces.f_q2_bottom.dim(), f.dim());
    }
}
