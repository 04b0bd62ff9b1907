// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{VlasovError, VlasovResult};
use crate::state::{PhaseSpaceGrid, Species};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Top-level simulation configuration as stored in JSON.
///
/// Option names stay strings here; `resolve()` turns them into enums once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub name: String,
    pub domain: DomainConfig,
    pub species: Vec<SpeciesConfig>,
    pub numerics: NumericsConfig,
    #[serde(default)]
    pub fields: FieldsConfig,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    pub n_q1: usize,
    pub n_q2: usize,
    pub n_p1: usize,
    pub n_p2: usize,
    pub n_p3: usize,
    pub q1_start: f64,
    pub q1_end: f64,
    pub q2_start: f64,
    pub q2_end: f64,
    pub p1_start: f64,
    pub p1_end: f64,
    pub p2_start: f64,
    pub p2_end: f64,
    pub p3_start: f64,
    pub p3_end: f64,
    pub n_ghost_q: usize,
    #[serde(default)]
    pub n_ghost_p: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub mass: f64,
    pub charge: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericsConfig {
    pub dt: f64,
    /// "FVM" or "ASL"
    pub solver_method_in_q: String,
    pub solver_method_in_p: String,
    /// "upwind-flux" or "lax-friedrichs"
    pub riemann_solver_in_q: String,
    pub riemann_solver_in_p: String,
    /// "piecewise-constant" or "minmod"
    pub reconstruction_method_in_q: String,
    pub reconstruction_method_in_p: String,
    #[serde(default)]
    pub energy_conserving: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsConfig {
    pub enabled: bool,
    /// "electrostatic" or "electrodynamic"
    #[serde(default = "default_fields_type")]
    pub fields_type: String,
    /// "fft" or "fdtd"
    #[serde(default = "default_fields_solver")]
    pub fields_solver: String,
    #[serde(default)]
    pub hybrid_model_enabled: bool,
    /// Vacuum permeability in normalized units (default: 1.0)
    #[serde(default = "default_mu")]
    pub mu: f64,
    /// Isothermal electron temperature for the hybrid closure (default: 0.0)
    #[serde(default)]
    pub fluid_electron_temperature: f64,
}

fn default_fields_type() -> String {
    "electrostatic".to_string()
}
fn default_fields_solver() -> String {
    "fft".to_string()
}
fn default_mu() -> f64 {
    1.0
}

impl Default for FieldsConfig {
    fn default() -> Self {
        FieldsConfig {
            enabled: false,
            fields_type: default_fields_type(),
            fields_solver: default_fields_solver(),
            hybrid_model_enabled: false,
            mu: default_mu(),
            fluid_electron_temperature: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub enabled: bool,
    /// Collisions applied by the driver as an instantaneous relaxation step.
    #[serde(default)]
    pub instantaneous_collisions: bool,
    /// BGK relaxation time (default: 0.01)
    #[serde(default = "default_tau")]
    pub tau: f64,
}

fn default_tau() -> f64 {
    0.01
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            enabled: false,
            instantaneous_collisions: false,
            tau: default_tau(),
        }
    }
}

/// Discretization used for one half of phase space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverMethod {
    FiniteVolume,
    /// Advective semi-Lagrangian; handled outside the finite-volume kernel.
    SemiLagrangian,
}

impl FromStr for SolverMethod {
    type Err = VlasovError;

    fn from_str(s: &str) -> VlasovResult<Self> {
        match s {
            "FVM" | "fvm" => Ok(SolverMethod::FiniteVolume),
            "ASL" | "asl" => Ok(SolverMethod::SemiLagrangian),
            other => Err(VlasovError::unknown("solver method", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiemannScheme {
    Upwind,
    LaxFriedrichs,
}

impl FromStr for RiemannScheme {
    type Err = VlasovError;

    fn from_str(s: &str) -> VlasovResult<Self> {
        match s {
            "upwind-flux" => Ok(RiemannScheme::Upwind),
            "lax-friedrichs" => Ok(RiemannScheme::LaxFriedrichs),
            other => Err(VlasovError::unknown("riemann solver", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconstructionScheme {
    PiecewiseConstant,
    Minmod,
}

impl FromStr for ReconstructionScheme {
    type Err = VlasovError;

    fn from_str(s: &str) -> VlasovResult<Self> {
        match s {
            "piecewise-constant" => Ok(ReconstructionScheme::PiecewiseConstant),
            "minmod" => Ok(ReconstructionScheme::Minmod),
            other => Err(VlasovError::unknown("reconstruction method", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldsType {
    Electrostatic,
    Electrodynamic,
}

impl FromStr for FieldsType {
    type Err = VlasovError;

    fn from_str(s: &str) -> VlasovResult<Self> {
        match s {
            "electrostatic" => Ok(FieldsType::Electrostatic),
            "electrodynamic" => Ok(FieldsType::Electrodynamic),
            other => Err(VlasovError::unknown("fields type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldsBackend {
    Fft,
    Fdtd,
}

impl FromStr for FieldsBackend {
    type Err = VlasovError;

    fn from_str(s: &str) -> VlasovResult<Self> {
        match s {
            "fft" => Ok(FieldsBackend::Fft),
            "fdtd" => Ok(FieldsBackend::Fdtd),
            other => Err(VlasovError::unknown("fields solver", other)),
        }
    }
}

/// Valid combinations of fields type, backend and closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldModel {
    /// Poisson solve through FFT.
    Electrostatic,
    /// Yee leapfrog driven by kinetic currents.
    ElectrodynamicDirect,
    /// Yee leapfrog with E from the quasi-neutral Ohm's law.
    ElectrodynamicHybrid,
}

impl FieldModel {
    pub fn from_parts(
        fields_type: FieldsType,
        backend: FieldsBackend,
        hybrid: bool,
    ) -> VlasovResult<Self> {
        match (fields_type, backend, hybrid) {
            (FieldsType::Electrostatic, FieldsBackend::Fft, false) => Ok(FieldModel::Electrostatic),
            (FieldsType::Electrodynamic, FieldsBackend::Fdtd, false) => {
                Ok(FieldModel::ElectrodynamicDirect)
            }
            (FieldsType::Electrodynamic, FieldsBackend::Fdtd, true) => {
                Ok(FieldModel::ElectrodynamicHybrid)
            }
            (t, b, h) => Err(VlasovError::ConfigError(format!(
                "invalid fields mode combination: type={t:?}, solver={b:?}, hybrid={h}"
            ))),
        }
    }

    pub fn is_electrodynamic(self) -> bool {
        !matches!(self, FieldModel::Electrostatic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOptions {
    pub model: FieldModel,
    pub mu: f64,
    pub electron_temperature: f64,
}

/// Configuration with every option resolved into its enum.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub dt: f64,
    pub method_q: SolverMethod,
    pub method_p: SolverMethod,
    pub riemann_q: RiemannScheme,
    pub riemann_p: RiemannScheme,
    pub reconstruction_q: ReconstructionScheme,
    pub reconstruction_p: ReconstructionScheme,
    pub energy_conserving: bool,
    /// `None` when fields are disabled.
    pub fields: Option<FieldOptions>,
    /// BGK relaxation time when the source enters df/dt.
    pub source_tau: Option<f64>,
    pub species: Vec<Species>,
}

impl SimulationConfig {
    /// Load from JSON file.
    pub fn from_file(path: &str) -> VlasovResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> VlasovResult<Self> {
        let config: Self = serde_json::from_str(contents)?;
        Ok(config)
    }

    /// Create the local phase-space grid from the domain block.
    pub fn create_grid(&self) -> VlasovResult<PhaseSpaceGrid> {
        let d = &self.domain;
        PhaseSpaceGrid::new(
            [d.n_q1, d.n_q2, d.n_p1, d.n_p2, d.n_p3],
            [d.q1_start, d.q2_start, d.p1_start, d.p2_start, d.p3_start],
            [d.q1_end, d.q2_end, d.p1_end, d.p2_end, d.p3_end],
            d.n_ghost_q,
            d.n_ghost_p,
        )
    }

    /// Resolve every string option. Fails on the first unknown name or invalid combination.
    pub fn resolve(&self) -> VlasovResult<ResolvedOptions> {
        let n = &self.numerics;
        if !n.dt.is_finite() || n.dt <= 0.0 {
            return Err(VlasovError::ConfigError(format!(
                "dt must be finite and > 0, got {}",
                n.dt
            )));
        }
        if self.species.is_empty() {
            return Err(VlasovError::ConfigError(
                "at least one species is required".to_string(),
            ));
        }
        let species = self
            .species
            .iter()
            .map(|s| {
                if !s.mass.is_finite() || s.mass <= 0.0 || !s.charge.is_finite() {
                    Err(VlasovError::ConfigError(format!(
                        "species mass must be finite and > 0 and charge finite, got mass={}, charge={}",
                        s.mass, s.charge
                    )))
                } else {
                    Ok(Species {
                        mass: s.mass,
                        charge: s.charge,
                    })
                }
            })
            .collect::<VlasovResult<Vec<_>>>()?;

        let fields = if self.fields.enabled {
            let f = &self.fields;
            let model = FieldModel::from_parts(
                f.fields_type.parse()?,
                f.fields_solver.parse()?,
                f.hybrid_model_enabled,
            )?;
            if !f.mu.is_finite() || f.mu <= 0.0 {
                return Err(VlasovError::ConfigError(format!(
                    "mu must be finite and > 0, got {}",
                    f.mu
                )));
            }
            if model == FieldModel::ElectrodynamicHybrid && species.len() != 1 {
                return Err(VlasovError::ConfigError(format!(
                    "hybrid model expects a single kinetic ion species, got {}",
                    species.len()
                )));
            }
            Some(FieldOptions {
                model,
                mu: f.mu,
                electron_temperature: f.fluid_electron_temperature,
            })
        } else {
            None
        };

        let source_tau = if self.source.enabled && !self.source.instantaneous_collisions {
            if !self.source.tau.is_finite() || self.source.tau <= 0.0 {
                return Err(VlasovError::ConfigError(format!(
                    "source tau must be finite and > 0, got {}",
                    self.source.tau
                )));
            }
            Some(self.source.tau)
        } else {
            None
        };

        let resolved = ResolvedOptions {
            dt: n.dt,
            method_q: n.solver_method_in_q.parse()?,
            method_p: n.solver_method_in_p.parse()?,
            riemann_q: n.riemann_solver_in_q.parse()?,
            riemann_p: n.riemann_solver_in_p.parse()?,
            reconstruction_q: n.reconstruction_method_in_q.parse()?,
            reconstruction_p: n.reconstruction_method_in_p.parse()?,
            energy_conserving: n.energy_conserving,
            fields,
            source_tau,
            species,
        };
        log::debug!(
            "resolved '{}': q={:?}/{:?}/{:?}, p={:?}/{:?}/{:?}, fields={:?}, energy_conserving={}",
            self.name,
            resolved.method_q,
            resolved.riemann_q,
            resolved.reconstruction_q,
            resolved.method_p,
            resolved.riemann_p,
            resolved.reconstruction_p,
            resolved.fields.map(|f| f.model),
            resolved.energy_conserving
        );
        Ok(resolved)
    }
}
