// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Vlasov Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Finite-volume Vlasov-Maxwell phase-space transport.
//!
//! - `riemann`, `reconstruct`: face values and numerical fluxes
//! - `df_dt`: position and momentum flux divergences
//! - `coupling`, `fields`, `yee`: field solve driven by moments of f
//! - `spectral`: Fourier-space Maxwell right-hand side

pub mod advection;
pub mod coupling;
pub mod df_dt;
pub mod fields;
pub mod layout;
pub mod moments;
pub mod reconstruct;
pub mod riemann;
pub mod source;
pub mod spectral;
pub mod yee;
