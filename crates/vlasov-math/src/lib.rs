// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Array primitives for SCPN Vlasov Core: periodic shifts, staggered-grid
//! stencils, halo fills and 2D FFT wrappers.

pub mod fft;
pub mod halo;
pub mod shift;
pub mod stencil;
