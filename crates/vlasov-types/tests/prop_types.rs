// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Property-Based Tests (proptest) for vlasov-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for vlasov-types using proptest.
//!
//! Covers: PhaseSpaceGrid construction invariants, coordinate staggering,
//! option parsing.

use proptest::prelude::*;
use vlasov_types::config::{ReconstructionScheme, RiemannScheme, SolverMethod};
use vlasov_types::state::{MomentumFace, PhaseSpaceGrid, QLocation};

fn grid(n: [usize; 5], ghost_q: usize, ghost_p: usize) -> PhaseSpaceGrid {
    PhaseSpaceGrid::new(
        n,
        [0.0, -1.0, -4.0, -4.0, -4.0],
        [2.0, 1.0, 4.0, 4.0, 4.0],
        ghost_q,
        ghost_p,
    )
    .unwrap()
}

// ── Grid Construction Invariants ─────────────────────────────────────

proptest! {
    /// Totals are interior plus two halos.
    #[test]
    fn grid_totals_include_halo(
        n1 in 1usize..32,
        n2 in 1usize..32,
        np1 in 1usize..12,
        np2 in 1usize..6,
        np3 in 1usize..6,
        g in 0usize..4,
    ) {
        let grid = grid([n1, n2, np1, np2, np3], g, 0);
        prop_assert_eq!(grid.n_q1_total(), n1 + 2 * g);
        prop_assert_eq!(grid.n_q2_total(), n2 + 2 * g);
        prop_assert_eq!(grid.n_p_total(), np1 * np2 * np3);
        prop_assert_eq!(grid.interior_q1().len(), n1);
    }

    /// Interior cells span exactly the configured extent.
    #[test]
    fn grid_interior_spans_extent(n1 in 1usize..64, g in 0usize..4) {
        let grid = grid([n1, 4, 4, 1, 1], g, 0);
        let low = grid.q1_coords(QLocation::Low);
        let first = low[g];
        let last_right = low[g + n1 - 1] + grid.dq1;
        prop_assert!(first.abs() < 1e-12, "first face {}", first);
        prop_assert!((last_right - 2.0).abs() < 1e-12, "last face {}", last_right);
    }

    /// Cell centres sit half a width above the low faces.
    #[test]
    fn grid_center_is_half_width_above_low(n2 in 1usize..64, g in 0usize..4) {
        let grid = grid([4, n2, 4, 1, 1], g, 0);
        let c = grid.q2_coords(QLocation::Center);
        let l = grid.q2_coords(QLocation::Low);
        for j in 0..c.len() {
            prop_assert!((c[j] - l[j] - 0.5 * grid.dq2).abs() < 1e-12);
        }
    }

    /// Momentum coordinates are non-decreasing along the slow p1 axis.
    #[test]
    fn p1_monotone_over_flat_index(np1 in 2usize..10, np2 in 1usize..5, np3 in 1usize..5) {
        let grid = grid([4, 4, np1, np2, np3], 1, 0);
        let [p1, _, _] = grid.p_coords(MomentumFace::Center);
        for k in 1..p1.len() {
            prop_assert!(p1[k] >= p1[k - 1]);
        }
    }

    /// Interior mask sums to the interior momentum cell count.
    #[test]
    fn mask_counts_interior(np1 in 1usize..8, np2 in 1usize..4, np3 in 1usize..4, gp in 0usize..2) {
        let grid = grid([4, 4, np1, np2, np3], 1, gp);
        let total: f64 = grid.p_interior_mask().sum();
        prop_assert_eq!(total as usize, np1 * np2 * np3);
    }
}

// ── Option Parsing ───────────────────────────────────────────────────

proptest! {
    /// Arbitrary lowercase words never parse to a Riemann scheme unless exact.
    #[test]
    fn unknown_riemann_names_rejected(name in "[a-z]{1,12}") {
        let parsed = name.parse::<RiemannScheme>();
        prop_assert!(parsed.is_err());
        let msg = parsed.unwrap_err().to_string();
        prop_assert!(msg.contains(&name));
    }

    #[test]
    fn unknown_reconstruction_names_rejected(name in "[A-Z]{1,8}") {
        prop_assert!(name.parse::<ReconstructionScheme>().is_err());
    }
}

#[test]
fn known_names_parse() {
    assert_eq!("FVM".parse::<SolverMethod>().unwrap(), SolverMethod::FiniteVolume);
    assert_eq!("ASL".parse::<SolverMethod>().unwrap(), SolverMethod::SemiLagrangian);
    assert_eq!(
        "lax-friedrichs".parse::<RiemannScheme>().unwrap(),
        RiemannScheme::LaxFriedrichs
    );
    assert_eq!(
        "piecewise-constant".parse::<ReconstructionScheme>().unwrap(),
        ReconstructionScheme::PiecewiseConstant
    );
}
