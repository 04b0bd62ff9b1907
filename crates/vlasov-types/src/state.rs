// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{VlasovError, VlasovResult};
use ndarray::Array1;
use std::ops::Range;

/// Position of a coordinate sample along one axis of a cell.
///
/// `Low` is the left face for q1 and the bottom face for q2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QLocation {
    Center,
    Low,
}

/// Momentum-space sample location: the cell centre or one of the three low faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumFace {
    Center,
    /// Low face along p1.
    Left,
    /// Low face along p2.
    Bottom,
    /// Low face along p3.
    Back,
}

/// Mass and charge of one particle species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Species {
    pub mass: f64,
    pub charge: f64,
}

/// Local phase-space tile: two position axes, three momentum axes, each with a halo.
///
/// Index `i` along a position axis covers `[-n_ghost_q, n + n_ghost_q)` in cell units,
/// so `i = n_ghost_q` is the first interior cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSpaceGrid {
    pub n_q1: usize,
    pub n_q2: usize,
    pub n_p1: usize,
    pub n_p2: usize,
    pub n_p3: usize,
    pub n_ghost_q: usize,
    pub n_ghost_p: usize,
    pub q1_start: f64,
    pub q2_start: f64,
    pub p1_start: f64,
    pub p2_start: f64,
    pub p3_start: f64,
    pub dq1: f64,
    pub dq2: f64,
    pub dp1: f64,
    pub dp2: f64,
    pub dp3: f64,
    /// Global cell index of the first interior q1 cell of this tile.
    pub q1_offset: usize,
    /// Global cell index of the first interior q2 cell of this tile.
    pub q2_offset: usize,
}

impl PhaseSpaceGrid {
    /// Build a grid from per-axis resolution and extents, ordered (q1, q2, p1, p2, p3).
    pub fn new(
        resolution: [usize; 5],
        start: [f64; 5],
        end: [f64; 5],
        n_ghost_q: usize,
        n_ghost_p: usize,
    ) -> VlasovResult<Self> {
        const NAMES: [&str; 5] = ["q1", "q2", "p1", "p2", "p3"];
        let mut width = [0.0; 5];
        for axis in 0..5 {
            if resolution[axis] == 0 {
                return Err(VlasovError::PhysicsViolation(format!(
                    "Resolution along {} must be >= 1",
                    NAMES[axis]
                )));
            }
            if !start[axis].is_finite() || !end[axis].is_finite() || end[axis] <= start[axis] {
                return Err(VlasovError::PhysicsViolation(format!(
                    "Extent along {} must be finite with end > start, got [{}, {}]",
                    NAMES[axis], start[axis], end[axis]
                )));
            }
            width[axis] = (end[axis] - start[axis]) / resolution[axis] as f64;
        }

        Ok(PhaseSpaceGrid {
            n_q1: resolution[0],
            n_q2: resolution[1],
            n_p1: resolution[2],
            n_p2: resolution[3],
            n_p3: resolution[4],
            n_ghost_q,
            n_ghost_p,
            q1_start: start[0],
            q2_start: start[1],
            p1_start: start[2],
            p2_start: start[3],
            p3_start: start[4],
            dq1: width[0],
            dq2: width[1],
            dp1: width[2],
            dp2: width[3],
            dp3: width[4],
            q1_offset: 0,
            q2_offset: 0,
        })
    }

    /// Place this grid as a tile whose first interior cell sits at the given global indices.
    pub fn with_tile_offset(mut self, q1_offset: usize, q2_offset: usize) -> Self {
        self.q1_offset = q1_offset;
        self.q2_offset = q2_offset;
        self
    }

    pub fn n_q1_total(&self) -> usize {
        self.n_q1 + 2 * self.n_ghost_q
    }

    pub fn n_q2_total(&self) -> usize {
        self.n_q2 + 2 * self.n_ghost_q
    }

    pub fn n_p1_total(&self) -> usize {
        self.n_p1 + 2 * self.n_ghost_p
    }

    pub fn n_p2_total(&self) -> usize {
        self.n_p2 + 2 * self.n_ghost_p
    }

    pub fn n_p3_total(&self) -> usize {
        self.n_p3 + 2 * self.n_ghost_p
    }

    /// Length of the flattened momentum axis, ghosts included.
    pub fn n_p_total(&self) -> usize {
        self.n_p1_total() * self.n_p2_total() * self.n_p3_total()
    }

    pub fn interior_q1(&self) -> Range<usize> {
        self.n_ghost_q..self.n_ghost_q + self.n_q1
    }

    pub fn interior_q2(&self) -> Range<usize> {
        self.n_ghost_q..self.n_ghost_q + self.n_q2
    }

    /// Physical length of the tile interior along (q1, q2).
    pub fn q_lengths(&self) -> (f64, f64) {
        (self.n_q1 as f64 * self.dq1, self.n_q2 as f64 * self.dq2)
    }

    /// Momentum-space cell volume.
    pub fn dp3_volume(&self) -> f64 {
        self.dp1 * self.dp2 * self.dp3
    }

    pub fn q1_coords(&self, location: QLocation) -> Array1<f64> {
        axis_coords(
            self.q1_start,
            self.dq1,
            self.q1_offset,
            self.n_q1,
            self.n_ghost_q,
            location == QLocation::Center,
        )
    }

    pub fn q2_coords(&self, location: QLocation) -> Array1<f64> {
        axis_coords(
            self.q2_start,
            self.dq2,
            self.q2_offset,
            self.n_q2,
            self.n_ghost_q,
            location == QLocation::Center,
        )
    }

    /// Momentum coordinates (p1, p2, p3) over the flattened momentum index.
    ///
    /// The flattened index is `(i1 * Np2 + i2) * Np3 + i3`: p1 varies slowest.
    pub fn p_coords(&self, face: MomentumFace) -> [Array1<f64>; 3] {
        let g = self.n_ghost_p;
        let p1 = axis_coords(self.p1_start, self.dp1, 0, self.n_p1, g, face != MomentumFace::Left);
        let p2 = axis_coords(self.p2_start, self.dp2, 0, self.n_p2, g, face != MomentumFace::Bottom);
        let p3 = axis_coords(self.p3_start, self.dp3, 0, self.n_p3, g, face != MomentumFace::Back);

        let (n1, n2, n3) = (p1.len(), p2.len(), p3.len());
        let total = n1 * n2 * n3;
        let out1 = Array1::from_shape_fn(total, |k| p1[k / (n2 * n3)]);
        let out2 = Array1::from_shape_fn(total, |k| p2[(k / n3) % n2]);
        let out3 = Array1::from_shape_fn(total, |k| p3[k % n3]);
        [out1, out2, out3]
    }

    /// Mask over the flattened momentum index: 1 for interior cells, 0 for ghosts.
    pub fn p_interior_mask(&self) -> Array1<f64> {
        let g = self.n_ghost_p;
        let (n1, n2, n3) = (self.n_p1_total(), self.n_p2_total(), self.n_p3_total());
        let inside = |idx: usize, n: usize| idx >= g && idx < n - g;
        Array1::from_shape_fn(n1 * n2 * n3, |k| {
            let i1 = k / (n2 * n3);
            let i2 = (k / n3) % n2;
            let i3 = k % n3;
            if inside(i1, n1) && inside(i2, n2) && inside(i3, n3) {
                1.0
            } else {
                0.0
            }
        })
    }
}

fn axis_coords(
    start: f64,
    width: f64,
    offset: usize,
    n: usize,
    ghost: usize,
    centered: bool,
) -> Array1<f64> {
    let shift = if centered { 0.5 } else { 0.0 };
    Array1::from_shape_fn(n + 2 * ghost, |i| {
        let cell = offset as f64 + i as f64 - ghost as f64;
        start + (cell + shift) * width
    })
}
