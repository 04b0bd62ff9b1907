// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Periodic Halo Fill
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Local periodic halo fill for a single tile that owns the whole domain.

use ndarray::{ArrayBase, Axis, DataMut, Dimension, Slice};
use vlasov_types::error::{VlasovError, VlasovResult};

/// Copy the opposite interior strips into the ghost cells of every listed axis.
///
/// Along each axis of length `n`, ghosts `[0, halo)` receive `[n-2h, n-h)` and
/// ghosts `[n-h, n)` receive `[h, 2h)`.
pub fn apply_periodic_halo<S, A, D>(
    local: &mut ArrayBase<S, D>,
    axes: &[Axis],
    halo: usize,
) -> VlasovResult<()>
where
    S: DataMut<Elem = A>,
    A: Clone,
    D: Dimension,
{
    if halo == 0 {
        return Ok(());
    }
    for &axis in axes {
        if axis.index() >= local.ndim() {
            return Err(VlasovError::ConfigError(format!(
                "Halo axis {} out of range for {}-dimensional array",
                axis.index(),
                local.ndim()
            )));
        }
        let n = local.len_of(axis);
        if n < 3 * halo {
            return Err(VlasovError::PhysicsViolation(format!(
                "Axis {} has insufficient cells {n} for halo={halo}",
                axis.index()
            )));
        }
        let upper_interior = local
            .slice_axis(axis, Slice::from(n - 2 * halo..n - halo))
            .to_owned();
        let lower_interior = local
            .slice_axis(axis, Slice::from(halo..2 * halo))
            .to_owned();
        local
            .slice_axis_mut(axis, Slice::from(..halo))
            .assign(&upper_interior);
        local
            .slice_axis_mut(axis, Slice::from(n - halo..))
            .assign(&lower_interior);
    }
    Ok(())
}
