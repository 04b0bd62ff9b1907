// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — Shift
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Periodic one-axis roll.
//!
//! `shift(x, axis, 1)[i] == x[i - 1]` and `shift(x, axis, -1)[i] == x[i + 1]`,
//! with indices wrapping around the axis length.

use ndarray::{Array, ArrayBase, Axis, Data, Dimension, Slice};

/// Roll `input` by `offset` cells along `axis`.
pub fn shift<S, A, D>(input: &ArrayBase<S, D>, axis: Axis, offset: isize) -> Array<A, D>
where
    S: Data<Elem = A>,
    A: Clone,
    D: Dimension,
{
    let n = input.len_of(axis);
    let mut out = input.to_owned();
    if n == 0 {
        return out;
    }
    let k = offset.rem_euclid(n as isize) as usize;
    if k == 0 {
        return out;
    }
    out.slice_axis_mut(axis, Slice::from(k..))
        .assign(&input.slice_axis(axis, Slice::from(..n - k)));
    out.slice_axis_mut(axis, Slice::from(..k))
        .assign(&input.slice_axis(axis, Slice::from(n - k..)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_positive_shift_reads_previous_cell() {
        let x = array![0.0, 1.0, 2.0, 3.0];
        let s = shift(&x, Axis(0), 1);
        assert_eq!(s, array![3.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_negative_shift_reads_next_cell() {
        let x = array![0.0, 1.0, 2.0, 3.0];
        let s = shift(&x, Axis(0), -1);
        assert_eq!(s, array![1.0, 2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_shift_only_touches_requested_axis() {
        let x = Array2::from_shape_fn((3, 4), |(i, j)| (10 * i + j) as f64);
        let s = shift(&x, Axis(1), 1);
        for i in 0..3 {
            assert_eq!(s[[i, 0]], x[[i, 3]]);
            assert_eq!(s[[i, 2]], x[[i, 1]]);
        }
    }

    #[test]
    fn test_full_period_is_identity() {
        let x = array![1.0, 5.0, -2.0];
        assert_eq!(shift(&x, Axis(0), 3), x);
        assert_eq!(shift(&x, Axis(0), -6), x);
    }
}
