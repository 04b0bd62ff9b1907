// ─────────────────────────────────────────────────────────────────────
// SCPN Vlasov Core — FFT
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 2D FFT wrappers around rustfft.
//!
//! Convention matches numpy:
//! - Forward FFT (fft2): unnormalized
//! - Inverse FFT (ifft2): normalized by 1/(n1*n2)

use ndarray::{Array1, Array2, ArrayView2, Axis};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;

/// Transform every lane along `axis` in place.
///
/// Lanes of a transposed or sliced view are not contiguous, so each one is
/// staged through a reusable buffer.
fn process_lanes(data: &mut Array2<Complex64>, axis: Axis, fft: &dyn Fft<f64>) {
    let mut buffer = vec![Complex64::new(0.0, 0.0); data.len_of(axis)];
    for mut lane in data.lanes_mut(axis) {
        for (b, v) in buffer.iter_mut().zip(lane.iter()) {
            *b = *v;
        }
        fft.process(&mut buffer);
        for (v, b) in lane.iter_mut().zip(buffer.iter()) {
            *v = *b;
        }
    }
}

fn transform(input: ArrayView2<'_, Complex64>, inverse: bool) -> Array2<Complex64> {
    let (n1, n2) = input.dim();
    let mut data = input.to_owned();
    if n1 == 0 || n2 == 0 {
        return data;
    }
    let mut planner = FftPlanner::new();
    let (along_rows, along_cols) = if inverse {
        (planner.plan_fft_inverse(n2), planner.plan_fft_inverse(n1))
    } else {
        (planner.plan_fft_forward(n2), planner.plan_fft_forward(n1))
    };
    process_lanes(&mut data, Axis(1), along_rows.as_ref());
    process_lanes(&mut data, Axis(0), along_cols.as_ref());
    if inverse {
        let norm = 1.0 / (n1 * n2) as f64;
        data.mapv_inplace(|c| c * norm);
    }
    data
}

/// Forward 2D FFT of a real field. Matches `numpy.fft.fft2()`.
pub fn fft2(input: &Array2<f64>) -> Array2<Complex64> {
    let data = input.mapv(|v| Complex64::new(v, 0.0));
    transform(data.view(), false)
}

/// Inverse 2D FFT keeping only the real part. Matches `numpy.fft.ifft2().real`.
pub fn ifft2(input: &Array2<Complex64>) -> Array2<f64> {
    transform(input.view(), true).mapv(|c| c.re)
}

/// Forward 2D FFT of a complex field.
pub fn fft2_complex(input: ArrayView2<'_, Complex64>) -> Array2<Complex64> {
    transform(input, false)
}

/// Inverse 2D FFT of a complex field, complex output.
pub fn ifft2_complex(input: ArrayView2<'_, Complex64>) -> Array2<Complex64> {
    transform(input, true)
}

/// Sample frequencies. Matches `numpy.fft.fftfreq(n, d)`.
pub fn fftfreq(n: usize, d: f64) -> Array1<f64> {
    let scale = 1.0 / (n as f64 * d);
    Array1::from_shape_fn(n, |k| {
        let signed = if k < n.div_ceil(2) {
            k as f64
        } else {
            k as f64 - n as f64
        };
        signed * scale
    })
}

/// Angular wavenumbers `2π·fftfreq(n, length/n)` of a periodic box of the given length.
pub fn wavenumbers(n: usize, length: f64) -> Array1<f64> {
    fftfreq(n, length / n as f64).mapv(|f| 2.0 * PI * f)
}
