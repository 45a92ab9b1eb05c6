use crate::{Dmat, Dvec};

/// reduce the general matrix `h` to upper Hessenberg form by orthogonal
/// similarity transformations and store the accumulated transformation in
/// `v`, so that on output A = V·H·Vᵗ. this is the Algol pair ORTHES and
/// ORTRAN by Martin and Wilkinson, Handbook for Auto. Comp., Vol. II-Linear
/// Algebra (1971)
pub(crate) fn orthes(h: &mut Dmat, v: &mut Dmat) {
    let n = h.nrows();
    let high = n - 1;
    // the Householder vectors live here between the reduction and the
    // accumulation
    let mut ort = Dvec::zeros(n);

    for m in 1..high {
        // scale column
        let scale: f64 = (m..=high).map(|i| h[(i, m - 1)].abs()).sum();
        if scale == 0.0 {
            continue;
        }

        // compute Householder transformation
        let mut hh = 0.0;
        for i in (m..=high).rev() {
            ort[i] = h[(i, m - 1)] / scale;
            hh += ort[i] * ort[i];
        }
        let g = -hh.sqrt().copysign(ort[m]);
        hh -= ort[m] * g;
        ort[m] -= g;

        // apply Householder similarity transformation
        // H = (I - u·uᵗ/h)·H·(I - u·uᵗ/h)
        for j in m..n {
            let mut f = 0.0;
            for i in (m..=high).rev() {
                f += ort[i] * h[(i, j)];
            }
            f /= hh;
            for i in m..=high {
                h[(i, j)] -= f * ort[i];
            }
        }
        for i in 0..=high {
            let mut f = 0.0;
            for j in (m..=high).rev() {
                f += ort[j] * h[(i, j)];
            }
            f /= hh;
            for j in m..=high {
                h[(i, j)] -= f * ort[j];
            }
        }
        ort[m] *= scale;
        h[(m, m - 1)] = scale * g;
    }

    // accumulate transformations
    v.fill_with_identity();
    for m in (1..high).rev() {
        if h[(m, m - 1)] == 0.0 {
            continue;
        }
        for i in m + 1..=high {
            ort[i] = h[(i, m - 1)];
        }
        for j in m..=high {
            let mut g = 0.0;
            for i in m..=high {
                g += ort[i] * v[(i, j)];
            }
            // double division avoids possible underflow
            g = (g / ort[m]) / h[(m, m - 1)];
            for i in m..=high {
                v[(i, j)] += g * ort[i];
            }
        }
    }

    // the tails of the Householder vectors are still sitting below the
    // sub-diagonal
    for j in 0..n {
        for i in j + 2..n {
            h[(i, j)] = 0.0;
        }
    }
}
