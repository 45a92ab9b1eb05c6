//! non-symmetric path: Hessenberg reduction followed by the double-shift QR
//! iteration to real Schur form and back-substitution for the eigenvectors.
//! The QR iteration follows the Algol procedure HQR2 by Martin and
//! Wilkinson, Handbook for Auto. Comp., Vol. II-Linear Algebra (1971)

use log::{debug, trace, warn};

use crate::error::{Error, Result, Stage};
use crate::hessenberg::orthes;
use crate::{Dmat, Dvec, EPS};

/// iteration counts at which the QR iteration abandons the standard shift in
/// favor of an exceptional one
const EXCEPTIONAL_SHIFTS: [usize; 2] = [10, 20];

/// compute the real parts, imaginary parts, and real eigenvector basis of the
/// general matrix `a`
pub(crate) fn decompose(
    a: &Dmat,
    max_iter: usize,
) -> Result<(Dvec, Dvec, Dmat)> {
    let n = a.nrows();
    // the Hessenberg form is only needed until the eigenvectors have been
    // recovered, so it dies at the end of this function
    let mut h = a.clone();
    let mut v = Dmat::zeros(n, n);
    let mut d = Dvec::zeros(n);
    let mut e = Dvec::zeros(n);
    orthes(&mut h, &mut v);
    hqr2(&mut h, &mut v, &mut d, &mut e, max_iter)?;
    Ok((d, e, v))
}

/// complex division (xr + i·xi) / (yr + i·yi) without forming |y|², which
/// could overflow or underflow. returns the real and imaginary parts of the
/// quotient
pub(crate) fn cdiv(xr: f64, xi: f64, yr: f64, yi: f64) -> (f64, f64) {
    if yr.abs() > yi.abs() {
        let r = yi / yr;
        let d = yr + r * yi;
        ((xr + r * xi) / d, (xi - r * xr) / d)
    } else {
        let r = yr / yi;
        let d = yi + r * yr;
        ((r * xr + xi) / d, (r * xi - xr) / d)
    }
}

/// reduce the upper Hessenberg matrix `h` to real Schur form, storing the
/// real and imaginary parts of the eigenvalues in `d` and `e`, then
/// back-substitute to turn the orthogonal transformation in `v` (from
/// [orthes]) into the eigenvectors of the original matrix. `h` is destroyed
pub(crate) fn hqr2(
    h: &mut Dmat,
    v: &mut Dmat,
    d: &mut Dvec,
    e: &mut Dvec,
    max_iter: usize,
) -> Result<()> {
    let nn = h.nrows();
    let high = nn - 1;
    let mut exshift = 0.0;
    let (mut p, mut q, mut w, mut x, mut y): (f64, f64, f64, f64, f64);
    // carried from a 2×2 block's first row to its second in the back
    // substitution
    let (mut r, mut s, mut z) = (0.0, 0.0, 0.0);

    // matrix norm for the deflation and pivot floors
    let mut norm = 0.0;
    for i in 0..nn {
        for j in i.saturating_sub(1)..nn {
            norm += h[(i, j)].abs();
        }
    }

    // outer loop over the active block. `active` is the number of rows
    // that have not been deflated yet
    let mut active = nn;
    let mut iter = 0;
    while active > 0 {
        let n = active - 1;

        // look for single small sub-diagonal element
        let mut l = n;
        while l > 0 {
            s = h[(l - 1, l - 1)].abs() + h[(l, l)].abs();
            if s == 0.0 {
                s = norm;
            }
            if h[(l, l - 1)].abs() <= EPS * s {
                break;
            }
            l -= 1;
        }

        if l == n {
            // one root found
            h[(n, n)] += exshift;
            d[n] = h[(n, n)];
            e[n] = 0.0;
            trace!("real eigenvalue {n} = {} after {iter} QR sweeps", d[n]);
            active -= 1;
            iter = 0;
        } else if l == n - 1 {
            // two roots found
            w = h[(n, n - 1)] * h[(n - 1, n)];
            p = (h[(n - 1, n - 1)] - h[(n, n)]) / 2.0;
            q = p * p + w;
            z = q.abs().sqrt();
            h[(n, n)] += exshift;
            h[(n - 1, n - 1)] += exshift;
            x = h[(n, n)];

            if q >= 0.0 {
                // real pair
                z = if p >= 0.0 { p + z } else { p - z };
                d[n - 1] = x + z;
                d[n] = d[n - 1];
                if z != 0.0 {
                    d[n] = x - w / z;
                }
                e[n - 1] = 0.0;
                e[n] = 0.0;
                x = h[(n, n - 1)];
                s = x.abs() + z.abs();
                p = x / s;
                q = z / s;
                r = p.hypot(q);
                p /= r;
                q /= r;

                // row modification
                for j in n - 1..nn {
                    z = h[(n - 1, j)];
                    h[(n - 1, j)] = q * z + p * h[(n, j)];
                    h[(n, j)] = q * h[(n, j)] - p * z;
                }

                // column modification
                for i in 0..=n {
                    z = h[(i, n - 1)];
                    h[(i, n - 1)] = q * z + p * h[(i, n)];
                    h[(i, n)] = q * h[(i, n)] - p * z;
                }

                // accumulate transformations
                for i in 0..=high {
                    z = v[(i, n - 1)];
                    v[(i, n - 1)] = q * z + p * v[(i, n)];
                    v[(i, n)] = q * v[(i, n)] - p * z;
                }
            } else {
                // complex pair
                d[n - 1] = x + p;
                d[n] = x + p;
                e[n - 1] = z;
                e[n] = -z;
            }
            trace!(
                "eigenvalue pair {}, {n} = {} ± {}i after {iter} QR sweeps",
                n - 1,
                d[n],
                e[n - 1]
            );
            active -= 2;
            iter = 0;
        } else {
            // no convergence yet
            if iter >= max_iter {
                return Err(Error::NoConvergence {
                    stage: Stage::Qr,
                    index: n,
                    iterations: iter,
                });
            }

            // form shift
            x = h[(n, n)];
            y = h[(n - 1, n - 1)];
            w = h[(n, n - 1)] * h[(n - 1, n)];

            // Wilkinson's original ad hoc shift
            if iter == EXCEPTIONAL_SHIFTS[0] {
                debug!("exceptional shift for eigenvalue {n} at sweep {iter}");
                exshift += x;
                for i in 0..=n {
                    h[(i, i)] -= x;
                }
                s = h[(n, n - 1)].abs() + h[(n - 1, n - 2)].abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }

            // second ad hoc shift, aimed at the eigenvalue closest to the
            // trailing diagonal entry
            if iter == EXCEPTIONAL_SHIFTS[1] {
                s = (y - x) / 2.0;
                s = s * s + w;
                if s > 0.0 {
                    debug!(
                        "exceptional shift for eigenvalue {n} at sweep {iter}"
                    );
                    s = s.sqrt();
                    if y < x {
                        s = -s;
                    }
                    s = x - w / ((y - x) / 2.0 + s);
                    for i in 0..=n {
                        h[(i, i)] -= s;
                    }
                    exshift += s;
                    w = 0.964;
                    x = w;
                    y = w;
                }
            }

            iter += 1;

            // look for two consecutive small sub-diagonal elements
            let mut m = n - 2;
            loop {
                z = h[(m, m)];
                r = x - z;
                s = y - z;
                p = (r * s - w) / h[(m + 1, m)] + h[(m, m + 1)];
                q = h[(m + 1, m + 1)] - z - r - s;
                r = h[(m + 2, m + 1)];
                s = p.abs() + q.abs() + r.abs();
                p /= s;
                q /= s;
                r /= s;
                if m == l {
                    break;
                }
                if h[(m, m - 1)].abs() * (q.abs() + r.abs())
                    < EPS
                        * (p.abs()
                            * (h[(m - 1, m - 1)].abs()
                                + z.abs()
                                + h[(m + 1, m + 1)].abs()))
                {
                    break;
                }
                m -= 1;
            }

            for i in m + 2..=n {
                h[(i, i - 2)] = 0.0;
                if i > m + 2 {
                    h[(i, i - 3)] = 0.0;
                }
            }

            // double QR step involving rows l..=n and columns m..=n
            for k in m..n {
                let notlast = k != n - 1;
                if k != m {
                    p = h[(k, k - 1)];
                    q = h[(k + 1, k - 1)];
                    r = if notlast { h[(k + 2, k - 1)] } else { 0.0 };
                    x = p.abs() + q.abs() + r.abs();
                    if x == 0.0 {
                        continue;
                    }
                    p /= x;
                    q /= x;
                    r /= x;
                }

                s = (p * p + q * q + r * r).sqrt().copysign(p);
                if s == 0.0 {
                    continue;
                }
                if k != m {
                    h[(k, k - 1)] = -s * x;
                } else if l != m {
                    h[(k, k - 1)] = -h[(k, k - 1)];
                }
                p += s;
                x = p / s;
                y = q / s;
                z = r / s;
                q /= p;
                r /= p;

                // row modification
                for j in k..nn {
                    p = h[(k, j)] + q * h[(k + 1, j)];
                    if notlast {
                        p += r * h[(k + 2, j)];
                        h[(k + 2, j)] -= p * z;
                    }
                    h[(k, j)] -= p * x;
                    h[(k + 1, j)] -= p * y;
                }

                // column modification
                for i in 0..=n.min(k + 3) {
                    p = x * h[(i, k)] + y * h[(i, k + 1)];
                    if notlast {
                        p += z * h[(i, k + 2)];
                        h[(i, k + 2)] -= p * r;
                    }
                    h[(i, k)] -= p;
                    h[(i, k + 1)] -= p * q;
                }

                // accumulate transformations
                for i in 0..=high {
                    p = x * v[(i, k)] + y * v[(i, k + 1)];
                    if notlast {
                        p += z * v[(i, k + 2)];
                        v[(i, k + 2)] -= p * r;
                    }
                    v[(i, k)] -= p;
                    v[(i, k + 1)] -= p * q;
                }
            }
        }
    }

    // backsubstitute to find vectors of upper triangular form
    if norm == 0.0 {
        return Ok(());
    }
    let floor = EPS * norm;

    for n in (0..nn).rev() {
        p = d[n];
        q = e[n];

        if q == 0.0 {
            // real vector
            let mut l = n;
            h[(n, n)] = 1.0;
            for i in (0..n).rev() {
                w = h[(i, i)] - p;
                r = 0.0;
                for j in l..=n {
                    r += h[(i, j)] * h[(j, n)];
                }
                if e[i] < 0.0 {
                    z = w;
                    s = r;
                    continue;
                }
                l = i;
                if e[i] == 0.0 {
                    h[(i, n)] = if w != 0.0 {
                        -r / w
                    } else {
                        warn!(
                            "zero pivot in row {i} of eigenvector {n}, \
                     replacing with {floor:e}"
                        );
                        -r / floor
                    };
                } else {
                    // solve real equations
                    x = h[(i, i + 1)];
                    y = h[(i + 1, i)];
                    let den = (d[i] - p) * (d[i] - p) + e[i] * e[i];
                    let t = (x * s - z * r) / den;
                    h[(i, n)] = t;
                    h[(i + 1, n)] = if x.abs() > z.abs() {
                        (-r - w * t) / x
                    } else {
                        (-s - y * t) / z
                    };
                }

                // overflow control
                let t = h[(i, n)].abs();
                if (EPS * t) * t > 1.0 {
                    for j in i..=n {
                        h[(j, n)] /= t;
                    }
                }
            }
        } else if q < 0.0 {
            // complex vector, stored in columns n-1 (real part) and n
            // (imaginary part)
            let mut l = n - 1;

            // last vector component imaginary so matrix is triangular
            if h[(n, n - 1)].abs() > h[(n - 1, n)].abs() {
                h[(n - 1, n - 1)] = q / h[(n, n - 1)];
                h[(n - 1, n)] = -(h[(n, n)] - p) / h[(n, n - 1)];
            } else {
                let (cr, ci) =
                    cdiv(0.0, -h[(n - 1, n)], h[(n - 1, n - 1)] - p, q);
                h[(n - 1, n - 1)] = cr;
                h[(n - 1, n)] = ci;
            }
            h[(n, n - 1)] = 0.0;
            h[(n, n)] = 1.0;

            for i in (0..n - 1).rev() {
                let mut ra = 0.0;
                let mut sa = 0.0;
                for j in l..=n {
                    ra += h[(i, j)] * h[(j, n - 1)];
                    sa += h[(i, j)] * h[(j, n)];
                }
                w = h[(i, i)] - p;

                if e[i] < 0.0 {
                    z = w;
                    r = ra;
                    s = sa;
                    continue;
                }
                l = i;
                if e[i] == 0.0 {
                    let (cr, ci) = cdiv(-ra, -sa, w, q);
                    h[(i, n - 1)] = cr;
                    h[(i, n)] = ci;
                } else {
                    // solve complex equations
                    x = h[(i, i + 1)];
                    y = h[(i + 1, i)];
                    let mut vr = (d[i] - p) * (d[i] - p) + e[i] * e[i] - q * q;
                    let vi = (d[i] - p) * 2.0 * q;
                    if vr == 0.0 && vi == 0.0 {
                        vr = floor
                            * (w.abs() + q.abs() + x.abs() + y.abs() + z.abs());
                        warn!(
                            "zero pivot in row {i} of eigenvector pair {}, \
                     replacing with {vr:e}",
                            n - 1
                        );
                    }
                    let (cr, ci) = cdiv(
                        x * r - z * ra + q * sa,
                        x * s - z * sa - q * ra,
                        vr,
                        vi,
                    );
                    h[(i, n - 1)] = cr;
                    h[(i, n)] = ci;
                    if x.abs() > z.abs() + q.abs() {
                        h[(i + 1, n - 1)] =
                            (-ra - w * h[(i, n - 1)] + q * h[(i, n)]) / x;
                        h[(i + 1, n)] =
                            (-sa - w * h[(i, n)] - q * h[(i, n - 1)]) / x;
                    } else {
                        let (cr, ci) = cdiv(
                            -r - y * h[(i, n - 1)],
                            -s - y * h[(i, n)],
                            z,
                            q,
                        );
                        h[(i + 1, n - 1)] = cr;
                        h[(i + 1, n)] = ci;
                    }
                }

                // overflow control
                let t = h[(i, n - 1)].abs().max(h[(i, n)].abs());
                if (EPS * t) * t > 1.0 {
                    for j in i..=n {
                        h[(j, n - 1)] /= t;
                        h[(j, n)] /= t;
                    }
                }
            }
        }
    }

    // back transformation to get eigenvectors of the original matrix
    for j in (0..nn).rev() {
        for i in 0..=high {
            z = 0.0;
            for k in 0..=j.min(high) {
                z += v[(i, k)] * h[(k, j)];
            }
            v[(i, j)] = z;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::{dmatrix, Complex};

    use super::*;

    #[test]
    fn test_cdiv() {
        // both branches against the naive formula on well-scaled input
        let tests = [
            (1.0, 2.0, 3.0, -4.0),
            (-2.5, 0.5, 0.1, 7.0),
            (0.0, -1.0, 0.0, -1.0),
            (3.0, 3.0, 2.0, 2.0),
        ];
        for (xr, xi, yr, yi) in tests {
            let want = Complex::new(xr, xi) / Complex::new(yr, yi);
            let (gr, gi) = cdiv(xr, xi, yr, yi);
            assert_abs_diff_eq!(gr, want.re, epsilon = 1e-15);
            assert_abs_diff_eq!(gi, want.im, epsilon = 1e-15);
        }
    }

    #[test]
    fn cdiv_no_overflow() {
        // |y|² overflows here, but the quotient is 1 + 0i
        let (gr, gi) = cdiv(1e300, 1e300, 1e300, 1e300);
        assert_abs_diff_eq!(gr, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(gi, 0.0, epsilon = 1e-15);
        let (gr, gi) = cdiv(1e-300, 0.0, 0.0, 1e-300);
        assert_abs_diff_eq!(gr, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(gi, -1.0, epsilon = 1e-15);
    }

    #[test]
    fn qr_cap() {
        let a = dmatrix![
            1.0, 2.0, 3.0;
            4.0, 5.0, 6.0;
            7.0, 8.0, 10.0;
        ];
        let err = decompose(&a, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::NoConvergence {
                stage: Stage::Qr,
                index: 2,
                iterations: 0,
            }
        ));
    }

    #[test]
    fn zero_matrix() {
        let a = Dmat::zeros(3, 3);
        let (d, e, v) = decompose(&a, 30).unwrap();
        assert_eq!(d, Dvec::zeros(3));
        assert_eq!(e, Dvec::zeros(3));
        assert_eq!(v, Dmat::identity(3, 3));
    }
}
