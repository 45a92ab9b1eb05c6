//! symmetric path: Householder reduction to tridiagonal form followed by the
//! implicit QL algorithm. Both routines descend from the Algol procedures
//! TRED2 and TQL2 by Bowdler, Martin, Reinsch, and Wilkinson, Handbook for
//! Auto. Comp., Vol. II-Linear Algebra, 212-240 (1971)

use log::{debug, trace};

use crate::error::{Error, Result, Stage};
use crate::settings::Settings;
use crate::{Dmat, Dvec, EPS};

/// compute the eigenvalues and orthogonal eigenvectors of the symmetric
/// matrix `a`, reading only its lower triangle. the eigenvalues are sorted
/// according to `settings.order`
pub(crate) fn decompose(
    a: &Dmat,
    settings: &Settings,
) -> Result<(Dvec, Dvec, Dmat)> {
    let n = a.nrows();
    let mut v = a.clone();
    let mut d = Dvec::zeros(n);
    let mut e = Dvec::zeros(n);
    tred2(&mut v, &mut d, &mut e);
    tql2(&mut d, &mut e, &mut v, settings.max_iter)?;
    sort(&mut d, &mut v, settings.is_descending());
    Ok((d, e, v))
}

/// reduce the symmetric matrix stored in the lower triangle of `v` to
/// tridiagonal form using orthogonal similarity transformations. on output
/// `d` holds the diagonal, `e` the sub-diagonal in its last n-1 elements with
/// `e[0] = 0`, and `v` the accumulated orthogonal transformation
pub(crate) fn tred2(v: &mut Dmat, d: &mut Dvec, e: &mut Dvec) {
    let n = v.nrows();
    for j in 0..n {
        d[j] = v[(n - 1, j)];
    }

    for i in (1..n).rev() {
        // scale to avoid under/overflow
        let scale: f64 = (0..i).map(|k| d[k].abs()).sum();
        let mut h = 0.0;
        if scale == 0.0 {
            // nothing to annihilate in this column, so skip the reflection
            e[i] = d[i - 1];
            for j in 0..i {
                d[j] = v[(i - 1, j)];
                v[(i, j)] = 0.0;
                v[(j, i)] = 0.0;
            }
        } else {
            // generate Householder vector
            for k in 0..i {
                d[k] /= scale;
                h += d[k] * d[k];
            }
            let f = d[i - 1];
            let g = -h.sqrt().copysign(f);
            e[i] = scale * g;
            h -= f * g;
            d[i - 1] = f - g;
            for j in 0..i {
                e[j] = 0.0;
            }

            // apply similarity transformation to the remaining columns
            for j in 0..i {
                let f = d[j];
                v[(j, i)] = f;
                let mut g = e[j] + v[(j, j)] * f;
                for k in j + 1..i {
                    g += v[(k, j)] * d[k];
                    e[k] += v[(k, j)] * f;
                }
                e[j] = g;
            }
            let mut f = 0.0;
            for j in 0..i {
                e[j] /= h;
                f += e[j] * d[j];
            }
            let hh = f / (h + h);
            for j in 0..i {
                e[j] -= hh * d[j];
            }
            for j in 0..i {
                let f = d[j];
                let g = e[j];
                for k in j..i {
                    v[(k, j)] -= f * e[k] + g * d[k];
                }
                d[j] = v[(i - 1, j)];
                v[(i, j)] = 0.0;
            }
        }
        d[i] = h;
    }

    // accumulate transformations
    for i in 0..n - 1 {
        v[(n - 1, i)] = v[(i, i)];
        v[(i, i)] = 1.0;
        let h = d[i + 1];
        if h != 0.0 {
            for k in 0..=i {
                d[k] = v[(k, i + 1)] / h;
            }
            for j in 0..=i {
                let mut g = 0.0;
                for k in 0..=i {
                    g += v[(k, i + 1)] * v[(k, j)];
                }
                for k in 0..=i {
                    v[(k, j)] -= g * d[k];
                }
            }
        }
        for k in 0..=i {
            v[(k, i + 1)] = 0.0;
        }
    }
    for j in 0..n {
        d[j] = v[(n - 1, j)];
        v[(n - 1, j)] = 0.0;
    }
    v[(n - 1, n - 1)] = 1.0;
    e[0] = 0.0;
}

/// find the eigenvalues and eigenvectors of the symmetric tridiagonal matrix
/// described by `d` and `e` (in the layout produced by [tred2]) with the
/// implicit QL method. the rotations are accumulated into `v`, so if `v`
/// holds the transformation from [tred2] on input it holds the eigenvectors
/// of the full matrix on output. `e` is destroyed
pub(crate) fn tql2(
    d: &mut Dvec,
    e: &mut Dvec,
    v: &mut Dmat,
    max_iter: usize,
) -> Result<()> {
    let n = d.len();
    for i in 1..n {
        e[i - 1] = e[i];
    }
    e[n - 1] = 0.0;

    let mut f = 0.0;
    let mut tst1: f64 = 0.0;
    for l in 0..n {
        // find small sub-diagonal element. e[n-1] is always zero, so the
        // search cannot run off the end
        tst1 = tst1.max(d[l].abs() + e[l].abs());
        let m = (l..n)
            .find(|&m| e[m].abs() <= EPS * tst1)
            .unwrap_or(n - 1);

        // if m == l, d[l] is already an eigenvalue; otherwise iterate
        if m > l {
            let mut iter = 0;
            loop {
                if iter >= max_iter {
                    return Err(Error::NoConvergence {
                        stage: Stage::Ql,
                        index: l,
                        iterations: iter,
                    });
                }
                iter += 1;

                // compute implicit shift
                let g = d[l];
                let p = (d[l + 1] - g) / (2.0 * e[l]);
                let r = p.hypot(1.0).copysign(p);
                d[l] = e[l] / (p + r);
                d[l + 1] = e[l] * (p + r);
                let dl1 = d[l + 1];
                let h = g - d[l];
                for i in l + 2..n {
                    d[i] -= h;
                }
                f += h;

                // implicit QL transformation
                let mut p = d[m];
                let mut c = 1.0;
                let mut c2 = c;
                let mut c3 = c;
                let el1 = e[l + 1];
                let mut s = 0.0;
                let mut s2 = 0.0;
                for i in (l..m).rev() {
                    c3 = c2;
                    c2 = c;
                    s2 = s;
                    let g = c * e[i];
                    let h = c * p;
                    let r = p.hypot(e[i]);
                    e[i + 1] = s * r;
                    s = e[i] / r;
                    c = p / r;
                    p = c * d[i] - s * g;
                    d[i + 1] = h + s * (c * g + s * d[i]);

                    // accumulate transformation
                    for k in 0..n {
                        let h = v[(k, i + 1)];
                        v[(k, i + 1)] = s * v[(k, i)] + c * h;
                        v[(k, i)] = c * v[(k, i)] - s * h;
                    }
                }
                let p = -s * s2 * c3 * el1 * e[l] / dl1;
                e[l] = s * p;
                d[l] = c * p;
                trace!("QL sweep {iter} on eigenvalue {l}: e = {:e}", e[l]);

                if e[l].abs() <= EPS * tst1 {
                    break;
                }
            }
            debug!("eigenvalue {l} converged after {iter} QL sweeps");
        }
        d[l] += f;
        e[l] = 0.0;
    }
    Ok(())
}

/// sort the eigenvalues in `d` into ascending order, or descending if
/// `reverse` is set, permuting the columns of `v` to match
pub(crate) fn sort(d: &mut Dvec, v: &mut Dmat, reverse: bool) {
    let n = d.len();
    for i in 0..n.saturating_sub(1) {
        let mut k = i;
        let mut p = d[i];
        for j in i + 1..n {
            if d[j] < p {
                k = j;
                p = d[j];
            }
        }
        if k != i {
            d[k] = d[i];
            d[i] = p;
            v.swap_columns(i, k);
        }
    }
    if reverse {
        d.as_mut_slice().reverse();
        for i in 0..n / 2 {
            v.swap_columns(i, n - i - 1);
        }
    }
}
