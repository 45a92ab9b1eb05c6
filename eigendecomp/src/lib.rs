//! eigen decomposition of dense real square matrices.
//!
//! For a matrix A, [Eigen] holds a real matrix V and the pieces of a real
//! block diagonal matrix D such that A·V = V·D.
//!
//! If A is symmetric, D is diagonal and V is orthogonal. Otherwise D has the
//! real eigenvalues in 1×1 blocks and each complex pair a ± ib in a 2×2 block
//! `[a, b; -b, a]`:
//! ```text
//!     u + iv     .        .        .            u  v  .  .  .
//!       .      u - iv     .        .           -v  u  .  .  .
//!       .        .        x        .     ->     .  .  x  .  .
//!       .        .        .      a + ib         .  .  .  a  b
//!       .        .        .      a - ib         .  .  . -b  a
//! ```
//! which keeps V real in both cases. In the non-symmetric case V may be badly
//! conditioned or even singular, so A = V·D·V⁻¹ only holds as well as the
//! condition number of V allows.

use log::debug;
use nalgebra::Complex;

pub mod error;
pub mod load;
pub mod output;
pub mod settings;

mod hessenberg;
mod schur;
mod tridiag;

pub use error::{Error, Result, Stage};
pub use load::{load_dmat, parse_dmat};
pub use output::Output;
pub use settings::{Order, Settings, MAX_ITER};


pub type Dvec = nalgebra::DVector<f64>;
pub type Dmat = nalgebra::DMatrix<f64>;

/// machine epsilon, 2⁻⁵², used as the relative threshold for negligible
/// off-diagonal elements in both iterations
pub(crate) const EPS: f64 = f64::EPSILON;

/// the eigen decomposition of a square matrix
#[derive(Clone, Debug, PartialEq)]
pub struct Eigen {
    symmetric: bool,

    /// real parts of the eigenvalues
    d: Dvec,

    /// imaginary parts of the eigenvalues
    e: Dvec,

    /// eigenvectors, one per column
    v: Dmat,
}

impl Eigen {
    /// decompose `a` using the default [Settings]
    pub fn new(a: &Dmat) -> Result<Self> {
        Self::with_settings(a, &Settings::default())
    }

    /// decompose `a` according to `settings`. empty, non-square, and
    /// non-finite input is rejected before any work is done, and an
    /// eigenvalue that does not converge within `settings.max_iter` sweeps
    /// is an [Error::NoConvergence] rather than a partial result
    pub fn with_settings(a: &Dmat, settings: &Settings) -> Result<Self> {
        check(a)?;
        let symmetric = is_symmetric(a, settings.symm_tol);
        let n = a.nrows();
        let k = exponent(a);
        let scaled = scale(a, -k);
        let (mut d, mut e, v) = if symmetric {
            debug!("decomposing symmetric {n}x{n} matrix, scaled by 2^{}", -k);
            tridiag::decompose(&scaled, settings)?
        } else {
            debug!(
                "decomposing non-symmetric {n}x{n} matrix, scaled by 2^{}",
                -k
            );
            schur::decompose(&scaled, settings.max_iter)?
        };
        d.apply(|x| *x = ldexp(*x, k));
        e.apply(|x| *x = ldexp(*x, k));
        Ok(Self { symmetric, d, e, v })
    }

    /// whether the symmetric algorithm was used
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// real parts of the eigenvalues
    pub fn d(&self) -> &Dvec {
        &self.d
    }

    /// imaginary parts of the eigenvalues. a complex conjugate pair occupies
    /// two consecutive entries with the positive one first
    pub fn e(&self) -> &Dvec {
        &self.e
    }

    /// the eigenvector matrix V
    pub fn v(&self) -> &Dmat {
        &self.v
    }

    pub fn len(&self) -> usize {
        self.d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    /// write the block diagonal eigenvalue matrix D into `out`, resizing it
    /// to n×n first if needed
    pub fn d_matrix_into(&self, out: &mut Dmat) {
        let n = self.len();
        if out.shape() == (n, n) {
            out.fill(0.0);
        } else {
            *out = Dmat::zeros(n, n);
        }
        for i in 0..n {
            out[(i, i)] = self.d[i];
            if self.e[i] > 0.0 {
                out[(i, i + 1)] = self.e[i];
            } else if self.e[i] < 0.0 {
                out[(i, i - 1)] = self.e[i];
            }
        }
    }

    /// the block diagonal eigenvalue matrix D
    pub fn d_matrix(&self) -> Dmat {
        let mut ret = Dmat::zeros(self.len(), self.len());
        self.d_matrix_into(&mut ret);
        ret
    }

    /// the eigenvalues as complex numbers
    pub fn eigenvalues(&self) -> Vec<Complex<f64>> {
        self.d
            .iter()
            .zip(self.e.iter())
            .map(|(&re, &im)| Complex::new(re, im))
            .collect()
    }

    /// the largest absolute element of A·V - V·D. `a` should be the matrix
    /// this decomposition was computed from
    pub fn residual(&self, a: &Dmat) -> f64 {
        let d = self.d_matrix();
        (a * &self.v - &self.v * d).amax()
    }
}

/// compute the eigen decomposition of the symmetric matrix `mat`, reading
/// only its lower triangle, and return the eigenvalues and the corresponding
/// eigenvectors in ascending order, or in descending order if `reverse` is
/// set
pub fn symm_eigen_decomp(mat: Dmat, reverse: bool) -> Result<(Dvec, Dmat)> {
    check(&mat)?;
    let settings = Settings {
        order: if reverse {
            Order::Descending
        } else {
            Order::Ascending
        },
        ..Settings::default()
    };
    let k = exponent(&mat);
    let (mut d, _, v) = tridiag::decompose(&scale(&mat, -k), &settings)?;
    d.apply(|x| *x = ldexp(*x, k));
    Ok((d, v))
}

/// report whether `a` is symmetric to within the relative tolerance `tol`.
/// entries a[(i, j)] and a[(j, i)] match when their difference is no larger
/// than `tol` times the larger of their magnitudes
pub fn is_symmetric(a: &Dmat, tol: f64) -> bool {
    let n = a.nrows();
    if n != a.ncols() {
        return false;
    }
    for j in 0..n {
        for i in j + 1..n {
            let (x, y) = (a[(i, j)], a[(j, i)]);
            if (x - y).abs() > tol * x.abs().max(y.abs()) {
                return false;
            }
        }
    }
    true
}

/// the binary exponent of the largest element of `a`, so that `a·2⁻ᵏ` has
/// its largest element in [1, 2). zero for the zero matrix
fn exponent(a: &Dmat) -> i32 {
    let max = a.amax();
    if max == 0.0 {
        0
    } else {
        max.log2().floor() as i32
    }
}

/// x·2ᵏ, split in two factors so that neither 2ᵏ nor its reciprocal has to be
/// representable on its own
fn ldexp(x: f64, k: i32) -> f64 {
    let h = k / 2;
    x * 2f64.powi(h) * 2f64.powi(k - h)
}

/// `a·2ᵏ`. scaling by a power of two is exact unless it leaves the normal
/// range, and it keeps the products formed by the iterations from
/// overflowing or underflowing on very large or very small input
fn scale(a: &Dmat, k: i32) -> Dmat {
    if k == 0 {
        a.clone()
    } else {
        a.map(|x| ldexp(x, k))
    }
}

/// reject input the algorithms cannot start on
fn check(a: &Dmat) -> Result<()> {
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(Error::NotSquare { rows, cols });
    }
    if rows == 0 {
        return Err(Error::Empty);
    }
    if a.iter().any(|x| !x.is_finite()) {
        return Err(Error::NonFinite);
    }
    Ok(())
}
