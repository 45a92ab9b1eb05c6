use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Dmat, Eigen};

/// the results of a decomposition in a form suitable for printing or
/// serializing
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Output {
    /// whether the symmetric algorithm was used
    pub symmetric: bool,

    /// real parts of the eigenvalues
    pub real: Vec<f64>,

    /// imaginary parts of the eigenvalues
    pub imag: Vec<f64>,

    /// eigenvector matrix, row by row
    pub eigenvectors: Vec<Vec<f64>>,

    /// largest absolute element of A·V - V·D
    pub residual: f64,
}

impl Output {
    /// collect the results of `eigen`, the decomposition of `a`
    pub fn new(eigen: &Eigen, a: &Dmat) -> Self {
        Self {
            symmetric: eigen.is_symmetric(),
            real: eigen.d().iter().copied().collect(),
            imag: eigen.e().iter().copied().collect(),
            eigenvectors: eigen
                .v()
                .row_iter()
                .map(|r| r.iter().copied().collect())
                .collect(),
            residual: eigen.residual(a),
        }
    }
}

impl Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} matrix, residual max|AV - VD| = {:.3e}",
            if self.symmetric {
                "Symmetric"
            } else {
                "Non-symmetric"
            },
            self.residual
        )?;
        writeln!(f, "\nEigenvalues:\n{:>5}{:>20}{:>20}", "#", "Real", "Imag")?;
        for (i, (re, im)) in self.real.iter().zip(&self.imag).enumerate() {
            writeln!(f, "{:5}{re:20.12}{im:20.12}", i + 1)?;
        }

        writeln!(f, "\nEigenvectors (columns):")?;
        for row in &self.eigenvectors {
            for x in row {
                write!(f, "{x:16.10}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
