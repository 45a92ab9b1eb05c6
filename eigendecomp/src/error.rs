use std::{fmt::Display, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// the iterative stage that failed to converge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// implicit QL iteration on the symmetric tridiagonal matrix
    Ql,

    /// double-shift QR iteration on the Hessenberg matrix
    Qr,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Ql => write!(f, "QL"),
            Stage::Qr => write!(f, "QR"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot decompose an empty matrix")]
    Empty,

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("matrix contains a non-finite entry")]
    NonFinite,

    /// the iteration for eigenvalue `index` hit the cap of `iterations`
    /// sweeps without deflating
    #[error(
        "{stage} iteration failed to converge for eigenvalue {index} \
         after {iterations} iterations"
    )]
    NoConvergence {
        stage: Stage,
        index: usize,
        iterations: usize,
    },

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse '{token}' on line {line}")]
    Parse { line: usize, token: String },

    #[error("line {line} has {got} entries, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn is_convergence(&self) -> bool {
        matches!(self, Error::NoConvergence { .. })
    }
}
