use std::{fs::read_to_string, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// maximum number of QL or QR sweeps spent on a single eigenvalue before
/// giving up
pub const MAX_ITER: usize = 30;

/// order of the eigenvalues returned by the symmetric path. the non-symmetric
/// path always returns them in real Schur order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

/// tunable policy for a decomposition. every field has a default, so a
/// settings file only needs to mention the ones it changes:
/// ```text
/// { "max_iter": 50, "order": "descending" }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// relative tolerance for treating a[(i, j)] and a[(j, i)] as equal in
    /// the symmetry test. zero requires exact equality
    pub symm_tol: f64,

    /// per-eigenvalue iteration cap for both the QL and QR iterations
    pub max_iter: usize,

    pub order: Order,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            symm_tol: 4.0 * f64::EPSILON,
            max_iter: MAX_ITER,
            order: Default::default(),
        }
    }
}

impl Settings {
    /// load `Settings` from the JSON file at `path`
    pub fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let data = read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn is_descending(&self) -> bool {
        self.order == Order::Descending
    }
}
