use std::{fs::read_to_string, path::Path};

use crate::error::{Error, Result};
use crate::Dmat;

/// load a matrix from the file at `filename`. see [parse_dmat] for the
/// format
pub fn load_dmat<P>(filename: P) -> Result<Dmat>
where
    P: AsRef<Path>,
{
    let path = filename.as_ref();
    let data = read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dmat(&data)
}

/// parse a matrix written one row per line with whitespace-separated
/// entries. blank lines are skipped and `#` starts a comment running to the
/// end of the line:
/// ```text
/// # rotation by 90°
/// 0.0 1.0
/// -1.0 0.0
/// ```
pub fn parse_dmat(data: &str) -> Result<Dmat> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (i, line) in data.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        let row = line
            .split_whitespace()
            .map(|s| {
                s.parse::<f64>().map_err(|_| Error::Parse {
                    line: i + 1,
                    token: s.to_owned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if row.is_empty() {
            continue;
        }
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(Error::Ragged {
                    line: i + 1,
                    expected: first.len(),
                    got: row.len(),
                });
            }
        }
        rows.push(row);
    }
    let cols = rows.first().map_or(0, Vec::len);
    Ok(Dmat::from_row_iterator(
        rows.len(),
        cols,
        rows.into_iter().flatten(),
    ))
}

#[cfg(test)]
mod tests {
    use nalgebra::dmatrix;

    use super::*;

    #[test]
    fn test_parse_dmat() {
        let got = parse_dmat(
            "
# a comment
1.0 2.0 3.0
4.0   5.0 6.0 # trailing comment

7 8 9
",
        )
        .unwrap();
        let want = dmatrix![
            1.0, 2.0, 3.0;
            4.0, 5.0, 6.0;
            7.0, 8.0, 9.0;
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn parse_errors() {
        let err = parse_dmat("1.0 2.0\n3.0 x\n").unwrap_err();
        assert!(
            matches!(err, Error::Parse { line: 2, ref token } if token == "x")
        );

        let err = parse_dmat("1.0 2.0\n3.0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Ragged {
                line: 2,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn empty() {
        let got = parse_dmat("# nothing here\n\n").unwrap();
        assert_eq!(got.shape(), (0, 0));
    }

    #[test]
    fn test_load_dmat() {
        let got = load_dmat("testfiles/rotation").unwrap();
        assert_eq!(got, dmatrix![0.0, 1.0; -1.0, 0.0]);
        assert!(matches!(
            load_dmat("testfiles/missing").unwrap_err(),
            Error::Io { .. }
        ));
    }
}
