use nalgebra::Complex;

use super::*;

fn eigen(d: Dvec, e: Dvec) -> Eigen {
    let n = d.len();
    Eigen {
        symmetric: false,
        d,
        e,
        v: Dmat::identity(n, n),
    }
}

#[test]
fn test_d_matrix() {
    let eigen = eigen(
        na::dvector![1.0, 2.0, 2.0, 5.0],
        na::dvector![0.0, 3.0, -3.0, 0.0],
    );
    let want = na::dmatrix![
        1.0, 0.0, 0.0, 0.0;
        0.0, 2.0, 3.0, 0.0;
        0.0, -3.0, 2.0, 0.0;
        0.0, 0.0, 0.0, 5.0;
    ];
    assert_eq!(eigen.d_matrix(), want);

    let vals = eigen.eigenvalues();
    assert_eq!(vals[1], Complex::new(2.0, 3.0));
    assert_eq!(vals[2], Complex::new(2.0, -3.0));
}

#[test]
fn leading_pair() {
    let eigen = eigen(na::dvector![-1.0, -1.0], na::dvector![0.5, -0.5]);
    assert_eq!(eigen.d_matrix(), na::dmatrix![-1.0, 0.5; -0.5, -1.0]);
}

#[test]
fn d_matrix_into() {
    let eigen = eigen(
        na::dvector![4.0, 0.0, 0.0],
        na::dvector![0.0, 1.0, -1.0],
    );
    let want = na::dmatrix![
        4.0, 0.0, 0.0;
        0.0, 0.0, 1.0;
        0.0, -1.0, 0.0;
    ];

    // wrong shape gets replaced
    let mut out = Dmat::from_element(2, 5, 7.0);
    eigen.d_matrix_into(&mut out);
    assert_eq!(out, want);

    // right shape gets cleared, including stale off-diagonal entries
    let mut out = Dmat::from_element(3, 3, 7.0);
    eigen.d_matrix_into(&mut out);
    assert_eq!(out, want);
}

#[test]
fn from_decomposition() {
    let a = testfile("rotation");
    let eigen = Eigen::new(&a).unwrap();
    let mut out = Dmat::zeros(0, 0);
    eigen.d_matrix_into(&mut out);
    assert_eq!(out, eigen.d_matrix());
    assert_eq!(eigen.len(), 2);
    assert!(!eigen.is_empty());
}
