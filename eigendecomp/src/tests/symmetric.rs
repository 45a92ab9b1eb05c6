use super::*;
use crate::{check_mat, check_vec};

#[test]
fn symm5() {
    let a = testfile("symm5");
    let eigen = Eigen::new(&a).unwrap();
    assert!(eigen.is_symmetric());
    assert!(eigen.e().iter().all(|&x| x == 0.0));
    let d = eigen.d();
    assert!(d.as_slice().windows(2).all(|w| w[0] <= w[1]));
    // trace is preserved
    assert!((d.sum() - a.trace()).abs() < 1e-12);

    let v = eigen.v();
    check_mat!(&(v.transpose() * v), &Dmat::identity(5, 5), 1e-13, "VᵀV");
    assert!(eigen.residual(&a) < tol(&a));
    // D is diagonal
    check_mat!(&eigen.d_matrix(), &Dmat::from_diagonal(d), 0.0, "D");
}

#[test]
fn diagonal() {
    struct Test {
        label: &'static str,
        inp: Dmat,
        d: Dvec,
        v: Dmat,
    }
    let tests = [
        Test {
            label: "identity",
            inp: Dmat::identity(4, 4),
            d: Dvec::from_element(4, 1.0),
            v: Dmat::identity(4, 4),
        },
        Test {
            label: "3I",
            inp: Dmat::identity(2, 2) * 3.0,
            d: na::dvector![3.0, 3.0],
            v: Dmat::identity(2, 2),
        },
        Test {
            label: "distinct",
            inp: Dmat::from_diagonal(&na::dvector![3.0, 1.0, 2.0]),
            d: na::dvector![1.0, 2.0, 3.0],
            v: na::dmatrix![
                0.0, 0.0, 1.0;
                1.0, 0.0, 0.0;
                0.0, 1.0, 0.0;
            ],
        },
    ];
    for test in tests {
        let eigen = Eigen::new(&test.inp).unwrap();
        assert!(eigen.is_symmetric(), "{}", test.label);
        check_vec!(eigen.d(), &test.d, 1e-15, test.label);
        check_mat!(&eigen.v().abs(), &test.v, 1e-15, test.label);
        assert!(eigen.residual(&test.inp) < 1e-14, "{}", test.label);
    }
}

#[test]
fn descending() {
    let a = testfile("symm5");
    let settings = Settings {
        order: Order::Descending,
        ..Settings::default()
    };
    let up = Eigen::new(&a).unwrap();
    let down = Eigen::with_settings(&a, &settings).unwrap();
    let mut want: Vec<_> = up.d().iter().copied().collect();
    want.reverse();
    check_vec!(down.d(), &Dvec::from(want), 0.0, "descending");
    assert!(down.residual(&a) < tol(&a));
}

/// only the lower triangle is read
#[test]
fn test_symm_eigen_decomp() {
    struct Test {
        label: &'static str,
        inp: Dmat,
        d: Dvec,
        z: Dmat,
        eps: f64,
        zeps: f64,
    }
    let tests = [
        Test {
            label: "c3hcn",
            inp: na::dmatrix![
            159.1101420,0.0,0.0;
            0.0000000,144.3669747,0.0;
            0.0000000,-0.0068560,14.7431673;
                    ],
            d: na::dvector![
                14.743166932677951,
                144.36697510489992,
                159.1101420375779
            ],
            z: na::dmatrix![
            0.000000000000,0.000000000000,1.000000000000;
            0.000052891138,0.999999998601,0.000000000000;
            0.999999998601,0.000052891138,0.000000000000;
                    ],
            eps: 4.3e-8,
            zeps: 4e-10,
        },
        Test {
            label: "c3hf",
            inp: na::dmatrix![
                    66.2593939, 0.0, 0.0;
                    0.0000000,81.3146042, 0.0;
                    -0.0035385,0.0000000,15.0552103;
            ],
            d: na::dvector![
                15.055210103919038,
                66.259394131429275,
                81.314604235348312
            ],
            z: na::dmatrix![
                0.000069106049,0.999999997612,0.000000000000;
                0.000000000000,0.000000000000,1.000000000000;
                0.999999997612,0.000069106049,0.000000000000;
            ],
            eps: 4.9e-8,
            zeps: 4e-10,
        },
    ];
    for test in tests {
        let full = {
            let mut m = test.inp.clone();
            m.fill_upper_triangle_with_lower_triangle();
            m
        };
        let (d, z) = symm_eigen_decomp(test.inp.clone(), false).unwrap();
        check_vec!(&d, &test.d, test.eps, test.label);
        check_mat!(&z.abs(), &test.z, test.zeps, test.label);
        check_mat!(
            &(&full * &z),
            &(&z * Dmat::from_diagonal(&d)),
            1e-11,
            test.label
        );

        let (d, _) = symm_eigen_decomp(test.inp, true).unwrap();
        assert!(d.as_slice().windows(2).all(|w| w[0] >= w[1]), "{}", test.label);
    }
}
