use ferrite_idx::{Matrix, MatrixError};

fn m(rows: usize, cols: usize, data: &[f64]) -> Matrix {
    Matrix::from_vec(rows, cols, data.to_vec()).unwrap()
}

#[test]
fn test_zeros_and_shape() {
    let z: Matrix = Matrix::zeros(3, 4);
    assert_eq!(z.shape(), (3, 4));
    assert_eq!(z.len(), 12);
    assert!(z.iter().all(|&x| x == 0.0));

    let empty: Matrix<i32> = Matrix::zeros(0, 5);
    assert!(empty.is_empty());
    assert_eq!(empty.iter(), empty.iter());
}

#[test]
fn test_try_zeros_reports_overflow() {
    assert_eq!(
        Matrix::<u8>::try_zeros(usize::MAX, 2),
        Err(MatrixError::Overflow { rows: usize::MAX, cols: 2 })
    );
    let failed: Matrix<u8> = Matrix::zeros(usize::MAX, 2);
    assert_eq!(failed.shape(), (0, 0));
    assert!(failed.is_empty());
}

#[test]
fn test_from_vec_and_rows() {
    assert_eq!(
        Matrix::from_vec(2, 2, vec![1, 2, 3]),
        Err(MatrixError::DataLength { len: 3, rows: 2, cols: 2 })
    );
    let a = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    assert_eq!(a.shape(), (2, 3));
    assert_eq!(a[(1, 0)], 4);
    assert_eq!(a.get(0, 2), Some(&3));
    assert_eq!(a.get(2, 0), None);
    assert_eq!(a.row(1), &[4, 5, 6]);
    assert!(Matrix::from_rows(vec![vec![1, 2], vec![3]]).is_err());
}

#[test]
fn test_row_and_column_traversal() {
    let a = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]).unwrap();

    let row_major: Vec<i32> = a.iter().copied().collect();
    assert_eq!(row_major, (1..=9).collect::<Vec<_>>());

    let middle: Vec<i32> = a.column(1).copied().collect();
    assert_eq!(middle, vec![2, 5, 8]);
    assert_eq!(a.column(2).len(), 3);
    assert_eq!(a.column_end(2) - a.column(2), 3);

    let mut col = a.column(0);
    col.advance().advance().advance();
    assert_eq!(col, a.column_end(0));
    col.retreat();
    assert_eq!(*col.get(), 7);

    let row = a.row_view(2);
    assert_eq!(row.copied().sum::<i32>(), 24);
}

#[test]
fn test_dot_values() {
    let a = m(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let b = m(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
    let mut out = Matrix::default();
    assert!(Matrix::dot(&a, &b, &mut out));
    assert_eq!(out.shape(), (2, 2));
    assert_eq!(out.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
}

#[test]
fn test_dot_rejects_mismatch_and_leaves_output() {
    let a = m(2, 3, &[1.0; 6]);
    let b = m(2, 2, &[1.0; 4]);
    let mut out = m(1, 1, &[42.0]);
    let before = out.as_ptr();
    assert!(!Matrix::dot(&a, &b, &mut out));
    assert_eq!(out, m(1, 1, &[42.0]));
    assert_eq!(out.as_ptr(), before);
}

#[test]
fn test_dot_reuses_output_buffer() {
    let a = Matrix::random(8, 5);
    let b = Matrix::random(5, 3);
    let mut out = Matrix::default();

    assert!(Matrix::dot(&a, &b, &mut out));
    let address = out.as_ptr();
    for _ in 0..10 {
        assert!(Matrix::dot(&a, &b, &mut out));
        assert_eq!(out.as_ptr(), address);
        assert_eq!(out.shape(), (8, 3));
    }

    // a smaller product still fits in the same allocation
    let c = Matrix::random(2, 5);
    assert!(Matrix::dot(&c, &b, &mut out));
    assert_eq!(out.shape(), (2, 3));
    assert_eq!(out.len(), 6);
    assert_eq!(out.as_ptr(), address);
}

#[test]
fn test_dot_with_integers() {
    let identity = Matrix::from_rows(vec![vec![1, 0], vec![0, 1]]).unwrap();
    let a = Matrix::from_rows(vec![vec![3, -1], vec![2, 5]]).unwrap();
    let mut out = Matrix::zeros(2, 2);
    assert!(Matrix::dot(&identity, &a, &mut out));
    assert_eq!(out, a);
}

#[test]
fn test_transpose() {
    let a = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    let t = a.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert_eq!(t.as_slice(), &[1, 4, 2, 5, 3, 6]);
    assert_eq!(t.transpose(), a);
}

#[test]
fn test_map_and_hadamard() {
    let a = m(2, 2, &[1.0, -2.0, 3.0, -4.0]);
    let relu = a.map(|x| x.max(0.0));
    assert_eq!(relu.as_slice(), &[1.0, 0.0, 3.0, 0.0]);

    let signs: Matrix<bool> = a.map(|x| x > 0.0);
    assert_eq!(signs.as_slice(), &[true, false, true, false]);

    assert_eq!(a.hadamard(&a).unwrap().as_slice(), &[1.0, 4.0, 9.0, 16.0]);
    assert_eq!(
        a.hadamard(&m(1, 4, &[0.0; 4])),
        Err(MatrixError::ShapeMismatch(2, 2, 1, 4))
    );
}

#[test]
fn test_operators() {
    let a = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let b = m(2, 2, &[0.5, 0.5, 0.5, 0.5]);
    assert_eq!((&a + &b).as_slice(), &[1.5, 2.5, 3.5, 4.5]);
    assert_eq!((&a - &b).as_slice(), &[0.5, 1.5, 2.5, 3.5]);
    assert_eq!((&a * &b).as_slice(), &[1.5, 1.5, 3.5, 3.5]);
    assert_eq!((a.clone() + b.clone()) - b, a);
}

#[test]
#[should_panic(expected = "Matrices are of incorrect sizes")]
fn test_add_shape_mismatch_panics() {
    let _ = &m(1, 2, &[1.0, 2.0]) + &m(2, 1, &[1.0, 2.0]);
}

#[test]
fn test_clone_from_reuses_buffer() {
    let big = Matrix::random(10, 10);
    let small = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let mut dst = big.clone();
    assert_ne!(dst.as_ptr(), big.as_ptr());

    let before = dst.as_ptr();
    dst.clone_from(&small);
    assert_eq!(dst.as_ptr(), before);
    assert_eq!(dst, small);
}

#[test]
fn test_initializers_stay_finite() {
    let r = Matrix::random(20, 20);
    assert!(r.iter().all(|&x| (-1.0..1.0).contains(&x)));
    let he = Matrix::he(16, 64);
    assert!(he.iter().all(|x| x.is_finite()));
    assert_eq!(Matrix::xavier(3, 7).shape(), (3, 7));
}

#[test]
fn test_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weights.json");
    let path = path.to_str().unwrap();

    let a = m(2, 3, &[0.25, -1.0, 3.5, 0.0, 2.0, -0.125]);
    a.save_json(path).unwrap();
    assert_eq!(Matrix::<f64>::load_json(path).unwrap(), a);

    std::fs::write(path, r#"{"rows":2,"cols":2,"data":[1.0]}"#).unwrap();
    let err = Matrix::<f64>::load_json(path).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn test_deserialize_rejects_inconsistent_shape() {
    let short = serde_json::from_str::<Matrix>(r#"{"rows":2,"cols":2,"data":[1.0]}"#);
    assert!(short.is_err());
    let long = serde_json::from_str::<Matrix<i32>>(r#"{"rows":1,"cols":1,"data":[1,2]}"#);
    assert!(long.is_err());

    let ok: Matrix<i32> = serde_json::from_str(r#"{"rows":1,"cols":2,"data":[3,4]}"#).unwrap();
    assert_eq!(ok.shape(), (1, 2));
    let mut out = Matrix::default();
    assert!(Matrix::dot(&ok, &ok.transpose(), &mut out));
    assert_eq!(out.as_slice(), &[25]);
}

#[test]
fn test_row_mut_and_into_vec() {
    let mut a: Matrix<i32> = Matrix::zeros(2, 3);
    a.row_mut(1).copy_from_slice(&[7, 8, 9]);
    assert_eq!(a.column(2).copied().collect::<Vec<_>>(), vec![0, 9]);
    assert_eq!(a.into_vec(), vec![0, 0, 0, 7, 8, 9]);
}
