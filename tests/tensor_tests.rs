//! Tensor shape and flattening properties.

use ludii_spiel::core::{TensorBuffer, TensorShape};
use ludii_spiel::LudiiError;
use proptest::prelude::*;

fn planes(c: usize, r: usize, w: usize) -> Vec<Vec<Vec<f32>>> {
    (0..c)
        .map(|ci| {
            (0..r)
                .map(|ri| (0..w).map(|wi| ((ci * r + ri) * w + wi) as f32).collect())
                .collect()
        })
        .collect()
}

proptest! {
    #[test]
    fn flattening_is_row_major(c in 1usize..6, r in 1usize..8, w in 1usize..8) {
        let shape = TensorShape::new(&[c, r, w]);
        let tensor = TensorBuffer::from_planes(&shape, &planes(c, r, w)).unwrap();

        prop_assert_eq!(tensor.len(), shape.num_elements());
        for (i, v) in tensor.values().iter().enumerate() {
            prop_assert_eq!(*v, i as f32);
        }
        prop_assert_eq!(tensor.get(&[c - 1, r - 1, w - 1]), Some((c * r * w - 1) as f32));
        prop_assert_eq!(tensor.get(&[c, 0, 0]), None);
    }

    #[test]
    fn wrong_channel_count_is_shape_mismatch(c in 1usize..6, r in 1usize..6, w in 1usize..6, extra in 1usize..3) {
        let shape = TensorShape::new(&[c, r, w]);
        let err = TensorBuffer::from_planes(&shape, &planes(c + extra, r, w)).unwrap_err();
        match err {
            LudiiError::ShapeMismatch { expected, actual } => {
                prop_assert_eq!(expected, shape);
                prop_assert_eq!(actual.dims(), &[c + extra, r, w][..]);
            }
            other => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn foreign_dims_must_be_positive(dims in proptest::collection::vec(-3i32..10, 1..5)) {
        let result = TensorShape::from_foreign(&dims);
        if dims.iter().all(|&d| d > 0) {
            let shape = result.unwrap();
            prop_assert_eq!(shape.rank(), dims.len());
            prop_assert_eq!(shape.num_elements(), dims.iter().map(|&d| d as usize).product::<usize>());
        } else {
            let is_invocation = matches!(result, Err(LudiiError::Invocation { .. }));
            prop_assert!(is_invocation);
        }
    }
}

#[test]
fn test_ragged_row_is_rejected() {
    let shape = TensorShape::new(&[2, 2, 3]);
    let mut p = planes(2, 2, 3);
    p[1][0].pop();
    let err = TensorBuffer::from_planes(&shape, &p).unwrap_err();
    assert!(matches!(err, LudiiError::ShapeMismatch { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_flat_buffer_checks_length() {
    let shape = TensorShape::new(&[2, 3]);
    assert!(TensorBuffer::new(vec![0.0; 6], shape.clone()).is_ok());
    assert!(TensorBuffer::new(vec![0.0; 5], shape).is_err());
}
