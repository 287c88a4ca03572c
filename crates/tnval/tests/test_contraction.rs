//! Integration tests for pairwise contraction.
//!
//! Checks the rank law and size validation over random shapes, and a
//! hand-computed einsum case.

use proptest::prelude::*;
use tnval::contract::{ContractionProperties, trace};
use tnval::{Contraction, Tensor, TensorError, c64, contract};

/// Deterministic complex filler so values differ per position.
fn filled(shape: &[usize], seed: usize) -> Tensor {
    Tensor::from_fn(shape, |ix| {
        let k: usize = ix.iter().enumerate().map(|(a, &i)| (a + seed) * (i + 1)).sum();
        c64::new((k % 7) as f64 - 3.0, (k % 5) as f64 - 2.0)
    })
    .unwrap()
}

/// Two shapes and a valid wire list between them.
fn wired_shapes() -> impl Strategy<Value = (Vec<usize>, Vec<usize>, Vec<(usize, usize)>)> {
    (
        prop::collection::vec(1usize..=3, 0..=4),
        prop::collection::vec(1usize..=3, 0..=4),
    )
        .prop_flat_map(|(a, b)| {
            let max = a.len().min(b.len());
            (Just(a), Just(b), 0..=max)
        })
        .prop_flat_map(|(a, b, k)| {
            let a_axes = prop::sample::subsequence((0..a.len()).collect::<Vec<_>>(), k);
            let b_axes = prop::sample::subsequence((0..b.len()).collect::<Vec<_>>(), k).prop_shuffle();
            (Just(a), Just(b), a_axes, b_axes)
        })
        .prop_map(|(a, mut b, a_axes, b_axes)| {
            let wires: Vec<(usize, usize)> = a_axes.into_iter().zip(b_axes).collect();
            for &(i, j) in &wires {
                b[j] = a[i];
            }
            (a, b, wires)
        })
}

proptest! {
    #[test]
    fn rank_law_holds((shape_a, shape_b, wires) in wired_shapes()) {
        let a = filled(&shape_a, 1);
        let b = filled(&shape_b, 2);
        let c = contract(&a, &b, &wires).unwrap();
        prop_assert_eq!(c.ndim(), a.ndim() + b.ndim() - 2 * wires.len());

        let props = ContractionProperties::compute(&shape_a, &shape_b, &wires).unwrap();
        prop_assert_eq!(c.shape(), props.output_shape.as_slice());
        prop_assert_eq!(c.len(), c.shape().iter().product::<usize>());
    }

    #[test]
    fn unequal_sizes_always_fail(
        shape_a in prop::collection::vec(1usize..=3, 1..=3),
        shape_b in prop::collection::vec(1usize..=3, 1..=3),
        i in 0usize..3,
        j in 0usize..3,
    ) {
        let (i, j) = (i % shape_a.len(), j % shape_b.len());
        let mut shape_b = shape_b;
        shape_b[j] = shape_a[i] % 3 + 1;
        let a = filled(&shape_a, 0);
        let b = filled(&shape_b, 0);
        let is_mismatch = matches!(
            contract(&a, &b, &[(i, j)]),
            Err(TensorError::DimensionMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }
}

/// `(2,2) x (2,2)` over `[(0,1)]` is `einsum("ij,ki->jk")`.
#[test]
fn test_einsum_ij_ki_jk_complex() {
    let t1 = Tensor::from_vec(
        vec![
            c64::new(0.2, -0.8),
            c64::new(-0.9, -0.4),
            c64::new(-0.5, 0.7),
            c64::new(0.5, 0.0),
        ],
        &[2, 2],
    )
    .unwrap();
    let t2 = Tensor::from_vec(
        vec![
            c64::new(-0.8, -0.4),
            c64::new(-0.6, -0.2),
            c64::new(-0.2, 0.4),
            c64::new(-0.1, -0.3),
        ],
        &[2, 2],
    )
    .unwrap();

    let case = Contraction::new(t1.clone(), t2.clone(), vec![(0, 1)]).unwrap();
    assert_eq!(case.t3().shape(), &[2, 2]);

    for j in 0..2 {
        for k in 0..2 {
            let mut expected = c64::new(0.0, 0.0);
            for i in 0..2 {
                expected += t1.get(&[i, j]).unwrap() * t2.get(&[k, i]).unwrap();
            }
            let got = case.t3().get(&[j, k]).unwrap();
            assert!((got - expected).norm() < 1e-12, "[{j},{k}]: {got} vs {expected}");
        }
    }

    // Rounded to two decimals these are the values a downstream fixture records.
    let first = case.t3().get(&[0, 0]).unwrap();
    assert!((first.re - -0.04).abs() < 1e-12);
    assert!((first.im - 0.24).abs() < 1e-12);
}

/// Full contraction gives a rank-0 tensor holding exactly one value.
#[test]
fn test_contract_everything() {
    let a = filled(&[2, 3, 2], 1);
    let b = filled(&[3, 2, 2], 2);
    let c = contract(&a, &b, &[(0, 1), (1, 0), (2, 2)]).unwrap();
    assert_eq!(c.ndim(), 0);
    assert_eq!(c.data().len(), 1);
}

/// A self-trace agrees with contracting against an identity matrix.
#[test]
fn test_trace_matches_identity_contraction() {
    let t = filled(&[3, 2, 3], 4);
    let eye: Tensor = Tensor::from_fn(&[3, 3], |ix| {
        if ix[0] == ix[1] {
            c64::new(1.0, 0.0)
        } else {
            c64::new(0.0, 0.0)
        }
    })
    .unwrap();

    let traced = trace(&t, &[(0, 2)]).unwrap();
    let via_eye = contract(&t, &eye, &[(0, 0), (2, 1)]).unwrap();
    assert_eq!(traced, via_eye);
}
