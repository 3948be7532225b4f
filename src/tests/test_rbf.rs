use ndarray::{arr1, arr2, Array1, Array2};

use crate::builders::RbfLayerBuilder;
use crate::error::PythiaError;
use crate::layers::{CentrePolicy, GradientMode, LayerTrait, RbfLayer};
use crate::state::RbfState;

#[test]
fn test_forward_output_shape() {
    let mut layer = RbfLayer::<f32>::new(4, 3);
    let inputs = Array2::ones((5, 4));

    let output = layer.forward_batch(inputs.view()).unwrap();
    assert_eq!(output.dim(), (5, 3));
}

#[test]
fn test_forward_output_nonnegative() {
    let mut layer = RbfLayer::<f32>::new(6, 4);
    let inputs = arr2(&[
        [-3.0, 0.5, 2.0, -1.0, 0.0, 4.0],
        [1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    ]);

    let output = layer.forward_batch(inputs.view()).unwrap();
    for &v in output.iter() {
        assert!(v >= 0.0);
    }
}

#[test]
fn test_forward_materializes_centres_and_spreads() {
    let mut layer = RbfLayer::<f32>::new(4, 3);
    assert!(layer.centres().is_none());

    layer.forward_batch(Array2::ones((2, 4)).view()).unwrap();

    assert_eq!(layer.centres().unwrap().dim(), (3, 4));
    assert_eq!(layer.spreads().len(), 3);
    assert!(layer.spreads().iter().all(|&s| s == 1.0));
    assert_eq!(layer.distances().unwrap().dim(), (2, 3));
}

#[test]
fn test_forward_rejects_feature_mismatch() {
    let mut layer = RbfLayer::<f32>::new(4, 3);
    let inputs = Array2::ones((5, 6));

    let err = layer.forward_batch(inputs.view()).unwrap_err();
    assert!(matches!(err, PythiaError::DimensionMismatch { .. }));
}

#[test]
fn test_forward_rejects_unconfigured_placeholder() {
    let mut layer = RbfLayer::<f32>::default();
    let inputs = Array2::ones((2, 2));

    let err = layer.forward_batch(inputs.view()).unwrap_err();
    assert!(matches!(err, PythiaError::InvalidParameter { .. }));

    // Configuring the placeholder makes it usable.
    layer.configure(2, 5);
    let output = layer.forward_batch(inputs.view()).unwrap();
    assert_eq!(output.dim(), (2, 5));
}

#[test]
fn test_forward_empty_batch() {
    let mut layer = RbfLayer::<f32>::new(4, 3);
    let inputs = Array2::zeros((0, 4));

    let output = layer.forward_batch(inputs.view()).unwrap();
    assert_eq!(output.dim(), (0, 3));
}

#[test]
fn test_forward_single_sample() {
    let mut layer = RbfLayer::<f32>::new(4, 3);
    let input = arr1(&[1.0, 2.0, 3.0, 4.0]);

    let output = LayerTrait::forward(&mut layer, input.view()).unwrap();
    assert_eq!(output.len(), 3);
    assert!(output.iter().all(|&v| v >= 0.0));
}

#[test]
fn test_forward_works_in_double_precision() {
    let mut layer = RbfLayer::<f64>::new(3, 2);
    let inputs = Array2::<f64>::ones((4, 3));

    let output = layer.forward_batch(inputs.view()).unwrap();
    assert_eq!(output.dim(), (4, 2));
    assert!(output.iter().all(|&v| v >= 0.0 && v.is_finite()));
}

#[test]
fn test_seeded_layers_agree() {
    let inputs = arr2(&[[0.1_f32, 0.9, -0.4, 2.0], [1.5, 0.0, 0.3, -0.7]]);

    let mut a = RbfLayer::<f32>::new(4, 3).with_seed(42);
    let mut b = RbfLayer::<f32>::new(4, 3).with_seed(42);

    let out_a = a.forward_batch(inputs.view()).unwrap();
    let out_b = b.forward_batch(inputs.view()).unwrap();
    assert_eq!(out_a, out_b);
}

#[test]
fn test_resampling_varies_across_calls() {
    let inputs = arr2(&[[0.1_f32, 0.9, -0.4, 2.0], [1.5, 0.0, 0.3, -0.7]]);
    let mut layer = RbfLayer::<f32>::new(4, 3);

    let first = layer.forward_batch(inputs.view()).unwrap();
    let second = layer.forward_batch(inputs.view()).unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_frozen_centres_persist_across_calls() {
    let inputs = arr2(&[[0.1_f32, 0.9, -0.4, 2.0], [1.5, 0.0, 0.3, -0.7]]);
    let mut layer = RbfLayerBuilder::<f32>::new()
        .input_size(4)
        .output_size(3)
        .centre_policy(CentrePolicy::Frozen)
        .seed(5)
        .build()
        .unwrap();

    let centres_before = layer.centres().unwrap().clone();
    let first = layer.forward_batch(inputs.view()).unwrap();
    let second = layer.forward_batch(inputs.view()).unwrap();

    assert_eq!(first, second);
    assert_eq!(layer.centres().unwrap(), &centres_before);
}

#[test]
fn test_spreads_scale_distances() {
    let inputs = arr2(&[[0.1_f32, 0.9, -0.4, 2.0], [1.5, 0.0, 0.3, -0.7]]);
    let mut layer = RbfLayerBuilder::<f32>::new()
        .input_size(4)
        .output_size(3)
        .centre_policy(CentrePolicy::Frozen)
        .seed(5)
        .build()
        .unwrap();

    let base = layer.forward_batch(inputs.view()).unwrap();
    layer.spreads_mut().fill(2.0);
    let scaled = layer.forward_batch(inputs.view()).unwrap();

    for (b, s) in base.iter().zip(scaled.iter()) {
        assert!((s - 2.0 * b).abs() < 1e-6);
    }
}

#[test]
fn test_euclidean_backward_matches_hand_computed_gradient() {
    let mut layer = RbfLayer::<f32>::new(2, 2).with_centre_policy(CentrePolicy::Frozen);
    layer
        .import_state(RbfState {
            distances: None,
            spreads: Array1::ones(2),
            centres: Some(arr2(&[[0.0, 0.0], [1.0, 1.0]])),
        })
        .unwrap();

    let inputs = arr2(&[[3.0, 4.0], [1.0, 1.0]]);
    let output = layer.forward_batch(inputs.view()).unwrap();

    // Sample 0: distance 5 to (0,0) and sqrt(13) to (1,1).
    // Sample 1: distance sqrt(2) to (0,0) and exactly 0 to (1,1).
    let sqrt13 = 13.0_f32.sqrt();
    let sqrt2 = 2.0_f32.sqrt();
    assert!((output[[0, 0]] - 5.0).abs() < 1e-5);
    assert!((output[[0, 1]] - sqrt13).abs() < 1e-5);
    assert!((output[[1, 0]] - sqrt2).abs() < 1e-5);
    assert!(output[[1, 1]].abs() < 1e-6);

    let grad_outputs = Array2::ones((2, 2));
    let grad_inputs = layer
        .backward_batch(inputs.view(), grad_outputs.view())
        .unwrap();

    assert_eq!(grad_inputs.dim(), (2, 2));
    assert!((grad_inputs[[0, 0]] - (3.0 / 5.0 + 2.0 / sqrt13)).abs() < 1e-5);
    assert!((grad_inputs[[0, 1]] - (4.0 / 5.0 + 3.0 / sqrt13)).abs() < 1e-5);
    // The zero-distance unit contributes nothing for sample 1.
    assert!((grad_inputs[[1, 0]] - 1.0 / sqrt2).abs() < 1e-5);
    assert!((grad_inputs[[1, 1]] - 1.0 / sqrt2).abs() < 1e-5);
}

#[test]
fn test_distance_product_backward_known_values() {
    let mut layer =
        RbfLayer::<f32>::new(4, 3).with_gradient_mode(GradientMode::DistanceProduct);
    layer
        .import_state(RbfState {
            distances: Some(arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])),
            spreads: Array1::ones(3),
            centres: None,
        })
        .unwrap();

    let inputs = Array2::zeros((2, 4));
    let grad_outputs = arr2(&[[1.0], [2.0]]);
    let grad = layer
        .backward_batch(inputs.view(), grad_outputs.view())
        .unwrap();

    // distances.t() . grad_outputs, computed by hand
    assert_eq!(grad, arr2(&[[9.0], [12.0], [15.0]]));
}

#[test]
fn test_backward_without_forward_is_uninitialized() {
    let layer = RbfLayer::<f32>::new(4, 3);
    let inputs = Array2::ones((5, 4));
    let grad_outputs = Array2::ones((5, 3));

    let err = layer
        .backward_batch(inputs.view(), grad_outputs.view())
        .unwrap_err();
    assert!(matches!(err, PythiaError::UninitializedState(_)));
}

#[test]
fn test_backward_rejects_sample_count_mismatch() {
    let mut layer = RbfLayer::<f32>::new(4, 3);
    let inputs = Array2::ones((5, 4));
    layer.forward_batch(inputs.view()).unwrap();

    let grad_outputs = Array2::ones((4, 3));
    let err = layer
        .backward_batch(inputs.view(), grad_outputs.view())
        .unwrap_err();
    assert!(matches!(err, PythiaError::DimensionMismatch { .. }));

    // The parity formula enforces the same sample-axis agreement.
    let mut layer =
        RbfLayer::<f32>::new(4, 3).with_gradient_mode(GradientMode::DistanceProduct);
    layer.forward_batch(inputs.view()).unwrap();
    let err = layer
        .backward_batch(inputs.view(), grad_outputs.view())
        .unwrap_err();
    assert!(matches!(err, PythiaError::DimensionMismatch { .. }));
}

#[test]
fn test_backward_rejects_unit_count_mismatch() {
    let mut layer = RbfLayer::<f32>::new(4, 3);
    let inputs = Array2::ones((5, 4));
    layer.forward_batch(inputs.view()).unwrap();

    let grad_outputs = Array2::ones((5, 2));
    let err = layer
        .backward_batch(inputs.view(), grad_outputs.view())
        .unwrap_err();
    assert!(matches!(err, PythiaError::DimensionMismatch { .. }));
}

#[test]
fn test_configure_clears_cached_state() {
    let mut layer = RbfLayer::<f32>::new(4, 3);
    let inputs = Array2::ones((5, 4));
    layer.forward_batch(inputs.view()).unwrap();

    layer.configure(4, 3);
    let grad_outputs = Array2::ones((5, 3));
    let err = layer
        .backward_batch(inputs.view(), grad_outputs.view())
        .unwrap_err();
    assert!(matches!(err, PythiaError::UninitializedState(_)));
}

#[test]
fn test_builder_rejects_missing_and_zero_sizes() {
    let err = RbfLayerBuilder::<f32>::new().output_size(3).build().unwrap_err();
    assert!(matches!(err, PythiaError::InvalidParameter { .. }));

    let err = RbfLayerBuilder::<f32>::new()
        .input_size(4)
        .output_size(0)
        .build()
        .unwrap_err();
    assert!(matches!(err, PythiaError::InvalidParameter { .. }));
}

#[test]
fn test_layer_sizes_through_trait() {
    let layer = RbfLayer::<f32>::new(4, 3);
    assert_eq!(LayerTrait::input_size(&layer), 4);
    assert_eq!(LayerTrait::output_size(&layer), 3);
}
