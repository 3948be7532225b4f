//! # Pythia - Radial Basis Function Layer
//!
//! Pythia is a single-layer neural-network library: a radial-basis-function
//! (RBF) layer that maps batches of input vectors to per-unit distance
//! activations and back-propagates a gradient for that transform. It is
//! meant to be hosted by an external layer-composition framework that owns
//! sequencing, optimization, and model persistence.
//!
//! ## Key Features
//!
//! - **Distance activations**: one scaled Euclidean distance per
//!   (sample, unit) pair, reduced across the feature axis
//! - **Centre policies**: ephemeral per-call resampling or frozen centres
//! - **Two backward formulas**: the analytic distance gradient, or the
//!   cached-distance transpose-product for parity with legacy consumers
//! - **Generic precision**: every API is generic over `f32` and `f64`
//! - **State export**: centres, spreads, and cached distances cross an
//!   injected persistence interface; the layer itself performs no I/O
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ndarray::Array2;
//! use pythia::builders::RbfLayerBuilder;
//! use pythia::layers::LayerTrait;
//!
//! let mut layer = RbfLayerBuilder::<f32>::new()
//!     .input_size(4)
//!     .output_size(3)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let batch = Array2::<f32>::zeros((5, 4));
//! let activations = layer.forward_batch(batch.view()).unwrap();
//! let grads = layer.backward_batch(batch.view(), activations.view()).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`builders`] - Builder pattern for layer construction
//! - [`error`] - Error types and result handling
//! - [`layers`] - The RBF layer, its trait seam, and centre initialization
//! - [`state`] - Exported layer state and persistence collaborators

pub mod builders;
pub mod error;
pub mod layers;
pub mod state;

#[cfg(test)]
mod tests;
