use ndarray::{Array1, Array2, ArrayView1, ArrayView2, NdFloat};

use crate::error::Result;

/// Trait defining the interface for neural network layers.
///
/// Batches are laid out with one row per sample and one column per feature.
/// `backward` receives the same input that was given to the preceding
/// `forward` call together with the gradient flowing back from downstream,
/// and returns the gradient to propagate upstream.
pub trait Layer<F: NdFloat>: Send + Sync {
    /// Perform forward propagation for a single input
    fn forward(&mut self, input: ArrayView1<F>) -> Result<Array1<F>>;

    /// Perform forward propagation for a batch of inputs
    fn forward_batch(&mut self, inputs: ArrayView2<F>) -> Result<Array2<F>>;

    /// Perform backward propagation for a single sample
    fn backward(&self, input: ArrayView1<F>, grad_output: ArrayView1<F>) -> Result<Array1<F>>;

    /// Perform backward propagation for a batch of output gradients
    fn backward_batch(
        &self,
        inputs: ArrayView2<F>,
        grad_outputs: ArrayView2<F>,
    ) -> Result<Array2<F>>;

    /// Get the input size of the layer
    fn input_size(&self) -> usize;

    /// Get the output size of the layer
    fn output_size(&self) -> usize;

    /// Clone the layer into a boxed trait object
    fn clone_box(&self) -> Box<dyn Layer<F>>;
}

impl<F: NdFloat> Clone for Box<dyn Layer<F>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
