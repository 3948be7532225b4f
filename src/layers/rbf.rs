use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, NdFloat};
use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{PythiaError, Result};
use crate::state::RbfState;
use super::initialization::CentreInit;
use super::traits::Layer as LayerTrait;

/// Lifecycle policy for the reference centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentrePolicy {
    /// Draw fresh centres and reset spreads to ones on every forward call
    Resample,

    /// Draw centres once and reuse them across forward calls; spreads persist
    /// and may be edited between batches
    Frozen,
}

impl Default for CentrePolicy {
    fn default() -> Self {
        CentrePolicy::Resample
    }
}

/// Formula used by the backward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientMode {
    /// Analytic gradient of the scaled-distance transform. Returns a matrix
    /// shaped like the forward input; a zero cached distance contributes a
    /// zero term.
    Euclidean,

    /// `cached_distances.t().dot(grad_outputs)`. The result has one row per
    /// RBF unit and one column per gradient column, which matches the input
    /// shape only in degenerate cases.
    DistanceProduct,
}

impl Default for GradientMode {
    fn default() -> Self {
        GradientMode::Euclidean
    }
}

/// Radial Basis Function Layer
///
/// Maps a batch of input vectors to per-unit activations, where the
/// activation of unit `j` for sample `s` is the Euclidean distance between
/// the sample and the unit's centre, scaled by the unit's spread.
///
/// Batches have one row per sample and one column per feature; the output
/// is `(batch_size, out_size)`. Centres are `(out_size, in_size)`, one
/// feature-space reference point per unit.
///
/// The forward pass caches its output; the next backward call consumes that
/// cache and fails with `UninitializedState` if no matching forward ran.
#[derive(Clone, Debug)]
pub struct RbfLayer<F: NdFloat> {
    in_size: usize,
    out_size: usize,

    centre_policy: CentrePolicy,
    centre_init: CentreInit<F>,
    gradient_mode: GradientMode,

    /// Reference points, one row per unit
    centres: Option<Array2<F>>,

    /// Per-unit distance scale (sigmas)
    spreads: Array1<F>,

    /// Output of the last forward call, kept for the next backward call
    distances: Option<Array2<F>>,

    rng: Option<StdRng>,
}

impl<F: NdFloat + SampleUniform> RbfLayer<F> {
    /// Create a new RBF layer with the given input and output sizes.
    /// The sizes are stored verbatim; validation happens on the first
    /// forward call.
    pub fn new(in_size: usize, out_size: usize) -> Self {
        RbfLayer {
            in_size,
            out_size,
            centre_policy: CentrePolicy::default(),
            centre_init: CentreInit::default(),
            gradient_mode: GradientMode::default(),
            centres: None,
            spreads: Array1::ones(out_size),
            distances: None,
            rng: None,
        }
    }

    /// Re-point the layer at new sizes and clear all cached state
    pub fn configure(&mut self, in_size: usize, out_size: usize) {
        self.in_size = in_size;
        self.out_size = out_size;
        self.centres = None;
        self.spreads = Array1::ones(out_size);
        self.distances = None;
    }

    pub fn with_centre_policy(mut self, policy: CentrePolicy) -> Self {
        self.centre_policy = policy;
        self
    }

    pub fn with_centre_init(mut self, init: CentreInit<F>) -> Self {
        self.centre_init = init;
        self
    }

    pub fn with_gradient_mode(mut self, mode: GradientMode) -> Self {
        self.gradient_mode = mode;
        self
    }

    /// Drive all centre draws from a seeded generator instead of the
    /// thread-local one. Same seed, same call sequence, same centres.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Some(StdRng::seed_from_u64(seed));
        self
    }

    pub fn centre_policy(&self) -> CentrePolicy {
        self.centre_policy
    }

    pub fn gradient_mode(&self) -> GradientMode {
        self.gradient_mode
    }

    /// Reference centres, absent until the first forward call or a state
    /// import materializes them
    pub fn centres(&self) -> Option<&Array2<F>> {
        self.centres.as_ref()
    }

    pub fn spreads(&self) -> &Array1<F> {
        &self.spreads
    }

    /// Mutable per-unit spreads. Edits survive forward calls only under
    /// `CentrePolicy::Frozen`; `Resample` resets them to ones each call.
    pub fn spreads_mut(&mut self) -> &mut Array1<F> {
        &mut self.spreads
    }

    /// Cached output of the last forward call
    pub fn distances(&self) -> Option<&Array2<F>> {
        self.distances.as_ref()
    }

    /// Draw a fresh centre matrix according to the configured initializer
    pub fn resample_centres(&mut self) -> Result<()> {
        if self.in_size == 0 || self.out_size == 0 {
            return Err(PythiaError::invalid_parameter(
                "in_size/out_size",
                "layer is an unconfigured placeholder; call configure() first",
            ));
        }

        let shape = (self.out_size, self.in_size);
        let centres = match &mut self.rng {
            Some(rng) => self.centre_init.sample(shape, rng),
            None => self.centre_init.sample(shape, &mut rand::thread_rng()),
        };
        self.centres = Some(centres);

        if self.spreads.len() != self.out_size {
            self.spreads = Array1::ones(self.out_size);
        }
        Ok(())
    }

    /// Clone out the three persistable arrays for an external collaborator.
    /// The layer performs no I/O of its own.
    pub fn export_state(&self) -> RbfState<F> {
        RbfState {
            distances: self.distances.clone(),
            spreads: self.spreads.clone(),
            centres: self.centres.clone(),
        }
    }

    /// Install previously exported arrays, validating them against the
    /// layer's configured sizes. Restoring both centres and distances makes
    /// a subsequent backward call well-defined without re-running forward.
    pub fn import_state(&mut self, state: RbfState<F>) -> Result<()> {
        if state.spreads.len() != self.out_size {
            return Err(PythiaError::dimension_mismatch(
                format!("{} spreads", self.out_size),
                format!("{} spreads", state.spreads.len()),
            ));
        }
        if let Some(centres) = &state.centres {
            if centres.dim() != (self.out_size, self.in_size) {
                return Err(PythiaError::dimension_mismatch(
                    format!("({}, {}) centres", self.out_size, self.in_size),
                    format!("({}, {}) centres", centres.nrows(), centres.ncols()),
                ));
            }
        }
        if let Some(distances) = &state.distances {
            if distances.ncols() != self.out_size {
                return Err(PythiaError::dimension_mismatch(
                    format!("{} distance columns", self.out_size),
                    format!("{} distance columns", distances.ncols()),
                ));
            }
        }

        self.distances = state.distances;
        self.spreads = state.spreads;
        self.centres = state.centres;
        Ok(())
    }

    /// Forward pass: one scaled Euclidean distance per (sample, unit) pair,
    /// reduced across the feature axis
    fn rbf_forward(&mut self, inputs: ArrayView2<F>) -> Result<Array2<F>> {
        if self.in_size == 0 || self.out_size == 0 {
            return Err(PythiaError::invalid_parameter(
                "in_size/out_size",
                "layer is an unconfigured placeholder; call configure() first",
            ));
        }

        let (batch_size, num_features) = inputs.dim();
        if num_features != self.in_size {
            return Err(PythiaError::dimension_mismatch(
                format!("({}, {}) inputs", batch_size, self.in_size),
                format!("({}, {}) inputs", batch_size, num_features),
            ));
        }

        match self.centre_policy {
            CentrePolicy::Resample => {
                self.resample_centres()?;
                self.spreads = Array1::ones(self.out_size);
            }
            CentrePolicy::Frozen => {
                if self.centres.is_none() {
                    self.resample_centres()?;
                }
            }
        }
        let centres = self
            .centres
            .as_ref()
            .ok_or_else(|| PythiaError::uninitialized_state("centres were not materialized"))?;

        let mut distances = Array2::<F>::zeros((batch_size, self.out_size));
        for s in 0..batch_size {
            for j in 0..self.out_size {
                let mut sum_sq = F::zero();
                for f in 0..self.in_size {
                    let diff = inputs[[s, f]] - centres[[j, f]];
                    sum_sq = sum_sq + diff * diff;
                }
                distances[[s, j]] = sum_sq.sqrt() * self.spreads[j];
            }
        }

        self.distances = Some(distances.clone());
        Ok(distances)
    }

    /// Backward pass over the state cached by the preceding forward call
    fn rbf_backward(
        &self,
        inputs: ArrayView2<F>,
        grad_outputs: ArrayView2<F>,
    ) -> Result<Array2<F>> {
        let distances = self.distances.as_ref().ok_or_else(|| {
            PythiaError::uninitialized_state(
                "no cached distances: forward_batch() must be called before backward_batch()",
            )
        })?;

        match self.gradient_mode {
            GradientMode::DistanceProduct => {
                // The product only constrains the sample axis.
                if grad_outputs.nrows() != distances.nrows() {
                    return Err(PythiaError::dimension_mismatch(
                        format!("{} gradient rows", distances.nrows()),
                        format!("{} gradient rows", grad_outputs.nrows()),
                    ));
                }
                Ok(distances.t().dot(&grad_outputs))
            }

            GradientMode::Euclidean => {
                if grad_outputs.dim() != distances.dim() {
                    return Err(PythiaError::dimension_mismatch(
                        format!("({}, {}) gradients", distances.nrows(), distances.ncols()),
                        format!(
                            "({}, {}) gradients",
                            grad_outputs.nrows(),
                            grad_outputs.ncols()
                        ),
                    ));
                }
                let batch_size = distances.nrows();
                if inputs.dim() != (batch_size, self.in_size) {
                    return Err(PythiaError::dimension_mismatch(
                        format!("({}, {}) inputs", batch_size, self.in_size),
                        format!("({}, {}) inputs", inputs.nrows(), inputs.ncols()),
                    ));
                }
                let centres = self.centres.as_ref().ok_or_else(|| {
                    PythiaError::uninitialized_state("no centres cached from the forward pass")
                })?;

                // d(sigma * |x - c|)/dx = sigma * (x - c) / |x - c|, and the
                // cached distance already carries one factor of sigma.
                let mut grad_inputs = Array2::<F>::zeros((batch_size, self.in_size));
                for s in 0..batch_size {
                    for j in 0..self.out_size {
                        let dist = distances[[s, j]];
                        if dist == F::zero() {
                            continue;
                        }
                        let scale =
                            grad_outputs[[s, j]] * self.spreads[j] * self.spreads[j] / dist;
                        for f in 0..self.in_size {
                            grad_inputs[[s, f]] = grad_inputs[[s, f]]
                                + scale * (inputs[[s, f]] - centres[[j, f]]);
                        }
                    }
                }
                Ok(grad_inputs)
            }
        }
    }
}

impl<F: NdFloat + SampleUniform> Default for RbfLayer<F> {
    /// Placeholder layer with zero sizes; reject any forward call until
    /// `configure` is given real dimensions
    fn default() -> Self {
        RbfLayer::new(0, 0)
    }
}

impl<F: NdFloat + SampleUniform + 'static> LayerTrait<F> for RbfLayer<F> {
    fn forward(&mut self, input: ArrayView1<F>) -> Result<Array1<F>> {
        let input = input.insert_axis(Axis(0));
        let output = self.forward_batch(input)?;
        Ok(output.index_axis(Axis(0), 0).to_owned())
    }

    fn forward_batch(&mut self, inputs: ArrayView2<F>) -> Result<Array2<F>> {
        self.rbf_forward(inputs)
    }

    fn backward(&self, input: ArrayView1<F>, grad_output: ArrayView1<F>) -> Result<Array1<F>> {
        let input = input.insert_axis(Axis(0));
        let grad_output = grad_output.insert_axis(Axis(0));
        let grad_inputs = self.backward_batch(input, grad_output)?;
        Ok(grad_inputs.index_axis(Axis(0), 0).to_owned())
    }

    fn backward_batch(
        &self,
        inputs: ArrayView2<F>,
        grad_outputs: ArrayView2<F>,
    ) -> Result<Array2<F>> {
        self.rbf_backward(inputs, grad_outputs)
    }

    fn input_size(&self) -> usize {
        self.in_size
    }

    fn output_size(&self) -> usize {
        self.out_size
    }

    fn clone_box(&self) -> Box<dyn LayerTrait<F>> {
        Box::new(self.clone())
    }
}
