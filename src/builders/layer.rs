use ndarray::NdFloat;
use rand::distributions::uniform::SampleUniform;

use crate::error::{PythiaError, Result};
use crate::layers::initialization::CentreInit;
use crate::layers::rbf::{CentrePolicy, GradientMode, RbfLayer};

/// Builder for RbfLayer
pub struct RbfLayerBuilder<F> {
    input_size: Option<usize>,
    output_size: Option<usize>,
    centre_policy: CentrePolicy,
    centre_init: CentreInit<F>,
    gradient_mode: GradientMode,
    seed: Option<u64>,
}

impl<F: NdFloat + SampleUniform> RbfLayerBuilder<F> {
    /// Create a new RBF layer builder
    pub fn new() -> Self {
        RbfLayerBuilder {
            input_size: None,
            output_size: None,
            centre_policy: CentrePolicy::default(),
            centre_init: CentreInit::default(),
            gradient_mode: GradientMode::default(),
            seed: None,
        }
    }

    /// Set input size
    pub fn input_size(mut self, size: usize) -> Self {
        self.input_size = Some(size);
        self
    }

    /// Set output size (the number of RBF units)
    pub fn output_size(mut self, size: usize) -> Self {
        self.output_size = Some(size);
        self
    }

    /// Set the centre lifecycle policy
    pub fn centre_policy(mut self, policy: CentrePolicy) -> Self {
        self.centre_policy = policy;
        self
    }

    /// Set the centre initialization strategy
    pub fn centre_init(mut self, init: CentreInit<F>) -> Self {
        self.centre_init = init;
        self
    }

    /// Set the backward-pass formula
    pub fn gradient_mode(mut self, mode: GradientMode) -> Self {
        self.gradient_mode = mode;
        self
    }

    /// Seed the centre draws for reproducible runs
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the RBF layer
    pub fn build(self) -> Result<RbfLayer<F>> {
        let input_size = self.input_size.ok_or_else(|| PythiaError::InvalidParameter {
            name: "input_size".to_string(),
            reason: "Input size not specified".to_string(),
        })?;

        let output_size = self.output_size.ok_or_else(|| PythiaError::InvalidParameter {
            name: "output_size".to_string(),
            reason: "Output size not specified".to_string(),
        })?;

        if input_size == 0 {
            return Err(PythiaError::invalid_parameter(
                "input_size",
                "Input size must be greater than zero",
            ));
        }
        if output_size == 0 {
            return Err(PythiaError::invalid_parameter(
                "output_size",
                "Output size must be greater than zero",
            ));
        }

        let mut layer = RbfLayer::new(input_size, output_size)
            .with_centre_policy(self.centre_policy)
            .with_centre_init(self.centre_init)
            .with_gradient_mode(self.gradient_mode);
        if let Some(seed) = self.seed {
            layer = layer.with_seed(seed);
        }

        // Frozen centres exist from construction on; resampled centres are
        // drawn by each forward call.
        if self.centre_policy == CentrePolicy::Frozen {
            layer.resample_centres()?;
        }

        Ok(layer)
    }
}

impl<F: NdFloat + SampleUniform> Default for RbfLayerBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}
