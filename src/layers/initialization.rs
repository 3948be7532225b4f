use ndarray::{Array2, NdFloat};
use ndarray_rand::RandomExt;
use num_traits::NumCast;
use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use rand_distr::Uniform;

/// Centre initialization strategies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CentreInit<F> {
    /// Uniform draw from [0, 1) remapped through the standard-normal CDF,
    /// squashing every entry into the open interval (0, 1)
    UniformCdf,

    /// Uniform distribution with custom range
    Uniform { low: F, high: F },
}

impl<F: NdFloat + SampleUniform> CentreInit<F> {
    /// Draw a centre matrix of the given shape, one row per RBF unit
    pub fn sample<R: Rng + ?Sized>(&self, shape: (usize, usize), rng: &mut R) -> Array2<F> {
        match self {
            CentreInit::UniformCdf => {
                let draws = Array2::random_using(shape, Uniform::new(F::zero(), F::one()), rng);
                draws.mapv(normal_cdf)
            }

            CentreInit::Uniform { low, high } => {
                Array2::random_using(shape, Uniform::new(*low, *high), rng)
            }
        }
    }
}

impl<F> Default for CentreInit<F> {
    fn default() -> Self {
        CentreInit::UniformCdf
    }
}

/// Standard-normal cumulative distribution function,
/// `phi(x) = (1 + erf(x / sqrt(2))) / 2`
pub fn normal_cdf<F: NdFloat>(x: F) -> F {
    let half: F = NumCast::from(0.5).unwrap();
    let sqrt_2: F = NumCast::from(std::f64::consts::SQRT_2).unwrap();
    half * (F::one() + erf(x / sqrt_2))
}

/// Error function via the Abramowitz & Stegun 7.1.26 polynomial,
/// maximum absolute error about 1.5e-7
pub fn erf<F: NdFloat>(x: F) -> F {
    let a1: F = NumCast::from(0.254829592).unwrap();
    let a2: F = NumCast::from(-0.284496736).unwrap();
    let a3: F = NumCast::from(1.421413741).unwrap();
    let a4: F = NumCast::from(-1.453152027).unwrap();
    let a5: F = NumCast::from(1.061405429).unwrap();
    let p: F = NumCast::from(0.3275911).unwrap();

    let sign = if x < F::zero() { -F::one() } else { F::one() };
    let x = x.abs();

    let t = F::one() / (F::one() + p * x);
    let poly = ((((a5 * t + a4) * t + a3) * t + a2) * t + a1) * t;
    let y = F::one() - poly * (-x * x).exp();

    sign * y
}
