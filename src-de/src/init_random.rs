use ndarray::Array2;
use rand::Rng;

/// Uniform population in the unit hypercube: `npop` rows of `n` independent draws in [0, 1)
pub(crate) fn init_random<R: Rng + ?Sized>(npop: usize, n: usize, rng: &mut R) -> Array2<f64> {
	Array2::from_shape_fn((npop, n), |_| rng.random::<f64>())
}
