use ndarray::{Array1, Array2};
use rand::Rng;

use crate::DEError;
use crate::distinct_indices::distinct_indices;

/// DE/rand/1 donor for target `i`: `clip(a + f * (b - c), 0, 1)` where a, b, c
/// are distinct members other than `i`.
pub(crate) fn mutant_rand1<R: Rng + ?Sized>(
	i: usize,
	pop: &Array2<f64>,
	f: f64,
	rng: &mut R,
) -> Result<Array1<f64>, DEError> {
	let [r0, r1, r2] = distinct_indices::<R, 3>(i, pop.nrows(), rng)?;
	let differential = &pop.row(r1) - &pop.row(r2);
	let mut mutant = &pop.row(r0) + &(differential * f);
	mutant.mapv_inplace(|v| v.clamp(0.0, 1.0));
	Ok(mutant)
}
