use rand::Rng;

/// Binomial crossover mask of length `n`: each dimension is taken from the
/// mutant when its uniform draw is below `cr`. When no dimension is selected,
/// one drawn uniformly is forced in so the trial always differs from the target.
pub(crate) fn binomial_mask<R: Rng + ?Sized>(n: usize, cr: f64, rng: &mut R) -> Vec<bool> {
	let mut mask: Vec<bool> = (0..n).map(|_| rng.random::<f64>() < cr).collect();
	if n > 0 && !mask.iter().any(|&m| m) {
		let j = rng.random_range(0..n);
		mask[j] = true;
	}
	mask
}
