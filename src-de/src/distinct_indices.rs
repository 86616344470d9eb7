use rand::Rng;

use crate::DEError;

/// Draw `K` distinct indices in `0..n`, all different from `exclude`.
///
/// Rejection sampling: no candidate list is built, and with `n - 1 >= K`
/// the expected number of draws per index stays bounded.
pub(crate) fn distinct_indices<R: Rng + ?Sized, const K: usize>(
	exclude: usize,
	n: usize,
	rng: &mut R,
) -> Result<[usize; K], DEError> {
	let available = if exclude < n { n - 1 } else { n };
	if available < K {
		return Err(DEError::InsufficientPopulation { size: n, required: K + 1 });
	}
	let mut out = [0usize; K];
	let mut filled = 0;
	while filled < K {
		let r = rng.random_range(0..n);
		if r == exclude || out[..filled].contains(&r) {
			continue;
		}
		out[filled] = r;
		filled += 1;
	}
	Ok(out)
}
