use std::fmt;

use ndarray::{Array1, Array2, ArrayBase, Data, Ix1};

use crate::DEError;

/// Box bounds of the search space, one (min, max) pair per dimension.
///
/// The optimizer stores its population in `[0, 1]^D`; a normalized vector `u`
/// maps to `min + u * (max - min)`. Bounds with `min > max` are not rejected:
/// they yield a negative span and the mapping is then the caller's problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
	min_bound: Array1<f64>,
	max_bound: Array1<f64>,
	diff: Array1<f64>,
}

impl Bounds {
	pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, DEError> {
		if pairs.is_empty() {
			return Err(DEError::EmptyBounds);
		}
		let min_bound: Array1<f64> = pairs.iter().map(|&(lo, _)| lo).collect();
		let max_bound: Array1<f64> = pairs.iter().map(|&(_, hi)| hi).collect();
		let diff = &max_bound - &min_bound;
		Ok(Self { min_bound, max_bound, diff })
	}

	pub fn dimensions(&self) -> usize {
		self.min_bound.len()
	}

	pub fn min_bound(&self) -> &Array1<f64> {
		&self.min_bound
	}

	pub fn max_bound(&self) -> &Array1<f64> {
		&self.max_bound
	}

	/// Span `max - min` per dimension
	pub fn diff(&self) -> &Array1<f64> {
		&self.diff
	}

	pub fn pairs(&self) -> Vec<(f64, f64)> {
		self.min_bound.iter().zip(self.max_bound.iter()).map(|(&lo, &hi)| (lo, hi)).collect()
	}

	/// Map a normalized vector into the real bounds
	pub fn denormalize<S>(&self, x: &ArrayBase<S, Ix1>) -> Array1<f64>
	where
		S: Data<Elem = f64>,
	{
		let scaled = x * &self.diff;
		&self.min_bound + &scaled
	}

	/// Map every row of a normalized population into the real bounds
	pub fn denormalize_population(&self, pop: &Array2<f64>) -> Array2<f64> {
		let scaled = pop * &self.diff;
		&scaled + &self.min_bound
	}
}

/// Formats as `[[min max] [min max]]`
impl fmt::Display for Bounds {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", format_pairs(&self.pairs()))
	}
}

/// Format bound pairs as `[[-20 20] [-20 20]]`
pub fn format_pairs(pairs: &[(f64, f64)]) -> String {
	let rows: Vec<String> = pairs.iter().map(|(lo, hi)| format!("[{} {}]", lo, hi)).collect();
	format!("[{}]", rows.join(" "))
}

/// Format the rows of a matrix on a single line, `[[a b] [c d]]`
pub fn format_rows(m: &Array2<f64>) -> String {
	let rows: Vec<String> = m
		.rows()
		.into_iter()
		.map(|row| {
			let cells: Vec<String> = row.iter().map(|v| format!("{:.6}", v)).collect();
			format!("[{}]", cells.join(" "))
		})
		.collect();
	format!("[{}]", rows.join(" "))
}
