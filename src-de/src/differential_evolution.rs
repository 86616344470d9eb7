use crate::{DEConfig, DEError, DEReport, DifferentialEvolution};
use ndarray::Array1;

/// Convenience function mirroring SciPy's API shape (simplified):
/// - `func`: objective function mapping x -> f(x)
/// - `bounds`: vector of (lower, upper) pairs
/// - `config`: DE configuration; exactly `config.maxiter` generations are run
pub fn differential_evolution<F>(
	func: &F,
	bounds: &[(f64, f64)],
	config: DEConfig,
) -> Result<DEReport, DEError>
where
	F: Fn(&Array1<f64>) -> f64,
{
	let mut de = DifferentialEvolution::new(func, bounds, config)?;
	de.solve()
}
