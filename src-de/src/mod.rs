//! Differential Evolution (DE) global optimizer in pure Rust using ndarray
//!
//! Classic DE/rand/1/bin over box bounds, driven one generation at a time.
//!
//! Supported features:
//! - Box constraints (lower/upper bounds); the population lives in the unit
//!   hypercube and is denormalized on demand
//! - Mutation `clip(a + F * (b - c), 0, 1)` with three distinct random members
//! - Binomial crossover with at least one mutant coordinate per trial
//! - Greedy selection (strict improvement), either immediate (members updated
//!   during the pass) or deferred (generation built against a frozen snapshot)
//! - Pluggable run diagnostics through [`Observer`] (log facade, files, closures)
//! - Parameter sweeps over bounds / steps / F / CR / population size

#![allow(missing_docs)]
use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

pub mod bounds;
pub mod distinct_indices;
pub mod init_random;

pub mod mutant_rand1;

pub mod crossover_binomial;
pub mod recombination;

pub mod differential_evolution;
pub mod file_observer;
pub mod observer;
pub mod optimizer;
pub mod sweep;

pub use bounds::Bounds;
pub use differential_evolution::differential_evolution;
pub use file_observer::FileObserver;
pub use observer::{
	CRITICAL_THRESHOLD, FnObserver, InitEvent, LogObserver, Observer, RunSnapshot, Severity,
	ToleranceEvent, WARNING_THRESHOLD,
};
pub use optimizer::{DifferentialEvolution, GenerationStats, Selection};
pub use sweep::{SweepCombination, SweepError, SweepGrid, SweepRecord, run_sweep, save_records_csv};

/// Smallest population for which three distinct donors other than the target exist
pub const MIN_POPULATION: usize = 4;

/// Errors raised by the optimizer
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DEError {
	#[error("population of {size} is too small: mutation needs at least {required} members")]
	InsufficientPopulation { size: usize, required: usize },

	#[error("optimizer used before initialize()")]
	NotInitialized,

	#[error("bounds must describe at least one dimension")]
	EmptyBounds,

	#[error("index {index} out of range for population of {size}")]
	IndexOutOfRange { index: usize, size: usize },

	#[error("vector of length {got} does not match {expected} dimensions")]
	DimensionMismatch { expected: usize, got: usize },
}

/// Index and value of the smallest entry, first one on ties. NaN entries are
/// skipped; an all-NaN vector yields `(0, NaN)`.
pub(crate) fn argmin(v: &Array1<f64>) -> (usize, f64) {
	let Some(start) = v.iter().position(|x| !x.is_nan()) else {
		return (0, v[0]);
	};
	let mut best_i = start;
	let mut best_v = v[start];
	for (i, &val) in v.iter().enumerate().skip(start + 1) {
		if val < best_v {
			best_v = val;
			best_i = i;
		}
	}
	(best_i, best_v)
}

/// When accepted trials become visible to the rest of the generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Updating {
	/// A replaced member is used as donor by later indices of the same pass
	#[default]
	Immediate,
	/// All trials are built against the population as it was when the
	/// generation started, then selections are committed in index order
	Deferred,
}

impl FromStr for Updating {
	type Err = String;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"immediate" | "async" | "asynchronous" => Ok(Updating::Immediate),
			"deferred" | "sync" | "synchronous" => Ok(Updating::Deferred),
			_ => Err(format!("unknown updating mode: {}", s)),
		}
	}
}

impl fmt::Display for Updating {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Updating::Immediate => write!(f, "immediate"),
			Updating::Deferred => write!(f, "deferred"),
		}
	}
}

/// Configuration for the Differential Evolution optimizer
pub struct DEConfig {
	/// Mutation coefficient F, typically in [0, 2]
	pub mutation: f64,
	/// Crossover probability CR in [0, 1]
	pub recombination: f64,
	/// Population size N
	pub popsize: usize,
	/// Number of generations run by `solve` (also reported to observers)
	pub maxiter: usize,
	pub seed: Option<u64>,
	pub updating: Updating,
	/// Optional per-generation callback used by `solve`
	pub callback: Option<Box<dyn FnMut(&DEIntermediate)>>,
}

impl Default for DEConfig {
	fn default() -> Self {
		Self {
			mutation: 0.8,
			recombination: 0.7,
			popsize: 20,
			maxiter: 100,
			seed: None,
			updating: Updating::default(),
			callback: None,
		}
	}
}

impl fmt::Debug for DEConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DEConfig")
			.field("mutation", &self.mutation)
			.field("recombination", &self.recombination)
			.field("popsize", &self.popsize)
			.field("maxiter", &self.maxiter)
			.field("seed", &self.seed)
			.field("updating", &self.updating)
			.field("callback", &self.callback.is_some())
			.finish()
	}
}

/// Fluent builder for `DEConfig` for ergonomic configuration.
pub struct DEConfigBuilder {
	cfg: DEConfig,
}

impl Default for DEConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl DEConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: DEConfig::default() }
	}
	pub fn mutation(mut self, v: f64) -> Self {
		self.cfg.mutation = v;
		self
	}
	pub fn recombination(mut self, v: f64) -> Self {
		self.cfg.recombination = v;
		self
	}
	pub fn popsize(mut self, v: usize) -> Self {
		self.cfg.popsize = v;
		self
	}
	pub fn maxiter(mut self, v: usize) -> Self {
		self.cfg.maxiter = v;
		self
	}
	pub fn seed(mut self, v: u64) -> Self {
		self.cfg.seed = Some(v);
		self
	}
	pub fn updating(mut self, v: Updating) -> Self {
		self.cfg.updating = v;
		self
	}
	pub fn callback(mut self, cb: Box<dyn FnMut(&DEIntermediate)>) -> Self {
		self.cfg.callback = Some(cb);
		self
	}
	pub fn build(self) -> DEConfig {
		self.cfg
	}
}

/// Result/Report of a DE run
#[derive(Clone)]
pub struct DEReport {
	/// Best point, in real (denormalized) coordinates
	pub x: Array1<f64>,
	pub fun: f64,
	pub message: String,
	pub nit: usize,
	pub nfev: usize,
	/// Final population, denormalized
	pub population: Array2<f64>,
	pub population_energies: Array1<f64>,
}

impl fmt::Debug for DEReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DEReport")
			.field("x", &format!("len={}", self.x.len()))
			.field("fun", &self.fun)
			.field("message", &self.message)
			.field("nit", &self.nit)
			.field("nfev", &self.nfev)
			.field(
				"population",
				&format!("{}x{}", self.population.nrows(), self.population.ncols()),
			)
			.field("population_energies", &format!("len={}", self.population_energies.len()))
			.finish()
	}
}

/// Information passed to callback after each generation
pub struct DEIntermediate {
	pub x: Array1<f64>,
	pub fun: f64,
	pub convergence: f64, // measured as std(pop_f)
	pub iter: usize,
}
