//! Parameter sweeps
//!
//! Runs one independent optimizer per combination of bounds, step count,
//! mutation coefficient, crossover probability and population size, and
//! collects a summary row per run.

use std::cell::Cell;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;

use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bounds::format_pairs;
use crate::observer::{FnObserver, Observer, Severity, ToleranceEvent};
use crate::{DEConfigBuilder, DEError, DifferentialEvolution, Updating};

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),
	#[error("invalid sweep grid: {0}")]
	Json(#[from] serde_json::Error),
	#[error("optimizer error in combination {index}: {source}")]
	Optimizer { index: usize, source: DEError },
}

/// Grid of run parameters; every field is a list of values to combine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepGrid {
	pub bounds: Vec<Vec<(f64, f64)>>,
	pub steps: Vec<usize>,
	pub mutation: Vec<f64>,
	pub recombination: Vec<f64>,
	pub popsize: Vec<usize>,
	/// Base seed; combination `i` uses `seed + i`
	pub seed: Option<u64>,
	pub updating: Updating,
}

impl Default for SweepGrid {
	fn default() -> Self {
		Self {
			bounds: vec![
				vec![(-20.0, 20.0), (-20.0, 20.0)],
				vec![(-10.0, 50.0), (-10.0, 60.0)],
				vec![(0.0, 110.0), (-42.0, 32.0)],
			],
			steps: vec![40, 100, 200],
			mutation: vec![0.5, 0.6, 0.3],
			recombination: vec![0.5, 0.6, 0.3],
			popsize: vec![20, 30, 40, 50, 60],
			seed: None,
			updating: Updating::default(),
		}
	}
}

/// One point of the grid
#[derive(Debug, Clone, PartialEq)]
pub struct SweepCombination {
	pub index: usize,
	pub bounds: Vec<(f64, f64)>,
	pub steps: usize,
	pub mutation: f64,
	pub recombination: f64,
	pub popsize: usize,
}

/// Summary of one run, written as a CSV row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRecord {
	pub index: usize,
	pub bounds: String,
	pub steps: usize,
	pub mutation: f64,
	pub recombination: f64,
	pub popsize: usize,
	pub best_fitness: f64,
	pub best_x: String,
	pub nfev: usize,
	pub warnings: usize,
	pub criticals: usize,
}

impl SweepGrid {
	/// Single small combination, handy for smoke runs
	pub fn quick() -> Self {
		Self {
			bounds: vec![vec![(-20.0, 20.0), (-20.0, 20.0)]],
			steps: vec![40],
			mutation: vec![0.8],
			recombination: vec![0.7],
			popsize: vec![20],
			..Self::default()
		}
	}

	pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, SweepError> {
		let reader = BufReader::new(File::open(path)?);
		Ok(serde_json::from_reader(reader)?)
	}

	pub fn len(&self) -> usize {
		self.bounds.len()
			* self.steps.len()
			* self.mutation.len()
			* self.recombination.len()
			* self.popsize.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// All combinations, nested as bounds → steps → F → CR → N
	pub fn combinations(&self) -> Vec<SweepCombination> {
		let mut out = Vec::with_capacity(self.len());
		for bounds in &self.bounds {
			for &steps in &self.steps {
				for &mutation in &self.mutation {
					for &recombination in &self.recombination {
						for &popsize in &self.popsize {
							out.push(SweepCombination {
								index: out.len(),
								bounds: bounds.clone(),
								steps,
								mutation,
								recombination,
								popsize,
							});
						}
					}
				}
			}
		}
		out
	}
}

fn run_combination<F, O>(
	func: &F,
	combo: &SweepCombination,
	seed: Option<u64>,
	updating: Updating,
	observer: O,
) -> Result<SweepRecord, DEError>
where
	F: Fn(&Array1<f64>) -> f64,
	O: Observer + 'static,
{
	let mut builder = DEConfigBuilder::new()
		.mutation(combo.mutation)
		.recombination(combo.recombination)
		.popsize(combo.popsize)
		.maxiter(combo.steps)
		.updating(updating);
	if let Some(s) = seed {
		builder = builder.seed(s.wrapping_add(combo.index as u64));
	}

	let warnings = Rc::new(Cell::new(0usize));
	let criticals = Rc::new(Cell::new(0usize));
	let (w, c) = (warnings.clone(), criticals.clone());
	let counter = FnObserver(move |e: &ToleranceEvent<'_>| match e.severity {
		Severity::Warning => w.set(w.get() + 1),
		Severity::Critical => c.set(c.get() + 1),
	});
	let observers: Vec<Box<dyn Observer>> = vec![Box::new(observer), Box::new(counter)];

	let mut de = DifferentialEvolution::new(func, &combo.bounds, builder.build())?.with_observer(observers);
	let report = de.solve()?;
	log::debug!(
		"sweep #{}: bounds {} steps {} F {} CR {} N {} -> best {:.6e}",
		combo.index,
		format_pairs(&combo.bounds),
		combo.steps,
		combo.mutation,
		combo.recombination,
		combo.popsize,
		report.fun
	);

	let best_x: Vec<String> = report.x.iter().map(|v| format!("{:.8}", v)).collect();
	Ok(SweepRecord {
		index: combo.index,
		bounds: format_pairs(&combo.bounds),
		steps: combo.steps,
		mutation: combo.mutation,
		recombination: combo.recombination,
		popsize: combo.popsize,
		best_fitness: report.fun,
		best_x: format!("[{}]", best_x.join(" ")),
		nfev: report.nfev,
		warnings: warnings.get(),
		criticals: criticals.get(),
	})
}

/// Run every combination of `grid` on `func` and return one record per
/// combination, in combination order.
///
/// `make_observer` builds the diagnostics observer of each run. With
/// `parallel`, runs are spread over the rayon thread pool; every run still
/// owns its optimizer and random generator.
pub fn run_sweep<F, M, O>(
	func: &F,
	grid: &SweepGrid,
	make_observer: M,
	parallel: bool,
) -> Result<Vec<SweepRecord>, SweepError>
where
	F: Fn(&Array1<f64>) -> f64 + Sync,
	M: Fn(&SweepCombination) -> O + Sync,
	O: Observer + 'static,
{
	let combos = grid.combinations();
	log::info!("sweep: {} combinations ({})", combos.len(), if parallel { "parallel" } else { "sequential" });

	let run = |combo: &SweepCombination| {
		run_combination(func, combo, grid.seed, grid.updating, make_observer(combo))
			.map_err(|source| SweepError::Optimizer { index: combo.index, source })
	};

	if parallel {
		combos.par_iter().map(run).collect()
	} else {
		combos.iter().map(run).collect()
	}
}

/// Write sweep records as CSV with a header row
pub fn save_records_csv<P: AsRef<Path>>(path: P, records: &[SweepRecord]) -> Result<(), SweepError> {
	let mut wtr = csv::Writer::from_path(path)?;
	for record in records {
		wtr.serialize(record)?;
	}
	wtr.flush()?;
	Ok(())
}
