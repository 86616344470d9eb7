use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bounds::Bounds;
use crate::crossover_binomial::binomial_mask;
use crate::init_random::init_random;
use crate::mutant_rand1::mutant_rand1;
use crate::observer::{InitEvent, Observer, RunSnapshot, Severity, ToleranceEvent};
use crate::recombination::recombine;
use crate::{DEConfig, DEError, DEIntermediate, DEReport, MIN_POPULATION, Updating, argmin};

/// Outcome of greedy selection for one target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
	/// Trial was not strictly better; incumbent kept
	Rejected,
	/// Trial replaced the target
	Replaced,
	/// Trial replaced the target and is the new population best
	NewBest,
}

impl Selection {
	pub fn is_accepted(self) -> bool {
		!matches!(self, Selection::Rejected)
	}
}

/// Counters for one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
	pub accepted: usize,
	pub improved_best: usize,
}

struct PopulationState {
	population: Array2<f64>,
	fitness: Array1<f64>,
	best_idx: usize,
	best: Array1<f64>,
}

/// Differential Evolution optimizer (DE/rand/1/bin, greedy selection).
///
/// Lifecycle: [`new`](Self::new) → [`initialize`](Self::initialize) →
/// [`advance_generation`](Self::advance_generation) as many times as wanted.
/// The population is stored normalized in `[0, 1]^D`; the objective always
/// sees denormalized vectors.
pub struct DifferentialEvolution<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	func: &'a F,
	bounds: Bounds,
	config: DEConfig,
	snapshot: RunSnapshot,
	rng: StdRng,
	observer: Option<Box<dyn Observer + 'a>>,
	state: Option<PopulationState>,
	generation: usize,
	nfev: usize,
}

impl<'a, F> DifferentialEvolution<'a, F>
where
	F: Fn(&Array1<f64>) -> f64,
{
	/// Create a new DE optimizer with objective `func` and `(min, max)` bounds per dimension
	pub fn new(func: &'a F, bounds: &[(f64, f64)], config: DEConfig) -> Result<Self, DEError> {
		let bounds = Bounds::from_pairs(bounds)?;
		if config.popsize == 0 {
			return Err(DEError::InsufficientPopulation { size: 0, required: MIN_POPULATION });
		}
		let rng = match config.seed {
			Some(s) => StdRng::seed_from_u64(s),
			None => {
				let mut thread_rng = rand::rng();
				StdRng::from_rng(&mut thread_rng)
			}
		};
		let snapshot = RunSnapshot {
			bounds: bounds.pairs(),
			mutation: config.mutation,
			recombination: config.recombination,
			popsize: config.popsize,
		};
		Ok(Self {
			func,
			bounds,
			config,
			snapshot,
			rng,
			observer: None,
			state: None,
			generation: 0,
			nfev: 0,
		})
	}

	/// Attach a diagnostics observer
	pub fn with_observer<O: Observer + 'a>(mut self, observer: O) -> Self {
		self.observer = Some(Box::new(observer));
		self
	}

	pub fn set_observer(&mut self, observer: Box<dyn Observer + 'a>) {
		self.observer = Some(observer);
	}

	pub fn config(&self) -> &DEConfig {
		&self.config
	}

	pub fn bounds(&self) -> &Bounds {
		&self.bounds
	}

	pub fn dimensions(&self) -> usize {
		self.bounds.dimensions()
	}

	pub fn is_initialized(&self) -> bool {
		self.state.is_some()
	}

	/// Completed generations since the last `initialize()`
	pub fn generation(&self) -> usize {
		self.generation
	}

	/// Objective evaluations so far
	pub fn nfev(&self) -> usize {
		self.nfev
	}

	/// Normalized population (N x D)
	pub fn population(&self) -> Option<&Array2<f64>> {
		self.state.as_ref().map(|s| &s.population)
	}

	/// Population in real coordinates
	pub fn population_denorm(&self) -> Option<Array2<f64>> {
		self.state.as_ref().map(|s| self.bounds.denormalize_population(&s.population))
	}

	pub fn fitness(&self) -> Option<&Array1<f64>> {
		self.state.as_ref().map(|s| &s.fitness)
	}

	/// Best member in real coordinates
	pub fn best(&self) -> Option<&Array1<f64>> {
		self.state.as_ref().map(|s| &s.best)
	}

	pub fn best_index(&self) -> Option<usize> {
		self.state.as_ref().map(|s| s.best_idx)
	}

	pub fn best_fitness(&self) -> Option<f64> {
		self.state.as_ref().map(|s| s.fitness[s.best_idx])
	}

	/// Draw the population uniformly in `[0, 1]^D`, evaluate every member and
	/// record the best (NaN fitness is never picked as best while a number is
	/// available). Calling it again restarts from a fresh population.
	pub fn initialize(&mut self) {
		let npop = self.config.popsize;
		let population = init_random(npop, self.dimensions(), &mut self.rng);
		let population_denorm = self.bounds.denormalize_population(&population);
		let fitness: Array1<f64> = population_denorm
			.rows()
			.into_iter()
			.map(|row| (self.func)(&row.to_owned()))
			.collect();
		self.nfev += npop;

		let (best_idx, _) = argmin(&fitness);
		let best = population_denorm.row(best_idx).to_owned();
		log::debug!(
			"DE init: {} dimensions, population={}, F={}, CR={}, updating={}",
			self.dimensions(),
			npop,
			self.config.mutation,
			self.config.recombination,
			self.config.updating
		);

		if let Some(obs) = self.observer.as_mut() {
			obs.on_initialized(&InitEvent {
				snapshot: &self.snapshot,
				steps: self.config.maxiter,
				population: &population_denorm,
			});
		}

		self.state = Some(PopulationState { population, fitness, best_idx, best });
		self.generation = 0;
	}

	fn check_index(&self, index: usize) -> Result<&PopulationState, DEError> {
		let state = self.state.as_ref().ok_or(DEError::NotInitialized)?;
		let size = state.population.nrows();
		if index >= size {
			return Err(DEError::IndexOutOfRange { index, size });
		}
		Ok(state)
	}

	fn check_len(&self, got: usize) -> Result<(), DEError> {
		let expected = self.dimensions();
		if got != expected {
			return Err(DEError::DimensionMismatch { expected, got });
		}
		Ok(())
	}

	/// Donor vector for target `exclude_index`: `clip(a + F (b - c), 0, 1)`
	/// with a, b, c three distinct other members.
	pub fn mutation(&mut self, exclude_index: usize) -> Result<Array1<f64>, DEError> {
		self.check_index(exclude_index)?;
		let state = self.state.as_ref().ok_or(DEError::NotInitialized)?;
		mutant_rand1(exclude_index, &state.population, self.config.mutation, &mut self.rng)
	}

	/// Binomial crossover mask of length D with at least one `true`
	pub fn crossover(&mut self) -> Vec<bool> {
		binomial_mask(self.dimensions(), self.config.recombination, &mut self.rng)
	}

	/// Trial vector (normalized, denormalized) from the mutant where `mask` is
	/// set and from the current target member elsewhere
	pub fn recombination(
		&self,
		target_index: usize,
		mutant: &Array1<f64>,
		mask: &[bool],
	) -> Result<(Array1<f64>, Array1<f64>), DEError> {
		let state = self.check_index(target_index)?;
		self.check_len(mutant.len())?;
		self.check_len(mask.len())?;
		let trial = recombine(state.population.row(target_index), mutant, mask);
		let trial_denorm = self.bounds.denormalize(&trial);
		Ok((trial, trial_denorm))
	}

	/// Greedy selection: the trial replaces the target only when strictly better.
	///
	/// Accepted trials above the tolerance thresholds are reported to the observer.
	pub fn evaluate_and_select(
		&mut self,
		target_index: usize,
		trial: Array1<f64>,
		trial_denorm: Array1<f64>,
		trial_fitness: f64,
	) -> Result<Selection, DEError> {
		self.check_index(target_index)?;
		self.check_len(trial.len())?;
		self.check_len(trial_denorm.len())?;
		let state = self.state.as_mut().ok_or(DEError::NotInitialized)?;

		// NaN never improves
		let improves = trial_fitness < state.fitness[target_index];
		if !improves {
			return Ok(Selection::Rejected);
		}
		let current_best = state.fitness[state.best_idx];
		state.fitness[target_index] = trial_fitness;
		state.population.row_mut(target_index).assign(&trial);

		let mut outcome = Selection::Replaced;
		if trial_fitness < current_best {
			state.best_idx = target_index;
			state.best = trial_denorm;
			outcome = Selection::NewBest;
		}

		if let Some(obs) = self.observer.as_mut() {
			for severity in Severity::triggered_by(trial_fitness) {
				obs.on_tolerance_exceeded(&ToleranceEvent {
					severity,
					threshold: severity.threshold(),
					value: trial_fitness,
					target_index,
					generation: self.generation,
					snapshot: &self.snapshot,
				});
			}
		}
		Ok(outcome)
	}

	/// One full pass over the population
	pub fn advance_generation(&mut self) -> Result<GenerationStats, DEError> {
		let npop = self.state.as_ref().ok_or(DEError::NotInitialized)?.population.nrows();
		if npop < MIN_POPULATION {
			return Err(DEError::InsufficientPopulation { size: npop, required: MIN_POPULATION });
		}
		let mut stats = GenerationStats::default();

		match self.config.updating {
			Updating::Immediate => {
				for i in 0..npop {
					let (trial, trial_denorm, f) = self.build_trial(i)?;
					let outcome = self.evaluate_and_select(i, trial, trial_denorm, f)?;
					stats.record(outcome);
				}
			}
			Updating::Deferred => {
				// nothing is committed until every trial is built, so all of them
				// see the population as it was at the start of the generation
				let mut trials = Vec::with_capacity(npop);
				for i in 0..npop {
					trials.push(self.build_trial(i)?);
				}
				for (i, (trial, trial_denorm, f)) in trials.into_iter().enumerate() {
					let outcome = self.evaluate_and_select(i, trial, trial_denorm, f)?;
					stats.record(outcome);
				}
			}
		}

		self.generation += 1;
		log::debug!(
			"DE iter {:4}  best_f={:.6e}  accepted={}/{}, improved={}",
			self.generation,
			self.best_fitness().unwrap_or(f64::NAN),
			stats.accepted,
			npop,
			stats.improved_best
		);
		Ok(stats)
	}

	fn build_trial(&mut self, i: usize) -> Result<(Array1<f64>, Array1<f64>, f64), DEError> {
		let mutant = self.mutation(i)?;
		let mask = self.crossover();
		let (trial, trial_denorm) = self.recombination(i, &mutant, &mask)?;
		let f = (self.func)(&trial_denorm);
		self.nfev += 1;
		Ok((trial, trial_denorm, f))
	}

	/// Initialize, then run exactly `config.maxiter` generations.
	///
	/// The configured callback, if any, sees the best point after every generation.
	pub fn solve(&mut self) -> Result<DEReport, DEError> {
		let generations = self.config.maxiter;
		self.initialize();
		for iter in 1..=generations {
			self.advance_generation()?;
			if self.config.callback.is_some() {
				let intermediate = self.intermediate(iter)?;
				if let Some(ref mut cb) = self.config.callback {
					cb(&intermediate);
				}
			}
		}
		self.report(format!("Completed {} generations", generations))
	}

	fn intermediate(&self, iter: usize) -> Result<DEIntermediate, DEError> {
		let state = self.state.as_ref().ok_or(DEError::NotInitialized)?;
		Ok(DEIntermediate {
			x: state.best.clone(),
			fun: state.fitness[state.best_idx],
			convergence: state.fitness.std(0.0),
			iter,
		})
	}

	/// Snapshot of the current state as a report
	pub fn report(&self, message: String) -> Result<DEReport, DEError> {
		let state = self.state.as_ref().ok_or(DEError::NotInitialized)?;
		Ok(DEReport {
			x: state.best.clone(),
			fun: state.fitness[state.best_idx],
			message,
			nit: self.generation,
			nfev: self.nfev,
			population: self.bounds.denormalize_population(&state.population),
			population_energies: state.fitness.clone(),
		})
	}
}

impl GenerationStats {
	fn record(&mut self, outcome: Selection) {
		if outcome.is_accepted() {
			self.accepted += 1;
		}
		if outcome == Selection::NewBest {
			self.improved_best += 1;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::DEConfigBuilder;
	use crate::observer::FnObserver;
	use ndarray::array;
	use std::cell::Cell;
	use std::rc::Rc;

	fn sphere(x: &Array1<f64>) -> f64 {
		x.dot(x)
	}

	fn config(popsize: usize, seed: u64) -> DEConfig {
		DEConfigBuilder::new().popsize(popsize).seed(seed).maxiter(10).build()
	}

	fn assert_best_consistent<F: Fn(&Array1<f64>) -> f64>(de: &DifferentialEvolution<'_, F>) {
		let fitness = de.fitness().unwrap();
		let idx = de.best_index().unwrap();
		let (_, min) = argmin(fitness);
		assert_eq!(de.best_fitness().unwrap(), min);
		assert_eq!(fitness[idx], min);
		let row = de.population_denorm().unwrap().row(idx).to_owned();
		assert_eq!(de.best().unwrap(), &row);
	}

	#[test]
	fn test_initialize_draws_unit_population() {
		let bounds = [(-20.0, 20.0), (-10.0, 60.0), (0.0, 1.0)];
		let mut de = DifferentialEvolution::new(&sphere, &bounds, config(12, 1)).unwrap();
		assert!(!de.is_initialized());
		de.initialize();

		let pop = de.population().unwrap();
		assert_eq!(pop.dim(), (12, 3));
		assert!(pop.iter().all(|&v| (0.0..=1.0).contains(&v)));
		assert_eq!(de.nfev(), 12);
		assert_eq!(de.generation(), 0);

		let denorm = de.population_denorm().unwrap();
		for (row, &f) in denorm.rows().into_iter().zip(de.fitness().unwrap().iter()) {
			assert_eq!(sphere(&row.to_owned()), f);
			for (j, &(lo, hi)) in bounds.iter().enumerate() {
				assert!(row[j] >= lo && row[j] <= hi);
			}
		}
		assert_best_consistent(&de);
	}

	#[test]
	fn test_operations_require_initialize() {
		let mut de = DifferentialEvolution::new(&sphere, &[(0.0, 1.0); 2], config(5, 2)).unwrap();
		assert_eq!(de.mutation(0).unwrap_err(), DEError::NotInitialized);
		assert_eq!(de.advance_generation().unwrap_err(), DEError::NotInitialized);
		assert_eq!(
			de.recombination(0, &array![0.5, 0.5], &[true, false]).unwrap_err(),
			DEError::NotInitialized
		);
		assert_eq!(
			de.evaluate_and_select(0, array![0.5, 0.5], array![0.5, 0.5], 0.0).unwrap_err(),
			DEError::NotInitialized
		);
		assert!(de.report("x".into()).is_err());
		assert!(de.best().is_none());
	}

	#[test]
	fn test_index_and_length_checks() {
		let mut de = DifferentialEvolution::new(&sphere, &[(0.0, 1.0); 2], config(5, 3)).unwrap();
		de.initialize();
		assert_eq!(de.mutation(5).unwrap_err(), DEError::IndexOutOfRange { index: 5, size: 5 });
		assert_eq!(
			de.recombination(0, &array![0.5], &[true, false]).unwrap_err(),
			DEError::DimensionMismatch { expected: 2, got: 1 }
		);
		assert_eq!(
			de.evaluate_and_select(0, array![0.5], array![0.5], -1.0).unwrap_err(),
			DEError::DimensionMismatch { expected: 2, got: 1 }
		);
	}

	#[test]
	fn test_population_size_limits() {
		let mut de = DifferentialEvolution::new(&sphere, &[(-1.0, 1.0); 2], config(4, 4)).unwrap();
		de.initialize();
		for _ in 0..5 {
			de.advance_generation().unwrap();
		}
		assert_eq!(de.generation(), 5);

		let mut small = DifferentialEvolution::new(&sphere, &[(-1.0, 1.0); 2], config(3, 4)).unwrap();
		small.initialize();
		let err = DEError::InsufficientPopulation { size: 3, required: MIN_POPULATION };
		assert_eq!(small.mutation(0).unwrap_err(), err);
		assert_eq!(small.advance_generation().unwrap_err(), err);

		assert_eq!(
			DifferentialEvolution::new(&sphere, &[(-1.0, 1.0)], config(0, 4)).err(),
			Some(DEError::InsufficientPopulation { size: 0, required: MIN_POPULATION })
		);
	}

	#[test]
	fn test_mutation_stays_in_unit_cube() {
		let cfg = DEConfigBuilder::new().popsize(10).seed(5).mutation(2.0).build();
		let mut de = DifferentialEvolution::new(&sphere, &[(-3.0, 3.0); 4], cfg).unwrap();
		de.initialize();
		for i in 0..10 {
			let m = de.mutation(i).unwrap();
			assert_eq!(m.len(), 4);
			assert!(m.iter().all(|&v| (0.0..=1.0).contains(&v)));
		}
	}

	#[test]
	fn test_crossover_and_recombination() {
		let cfg = DEConfigBuilder::new().popsize(6).seed(6).recombination(0.0).build();
		let mut de = DifferentialEvolution::new(&sphere, &[(-2.0, 2.0); 5], cfg).unwrap();
		de.initialize();
		for _ in 0..20 {
			let mask = de.crossover();
			assert_eq!(mask.len(), 5);
			assert_eq!(mask.iter().filter(|&&m| m).count(), 1);
		}

		let mutant = array![1.0, 1.0, 1.0, 1.0, 1.0];
		let mask = [true, false, true, false, false];
		let (trial, trial_denorm) = de.recombination(2, &mutant, &mask).unwrap();
		let target = de.population().unwrap().row(2).to_owned();
		for j in 0..5 {
			let expected = if mask[j] { mutant[j] } else { target[j] };
			assert_eq!(trial[j], expected);
			assert_eq!(trial_denorm[j], -2.0 + 4.0 * expected);
		}
	}

	#[test]
	fn test_selection_is_strict_and_greedy() {
		let mut de = DifferentialEvolution::new(&sphere, &[(-1.0, 1.0); 2], config(6, 7)).unwrap();
		de.initialize();
		let before = de.population().unwrap().clone();
		let f0 = de.fitness().unwrap()[0];
		let trial = array![0.5, 0.5];
		let denorm = array![0.0, 0.0];

		for worse in [f0 + 1.0, f0, f64::NAN] {
			let outcome = de.evaluate_and_select(0, trial.clone(), denorm.clone(), worse).unwrap();
			assert_eq!(outcome, Selection::Rejected);
		}
		assert_eq!(de.population().unwrap(), &before);
		assert_eq!(de.fitness().unwrap()[0], f0);

		let outcome = de.evaluate_and_select(0, trial.clone(), denorm.clone(), -1.0).unwrap();
		assert_eq!(outcome, Selection::NewBest);
		assert_eq!(de.best_index(), Some(0));
		assert_eq!(de.best_fitness(), Some(-1.0));
		assert_eq!(de.population().unwrap().row(0), trial);
		assert_eq!(de.best().unwrap(), &denorm);

		// better than the target, but not than the best
		let f1 = de.fitness().unwrap()[1];
		let outcome = de.evaluate_and_select(1, array![0.25, 0.75], array![-0.5, 0.5], f1 / 2.0 - 0.5).unwrap();
		assert_eq!(outcome, Selection::Replaced);
		assert_eq!(de.best_index(), Some(0));
		assert_best_consistent(&de);
	}

	#[test]
	fn test_best_member_improving_itself_refreshes_best() {
		let mut de = DifferentialEvolution::new(&sphere, &[(-1.0, 1.0); 2], config(6, 8)).unwrap();
		de.initialize();
		let idx = de.best_index().unwrap();
		let f = de.best_fitness().unwrap();
		let outcome = de.evaluate_and_select(idx, array![0.5, 0.5], array![0.0, 0.0], f - 1.0).unwrap();
		assert_eq!(outcome, Selection::NewBest);
		assert_eq!(de.best_fitness(), Some(f - 1.0));
		assert_eq!(de.best().unwrap(), &array![0.0, 0.0]);
	}

	#[test]
	fn test_generations_never_lose_fitness() {
		for updating in [Updating::Immediate, Updating::Deferred] {
			let cfg = DEConfigBuilder::new().popsize(10).seed(9).updating(updating).build();
			let mut de = DifferentialEvolution::new(&sphere, &[(-5.0, 5.0); 3], cfg).unwrap();
			de.initialize();
			for g in 1..=30 {
				let prev = de.fitness().unwrap().clone();
				let prev_best = de.best_fitness().unwrap();
				let stats = de.advance_generation().unwrap();
				let now = de.fitness().unwrap();
				assert!(now.iter().zip(prev.iter()).all(|(n, p)| n <= p));
				assert!(de.best_fitness().unwrap() <= prev_best);
				assert!(stats.improved_best <= stats.accepted);
				assert_eq!(de.generation(), g);
				assert_eq!(de.nfev(), 10 * (g + 1));
				assert_best_consistent(&de);
			}
		}
	}

	#[test]
	fn test_seeded_runs_are_reproducible() {
		for updating in [Updating::Immediate, Updating::Deferred] {
			let run = || {
				let cfg = DEConfigBuilder::new().popsize(8).seed(1234).maxiter(15).updating(updating).build();
				let mut de = DifferentialEvolution::new(&sphere, &[(-4.0, 4.0); 2], cfg).unwrap();
				de.solve().unwrap()
			};
			let (a, b) = (run(), run());
			assert_eq!(a.x, b.x);
			assert_eq!(a.fun, b.fun);
			assert_eq!(a.population, b.population);
		}
	}

	#[test]
	fn test_reinitialize_restarts() {
		let mut de = DifferentialEvolution::new(&sphere, &[(-1.0, 1.0); 2], config(5, 10)).unwrap();
		de.initialize();
		de.advance_generation().unwrap();
		de.advance_generation().unwrap();
		let first = de.population().unwrap().clone();
		de.initialize();
		assert_eq!(de.generation(), 0);
		assert_ne!(de.population().unwrap(), &first);
		assert_eq!(de.nfev(), 5 + 2 * 5 + 5);
	}

	struct InitCounter(Rc<Cell<usize>>, Rc<Cell<usize>>);

	impl Observer for InitCounter {
		fn on_initialized(&mut self, event: &InitEvent<'_>) {
			self.0.set(self.0.get() + 1);
			assert_eq!(event.steps, 10);
			assert_eq!(event.population.dim(), (5, 2));
		}

		fn on_tolerance_exceeded(&mut self, _event: &ToleranceEvent<'_>) {
			self.1.set(self.1.get() + 1);
		}
	}

	#[test]
	fn test_every_accepted_trial_above_thresholds_is_reported() {
		// strictly decreasing but always above the critical threshold:
		// every trial is accepted and triggers both severities
		let calls = Cell::new(0usize);
		let decreasing = |_: &Array1<f64>| {
			calls.set(calls.get() + 1);
			1000.0 - calls.get() as f64 * 1e-3
		};
		let inits = Rc::new(Cell::new(0));
		let events = Rc::new(Cell::new(0));
		let severities = Rc::new(std::cell::RefCell::new(Vec::new()));
		let sink = severities.clone();
		let observers: Vec<Box<dyn Observer>> = vec![
			Box::new(InitCounter(inits.clone(), events.clone())),
			Box::new(FnObserver(move |e: &ToleranceEvent<'_>| sink.borrow_mut().push(e.severity))),
		];

		let mut de = DifferentialEvolution::new(&decreasing, &[(0.0, 1.0); 2], config(5, 11))
			.unwrap()
			.with_observer(observers);
		de.initialize();
		assert_eq!(inits.get(), 1);
		assert_eq!(events.get(), 0);
		for _ in 0..3 {
			let stats = de.advance_generation().unwrap();
			assert_eq!(stats.accepted, 5);
			assert_eq!(stats.improved_best, 5);
		}
		assert_eq!(events.get(), 2 * 5 * 3);
		let severities = severities.borrow();
		assert_eq!(severities.len(), 30);
		assert!(severities.chunks(2).all(|p| p == [Severity::Warning, Severity::Critical]));
	}

	#[test]
	fn test_no_events_below_warning_threshold() {
		let events = Rc::new(Cell::new(0));
		let counter = events.clone();
		let zero = |_: &Array1<f64>| 0.0;
		let mut de = DifferentialEvolution::new(&zero, &[(0.0, 1.0); 2], config(5, 12))
			.unwrap()
			.with_observer(FnObserver(move |_: &ToleranceEvent<'_>| counter.set(counter.get() + 1)));
		de.initialize();
		let f = de.fitness().unwrap()[0];
		assert_eq!(f, 0.0);
		assert_eq!(de.evaluate_and_select(0, array![0.1, 0.1], array![0.1, 0.1], 5e-4).unwrap(), Selection::Rejected);
		assert_eq!(
			de.evaluate_and_select(0, array![0.1, 0.1], array![0.1, 0.1], -5e-4).unwrap(),
			Selection::NewBest
		);
		assert_eq!(events.get(), 0);
	}

	struct StepRecorder(Rc<Cell<Option<usize>>>);

	impl Observer for StepRecorder {
		fn on_initialized(&mut self, event: &InitEvent<'_>) {
			self.0.set(Some(event.steps));
		}
	}

	#[test]
	fn test_init_event_steps_match_generations_run() {
		let steps = Rc::new(Cell::new(None));
		let sink = steps.clone();

		let cfg = DEConfigBuilder::new().seed(1).maxiter(5).build();
		let mut de = DifferentialEvolution::new(&sphere, &[(-1.0, 1.0); 2], cfg)
			.unwrap()
			.with_observer(StepRecorder(sink));
		let report = de.solve().unwrap();
		assert_eq!(report.nit, 5);
		assert_eq!(steps.get(), Some(report.nit));
		assert_eq!(report.nfev, 20 * 6);
	}

	#[test]
	fn test_nan_member_never_becomes_best() {
		let calls = Cell::new(0usize);
		let first_is_nan = |x: &Array1<f64>| {
			calls.set(calls.get() + 1);
			if calls.get() == 1 { f64::NAN } else { x.dot(x) }
		};
		let mut de = DifferentialEvolution::new(&first_is_nan, &[(-1.0, 1.0); 2], config(6, 13)).unwrap();
		de.initialize();
		assert!(de.fitness().unwrap()[0].is_nan());
		assert_ne!(de.best_index(), Some(0));
		assert!(de.best_fitness().unwrap().is_finite());
		for _ in 0..5 {
			de.advance_generation().unwrap();
			assert!(de.best_fitness().unwrap().is_finite());
			assert_best_consistent(&de);
		}
	}
}
