//! Run diagnostics
//!
//! The optimizer reports two kinds of events: one [`InitEvent`] when the
//! population is drawn, and a [`ToleranceEvent`] whenever an accepted trial
//! still has a fitness above [`WARNING_THRESHOLD`] (and a second, critical
//! one above [`CRITICAL_THRESHOLD`]). Events are observational: nothing an
//! observer does feeds back into the search.

use std::fmt;

use ndarray::Array2;
use serde::Serialize;

use crate::bounds::{format_pairs, format_rows};

/// Fitness above which an accepted trial is reported as a warning
pub const WARNING_THRESHOLD: f64 = 1e-3;
/// Fitness above which an accepted trial is additionally reported as critical
pub const CRITICAL_THRESHOLD: f64 = 1e-1;

/// `log` target of the normal-run stream
pub const RUN_TARGET: &str = "diffevo::run";
/// `log` target of the error/critical stream
pub const ERROR_TARGET: &str = "diffevo::errors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
	Warning,
	Critical,
}

impl Severity {
	pub fn threshold(self) -> f64 {
		match self {
			Severity::Warning => WARNING_THRESHOLD,
			Severity::Critical => CRITICAL_THRESHOLD,
		}
	}

	/// Severities triggered by `value`, mildest first
	pub fn triggered_by(value: f64) -> impl Iterator<Item = Severity> {
		[Severity::Warning, Severity::Critical].into_iter().filter(move |s| value > s.threshold())
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Severity::Warning => write!(f, "WARNING"),
			Severity::Critical => write!(f, "CRITICAL"),
		}
	}
}

/// Configuration of a run as reported alongside every event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSnapshot {
	pub bounds: Vec<(f64, f64)>,
	pub mutation: f64,
	pub recombination: f64,
	pub popsize: usize,
}

impl fmt::Display for RunSnapshot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"population size {}, bounds {}, mutation {}, crossover {}",
			self.popsize,
			format_pairs(&self.bounds),
			self.mutation,
			self.recombination
		)
	}
}

/// Emitted once by `initialize()`
#[derive(Debug, Clone, Copy)]
pub struct InitEvent<'a> {
	pub snapshot: &'a RunSnapshot,
	/// Number of generations the caller intends to run
	pub steps: usize,
	/// Initial population in real coordinates
	pub population: &'a Array2<f64>,
}

impl fmt::Display for InitEvent<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Initializing population: {}, steps {}, initial population {}",
			self.snapshot,
			self.steps,
			format_rows(self.population)
		)
	}
}

/// Emitted by selection for an accepted trial whose fitness is above a threshold
#[derive(Debug, Clone, Copy)]
pub struct ToleranceEvent<'a> {
	pub severity: Severity,
	pub threshold: f64,
	pub value: f64,
	pub target_index: usize,
	/// Generations completed before the one producing this trial
	pub generation: usize,
	pub snapshot: &'a RunSnapshot,
}

impl fmt::Display for ToleranceEvent<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Result {} exceeds {:e} (generation {}, member {}). Parameters: {}",
			self.value, self.threshold, self.generation, self.target_index, self.snapshot
		)
	}
}

/// Receiver of optimizer diagnostics; both hooks default to no-ops
pub trait Observer {
	fn on_initialized(&mut self, _event: &InitEvent<'_>) {}
	fn on_tolerance_exceeded(&mut self, _event: &ToleranceEvent<'_>) {}
}

/// Forwards events to the `log` facade: init as `info`, warnings as `warn`,
/// critical events as `error`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
	fn on_initialized(&mut self, event: &InitEvent<'_>) {
		log::info!(target: RUN_TARGET, "{}", event);
	}

	fn on_tolerance_exceeded(&mut self, event: &ToleranceEvent<'_>) {
		match event.severity {
			Severity::Warning => log::warn!(target: ERROR_TARGET, "{}", event),
			Severity::Critical => log::error!(target: ERROR_TARGET, "{}", event),
		}
	}
}

/// Adapts a closure over tolerance events into an [`Observer`]
pub struct FnObserver<F>(pub F);

impl<F> Observer for FnObserver<F>
where
	F: FnMut(&ToleranceEvent<'_>),
{
	fn on_tolerance_exceeded(&mut self, event: &ToleranceEvent<'_>) {
		(self.0)(event)
	}
}

/// Fan-out to several observers, in order
impl Observer for Vec<Box<dyn Observer>> {
	fn on_initialized(&mut self, event: &InitEvent<'_>) {
		for obs in self.iter_mut() {
			obs.on_initialized(event);
		}
	}

	fn on_tolerance_exceeded(&mut self, event: &ToleranceEvent<'_>) {
		for obs in self.iter_mut() {
			obs.on_tolerance_exceeded(event);
		}
	}
}

impl<O: Observer + ?Sized> Observer for Box<O> {
	fn on_initialized(&mut self, event: &InitEvent<'_>) {
		(**self).on_initialized(event)
	}

	fn on_tolerance_exceeded(&mut self, event: &ToleranceEvent<'_>) {
		(**self).on_tolerance_exceeded(event)
	}
}
