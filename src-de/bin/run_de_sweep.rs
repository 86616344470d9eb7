use std::path::PathBuf;

use clap::Parser;

use diffevo_de::{
	FileObserver, LogObserver, Observer, SweepGrid, Updating, run_sweep, save_records_csv,
};
use diffevo_env::{SWEEP_CSV_FILE, get_output_dir};
use diffevo_testfunctions::{function_names, get_function};

/// Run a Differential Evolution parameter sweep on a test function
#[derive(Parser)]
#[command(name = "run_de_sweep")]
#[command(about = "Sweep DE parameters (bounds, steps, F, CR, N) on a test function")]
struct Args {
	/// Objective function name
	#[arg(short, long, default_value = "rastrigin")]
	function: String,

	/// JSON file describing the grid; missing keys use the reference grid
	#[arg(short, long)]
	grid: Option<PathBuf>,

	/// Run a single small combination instead of the full grid
	#[arg(long, conflicts_with = "grid")]
	quick: bool,

	/// Base seed; combination i uses seed + i
	#[arg(short, long)]
	seed: Option<u64>,

	/// Selection mode: immediate or deferred
	#[arg(short, long)]
	updating: Option<Updating>,

	/// Directory for logging_de.log, errors.log and sweep.csv
	#[arg(short, long)]
	output_dir: Option<PathBuf>,

	/// Spread combinations over all cores
	#[arg(short, long)]
	parallel: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let args = Args::parse();

	let func = get_function(&args.function).ok_or_else(|| {
		format!("unknown function '{}', expected one of {:?}", args.function, function_names())
	})?;

	let mut grid = if args.quick {
		SweepGrid::quick()
	} else if let Some(path) = &args.grid {
		SweepGrid::from_json_file(path)?
	} else {
		SweepGrid::default()
	};
	if args.seed.is_some() {
		grid.seed = args.seed;
	}
	if let Some(updating) = args.updating {
		grid.updating = updating;
	}

	let output_dir = match args.output_dir {
		Some(dir) => dir,
		None => get_output_dir()?,
	};
	let file_observer = FileObserver::in_dir(&output_dir)?;

	println!(
		"Sweeping '{}': {} combinations, updating={}, output in {}",
		args.function,
		grid.len(),
		grid.updating,
		output_dir.display()
	);

	let records = run_sweep(
		&func,
		&grid,
		|_| -> Vec<Box<dyn Observer>> { vec![Box::new(LogObserver), Box::new(file_observer.clone())] },
		args.parallel,
	)?;

	let csv_path = output_dir.join(SWEEP_CSV_FILE);
	save_records_csv(&csv_path, &records)?;

	if let Some(best) = records.iter().min_by(|a, b| a.best_fitness.total_cmp(&b.best_fitness)) {
		println!(
			"Best: f={:.6e} at {} (combination {}: bounds {}, steps {}, F {}, CR {}, N {})",
			best.best_fitness,
			best.best_x,
			best.index,
			best.bounds,
			best.steps,
			best.mutation,
			best.recombination,
			best.popsize
		);
	}
	let warnings: usize = records.iter().map(|r| r.warnings).sum();
	let criticals: usize = records.iter().map(|r| r.criticals).sum();
	println!("Diagnostics: {} warnings, {} critical", warnings, criticals);
	println!("Wrote {}", csv_path.display());
	Ok(())
}
