use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use diffevo_env::{ERROR_LOG_FILE, RUN_LOG_FILE};

use crate::observer::{InitEvent, Observer, ToleranceEvent};

/// Writes diagnostics to two append-only text files: the normal-run stream
/// (one line per initialization) and the error stream (one line per
/// out-of-tolerance trial).
///
/// Lines look like `2025-01-01 12:00:00,123 - run - INFO - <message>`.
/// Clones share the same files, so one observer can serve a whole sweep.
#[derive(Clone)]
pub struct FileObserver {
	streams: Arc<Mutex<Streams>>,
	run_path: PathBuf,
	error_path: PathBuf,
}

struct Streams {
	run: File,
	errors: File,
}

impl FileObserver {
	/// Open (or create) `logging_de.log` and `errors.log` inside `dir`
	pub fn in_dir<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
		let dir = dir.as_ref();
		create_dir_all(dir)?;
		Self::open(dir.join(RUN_LOG_FILE), dir.join(ERROR_LOG_FILE))
	}

	pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(run_path: P, error_path: Q) -> io::Result<Self> {
		let run_path = run_path.as_ref().to_path_buf();
		let error_path = error_path.as_ref().to_path_buf();
		let run = OpenOptions::new().create(true).append(true).open(&run_path)?;
		let errors = OpenOptions::new().create(true).append(true).open(&error_path)?;
		Ok(Self { streams: Arc::new(Mutex::new(Streams { run, errors })), run_path, error_path })
	}

	pub fn run_path(&self) -> &Path {
		&self.run_path
	}

	pub fn error_path(&self) -> &Path {
		&self.error_path
	}

	fn write_line(&self, to_errors: bool, level: &str, message: &str) {
		let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
		let Ok(mut streams) = self.streams.lock() else {
			log::warn!("diagnostic log files are poisoned, dropping: {}", message);
			return;
		};
		let (file, name) =
			if to_errors { (&mut streams.errors, "errors") } else { (&mut streams.run, "run") };
		if let Err(e) = writeln!(file, "{} - {} - {} - {}", stamp, name, level, message) {
			log::warn!("failed to write diagnostic line: {}", e);
		}
	}
}

impl Observer for FileObserver {
	fn on_initialized(&mut self, event: &InitEvent<'_>) {
		self.write_line(false, "INFO", &event.to_string());
	}

	fn on_tolerance_exceeded(&mut self, event: &ToleranceEvent<'_>) {
		self.write_line(true, &event.severity.to_string(), &event.to_string());
	}
}
