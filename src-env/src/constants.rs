/// Environment variable pointing at the project root
pub const DIFFEVO_DIR_VAR: &str = "DIFFEVO_DIR";

/// Directory (relative to the project root) receiving generated artefacts
pub const DATA_GENERATED: &str = "data_generated";

/// Normal-run stream: one line per optimizer initialization
pub const RUN_LOG_FILE: &str = "logging_de.log";

/// Error/critical stream: one line per out-of-tolerance trial
pub const ERROR_LOG_FILE: &str = "errors.log";

/// Sweep summary written by the CLI
pub const SWEEP_CSV_FILE: &str = "sweep.csv";
