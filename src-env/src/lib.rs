//! Environment utilities and constants for diffevo
//!
//! Resolves where sweep summaries and diagnostic logs are written.

pub mod constants;
pub mod env_utils;

pub use constants::*;
pub use env_utils::{get_diffevo_dir, get_output_dir, EnvError};
