//! Optimization test functions library
//!
//! Objectives used to exercise the diffevo optimizer, together with their
//! customary search bounds and known global minima.
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use diffevo_testfunctions::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! assert_eq!(rastrigin(&x), 0.0);
//!
//! let bounds = get_function_bounds("rastrigin").unwrap();
//! assert_eq!(bounds.len(), 2);
//! ```

use ndarray::Array1;
use std::collections::HashMap;

pub mod functions;
pub use functions::*;

/// Objective signature shared by every function in this crate
pub type TestFunction = fn(&Array1<f64>) -> f64;

/// Metadata for a test function: default bounds and global minima
#[derive(Debug, Clone)]
pub struct FunctionMetadata {
    /// Function name
    pub name: String,
    /// Bounds for each dimension (min, max)
    pub bounds: Vec<(f64, f64)>,
    /// Global minima locations and values
    pub global_minima: Vec<(Vec<f64>, f64)>,
}

/// Look up a test function by name
pub fn get_function(name: &str) -> Option<TestFunction> {
    match name {
        "sphere" => Some(sphere as TestFunction),
        "rosenbrock" => Some(rosenbrock as TestFunction),
        "rastrigin" => Some(rastrigin as TestFunction),
        "ackley" => Some(ackley as TestFunction),
        _ => None,
    }
}

/// Names of all functions known to [`get_function`]
pub fn function_names() -> Vec<&'static str> {
    vec!["ackley", "rastrigin", "rosenbrock", "sphere"]
}

/// Get metadata for all available test functions (2-D defaults)
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
    let mut metadata = HashMap::new();

    metadata.insert(
        "sphere".to_string(),
        FunctionMetadata {
            name: "sphere".to_string(),
            bounds: vec![(-5.0, 5.0); 2],
            global_minima: vec![(vec![0.0, 0.0], 0.0)],
        },
    );

    metadata.insert(
        "rosenbrock".to_string(),
        FunctionMetadata {
            name: "rosenbrock".to_string(),
            bounds: vec![(-2.048, 2.048); 2],
            global_minima: vec![(vec![1.0, 1.0], 0.0)],
        },
    );

    metadata.insert(
        "rastrigin".to_string(),
        FunctionMetadata {
            name: "rastrigin".to_string(),
            bounds: vec![(-5.12, 5.12); 2],
            global_minima: vec![(vec![0.0, 0.0], 0.0)],
        },
    );

    metadata.insert(
        "ackley".to_string(),
        FunctionMetadata {
            name: "ackley".to_string(),
            bounds: vec![(-32.768, 32.768); 2],
            global_minima: vec![(vec![0.0, 0.0], 0.0)],
        },
    );

    metadata
}

/// Get bounds for a specific function from metadata
pub fn get_function_bounds(function_name: &str) -> Option<Vec<(f64, f64)>> {
    let metadata = get_function_metadata();
    metadata.get(function_name).map(|meta| meta.bounds.clone())
}

/// Get bounds as a Vec, falling back to `default_bounds` in 2-D if the
/// function is unknown
pub fn get_function_bounds_vec(function_name: &str, default_bounds: (f64, f64)) -> Vec<(f64, f64)> {
    get_function_bounds(function_name).unwrap_or_else(|| vec![default_bounds; 2])
}
