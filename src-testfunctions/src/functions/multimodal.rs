//! Multimodal test functions
//!
//! These functions have multiple local minima and are used to test the global
//! search capabilities of the optimizer.

use ndarray::Array1;
use std::f64::consts::{E, PI};

/// Amplitude of the cosine modulation in the Rastrigin function
pub const RASTRIGIN_A: f64 = 10.0;

/// Rastrigin function - highly multimodal
/// f(x) = A*n + sum(x_i^2 - A*cos(2*pi*x_i)), A = 10
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn rastrigin(x: &Array1<f64>) -> f64 {
    rastrigin_with(x, RASTRIGIN_A)
}

/// Rastrigin function with a custom amplitude `a`
pub fn rastrigin_with(x: &Array1<f64>, a: f64) -> f64 {
    let n = x.len() as f64;
    let sum: f64 = x
        .iter()
        .map(|&xi| xi.powi(2) - a * (2.0 * PI * xi).cos())
        .sum();
    a * n + sum
}

/// Ackley function - nearly flat outer region with a deep central hole
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-32.768, 32.768]
pub fn ackley(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|&xi| xi.powi(2)).sum();
    let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();

    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}
