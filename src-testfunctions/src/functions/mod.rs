//! Test function implementations organized by category
//!
//! - `unimodal`: single-optimum functions (bowl and valley shaped)
//! - `multimodal`: many local minima, used to exercise global search

pub mod multimodal;
pub mod unimodal;

pub use multimodal::*;
pub use unimodal::*;
