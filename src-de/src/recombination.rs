use ndarray::{Array1, ArrayView1};

/// Trial vector: mutant coordinates where `mask` is set, target coordinates elsewhere
pub(crate) fn recombine(target: ArrayView1<f64>, mutant: &Array1<f64>, mask: &[bool]) -> Array1<f64> {
	Array1::from_shape_fn(target.len(), |k| if mask[k] { mutant[k] } else { target[k] })
}
