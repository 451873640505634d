/// Cosine similarity in `[-1, 1]`, accumulated in `f64`.
///
/// Returns `None` when the vectors are empty, differ in length, or either has zero magnitude.
pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> Option<f64> {
	if lhs.is_empty() || lhs.len() != rhs.len() {
		return None;
	}

	let mut dot = 0.0_f64;
	let mut lhs_norm = 0.0_f64;
	let mut rhs_norm = 0.0_f64;

	for (l, r) in lhs.iter().zip(rhs.iter()) {
		let (l, r) = (f64::from(*l), f64::from(*r));

		dot += l * r;
		lhs_norm += l * l;
		rhs_norm += r * r;
	}

	if lhs_norm <= f64::EPSILON || rhs_norm <= f64::EPSILON {
		return None;
	}

	Some((dot / (lhs_norm.sqrt() * rhs_norm.sqrt())).clamp(-1.0, 1.0))
}

pub(crate) fn has_magnitude(vec: &[f32]) -> bool {
	vec.iter().map(|value| f64::from(*value) * f64::from(*value)).sum::<f64>() > f64::EPSILON
}

pub(crate) fn all_finite(vec: &[f32]) -> bool {
	vec.iter().all(|value| value.is_finite())
}
