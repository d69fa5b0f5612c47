/// Fallback applied when the caller supplies a non-positive (or
/// non-finite) vector similarity threshold.
pub const DEFAULT_VECTOR_THRESHOLD: f32 = 0.7;
/// Fallback applied when the caller supplies a non-positive match count.
pub const DEFAULT_MATCH_COUNT: i32 = 10;
/// Hard ceiling on how many hits one search may request.
pub const MAX_MATCH_COUNT: i32 = 50;

/// Engine-facing search knobs after normalization. Invariant: the
/// threshold is finite and positive, and `0 < match_count <= 50`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchParams {
	pub vector_threshold: f32,
	pub match_count: i32,
	pub disable_keywords_match: bool,
}

/// Clamps caller-supplied knobs to safe bounds. Pure; always succeeds.
///
/// The threshold has no upper clamp: a value above anything the engine
/// emits legitimately returns an empty result, and that stays the
/// caller's responsibility.
pub fn normalize_search_params(
	vector_threshold: f32,
	match_count: i32,
	disable_keywords_match: bool,
) -> SearchParams {
	let vector_threshold = if !vector_threshold.is_finite() || vector_threshold <= 0.0 {
		DEFAULT_VECTOR_THRESHOLD
	} else {
		vector_threshold
	};
	let match_count =
		if match_count <= 0 { DEFAULT_MATCH_COUNT } else { match_count.min(MAX_MATCH_COUNT) };

	SearchParams { vector_threshold, match_count, disable_keywords_match }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn non_positive_threshold_falls_back_to_default() {
		assert_eq!(normalize_search_params(0.0, 10, true).vector_threshold, 0.7);
		assert_eq!(normalize_search_params(-0.3, 10, true).vector_threshold, 0.7);
	}

	#[test]
	fn non_finite_threshold_falls_back_to_default() {
		assert_eq!(normalize_search_params(f32::NAN, 10, true).vector_threshold, 0.7);
		assert_eq!(normalize_search_params(f32::INFINITY, 10, true).vector_threshold, 0.7);
	}

	#[test]
	fn high_threshold_passes_through_unclamped() {
		assert_eq!(normalize_search_params(1.5, 10, true).vector_threshold, 1.5);
	}

	#[test]
	fn match_count_bounds() {
		assert_eq!(normalize_search_params(0.7, 0, true).match_count, 10);
		assert_eq!(normalize_search_params(0.7, -5, true).match_count, 10);
		assert_eq!(normalize_search_params(0.7, 200, true).match_count, 50);
		assert_eq!(normalize_search_params(0.7, 50, true).match_count, 50);
		assert_eq!(normalize_search_params(0.7, 25, true).match_count, 25);
		assert_eq!(normalize_search_params(0.7, 1, true).match_count, 1);
	}

	#[test]
	fn keyword_flag_is_preserved() {
		assert!(normalize_search_params(0.7, 10, true).disable_keywords_match);
		assert!(!normalize_search_params(0.7, 10, false).disable_keywords_match);
	}
}
