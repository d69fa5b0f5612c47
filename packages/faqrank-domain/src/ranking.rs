use std::cmp::Ordering;

/// Descending score order for the final entry list.
///
/// `total_cmp` keeps this a strict total order even for non-finite
/// scores, which a subtraction-based comparator cannot guarantee. Used
/// with a stable sort so equal scores keep their assembly order.
pub fn by_score_desc(a: f32, b: f32) -> Ordering {
	b.total_cmp(&a)
}
