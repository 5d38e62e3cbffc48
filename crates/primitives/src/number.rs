/// Clamps `value` into `[lo, hi]`.
///
/// NaN maps to `default`; infinities clamp to the nearest bound.
pub fn clamp_f64(value: f64, lo: f64, hi: f64, default: f64) -> f64 {
	if value.is_nan() {
		return default;
	}
	value.clamp(lo, hi)
}

/// Rounds `value` to the nearest integer and clamps it into `[lo, hi]`.
///
/// NaN maps to `default`.
pub fn clamp_int(value: f64, lo: i64, hi: i64, default: i64) -> i64 {
	if value.is_nan() {
		return default;
	}
	// Float-to-int `as` saturates, so huge magnitudes land on a bound.
	(value.round() as i64).clamp(lo, hi)
}

#[cfg(test)]
mod tests;
