use proptest::prelude::*;

use super::*;

#[test]
fn nan_falls_back_to_default() {
	assert_eq!(clamp_f64(f64::NAN, 0.0, 100.0, 0.0), 0.0);
	assert_eq!(clamp_int(f64::NAN, 1, 5, 3), 3);
}

#[test]
fn infinities_clamp_to_bounds() {
	assert_eq!(clamp_f64(f64::INFINITY, 0.0, 100.0, 0.0), 100.0);
	assert_eq!(clamp_f64(f64::NEG_INFINITY, 0.0, 100.0, 0.0), 0.0);
	assert_eq!(clamp_int(f64::INFINITY, 24, 200, 64), 200);
}

#[test]
fn integers_round_before_clamping() {
	assert_eq!(clamp_int(3.5, 1, 5, 3), 4);
	assert_eq!(clamp_int(0.4, 1, 5, 3), 1);
	assert_eq!(clamp_int(4.4, 1, 5, 3), 4);
}

proptest! {
	#[test]
	fn prop_clamped_values_stay_in_bounds(value in proptest::num::f64::ANY) {
		let clamped = clamp_f64(value, 0.0, 100.0, 0.0);
		prop_assert!((0.0..=100.0).contains(&clamped));
		let rounded = clamp_int(value, 2, 20, 6);
		prop_assert!((2..=20).contains(&rounded));
	}
}
