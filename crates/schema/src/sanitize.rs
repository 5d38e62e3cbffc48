//! Lenient field readers shared by every family's sanitizer.
//!
//! Readers never fail: anything absent, mistyped, or unparseable comes back
//! as `None` and the caller substitutes the documented default.

use std::hash::{Hash, Hasher};
use std::str::FromStr;

use hudkit_primitives::text::fit;
use hudkit_primitives::{Family, Position};
use rustc_hash::FxHasher;
use serde_json::{Map, Value};

use crate::ID_MAX;

/// Deterministic placeholder id for a family, derived from `seed`.
pub fn placeholder_id(family: Family, seed: &str) -> String {
	let mut hasher = FxHasher::default();
	seed.hash(&mut hasher);
	format!("{}-{:016x}", family.as_str(), hasher.finish())
}

/// Normalizes free-form enum spellings (`"Top Right"`, `"TOP_RIGHT"`) to kebab-case.
fn kebab(s: &str) -> String {
	s.trim()
		.chars()
		.map(|c| match c {
			'_' | ' ' => '-',
			c => c.to_ascii_lowercase(),
		})
		.collect()
}

/// Parses an enum from its exact tag or a loose spelling of it.
pub(crate) fn parse_loose<T: FromStr>(s: &str) -> Option<T> {
	T::from_str(s).ok().or_else(|| T::from_str(&kebab(s)).ok())
}

pub(crate) struct Reader<'a> {
	obj: Option<&'a Map<String, Value>>,
}

impl<'a> Reader<'a> {
	pub fn new(candidate: &'a Value) -> Self {
		Self {
			obj: candidate.as_object(),
		}
	}

	pub fn nested(obj: &'a Map<String, Value>) -> Self {
		Self { obj: Some(obj) }
	}

	fn get(&self, field: &str) -> Option<&'a Value> {
		self.obj.and_then(|obj| obj.get(field))
	}

	/// Reads a non-blank string, trimmed and fitted to `max` graphemes.
	pub fn string(&self, field: &str, max: usize) -> Option<String> {
		self.get(field).and_then(Value::as_str).and_then(|s| fit(s, max))
	}

	/// Reads a JSON number. Strings and other types are not coerced.
	pub fn number(&self, field: &str) -> Option<f64> {
		self.get(field).and_then(Value::as_f64)
	}

	pub fn boolean(&self, field: &str) -> Option<bool> {
		self.get(field).and_then(Value::as_bool)
	}

	pub fn enumeration<T: FromStr>(&self, field: &str) -> Option<T> {
		self.get(field).and_then(Value::as_str).and_then(parse_loose)
	}

	/// Reads the placement, falling back to the family default when missing,
	/// unparseable, or not allowed for the family.
	pub fn position(&self, family: Family) -> Position {
		self.enumeration::<Position>("position")
			.filter(|p| family.accepts_position(*p))
			.unwrap_or(family.default_position())
	}

	/// Object items of an array field; non-object items are skipped.
	pub fn objects(&self, field: &str) -> Vec<&'a Map<String, Value>> {
		self.get(field)
			.and_then(Value::as_array)
			.map(|items| items.iter().filter_map(Value::as_object).collect())
			.unwrap_or_default()
	}

	/// Reads the id (numbers are stringified), or derives a placeholder from
	/// the whole candidate.
	pub fn id(&self, family: Family, candidate: &Value) -> String {
		let raw = match self.get("id") {
			Some(Value::String(s)) => fit(s, ID_MAX),
			Some(Value::Number(n)) => fit(&n.to_string(), ID_MAX),
			_ => None,
		};
		raw.unwrap_or_else(|| placeholder_id(family, &candidate.to_string()))
	}
}

/// Fits an already-typed id, deriving a placeholder from `seed` if blank.
pub(crate) fn fit_id(id: &str, family: Family, seed: impl FnOnce() -> String) -> String {
	fit(id, ID_MAX).unwrap_or_else(|| placeholder_id(family, &seed()))
}

/// Clamps an optional auto-dismiss duration in seconds; NaN drops it.
pub(crate) fn clamp_seconds(seconds: Option<f64>) -> Option<f64> {
	seconds
		.filter(|s| !s.is_nan())
		.map(|s| s.clamp(crate::AUTO_DISMISS_MIN_SECS, crate::AUTO_DISMISS_MAX_SECS))
}
