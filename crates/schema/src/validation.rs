//! Structured validation results and the field checker each family builds on.
//!
//! Validation is a pure read of untrusted JSON: nothing here mutates or
//! repairs the candidate. Repair is the sanitizer's job.

use std::fmt;
use std::str::FromStr;

use hudkit_primitives::{Family, Position, grapheme_len};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::IntoEnumIterator;

/// A rule violation that blocks acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
	pub field: String,
	pub message: String,
}

/// A non-blocking observation about a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationWarning {
	pub field: String,
	pub message: String,
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.field, self.message)
	}
}

impl fmt::Display for ValidationWarning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.field, self.message)
	}
}

/// Outcome of validating one candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
	pub valid: bool,
	pub errors: Vec<ValidationError>,
	pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
	pub fn from_parts(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
		Self {
			valid: errors.is_empty(),
			errors,
			warnings,
		}
	}

	/// Returns true when some error targets `field`.
	pub fn has_error(&self, field: &str) -> bool {
		self.errors.iter().any(|e| e.field == field)
	}
}

/// Field path used for errors about the candidate as a whole.
pub const ROOT_FIELD: &str = "$";

/// Meta key a candidate may carry to name its family.
pub const COMPONENT_KEY: &str = "component";

/// JSON shape a required field must have to count as structurally present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
	String,
	Number,
}

pub(crate) mod messages {
	pub const REQUIRED: &str = "is required";
	pub const BLANK: &str = "must not be blank";
	pub const NOT_OBJECT: &str = "expected a JSON object";

	pub fn too_long(max: usize, got: usize) -> String {
		format!("must be at most {max} characters (got {got})")
	}
}

/// Errors that make a candidate unusable before any constraint is considered:
/// a non-object, or a required field that is missing, blank, or of the wrong
/// JSON type.
pub fn structural_errors(candidate: &Value, required: &[(&str, JsonKind)]) -> Vec<ValidationError> {
	let Some(obj) = candidate.as_object() else {
		return vec![error(ROOT_FIELD, messages::NOT_OBJECT)];
	};
	required
		.iter()
		.filter_map(|&(field, kind)| match (obj.get(field), kind) {
			(None | Some(Value::Null), _) => Some(error(field, messages::REQUIRED)),
			(Some(Value::String(s)), JsonKind::String) if s.trim().is_empty() => Some(error(field, messages::BLANK)),
			(Some(Value::String(_)), JsonKind::String) | (Some(Value::Number(_)), JsonKind::Number) => None,
			(Some(_), JsonKind::String) => Some(error(field, "must be a string")),
			(Some(_), JsonKind::Number) => Some(error(field, "must be a number")),
		})
		.collect()
}

fn error(field: &str, message: impl Into<String>) -> ValidationError {
	ValidationError {
		field: field.to_owned(),
		message: message.into(),
	}
}

/// Accumulates errors and warnings while reading one JSON object.
///
/// Each check reports at most one error per field. Nested objects (array
/// items) get their own checker whose issues are merged with a path prefix.
pub(crate) struct Checker<'a> {
	obj: &'a Map<String, Value>,
	prefix: String,
	errors: Vec<ValidationError>,
	warnings: Vec<ValidationWarning>,
}

impl<'a> Checker<'a> {
	/// Starts checking `candidate`, or returns the finished result if it is
	/// not an object.
	pub fn new(candidate: &'a Value) -> Result<Self, ValidationResult> {
		match candidate.as_object() {
			Some(obj) => Ok(Self::nested(obj, String::new())),
			None => Err(ValidationResult::from_parts(vec![error(ROOT_FIELD, messages::NOT_OBJECT)], Vec::new())),
		}
	}

	fn nested(obj: &'a Map<String, Value>, prefix: String) -> Self {
		Self {
			obj,
			prefix,
			errors: Vec::new(),
			warnings: Vec::new(),
		}
	}

	fn path(&self, field: &str) -> String {
		format!("{}{field}", self.prefix)
	}

	/// Returns the raw value of `field`, treating JSON `null` as absent.
	pub fn get(&self, field: &str) -> Option<&'a Value> {
		self.obj.get(field).filter(|v| !v.is_null())
	}

	pub fn error(&mut self, field: &str, message: impl Into<String>) {
		let field = self.path(field);
		self.errors.push(ValidationError {
			field,
			message: message.into(),
		});
	}

	pub fn warn(&mut self, field: &str, message: impl Into<String>) {
		let field = self.path(field);
		self.warnings.push(ValidationWarning {
			field,
			message: message.into(),
		});
	}

	/// Warns about keys outside `known` (the family meta key is always known).
	pub fn unknown_fields(&mut self, known: &[&str]) {
		let unknown: Vec<String> = self
			.obj
			.keys()
			.filter(|k| k.as_str() != COMPONENT_KEY && !known.contains(&k.as_str()))
			.cloned()
			.collect();
		for key in unknown {
			self.warn(&key, "unknown field will be ignored");
		}
	}

	/// Warns when the candidate names a different family than the one checking it.
	pub fn component_tag(&mut self, family: Family) {
		match self.get(COMPONENT_KEY) {
			None => {}
			Some(Value::String(tag)) if tag == family.as_str() => {}
			Some(other) => {
				let message = format!("names {other} but was checked as a {}", family.display_name());
				self.warn(COMPONENT_KEY, message);
			}
		}
	}

	/// Checks a string field against a grapheme ceiling.
	pub fn string(&mut self, field: &str, max: usize, required: bool) {
		match self.get(field) {
			None if required => self.error(field, messages::REQUIRED),
			None => {}
			Some(Value::String(s)) if required && s.trim().is_empty() => self.error(field, messages::BLANK),
			Some(Value::String(s)) => {
				let len = grapheme_len(s);
				if len > max {
					self.error(field, messages::too_long(max, len));
				}
			}
			Some(_) => self.error(field, "must be a string"),
		}
	}

	/// Checks an optional boolean field.
	pub fn boolean(&mut self, field: &str) {
		if let Some(v) = self.get(field)
			&& !v.is_boolean()
		{
			self.error(field, "must be a boolean");
		}
	}

	/// Checks a number field against an inclusive range.
	pub fn number(&mut self, field: &str, lo: f64, hi: f64, required: bool) {
		match self.get(field) {
			None if required => self.error(field, messages::REQUIRED),
			None => {}
			Some(v) => match v.as_f64() {
				Some(n) if (lo..=hi).contains(&n) => {}
				Some(n) => self.error(field, format!("must be between {lo} and {hi} (got {n})")),
				None => self.error(field, "must be a number"),
			},
		}
	}

	/// Checks an integer field against an inclusive range.
	pub fn integer(&mut self, field: &str, lo: i64, hi: i64, required: bool) {
		match self.get(field) {
			None if required => self.error(field, messages::REQUIRED),
			None => {}
			Some(v) => match v.as_f64() {
				Some(n) if n.fract() != 0.0 => self.error(field, format!("must be a whole number (got {n})")),
				Some(n) if (lo as f64..=hi as f64).contains(&n) => {}
				Some(n) => self.error(field, format!("must be between {lo} and {hi} (got {n})")),
				None => self.error(field, "must be an integer"),
			},
		}
	}

	/// Checks an enum-valued string field.
	pub fn enumeration<T>(&mut self, field: &str, required: bool)
	where
		T: FromStr + IntoEnumIterator + Into<&'static str>,
	{
		match self.get(field) {
			None if required => self.error(field, messages::REQUIRED),
			None => {}
			Some(Value::String(s)) if T::from_str(s).is_ok() => {}
			Some(other) => {
				let allowed: Vec<&'static str> = T::iter().map(Into::into).collect();
				self.error(field, format!("must be one of: {} (got {other})", allowed.join(", ")));
			}
		}
	}

	/// Checks the placement field, including the family's `center` restriction.
	pub fn position(&mut self, family: Family) {
		self.enumeration::<Position>("position", false);
		if let Some(Value::String(s)) = self.get("position")
			&& let Ok(position) = Position::from_str(s)
			&& !family.accepts_position(position)
		{
			self.error("position", format!("{position} is not allowed for a {}", family.display_name()));
		}
	}

	/// Checks the shared `id` field.
	pub fn id(&mut self) {
		self.string("id", crate::ID_MAX, true);
	}

	/// Checks an array field's shape and cardinality, then each object item.
	pub fn array(&mut self, field: &str, max: usize, mut item: impl FnMut(&mut Checker<'a>)) {
		let Some(value) = self.get(field) else {
			return;
		};
		let Some(items) = value.as_array() else {
			self.error(field, "must be an array");
			return;
		};
		if items.len() > max {
			self.error(field, format!("must contain at most {max} items (got {})", items.len()));
		}
		for (index, value) in items.iter().enumerate() {
			let path = format!("{field}[{index}]");
			let Some(obj) = value.as_object() else {
				self.error(&path, "must be an object");
				continue;
			};
			let mut nested = Checker::nested(obj, format!("{}{path}.", self.prefix));
			item(&mut nested);
			self.errors.append(&mut nested.errors);
			self.warnings.append(&mut nested.warnings);
		}
	}

	pub fn finish(self) -> ValidationResult {
		ValidationResult::from_parts(self.errors, self.warnings)
	}
}
