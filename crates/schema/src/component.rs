use std::fmt;
use std::time::Duration;

use hudkit_primitives::{Family, Position};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::instance::ComponentInstance;
use crate::validation::{self, JsonKind, ValidationError, ValidationResult};

/// Validation and repair rules for one component family.
///
/// Implemented once per family by its instance type; callers that only know
/// the family at runtime go through [`crate::FamilySchema`].
pub trait Schema: Sized + Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
	const FAMILY: Family;
	/// Wire field names, in declaration order.
	const FIELDS: &'static [&'static str];
	/// Required fields and the JSON shape each must have.
	const REQUIRED: &'static [(&'static str, JsonKind)];
	/// Terse restatement of the family rules used in prompts.
	const RULES: &'static [&'static str];

	/// Checks an untrusted candidate without modifying it.
	fn validate(candidate: &Value) -> ValidationResult;

	/// Produces a complete instance from any candidate. Never fails.
	fn sanitize(candidate: &Value) -> Self;

	/// Re-applies every clamp, ceiling and cross-field coercion to a typed value.
	fn normalize(self) -> Self;

	/// Missing, blank, or mistyped required fields.
	fn structural_errors(candidate: &Value) -> Vec<ValidationError> {
		validation::structural_errors(candidate, Self::REQUIRED)
	}

	/// Serializes the instance back to its wire form.
	fn to_json(&self) -> Value {
		serde_json::to_value(self).unwrap_or_else(|error| {
			tracing::warn!(family = %Self::FAMILY, %error, "schema.serialize_failed");
			Value::Null
		})
	}
}

/// Registry-facing view of a sanitized instance.
pub trait Component: Schema {
	fn id(&self) -> &str;

	fn position(&self) -> Position;

	/// Ordering key for priority-admission families.
	fn priority(&self) -> Option<u8> {
		None
	}

	fn dismissible(&self) -> bool;

	/// Whether a dismiss request (manual or timed) may remove this instance.
	fn can_dismiss(&self) -> bool {
		self.dismissible()
	}

	/// Requested auto-expiry delay, if any.
	fn auto_dismiss_after(&self) -> Option<Duration>;

	fn into_instance(self) -> ComponentInstance;

	fn from_instance(instance: ComponentInstance) -> Option<Self>;
}

/// Converts a sanitized seconds value into a timer delay.
pub(crate) fn seconds(value: Option<f64>) -> Option<Duration> {
	value.and_then(|s| Duration::try_from_secs_f64(s).ok())
}
