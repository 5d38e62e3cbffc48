//! Small contextual labels with an optional counter.

use std::time::Duration;

use hudkit_primitives::text::fit;
use hudkit_primitives::{Family, Icon, Position, Variant, clamp_int};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{Component, Schema, seconds};
use crate::instance::ComponentInstance;
use crate::sanitize::{Reader, clamp_seconds, fit_id};
use crate::validation::{Checker, JsonKind, ValidationResult};
use crate::{AUTO_DISMISS_MAX_SECS, AUTO_DISMISS_MIN_SECS};

pub const LABEL_MAX: usize = 30;
pub const COUNT_MAX: u16 = 999;

const DEFAULT_LABEL: &str = "Badge";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextBadge {
	pub id: String,
	pub label: String,
	pub variant: Variant,
	pub icon: Option<Icon>,
	pub count: Option<u16>,
	pub position: Position,
	pub dismissible: bool,
	pub auto_dismiss_after_seconds: Option<f64>,
}

impl Schema for ContextBadge {
	const FAMILY: Family = Family::ContextBadge;
	const FIELDS: &'static [&'static str] = &[
		"id",
		"label",
		"variant",
		"icon",
		"count",
		"position",
		"dismissible",
		"autoDismissAfterSeconds",
	];
	const REQUIRED: &'static [(&'static str, JsonKind)] = &[("id", JsonKind::String), ("label", JsonKind::String)];
	const RULES: &'static [&'static str] = &[
		"id and label are required non-empty strings",
		"label is at most 30 characters",
		"variant is one of: info, success, warning, error, neutral (default neutral)",
		"count is omitted or a whole number from 0 to 999",
		"position is any screen slot except center",
		"autoDismissAfterSeconds is null or a number from 1 to 300",
	];

	fn validate(candidate: &Value) -> ValidationResult {
		let mut check = match Checker::new(candidate) {
			Ok(check) => check,
			Err(result) => return result,
		};
		check.component_tag(Self::FAMILY);
		check.unknown_fields(Self::FIELDS);
		check.id();
		check.string("label", LABEL_MAX, true);
		check.enumeration::<Variant>("variant", false);
		check.enumeration::<Icon>("icon", false);
		check.integer("count", 0, COUNT_MAX.into(), false);
		check.position(Self::FAMILY);
		check.boolean("dismissible");
		check.number("autoDismissAfterSeconds", AUTO_DISMISS_MIN_SECS, AUTO_DISMISS_MAX_SECS, false);
		check.finish()
	}

	fn sanitize(candidate: &Value) -> Self {
		let read = Reader::new(candidate);
		Self {
			id: read.id(Self::FAMILY, candidate),
			label: read.string("label", LABEL_MAX).unwrap_or_else(|| DEFAULT_LABEL.to_owned()),
			variant: read.enumeration("variant").unwrap_or(Variant::Neutral),
			icon: read.enumeration("icon"),
			count: read
				.number("count")
				.filter(|n| !n.is_nan())
				.map(|n| clamp_int(n, 0, COUNT_MAX.into(), 0) as u16),
			position: read.position(Self::FAMILY),
			dismissible: read.boolean("dismissible").unwrap_or(true),
			auto_dismiss_after_seconds: read.number("autoDismissAfterSeconds"),
		}
		.normalize()
	}

	fn normalize(mut self) -> Self {
		let seed = || self.label.clone();
		self.id = fit_id(&self.id, Self::FAMILY, seed);
		self.label = fit(&self.label, LABEL_MAX).unwrap_or_else(|| DEFAULT_LABEL.to_owned());
		self.count = self.count.map(|n| n.min(COUNT_MAX));
		if !Self::FAMILY.accepts_position(self.position) {
			self.position = Self::FAMILY.default_position();
		}
		self.auto_dismiss_after_seconds = clamp_seconds(self.auto_dismiss_after_seconds);
		self
	}
}

impl Component for ContextBadge {
	fn id(&self) -> &str {
		&self.id
	}

	fn position(&self) -> Position {
		self.position
	}

	fn dismissible(&self) -> bool {
		self.dismissible
	}

	fn auto_dismiss_after(&self) -> Option<Duration> {
		seconds(self.auto_dismiss_after_seconds)
	}

	fn into_instance(self) -> ComponentInstance {
		ComponentInstance::ContextBadge(self)
	}

	fn from_instance(instance: ComponentInstance) -> Option<Self> {
		match instance {
			ComponentInstance::ContextBadge(badge) => Some(badge),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn center_is_rejected_and_repaired() {
		let candidate = json!({"id": "b1", "label": "Draft", "position": "center"});
		let result = ContextBadge::validate(&candidate);
		assert!(result.has_error("position"));

		let badge = ContextBadge::sanitize(&candidate);
		assert_eq!(badge.position, Position::TopRight);
		assert!(ContextBadge::validate(&badge.to_json()).valid);
	}

	#[test]
	fn count_is_clamped_and_rounded() {
		let badge = ContextBadge::sanitize(&json!({"id": "b1", "label": "Inbox", "count": 12_345}));
		assert_eq!(badge.count, Some(COUNT_MAX));
		let badge = ContextBadge::sanitize(&json!({"id": "b1", "label": "Inbox", "count": -3.7}));
		assert_eq!(badge.count, Some(0));
		let badge = ContextBadge::sanitize(&json!({"id": "b1", "label": "Inbox", "count": "many"}));
		assert_eq!(badge.count, None);
	}

	#[test]
	fn defaults_fill_a_bare_badge() {
		let badge = ContextBadge::sanitize(&json!({}));
		assert_eq!(badge.label, "Badge");
		assert_eq!(badge.variant, Variant::Neutral);
		assert!(badge.dismissible);
		assert_eq!(badge.auto_dismiss_after_seconds, None);
		assert!(badge.id.starts_with("context-badge-"));
	}

	#[test]
	fn long_labels_are_reported_then_truncated() {
		let label = "a".repeat(45);
		let candidate = json!({"id": "b1", "label": label});
		let result = ContextBadge::validate(&candidate);
		assert_eq!(result.errors[0].field, "label");
		assert_eq!(result.errors[0].message, "must be at most 30 characters (got 45)");
		assert_eq!(ContextBadge::sanitize(&candidate).label.len(), LABEL_MAX);
	}
}
