//! Circular progress meters.
//!
//! Rings are expected to be patched in place as progress advances; see
//! `Manager::update` in the registry crate.

use std::time::Duration;

use hudkit_primitives::text::fit;
use hudkit_primitives::{Family, Position, Variant, clamp_f64, clamp_int};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{Component, Schema, seconds};
use crate::instance::ComponentInstance;
use crate::sanitize::{Reader, clamp_seconds, fit_id};
use crate::validation::{Checker, JsonKind, ValidationResult};
use crate::{AUTO_DISMISS_MAX_SECS, AUTO_DISMISS_MIN_SECS};

pub const VALUE_MIN: f64 = 0.0;
pub const VALUE_MAX: f64 = 100.0;
pub const LABEL_MAX: usize = 20;
pub const SIZE_MIN: u16 = 24;
pub const SIZE_MAX: u16 = 200;
pub const DEFAULT_SIZE: u16 = 64;
pub const THICKNESS_MIN: u16 = 2;
pub const THICKNESS_MAX: u16 = 20;
pub const DEFAULT_THICKNESS: u16 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRing {
	pub id: String,
	pub value: f64,
	pub label: Option<String>,
	pub size: u16,
	pub thickness: u16,
	pub variant: Variant,
	pub show_value: bool,
	pub position: Position,
	pub dismissible: bool,
	pub auto_dismiss_after_seconds: Option<f64>,
}

impl ProgressRing {
	pub fn is_complete(&self) -> bool {
		self.value >= VALUE_MAX
	}
}

fn clamp_u16(raw: Option<f64>, lo: u16, hi: u16, default: u16) -> u16 {
	raw.map_or(default, |n| clamp_int(n, lo.into(), hi.into(), default.into()) as u16)
}

impl Schema for ProgressRing {
	const FAMILY: Family = Family::ProgressRing;
	const FIELDS: &'static [&'static str] = &[
		"id",
		"value",
		"label",
		"size",
		"thickness",
		"variant",
		"showValue",
		"position",
		"dismissible",
		"autoDismissAfterSeconds",
	];
	const REQUIRED: &'static [(&'static str, JsonKind)] = &[("id", JsonKind::String), ("value", JsonKind::Number)];
	const RULES: &'static [&'static str] = &[
		"id is a required non-empty string; value is a required number from 0 to 100",
		"label is optional and at most 20 characters",
		"size is a whole number from 24 to 200 (default 64)",
		"thickness is a whole number from 2 to 20 (default 6)",
		"variant is one of: info, success, warning, error, neutral",
		"position is one of the nine screen slots, including center",
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
		check.number("value", VALUE_MIN, VALUE_MAX, true);
		check.string("label", LABEL_MAX, false);
		check.integer("size", SIZE_MIN.into(), SIZE_MAX.into(), false);
		check.integer("thickness", THICKNESS_MIN.into(), THICKNESS_MAX.into(), false);
		check.enumeration::<Variant>("variant", false);
		check.boolean("showValue");
		check.position(Self::FAMILY);
		check.boolean("dismissible");
		check.number("autoDismissAfterSeconds", AUTO_DISMISS_MIN_SECS, AUTO_DISMISS_MAX_SECS, false);

		let size = check.get("size").and_then(Value::as_f64).unwrap_or(DEFAULT_SIZE.into());
		let thickness = check.get("thickness").and_then(Value::as_f64).unwrap_or(DEFAULT_THICKNESS.into());
		if thickness * 2.0 > size {
			check.warn("thickness", format!("ring of size {size} has no hole at thickness {thickness}"));
		}

		check.finish()
	}

	fn sanitize(candidate: &Value) -> Self {
		let read = Reader::new(candidate);
		Self {
			id: read.id(Self::FAMILY, candidate),
			value: read.number("value").unwrap_or(VALUE_MIN),
			label: read.string("label", LABEL_MAX),
			size: clamp_u16(read.number("size"), SIZE_MIN, SIZE_MAX, DEFAULT_SIZE),
			thickness: clamp_u16(read.number("thickness"), THICKNESS_MIN, THICKNESS_MAX, DEFAULT_THICKNESS),
			variant: read.enumeration("variant").unwrap_or_default(),
			show_value: read.boolean("showValue").unwrap_or(true),
			position: read.position(Self::FAMILY),
			dismissible: read.boolean("dismissible").unwrap_or(true),
			auto_dismiss_after_seconds: read.number("autoDismissAfterSeconds"),
		}
		.normalize()
	}

	fn normalize(mut self) -> Self {
		let seed = || format!("{}:{:?}", self.value, self.label);
		self.id = fit_id(&self.id, Self::FAMILY, seed);
		self.value = clamp_f64(self.value, VALUE_MIN, VALUE_MAX, VALUE_MIN);
		self.label = self.label.as_deref().and_then(|label| fit(label, LABEL_MAX));
		self.size = self.size.clamp(SIZE_MIN, SIZE_MAX);
		self.thickness = self.thickness.clamp(THICKNESS_MIN, THICKNESS_MAX);
		if !Self::FAMILY.accepts_position(self.position) {
			self.position = Self::FAMILY.default_position();
		}
		self.auto_dismiss_after_seconds = clamp_seconds(self.auto_dismiss_after_seconds);
		self
	}
}

impl Component for ProgressRing {
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
		ComponentInstance::ProgressRing(self)
	}

	fn from_instance(instance: ComponentInstance) -> Option<Self> {
		match instance {
			ComponentInstance::ProgressRing(ring) => Some(ring),
			_ => None,
		}
	}
}
