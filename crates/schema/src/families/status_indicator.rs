//! Presence and health dots.

use std::time::Duration;

use hudkit_primitives::text::fit;
use hudkit_primitives::{Family, Position};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::component::{Component, Schema, seconds};
use crate::instance::ComponentInstance;
use crate::sanitize::{Reader, clamp_seconds, fit_id};
use crate::validation::{Checker, JsonKind, ValidationResult};
use crate::{AUTO_DISMISS_MAX_SECS, AUTO_DISMISS_MIN_SECS};

pub const LABEL_MAX: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IndicatorState {
	Online,
	Offline,
	Busy,
	Away,
	Error,
	#[default]
	Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IndicatorSize {
	Small,
	#[default]
	Medium,
	Large,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusIndicator {
	pub id: String,
	pub state: IndicatorState,
	pub label: Option<String>,
	pub pulse: bool,
	pub size: IndicatorSize,
	pub position: Position,
	pub dismissible: bool,
	pub auto_dismiss_after_seconds: Option<f64>,
}

impl Schema for StatusIndicator {
	const FAMILY: Family = Family::StatusIndicator;
	const FIELDS: &'static [&'static str] = &[
		"id",
		"state",
		"label",
		"pulse",
		"size",
		"position",
		"dismissible",
		"autoDismissAfterSeconds",
	];
	const REQUIRED: &'static [(&'static str, JsonKind)] = &[("id", JsonKind::String), ("state", JsonKind::String)];
	const RULES: &'static [&'static str] = &[
		"id and state are required strings",
		"state is one of: online, offline, busy, away, error, idle",
		"label is optional and at most 30 characters",
		"size is one of: small, medium, large",
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
		check.enumeration::<IndicatorState>("state", true);
		check.string("label", LABEL_MAX, false);
		check.boolean("pulse");
		check.enumeration::<IndicatorSize>("size", false);
		check.position(Self::FAMILY);
		check.boolean("dismissible");
		check.number("autoDismissAfterSeconds", AUTO_DISMISS_MIN_SECS, AUTO_DISMISS_MAX_SECS, false);

		let offline = check.get("state").and_then(Value::as_str) == Some("offline");
		if offline && check.get("pulse").and_then(Value::as_bool) == Some(true) {
			check.warn("pulse", "pulsing has no effect while offline");
		}

		check.finish()
	}

	fn sanitize(candidate: &Value) -> Self {
		let read = Reader::new(candidate);
		Self {
			id: read.id(Self::FAMILY, candidate),
			state: read.enumeration("state").unwrap_or_default(),
			label: read.string("label", LABEL_MAX),
			pulse: read.boolean("pulse").unwrap_or(false),
			size: read.enumeration("size").unwrap_or_default(),
			position: read.position(Self::FAMILY),
			dismissible: read.boolean("dismissible").unwrap_or(true),
			auto_dismiss_after_seconds: read.number("autoDismissAfterSeconds"),
		}
		.normalize()
	}

	fn normalize(mut self) -> Self {
		let seed = || format!("{:?}:{:?}", self.state, self.label);
		self.id = fit_id(&self.id, Self::FAMILY, seed);
		self.label = self.label.as_deref().and_then(|label| fit(label, LABEL_MAX));
		if !Self::FAMILY.accepts_position(self.position) {
			self.position = Self::FAMILY.default_position();
		}
		self.auto_dismiss_after_seconds = clamp_seconds(self.auto_dismiss_after_seconds);
		self
	}
}

impl Component for StatusIndicator {
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
		ComponentInstance::StatusIndicator(self)
	}

	fn from_instance(instance: ComponentInstance) -> Option<Self> {
		match instance {
			ComponentInstance::StatusIndicator(indicator) => Some(indicator),
			_ => None,
		}
	}
}
