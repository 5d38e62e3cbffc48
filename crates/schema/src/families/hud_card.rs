//! Heads-up notification cards.
//!
//! Cards are the only family with a priority. Priority 4 and 5 cards are
//! "sticky": they can never be dismissed by the user or by a timer.

use std::time::Duration;

use hudkit_primitives::text::fit;
use hudkit_primitives::{Family, Icon, Position, Variant, clamp_int};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::component::{Component, Schema, seconds};
use crate::instance::ComponentInstance;
use crate::sanitize::{Reader, clamp_seconds, fit_id};
use crate::validation::{Checker, JsonKind, ValidationResult};
use crate::{AUTO_DISMISS_MAX_SECS, AUTO_DISMISS_MIN_SECS};

pub const TITLE_MAX: usize = 60;
pub const CONTENT_MAX: usize = 200;
pub const ACTIONS_MAX: usize = 2;
pub const ACTION_LABEL_MAX: usize = 20;
pub const ACTION_ID_MAX: usize = 64;
pub const PRIORITY_MIN: u8 = 1;
pub const PRIORITY_MAX: u8 = 5;
pub const DEFAULT_PRIORITY: u8 = 3;
/// Cards at or above this priority are non-dismissible and never auto-hide.
pub const STICKY_PRIORITY: u8 = 4;

const UNTITLED: &str = "Untitled";
const NO_CONTENT: &str = "No content";
const ACTION_LABEL: &str = "Action";

/// Visual weight of a card action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ActionStyle {
	Primary,
	#[default]
	Secondary,
}

/// Button attached to a card. `action` is an opaque handler key for the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAction {
	pub label: String,
	pub action: String,
	pub style: ActionStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HudCard {
	pub id: String,
	pub title: String,
	pub content: String,
	pub variant: Variant,
	pub icon: Option<Icon>,
	pub priority: u8,
	pub position: Position,
	pub dismissible: bool,
	pub auto_hide_after_seconds: Option<f64>,
	pub actions: Vec<CardAction>,
}

impl HudCard {
	pub fn is_sticky(&self) -> bool {
		self.priority >= STICKY_PRIORITY
	}
}

impl CardAction {
	fn sanitize(obj: &Map<String, Value>, index: usize) -> Self {
		let read = Reader::nested(obj);
		Self {
			label: read.string("label", ACTION_LABEL_MAX).unwrap_or_else(|| ACTION_LABEL.to_owned()),
			action: read.string("action", ACTION_ID_MAX).unwrap_or_else(|| format!("action-{index}")),
			style: read.enumeration("style").unwrap_or_default(),
		}
	}

	fn normalize(self, index: usize) -> Self {
		Self {
			label: fit(&self.label, ACTION_LABEL_MAX).unwrap_or_else(|| ACTION_LABEL.to_owned()),
			action: fit(&self.action, ACTION_ID_MAX).unwrap_or_else(|| format!("action-{index}")),
			style: self.style,
		}
	}
}

impl Schema for HudCard {
	const FAMILY: Family = Family::HudCard;
	const FIELDS: &'static [&'static str] = &[
		"id",
		"title",
		"content",
		"variant",
		"icon",
		"priority",
		"position",
		"dismissible",
		"autoHideAfterSeconds",
		"actions",
	];
	const REQUIRED: &'static [(&'static str, JsonKind)] = &[
		("id", JsonKind::String),
		("title", JsonKind::String),
		("content", JsonKind::String),
	];
	const RULES: &'static [&'static str] = &[
		"id, title and content are required non-empty strings",
		"title is at most 60 characters; content is at most 200 characters",
		"priority is a whole number from 1 to 5 (default 3)",
		"variant is one of: info, success, warning, error, neutral",
		"position is one of the nine screen slots, including center",
		"autoHideAfterSeconds is null or a number from 1 to 300",
		"actions holds at most 2 items, each {label (at most 20 characters), action, style: primary|secondary}",
		"priority 4 or 5 requires dismissible: false and autoHideAfterSeconds: null",
	];

	fn validate(candidate: &Value) -> ValidationResult {
		let mut check = match Checker::new(candidate) {
			Ok(check) => check,
			Err(result) => return result,
		};
		check.component_tag(Self::FAMILY);
		check.unknown_fields(Self::FIELDS);
		check.id();
		check.string("title", TITLE_MAX, true);
		check.string("content", CONTENT_MAX, true);
		check.enumeration::<Variant>("variant", false);
		check.enumeration::<Icon>("icon", false);
		check.integer("priority", PRIORITY_MIN.into(), PRIORITY_MAX.into(), false);
		check.position(Self::FAMILY);
		check.boolean("dismissible");
		check.number("autoHideAfterSeconds", AUTO_DISMISS_MIN_SECS, AUTO_DISMISS_MAX_SECS, false);
		check.array("actions", ACTIONS_MAX, |action| {
			action.unknown_fields(&["label", "action", "style"]);
			action.string("label", ACTION_LABEL_MAX, true);
			action.string("action", ACTION_ID_MAX, true);
			action.enumeration::<ActionStyle>("style", false);
		});

		// Out-of-range priorities count at the value the sanitizer would clamp to.
		let priority = check
			.get("priority")
			.and_then(Value::as_f64)
			.map_or(DEFAULT_PRIORITY, |p| effective_priority(Some(p)));
		let dismissible = check.get("dismissible").and_then(Value::as_bool);
		let auto_hide = check.get("autoHideAfterSeconds");
		if priority >= STICKY_PRIORITY {
			if dismissible != Some(false) {
				check.error("dismissible", "must be false when priority is 4 or higher");
			}
			if auto_hide.is_some() {
				check.error("autoHideAfterSeconds", "must be null when priority is 4 or higher");
			}
		} else if dismissible == Some(false) && auto_hide.is_none() {
			check.warn("dismissible", "card is neither dismissible nor auto-hiding and can only be removed programmatically");
		}

		check.finish()
	}

	fn sanitize(candidate: &Value) -> Self {
		let read = Reader::new(candidate);
		Self {
			id: read.id(Self::FAMILY, candidate),
			title: read.string("title", TITLE_MAX).unwrap_or_else(|| UNTITLED.to_owned()),
			content: read.string("content", CONTENT_MAX).unwrap_or_else(|| NO_CONTENT.to_owned()),
			variant: read.enumeration("variant").unwrap_or_default(),
			icon: read.enumeration("icon"),
			priority: effective_priority(read.number("priority")),
			position: read.position(Self::FAMILY),
			dismissible: read.boolean("dismissible").unwrap_or(true),
			auto_hide_after_seconds: read.number("autoHideAfterSeconds"),
			actions: read
				.objects("actions")
				.into_iter()
				.take(ACTIONS_MAX)
				.enumerate()
				.map(|(index, obj)| CardAction::sanitize(obj, index))
				.collect(),
		}
		.normalize()
	}

	fn normalize(mut self) -> Self {
		let seed = || format!("{}\n{}", self.title, self.content);
		self.id = fit_id(&self.id, Self::FAMILY, seed);
		self.title = fit(&self.title, TITLE_MAX).unwrap_or_else(|| UNTITLED.to_owned());
		self.content = fit(&self.content, CONTENT_MAX).unwrap_or_else(|| NO_CONTENT.to_owned());
		self.priority = self.priority.clamp(PRIORITY_MIN, PRIORITY_MAX);
		if !Self::FAMILY.accepts_position(self.position) {
			self.position = Self::FAMILY.default_position();
		}
		self.auto_hide_after_seconds = clamp_seconds(self.auto_hide_after_seconds);
		self.actions.truncate(ACTIONS_MAX);
		self.actions = self
			.actions
			.into_iter()
			.enumerate()
			.map(|(index, action)| action.normalize(index))
			.collect();
		if self.is_sticky() {
			self.dismissible = false;
			self.auto_hide_after_seconds = None;
		}
		self
	}
}

impl Component for HudCard {
	fn id(&self) -> &str {
		&self.id
	}

	fn position(&self) -> Position {
		self.position
	}

	fn priority(&self) -> Option<u8> {
		Some(self.priority)
	}

	fn dismissible(&self) -> bool {
		self.dismissible
	}

	fn can_dismiss(&self) -> bool {
		self.dismissible && !self.is_sticky()
	}

	fn auto_dismiss_after(&self) -> Option<Duration> {
		seconds(self.auto_hide_after_seconds)
	}

	fn into_instance(self) -> ComponentInstance {
		ComponentInstance::HudCard(self)
	}

	fn from_instance(instance: ComponentInstance) -> Option<Self> {
		match instance {
			ComponentInstance::HudCard(card) => Some(card),
			_ => None,
		}
	}
}

fn effective_priority(raw: Option<f64>) -> u8 {
	raw.map_or(DEFAULT_PRIORITY, |p| {
		clamp_int(p, PRIORITY_MIN.into(), PRIORITY_MAX.into(), DEFAULT_PRIORITY.into()) as u8
	})
}

#[cfg(test)]
mod tests;
