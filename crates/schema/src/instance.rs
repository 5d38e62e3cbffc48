use std::str::FromStr;

use hudkit_primitives::{Family, Position};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{Component, Schema};
use crate::correct::{CorrectionResult, validate_and_correct};
use crate::families::{ContextBadge, HudCard, ProgressRing, StatusIndicator};
use crate::prompt;
use crate::validation::{COMPONENT_KEY, ValidationResult};

/// A sanitized instance of any family, tagged by `component` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "kebab-case")]
pub enum ComponentInstance {
	HudCard(HudCard),
	ContextBadge(ContextBadge),
	ProgressRing(ProgressRing),
	StatusIndicator(StatusIndicator),
}

impl ComponentInstance {
	pub fn family(&self) -> Family {
		match self {
			Self::HudCard(_) => Family::HudCard,
			Self::ContextBadge(_) => Family::ContextBadge,
			Self::ProgressRing(_) => Family::ProgressRing,
			Self::StatusIndicator(_) => Family::StatusIndicator,
		}
	}

	pub fn id(&self) -> &str {
		match self {
			Self::HudCard(c) => c.id(),
			Self::ContextBadge(c) => c.id(),
			Self::ProgressRing(c) => c.id(),
			Self::StatusIndicator(c) => c.id(),
		}
	}

	pub fn position(&self) -> Position {
		match self {
			Self::HudCard(c) => c.position(),
			Self::ContextBadge(c) => c.position(),
			Self::ProgressRing(c) => c.position(),
			Self::StatusIndicator(c) => c.position(),
		}
	}
}

/// Reads the `component` tag of a candidate, accepting loose spellings.
pub fn detect_family(candidate: &Value) -> Option<Family> {
	let tag = candidate.get(COMPONENT_KEY)?.as_str()?;
	Family::from_str(tag).ok().or_else(|| crate::sanitize::parse_loose(tag))
}

/// Runs a statement with `$schema` bound to the instance type of `$family`.
macro_rules! with_schema {
	($family:expr, $schema:ident => $body:expr) => {
		match $family {
			Family::HudCard => {
				type $schema = HudCard;
				$body
			}
			Family::ContextBadge => {
				type $schema = ContextBadge;
				$body
			}
			Family::ProgressRing => {
				type $schema = ProgressRing;
				$body
			}
			Family::StatusIndicator => {
				type $schema = StatusIndicator;
				$body
			}
		}
	};
}

/// Runtime-selected schema operations, for callers that only hold a tag.
pub trait FamilySchema {
	fn validate(self, candidate: &Value) -> ValidationResult;
	fn sanitize(self, candidate: &Value) -> ComponentInstance;
	fn correct(self, candidate: &Value) -> CorrectionResult<ComponentInstance>;
	fn rules(self) -> &'static [&'static str];
	fn system_prompt(self) -> String;
	fn parse_failure_prompt(self) -> String;
}

impl FamilySchema for Family {
	fn validate(self, candidate: &Value) -> ValidationResult {
		with_schema!(self, S => S::validate(candidate))
	}

	fn sanitize(self, candidate: &Value) -> ComponentInstance {
		with_schema!(self, S => S::sanitize(candidate).into_instance())
	}

	fn correct(self, candidate: &Value) -> CorrectionResult<ComponentInstance> {
		with_schema!(self, S => validate_and_correct::<S>(candidate).map(S::into_instance))
	}

	fn rules(self) -> &'static [&'static str] {
		with_schema!(self, S => S::RULES)
	}

	fn system_prompt(self) -> String {
		prompt::system_prompt(self, self.rules())
	}

	fn parse_failure_prompt(self) -> String {
		prompt::parse_failure_prompt(self, self.rules())
	}
}
