use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::Position;

/// Closed set of generated component families.
///
/// Every schema, registry, and generation call is selected by one of these
/// tags; families never share capacity or ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Family {
	/// Heads-up notification card with title, content and actions.
	HudCard,
	/// Small contextual label, optionally with a counter.
	ContextBadge,
	/// Circular progress meter.
	ProgressRing,
	/// Presence/health dot.
	StatusIndicator,
}

/// Rule deciding what happens when a full registry receives a new instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdmissionPolicy {
	/// Evict the lowest-priority entry only if the newcomer outranks it strictly.
	Priority,
	/// Always admit, evicting the oldest insertion.
	Fifo,
}

impl Family {
	/// All families in declaration order.
	pub const ALL: [Family; 4] = [Self::HudCard, Self::ContextBadge, Self::ProgressRing, Self::StatusIndicator];

	/// Kebab-case tag used on the wire.
	pub fn as_str(self) -> &'static str {
		self.into()
	}

	/// Human-readable name used in prompts and diagnostics.
	pub const fn display_name(self) -> &'static str {
		match self {
			Self::HudCard => "HUD card",
			Self::ContextBadge => "context badge",
			Self::ProgressRing => "progress ring",
			Self::StatusIndicator => "status indicator",
		}
	}

	/// Default number of simultaneously live instances.
	pub const fn default_max_concurrent(self) -> usize {
		match self {
			Self::HudCard => 5,
			Self::ContextBadge => 8,
			Self::ProgressRing => 6,
			Self::StatusIndicator => 10,
		}
	}

	pub const fn admission_policy(self) -> AdmissionPolicy {
		match self {
			Self::HudCard => AdmissionPolicy::Priority,
			Self::ContextBadge | Self::ProgressRing | Self::StatusIndicator => AdmissionPolicy::Fifo,
		}
	}

	pub const fn default_position(self) -> Position {
		match self {
			Self::HudCard | Self::ContextBadge => Position::TopRight,
			Self::ProgressRing => Position::BottomRight,
			Self::StatusIndicator => Position::BottomLeft,
		}
	}

	/// Whether [`Position::Center`] is a legal placement for this family.
	pub const fn allows_center(self) -> bool {
		matches!(self, Self::HudCard | Self::ProgressRing)
	}

	/// Returns true when `position` is legal for this family.
	pub fn accepts_position(self, position: Position) -> bool {
		position != Position::Center || self.allows_center()
	}
}
