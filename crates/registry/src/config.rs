use hudkit_primitives::Family;
use serde::{Deserialize, Serialize};

/// Per-family capacity limits.
///
/// Missing keys fall back to each family's default; zero is raised to one
/// when the registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct LimitsConfig {
	pub hud_card: usize,
	pub context_badge: usize,
	pub progress_ring: usize,
	pub status_indicator: usize,
}

impl Default for LimitsConfig {
	fn default() -> Self {
		Self {
			hud_card: Family::HudCard.default_max_concurrent(),
			context_badge: Family::ContextBadge.default_max_concurrent(),
			progress_ring: Family::ProgressRing.default_max_concurrent(),
			status_indicator: Family::StatusIndicator.default_max_concurrent(),
		}
	}
}

impl LimitsConfig {
	pub fn max_concurrent(&self, family: Family) -> usize {
		match family {
			Family::HudCard => self.hud_card,
			Family::ContextBadge => self.context_badge,
			Family::ProgressRing => self.progress_ring,
			Family::StatusIndicator => self.status_indicator,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_family_constants() {
		let limits = LimitsConfig::default();
		for family in Family::ALL {
			assert_eq!(limits.max_concurrent(family), family.default_max_concurrent());
		}
	}

	#[test]
	fn partial_tables_keep_other_defaults() {
		let limits: LimitsConfig = serde_json::from_value(serde_json::json!({"hud-card": 2})).unwrap();
		assert_eq!(limits.hud_card, 2);
		assert_eq!(limits.context_badge, 8);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let result = serde_json::from_value::<LimitsConfig>(serde_json::json!({"toast": 3}));
		assert!(result.is_err());
	}
}
