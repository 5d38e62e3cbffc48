//! One registry per family behind a single mutation surface.
//!
//! [`Stage`] is the synchronous store; [`spawn_stage`] runs it on a tokio
//! task that owns expiry scheduling and publishes snapshots.

use std::time::Instant;

use hudkit_primitives::{Family, Position};
use hudkit_schema::{Component, ComponentInstance, ContextBadge, HudCard, ProgressRing, StatusIndicator};
use serde::Serialize;
use serde_json::Value;

use crate::config::LimitsConfig;
use crate::manager::{Admission, Manager};

mod actor;

pub use actor::{StageError, StageHandle, spawn_stage};

/// Mutation accepted by [`Stage::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum StageCommand {
	Add(ComponentInstance),
	Remove { family: Family, id: String },
	Update { family: Family, id: String, patch: Value },
	Dismiss { family: Family, id: String },
	/// Clears one family, or every family when `None`.
	Clear(Option<Family>),
}

/// Result of [`Stage::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
	Admission(Admission),
	/// Whether a remove, update, dismiss or clear changed anything.
	Applied(bool),
}

/// Live instance annotated with its stacking slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackedItem {
	pub family: Family,
	pub position: Position,
	pub stack_index: usize,
	pub instance: ComponentInstance,
}

/// Read-only view handed to renderers.
///
/// Items are ordered by family, then position group, then stack index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageSnapshot {
	pub revision: u64,
	pub items: Vec<StackedItem>,
}

impl StageSnapshot {
	pub fn family(&self, family: Family) -> impl Iterator<Item = &StackedItem> {
		self.items.iter().filter(move |item| item.family == family)
	}
}

/// Runs `$body` with `$manager` bound to the registry for `$family`.
macro_rules! with_manager {
	($stage:expr, $family:expr, $manager:ident => $body:expr) => {
		match $family {
			Family::HudCard => {
				let $manager = &mut $stage.hud_cards;
				$body
			}
			Family::ContextBadge => {
				let $manager = &mut $stage.context_badges;
				$body
			}
			Family::ProgressRing => {
				let $manager = &mut $stage.progress_rings;
				$body
			}
			Family::StatusIndicator => {
				let $manager = &mut $stage.status_indicators;
				$body
			}
		}
	};
}

/// The four family registries.
#[derive(Debug, Default)]
pub struct Stage {
	hud_cards: Manager<HudCard>,
	context_badges: Manager<ContextBadge>,
	progress_rings: Manager<ProgressRing>,
	status_indicators: Manager<StatusIndicator>,
}

impl Stage {
	pub fn new(limits: &LimitsConfig) -> Self {
		Self {
			hud_cards: Manager::new().with_max_concurrent(limits.hud_card),
			context_badges: Manager::new().with_max_concurrent(limits.context_badge),
			progress_rings: Manager::new().with_max_concurrent(limits.progress_ring),
			status_indicators: Manager::new().with_max_concurrent(limits.status_indicator),
		}
	}

	pub fn add(&mut self, instance: ComponentInstance, now: Instant) -> Admission {
		match instance {
			ComponentInstance::HudCard(card) => self.hud_cards.add(card, now),
			ComponentInstance::ContextBadge(badge) => self.context_badges.add(badge, now),
			ComponentInstance::ProgressRing(ring) => self.progress_rings.add(ring, now),
			ComponentInstance::StatusIndicator(indicator) => self.status_indicators.add(indicator, now),
		}
	}

	pub fn remove(&mut self, family: Family, id: &str) -> bool {
		with_manager!(self, family, manager => manager.remove(id))
	}

	pub fn update(&mut self, family: Family, id: &str, patch: &Value) -> bool {
		with_manager!(self, family, manager => manager.update(id, patch))
	}

	pub fn dismiss(&mut self, family: Family, id: &str) -> bool {
		with_manager!(self, family, manager => manager.dismiss(id))
	}

	/// Clears one family, or all of them. Returns whether anything was removed.
	pub fn clear(&mut self, family: Option<Family>) -> bool {
		let families = match family {
			Some(family) => vec![family],
			None => Family::ALL.to_vec(),
		};
		let mut changed = false;
		for family in families {
			changed |= with_manager!(self, family, manager => {
				let had_entries = !manager.is_empty();
				manager.clear_all();
				had_entries
			});
		}
		changed
	}

	pub fn apply(&mut self, command: StageCommand, now: Instant) -> StageOutcome {
		match command {
			StageCommand::Add(instance) => StageOutcome::Admission(self.add(instance, now)),
			StageCommand::Remove { family, id } => StageOutcome::Applied(self.remove(family, &id)),
			StageCommand::Update { family, id, patch } => StageOutcome::Applied(self.update(family, &id, &patch)),
			StageCommand::Dismiss { family, id } => StageOutcome::Applied(self.dismiss(family, &id)),
			StageCommand::Clear(family) => StageOutcome::Applied(self.clear(family)),
		}
	}

	/// Fires due timers in every family.
	pub fn advance(&mut self, now: Instant) -> Vec<(Family, String)> {
		let mut expired = Vec::new();
		for family in Family::ALL {
			let ids = with_manager!(self, family, manager => manager.advance(now));
			expired.extend(ids.into_iter().map(|id| (family, id)));
		}
		expired
	}

	pub fn next_deadline(&self) -> Option<Instant> {
		[
			self.hud_cards.next_deadline(),
			self.context_badges.next_deadline(),
			self.progress_rings.next_deadline(),
			self.status_indicators.next_deadline(),
		]
		.into_iter()
		.flatten()
		.min()
	}

	/// Sum of the family revisions; changes on every mutation.
	pub fn revision(&self) -> u64 {
		self.hud_cards.revision()
			+ self.context_badges.revision()
			+ self.progress_rings.revision()
			+ self.status_indicators.revision()
	}

	pub fn len(&self) -> usize {
		self.hud_cards.len() + self.context_badges.len() + self.progress_rings.len() + self.status_indicators.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn hud_cards(&self) -> &Manager<HudCard> {
		&self.hud_cards
	}

	pub fn context_badges(&self) -> &Manager<ContextBadge> {
		&self.context_badges
	}

	pub fn progress_rings(&self) -> &Manager<ProgressRing> {
		&self.progress_rings
	}

	pub fn status_indicators(&self) -> &Manager<StatusIndicator> {
		&self.status_indicators
	}

	pub fn snapshot(&self) -> StageSnapshot {
		let mut items = Vec::with_capacity(self.len());
		stack_items(&self.hud_cards, &mut items);
		stack_items(&self.context_badges, &mut items);
		stack_items(&self.progress_rings, &mut items);
		stack_items(&self.status_indicators, &mut items);
		StageSnapshot {
			revision: self.revision(),
			items,
		}
	}
}

fn stack_items<C: Component>(manager: &Manager<C>, out: &mut Vec<StackedItem>) {
	for group in manager.groups() {
		out.extend(group.items.into_iter().map(|item| StackedItem {
			family: C::FAMILY,
			position: group.position,
			stack_index: item.stack_index,
			instance: item.instance.clone().into_instance(),
		}));
	}
}
