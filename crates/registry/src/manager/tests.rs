use std::time::Duration;

use hudkit_schema::{ContextBadge, HudCard, ProgressRing, Schema, StatusIndicator};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

use super::*;

fn card(id: &str, priority: u8) -> HudCard {
	HudCard::sanitize(&json!({"id": id, "title": id, "content": "body", "priority": priority}))
}

fn timed_card(id: &str, seconds: f64) -> HudCard {
	HudCard::sanitize(&json!({"id": id, "title": id, "content": "body", "priority": 2, "autoHideAfterSeconds": seconds}))
}

fn badge(id: &str) -> ContextBadge {
	ContextBadge::sanitize(&json!({"id": id, "label": id}))
}

fn ids<C: Component>(manager: &Manager<C>) -> Vec<String> {
	manager.iter().map(|c| c.id().to_owned()).collect()
}

fn full_card_registry(priority: u8) -> (Manager<HudCard>, Instant) {
	let now = Instant::now();
	let mut manager = Manager::new();
	for i in 0..5 {
		assert_eq!(manager.add(card(&format!("c{i}"), priority), now), Admission::Admitted { evicted: None });
	}
	(manager, now)
}

#[test]
fn defaults_follow_family_constants() {
	assert_eq!(Manager::<HudCard>::new().max_concurrent(), 5);
	assert_eq!(Manager::<ContextBadge>::new().max_concurrent(), 8);
	assert_eq!(Manager::<ProgressRing>::new().max_concurrent(), 6);
	assert_eq!(Manager::<StatusIndicator>::new().max_concurrent(), 10);
	assert_eq!(Manager::<HudCard>::new().with_max_concurrent(0).max_concurrent(), 1);
}

#[test]
fn full_card_registry_rejects_lower_priority() {
	let (mut manager, now) = full_card_registry(3);
	let revision = manager.revision();

	assert_eq!(manager.add(card("low", 2), now), Admission::Rejected);
	assert_eq!(manager.len(), 5);
	assert!(!manager.contains("low"));
	assert_eq!(manager.revision(), revision);
}

#[test]
fn equal_priority_does_not_evict() {
	let (mut manager, now) = full_card_registry(3);
	assert_eq!(manager.add(card("tie", 3), now), Admission::Rejected);
	assert_eq!(ids(&manager), vec!["c0", "c1", "c2", "c3", "c4"]);
}

#[test]
fn higher_priority_evicts_earliest_lowest() {
	let (mut manager, now) = full_card_registry(2);

	let admission = manager.add(card("urgent", 4), now);
	assert_eq!(admission, Admission::Admitted { evicted: Some("c0".into()) });
	assert!(admission.is_admitted());
	assert_eq!(manager.len(), 5);
	assert_eq!(ids(&manager), vec!["c1", "c2", "c3", "c4", "urgent"]);
}

#[test]
fn eviction_targets_minimum_not_oldest() {
	let now = Instant::now();
	let mut manager = Manager::new();
	for (id, priority) in [("a", 3), ("b", 1), ("c", 2), ("d", 1), ("e", 5)] {
		let _ = manager.add(card(id, priority), now);
	}
	assert_eq!(manager.add(card("f", 2), now), Admission::Admitted { evicted: Some("b".into()) });
	assert_eq!(manager.add(card("g", 2), now), Admission::Admitted { evicted: Some("d".into()) });
	assert_eq!(manager.add(card("h", 2), now), Admission::Rejected);
}

#[test]
fn fifo_families_evict_oldest_unconditionally() {
	let now = Instant::now();
	let mut manager = Manager::<ContextBadge>::new();
	for i in 0..8 {
		let _ = manager.add(badge(&format!("b{i}")), now);
	}

	assert_eq!(manager.add(badge("b8"), now), Admission::Admitted { evicted: Some("b0".into()) });
	assert_eq!(manager.len(), 8);
	assert_eq!(manager.add(badge("b9"), now), Admission::Admitted { evicted: Some("b1".into()) });
	assert!(!manager.contains("b0"));
}

#[test]
fn replacing_an_id_keeps_slot_and_never_evicts() {
	let (mut manager, now) = full_card_registry(3);

	let replacement = HudCard::sanitize(&json!({"id": "c0", "title": "New", "content": "updated", "priority": 1}));
	assert_eq!(manager.add(replacement, now), Admission::Replaced);
	assert_eq!(manager.len(), 5);
	assert_eq!(ids(&manager), vec!["c0", "c1", "c2", "c3", "c4"]);
	assert_eq!(manager.get("c0").map(|c| c.title.as_str()), Some("New"));
}

#[test]
fn add_normalizes_hand_built_instances() {
	let now = Instant::now();
	let mut manager = Manager::new();
	let mut raw = card("sticky", 3);
	raw.priority = 9;
	raw.dismissible = true;
	raw.auto_hide_after_seconds = Some(30.0);

	let _ = manager.add(raw, now);
	let stored = manager.get("sticky").unwrap();
	assert_eq!(stored.priority, 5);
	assert!(!stored.dismissible);
	assert_eq!(stored.auto_hide_after_seconds, None);
	assert_eq!(manager.pending_timers(), 0);
}

#[test]
fn dismiss_respects_gate() {
	let now = Instant::now();
	let mut manager = Manager::new();
	let _ = manager.add(card("normal", 2), now);
	let _ = manager.add(card("sticky", 4), now);
	let fixed = HudCard::sanitize(&json!({"id": "fixed", "title": "t", "content": "c", "dismissible": false}));
	let _ = manager.add(fixed, now);
	let revision = manager.revision();

	assert!(!manager.dismiss("sticky"));
	assert!(!manager.dismiss("fixed"));
	assert_eq!(manager.revision(), revision);
	assert!(manager.dismiss("normal"));
	assert!(!manager.dismiss("normal"));
	assert_eq!(ids(&manager), vec!["sticky", "fixed"]);

	assert!(manager.remove("sticky"));
	assert!(!manager.remove("sticky"));
}

#[test]
fn timers_expire_through_dismiss() {
	let now = Instant::now();
	let mut manager = Manager::new();
	let _ = manager.add(timed_card("short", 2.0), now);
	let _ = manager.add(timed_card("long", 10.0), now);
	let _ = manager.add(card("untimed", 2), now);

	assert_eq!(manager.next_deadline(), Some(now + Duration::from_secs(2)));
	assert!(manager.advance(now + Duration::from_secs(1)).is_empty());
	assert_eq!(manager.advance(now + Duration::from_secs(2)), vec!["short"]);
	assert_eq!(manager.advance(now + Duration::from_secs(60)), vec!["long"]);
	assert_eq!(ids(&manager), vec!["untimed"]);
	assert_eq!(manager.next_deadline(), None);
}

#[test]
fn non_dismissible_entries_survive_their_timer() {
	let now = Instant::now();
	let mut manager = Manager::<ContextBadge>::new();
	let pinned = ContextBadge::sanitize(&json!({"id": "pin", "label": "Pinned", "dismissible": false, "autoDismissAfterSeconds": 1}));
	let _ = manager.add(pinned, now);
	assert_eq!(manager.pending_timers(), 1);

	assert!(manager.advance(now + Duration::from_secs(5)).is_empty());
	assert!(manager.contains("pin"));
	assert_eq!(manager.pending_timers(), 0);
}

#[test]
fn removal_paths_cancel_timers() {
	let now = Instant::now();
	let later = now + Duration::from_secs(100);
	let mut manager = Manager::new();

	let _ = manager.add(timed_card("removed", 5.0), now);
	assert!(manager.remove("removed"));
	assert_eq!(manager.pending_timers(), 0);

	let _ = manager.add(timed_card("dismissed", 5.0), now);
	assert!(manager.dismiss("dismissed"));
	assert_eq!(manager.pending_timers(), 0);

	let _ = manager.add(timed_card("cleared", 5.0), now);
	manager.clear_all();
	assert_eq!(manager.pending_timers(), 0);
	assert!(manager.is_empty());

	assert!(manager.advance(later).is_empty());
}

#[test]
fn stale_timer_never_touches_a_newer_entry() {
	let now = Instant::now();
	let mut manager = Manager::new();
	let _ = manager.add(timed_card("card", 5.0), now);
	assert!(manager.remove("card"));
	let _ = manager.add(timed_card("card", 50.0), now);

	assert!(manager.advance(now + Duration::from_secs(10)).is_empty());
	assert!(manager.contains("card"));
	assert_eq!(manager.advance(now + Duration::from_secs(50)), vec!["card"]);
}

#[test]
fn eviction_cancels_the_victims_timer() {
	let now = Instant::now();
	let mut manager = Manager::<ContextBadge>::new().with_max_concurrent(1);
	let timed = ContextBadge::sanitize(&json!({"id": "old", "label": "Old", "autoDismissAfterSeconds": 3}));
	let _ = manager.add(timed, now);
	let _ = manager.add(badge("new"), now);

	assert_eq!(manager.pending_timers(), 0);
	assert!(manager.advance(now + Duration::from_secs(3)).is_empty());
	assert_eq!(ids(&manager), vec!["new"]);
}

#[test]
fn replace_reschedules_the_timer() {
	let now = Instant::now();
	let mut manager = Manager::new();
	let _ = manager.add(timed_card("card", 5.0), now);
	let _ = manager.add(timed_card("card", 20.0), now);

	assert_eq!(manager.pending_timers(), 1);
	assert!(manager.advance(now + Duration::from_secs(5)).is_empty());
	assert_eq!(manager.advance(now + Duration::from_secs(20)), vec!["card"]);
}

#[test]
fn update_merges_and_resanitizes() {
	let now = Instant::now();
	let mut manager = Manager::<ProgressRing>::new();
	let ring = ProgressRing::sanitize(&json!({"id": "upload", "value": 10, "label": "Upload", "autoDismissAfterSeconds": 30}));
	let _ = manager.add(ring, now);
	let deadline = manager.next_deadline();

	assert!(manager.update("upload", &json!({"value": 250, "id": "hijack", "label": null})));
	let ring = manager.get("upload").unwrap();
	assert_eq!(ring.id, "upload");
	assert_eq!(ring.value, 100.0);
	assert_eq!(ring.label, None);
	assert_eq!(manager.next_deadline(), deadline);

	assert!(!manager.update("missing", &json!({"value": 1})));
	assert!(!manager.update("upload", &json!([1, 2])));
}

#[test]
fn raising_a_card_to_sticky_cancels_its_timer() {
	let now = Instant::now();
	let mut manager = Manager::new();
	let _ = manager.add(timed_card("deploy", 5.0), now);
	assert_eq!(manager.pending_timers(), 1);

	assert!(manager.update("deploy", &json!({"priority": 5})));
	let card = manager.get("deploy").unwrap();
	assert!(!card.dismissible);
	assert_eq!(card.auto_hide_after_seconds, None);
	assert_eq!(manager.pending_timers(), 0);
	assert_eq!(manager.next_deadline(), None);
	assert!(manager.advance(now + Duration::from_secs(60)).is_empty());
	assert!(manager.contains("deploy"));
}

#[test]
fn groups_order_by_position_then_priority() {
	let now = Instant::now();
	let mut manager = Manager::new();
	let bottom = HudCard::sanitize(&json!({"id": "bottom", "title": "t", "content": "c", "position": "bottom-left"}));
	let _ = manager.add(card("p2", 2), now);
	let _ = manager.add(bottom, now);
	let _ = manager.add(card("p5", 5), now);
	let _ = manager.add(card("p2b", 2), now);

	let groups = manager.groups();
	let layout: Vec<(Position, Vec<(usize, &str)>)> = groups
		.iter()
		.map(|group| {
			(
				group.position,
				group.items.iter().map(|item| (item.stack_index, item.instance.id.as_str())).collect(),
			)
		})
		.collect();
	assert_eq!(
		layout,
		vec![
			(Position::TopRight, vec![(0, "p5"), (1, "p2"), (2, "p2b")]),
			(Position::BottomLeft, vec![(0, "bottom")]),
		]
	);
}

#[test]
fn fifo_groups_keep_insertion_order() {
	let now = Instant::now();
	let mut manager = Manager::<StatusIndicator>::new();
	for id in ["z", "a", "m"] {
		let _ = manager.add(StatusIndicator::sanitize(&json!({"id": id, "state": "online"})), now);
	}
	let groups = manager.groups();
	assert_eq!(groups.len(), 1);
	assert_eq!(groups[0].position, Position::BottomLeft);
	let order: Vec<&str> = groups[0].items.iter().map(|item| item.instance.id.as_str()).collect();
	assert_eq!(order, vec!["z", "a", "m"]);
}

#[derive(Debug, Clone)]
enum Op {
	Add { id: u8, priority: u8, timed: bool },
	Remove(u8),
	Dismiss(u8),
	Advance(u8),
	Clear,
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		6 => (0u8..12, 1u8..=5, any::<bool>()).prop_map(|(id, priority, timed)| Op::Add { id, priority, timed }),
		2 => (0u8..12).prop_map(Op::Remove),
		2 => (0u8..12).prop_map(Op::Dismiss),
		2 => (0u8..30).prop_map(Op::Advance),
		1 => Just(Op::Clear),
	]
}

proptest! {
	#[test]
	fn prop_capacity_and_sticky_invariants_hold(max in 1usize..6, ops in prop::collection::vec(op(), 0..60)) {
		let start = Instant::now();
		let mut elapsed = 0u64;
		let mut manager = Manager::<HudCard>::new().with_max_concurrent(max);

		for op in ops {
			let now = start + Duration::from_secs(elapsed);
			match op {
				Op::Add { id, priority, timed } => {
					let auto_hide = timed.then_some(5.0);
					let candidate = json!({
						"id": format!("c{id}"),
						"title": "t",
						"content": "c",
						"priority": priority,
						"autoHideAfterSeconds": auto_hide,
					});
					let minimum = manager.iter().map(|c| c.priority).min();
					let full = manager.len() == manager.max_concurrent();
					let existing = manager.contains(&format!("c{id}"));
					let admission = manager.add(HudCard::sanitize(&candidate), now);
					if full && !existing {
						let admitted = minimum.is_some_and(|m| priority > m);
						prop_assert_eq!(admission.is_admitted(), admitted);
					}
				}
				Op::Remove(id) => {
					manager.remove(&format!("c{id}"));
				}
				Op::Dismiss(id) => {
					let id = format!("c{id}");
					let before = manager.get(&id).cloned();
					let removed = manager.dismiss(&id);
					if let Some(card) = before {
						prop_assert_eq!(removed, card.can_dismiss());
					}
				}
				Op::Advance(secs) => {
					elapsed += u64::from(secs);
					manager.advance(start + Duration::from_secs(elapsed));
				}
				Op::Clear => manager.clear_all(),
			}

			prop_assert!(manager.len() <= manager.max_concurrent());
			prop_assert!(manager.pending_timers() <= manager.len());
			for card in manager.iter() {
				if card.priority >= 4 {
					prop_assert!(!card.dismissible);
					prop_assert_eq!(card.auto_hide_after_seconds, None);
				}
			}
		}
	}
}
