use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn card(priority: u8) -> Value {
	json!({
		"id": "deploy",
		"title": "Deploy finished",
		"content": "All services are healthy.",
		"priority": priority,
	})
}

#[test]
fn sticky_card_is_coerced_regardless_of_input() {
	let candidate = json!({
		"id": "alert",
		"title": "Disk full",
		"content": "x".repeat(500),
		"priority": 5,
		"dismissible": true,
		"autoHideAfterSeconds": 10,
	});
	let card = HudCard::sanitize(&candidate);
	assert_eq!(card.content.len(), CONTENT_MAX);
	assert!(!card.dismissible);
	assert_eq!(card.auto_hide_after_seconds, None);
	assert!(!card.can_dismiss());
	assert_eq!(card.auto_dismiss_after(), None);

	let result = HudCard::validate(&card.to_json());
	assert!(result.valid, "{:?}", result.errors);
}

#[test]
fn scenario_priority_five_with_oversized_content() {
	let card = HudCard::sanitize(&json!({"priority": 5, "content": "x".repeat(500)}));
	assert_eq!(card.content, "x".repeat(200));
	assert!(!card.dismissible);
	assert_eq!(card.auto_hide_after_seconds, None);
	assert_eq!(card.title, "Untitled");
	assert!(HudCard::validate(&card.to_json()).errors.is_empty());
}

#[test]
fn validator_reports_cross_field_violations() {
	let mut candidate = card(4);
	candidate["dismissible"] = json!(true);
	candidate["autoHideAfterSeconds"] = json!(5);
	let result = HudCard::validate(&candidate);
	let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
	assert_eq!(fields, vec!["dismissible", "autoHideAfterSeconds"]);
}

#[test]
fn sticky_cards_must_spell_out_dismissible_false() {
	let result = HudCard::validate(&card(5));
	assert!(!result.valid);
	let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
	assert_eq!(fields, vec!["dismissible"]);

	let mut explicit = card(5);
	explicit["dismissible"] = json!(false);
	assert!(HudCard::validate(&explicit).valid);
}

#[test]
fn corrector_accepts_sticky_cards_without_dismissible() {
	let result = crate::validate_and_correct::<HudCard>(&card(4));
	assert!(result.is_valid, "{:?}", result.errors);
	assert!(!result.sanitized.dismissible);
	assert_eq!(result.warnings[0].message, "corrected: must be false when priority is 4 or higher");
}

#[test]
fn out_of_range_priority_counts_at_its_clamped_value() {
	let mut candidate = card(9);
	candidate["dismissible"] = json!(true);
	let result = HudCard::validate(&candidate);
	assert!(result.has_error("priority"));
	assert!(result.has_error("dismissible"));
	assert_eq!(HudCard::sanitize(&candidate).priority, PRIORITY_MAX);
}

#[test]
fn non_numeric_priority_uses_default() {
	let mut candidate = card(1);
	candidate["priority"] = json!("urgent");
	assert!(HudCard::validate(&candidate).has_error("priority"));
	assert_eq!(HudCard::sanitize(&candidate).priority, DEFAULT_PRIORITY);
}

#[test]
fn actions_are_capped_and_repaired() {
	let mut candidate = card(2);
	candidate["actions"] = json!([
		"not an action",
		{"label": "Open the full deployment report", "action": "open-report", "style": "PRIMARY"},
		{"action": "retry"},
		{"label": "Ignore", "action": "ignore"},
	]);
	let result = HudCard::validate(&candidate);
	assert!(result.has_error("actions"));
	assert!(result.has_error("actions[0]"));
	assert!(result.has_error("actions[1].label"));
	assert!(result.has_error("actions[1].style"));
	assert!(result.has_error("actions[2].label"));

	let card = HudCard::sanitize(&candidate);
	assert_eq!(
		card.actions,
		vec![
			CardAction {
				label: "Open the full deploy".into(),
				action: "open-report".into(),
				style: ActionStyle::Primary,
			},
			CardAction {
				label: "Action".into(),
				action: "retry".into(),
				style: ActionStyle::Secondary,
			},
		]
	);
}

#[test]
fn non_dismissible_low_priority_card_warns() {
	let mut candidate = card(2);
	candidate["dismissible"] = json!(false);
	let result = HudCard::validate(&candidate);
	assert!(result.valid);
	assert_eq!(result.warnings.len(), 1);
	assert_eq!(result.warnings[0].field, "dismissible");
}

#[test]
fn auto_hide_is_clamped_for_ordinary_cards() {
	let mut candidate = card(2);
	candidate["autoHideAfterSeconds"] = json!(0.25);
	let card = HudCard::sanitize(&candidate);
	assert_eq!(card.auto_hide_after_seconds, Some(1.0));
	assert_eq!(card.auto_dismiss_after(), Some(Duration::from_secs(1)));
}

#[test]
fn normalize_enforces_invariants_on_hand_built_cards() {
	let card = HudCard {
		id: "   ".into(),
		title: "t".repeat(80),
		content: String::new(),
		variant: Variant::Error,
		icon: Some(Icon::Bell),
		priority: 0,
		position: Position::Center,
		dismissible: true,
		auto_hide_after_seconds: Some(-4.0),
		actions: Vec::new(),
	}
	.normalize();
	assert!(card.id.starts_with("hud-card-"));
	assert_eq!(card.title.len(), TITLE_MAX);
	assert_eq!(card.content, "No content");
	assert_eq!(card.priority, PRIORITY_MIN);
	assert_eq!(card.position, Position::Center);
	assert_eq!(card.auto_hide_after_seconds, Some(1.0));
}

#[test]
fn sanitize_is_idempotent_on_a_messy_card() {
	let candidate = json!({
		"title": "   Padded   ",
		"content": "é".repeat(300),
		"variant": "Warning",
		"icon": "nope",
		"priority": 3.6,
		"position": "middle_left",
		"actions": [{"label": "Go"}],
		"extra": true,
	});
	let once = HudCard::sanitize(&candidate);
	let twice = HudCard::sanitize(&once.to_json());
	assert_eq!(once, twice);
	assert_eq!(once.title, "Padded");
	assert_eq!(once.variant, Variant::Warning);
	assert_eq!(once.icon, None);
	assert_eq!(once.priority, 4);
	assert_eq!(once.position, Position::MiddleLeft);
}
