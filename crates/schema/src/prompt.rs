//! Prompt text exchanged with the generator.
//!
//! All text here is deterministic for a given input so that a correction
//! prompt can be forwarded to the next generation call unmodified and
//! compared in tests.

use hudkit_primitives::Family;
use serde_json::Value;

use crate::validation::ValidationError;

const RESPOND_WITH_JSON: &str = "Respond with only the corrected JSON object.";

fn rule_lines(rules: &[&str]) -> impl Iterator<Item = String> {
	rules.iter().map(|rule| format!("- {rule}"))
}

/// Instruction sent with every generation request for `family`.
pub fn system_prompt(family: Family, rules: &[&str]) -> String {
	let mut lines = vec![
		format!("You generate a single {} for a heads-up display as one JSON object.", family.display_name()),
		format!("Set \"component\" to \"{}\".", family.as_str()),
		String::new(),
		"Rules:".to_owned(),
	];
	lines.extend(rule_lines(rules));
	lines.push(String::new());
	lines.push("Respond with only the JSON object, without commentary.".to_owned());
	lines.join("\n")
}

/// Re-generation instruction for a candidate that failed validation.
///
/// Layout: header, the invalid JSON, one bullet per error, the family rules
/// reminder, and a closing instruction.
pub fn correction_prompt(family: Family, candidate: &Value, errors: &[ValidationError], rules: &[&str]) -> String {
	let json = serde_json::to_string_pretty(candidate).unwrap_or_else(|_| candidate.to_string());
	let mut lines = vec![
		format!("The previous {} JSON was invalid.", family.display_name()),
		String::new(),
		"Invalid JSON:".to_owned(),
		json,
		String::new(),
		"Errors:".to_owned(),
	];
	lines.extend(errors.iter().map(|error| format!("- {}: {}", error.field, error.message)));
	lines.push(String::new());
	lines.push("Rules:".to_owned());
	lines.extend(rule_lines(rules));
	lines.push(String::new());
	lines.push(RESPOND_WITH_JSON.to_owned());
	lines.join("\n")
}

/// Re-generation instruction for a response that held no JSON object at all.
pub fn parse_failure_prompt(family: Family, rules: &[&str]) -> String {
	let mut lines = vec![
		format!("The previous response did not contain a {} JSON object.", family.display_name()),
		String::new(),
		"Rules:".to_owned(),
	];
	lines.extend(rule_lines(rules));
	lines.push(String::new());
	lines.push(RESPOND_WITH_JSON.to_owned());
	lines.join("\n")
}
