use serde::Serialize;
use serde_json::Value;

use crate::component::Schema;
use crate::prompt::correction_prompt;
use crate::validation::{ValidationError, ValidationWarning};

/// Outcome of one correction pass over a candidate.
///
/// `sanitized` is always present and renderable, whether or not the
/// candidate was accepted. `instance` is only set when it was.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionResult<I> {
	pub is_valid: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instance: Option<I>,
	pub errors: Vec<ValidationError>,
	pub warnings: Vec<ValidationWarning>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub correction_prompt: Option<String>,
	pub sanitized: I,
}

impl<I> CorrectionResult<I> {
	pub fn map<J>(self, f: impl Fn(I) -> J) -> CorrectionResult<J> {
		CorrectionResult {
			is_valid: self.is_valid,
			instance: self.instance.map(&f),
			errors: self.errors,
			warnings: self.warnings,
			correction_prompt: self.correction_prompt,
			sanitized: f(self.sanitized),
		}
	}
}

/// Sanitizes `candidate`, re-validates the result, and decides acceptance.
///
/// Structural problems in the candidate (not an object, or a required field
/// missing, blank, or mistyped) fail the attempt even though the sanitizer
/// papers over them, because the model has to supply that content itself.
/// Constraint violations the sanitizer repaired are reported as warnings.
/// Stateless: every call is independent.
pub fn validate_and_correct<S: Schema>(candidate: &Value) -> CorrectionResult<S> {
	let structural = S::structural_errors(candidate);
	let original = S::validate(candidate);
	let sanitized = S::sanitize(candidate);
	let recheck = S::validate(&sanitized.to_json());

	let mut warnings = Vec::new();
	for warning in original.warnings {
		push_unique(&mut warnings, warning);
	}
	for error in original.errors.into_iter().filter(|e| !structural.contains(e)) {
		push_unique(
			&mut warnings,
			ValidationWarning {
				field: error.field,
				message: format!("corrected: {}", error.message),
			},
		);
	}
	for warning in recheck.warnings {
		push_unique(&mut warnings, warning);
	}

	let mut errors = structural;
	errors.extend(recheck.errors);

	tracing::trace!(
		family = %S::FAMILY,
		errors = errors.len(),
		warnings = warnings.len(),
		"schema.correct"
	);

	if errors.is_empty() {
		return CorrectionResult {
			is_valid: true,
			instance: Some(sanitized.clone()),
			errors,
			warnings,
			correction_prompt: None,
			sanitized,
		};
	}

	let prompt = correction_prompt(S::FAMILY, candidate, &errors, S::RULES);
	CorrectionResult {
		is_valid: false,
		instance: None,
		errors,
		warnings,
		correction_prompt: Some(prompt),
		sanitized,
	}
}

fn push_unique(warnings: &mut Vec<ValidationWarning>, warning: ValidationWarning) {
	if !warnings.contains(&warning) {
		warnings.push(warning);
	}
}
