use hudkit_primitives::Family;
use hudkit_schema::prompt::{parse_failure_prompt, system_prompt};
use hudkit_schema::{
	Component, ComponentInstance, ContextBadge, CorrectionResult, HudCard, ProgressRing, Schema, StatusIndicator,
	ValidationError, ValidationWarning, validate_and_correct,
};
use serde::{Deserialize, Serialize};

use crate::extract::extract_json;
use crate::generator::{BoxError, Generator};

pub const DEFAULT_MAX_RETRIES: usize = 2;

/// Retry budget for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GenerationOptions {
	/// Extra attempts after the first.
	pub max_retries: usize,
}

impl Default for GenerationOptions {
	fn default() -> Self {
		Self {
			max_retries: DEFAULT_MAX_RETRIES,
		}
	}
}

impl GenerationOptions {
	/// Total number of generator calls allowed.
	pub fn attempts(&self) -> usize {
		self.max_retries.saturating_add(1)
	}
}

/// A generated instance and how it was obtained.
///
/// `verified` is false when every attempt failed validation and `instance`
/// is the sanitized fallback of the last one. `errors` then holds that
/// attempt's remaining errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generated<I> {
	pub instance: I,
	pub verified: bool,
	pub attempts: usize,
	pub errors: Vec<ValidationError>,
	pub warnings: Vec<ValidationWarning>,
}

impl<I> Generated<I> {
	pub fn map<J>(self, f: impl FnOnce(I) -> J) -> Generated<J> {
		Generated {
			instance: f(self.instance),
			verified: self.verified,
			attempts: self.attempts,
			errors: self.errors,
			warnings: self.warnings,
		}
	}

	fn from_correction(result: CorrectionResult<I>, verified: bool, attempts: usize) -> Self {
		Self {
			instance: result.sanitized,
			verified,
			attempts,
			errors: result.errors,
			warnings: result.warnings,
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
	/// No attempt yielded JSON and the last one failed in transport.
	#[error("generator failed after {attempts} attempt(s)")]
	Generator {
		attempts: usize,
		#[source]
		source: BoxError,
	},
	/// Every response lacked a JSON object.
	#[error("no JSON object in generator output after {attempts} attempt(s)")]
	NoJson { attempts: usize },
}

/// Generates one instance of `C` for `intent`.
///
/// The first call sends the intent. After an invalid candidate the next
/// call sends its correction prompt; after a response without JSON, the
/// parse-failure prompt; after a transport error, the same prompt again.
/// Stops at the first valid candidate.
pub async fn generate_component<C, G>(
	generator: &G,
	intent: &str,
	options: GenerationOptions,
) -> Result<Generated<C>, GenerationError>
where
	C: Schema,
	G: Generator + ?Sized,
{
	let system = system_prompt(C::FAMILY, C::RULES);
	let attempts = options.attempts();
	let mut prompt = intent.to_owned();
	let mut last_result: Option<CorrectionResult<C>> = None;
	let mut last_error: Option<BoxError> = None;

	for attempt in 1..=attempts {
		tracing::debug!(family = %C::FAMILY, attempt, attempts, "generate.attempt");
		let text = match generator.generate(&system, &prompt).await {
			Ok(text) => text,
			Err(error) => {
				tracing::debug!(family = %C::FAMILY, attempt, %error, "generate.transport_error");
				last_error = Some(error);
				continue;
			}
		};

		let Some(candidate) = extract_json(&text) else {
			tracing::debug!(family = %C::FAMILY, attempt, "generate.no_json");
			prompt = parse_failure_prompt(C::FAMILY, C::RULES);
			continue;
		};

		let result = validate_and_correct::<C>(&candidate);
		if result.is_valid {
			tracing::debug!(family = %C::FAMILY, attempt, "generate.verified");
			return Ok(Generated::from_correction(result, true, attempt));
		}
		tracing::debug!(family = %C::FAMILY, attempt, errors = result.errors.len(), "generate.invalid");
		if let Some(correction) = &result.correction_prompt {
			prompt.clone_from(correction);
		}
		last_result = Some(result);
	}

	match (last_result, last_error) {
		(Some(result), _) => {
			tracing::warn!(family = %C::FAMILY, attempts, errors = result.errors.len(), "generate.unverified");
			Ok(Generated::from_correction(result, false, attempts))
		}
		(None, Some(source)) => {
			tracing::warn!(family = %C::FAMILY, attempts, error = %source, "generate.failed");
			Err(GenerationError::Generator { attempts, source })
		}
		(None, None) => {
			tracing::warn!(family = %C::FAMILY, attempts, "generate.no_json_exhausted");
			Err(GenerationError::NoJson { attempts })
		}
	}
}

/// [`generate_component`] for a family chosen at runtime.
pub async fn generate_for_family<G>(
	generator: &G,
	family: Family,
	intent: &str,
	options: GenerationOptions,
) -> Result<Generated<ComponentInstance>, GenerationError>
where
	G: Generator + ?Sized,
{
	let generated = match family {
		Family::HudCard => generate_component::<HudCard, G>(generator, intent, options).await?.map(HudCard::into_instance),
		Family::ContextBadge => generate_component::<ContextBadge, G>(generator, intent, options)
			.await?
			.map(ContextBadge::into_instance),
		Family::ProgressRing => generate_component::<ProgressRing, G>(generator, intent, options)
			.await?
			.map(ProgressRing::into_instance),
		Family::StatusIndicator => generate_component::<StatusIndicator, G>(generator, intent, options)
			.await?
			.map(StatusIndicator::into_instance),
	};
	Ok(generated)
}
