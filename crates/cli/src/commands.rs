use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use hudkit_generate::extract_json;
use hudkit_registry::{Admission, Stage, spawn_stage};
use hudkit_schema::{ComponentInstance, CorrectionResult, Family, FamilySchema, detect_family};
use serde_json::{Value, json};

use crate::cli::{CheckArgs, ReplayArgs, RulesArgs};
use crate::config::Config;

/// Exit status when the candidate did not validate.
const EXIT_INVALID: u8 = 1;
/// Exit status when the input held no JSON object.
const EXIT_NO_JSON: u8 = 2;
/// Exit status when no family was given and none could be detected.
const EXIT_USAGE: u8 = 64;

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
	match path {
		Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display())),
		None => {
			let mut text = String::new();
			std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
			Ok(text)
		}
	}
}

fn family_of(candidate: &Value, explicit: Option<Family>) -> Option<Family> {
	explicit.or_else(|| detect_family(candidate))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
	println!("{}", serde_json::to_string_pretty(value).context("serializing output")?);
	Ok(())
}

enum CheckOutcome {
	NoJson,
	UnknownFamily,
	Checked(CorrectionResult<ComponentInstance>),
}

impl CheckOutcome {
	fn status(&self) -> u8 {
		match self {
			Self::NoJson => EXIT_NO_JSON,
			Self::UnknownFamily => EXIT_USAGE,
			Self::Checked(result) if result.is_valid => 0,
			Self::Checked(_) => EXIT_INVALID,
		}
	}
}

fn check_text(text: &str, explicit: Option<Family>) -> CheckOutcome {
	let Some(candidate) = extract_json(text) else {
		return CheckOutcome::NoJson;
	};
	let Some(family) = family_of(&candidate, explicit) else {
		return CheckOutcome::UnknownFamily;
	};
	let result = family.correct(&candidate);
	tracing::info!(%family, valid = result.is_valid, errors = result.errors.len(), "cli.check");
	CheckOutcome::Checked(result)
}

pub fn check(args: &CheckArgs) -> anyhow::Result<ExitCode> {
	let text = read_input(args.file.as_deref())?;
	let outcome = check_text(&text, args.family);
	match &outcome {
		CheckOutcome::NoJson => eprintln!("no JSON object found in input"),
		CheckOutcome::UnknownFamily => eprintln!("candidate has no recognizable `component` field; pass --family"),
		CheckOutcome::Checked(result) => print_json(result)?,
	}
	Ok(ExitCode::from(outcome.status()))
}

pub fn rules(args: &RulesArgs) -> anyhow::Result<ExitCode> {
	println!("{}", args.family.system_prompt());
	Ok(ExitCode::SUCCESS)
}

pub fn show_config(config: &Config) -> anyhow::Result<ExitCode> {
	print!("{}", toml::to_string(config).context("serializing configuration")?);
	Ok(ExitCode::SUCCESS)
}

fn admission_json(admission: &Admission) -> Value {
	match admission {
		Admission::Admitted { evicted } => json!({"outcome": "admitted", "evicted": evicted}),
		Admission::Replaced => json!({"outcome": "replaced"}),
		Admission::Rejected => json!({"outcome": "rejected"}),
	}
}

/// Sanitizes each file's candidate, adds it to a fresh stage, and prints
/// the per-file admissions followed by the final snapshot.
pub async fn replay(args: &ReplayArgs, config: &Config) -> anyhow::Result<ExitCode> {
	let stage = spawn_stage(Stage::new(&config.limits));
	let mut admissions = Vec::with_capacity(args.files.len());

	for path in &args.files {
		let text = read_input(Some(path))?;
		let candidate = extract_json(&text).with_context(|| format!("no JSON object in {}", path.display()))?;
		let family = family_of(&candidate, args.family)
			.with_context(|| format!("{}: no recognizable `component` field; pass --family", path.display()))?;

		let instance = family.sanitize(&candidate);
		let id = instance.id().to_owned();
		let admission = stage.add(instance).await?;
		tracing::info!(file = %path.display(), %family, %id, ?admission, "cli.replay");

		let mut entry = admission_json(&admission);
		entry["file"] = json!(path.display().to_string());
		entry["family"] = json!(family);
		entry["id"] = json!(id);
		admissions.push(entry);
	}

	let snapshot = stage.snapshot().await?;
	stage.shutdown().await;
	print_json(&json!({"admissions": admissions, "snapshot": &*snapshot}))?;
	Ok(ExitCode::SUCCESS)
}
