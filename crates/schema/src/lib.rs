//! Schema layer for generated UI components.
//!
//! Every family gets the same three-step treatment:
//!
//! - **validate**: a pure check of untrusted JSON producing field-level errors
//!   and warnings;
//! - **sanitize**: a total repair that always yields a renderable instance;
//! - **correct**: sanitize, re-validate, and when something is still wrong
//!   build a correction prompt for the next generation attempt.
//!
//! Families are selected statically through the [`Schema`] trait or at
//! runtime through [`FamilySchema`] on [`Family`].

/// Registry-facing traits implemented by every instance type.
pub mod component;
/// The validate/sanitize/re-validate orchestration.
pub mod correct;
/// Per-family instance types and rules.
pub mod families;
/// Tagged union over all families and runtime dispatch.
pub mod instance;
/// Prompt text handed back to the generator.
pub mod prompt;
/// Lenient readers and placeholder ids.
pub mod sanitize;
/// Result types and the field checker.
pub mod validation;

pub use component::{Component, Schema};
pub use correct::{CorrectionResult, validate_and_correct};
pub use families::{ContextBadge, HudCard, ProgressRing, StatusIndicator};
pub use hudkit_primitives::{Family, Icon, Position, Variant};
pub use instance::{ComponentInstance, FamilySchema, detect_family};
pub use validation::{ValidationError, ValidationResult, ValidationWarning};

/// Grapheme ceiling for every family's `id`.
pub const ID_MAX: usize = 64;
/// Shortest accepted auto-dismiss delay, in seconds.
pub const AUTO_DISMISS_MIN_SECS: f64 = 1.0;
/// Longest accepted auto-dismiss delay, in seconds.
pub const AUTO_DISMISS_MAX_SECS: f64 = 300.0;
