//! Turns free-form generator output into sanitized component instances.
//!
//! The caller supplies a [`Generator`]; [`generate_component`] drives it
//! through a bounded number of attempts, feeding each correction prompt
//! back until an attempt validates or the budget runs out.

/// Locating a JSON object inside model output.
pub mod extract;
/// The external text generator seam.
pub mod generator;
/// The bounded retry loop.
pub mod retry;

pub use extract::extract_json;
pub use generator::{BoxError, Generator};
pub use retry::{Generated, GenerationError, GenerationOptions, generate_component, generate_for_family};
