//! Live component registries.
//!
//! A [`Manager`] holds the sanitized instances of one family under a
//! capacity limit, applies the family's admission policy, owns each entry's
//! expiry timer, and groups entries for stacked display. A [`Stage`] bundles
//! one manager per family; [`spawn_stage`] runs it as a tokio task.

/// Per-family capacity configuration.
pub mod config;
/// Single-family registry.
pub mod manager;
/// All families together, sync and async.
pub mod stage;
/// Expiry queue with cancellable handles.
pub mod timer;

pub use config::LimitsConfig;
pub use manager::{Admission, Manager, StackGroup, Stacked};
pub use stage::{Stage, StageCommand, StageError, StageHandle, StageOutcome, StageSnapshot, StackedItem, spawn_stage};
pub use timer::{ExpiryQueue, TimerHandle};
