//! Deadline queue for per-entry auto-expiry.
//!
//! Each scheduled expiry gets a [`TimerHandle`] carrying a unique generation.
//! Owners keep the handle and cancel it on every removal path; when a timer
//! fires, owners also compare the fired handle against the one they hold so
//! that a handle which outlived its entry can never act on a newer entry
//! with the same id.

use std::collections::BTreeMap;
use std::time::Instant;

/// Cancellation handle for one scheduled expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle {
	deadline: Instant,
	generation: u64,
}

impl TimerHandle {
	pub const fn deadline(&self) -> Instant {
		self.deadline
	}

	pub const fn generation(&self) -> u64 {
		self.generation
	}
}

/// Pending expiries ordered by deadline, then scheduling order.
#[derive(Debug, Default)]
pub struct ExpiryQueue {
	pending: BTreeMap<TimerHandle, String>,
	next_generation: u64,
}

impl ExpiryQueue {
	pub fn new() -> Self {
		Self::default()
	}

	/// Schedules `id` to expire at `deadline`.
	pub fn schedule(&mut self, id: &str, deadline: Instant) -> TimerHandle {
		self.next_generation = self.next_generation.wrapping_add(1);
		let handle = TimerHandle {
			deadline,
			generation: self.next_generation,
		};
		self.pending.insert(handle, id.to_owned());
		handle
	}

	/// Cancels a pending expiry. Returns false if it already fired or was cancelled.
	pub fn cancel(&mut self, handle: TimerHandle) -> bool {
		self.pending.remove(&handle).is_some()
	}

	/// Earliest pending deadline.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.pending.keys().next().map(TimerHandle::deadline)
	}

	/// Removes and returns every expiry due at or before `now`, earliest first.
	pub fn pop_due(&mut self, now: Instant) -> Vec<(TimerHandle, String)> {
		let mut due = Vec::new();
		while let Some(entry) = self.pending.first_entry() {
			if entry.key().deadline > now {
				break;
			}
			let handle = *entry.key();
			due.push((handle, entry.remove()));
		}
		due
	}

	pub fn len(&self) -> usize {
		self.pending.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}

	/// Cancels everything.
	pub fn clear(&mut self) {
		self.pending.clear();
	}
}
