//! Capacity-bounded registry for one component family.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::time::Instant;

use hudkit_primitives::{AdmissionPolicy, Position};
use hudkit_schema::Component;
use indexmap::IndexMap;
use serde_json::Value;

use crate::timer::{ExpiryQueue, TimerHandle};

/// Outcome of [`Manager::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Admission {
	/// Inserted as a new entry, possibly evicting the named entry to make room.
	Admitted { evicted: Option<String> },
	/// An entry with the same id existed and was replaced in place.
	Replaced,
	/// The registry was full and nothing could be evicted for this instance.
	Rejected,
}

impl Admission {
	pub fn is_admitted(&self) -> bool {
		!matches!(self, Self::Rejected)
	}
}

#[derive(Debug)]
struct Entry<C> {
	instance: C,
	seq: u64,
	timer: Option<TimerHandle>,
}

/// One stacked entry within a [`StackGroup`].
#[derive(Debug, Clone, PartialEq)]
pub struct Stacked<'a, C> {
	pub stack_index: usize,
	pub instance: &'a C,
}

/// Entries sharing a screen position, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct StackGroup<'a, C> {
	pub position: Position,
	pub items: Vec<Stacked<'a, C>>,
}

/// Keyed store of live instances of one family.
///
/// Holds at most `max_concurrent` entries. Admission at capacity follows the
/// family's [`AdmissionPolicy`]. Every entry carries an insertion sequence
/// number used for eviction tie-breaks and stacking order, and at most one
/// pending expiry timer.
#[derive(Debug)]
pub struct Manager<C: Component> {
	entries: IndexMap<String, Entry<C>>,
	timers: ExpiryQueue,
	max_concurrent: usize,
	next_seq: u64,
	revision: u64,
}

impl<C: Component> Default for Manager<C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C: Component> Manager<C> {
	/// Creates an empty registry with the family's default capacity.
	pub fn new() -> Self {
		Self {
			entries: IndexMap::new(),
			timers: ExpiryQueue::new(),
			max_concurrent: C::FAMILY.default_max_concurrent(),
			next_seq: 0,
			revision: 0,
		}
	}

	/// Sets the capacity. Values below 1 are raised to 1.
	#[must_use]
	pub fn with_max_concurrent(mut self, max: usize) -> Self {
		self.max_concurrent = max.max(1);
		self
	}

	/// Admits an instance, normalizing it first.
	pub fn add(&mut self, instance: C, now: Instant) -> Admission {
		let instance = instance.normalize();
		let id = instance.id().to_owned();

		if let Some(entry) = self.entries.get_mut(&id) {
			if let Some(handle) = entry.timer.take() {
				self.timers.cancel(handle);
			}
			entry.timer = instance.auto_dismiss_after().map(|delay| self.timers.schedule(&id, now + delay));
			entry.instance = instance;
			self.revision += 1;
			tracing::trace!(family = %C::FAMILY, id = %id, "registry.replace");
			return Admission::Replaced;
		}

		let mut evicted = None;
		if self.entries.len() >= self.max_concurrent {
			let victim = match C::FAMILY.admission_policy() {
				AdmissionPolicy::Priority => {
					let incoming = instance.priority().unwrap_or(0);
					match self.lowest_priority() {
						Some((victim, lowest)) if incoming > lowest => Some(victim),
						lowest => {
							tracing::debug!(
								family = %C::FAMILY,
								id = %id,
								incoming,
								lowest = lowest.map(|(_, p)| p),
								"registry.reject"
							);
							return Admission::Rejected;
						}
					}
				}
				AdmissionPolicy::Fifo => self.oldest(),
			};
			if let Some(victim) = victim {
				self.detach(&victim);
				tracing::debug!(family = %C::FAMILY, id = %victim, incoming = %id, "registry.evict");
				evicted = Some(victim);
			}
		}

		let seq = self.next_seq;
		self.next_seq += 1;
		let timer = instance.auto_dismiss_after().map(|delay| self.timers.schedule(&id, now + delay));
		tracing::trace!(family = %C::FAMILY, id = %id, seq, timed = timer.is_some(), "registry.admit");
		self.entries.insert(id, Entry { instance, seq, timer });
		self.revision += 1;
		Admission::Admitted { evicted }
	}

	/// Removes an entry unconditionally. Returns false for unknown ids.
	pub fn remove(&mut self, id: &str) -> bool {
		let removed = self.detach(id).is_some();
		if removed {
			self.revision += 1;
			tracing::trace!(family = %C::FAMILY, id, "registry.remove");
		}
		removed
	}

	/// Merges a JSON object patch into an entry and re-sanitizes it.
	///
	/// The id cannot change and the entry keeps its slot and sequence number.
	/// The pending timer is kept unless the updated instance no longer
	/// auto-dismisses. Returns false for unknown ids and non-object patches.
	pub fn update(&mut self, id: &str, patch: &Value) -> bool {
		let Some(entry) = self.entries.get_mut(id) else {
			return false;
		};
		let Value::Object(patch) = patch else {
			tracing::debug!(family = %C::FAMILY, id, "registry.update_not_object");
			return false;
		};
		let mut merged = entry.instance.to_json();
		let Value::Object(fields) = &mut merged else {
			return false;
		};
		for (key, value) in patch {
			if key != "id" {
				fields.insert(key.clone(), value.clone());
			}
		}
		entry.instance = C::sanitize(&merged);
		if entry.instance.auto_dismiss_after().is_none()
			&& let Some(handle) = entry.timer.take()
		{
			self.timers.cancel(handle);
		}
		self.revision += 1;
		tracing::trace!(family = %C::FAMILY, id, "registry.update");
		true
	}

	/// Removes an entry if it may be dismissed. Otherwise nothing changes.
	pub fn dismiss(&mut self, id: &str) -> bool {
		match self.entries.get(id) {
			Some(entry) if entry.instance.can_dismiss() => self.remove(id),
			Some(_) => {
				tracing::trace!(family = %C::FAMILY, id, "registry.dismiss_refused");
				false
			}
			None => false,
		}
	}

	/// Removes every entry and cancels every timer.
	pub fn clear_all(&mut self) {
		if self.entries.is_empty() {
			return;
		}
		self.entries.clear();
		self.timers.clear();
		self.revision += 1;
		tracing::trace!(family = %C::FAMILY, "registry.clear");
	}

	/// Fires every timer due at `now` through the dismiss gate.
	///
	/// Returns the ids actually removed.
	pub fn advance(&mut self, now: Instant) -> Vec<String> {
		let mut expired = Vec::new();
		for (handle, id) in self.timers.pop_due(now) {
			let Some(entry) = self.entries.get_mut(&id).filter(|entry| entry.timer == Some(handle)) else {
				tracing::trace!(family = %C::FAMILY, id = %id, "registry.expire_stale");
				continue;
			};
			entry.timer = None;
			if self.dismiss(&id) {
				tracing::trace!(family = %C::FAMILY, id = %id, "registry.expire");
				expired.push(id);
			}
		}
		expired
	}

	/// Earliest pending expiry.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.timers.next_deadline()
	}

	/// Number of pending expiry timers.
	pub fn pending_timers(&self) -> usize {
		self.timers.len()
	}

	pub fn get(&self, id: &str) -> Option<&C> {
		self.entries.get(id).map(|entry| &entry.instance)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.entries.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn max_concurrent(&self) -> usize {
		self.max_concurrent
	}

	/// Live instances in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &C> {
		self.entries.values().map(|entry| &entry.instance)
	}

	/// Monotonic counter bumped by every mutation.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Entries partitioned by position and ordered for stacking.
	///
	/// Groups follow [`Position`] declaration order. Within a group, priority
	/// families sort by descending priority and then insertion order; other
	/// families by insertion order alone.
	pub fn groups(&self) -> Vec<StackGroup<'_, C>> {
		let mut by_position: BTreeMap<Position, Vec<&Entry<C>>> = BTreeMap::new();
		for entry in self.entries.values() {
			by_position.entry(entry.instance.position()).or_default().push(entry);
		}

		by_position
			.into_iter()
			.map(|(position, mut entries)| {
				match C::FAMILY.admission_policy() {
					AdmissionPolicy::Priority => {
						entries.sort_by_key(|entry| (Reverse(entry.instance.priority().unwrap_or(0)), entry.seq));
					}
					AdmissionPolicy::Fifo => entries.sort_by_key(|entry| entry.seq),
				}
				StackGroup {
					position,
					items: entries
						.into_iter()
						.enumerate()
						.map(|(stack_index, entry)| Stacked {
							stack_index,
							instance: &entry.instance,
						})
						.collect(),
				}
			})
			.collect()
	}

	/// Earliest-inserted entry with the lowest priority.
	fn lowest_priority(&self) -> Option<(String, u8)> {
		self.entries
			.iter()
			.min_by_key(|(_, entry)| (entry.instance.priority().unwrap_or(0), entry.seq))
			.map(|(id, entry)| (id.clone(), entry.instance.priority().unwrap_or(0)))
	}

	fn oldest(&self) -> Option<String> {
		self.entries
			.iter()
			.min_by_key(|(_, entry)| entry.seq)
			.map(|(id, _)| id.clone())
	}

	/// Removes an entry and cancels its timer without bumping the revision.
	fn detach(&mut self, id: &str) -> Option<C> {
		let entry = self.entries.shift_remove(id)?;
		if let Some(handle) = entry.timer {
			self.timers.cancel(handle);
		}
		Some(entry.instance)
	}
}

#[cfg(test)]
mod tests;
