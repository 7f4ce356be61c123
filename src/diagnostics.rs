//! Opt-in leak-detection counters.
//!
//! Process-wide counters tracking how many composite groups and slot
//! subscriptions have been created and disposed. Disabled by default and
//! free when disabled; call [`enable`] (typically from a test harness or a
//! debug build's startup path) to start counting. The counters are
//! diagnostic only — no library behavior depends on them.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(false);
static GROUPS_CREATED: AtomicUsize = AtomicUsize::new(0);
static GROUPS_DISPOSED: AtomicUsize = AtomicUsize::new(0);
static SLOTS_CREATED: AtomicUsize = AtomicUsize::new(0);
static SLOTS_DISPOSED: AtomicUsize = AtomicUsize::new(0);

pub fn enable() { ENABLED.store(true, Ordering::Relaxed); }

pub fn disable() { ENABLED.store(false, Ordering::Relaxed); }

#[inline]
pub fn is_enabled() -> bool { ENABLED.load(Ordering::Relaxed) }

/// A point-in-time view of the counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceCounts {
  pub groups_created: usize,
  pub groups_disposed: usize,
  pub slots_created: usize,
  pub slots_disposed: usize,
}

impl ResourceCounts {
  /// Groups created but not yet disposed. A steadily growing value across
  /// otherwise-idle periods points at leaked subscriptions.
  pub fn live_groups(&self) -> usize {
    self.groups_created.saturating_sub(self.groups_disposed)
  }

  pub fn live_slots(&self) -> usize {
    self.slots_created.saturating_sub(self.slots_disposed)
  }
}

pub fn snapshot() -> ResourceCounts {
  ResourceCounts {
    groups_created: GROUPS_CREATED.load(Ordering::Relaxed),
    groups_disposed: GROUPS_DISPOSED.load(Ordering::Relaxed),
    slots_created: SLOTS_CREATED.load(Ordering::Relaxed),
    slots_disposed: SLOTS_DISPOSED.load(Ordering::Relaxed),
  }
}

#[inline]
pub(crate) fn group_created() {
  if is_enabled() {
    GROUPS_CREATED.fetch_add(1, Ordering::Relaxed);
  }
}

#[inline]
pub(crate) fn group_disposed() {
  if is_enabled() {
    GROUPS_DISPOSED.fetch_add(1, Ordering::Relaxed);
  }
}

#[inline]
pub(crate) fn slot_created() {
  if is_enabled() {
    SLOTS_CREATED.fetch_add(1, Ordering::Relaxed);
  }
}

#[inline]
pub(crate) fn slot_disposed() {
  if is_enabled() {
    SLOTS_DISPOSED.fetch_add(1, Ordering::Relaxed);
  }
}
