//! The composite cancellation group.
//!
//! A group owns a dynamic set of cancellable resources, each addressed by
//! an opaque `usize` key. Keys are handed out from a monotonic counter and
//! never reused, so a key that was removed (possibly from another thread)
//! can only ever miss — it cannot alias a later entry.

use super::SubscriptionLike;
use crate::diagnostics;
use smallvec::SmallVec;
use std::{
  cell::RefCell,
  rc::Rc,
  sync::{Arc, Mutex},
};

struct GroupInner<T> {
  closed: bool,
  next_key: usize,
  resources: SmallVec<[(usize, T); 2]>,
}

impl<T> Default for GroupInner<T> {
  fn default() -> Self {
    GroupInner {
      closed: false,
      next_key: 0,
      resources: SmallVec::new(),
    }
  }
}

impl<T: SubscriptionLike> GroupInner<T> {
  fn add(&mut self, mut resource: T) -> Option<usize> {
    if self.closed {
      resource.unsubscribe();
      return None;
    }
    let key = self.next_key;
    self.next_key += 1;
    self.resources.push((key, resource));
    Some(key)
  }

  fn take(&mut self, key: usize) -> Option<T> {
    self
      .resources
      .iter()
      .position(|(k, _)| *k == key)
      .map(|idx| self.resources.remove(idx).1)
  }

  /// Marks the group closed forever and hands the entries back so the
  /// caller can dispose them without holding the container lock.
  fn close(&mut self) -> SmallVec<[(usize, T); 2]> {
    self.closed = true;
    std::mem::take(&mut self.resources)
  }
}

/// Composite cancellation group for the Local context.
#[derive(Clone)]
pub struct LocalSubscription(Rc<RefCell<GroupInner<Box<dyn SubscriptionLike>>>>);

impl Default for LocalSubscription {
  fn default() -> Self {
    diagnostics::group_created();
    LocalSubscription(Rc::default())
  }
}

impl LocalSubscription {
  /// Registers a resource and returns its key, or `None` if the group is
  /// already closed — in which case the resource is disposed immediately
  /// instead of being stored.
  pub fn add<S>(&self, subscription: S) -> Option<usize>
  where
    S: SubscriptionLike + 'static,
  {
    self.0.borrow_mut().add(Box::new(subscription))
  }

  /// Detaches and disposes exactly the resource under `key`. A no-op when
  /// the key was already removed or the group is closed.
  pub fn remove(&self, key: usize) {
    let removed = self.0.borrow_mut().take(key);
    // dispose outside the borrow: teardown may reenter this group
    if let Some(mut resource) = removed {
      resource.unsubscribe();
    }
  }

  pub fn count(&self) -> usize { self.0.borrow().resources.len() }
}

impl SubscriptionLike for LocalSubscription {
  fn unsubscribe(&mut self) {
    let resources = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        return;
      }
      inner.close()
    };
    diagnostics::group_disposed();
    for (_, mut resource) in resources {
      resource.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.borrow().closed }
}

/// Composite cancellation group for the Shared context.
///
/// Disposal drains the entries under the lock and disposes them after
/// releasing it, so a straggling completion that races the sweep either
/// removes its entry first or finds it already gone — both are fine.
#[derive(Clone)]
pub struct SharedSubscription(
  Arc<Mutex<GroupInner<Box<dyn SubscriptionLike + Send>>>>,
);

impl Default for SharedSubscription {
  fn default() -> Self {
    diagnostics::group_created();
    SharedSubscription(Arc::default())
  }
}

impl SharedSubscription {
  /// See [`LocalSubscription::add`].
  pub fn add<S>(&self, subscription: S) -> Option<usize>
  where
    S: SubscriptionLike + Send + 'static,
  {
    self.0.lock().unwrap().add(Box::new(subscription))
  }

  /// See [`LocalSubscription::remove`].
  pub fn remove(&self, key: usize) {
    let removed = self.0.lock().unwrap().take(key);
    if let Some(mut resource) = removed {
      resource.unsubscribe();
    }
  }

  pub fn count(&self) -> usize { self.0.lock().unwrap().resources.len() }
}

impl SubscriptionLike for SharedSubscription {
  fn unsubscribe(&mut self) {
    let resources = {
      let mut inner = self.0.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.close()
    };
    diagnostics::group_disposed();
    for (_, mut resource) in resources {
      resource.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.lock().unwrap().closed }
}
