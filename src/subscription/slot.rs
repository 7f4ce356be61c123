//! Single-slot cancellable placeholders.
//!
//! A slot is registered in a composite group *before* the subscription it
//! will hold exists; `set` binds the real handle later. If the slot was
//! already closed by then (the group was swept in between), the incoming
//! handle is disposed on the spot, which is what makes
//! register-then-subscribe race-free.

use super::SubscriptionLike;
use crate::diagnostics;
use std::{
  cell::RefCell,
  rc::Rc,
  sync::{Arc, Mutex},
};

struct SlotInner<T> {
  closed: bool,
  content: Option<T>,
}

impl<T> Default for SlotInner<T> {
  fn default() -> Self { SlotInner { closed: false, content: None } }
}

/// Single-slot cancellable for the Local context.
#[derive(Clone)]
pub struct LocalSlotSubscription(
  Rc<RefCell<SlotInner<Box<dyn SubscriptionLike>>>>,
);

impl Default for LocalSlotSubscription {
  fn default() -> Self {
    diagnostics::slot_created();
    LocalSlotSubscription(Rc::default())
  }
}

impl LocalSlotSubscription {
  /// Binds `subscription` into the slot. Any previous content is disposed;
  /// if the slot is already closed the incoming handle is disposed
  /// immediately instead of being stored.
  pub fn set<S>(&self, subscription: S)
  where
    S: SubscriptionLike + 'static,
  {
    let mut subscription: Box<dyn SubscriptionLike> = Box::new(subscription);
    let mut inner = self.0.borrow_mut();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
      return;
    }
    let previous = inner.content.replace(subscription);
    drop(inner);
    if let Some(mut previous) = previous {
      previous.unsubscribe();
    }
  }
}

impl SubscriptionLike for LocalSlotSubscription {
  fn unsubscribe(&mut self) {
    let content = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      inner.content.take()
    };
    diagnostics::slot_disposed();
    if let Some(mut content) = content {
      content.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.borrow().closed }
}

/// Single-slot cancellable for the Shared context.
#[derive(Clone)]
pub struct SharedSlotSubscription(
  Arc<Mutex<SlotInner<Box<dyn SubscriptionLike + Send>>>>,
);

impl Default for SharedSlotSubscription {
  fn default() -> Self {
    diagnostics::slot_created();
    SharedSlotSubscription(Arc::default())
  }
}

impl SharedSlotSubscription {
  /// See [`LocalSlotSubscription::set`].
  pub fn set<S>(&self, subscription: S)
  where
    S: SubscriptionLike + Send + 'static,
  {
    let mut subscription: Box<dyn SubscriptionLike + Send> =
      Box::new(subscription);
    let mut inner = self.0.lock().unwrap();
    if inner.closed {
      drop(inner);
      subscription.unsubscribe();
      return;
    }
    let previous = inner.content.replace(subscription);
    drop(inner);
    if let Some(mut previous) = previous {
      previous.unsubscribe();
    }
  }
}

impl SubscriptionLike for SharedSlotSubscription {
  fn unsubscribe(&mut self) {
    let content = {
      let mut inner = self.0.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.closed = true;
      inner.content.take()
    };
    diagnostics::slot_disposed();
    if let Some(mut content) = content {
      content.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.lock().unwrap().closed }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::subscription::{LocalSubscription, SharedSubscription};

  #[test]
  fn set_binds_and_unsubscribe_tears_down() {
    let slot = LocalSlotSubscription::default();
    let probe = LocalSubscription::default();
    slot.set(probe.clone());

    let mut handle = slot.clone();
    handle.unsubscribe();
    assert!(probe.is_closed());
    assert!(slot.is_closed());
  }

  #[test]
  fn set_after_close_disposes_immediately() {
    let mut slot = SharedSlotSubscription::default();
    slot.unsubscribe();

    let probe = SharedSubscription::default();
    slot.set(probe.clone());
    assert!(probe.is_closed());
  }

  #[test]
  fn rebinding_disposes_previous_content() {
    let slot = LocalSlotSubscription::default();
    let first = LocalSubscription::default();
    let second = LocalSubscription::default();
    slot.set(first.clone());
    slot.set(second.clone());
    assert!(first.is_closed());
    assert!(!second.is_closed());
  }
}
