//! Cancellation handles.
//!
//! Everything that can be torn down implements [`SubscriptionLike`]:
//! `unsubscribe` is idempotent and `is_closed` reports the permanent
//! terminal state. The composite group ([`LocalSubscription`] /
//! [`SharedSubscription`]) and the single-slot placeholder
//! ([`LocalSlotSubscription`] / [`SharedSlotSubscription`]) live in
//! submodules.

use std::fmt::{Debug, Formatter};

mod composite;
mod slot;

pub use composite::{LocalSubscription, SharedSubscription};
pub use slot::{LocalSlotSubscription, SharedSlotSubscription};

/// A handle that can cancel an active subscription.
pub trait SubscriptionLike {
  /// Stop the associated work and release its resources. Calling this a
  /// second time, or after the producer already terminated, is a no-op.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

impl Debug for Box<dyn SubscriptionLike> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Box<dyn SubscriptionLike>")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

/// The trivial subscription: a plain boolean flag.
#[derive(Clone, Debug, Default)]
pub struct SingleSubscription(bool);

impl SubscriptionLike for SingleSubscription {
  #[inline]
  fn unsubscribe(&mut self) { self.0 = true; }

  #[inline]
  fn is_closed(&self) -> bool { self.0 }
}

impl<T: ?Sized> SubscriptionLike for Box<T>
where
  T: SubscriptionLike,
{
  #[inline]
  fn unsubscribe(&mut self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// A pair of subscriptions cancelled together, first element first. The
/// merge operator uses this to detach its downstream observer before the
/// resource group sweep starts.
impl<A, B> SubscriptionLike for (A, B)
where
  A: SubscriptionLike,
  B: SubscriptionLike,
{
  fn unsubscribe(&mut self) {
    self.0.unsubscribe();
    self.1.unsubscribe();
  }

  fn is_closed(&self) -> bool { self.0.is_closed() && self.1.is_closed() }
}

/// Wrapper around a subscription which provides the
/// `unsubscribe_when_dropped()` method.
pub struct SubscriptionWrapper<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionWrapper<T> {
  /// Activates "RAII" behavior for this subscription: `unsubscribe()` is
  /// called automatically as soon as the returned value goes out of scope.
  ///
  /// **Attention:** if you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<T> {
    SubscriptionGuard(self.0)
  }

  /// Consumes this wrapper and returns the underlying subscription.
  pub fn into_inner(self) -> T { self.0 }
}

impl<T: SubscriptionLike> SubscriptionLike for SubscriptionWrapper<T> {
  #[inline]
  fn unsubscribe(&mut self) { self.0.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

/// An RAII guard: when dropped, the wrapped subscription is unsubscribed.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  pub fn new(subscription: T) -> SubscriptionGuard<T> {
    SubscriptionGuard(subscription)
  }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn single_subscription_is_idempotent() {
    let mut sub = SingleSubscription::default();
    assert!(!sub.is_closed());
    sub.unsubscribe();
    sub.unsubscribe();
    assert!(sub.is_closed());
  }

  #[test]
  fn pair_closes_both_in_order() {
    let mut pair = (SingleSubscription::default(), SingleSubscription::default());
    assert!(!pair.is_closed());
    pair.unsubscribe();
    assert!(pair.0.is_closed());
    assert!(pair.1.is_closed());
    assert!(pair.is_closed());
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let probe = SharedSubscription::default();
    {
      let _guard = SubscriptionWrapper(probe.clone()).unsubscribe_when_dropped();
      assert!(!probe.is_closed());
    }
    assert!(probe.is_closed());
  }
}
