//! Multicast push sources.
//!
//! A subject is both an observer (values are pushed into it) and an
//! observable (any number of downstream observers receive the broadcast).
//! Each downstream observer is paired with its own flag subscription in a
//! [`Subscriber`]; the subject prunes closed subscribers lazily on the
//! next broadcast.

use crate::{observer::Observer, subscription::SubscriptionLike};

mod local_subject;
mod shared_subject;

pub use local_subject::LocalSubject;
pub use shared_subject::SharedSubject;

/// An observer that is also a cancellation handle — the form in which
/// subjects store their downstream observers.
pub trait Publisher: Observer + SubscriptionLike {}

impl<T> Publisher for T where T: Observer + SubscriptionLike {}

/// Pairs a downstream observer with its subscription flag. Events are
/// forwarded only while the flag is open, so unsubscribing makes the
/// observer unreachable immediately even though the subject only prunes
/// the entry on its next broadcast.
pub struct Subscriber<O, U> {
  observer: O,
  subscription: U,
}

impl<O, U> Subscriber<O, U> {
  pub(crate) fn new(observer: O, subscription: U) -> Self {
    Subscriber { observer, subscription }
  }
}

impl<O, U> Observer for Subscriber<O, U>
where
  O: Observer,
  U: SubscriptionLike,
{
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: Self::Item) {
    if !self.subscription.is_closed() {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Self::Err) {
    if !self.subscription.is_closed() {
      self.subscription.unsubscribe();
      self.observer.error(err);
    }
  }

  fn complete(&mut self) {
    if !self.subscription.is_closed() {
      self.subscription.unsubscribe();
      self.observer.complete();
    }
  }
}

impl<O, U> SubscriptionLike for Subscriber<O, U>
where
  U: SubscriptionLike,
{
  #[inline]
  fn unsubscribe(&mut self) { self.subscription.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}

/// Clone-shared state of a subject: the subscriber list and the stopped
/// flag that enforces the `Next* (Error | Completed)?` grammar.
pub(crate) struct SubjectCore<P> {
  pub(crate) observers: Vec<P>,
  pub(crate) stopped: bool,
}

impl<P> Default for SubjectCore<P> {
  fn default() -> Self {
    SubjectCore { observers: Vec::new(), stopped: false }
  }
}

impl<P: Publisher> SubjectCore<P> {
  /// Broadcasts a value; every observer but the last receives a clone,
  /// the last receives the moved value.
  pub(crate) fn broadcast_value(&mut self, value: P::Item)
  where
    P::Item: Clone,
  {
    if self.stopped {
      return;
    }
    self.observers.retain(|observer| !observer.is_closed());
    let mut iter = self.observers.iter_mut().peekable();
    while let Some(observer) = iter.next() {
      if iter.peek().is_some() {
        observer.next(value.clone());
      } else {
        observer.next(value);
        break;
      }
    }
  }

  pub(crate) fn broadcast_error(&mut self, err: P::Err)
  where
    P::Err: Clone,
  {
    if self.stopped {
      return;
    }
    self.stopped = true;
    let mut iter = self.observers.drain(..).peekable();
    while let Some(mut observer) = iter.next() {
      if iter.peek().is_some() {
        observer.error(err.clone());
      } else {
        observer.error(err);
        break;
      }
    }
  }

  pub(crate) fn broadcast_complete(&mut self) {
    if self.stopped {
      return;
    }
    self.stopped = true;
    for mut observer in self.observers.drain(..) {
      observer.complete();
    }
  }
}
