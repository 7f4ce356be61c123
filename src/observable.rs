//! The producer side of the push protocol.
//!
//! [`Observable`] only names the element and error types; the two
//! subscribe traits split by execution context. Subscribing is what starts
//! element production — constructing an observable does no work.

use crate::{observer::Observer, subscription::SubscriptionLike};

mod from_iter;
mod observable_all;
mod observable_comp;
mod observable_next;
mod of;
mod trivial;

pub use from_iter::{from_iter, IterObservable};
pub use observable_all::{ObserverAll, SubscribeAll};
pub use observable_comp::{ObserverComp, SubscribeComplete};
pub use observable_next::{ObserverN, SubscribeNext};
pub use of::{of, OfObservable};
pub use trivial::{empty, throw, EmptyObservable, ThrowObservable};

/// A set of values pushed over time.
pub trait Observable {
  type Item;
  type Err;
}

/// An observable subscribable on the current thread, without `Send`
/// requirements on the observer.
pub trait LocalObservable<'o>: Observable {
  type Unsub: SubscriptionLike;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + 'o;
}

/// An observable whose events may be produced from arbitrary threads; the
/// observer and the returned handle must therefore be sendable.
pub trait SharedObservable: Observable {
  type Unsub: SubscriptionLike + Send + 'static;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + Send + 'static;
}
