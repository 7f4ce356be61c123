use crate::{
  observable::{LocalObservable, SharedObservable},
  observer::Observer,
  shared::Shared,
  subscription::{SubscriptionLike, SubscriptionWrapper},
};
use std::marker::PhantomData;

/// Observer that only cares about values; errors are impossible
/// (`Err = ()`) and completion is ignored.
#[derive(Clone)]
pub struct ObserverN<N, Item> {
  next: N,
  marker: PhantomData<fn(Item)>,
}

impl<N, Item> ObserverN<N, Item> {
  pub(crate) fn new(next: N) -> Self {
    ObserverN { next, marker: PhantomData }
  }
}

impl<N, Item> Observer for ObserverN<N, Item>
where
  N: FnMut(Item),
{
  type Item = Item;
  type Err = ();

  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(&mut self, _err: ()) {}

  #[inline]
  fn complete(&mut self) {}
}

pub trait SubscribeNext<'o, N> {
  type Unsub: SubscriptionLike;

  /// Subscribes with a value handler only. Available on observables that
  /// cannot error.
  fn subscribe(self, next: N) -> SubscriptionWrapper<Self::Unsub>;
}

impl<'o, S, N> SubscribeNext<'o, N> for S
where
  S: LocalObservable<'o, Err = ()>,
  S::Item: 'o,
  N: FnMut(S::Item) + 'o,
{
  type Unsub = S::Unsub;

  fn subscribe(self, next: N) -> SubscriptionWrapper<Self::Unsub> {
    SubscriptionWrapper(self.actual_subscribe(ObserverN::new(next)))
  }
}

impl<'o, S, N> SubscribeNext<'o, N> for Shared<S>
where
  S: SharedObservable<Err = ()>,
  S::Item: 'static,
  N: FnMut(S::Item) + Send + 'static,
{
  type Unsub = S::Unsub;

  fn subscribe(self, next: N) -> SubscriptionWrapper<Self::Unsub> {
    SubscriptionWrapper(self.0.actual_subscribe(ObserverN::new(next)))
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[test]
  fn wrapper_allows_manual_unsubscribe() {
    let mut seen = 0;
    {
      let mut subject = LocalSubject::<i32, ()>::new();
      let mut handle = subject.clone().subscribe(|v| seen = v);
      subject.next(1);
      handle.unsubscribe();
      subject.next(2);
    }
    assert_eq!(seen, 1);
  }

  #[test]
  fn raii_guard_unsubscribes() {
    let mut hits = 0;
    {
      let mut subject = LocalSubject::<i32, ()>::new();
      {
        let _guard = subject
          .clone()
          .subscribe(|_| hits += 1)
          .unsubscribe_when_dropped();
        subject.next(1);
      }
      subject.next(2);
    }
    assert_eq!(hits, 1);
  }
}
