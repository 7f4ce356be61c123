use crate::{
  observable::{LocalObservable, SharedObservable},
  observer::Observer,
  shared::Shared,
  subscription::{SubscriptionLike, SubscriptionWrapper},
};
use std::marker::PhantomData;

/// Observer with value and completion handlers (`Err = ()`).
#[derive(Clone)]
pub struct ObserverComp<N, C, Item> {
  next: N,
  complete: C,
  marker: PhantomData<fn(Item)>,
}

impl<N, C, Item> ObserverComp<N, C, Item> {
  pub(crate) fn new(next: N, complete: C) -> Self {
    ObserverComp { next, complete, marker: PhantomData }
  }
}

impl<N, C, Item> Observer for ObserverComp<N, C, Item>
where
  N: FnMut(Item),
  C: FnMut(),
{
  type Item = Item;
  type Err = ();

  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(&mut self, _err: ()) {}

  #[inline]
  fn complete(&mut self) { (self.complete)(); }
}

pub trait SubscribeComplete<'o, N, C> {
  type Unsub: SubscriptionLike;

  /// Subscribes with a value handler and a completion handler.
  fn subscribe_complete(
    self,
    next: N,
    complete: C,
  ) -> SubscriptionWrapper<Self::Unsub>;
}

impl<'o, S, N, C> SubscribeComplete<'o, N, C> for S
where
  S: LocalObservable<'o, Err = ()>,
  S::Item: 'o,
  N: FnMut(S::Item) + 'o,
  C: FnMut() + 'o,
{
  type Unsub = S::Unsub;

  fn subscribe_complete(
    self,
    next: N,
    complete: C,
  ) -> SubscriptionWrapper<Self::Unsub> {
    SubscriptionWrapper(self.actual_subscribe(ObserverComp::new(next, complete)))
  }
}

impl<'o, S, N, C> SubscribeComplete<'o, N, C> for Shared<S>
where
  S: SharedObservable<Err = ()>,
  S::Item: 'static,
  N: FnMut(S::Item) + Send + 'static,
  C: FnMut() + Send + 'static,
{
  type Unsub = S::Unsub;

  fn subscribe_complete(
    self,
    next: N,
    complete: C,
  ) -> SubscriptionWrapper<Self::Unsub> {
    SubscriptionWrapper(
      self.0.actual_subscribe(ObserverComp::new(next, complete)),
    )
  }
}
