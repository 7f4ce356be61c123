use crate::{
  observable::{LocalObservable, SharedObservable},
  observer::Observer,
  shared::Shared,
  subscription::{SubscriptionLike, SubscriptionWrapper},
};
use std::marker::PhantomData;

/// Observer with handlers for all three event kinds.
#[derive(Clone)]
pub struct ObserverAll<N, E, C, Item, Err> {
  next: N,
  error: E,
  complete: C,
  marker: PhantomData<fn(Item, Err)>,
}

impl<N, E, C, Item, Err> ObserverAll<N, E, C, Item, Err> {
  pub(crate) fn new(next: N, error: E, complete: C) -> Self {
    ObserverAll { next, error, complete, marker: PhantomData }
  }
}

impl<N, E, C, Item, Err> Observer for ObserverAll<N, E, C, Item, Err>
where
  N: FnMut(Item),
  E: FnMut(Err),
  C: FnMut(),
{
  type Item = Item;
  type Err = Err;

  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }

  #[inline]
  fn error(&mut self, err: Err) { (self.error)(err); }

  #[inline]
  fn complete(&mut self) { (self.complete)(); }
}

pub trait SubscribeAll<'o, N, E, C> {
  type Unsub: SubscriptionLike;

  /// Subscribes with handlers for values, the terminal error and the
  /// terminal completion.
  fn subscribe_all(
    self,
    next: N,
    error: E,
    complete: C,
  ) -> SubscriptionWrapper<Self::Unsub>;
}

impl<'o, S, N, E, C> SubscribeAll<'o, N, E, C> for S
where
  S: LocalObservable<'o>,
  S::Item: 'o,
  S::Err: 'o,
  N: FnMut(S::Item) + 'o,
  E: FnMut(S::Err) + 'o,
  C: FnMut() + 'o,
{
  type Unsub = S::Unsub;

  fn subscribe_all(
    self,
    next: N,
    error: E,
    complete: C,
  ) -> SubscriptionWrapper<Self::Unsub> {
    SubscriptionWrapper(
      self.actual_subscribe(ObserverAll::new(next, error, complete)),
    )
  }
}

impl<'o, S, N, E, C> SubscribeAll<'o, N, E, C> for Shared<S>
where
  S: SharedObservable,
  S::Item: 'static,
  S::Err: 'static,
  N: FnMut(S::Item) + Send + 'static,
  E: FnMut(S::Err) + Send + 'static,
  C: FnMut() + Send + 'static,
{
  type Unsub = S::Unsub;

  fn subscribe_all(
    self,
    next: N,
    error: E,
    complete: C,
  ) -> SubscriptionWrapper<Self::Unsub> {
    SubscriptionWrapper(
      self.0.actual_subscribe(ObserverAll::new(next, error, complete)),
    )
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[test]
  fn error_handler_sees_the_cause() {
    let mut errors = vec![];
    let mut completions = 0;
    {
      let mut subject = LocalSubject::<i32, &str>::new();
      subject.clone().subscribe_all(
        |_| {},
        |e| errors.push(e),
        || completions += 1,
      );

      subject.error("broken");
    }
    assert_eq!(errors, vec!["broken"]);
    assert_eq!(completions, 0);
  }
}
