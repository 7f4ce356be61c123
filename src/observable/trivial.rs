use crate::{
  observable::{LocalObservable, Observable, SharedObservable},
  observer::Observer,
  subscription::SingleSubscription,
};
use std::marker::PhantomData;

/// Creates an observable that produces no values and completes
/// immediately.
pub fn empty<Item>() -> EmptyObservable<Item> {
  EmptyObservable(PhantomData)
}

pub struct EmptyObservable<Item>(PhantomData<fn() -> Item>);

impl<Item> Clone for EmptyObservable<Item> {
  fn clone(&self) -> Self { EmptyObservable(PhantomData) }
}

impl<Item> Observable for EmptyObservable<Item> {
  type Item = Item;
  type Err = ();
}

impl<'o, Item> LocalObservable<'o> for EmptyObservable<Item> {
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = ()> + 'o,
  {
    observer.complete();
    SingleSubscription::default()
  }
}

impl<Item> SharedObservable for EmptyObservable<Item> {
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = ()> + Send + 'static,
  {
    observer.complete();
    SingleSubscription::default()
  }
}

/// Creates an observable that emits no values and terminates with the
/// given error.
pub fn throw<Item, Err>(err: Err) -> ThrowObservable<Item, Err> {
  ThrowObservable { err, marker: PhantomData }
}

pub struct ThrowObservable<Item, Err> {
  err: Err,
  marker: PhantomData<fn() -> Item>,
}

impl<Item, Err: Clone> Clone for ThrowObservable<Item, Err> {
  fn clone(&self) -> Self {
    ThrowObservable { err: self.err.clone(), marker: PhantomData }
  }
}

impl<Item, Err> Observable for ThrowObservable<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<'o, Item, Err> LocalObservable<'o> for ThrowObservable<Item, Err> {
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = Err> + 'o,
  {
    observer.error(self.err);
    SingleSubscription::default()
  }
}

impl<Item, Err> SharedObservable for ThrowObservable<Item, Err> {
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    observer.error(self.err);
    SingleSubscription::default()
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[test]
  fn empty_completes_without_values() {
    let mut hits = 0;
    let mut completed = false;
    observable::empty::<i32>()
      .subscribe_complete(|_| hits += 1, || completed = true);
    assert_eq!(hits, 0);
    assert!(completed);
  }

  #[test]
  fn throw_errors_without_values() {
    let mut hits = 0;
    let mut errors = vec![];
    observable::throw::<i32, _>("boom").subscribe_all(
      |_| hits += 1,
      |e| errors.push(e),
      || unreachable!("a throw observable never completes"),
    );
    assert_eq!(hits, 0);
    assert_eq!(errors, vec!["boom"]);
  }
}
