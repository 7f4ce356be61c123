use crate::{
  observable::{LocalObservable, Observable, SharedObservable},
  observer::Observer,
  subscription::SingleSubscription,
};

/// Creates an observable producing a single value.
///
/// Completes immediately after emitting the value. Never errors.
///
/// ```
/// use rivulet::prelude::*;
///
/// let mut seen = None;
/// observable::of(123).subscribe(|v| seen = Some(v));
/// assert_eq!(seen, Some(123));
/// ```
pub fn of<Item>(value: Item) -> OfObservable<Item> { OfObservable(value) }

#[derive(Clone)]
pub struct OfObservable<Item>(pub(crate) Item);

impl<Item> Observable for OfObservable<Item> {
  type Item = Item;
  type Err = ();
}

impl<'o, Item> LocalObservable<'o> for OfObservable<Item> {
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = ()> + 'o,
  {
    observer.next(self.0);
    observer.complete();
    SingleSubscription::default()
  }
}

impl<Item> SharedObservable for OfObservable<Item> {
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = ()> + Send + 'static,
  {
    observer.next(self.0);
    observer.complete();
    SingleSubscription::default()
  }
}
