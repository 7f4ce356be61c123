use crate::{
  observable::{LocalObservable, Observable, SharedObservable},
  observer::Observer,
  subscription::SingleSubscription,
};

/// Creates an observable that produces the values of an iterator.
///
/// Emits synchronously on subscribe, completes when the iterator is
/// exhausted, never errors.
///
/// ```
/// use rivulet::prelude::*;
///
/// let mut sum = 0;
/// observable::from_iter(0..10).subscribe(|v| sum += v);
/// assert_eq!(sum, 45);
/// ```
pub fn from_iter<Iter>(iter: Iter) -> IterObservable<Iter>
where
  Iter: IntoIterator,
{
  IterObservable(iter)
}

#[derive(Clone)]
pub struct IterObservable<Iter>(Iter);

impl<Iter> Observable for IterObservable<Iter>
where
  Iter: IntoIterator,
{
  type Item = Iter::Item;
  type Err = ();
}

impl<'o, Iter> LocalObservable<'o> for IterObservable<Iter>
where
  Iter: IntoIterator,
{
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item = Iter::Item, Err = ()> + 'o,
  {
    for value in self.0 {
      observer.next(value);
    }
    observer.complete();
    SingleSubscription::default()
  }
}

impl<Iter> SharedObservable for IterObservable<Iter>
where
  Iter: IntoIterator,
{
  type Unsub = SingleSubscription;

  fn actual_subscribe<O>(self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item = Iter::Item, Err = ()> + Send + 'static,
  {
    for value in self.0 {
      observer.next(value);
    }
    observer.complete();
    SingleSubscription::default()
  }
}
