use crate::{
  observable::{LocalObservable, Observable},
  observer::Observer,
  rc::{MutRc, RcDeref, RcDerefMut},
  subject::{Publisher, SubjectCore, Subscriber},
  subscription::{SingleSubscription, SubscriptionLike},
};

type LocalPublisher<'a, Item, Err> =
  Box<dyn Publisher<Item = Item, Err = Err> + 'a>;

/// Single-threaded multicast subject.
pub struct LocalSubject<'a, Item, Err> {
  core: MutRc<SubjectCore<LocalPublisher<'a, Item, Err>>>,
}

impl<'a, Item, Err> Clone for LocalSubject<'a, Item, Err> {
  fn clone(&self) -> Self { LocalSubject { core: self.core.clone() } }
}

impl<'a, Item, Err> Default for LocalSubject<'a, Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<'a, Item, Err> LocalSubject<'a, Item, Err> {
  pub fn new() -> Self {
    LocalSubject { core: MutRc::own(SubjectCore::default()) }
  }

  /// Number of currently stored downstream observers. Closed subscribers
  /// are pruned on the next value broadcast, not eagerly.
  pub fn subscribed_size(&self) -> usize {
    self.core.rc_deref().observers.len()
  }
}

impl<'a, Item, Err> Observable for LocalSubject<'a, Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<'a, Item, Err> LocalObservable<'a> for LocalSubject<'a, Item, Err> {
  type Unsub = MutRc<SingleSubscription>;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = Err> + 'a,
  {
    let mut subscription = MutRc::own(SingleSubscription::default());
    let mut core = self.core.rc_deref_mut();
    if core.stopped {
      // terminated subjects accept no further observers
      drop(core);
      subscription.unsubscribe();
      return subscription;
    }
    core
      .observers
      .push(Box::new(Subscriber::new(observer, subscription.clone())));
    drop(core);
    subscription
  }
}

impl<'a, Item: Clone, Err: Clone> Observer for LocalSubject<'a, Item, Err> {
  type Item = Item;
  type Err = Err;

  fn next(&mut self, value: Item) {
    self.core.rc_deref_mut().broadcast_value(value);
  }

  fn error(&mut self, err: Err) {
    self.core.rc_deref_mut().broadcast_error(err);
  }

  fn complete(&mut self) { self.core.rc_deref_mut().broadcast_complete(); }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;

  #[test]
  fn broadcasts_to_every_observer() {
    let mut a = 0;
    let mut b = 0;
    {
      let mut subject = LocalSubject::<i32, ()>::new();
      subject.clone().subscribe(|v| a += v);
      subject.clone().subscribe(|v| b += v);
      assert_eq!(subject.subscribed_size(), 2);
      subject.next(2);
      subject.next(3);
    }
    assert_eq!(a, 5);
    assert_eq!(b, 5);
  }

  #[test]
  fn no_events_after_complete() {
    let mut values = vec![];
    let mut completions = 0;
    {
      let mut subject = LocalSubject::<i32, ()>::new();
      subject
        .clone()
        .subscribe_complete(|v| values.push(v), || completions += 1);
      subject.next(1);
      subject.complete();
      subject.next(2);
      subject.complete();
    }
    assert_eq!(values, vec![1]);
    assert_eq!(completions, 1);
  }

  #[test]
  fn subscribing_after_terminal_yields_closed_handle() {
    let mut subject = LocalSubject::<i32, ()>::new();
    subject.complete();
    let handle = subject.clone().subscribe(|_| {});
    assert!(handle.is_closed());
    assert_eq!(subject.subscribed_size(), 0);
  }

  #[test]
  fn unsubscribed_observer_is_unreachable() {
    let mut hits = 0;
    {
      let mut subject = LocalSubject::<i32, ()>::new();
      let mut handle = subject.clone().subscribe(|_| hits += 1);
      subject.next(1);
      handle.unsubscribe();
      subject.next(2);
    }
    assert_eq!(hits, 1);
  }
}
