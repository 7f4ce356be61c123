use crate::{
  observable::{Observable, SharedObservable},
  observer::Observer,
  rc::{MutArc, RcDeref, RcDerefMut},
  subject::{Publisher, SubjectCore, Subscriber},
  subscription::{SingleSubscription, SubscriptionLike},
};

type SharedPublisher<Item, Err> =
  Box<dyn Publisher<Item = Item, Err = Err> + Send>;

/// Thread-safe multicast subject. Broadcasting holds the subject's own
/// lock, so producers must not push back into the same subject from within
/// a delivery.
pub struct SharedSubject<Item, Err> {
  core: MutArc<SubjectCore<SharedPublisher<Item, Err>>>,
}

impl<Item, Err> Clone for SharedSubject<Item, Err> {
  fn clone(&self) -> Self { SharedSubject { core: self.core.clone() } }
}

impl<Item, Err> Default for SharedSubject<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> SharedSubject<Item, Err> {
  pub fn new() -> Self {
    SharedSubject { core: MutArc::own(SubjectCore::default()) }
  }

  /// Number of currently stored downstream observers. Closed subscribers
  /// are pruned on the next value broadcast, not eagerly.
  pub fn subscribed_size(&self) -> usize {
    self.core.rc_deref().observers.len()
  }
}

impl<Item, Err> Observable for SharedSubject<Item, Err> {
  type Item = Item;
  type Err = Err;
}

impl<Item, Err> SharedObservable for SharedSubject<Item, Err> {
  type Unsub = MutArc<SingleSubscription>;

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item = Item, Err = Err> + Send + 'static,
  {
    let mut subscription = MutArc::own(SingleSubscription::default());
    let mut core = self.core.rc_deref_mut();
    if core.stopped {
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

impl<Item: Clone, Err: Clone> Observer for SharedSubject<Item, Err> {
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
  use std::{
    sync::{Arc, Mutex},
    thread,
  };

  #[test]
  fn broadcasts_across_threads() {
    let collected = Arc::new(Mutex::new(Vec::new()));
    let sink = collected.clone();
    let subject = SharedSubject::<i32, ()>::new();
    subject
      .clone()
      .into_shared()
      .subscribe(move |v| sink.lock().unwrap().push(v));

    let handles: Vec<_> = (0..4)
      .map(|i| {
        let mut pusher = subject.clone();
        thread::spawn(move || pusher.next(i))
      })
      .collect();
    for handle in handles {
      handle.join().unwrap();
    }

    let mut values = collected.lock().unwrap().clone();
    values.sort_unstable();
    assert_eq!(values, vec![0, 1, 2, 3]);
  }

  #[test]
  fn terminal_event_wins_exactly_once() {
    let completions = Arc::new(Mutex::new(0));
    let sink = completions.clone();
    let subject = SharedSubject::<i32, ()>::new();
    subject
      .clone()
      .into_shared()
      .subscribe_complete(|_| {}, move || *sink.lock().unwrap() += 1);

    let handles: Vec<_> = (0..4)
      .map(|_| {
        let mut closer = subject.clone();
        thread::spawn(move || closer.complete())
      })
      .collect();
    for handle in handles {
      handle.join().unwrap();
    }
    assert_eq!(*completions.lock().unwrap(), 1);
  }
}
