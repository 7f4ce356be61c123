//! Merge an observable of observables into one output observable.
//!
//! Two sinks back the operator. The unbounded one subscribes every inner
//! observable the moment it arrives; the bounded one keeps at most
//! `concurrent` inner subscriptions running and queues the rest in arrival
//! order. Both share one lock per operation (the state handle's mutex in
//! the Shared context): values are forwarded downstream while holding it,
//! terminal events detach the downstream observer under it and deliver
//! after the guard is dropped, so downstream sees a totally ordered event
//! sequence with exactly one terminal event.
//!
//! Resource accounting: every subscription of the operation lives in one
//! composite group, keyed per entry. The outer subscription's slot is the
//! group's permanent first member — it is disposed (not removed) when the
//! outer observable completes early, so in the unbounded sink
//! `group.count() == 1` always means "no inner observable is still
//! running".

use crate::{
  observable::{LocalObservable, Observable, SharedObservable},
  observer::Observer,
  rc::{MutArc, MutRc, RcDerefMut},
  subscription::{
    LocalSlotSubscription, LocalSubscription, SharedSlotSubscription,
    SharedSubscription, SubscriptionLike,
  },
};
use std::{collections::VecDeque, marker::PhantomData};

/// Merges the observables produced by `source` into a single observable.
///
/// `concurrent` bounds how many inner observables may be subscribed at the
/// same time; `0` means no limit. A limit of `1` degenerates to strict
/// sequential concatenation.
pub fn merge<S>(source: S, concurrent: usize) -> MergeAllOp<S>
where
  S: Observable,
  S::Item: Observable<Err = S::Err>,
{
  MergeAllOp { source, concurrent }
}

pub trait MergeAll: Observable {
  /// Method form of [`merge`].
  fn merge_all(self, concurrent: usize) -> MergeAllOp<Self>
  where
    Self: Sized,
    Self::Item: Observable<Err = Self::Err>,
  {
    MergeAllOp { source: self, concurrent }
  }

  /// Merges one inner observable at a time, in arrival order.
  fn concat_all(self) -> MergeAllOp<Self>
  where
    Self: Sized,
    Self::Item: Observable<Err = Self::Err>,
  {
    self.merge_all(1)
  }

  /// Merges without a concurrency limit.
  fn flatten(self) -> MergeAllOp<Self>
  where
    Self: Sized,
    Self::Item: Observable<Err = Self::Err>,
  {
    self.merge_all(0)
  }
}

impl<T: Observable> MergeAll for T {}

#[derive(Clone)]
pub struct MergeAllOp<S> {
  source: S,
  concurrent: usize,
}

impl<S> Observable for MergeAllOp<S>
where
  S: Observable,
  S::Item: Observable<Err = S::Err>,
{
  type Item = <S::Item as Observable>::Item;
  type Err = S::Err;
}

// ---------------------------------------------------------------------------
// Sink state

/// State of an unbounded merge. Activity is tracked by the group's entry
/// count, so only the stop flag and the downstream observer live here.
struct MergeState<O> {
  observer: Option<O>,
  stopped: bool,
}

impl<O> MergeState<O> {
  fn new(observer: O) -> Self {
    MergeState { observer: Some(observer), stopped: false }
  }
}

/// Detaching the downstream observer is itself a cancellation concern:
/// the returned merge handle pairs this with the group, and tearing the
/// state down first is what makes post-cancel deliveries impossible.
impl<O> SubscriptionLike for MergeState<O> {
  fn unsubscribe(&mut self) { self.observer = None; }

  fn is_closed(&self) -> bool { self.observer.is_none() }
}

/// State of a bounded merge: the active-subscription counter and the FIFO
/// queue of observables waiting for a free slot.
struct BoundedState<O, Inner> {
  observer: Option<O>,
  stopped: bool,
  active: usize,
  pending: VecDeque<Inner>,
}

impl<O, Inner> BoundedState<O, Inner> {
  fn new(observer: O) -> Self {
    BoundedState {
      observer: Some(observer),
      stopped: false,
      active: 0,
      pending: VecDeque::new(),
    }
  }
}

impl<O, Inner> SubscriptionLike for BoundedState<O, Inner> {
  fn unsubscribe(&mut self) {
    self.observer = None;
    self.pending.clear();
  }

  fn is_closed(&self) -> bool { self.observer.is_none() }
}

// ---------------------------------------------------------------------------
// Unbounded sink, Local context

struct MergeOuterLocal<'o, O, Inner> {
  state: MutRc<MergeState<O>>,
  group: LocalSubscription,
  source_slot: LocalSlotSubscription,
  marker: PhantomData<&'o Inner>,
}

struct MergeInnerLocal<O> {
  state: MutRc<MergeState<O>>,
  group: LocalSubscription,
  key: usize,
}

fn subscribe_merge_inner_local<'o, O, Inner>(
  inner: Inner,
  state: &MutRc<MergeState<O>>,
  group: &LocalSubscription,
) where
  O: Observer + 'o,
  Inner: LocalObservable<'o, Item = O::Item, Err = O::Err> + 'o,
  Inner::Unsub: 'static,
{
  let slot = LocalSlotSubscription::default();
  if let Some(key) = group.add(slot.clone()) {
    let unsub = inner.actual_subscribe(MergeInnerLocal {
      state: state.clone(),
      group: group.clone(),
      key,
    });
    slot.set(unsub);
  }
}

impl<'o, O, Inner> Observer for MergeOuterLocal<'o, O, Inner>
where
  O: Observer + 'o,
  Inner: LocalObservable<'o, Item = O::Item, Err = O::Err> + 'o,
  Inner::Unsub: 'static,
{
  type Item = Inner;
  type Err = O::Err;

  fn next(&mut self, inner: Inner) {
    subscribe_merge_inner_local(inner, &self.state, &self.group);
  }

  fn error(&mut self, err: O::Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(mut observer) = observer {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.stopped = true;
      if self.group.count() == 1 { state.observer.take() } else { None }
    };
    if let Some(mut observer) = finished {
      observer.complete();
      self.group.unsubscribe();
    } else {
      // inner observables are still running; the outer subscription no
      // longer needs to be cancellable on its own, but its slot stays a
      // group member so count() keeps its meaning
      self.source_slot.unsubscribe();
    }
  }
}

impl<O> Observer for MergeInnerLocal<O>
where
  O: Observer,
{
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: O::Item) {
    // forwarded while holding the operation lock: this is what serializes
    // concurrent producers
    if let Some(observer) = self.state.rc_deref_mut().observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, err: O::Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(mut observer) = observer {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self) {
    self.group.remove(self.key);
    let finished = {
      let mut state = self.state.rc_deref_mut();
      if state.stopped && self.group.count() == 1 {
        state.observer.take()
      } else {
        None
      }
    };
    if let Some(mut observer) = finished {
      observer.complete();
      self.group.unsubscribe();
    }
  }
}

// ---------------------------------------------------------------------------
// Bounded sink, Local context

struct BoundedOuterLocal<'o, O, Inner> {
  state: MutRc<BoundedState<O, Inner>>,
  group: LocalSubscription,
  source_slot: LocalSlotSubscription,
  concurrent: usize,
  marker: PhantomData<&'o ()>,
}

struct BoundedInnerLocal<'o, O, Inner> {
  state: MutRc<BoundedState<O, Inner>>,
  group: LocalSubscription,
  key: usize,
  marker: PhantomData<&'o ()>,
}

fn subscribe_bounded_inner_local<'o, O, Inner>(
  inner: Inner,
  state: &MutRc<BoundedState<O, Inner>>,
  group: &LocalSubscription,
) where
  O: Observer + 'o,
  Inner: LocalObservable<'o, Item = O::Item, Err = O::Err> + 'o,
  Inner::Unsub: 'static,
{
  let slot = LocalSlotSubscription::default();
  if let Some(key) = group.add(slot.clone()) {
    let unsub = inner.actual_subscribe(BoundedInnerLocal {
      state: state.clone(),
      group: group.clone(),
      key,
      marker: PhantomData,
    });
    slot.set(unsub);
  }
}

impl<'o, O, Inner> Observer for BoundedOuterLocal<'o, O, Inner>
where
  O: Observer + 'o,
  Inner: LocalObservable<'o, Item = O::Item, Err = O::Err> + 'o,
  Inner::Unsub: 'static,
{
  type Item = Inner;
  type Err = O::Err;

  fn next(&mut self, inner: Inner) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      if state.active >= self.concurrent {
        state.pending.push_back(inner);
        return;
      }
      state.active += 1;
    }
    subscribe_bounded_inner_local(inner, &self.state, &self.group);
  }

  fn error(&mut self, err: O::Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(mut observer) = observer {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.stopped = true;
      // nothing can be queued while active == 0
      if state.active == 0 { state.observer.take() } else { None }
    };
    if let Some(mut observer) = finished {
      observer.complete();
      self.group.unsubscribe();
    } else {
      self.source_slot.unsubscribe();
    }
  }
}

impl<'o, O, Inner> Observer for BoundedInnerLocal<'o, O, Inner>
where
  O: Observer + 'o,
  Inner: LocalObservable<'o, Item = O::Item, Err = O::Err> + 'o,
  Inner::Unsub: 'static,
{
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: O::Item) {
    if let Some(observer) = self.state.rc_deref_mut().observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, err: O::Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(mut observer) = observer {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self) {
    self.group.remove(self.key);
    let mut state = self.state.rc_deref_mut();
    if state.observer.is_none() {
      return;
    }
    if let Some(next_inner) = state.pending.pop_front() {
      drop(state);
      // one finished, one starts: `active` is unchanged during handoff
      subscribe_bounded_inner_local(next_inner, &self.state, &self.group);
    } else {
      state.active -= 1;
      let finished = if state.stopped && state.active == 0 {
        state.observer.take()
      } else {
        None
      };
      drop(state);
      if let Some(mut observer) = finished {
        observer.complete();
        self.group.unsubscribe();
      }
    }
  }
}

// ---------------------------------------------------------------------------
// Unbounded sink, Shared context

struct MergeOuterShared<O, Inner> {
  state: MutArc<MergeState<O>>,
  group: SharedSubscription,
  source_slot: SharedSlotSubscription,
  marker: PhantomData<Inner>,
}

struct MergeInnerShared<O> {
  state: MutArc<MergeState<O>>,
  group: SharedSubscription,
  key: usize,
}

fn subscribe_merge_inner_shared<O, Inner>(
  inner: Inner,
  state: &MutArc<MergeState<O>>,
  group: &SharedSubscription,
) where
  O: Observer + Send + 'static,
  Inner: SharedObservable<Item = O::Item, Err = O::Err>,
{
  let slot = SharedSlotSubscription::default();
  if let Some(key) = group.add(slot.clone()) {
    let unsub = inner.actual_subscribe(MergeInnerShared {
      state: state.clone(),
      group: group.clone(),
      key,
    });
    slot.set(unsub);
  }
}

impl<O, Inner> Observer for MergeOuterShared<O, Inner>
where
  O: Observer + Send + 'static,
  Inner: SharedObservable<Item = O::Item, Err = O::Err>,
{
  type Item = Inner;
  type Err = O::Err;

  fn next(&mut self, inner: Inner) {
    subscribe_merge_inner_shared(inner, &self.state, &self.group);
  }

  fn error(&mut self, err: O::Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(mut observer) = observer {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.stopped = true;
      if self.group.count() == 1 { state.observer.take() } else { None }
    };
    if let Some(mut observer) = finished {
      observer.complete();
      self.group.unsubscribe();
    } else {
      self.source_slot.unsubscribe();
    }
  }
}

impl<O> Observer for MergeInnerShared<O>
where
  O: Observer + Send + 'static,
{
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: O::Item) {
    if let Some(observer) = self.state.rc_deref_mut().observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, err: O::Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(mut observer) = observer {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self) {
    self.group.remove(self.key);
    let finished = {
      let mut state = self.state.rc_deref_mut();
      if state.stopped && self.group.count() == 1 {
        state.observer.take()
      } else {
        None
      }
    };
    if let Some(mut observer) = finished {
      observer.complete();
      self.group.unsubscribe();
    }
  }
}

// ---------------------------------------------------------------------------
// Bounded sink, Shared context

struct BoundedOuterShared<O, Inner> {
  state: MutArc<BoundedState<O, Inner>>,
  group: SharedSubscription,
  source_slot: SharedSlotSubscription,
  concurrent: usize,
}

struct BoundedInnerShared<O, Inner> {
  state: MutArc<BoundedState<O, Inner>>,
  group: SharedSubscription,
  key: usize,
}

fn subscribe_bounded_inner_shared<O, Inner>(
  inner: Inner,
  state: &MutArc<BoundedState<O, Inner>>,
  group: &SharedSubscription,
) where
  O: Observer + Send + 'static,
  Inner: SharedObservable<Item = O::Item, Err = O::Err> + Send + 'static,
{
  let slot = SharedSlotSubscription::default();
  if let Some(key) = group.add(slot.clone()) {
    let unsub = inner.actual_subscribe(BoundedInnerShared {
      state: state.clone(),
      group: group.clone(),
      key,
    });
    slot.set(unsub);
  }
}

impl<O, Inner> Observer for BoundedOuterShared<O, Inner>
where
  O: Observer + Send + 'static,
  Inner: SharedObservable<Item = O::Item, Err = O::Err> + Send + 'static,
{
  type Item = Inner;
  type Err = O::Err;

  fn next(&mut self, inner: Inner) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      if state.active >= self.concurrent {
        state.pending.push_back(inner);
        return;
      }
      state.active += 1;
    }
    subscribe_bounded_inner_shared(inner, &self.state, &self.group);
  }

  fn error(&mut self, err: O::Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(mut observer) = observer {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.rc_deref_mut();
      if state.observer.is_none() {
        return;
      }
      state.stopped = true;
      if state.active == 0 { state.observer.take() } else { None }
    };
    if let Some(mut observer) = finished {
      observer.complete();
      self.group.unsubscribe();
    } else {
      self.source_slot.unsubscribe();
    }
  }
}

impl<O, Inner> Observer for BoundedInnerShared<O, Inner>
where
  O: Observer + Send + 'static,
  Inner: SharedObservable<Item = O::Item, Err = O::Err> + Send + 'static,
{
  type Item = O::Item;
  type Err = O::Err;

  fn next(&mut self, value: O::Item) {
    if let Some(observer) = self.state.rc_deref_mut().observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, err: O::Err) {
    let observer = self.state.rc_deref_mut().observer.take();
    if let Some(mut observer) = observer {
      observer.error(err);
      self.group.unsubscribe();
    }
  }

  fn complete(&mut self) {
    self.group.remove(self.key);
    let mut state = self.state.rc_deref_mut();
    if state.observer.is_none() {
      return;
    }
    if let Some(next_inner) = state.pending.pop_front() {
      drop(state);
      subscribe_bounded_inner_shared(next_inner, &self.state, &self.group);
    } else {
      state.active -= 1;
      let finished = if state.stopped && state.active == 0 {
        state.observer.take()
      } else {
        None
      };
      drop(state);
      if let Some(mut observer) = finished {
        observer.complete();
        self.group.unsubscribe();
      }
    }
  }
}

// ---------------------------------------------------------------------------
// Subscribing the operator

impl<'o, S> LocalObservable<'o> for MergeAllOp<S>
where
  S: LocalObservable<'o>,
  S::Item: LocalObservable<'o, Err = S::Err> + 'o,
  S::Unsub: 'static,
  <S::Item as LocalObservable<'o>>::Unsub: 'static,
{
  type Unsub = (Box<dyn SubscriptionLike + 'o>, LocalSubscription);

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + 'o,
  {
    let group = LocalSubscription::default();
    let source_slot = LocalSlotSubscription::default();
    // the outer subscription's slot is the group's permanent first entry
    let _ = group.add(source_slot.clone());

    if self.concurrent == 0 {
      let state = MutRc::own(MergeState::new(observer));
      let outer = MergeOuterLocal {
        state: state.clone(),
        group: group.clone(),
        source_slot: source_slot.clone(),
        marker: PhantomData,
      };
      source_slot.set(self.source.actual_subscribe(outer));
      (Box::new(state), group)
    } else {
      let state = MutRc::own(BoundedState::new(observer));
      let outer = BoundedOuterLocal {
        state: state.clone(),
        group: group.clone(),
        source_slot: source_slot.clone(),
        concurrent: self.concurrent,
        marker: PhantomData,
      };
      source_slot.set(self.source.actual_subscribe(outer));
      (Box::new(state), group)
    }
  }
}

impl<S> SharedObservable for MergeAllOp<S>
where
  S: SharedObservable,
  S::Item: SharedObservable<Err = S::Err> + Send + 'static,
{
  type Unsub = (Box<dyn SubscriptionLike + Send>, SharedSubscription);

  fn actual_subscribe<O>(self, observer: O) -> Self::Unsub
  where
    O: Observer<Item = Self::Item, Err = Self::Err> + Send + 'static,
  {
    let group = SharedSubscription::default();
    let source_slot = SharedSlotSubscription::default();
    let _ = group.add(source_slot.clone());

    if self.concurrent == 0 {
      let state = MutArc::own(MergeState::new(observer));
      let outer = MergeOuterShared {
        state: state.clone(),
        group: group.clone(),
        source_slot: source_slot.clone(),
        marker: PhantomData,
      };
      source_slot.set(self.source.actual_subscribe(outer));
      (Box::new(state), group)
    } else {
      let state = MutArc::own(BoundedState::new(observer));
      let outer = BoundedOuterShared {
        state: state.clone(),
        group: group.clone(),
        source_slot: source_slot.clone(),
        concurrent: self.concurrent,
      };
      source_slot.set(self.source.actual_subscribe(outer));
      (Box::new(state), group)
    }
  }
}
