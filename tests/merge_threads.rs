//! Cross-thread merge scenarios: parallel producers, termination races
//! and cancellation.

use rivulet::prelude::*;
use std::{
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
  },
  thread,
};

#[test]
fn parallel_producers_deliver_everything_in_source_order() {
  let values = Arc::new(Mutex::new(Vec::new()));
  let completions = Arc::new(Mutex::new(0));
  let sink = values.clone();
  let done = completions.clone();

  let mut outer =
    SharedSubject::<SharedSubject<(usize, i32), ()>, ()>::new();
  let inners: Vec<SharedSubject<(usize, i32), ()>> =
    (0..4).map(|_| SharedSubject::new()).collect();

  outer.clone().flatten().into_shared().subscribe_complete(
    move |v| sink.lock().unwrap().push(v),
    move || *done.lock().unwrap() += 1,
  );

  for inner in &inners {
    outer.next(inner.clone());
  }

  let handles: Vec<_> = inners
    .iter()
    .enumerate()
    .map(|(id, inner)| {
      let mut producer = inner.clone();
      thread::spawn(move || {
        for v in 0..100 {
          producer.next((id, v));
        }
        producer.complete();
      })
    })
    .collect();
  for handle in handles {
    handle.join().unwrap();
  }
  outer.complete();

  let collected = values.lock().unwrap().clone();
  assert_eq!(collected.len(), 400);
  // the interleaving is arbitrary, but each producer's own order survives
  for id in 0..4 {
    let per_source: Vec<i32> = collected
      .iter()
      .filter(|(source, _)| *source == id)
      .map(|(_, v)| *v)
      .collect();
    assert_eq!(per_source, (0..100).collect::<Vec<_>>());
  }
  assert_eq!(*completions.lock().unwrap(), 1);
}

#[test]
fn unsubscribe_freezes_deliveries() {
  let values = Arc::new(Mutex::new(Vec::new()));
  let sink = values.clone();

  let mut outer = SharedSubject::<SharedSubject<i32, ()>, ()>::new();
  let inner = SharedSubject::<i32, ()>::new();

  let mut handle = outer
    .clone()
    .flatten()
    .into_shared()
    .subscribe(move |v| sink.lock().unwrap().push(v));

  outer.next(inner.clone());

  let stop = Arc::new(AtomicBool::new(false));
  let producer_stop = stop.clone();
  let mut producer = inner.clone();
  let producer_thread = thread::spawn(move || {
    let mut v = 0;
    while !producer_stop.load(Ordering::Relaxed) {
      producer.next(v);
      v += 1;
    }
  });

  // let some values flow, then cut the subscription
  while values.lock().unwrap().is_empty() {
    thread::yield_now();
  }
  handle.unsubscribe();
  let frozen = values.lock().unwrap().len();

  for _ in 0..1_000 {
    thread::yield_now();
  }
  assert_eq!(values.lock().unwrap().len(), frozen);

  stop.store(true, Ordering::Relaxed);
  producer_thread.join().unwrap();
}

#[test]
fn racing_errors_reach_downstream_once() {
  let errors = Arc::new(Mutex::new(0));
  let completions = Arc::new(Mutex::new(0));
  let raised = errors.clone();
  let done = completions.clone();

  let mut outer =
    SharedSubject::<SharedSubject<i32, &'static str>, &'static str>::new();
  let a = SharedSubject::<i32, &'static str>::new();
  let b = SharedSubject::<i32, &'static str>::new();

  outer.clone().flatten().into_shared().subscribe_all(
    |_| {},
    move |_| *raised.lock().unwrap() += 1,
    move || *done.lock().unwrap() += 1,
  );

  outer.next(a.clone());
  outer.next(b.clone());

  let handles: Vec<_> = [a, b]
    .into_iter()
    .map(|subject| {
      let mut failing = subject.clone();
      thread::spawn(move || failing.error("worker failed"))
    })
    .collect();
  for handle in handles {
    handle.join().unwrap();
  }

  assert_eq!(*errors.lock().unwrap(), 1);
  assert_eq!(*completions.lock().unwrap(), 0);
}

#[test]
fn bounded_shared_respects_limit_and_handoff_order() {
  let values = Arc::new(Mutex::new(Vec::new()));
  let completions = Arc::new(Mutex::new(0));
  let sink = values.clone();
  let done = completions.clone();

  let mut outer = SharedSubject::<SharedSubject<i32, ()>, ()>::new();
  let a = SharedSubject::<i32, ()>::new();
  let b = SharedSubject::<i32, ()>::new();

  outer.clone().merge_all(1).into_shared().subscribe_complete(
    move |v| sink.lock().unwrap().push(v),
    move || *done.lock().unwrap() += 1,
  );

  outer.next(a.clone());
  outer.next(b.clone());
  assert_eq!(a.subscribed_size(), 1);
  assert_eq!(b.subscribed_size(), 0);

  let mut first = a.clone();
  thread::spawn(move || {
    for v in 0..50 {
      first.next(v);
    }
    first.complete();
  })
  .join()
  .unwrap();

  // finishing the active inner activated the queued one
  assert_eq!(b.subscribed_size(), 1);

  let mut second = b.clone();
  thread::spawn(move || {
    for v in 50..100 {
      second.next(v);
    }
    second.complete();
  })
  .join()
  .unwrap();

  outer.complete();

  assert_eq!(*values.lock().unwrap(), (0..100).collect::<Vec<_>>());
  assert_eq!(*completions.lock().unwrap(), 1);
}

#[test]
fn merge_releases_every_tracked_resource() {
  diagnostics::enable();
  let before = diagnostics::snapshot();

  observable::from_iter(vec![
    observable::from_iter(0..10),
    observable::from_iter(10..20),
  ])
  .flatten()
  .into_shared()
  .subscribe(|_| {});

  let after = diagnostics::snapshot();
  // one merge ran to completion: its group and at least its outer slot
  // were created and torn down again
  assert!(after.groups_created > before.groups_created);
  assert!(after.groups_disposed > before.groups_disposed);
  assert!(after.slots_created > before.slots_created);
  assert!(after.slots_disposed > before.slots_disposed);
}
