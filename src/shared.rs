//! The thread-safe subscribe surface.
//!
//! `Shared` is a zero-cost marker wrapper: it routes the subscribe sugar
//! (`subscribe`, `subscribe_complete`, `subscribe_all`) to
//! [`SharedObservable::actual_subscribe`] instead of the Local one.

use crate::observable::SharedObservable;

#[derive(Clone)]
pub struct Shared<S>(pub(crate) S);

pub trait IntoShared: Sized {
  /// Lifts a thread-safe observable into the shared subscribe API.
  fn into_shared(self) -> Shared<Self> { Shared(self) }
}

impl<S: SharedObservable> IntoShared for S {}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn shared_subscribe_compiles_for_send_observers() {
    let collected = Arc::new(Mutex::new(Vec::new()));
    let sink = collected.clone();
    observable::from_iter(0..3)
      .into_shared()
      .subscribe(move |v| sink.lock().unwrap().push(v));
    assert_eq!(*collected.lock().unwrap(), vec![0, 1, 2]);
  }
}
