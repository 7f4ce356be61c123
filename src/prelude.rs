//! Prelude module for convenient imports.

pub use crate::diagnostics;
pub use crate::observable;
pub use crate::observable::{
  empty, from_iter, of, throw, EmptyObservable, IterObservable,
  LocalObservable, Observable, ObserverAll, ObserverComp, ObserverN,
  OfObservable, SharedObservable, SubscribeAll, SubscribeComplete,
  SubscribeNext, ThrowObservable,
};
pub use crate::observer::Observer;
pub use crate::ops::merge_all::{merge, MergeAll, MergeAllOp};
pub use crate::rc::{MutArc, MutRc, RcDeref, RcDerefMut};
pub use crate::shared::{IntoShared, Shared};
pub use crate::subject::{LocalSubject, Publisher, SharedSubject, Subscriber};
pub use crate::subscription::{
  LocalSlotSubscription, LocalSubscription, SharedSlotSubscription,
  SharedSubscription, SingleSubscription, SubscriptionGuard,
  SubscriptionLike, SubscriptionWrapper,
};
