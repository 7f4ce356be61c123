//! # rivulet: push-based reactive streams
//!
//! A small reactive stream library whose centerpiece is the merge
//! operator: it turns an observable of observables into one output
//! observable, either without a concurrency limit or with a bounded
//! number of simultaneously running inner observables.
//!
//! ## Quick start
//!
//! ```rust
//! use rivulet::prelude::*;
//!
//! let mut values = vec![];
//! observable::from_iter(vec![
//!   observable::from_iter(vec![1, 2]),
//!   observable::from_iter(vec![3]),
//! ])
//! .merge_all(0) // 0 = no concurrency limit
//! .subscribe(|v| values.push(v));
//! assert_eq!(values, vec![1, 2, 3]);
//! ```
//!
//! ## Key concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | Names a stream's element and error types |
//! | [`Observer`] | Consumes `next`, `error` and `complete` events |
//! | [`LocalObservable`] / [`SharedObservable`] | Subscribe on one thread vs across threads |
//! | [`SubscriptionLike`] | Handle to cancel an active subscription |
//! | [`LocalSubject`] / [`SharedSubject`] | Multicast push sources |
//!
//! Downstream delivery is totally ordered: no matter how many threads
//! feed a merge, two events are never in flight to the same observer at
//! once, and exactly one terminal event (`error` or `complete`) is
//! delivered per subscription.
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`LocalObservable`]: observable::LocalObservable
//! [`SharedObservable`]: observable::SharedObservable
//! [`SubscriptionLike`]: subscription::SubscriptionLike
//! [`LocalSubject`]: subject::LocalSubject
//! [`SharedSubject`]: subject::SharedSubject

pub mod diagnostics;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod shared;
pub mod subject;
pub mod subscription;

pub use prelude::*;
