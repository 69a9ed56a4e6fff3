//! Synchronous action dispatch.
//!
//! A single-channel pub/sub bus: actions are dispatched to every registered
//! store, each store reduces its state, and stores whose state changed
//! notify their listeners before `dispatch` returns. Actions dispatched
//! from inside a reduce or listener are queued and drained after the
//! current action completes, never interleaved mid-reduce.

mod action;
mod dispatcher;
mod store;

pub use action::Action;
pub use dispatcher::{Dispatcher, StoreRegistration};
pub use store::{Reducer, Store, StoreSink, SubscriptionId};
