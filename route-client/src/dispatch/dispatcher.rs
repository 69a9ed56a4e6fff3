//! The dispatcher: fan-out of actions to registered stores.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use super::Action;
use super::store::StoreSink;

/// Token returned by [`Dispatcher::register`].
///
/// Deregistration consumes the token, so a store can be removed at most
/// once and can never be accidentally re-added by a cleanup path.
#[derive(Debug)]
pub struct StoreRegistration(u64);

struct DispatchQueue {
    pending: VecDeque<Action>,
    /// True while a dispatch loop is draining the queue.
    active: bool,
}

/// Synchronous single-channel action bus.
pub struct Dispatcher {
    stores: RwLock<Vec<(u64, Arc<dyn StoreSink>)>>,
    queue: Mutex<DispatchQueue>,
    next_id: AtomicU64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            stores: RwLock::new(Vec::new()),
            queue: Mutex::new(DispatchQueue {
                pending: VecDeque::new(),
                active: false,
            }),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a store; actions will be delivered in registration order.
    pub fn register(&self, store: Arc<dyn StoreSink>) -> StoreRegistration {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.stores
            .write()
            .expect("store list poisoned")
            .push((id, store));
        StoreRegistration(id)
    }

    /// Remove a previously registered store.
    pub fn deregister(&self, registration: StoreRegistration) {
        self.stores
            .write()
            .expect("store list poisoned")
            .retain(|(id, _)| *id != registration.0);
    }

    /// Dispatch an action to every registered store.
    ///
    /// Runs synchronously: by the time this returns, every store has
    /// reduced the action and notified its listeners. A re-entrant call
    /// (from a reducer or listener) enqueues the action; the outer dispatch
    /// drains it after the current action finishes.
    pub fn dispatch(&self, action: Action) {
        {
            let mut queue = self.queue.lock().expect("dispatch queue poisoned");
            queue.pending.push_back(action);
            if queue.active {
                // An outer dispatch is running; it will pick this up.
                return;
            }
            queue.active = true;
        }

        loop {
            let next = {
                let mut queue = self.queue.lock().expect("dispatch queue poisoned");
                match queue.pending.pop_front() {
                    Some(action) => action,
                    None => {
                        queue.active = false;
                        return;
                    }
                }
            };

            // Snapshot so a store may (de)register during delivery.
            let stores: Vec<Arc<dyn StoreSink>> = self
                .stores
                .read()
                .expect("store list poisoned")
                .iter()
                .map(|(_, s)| Arc::clone(s))
                .collect();

            for store in stores {
                store.apply(&next);
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Reducer, Store};

    /// Counts actions and makes the dispatch order observable.
    struct Tally;

    impl Reducer for Tally {
        type State = Vec<String>;

        fn initial_state(&self) -> Self::State {
            Vec::new()
        }

        fn reduce(&self, state: &Self::State, action: &Action) -> Self::State {
            let mut next = state.clone();
            if let Action::SelectMapLayer { layer } = action {
                next.push(layer.clone());
            }
            next
        }
    }

    fn layer(name: &str) -> Action {
        Action::SelectMapLayer {
            layer: name.to_string(),
        }
    }

    #[test]
    fn dispatch_reaches_registered_stores() {
        let dispatcher = Dispatcher::new();
        let store = Store::new(Tally);
        dispatcher.register(store.clone());

        dispatcher.dispatch(layer("satellite"));
        assert_eq!(store.state(), vec!["satellite".to_string()]);
    }

    #[test]
    fn deregistered_store_stops_receiving() {
        let dispatcher = Dispatcher::new();
        let store = Store::new(Tally);
        let registration = dispatcher.register(store.clone());

        dispatcher.dispatch(layer("one"));
        dispatcher.deregister(registration);
        dispatcher.dispatch(layer("two"));

        assert_eq!(store.state(), vec!["one".to_string()]);
    }

    #[test]
    fn reentrant_dispatch_is_queued_not_interleaved() {
        let dispatcher = Arc::new(Dispatcher::new());
        let store = Store::new(Tally);
        dispatcher.register(store.clone());

        // A listener that reacts to the first layer change by dispatching a
        // second one. The inner action must run after the outer action has
        // been fully delivered.
        let inner = Arc::clone(&dispatcher);
        store.subscribe(move |state: &Vec<String>| {
            if state.as_slice() == ["outer".to_string()] {
                inner.dispatch(layer("inner"));
            }
        });

        dispatcher.dispatch(layer("outer"));
        assert_eq!(store.state(), vec!["outer".to_string(), "inner".to_string()]);
    }

    #[test]
    fn queue_drains_in_fifo_order() {
        let dispatcher = Arc::new(Dispatcher::new());
        let store = Store::new(Tally);
        dispatcher.register(store.clone());

        let inner = Arc::clone(&dispatcher);
        store.subscribe(move |state: &Vec<String>| {
            if state.as_slice() == ["a".to_string()] {
                inner.dispatch(layer("b"));
                inner.dispatch(layer("c"));
            }
        });

        dispatcher.dispatch(layer("a"));
        assert_eq!(
            store.state(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
