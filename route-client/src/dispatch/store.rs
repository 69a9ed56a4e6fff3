//! Generic reducer-backed state container.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::Action;

/// A pure state-transition function over the action vocabulary.
///
/// `reduce` must not mutate in place or perform I/O; it returns the next
/// state, and the store swaps the whole state reference when it differs
/// from the current one.
pub trait Reducer: Send + Sync + 'static {
    type State: Clone + PartialEq + Send + Sync + 'static;

    fn initial_state(&self) -> Self::State;

    fn reduce(&self, state: &Self::State, action: &Action) -> Self::State;
}

/// Object-safe view of a store as seen by the [`Dispatcher`].
///
/// [`Dispatcher`]: super::Dispatcher
pub trait StoreSink: Send + Sync {
    fn apply(&self, action: &Action);
}

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Token identifying a listener subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// A state container driven by a [`Reducer`].
///
/// The store exclusively owns its state tree; readers get clones of the
/// current snapshot. Listeners run synchronously after a state swap, inside
/// the dispatch that caused it.
pub struct Store<R: Reducer> {
    reducer: R,
    state: RwLock<R::State>,
    listeners: RwLock<Vec<(u64, Listener<R::State>)>>,
    next_subscription: AtomicU64,
}

impl<R: Reducer> Store<R> {
    pub fn new(reducer: R) -> Arc<Self> {
        let state = RwLock::new(reducer.initial_state());
        Arc::new(Self {
            reducer,
            state,
            listeners: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        })
    }

    /// A clone of the current state snapshot.
    pub fn state(&self) -> R::State {
        self.state.read().expect("state lock poisoned").clone()
    }

    /// Subscribe to state changes. The callback observes the new state.
    pub fn subscribe(
        &self,
        listener: impl Fn(&R::State) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .write()
            .expect("listener list poisoned")
            .push((id, Arc::new(listener)));
        SubscriptionId(id)
    }

    /// Remove a listener. Removes exactly once; calling again is a no-op.
    pub fn unsubscribe(&self, subscription: SubscriptionId) {
        self.listeners
            .write()
            .expect("listener list poisoned")
            .retain(|(id, _)| *id != subscription.0);
    }
}

impl<R: Reducer> StoreSink for Store<R> {
    fn apply(&self, action: &Action) {
        let next = {
            let current = self.state.read().expect("state lock poisoned");
            self.reducer.reduce(&current, action)
        };

        let changed = {
            let mut current = self.state.write().expect("state lock poisoned");
            if *current != next {
                *current = next;
                true
            } else {
                false
            }
        };

        if changed {
            let snapshot = self.state();
            let listeners: Vec<Listener<R::State>> = self
                .listeners
                .read()
                .expect("listener list poisoned")
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect();
            for listener in listeners {
                listener(&snapshot);
            }
        }
    }
}
