use crate::action::{self, Action, INIT_ACTION_TYPE};
use crate::dispatcher::Dispatcher;
use crate::error::StoreError;
use crate::middleware::Middleware;
use crate::reducer::Reducer;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Listener = Rc<dyn Fn()>;
type Listeners = RefCell<Vec<(u64, Listener)>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Middleware,
    Reducing,
}

struct Inner<S, A> {
    reducer: Box<dyn Reducer<A, State = S>>,
    state: RefCell<Rc<S>>,
    listeners: Rc<Listeners>,
    middleware: RefCell<Vec<Box<dyn Middleware<S, A>>>>,
    follow_ups: Dispatcher<A>,
    phase: Cell<Phase>,
    next_listener_id: Cell<u64>,
}

/// Store - holds application state and runs the dispatch loop
///
/// The Store follows the unidirectional pattern:
/// - One current state value, replaced wholesale on every change
/// - Actions are dispatched to request changes
/// - A pure reducer computes the next state
/// - Subscribers are notified after every committed change
///
/// `Store` is a cheap handle; clones share the same state. It is
/// single-threaded by construction (`!Send`), so the host must drive it from
/// one thread, e.g. the UI event loop.
///
/// # Example
/// ```rust
/// use std::rc::Rc;
/// use unidux::{unchanged, FnReducer, RawAction, ReduceResult, Store};
///
/// fn counter(state: &Rc<i64>, action: &RawAction) -> ReduceResult<i64> {
///     match action.action_type.as_str() {
///         "INCREMENT" => Ok(Rc::new(**state + 1)),
///         _ => unchanged(state),
///     }
/// }
///
/// let store = Store::new(FnReducer::new(counter).with_default(|| 0))?;
/// store.dispatch(RawAction::new("INCREMENT"))?;
/// assert_eq!(*store.state(), 1);
/// # Ok::<(), unidux::StoreError>(())
/// ```
pub struct Store<S, A> {
    inner: Rc<Inner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: 'static, A: Action + 'static> Store<S, A> {
    /// Create a store whose initial state is the reducer's default
    ///
    /// Fails if the reducer errors while producing its default, or has none.
    pub fn new<R>(reducer: R) -> Result<Self, StoreError>
    where
        R: Reducer<A, State = S> + 'static,
    {
        let initial = reducer
            .initial_state()
            .map_err(StoreError::Reducer)?
            .ok_or(StoreError::MissingInitialState)?;

        log::debug!("Store initialized via {}", INIT_ACTION_TYPE);
        Ok(Self::from_parts(Box::new(reducer), initial))
    }

    /// Create a store with an explicit initial state
    pub fn with_state<R>(reducer: R, initial: S) -> Self
    where
        R: Reducer<A, State = S> + 'static,
    {
        Self::from_parts(Box::new(reducer), Rc::new(initial))
    }

    fn from_parts(reducer: Box<dyn Reducer<A, State = S>>, initial: Rc<S>) -> Self {
        Self {
            inner: Rc::new(Inner {
                reducer,
                state: RefCell::new(initial),
                listeners: Rc::new(RefCell::new(Vec::new())),
                middleware: RefCell::new(Vec::new()),
                follow_ups: Dispatcher::new(),
                phase: Cell::new(Phase::Idle),
                next_listener_id: Cell::new(0),
            }),
        }
    }

    /// Add middleware to the store
    ///
    /// Middleware is called in the order it was added.
    pub fn add_middleware<M>(&self, middleware: M)
    where
        M: Middleware<S, A> + 'static,
    {
        self.inner.middleware.borrow_mut().push(Box::new(middleware));
    }

    /// Get the current state
    pub fn state(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Dispatch an action through the middleware chain, then the reducer
    ///
    /// Subscribers run synchronously, in registration order, before this
    /// returns. They may dispatch again; such nested dispatches complete
    /// before the remaining subscribers of the outer pass are called.
    /// Actions queued by middleware on its [`Dispatcher`] are dispatched
    /// after that, each through the full chain.
    ///
    /// Returns the action unchanged so calls can be chained or logged.
    pub fn dispatch(&self, action: A) -> Result<A, StoreError> {
        match self.inner.phase.get() {
            Phase::Idle => {}
            Phase::Reducing => {
                log::warn!(
                    "Rejected {} dispatched from inside a reducer",
                    action.action_type()
                );
                return Err(StoreError::ReducerDispatch);
            }
            Phase::Middleware => {
                log::warn!(
                    "Rejected {} dispatched from inside middleware",
                    action.action_type()
                );
                return Err(StoreError::MiddlewareDispatch);
            }
        }

        action::validate(&action)?;

        let result = self.process(action);
        self.dispatch_follow_ups();
        result
    }

    fn process(&self, action: A) -> Result<A, StoreError> {
        let current = self.state();

        let should_reduce = {
            let _phase = PhaseGuard::enter(&self.inner.phase, Phase::Middleware);
            self.inner
                .middleware
                .borrow_mut()
                .iter_mut()
                .all(|middleware| middleware.handle(&action, &current, &self.inner.follow_ups))
        };

        if !should_reduce {
            log::trace!("{} consumed by middleware", action.action_type());
            return Ok(action);
        }

        let next = {
            let _phase = PhaseGuard::enter(&self.inner.phase, Phase::Reducing);
            self.inner
                .reducer
                .reduce(&current, &action)
                .map_err(StoreError::Reducer)?
        };

        if Rc::ptr_eq(&current, &next) {
            log::trace!("{} left state unchanged", action.action_type());
            return Ok(action);
        }

        *self.inner.state.borrow_mut() = Rc::clone(&next);

        {
            let _phase = PhaseGuard::enter(&self.inner.phase, Phase::Middleware);
            for middleware in self.inner.middleware.borrow_mut().iter_mut() {
                middleware.committed(&action, &next, &self.inner.follow_ups);
            }
        }

        self.notify();
        Ok(action)
    }

    fn dispatch_follow_ups(&self) {
        while let Some(action) = self.inner.follow_ups.pop() {
            let action_type = action.action_type().to_string();
            if let Err(e) = self.dispatch(action) {
                log::warn!("Follow-up {} failed: {}", action_type, e);
            }
        }
    }

    /// A dispatch-only capability, for handing to code that should not see
    /// the rest of the store
    pub fn dispatcher(&self) -> impl Fn(A) -> Result<A, StoreError> + Clone + 'static {
        let store = self.clone();
        move |action| store.dispatch(action)
    }

    /// Register a listener, called after every committed state change
    ///
    /// Registering the same closure twice registers it twice.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Unsubscribe {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);

        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        Unsubscribe {
            id,
            listeners: Rc::downgrade(&self.inner.listeners),
        }
    }

    /// Number of currently registered listeners
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// A handle that does not keep the store alive
    ///
    /// Use this when a subscriber needs to reach back into the store, so the
    /// store and its listeners do not form a reference cycle.
    pub fn downgrade(&self) -> WeakStore<S, A> {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn notify(&self) {
        // Listeners added or removed from here on only affect later passes
        let snapshot: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in snapshot {
            listener();
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.borrow())
            .field("subscribers", &self.inner.listeners.borrow().len())
            .finish()
    }
}

/// Non-owning store handle, see [`Store::downgrade`]
pub struct WeakStore<S, A> {
    inner: Weak<Inner<S, A>>,
}

impl<S, A> Clone for WeakStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S, A> WeakStore<S, A> {
    pub fn upgrade(&self) -> Option<Store<S, A>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

/// Capability returned by [`Store::subscribe`]
///
/// Calling [`Unsubscribe::unsubscribe`] removes exactly the registration it
/// was created for; further calls do nothing. Dropping it does *not*
/// unsubscribe.
#[derive(Clone)]
pub struct Unsubscribe {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Unsubscribe {
    pub fn unsubscribe(&self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };

        let mut listeners = listeners.borrow_mut();
        if let Some(index) = listeners.iter().position(|(id, _)| *id == self.id) {
            listeners.remove(index);
        }
    }

    /// Whether the registration is still present
    pub fn is_active(&self) -> bool {
        let Some(listeners) = self.listeners.upgrade() else {
            return false;
        };

        let active = listeners.borrow().iter().any(|(id, _)| *id == self.id);
        active
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").field("id", &self.id).finish()
    }
}

/// Holds the store in `phase` until dropped, also on the error path
struct PhaseGuard<'a> {
    phase: &'a Cell<Phase>,
}

impl<'a> PhaseGuard<'a> {
    fn enter(phase: &'a Cell<Phase>, entered: Phase) -> Self {
        phase.set(entered);
        Self { phase }
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(Phase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::RawAction;
    use crate::error::BoxError;
    use crate::reducer::{unchanged, FnReducer, ReduceResult};
    use std::error::Error as _;

    fn counter(state: &Rc<i64>, action: &RawAction) -> ReduceResult<i64> {
        match action.action_type.as_str() {
            "INCREMENT" => Ok(Rc::new(**state + 1)),
            "DECREMENT" => Ok(Rc::new(**state - 1)),
            _ => unchanged(state),
        }
    }

    fn counter_store() -> Store<i64, RawAction> {
        Store::new(FnReducer::new(counter).with_default(|| 0)).unwrap()
    }

    fn act(action_type: &str) -> RawAction {
        RawAction::new(action_type)
    }

    #[derive(Debug, thiserror::Error)]
    #[error("division by zero")]
    struct DivideByZero;

    #[test]
    fn test_counter_scenario() {
        let store = counter_store();
        store.dispatch(act("INCREMENT")).unwrap();
        store.dispatch(act("INCREMENT")).unwrap();
        store.dispatch(act("INCREMENT")).unwrap();
        store.dispatch(act("DECREMENT")).unwrap();
        assert_eq!(*store.state(), 2);
    }

    #[test]
    fn test_explicit_initial_state_wins_over_default() {
        let store = Store::with_state(FnReducer::new(counter).with_default(|| 0), 40);
        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(*store.state(), 41);
    }

    #[test]
    fn test_missing_default_fails_construction() {
        let result = Store::<i64, RawAction>::new(FnReducer::new(counter));
        assert!(matches!(result, Err(StoreError::MissingInitialState)));
    }

    #[test]
    fn test_failing_default_fails_construction() {
        struct Broken;

        impl Reducer<RawAction> for Broken {
            type State = i64;

            fn initial_state(&self) -> Result<Option<Rc<i64>>, BoxError> {
                Err(Box::new(DivideByZero))
            }

            fn reduce(&self, state: &Rc<i64>, _action: &RawAction) -> ReduceResult<i64> {
                unchanged(state)
            }
        }

        let result = Store::new(Broken);
        assert!(matches!(result, Err(StoreError::Reducer(_))));
    }

    #[test]
    fn test_dispatch_returns_action() {
        let store = counter_store();
        let action = act("INCREMENT").with("source", "button");
        let returned = store.dispatch(action.clone()).unwrap();
        assert_eq!(returned, action);
    }

    #[test]
    fn test_determinism() {
        let actions = ["INCREMENT", "DECREMENT", "INCREMENT", "INCREMENT", "NOOP"];
        let first = counter_store();
        let second = counter_store();

        for action_type in actions {
            first.dispatch(act(action_type)).unwrap();
            second.dispatch(act(action_type)).unwrap();
        }

        assert_eq!(*first.state(), *second.state());
    }

    #[test]
    fn test_no_op_keeps_state_and_skips_subscribers() {
        let store = counter_store();
        let calls = Rc::new(Cell::new(0));
        let counted = Rc::clone(&calls);
        store.subscribe(move || counted.set(counted.get() + 1));

        let before = store.state();
        store.dispatch(act("UNKNOWN")).unwrap();

        assert!(Rc::ptr_eq(&before, &store.state()));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_invalid_action_is_rejected_without_mutation() {
        let store = counter_store();
        let calls = Rc::new(Cell::new(0));
        let counted = Rc::clone(&calls);
        store.subscribe(move || counted.set(counted.get() + 1));
        let before = store.state();

        let err = store.dispatch(act("")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidAction(_)));

        let err = store.dispatch(act(INIT_ACTION_TYPE)).unwrap_err();
        assert!(matches!(err, StoreError::InvalidAction(_)));

        assert!(Rc::ptr_eq(&before, &store.state()));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let store = counter_store();
        let calls = Rc::new(Cell::new(0));
        let counted = Rc::clone(&calls);
        let unsubscribe = store.subscribe(move || counted.set(counted.get() + 1));

        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(calls.get(), 1);

        unsubscribe.unsubscribe();
        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_subscribers_called_in_registration_order() {
        let store = counter_store();
        let order = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            store.subscribe(move || order.borrow_mut().push(name));
        }

        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_twice_is_a_no_op() {
        let store = counter_store();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let a_calls = Rc::clone(&calls);
        let a = store.subscribe(move || a_calls.borrow_mut().push("a"));
        let b_calls = Rc::clone(&calls);
        store.subscribe(move || b_calls.borrow_mut().push("b"));

        a.unsubscribe();
        a.unsubscribe();
        assert!(!a.is_active());
        assert_eq!(store.subscriber_count(), 1);

        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(*calls.borrow(), vec!["b"]);
    }

    #[test]
    fn test_same_listener_twice_is_called_twice() {
        let store = counter_store();
        let calls = Rc::new(Cell::new(0));
        let counted = Rc::clone(&calls);
        let listener = Rc::new(move || counted.set(counted.get() + 1));

        let first = Rc::clone(&listener);
        let once = store.subscribe(move || first());
        let second = Rc::clone(&listener);
        store.subscribe(move || second());

        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(calls.get(), 2);

        once.unsubscribe();
        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_self_unsubscribe_during_notification() {
        let store = counter_store();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let handle: Rc<RefCell<Option<Unsubscribe>>> = Rc::new(RefCell::new(None));

        let once_calls = Rc::clone(&calls);
        let once_handle = Rc::clone(&handle);
        let unsubscribe = store.subscribe(move || {
            once_calls.borrow_mut().push("once");
            if let Some(unsubscribe) = once_handle.borrow().as_ref() {
                unsubscribe.unsubscribe();
            }
        });
        *handle.borrow_mut() = Some(unsubscribe);

        let other_calls = Rc::clone(&calls);
        store.subscribe(move || other_calls.borrow_mut().push("other"));

        store.dispatch(act("INCREMENT")).unwrap();
        store.dispatch(act("INCREMENT")).unwrap();

        assert_eq!(*calls.borrow(), vec!["once", "other", "other"]);
    }

    #[test]
    fn test_subscriber_added_during_notification_waits_for_next_pass() {
        let store = counter_store();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let weak = store.downgrade();

        let outer_calls = Rc::clone(&calls);
        store.subscribe(move || {
            outer_calls.borrow_mut().push("outer");
            if let Some(store) = weak.upgrade() {
                if store.subscriber_count() == 1 {
                    let late_calls = Rc::clone(&outer_calls);
                    store.subscribe(move || late_calls.borrow_mut().push("late"));
                }
            }
        });

        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(*calls.borrow(), vec!["outer"]);

        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(*calls.borrow(), vec!["outer", "outer", "late"]);
    }

    #[test]
    fn test_subscriber_reads_committed_state() {
        let store = counter_store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let weak = store.downgrade();

        let recorded = Rc::clone(&seen);
        store.subscribe(move || {
            if let Some(store) = weak.upgrade() {
                recorded.borrow_mut().push(*store.state());
            }
        });

        store.dispatch(act("INCREMENT")).unwrap();
        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_nested_dispatch_from_subscriber_runs_to_completion() {
        let store = counter_store();
        let log = Rc::new(RefCell::new(Vec::new()));

        let weak = store.downgrade();
        let first_log = Rc::clone(&log);
        store.subscribe(move || {
            let Some(store) = weak.upgrade() else {
                return;
            };
            let value = *store.state();
            first_log.borrow_mut().push(format!("first:{value}"));
            if value == 1 {
                store.dispatch(act("INCREMENT")).unwrap();
            }
        });

        let weak = store.downgrade();
        let second_log = Rc::clone(&log);
        store.subscribe(move || {
            if let Some(store) = weak.upgrade() {
                second_log
                    .borrow_mut()
                    .push(format!("second:{}", store.state()));
            }
        });

        store.dispatch(act("INCREMENT")).unwrap();

        assert_eq!(*store.state(), 2);
        assert_eq!(
            *log.borrow(),
            vec!["first:1", "first:2", "second:2", "second:2"]
        );
    }

    #[test]
    fn test_dispatch_from_reducer_is_rejected() {
        let slot: Rc<RefCell<Option<WeakStore<i64, RawAction>>>> = Rc::new(RefCell::new(None));
        let inner_result: Rc<RefCell<Option<StoreError>>> = Rc::new(RefCell::new(None));

        let reducer_slot = Rc::clone(&slot);
        let reducer_result = Rc::clone(&inner_result);
        let reducer = FnReducer::new(move |state: &Rc<i64>, action: &RawAction| {
            let store = reducer_slot.borrow().as_ref().and_then(WeakStore::upgrade);
            if let Some(store) = store {
                *reducer_result.borrow_mut() = store.dispatch(act("INCREMENT")).err();
            }
            counter(state, action)
        })
        .with_default(|| 0);

        let store = Store::new(reducer).unwrap();
        *slot.borrow_mut() = Some(store.downgrade());

        store.dispatch(act("INCREMENT")).unwrap();

        assert!(matches!(
            *inner_result.borrow(),
            Some(StoreError::ReducerDispatch)
        ));
        assert_eq!(*store.state(), 1);

        // the store is idle again afterwards
        *slot.borrow_mut() = None;
        store.dispatch(act("INCREMENT")).unwrap();
        assert_eq!(*store.state(), 2);
    }

    #[test]
    fn test_reducer_dispatch_rejected_before_validation() {
        let slot: Rc<RefCell<Option<WeakStore<i64, RawAction>>>> = Rc::new(RefCell::new(None));
        let inner_result: Rc<RefCell<Option<StoreError>>> = Rc::new(RefCell::new(None));

        let reducer_slot = Rc::clone(&slot);
        let reducer_result = Rc::clone(&inner_result);
        let reducer = FnReducer::new(move |state: &Rc<i64>, action: &RawAction| {
            let store = reducer_slot.borrow().as_ref().and_then(WeakStore::upgrade);
            if let Some(store) = store {
                *reducer_result.borrow_mut() = store.dispatch(act("")).err();
            }
            counter(state, action)
        })
        .with_default(|| 0);

        let store = Store::new(reducer).unwrap();
        *slot.borrow_mut() = Some(store.downgrade());

        store.dispatch(act("INCREMENT")).unwrap();

        assert!(matches!(
            *inner_result.borrow(),
            Some(StoreError::ReducerDispatch)
        ));
        assert_eq!(*store.state(), 1);
    }

    #[test]
    fn test_reducer_error_propagates_and_keeps_state() {
        let reducer = FnReducer::new(|state: &Rc<i64>, action: &RawAction| {
            if action.action_type == "DIVIDE" {
                let divisor = action.get("by").and_then(|v| v.as_i64()).unwrap_or(0);
                if divisor == 0 {
                    return Err(Box::new(DivideByZero) as BoxError);
                }
                return Ok(Rc::new(**state / divisor));
            }
            counter(state, action)
        })
        .with_default(|| 10);
        let store = Store::new(reducer).unwrap();
        let calls = Rc::new(Cell::new(0));
        let counted = Rc::clone(&calls);
        store.subscribe(move || counted.set(counted.get() + 1));

        let before = store.state();
        let err = store.dispatch(act("DIVIDE")).unwrap_err();

        assert!(matches!(err, StoreError::Reducer(_)));
        let source = err.source().expect("reducer error kept as source");
        assert!(source.downcast_ref::<DivideByZero>().is_some());
        assert!(Rc::ptr_eq(&before, &store.state()));
        assert_eq!(calls.get(), 0);

        store.dispatch(act("DIVIDE").with("by", 2)).unwrap();
        assert_eq!(*store.state(), 5);
    }

    #[test]
    fn test_dispatcher_capability() {
        let store = counter_store();
        let dispatch = store.dispatcher();
        let again = dispatch.clone();

        dispatch(act("INCREMENT")).unwrap();
        again(act("INCREMENT")).unwrap();
        assert_eq!(*store.state(), 2);
    }

    #[test]
    fn test_weak_store_does_not_keep_store_alive() {
        let store = counter_store();
        let weak = store.downgrade();
        assert!(weak.upgrade().is_some());

        drop(store);
        assert!(weak.upgrade().is_none());
    }
}
