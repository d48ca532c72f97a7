//! Middleware - observes (and may swallow) actions on their way to the reducer
//!
//! This is the only extension point of the store. Inspection tools hook in
//! here instead of the store special-casing them.

use crate::action::Action;
use crate::dispatcher::Dispatcher;
use crate::error::StoreError;
use crate::store::Store;
use std::cell::RefCell;
use std::rc::Rc;

/// Middleware trait - intercepts actions before they reach the reducer
pub trait Middleware<S, A> {
    /// Handle an action
    ///
    /// - `action`: The action being dispatched
    /// - `state`: Current state, before the reducer runs
    /// - `dispatcher`: Queue follow-up actions here; they are dispatched
    ///   through the whole chain once this action is done
    ///
    /// Returns `true` to continue the chain, `false` to consume the action
    fn handle(&mut self, action: &A, state: &S, dispatcher: &Dispatcher<A>) -> bool;

    /// Called after `action` produced a new, committed `state`
    fn committed(&mut self, _action: &A, _state: &Rc<S>, _dispatcher: &Dispatcher<A>) {}
}

/// LoggingMiddleware - logs all actions passing through
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<S, A: Action> Middleware<S, A> for LoggingMiddleware {
    fn handle(&mut self, action: &A, _state: &S, _dispatcher: &Dispatcher<A>) -> bool {
        log::debug!("Action: {:?}", action);
        true
    }

    fn committed(&mut self, action: &A, _state: &Rc<S>, _dispatcher: &Dispatcher<A>) {
        log::trace!("State committed after {}", action.action_type());
    }
}

/// Records every action that produced a committed state change
///
/// The recorder is a cheap handle: clone it before handing it to
/// [`Store::add_middleware`] to keep read access to the recording.
#[derive(Debug)]
pub struct ActionRecorder<A> {
    actions: Rc<RefCell<Vec<A>>>,
}

impl<A> Clone for ActionRecorder<A> {
    fn clone(&self) -> Self {
        Self {
            actions: Rc::clone(&self.actions),
        }
    }
}

impl<A> Default for ActionRecorder<A> {
    fn default() -> Self {
        Self {
            actions: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<A: Clone> ActionRecorder<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded actions, oldest first
    pub fn actions(&self) -> Vec<A> {
        self.actions.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.actions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.actions.borrow_mut().clear();
    }

    /// Dispatch the recorded actions, in order, into `store`
    pub fn replay<S: 'static>(&self, store: &Store<S, A>) -> Result<(), StoreError>
    where
        A: Action + 'static,
    {
        for action in self.actions() {
            store.dispatch(action)?;
        }
        Ok(())
    }
}

impl<S, A: Clone> Middleware<S, A> for ActionRecorder<A> {
    fn handle(&mut self, _action: &A, _state: &S, _dispatcher: &Dispatcher<A>) -> bool {
        true
    }

    fn committed(&mut self, action: &A, _state: &Rc<S>, _dispatcher: &Dispatcher<A>) {
        self.actions.borrow_mut().push(action.clone());
    }
}
