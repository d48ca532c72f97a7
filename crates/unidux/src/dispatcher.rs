//! Dispatcher for middleware follow-up actions
//!
//! Middleware runs while the store is in the middle of a dispatch, so it
//! cannot call [`Store::dispatch`](crate::Store::dispatch) itself. It queues
//! follow-up actions on the `Dispatcher` it is handed instead. The store
//! dispatches the queue once the current action has been fully processed, and
//! each queued action goes through the full middleware chain again.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Queue of actions to dispatch after the current one
pub struct Dispatcher<A> {
    queue: Rc<RefCell<VecDeque<A>>>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl<A> Default for Dispatcher<A> {
    fn default() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }
}

impl<A> Dispatcher<A> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue `action`; it is dispatched after the current action completes
    pub fn dispatch(&self, action: A) {
        self.queue.borrow_mut().push_back(action);
    }

    /// Number of queued actions
    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Take the oldest queued action
    pub(crate) fn pop(&self) -> Option<A> {
        self.queue.borrow_mut().pop_front()
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("queued", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo_and_shared_between_clones() {
        let dispatcher = Dispatcher::new();
        let handle = dispatcher.clone();

        dispatcher.dispatch("first");
        handle.dispatch("second");

        assert_eq!(dispatcher.len(), 2);
        assert_eq!(handle.pop(), Some("first"));
        assert_eq!(dispatcher.pop(), Some("second"));
        assert_eq!(dispatcher.pop(), None);
        assert!(handle.is_empty());
    }
}
