use super::actions::CounterAction;
use std::rc::Rc;
use unidux::{BoxError, ReduceResult, Reducer};

/// Counter reducer, starts at 0
#[derive(Debug, Default, Clone, Copy)]
pub struct CounterReducer;

impl Reducer<CounterAction> for CounterReducer {
    type State = i64;

    fn initial_state(&self) -> Result<Option<Rc<i64>>, BoxError> {
        Ok(Some(Rc::new(0)))
    }

    fn reduce(&self, state: &Rc<i64>, action: &CounterAction) -> ReduceResult<i64> {
        let next = match action {
            CounterAction::Increment => **state + 1,
            CounterAction::Decrement => **state - 1,
        };
        Ok(Rc::new(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use unidux::Store;

    #[test]
    fn test_increment_three_times_decrement_once() {
        let store = Store::new(CounterReducer).unwrap();

        store.dispatch(CounterAction::Increment).unwrap();
        store.dispatch(CounterAction::Increment).unwrap();
        store.dispatch(CounterAction::Increment).unwrap();
        store.dispatch(CounterAction::Decrement).unwrap();

        assert_eq!(*store.state(), 2);
    }

    #[test]
    fn test_listener_called_once_per_dispatch_until_unsubscribed() {
        let store = Store::new(CounterReducer).unwrap();
        let calls = Rc::new(Cell::new(0));
        let counted = Rc::clone(&calls);
        let unsubscribe = store.subscribe(move || counted.set(counted.get() + 1));

        store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(calls.get(), 1);

        unsubscribe.unsubscribe();
        store.dispatch(CounterAction::Increment).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_counter_can_go_negative() {
        let store = Store::with_state(CounterReducer, 0);
        store.dispatch(CounterAction::Decrement).unwrap();
        assert_eq!(*store.state(), -1);
    }
}
