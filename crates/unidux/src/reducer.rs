//! Reducer trait and function adapters

use crate::error::BoxError;
use std::marker::PhantomData;
use std::rc::Rc;

/// Result of a single reduction step
pub type ReduceResult<S> = Result<Rc<S>, BoxError>;

/// Pure function computing the next state from the current state and an action
///
/// `reduce` must return the *same* `Rc` (a pointer clone) for actions it does
/// not handle; the store relies on pointer identity to decide whether
/// anything changed.
pub trait Reducer<A: ?Sized> {
    type State: 'static;

    /// Default state, used when the store is created without one.
    ///
    /// Returns `Ok(None)` if the reducer defines no default.
    fn initial_state(&self) -> Result<Option<Rc<Self::State>>, BoxError>;

    fn reduce(&self, state: &Rc<Self::State>, action: &A) -> ReduceResult<Self::State>;
}

impl<A: ?Sized, R: Reducer<A> + ?Sized> Reducer<A> for Box<R> {
    type State = R::State;

    fn initial_state(&self) -> Result<Option<Rc<Self::State>>, BoxError> {
        (**self).initial_state()
    }

    fn reduce(&self, state: &Rc<Self::State>, action: &A) -> ReduceResult<Self::State> {
        (**self).reduce(state, action)
    }
}

/// Convenience for the fall-through arm of a reducer
pub fn unchanged<S>(state: &Rc<S>) -> ReduceResult<S> {
    Ok(Rc::clone(state))
}

/// Adapts a plain function or closure into a [`Reducer`]
pub struct FnReducer<S, A: ?Sized, F> {
    reduce: F,
    default: Option<Box<dyn Fn() -> S>>,
    _action: PhantomData<fn(&A)>,
}

impl<S: 'static, A: ?Sized, F> FnReducer<S, A, F> {
    pub fn new(reduce: F) -> Self
    where
        F: Fn(&Rc<S>, &A) -> ReduceResult<S>,
    {
        Self {
            reduce,
            default: None,
            _action: PhantomData,
        }
    }

    /// Give the reducer a default state
    pub fn with_default(mut self, default: impl Fn() -> S + 'static) -> Self {
        self.default = Some(Box::new(default));
        self
    }
}

impl<S: 'static, A: ?Sized, F> Reducer<A> for FnReducer<S, A, F>
where
    F: Fn(&Rc<S>, &A) -> ReduceResult<S>,
{
    type State = S;

    fn initial_state(&self) -> Result<Option<Rc<S>>, BoxError> {
        Ok(self.default.as_ref().map(|default| Rc::new(default())))
    }

    fn reduce(&self, state: &Rc<S>, action: &A) -> ReduceResult<S> {
        (self.reduce)(state, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::RawAction;

    fn add(state: &Rc<i64>, action: &RawAction) -> ReduceResult<i64> {
        match action.action_type.as_str() {
            "ADD" => Ok(Rc::new(**state + 1)),
            _ => unchanged(state),
        }
    }

    #[test]
    fn test_fn_reducer_without_default() {
        let reducer = FnReducer::new(add);
        assert!(reducer.initial_state().unwrap().is_none());
    }

    #[test]
    fn test_fn_reducer_default_and_reduce() {
        let reducer = FnReducer::new(add).with_default(|| 10);
        let state = reducer.initial_state().unwrap().unwrap();
        assert_eq!(*state, 10);

        let next = reducer.reduce(&state, &RawAction::new("ADD")).unwrap();
        assert_eq!(*next, 11);

        let same = reducer.reduce(&state, &RawAction::new("OTHER")).unwrap();
        assert!(Rc::ptr_eq(&state, &same));
    }

    #[test]
    fn test_boxed_reducer_delegates() {
        let reducer: Box<dyn Reducer<RawAction, State = i64>> =
            Box::new(FnReducer::new(add).with_default(|| 1));
        let state = reducer.initial_state().unwrap().unwrap();
        assert_eq!(*reducer.reduce(&state, &RawAction::new("ADD")).unwrap(), 2);
    }
}
