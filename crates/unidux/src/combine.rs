//! Combining slice reducers into one root reducer
//!
//! The combined state is a record keyed by slice name. Each child reducer
//! only ever sees its own slice. If no child changes its slice, the combined
//! reducer hands back the very same state, so the store skips notification.

use crate::error::{BoxError, StoreError};
use crate::reducer::{unchanged, ReduceResult, Reducer};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

type Slice = Rc<dyn Any>;

/// State record produced by a [`CombinedReducer`]
#[derive(Clone, Default)]
pub struct CombinedState {
    slices: Vec<(String, Slice)>,
}

impl CombinedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a slice, replacing any previous value under the same key
    pub fn with_slice<T: 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        let key = key.into();
        let value: Slice = Rc::new(value);

        match self.slices.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.slices.push((key, value)),
        }
        self
    }

    /// Borrow a slice, if present and of type `T`
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.raw(key)?.downcast_ref::<T>()
    }

    /// Shared handle to a slice, if present and of type `T`
    ///
    /// Slices that did not change keep their identity across dispatches, so
    /// the returned `Rc` can be compared with `Rc::ptr_eq`.
    pub fn slice<T: 'static>(&self, key: &str) -> Option<Rc<T>> {
        Rc::clone(self.raw(key)?).downcast::<T>().ok()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    fn raw(&self, key: &str) -> Option<&Slice> {
        self.slices
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, slice)| slice)
    }
}

impl fmt::Debug for CombinedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedState")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A child reducer with its state type erased
trait SliceReducer<A: ?Sized> {
    fn initial(&self) -> Result<Option<Slice>, BoxError>;
    fn reduce(&self, key: &str, slice: &Slice, action: &A) -> Result<Slice, BoxError>;
}

struct Erased<R>(R);

impl<A: ?Sized, R: Reducer<A>> SliceReducer<A> for Erased<R> {
    fn initial(&self) -> Result<Option<Slice>, BoxError> {
        Ok(self.0.initial_state()?.map(|state| state as Slice))
    }

    fn reduce(&self, key: &str, slice: &Slice, action: &A) -> Result<Slice, BoxError> {
        let typed = Rc::clone(slice)
            .downcast::<R::State>()
            .map_err(|_| StoreError::shape(key, "slice has an unexpected type"))?;

        // child errors pass through untouched
        let next = self.0.reduce(&typed, action)?;
        Ok(next as Slice)
    }
}

/// Builder returned by [`combine`]
pub struct CombineReducers<A: ?Sized> {
    children: Vec<(String, Box<dyn SliceReducer<A>>)>,
}

/// Start combining slice reducers into a single root reducer
///
/// ```rust
/// use std::rc::Rc;
/// use unidux::{combine, unchanged, FnReducer, RawAction, ReduceResult};
///
/// fn clicks(state: &Rc<u32>, action: &RawAction) -> ReduceResult<u32> {
///     match action.action_type.as_str() {
///         "CLICK" => Ok(Rc::new(**state + 1)),
///         _ => unchanged(state),
///     }
/// }
///
/// let root = combine::<RawAction>()
///     .slice("clicks", FnReducer::new(clicks).with_default(|| 0))
///     .build()?;
/// # let _ = root;
/// # Ok::<(), unidux::StoreError>(())
/// ```
pub fn combine<A: ?Sized>() -> CombineReducers<A> {
    CombineReducers {
        children: Vec::new(),
    }
}

impl<A: ?Sized + 'static> CombineReducers<A> {
    /// Add the reducer responsible for slice `key`
    ///
    /// Adding the same key twice replaces the earlier reducer.
    pub fn slice<R>(mut self, key: impl Into<String>, reducer: R) -> Self
    where
        R: Reducer<A> + 'static,
    {
        let key = key.into();
        let reducer: Box<dyn SliceReducer<A>> = Box::new(Erased(reducer));

        match self.children.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => {
                log::warn!("Reducer for slice \"{}\" registered twice, keeping the last", key);
                *slot = reducer;
            }
            None => self.children.push((key, reducer)),
        }
        self
    }

    /// Finish the combination
    ///
    /// Every child must define a default state; the first one that does not
    /// fails with [`StoreError::Shape`].
    pub fn build(self) -> Result<CombinedReducer<A>, StoreError> {
        for (key, child) in &self.children {
            if child.initial().map_err(StoreError::Reducer)?.is_none() {
                return Err(StoreError::shape(
                    key.as_str(),
                    "reducer returned no state for the init action",
                ));
            }
        }

        Ok(CombinedReducer {
            children: self.children,
        })
    }
}

/// Root reducer over a [`CombinedState`], see [`combine`]
pub struct CombinedReducer<A: ?Sized> {
    children: Vec<(String, Box<dyn SliceReducer<A>>)>,
}

impl<A: ?Sized> CombinedReducer<A> {
    fn default_slice(key: &str, child: &dyn SliceReducer<A>) -> Result<Slice, BoxError> {
        Ok(child
            .initial()?
            .ok_or_else(|| StoreError::shape(key, "reducer returned no state for the init action"))?)
    }
}

impl<A: ?Sized> Reducer<A> for CombinedReducer<A> {
    type State = CombinedState;

    fn initial_state(&self) -> Result<Option<Rc<CombinedState>>, BoxError> {
        let mut slices = Vec::with_capacity(self.children.len());
        for (key, child) in &self.children {
            slices.push((key.clone(), Self::default_slice(key, child.as_ref())?));
        }
        Ok(Some(Rc::new(CombinedState { slices })))
    }

    fn reduce(&self, state: &Rc<CombinedState>, action: &A) -> ReduceResult<CombinedState> {
        let mut changed = false;
        let mut slices = Vec::with_capacity(self.children.len());

        for (key, child) in &self.children {
            let next = match state.raw(key) {
                Some(previous) => {
                    let next = child.reduce(key, previous, action)?;
                    changed |= !Rc::ptr_eq(previous, &next);
                    next
                }
                None => {
                    let base = Self::default_slice(key, child.as_ref())?;
                    changed = true;
                    child.reduce(key, &base, action)?
                }
            };
            slices.push((key.clone(), next));
        }

        if state.len() != slices.len() {
            log::warn!(
                "Dropping state slices without a reducer: {:?}",
                state
                    .keys()
                    .filter(|key| !self.children.iter().any(|(k, _)| k == key))
                    .collect::<Vec<_>>()
            );
            changed = true;
        }

        if !changed {
            return unchanged(state);
        }

        Ok(Rc::new(CombinedState { slices }))
    }
}
