//! Binding action creators to a dispatch function
//!
//! Saves repeating `dispatch(creator(...))` at every call site.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Boxed action creator, as accepted by [`bind_all`]
pub type ActionCreator<Args, A> = Box<dyn Fn(Args) -> A>;

/// Wrap `creator` so that calling it also dispatches the created action
///
/// The wrapper returns whatever `dispatch` returns.
pub fn bind<Args, A, R, C, D>(creator: C, dispatch: D) -> impl Fn(Args) -> R
where
    C: Fn(Args) -> A,
    D: Fn(A) -> R,
{
    move |args| dispatch(creator(args))
}

/// A set of action creators bound to the same dispatch function
pub struct BoundActionCreators<K, Args, R> {
    bound: HashMap<K, Box<dyn Fn(Args) -> R>>,
}

/// Bind every creator in `creators` to `dispatch`
pub fn bind_all<K, Args, A, R, I, D>(creators: I, dispatch: D) -> BoundActionCreators<K, Args, R>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, ActionCreator<Args, A>)>,
    D: Fn(A) -> R + Clone + 'static,
    Args: 'static,
    A: 'static,
    R: 'static,
{
    let bound = creators
        .into_iter()
        .map(|(key, creator)| {
            let bound: Box<dyn Fn(Args) -> R> = Box::new(bind(creator, dispatch.clone()));
            (key, bound)
        })
        .collect();

    BoundActionCreators { bound }
}

impl<K: Eq + Hash, Args, R> BoundActionCreators<K, Args, R> {
    /// Create and dispatch the action registered under `key`
    pub fn call<Q>(&self, key: &Q, args: Args) -> Option<R>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.bound.get(key).map(|bound| bound(args))
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.bound.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.bound.keys()
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
