//! unidux
//!
//! A minimal unidirectional state container:
//! - one [`Store`] owning the current state
//! - pure [`Reducer`]s computing the next state from an [`Action`]
//! - synchronous subscriber notification after every committed change
//!
//! Plus the two helpers most applications reach for: [`combine`] to build a
//! root reducer out of slice reducers, and [`bind`] / [`bind_all`] to tie
//! action creators to a dispatch function.
//!
//! Rendering, component binding and memoized selectors are left to the
//! application.

pub mod action;
pub mod bind;
pub mod combine;
pub mod dispatcher;
pub mod error;
pub mod middleware;
pub mod reducer;
pub mod store;

pub use action::{Action, RawAction, INIT_ACTION_TYPE};
pub use bind::{bind, bind_all, ActionCreator, BoundActionCreators};
pub use combine::{combine, CombineReducers, CombinedReducer, CombinedState};
pub use dispatcher::Dispatcher;
pub use error::{BoxError, StoreError};
pub use middleware::{ActionRecorder, LoggingMiddleware, Middleware};
pub use reducer::{unchanged, FnReducer, ReduceResult, Reducer};
pub use store::{Store, Unsubscribe, WeakStore};
