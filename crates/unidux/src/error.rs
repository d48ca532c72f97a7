use thiserror::Error;

/// Boxed error type returned by application reducers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building or driving a store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The dispatched value is not a usable action (missing or reserved type)
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// `dispatch` was called while the reducer was still running
    #[error("reducers may not dispatch actions")]
    ReducerDispatch,

    /// `dispatch` was called on the store from inside a middleware hook
    #[error("middleware may not dispatch directly; queue the action on its Dispatcher")]
    MiddlewareDispatch,

    /// A combined reducer could not produce a slice for `key`
    #[error("invalid state shape for slice \"{key}\": {reason}")]
    Shape { key: String, reason: String },

    /// No initial state was given and the reducer has no default
    #[error("no initial state supplied and the reducer defines no default")]
    MissingInitialState,

    /// The reducer itself failed; the original error is kept as the source
    #[error("reducer failed: {0}")]
    Reducer(#[source] BoxError),
}

impl StoreError {
    pub(crate) fn shape(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Shape {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
