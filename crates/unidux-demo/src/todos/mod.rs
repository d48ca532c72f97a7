//! Todo list example: two slices combined into one root reducer

pub mod actions;
pub mod reducers;
pub mod screen;
pub mod selectors;
pub mod state;

pub use actions::TodoAction;
pub use reducers::root_reducer;
pub use screen::TodoScreen;
pub use state::VisibilityFilter;
