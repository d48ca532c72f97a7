//! Counter example: a single integer, incremented and decremented

pub mod actions;
pub mod reducer;
pub mod screen;

pub use reducer::CounterReducer;
pub use screen::CounterScreen;
