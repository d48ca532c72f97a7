//! Selectors - derived data computed from the todo state
//!
//! `VisibleTodos` caches its last result keyed by the identity of the todo
//! slice and the filter, so re-renders after unrelated changes are free.

use super::state::{Todo, VisibilityFilter, TODOS, VISIBILITY_FILTER};
use std::rc::Rc;
use unidux::CombinedState;

pub fn todos(state: &CombinedState) -> Rc<Vec<Todo>> {
    state.slice::<Vec<Todo>>(TODOS).unwrap_or_default()
}

pub fn visibility_filter(state: &CombinedState) -> VisibilityFilter {
    state
        .get::<VisibilityFilter>(VISIBILITY_FILTER)
        .copied()
        .unwrap_or_default()
}

pub fn completed_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|todo| todo.completed).count()
}

pub fn active_count(todos: &[Todo]) -> usize {
    todos.len() - completed_count(todos)
}

struct Cached {
    todos: Rc<Vec<Todo>>,
    filter: VisibilityFilter,
    visible: Rc<Vec<Todo>>,
}

/// Memoized selector for the todos matching the current filter
#[derive(Default)]
pub struct VisibleTodos {
    cached: Option<Cached>,
    computations: usize,
}

impl VisibleTodos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, state: &CombinedState) -> Rc<Vec<Todo>> {
        let todos = todos(state);
        let filter = visibility_filter(state);

        if let Some(cached) = &self.cached {
            if Rc::ptr_eq(&cached.todos, &todos) && cached.filter == filter {
                return Rc::clone(&cached.visible);
            }
        }

        self.computations += 1;
        let visible: Rc<Vec<Todo>> = Rc::new(
            todos
                .iter()
                .filter(|todo| filter.matches(todo))
                .cloned()
                .collect(),
        );

        self.cached = Some(Cached {
            todos,
            filter,
            visible: Rc::clone(&visible),
        });
        visible
    }

    /// How often the selector actually recomputed
    pub fn computations(&self) -> usize {
        self.computations
    }
}
