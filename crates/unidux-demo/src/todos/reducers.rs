//! Todo reducers
//!
//! Every arm returns the input `Rc` untouched when the action would not
//! change anything, so no-op actions never trigger a redraw.

use super::actions::TodoAction;
use super::state::{Todo, TodoId, VisibilityFilter, TODOS, VISIBILITY_FILTER};
use std::rc::Rc;
use unidux::{combine, unchanged, CombinedReducer, FnReducer, ReduceResult, StoreError};

pub fn todos_reducer(state: &Rc<Vec<Todo>>, action: &TodoAction) -> ReduceResult<Vec<Todo>> {
    let contains = |id: &TodoId| state.iter().any(|todo| todo.id == *id);

    match action {
        TodoAction::AddTodo { text } => {
            let id = state
                .iter()
                .map(|todo| todo.id.0 + 1)
                .max()
                .unwrap_or(0);

            let mut todos = (**state).clone();
            todos.push(Todo {
                id: TodoId(id),
                text: text.clone(),
                completed: false,
            });
            Ok(Rc::new(todos))
        }
        TodoAction::DeleteTodo { id } if contains(id) => Ok(Rc::new(
            state.iter().filter(|todo| todo.id != *id).cloned().collect(),
        )),
        TodoAction::EditTodo { id, text }
            if state.iter().any(|todo| todo.id == *id && todo.text != *text) =>
        {
            Ok(Rc::new(
                state
                    .iter()
                    .map(|todo| {
                        if todo.id == *id {
                            Todo {
                                text: text.clone(),
                                ..todo.clone()
                            }
                        } else {
                            todo.clone()
                        }
                    })
                    .collect(),
            ))
        }
        TodoAction::CompleteTodo { id } if contains(id) => Ok(Rc::new(
            state
                .iter()
                .map(|todo| {
                    if todo.id == *id {
                        Todo {
                            completed: !todo.completed,
                            ..todo.clone()
                        }
                    } else {
                        todo.clone()
                    }
                })
                .collect(),
        )),
        TodoAction::CompleteAllTodos if !state.is_empty() => {
            // complete everything, or un-complete everything if all were done
            let completed = !state.iter().all(|todo| todo.completed);
            Ok(Rc::new(
                state
                    .iter()
                    .map(|todo| Todo {
                        completed,
                        ..todo.clone()
                    })
                    .collect(),
            ))
        }
        TodoAction::ClearCompleted if state.iter().any(|todo| todo.completed) => Ok(Rc::new(
            state.iter().filter(|todo| !todo.completed).cloned().collect(),
        )),
        _ => unchanged(state),
    }
}

pub fn visibility_filter_reducer(
    state: &Rc<VisibilityFilter>,
    action: &TodoAction,
) -> ReduceResult<VisibilityFilter> {
    match action {
        TodoAction::SetVisibilityFilter { filter } if filter != &**state => {
            Ok(Rc::new(*filter))
        }
        _ => unchanged(state),
    }
}

/// Root reducer: `todos` (starts empty) and `visibility_filter`
pub fn root_reducer(
    initial_filter: VisibilityFilter,
) -> Result<CombinedReducer<TodoAction>, StoreError> {
    combine()
        .slice(TODOS, FnReducer::new(todos_reducer).with_default(Vec::new))
        .slice(
            VISIBILITY_FILTER,
            FnReducer::new(visibility_filter_reducer).with_default(move || initial_filter),
        )
        .build()
}
