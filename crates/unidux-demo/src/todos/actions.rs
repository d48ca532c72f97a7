use super::state::{TodoId, VisibilityFilter};
use unidux::{bind, Action, CombinedState, Store, StoreError};

pub const ADD_TODO: &str = "ADD_TODO";
pub const DELETE_TODO: &str = "DELETE_TODO";
pub const EDIT_TODO: &str = "EDIT_TODO";
pub const COMPLETE_TODO: &str = "COMPLETE_TODO";
pub const COMPLETE_ALL_TODOS: &str = "COMPLETE_ALL_TODOS";
pub const CLEAR_COMPLETED: &str = "CLEAR_COMPLETED";
pub const SET_VISIBILITY_FILTER: &str = "SET_VISIBILITY_FILTER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoAction {
    AddTodo { text: String },
    DeleteTodo { id: TodoId },
    EditTodo { id: TodoId, text: String },
    /// Toggles the completed flag
    CompleteTodo { id: TodoId },
    CompleteAllTodos,
    ClearCompleted,
    SetVisibilityFilter { filter: VisibilityFilter },
}

impl Action for TodoAction {
    fn action_type(&self) -> &str {
        match self {
            TodoAction::AddTodo { .. } => ADD_TODO,
            TodoAction::DeleteTodo { .. } => DELETE_TODO,
            TodoAction::EditTodo { .. } => EDIT_TODO,
            TodoAction::CompleteTodo { .. } => COMPLETE_TODO,
            TodoAction::CompleteAllTodos => COMPLETE_ALL_TODOS,
            TodoAction::ClearCompleted => CLEAR_COMPLETED,
            TodoAction::SetVisibilityFilter { .. } => SET_VISIBILITY_FILTER,
        }
    }
}

// Action creators

pub fn add_todo(text: String) -> TodoAction {
    TodoAction::AddTodo { text }
}

pub fn delete_todo(id: TodoId) -> TodoAction {
    TodoAction::DeleteTodo { id }
}

pub fn edit_todo((id, text): (TodoId, String)) -> TodoAction {
    TodoAction::EditTodo { id, text }
}

pub fn complete_todo(id: TodoId) -> TodoAction {
    TodoAction::CompleteTodo { id }
}

pub fn complete_all_todos(_: ()) -> TodoAction {
    TodoAction::CompleteAllTodos
}

pub fn clear_completed(_: ()) -> TodoAction {
    TodoAction::ClearCompleted
}

pub fn set_visibility_filter(filter: VisibilityFilter) -> TodoAction {
    TodoAction::SetVisibilityFilter { filter }
}

pub type Dispatched = Result<TodoAction, StoreError>;

type Command<Args> = Box<dyn Fn(Args) -> Dispatched>;

/// The action creators above, bound to a store's dispatch
pub struct TodoCommands {
    pub add_todo: Command<String>,
    pub delete_todo: Command<TodoId>,
    pub edit_todo: Command<(TodoId, String)>,
    pub complete_todo: Command<TodoId>,
    pub complete_all_todos: Command<()>,
    pub clear_completed: Command<()>,
    pub set_visibility_filter: Command<VisibilityFilter>,
}

impl TodoCommands {
    pub fn bind(store: &Store<CombinedState, TodoAction>) -> Self {
        let dispatch = store.dispatcher();

        Self {
            add_todo: Box::new(bind(add_todo, dispatch.clone())),
            delete_todo: Box::new(bind(delete_todo, dispatch.clone())),
            edit_todo: Box::new(bind(edit_todo, dispatch.clone())),
            complete_todo: Box::new(bind(complete_todo, dispatch.clone())),
            complete_all_todos: Box::new(bind(complete_all_todos, dispatch.clone())),
            clear_completed: Box::new(bind(clear_completed, dispatch.clone())),
            set_visibility_filter: Box::new(bind(set_visibility_filter, dispatch)),
        }
    }
}
