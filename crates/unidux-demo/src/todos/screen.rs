use super::actions::TodoCommands;
use super::selectors::{self, VisibleTodos};
use super::state::{Todo, TodoId, VisibilityFilter};
use super::TodoAction;
use crate::deferred::Deferred;
use crate::screen::{Flow, Screen};
use anyhow::Result;
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph},
    Frame,
};
use unidux::{CombinedState, Store};

const PLACEHOLDER: &str = "What needs to be done?";

pub struct TodoScreen {
    store: Store<CombinedState, TodoAction>,
    commands: TodoCommands,
    visible: VisibleTodos,
    /// Text being typed; local to the screen, not part of the store
    input: String,
    /// Todo whose text is loaded into `input` for editing
    editing: Option<TodoId>,
    selected: usize,
}

impl TodoScreen {
    pub fn new(store: Store<CombinedState, TodoAction>) -> Self {
        let commands = TodoCommands::bind(&store);
        Self {
            store,
            commands,
            visible: VisibleTodos::new(),
            input: String::new(),
            editing: None,
            selected: 0,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    fn selected_todo(&mut self) -> Option<Todo> {
        let visible = self.visible.select(&self.store.state());
        visible.get(self.selected).cloned()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible.select(&self.store.state()).len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Enter: add a new todo, or finish editing (empty text deletes)
    fn submit(&mut self) -> Result<()> {
        let text = self.input.trim().to_string();
        self.input.clear();

        match self.editing.take() {
            Some(id) if text.is_empty() => {
                (self.commands.delete_todo)(id)?;
            }
            Some(id) => {
                (self.commands.edit_todo)((id, text))?;
            }
            None if !text.is_empty() => {
                (self.commands.add_todo)(text)?;
            }
            None => log::debug!("Ignoring empty todo"),
        }
        Ok(())
    }

    fn start_editing(&mut self) {
        if let Some(todo) = self.selected_todo() {
            log::debug!("Editing todo {}", todo.id);
            self.editing = Some(todo.id);
            self.input = todo.text;
        }
    }

    fn handle_control_key(&mut self, code: KeyCode) -> Result<Flow> {
        match code {
            KeyCode::Char('c') => return Ok(Flow::Quit),
            KeyCode::Char('a') => {
                (self.commands.complete_all_todos)(())?;
            }
            KeyCode::Char('x') => {
                (self.commands.clear_completed)(())?;
            }
            KeyCode::Char('t') => {
                if let Some(todo) = self.selected_todo() {
                    (self.commands.complete_todo)(todo.id)?;
                }
            }
            KeyCode::Char('e') => self.start_editing(),
            _ => {}
        }
        Ok(Flow::Continue)
    }
}

impl Screen for TodoScreen {
    type State = CombinedState;
    type Action = TodoAction;

    fn store(&self) -> &Store<CombinedState, TodoAction> {
        &self.store
    }

    fn render(&mut self, state: &CombinedState, area: Rect, f: &mut Frame) {
        let todos = selectors::todos(state);
        let filter = selectors::visibility_filter(state);
        let visible = self.visible.select(state);

        let [input_area, list_area, footer_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        // Input
        let title = match self.editing {
            Some(id) => format!(" Edit todo {} ", id),
            None => " todos ".to_string(),
        };
        let input = if self.input.is_empty() {
            Line::from(PLACEHOLDER.dim().italic())
        } else {
            Line::from(self.input.as_str())
        };
        f.render_widget(Paragraph::new(input).block(Block::bordered().title(title)), input_area);

        // List
        let items: Vec<ListItem> = visible
            .iter()
            .map(|todo| {
                if todo.completed {
                    ListItem::new(Line::from(vec![
                        Span::raw("[x] "),
                        Span::raw(todo.text.as_str()).crossed_out().dim(),
                    ]))
                } else {
                    ListItem::new(format!("[ ] {}", todo.text))
                }
            })
            .collect();

        let mut list_state = ListState::default();
        if !visible.is_empty() {
            list_state.select(Some(self.selected.min(visible.len() - 1)));
        }
        let list = List::new(items)
            .block(Block::bordered())
            .highlight_style(Style::new().reversed());
        f.render_stateful_widget(list, list_area, &mut list_state);

        // Footer
        let active = selectors::active_count(&todos);
        let completed = selectors::completed_count(&todos);
        let mut footer = vec![Span::raw(format!(
            " {} {} left  ",
            active,
            if active == 1 { "item" } else { "items" }
        ))];
        for option in VisibilityFilter::ALL {
            let label = format!(" {} ", option.label());
            footer.push(if option == filter {
                Span::raw(label).bold().underlined()
            } else {
                Span::raw(label)
            });
        }
        if completed > 0 {
            footer.push(Span::raw(format!("  Clear completed ({})", completed)).dim());
        }
        f.render_widget(Paragraph::new(Line::from(footer)), footer_area);

        let help = "enter add/save  ↑↓ select  ^t toggle  ^e edit  del delete  \
                    ^a all  ^x clear  tab filter  esc quit";
        f.render_widget(Paragraph::new(Line::from(help.dim())), help_area);
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        _deferred: &mut Deferred<TodoAction>,
    ) -> Result<Flow> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            let flow = self.handle_control_key(key.code)?;
            self.clamp_selection();
            return Ok(flow);
        }

        match key.code {
            KeyCode::Esc if self.editing.is_some() => {
                self.editing = None;
                self.input.clear();
            }
            KeyCode::Esc => return Ok(Flow::Quit),
            KeyCode::Enter => self.submit()?,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Delete => {
                if let Some(todo) = self.selected_todo() {
                    (self.commands.delete_todo)(todo.id)?;
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected += 1,
            KeyCode::Tab => {
                let next = selectors::visibility_filter(&self.store.state()).next();
                (self.commands.set_visibility_filter)(next)?;
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }

        self.clamp_selection();
        Ok(Flow::Continue)
    }
}
