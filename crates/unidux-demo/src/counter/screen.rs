use super::actions::CounterAction;
use crate::deferred::Deferred;
use crate::screen::{Flow, Screen};
use anyhow::Result;
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers},
    layout::{Alignment, Constraint, Layout, Rect},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};
use std::time::Duration;
use unidux::Store;

pub struct CounterScreen {
    store: Store<i64, CounterAction>,
    async_delay: Duration,
}

impl CounterScreen {
    pub fn new(store: Store<i64, CounterAction>, async_delay: Duration) -> Self {
        Self { store, async_delay }
    }

    /// Increment, but only when the current value is odd
    ///
    /// Returns whether an action was dispatched.
    pub fn increment_if_odd(&self) -> Result<bool> {
        if *self.store.state() % 2 == 0 {
            log::debug!("Counter is even, not incrementing");
            return Ok(false);
        }
        self.store.dispatch(CounterAction::Increment)?;
        Ok(true)
    }

    /// Queue an increment to be dispatched after the configured delay
    pub fn increment_async(&self, deferred: &mut Deferred<CounterAction>) {
        log::debug!("Scheduling increment in {:?}", self.async_delay);
        deferred.schedule(self.async_delay, CounterAction::Increment);
    }
}

impl Screen for CounterScreen {
    type State = i64;
    type Action = CounterAction;

    fn store(&self) -> &Store<i64, CounterAction> {
        &self.store
    }

    fn render(&mut self, state: &i64, area: Rect, f: &mut Frame) {
        let block = Block::bordered().title(" Counter ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let [value_area, help_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

        let value = Paragraph::new(Line::from(vec![
            Span::raw("Clicked: "),
            Span::raw(state.to_string()).bold(),
            Span::raw(" times"),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(value, value_area);

        let help = Paragraph::new(vec![
            Line::from("+ increment   - decrement   o increment if odd").dim(),
            Line::from("a increment async   q quit").dim(),
        ])
        .alignment(Alignment::Center);
        f.render_widget(help, help_area);
    }

    fn handle_key(
        &mut self,
        key: KeyEvent,
        deferred: &mut Deferred<CounterAction>,
    ) -> Result<Flow> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Flow::Quit);
        }

        match key.code {
            KeyCode::Char('+') | KeyCode::Char('k') | KeyCode::Up => {
                self.store.dispatch(CounterAction::Increment)?;
            }
            KeyCode::Char('-') | KeyCode::Char('j') | KeyCode::Down => {
                self.store.dispatch(CounterAction::Decrement)?;
            }
            KeyCode::Char('o') => {
                self.increment_if_odd()?;
            }
            KeyCode::Char('a') => self.increment_async(deferred),
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Flow::Quit),
            _ => {}
        }

        Ok(Flow::Continue)
    }
}
