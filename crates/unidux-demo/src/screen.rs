//! Screen trait and the shared event loop
//!
//! Each demo is a `Screen`: it owns its store, renders the current state and
//! translates key presses into dispatched actions. The loop redraws whenever
//! the store notifies its subscriber or a key was handled, and dispatches
//! deferred actions once they are due.

use crate::deferred::Deferred;
use anyhow::Result;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::event::{self, Event, KeyEvent, KeyEventKind},
    layout::Rect,
    Frame, Terminal,
};
use std::cell::Cell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};
use unidux::{Action, Store};

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub trait Screen {
    type State: 'static;
    type Action: Action + 'static;

    fn store(&self) -> &Store<Self::State, Self::Action>;

    /// Render `state` into `area`
    fn render(&mut self, state: &Self::State, area: Rect, frame: &mut Frame);

    /// Handle a key press; delayed actions go into `deferred`
    fn handle_key(
        &mut self,
        key: KeyEvent,
        deferred: &mut Deferred<Self::Action>,
    ) -> Result<Flow>;
}

pub fn run<S: Screen>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    screen: &mut S,
    tick_rate: Duration,
) -> Result<()> {
    let dirty = Rc::new(Cell::new(true));
    let flag = Rc::clone(&dirty);
    let subscription = screen.store().subscribe(move || flag.set(true));

    let mut deferred: Deferred<S::Action> = Deferred::new();

    loop {
        if dirty.replace(false) {
            let state = screen.store().state();
            terminal.draw(|frame| screen.render(&state, frame.area(), frame))?;
        }

        for action in deferred.take_due(Instant::now()) {
            log::debug!("Deferred {} is due", action.action_type());
            screen.store().dispatch(action)?;
        }

        let timeout = deferred
            .next_due()
            .map(|due| due.saturating_duration_since(Instant::now()).min(tick_rate))
            .unwrap_or(tick_rate);

        if !event::poll(timeout)? {
            continue;
        }

        match event::read()? {
            // Only process key press events (ignore key release)
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                dirty.set(true);
                if screen.handle_key(key, &mut deferred)? == Flow::Quit {
                    break;
                }
            }
            Event::Resize(_, _) => dirty.set(true),
            _ => {}
        }
    }

    if !deferred.is_empty() {
        log::info!("Dropping {} deferred action(s) on exit", deferred.len());
    }
    subscription.unsubscribe();
    Ok(())
}
