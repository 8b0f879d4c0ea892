//! Keyboard input
//!
//! Key presses are read from the terminal in raw mode. The game loop drains
//! whatever is pending once per tick; no event means no action.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Flap,
    Quit,
}

/// Map a key press to an event. Releases, repeats and unbound keys are ignored.
pub fn map_key(key: &KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Quit)
        }
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(InputEvent::Flap),
        KeyCode::Char('w') | KeyCode::Char('k') => Some(InputEvent::Flap),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputEvent::Quit),
        _ => None,
    }
}

fn map_event(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

/// Terminal key source (expects raw mode)
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    pub fn new() -> Self {
        Self
    }

    /// Events pending since the last poll, without blocking
    pub fn poll(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Some(input) = map_event(&event::read()?) {
                events.push(input);
            }
        }
        Ok(events)
    }

    /// Block until a bound key is pressed
    pub fn wait(&mut self) -> io::Result<InputEvent> {
        loop {
            if let Some(input) = map_event(&event::read()?) {
                return Ok(input);
            }
        }
    }
}
