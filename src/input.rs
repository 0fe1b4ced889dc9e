//! Cursor-key polling on top of terminal key events.
//!
//! Terminals report presses (and on capable terminals, repeats and
//! releases) rather than key state. `KeyTracker` records the frame each key
//! was last seen and treats it as held while that stamp is fresh, so several
//! keys can be down at once.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// A key counts as held if its last press/repeat arrived within this many
/// frames. OS key repeat runs at 15 Hz or faster, so at 30 FPS a held key is
/// always refreshed before it expires.
pub const HOLD_WINDOW: u64 = 4;

/// Arrow-key state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Clone, Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn record(&mut self, event: &KeyEvent) {
        let code = normalize(event.code);
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.key_frame.insert(code, self.frame);
            }
            // Only sent by keyboard-enhancement capable terminals.
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.key_frame
            .get(&normalize(key))
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.key_frame.clear();
    }

    /// Arrows, with WASD as aliases.
    pub fn cursor_keys(&self) -> CursorKeys {
        CursorKeys {
            left: self.is_held(KeyCode::Left) || self.is_held(KeyCode::Char('a')),
            right: self.is_held(KeyCode::Right) || self.is_held(KeyCode::Char('d')),
            up: self.is_held(KeyCode::Up) || self.is_held(KeyCode::Char('w')),
            down: self.is_held(KeyCode::Down) || self.is_held(KeyCode::Char('s')),
        }
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
