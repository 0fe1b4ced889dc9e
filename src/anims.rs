//! Keyed frame animations.
//!
//! Definitions live in an [`AnimationManager`]; each sprite carries an
//! [`AnimationState`] that plays one definition at a time. Timing is kept in
//! integer microseconds so frame advancement does not drift.

use std::collections::HashMap;

/// One frame of a texture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRef {
    pub texture: String,
    pub frame: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationDef {
    pub key: String,
    pub frames: Vec<FrameRef>,
    pub frame_rate: u32,
    /// Extra cycles after the first; `-1` repeats forever.
    pub repeat: i32,
}

impl AnimationDef {
    pub fn frame_duration_us(&self) -> u64 {
        1_000_000 / u64::from(self.frame_rate.max(1))
    }
}

/// Frames `start..=end` of `texture`.
pub fn generate_frame_numbers(texture: &str, start: u16, end: u16) -> Vec<FrameRef> {
    (start..=end)
        .map(|frame| FrameRef { texture: texture.to_string(), frame })
        .collect()
}

#[derive(Clone, Debug, Default)]
pub struct AnimationManager {
    defs: HashMap<String, AnimationDef>,
}

impl AnimationManager {
    /// Register a definition. An existing key is kept and `false` returned.
    pub fn create(&mut self, def: AnimationDef) -> bool {
        if self.defs.contains_key(&def.key) {
            log::warn!("Animation '{}' already exists; keeping the first definition", def.key);
            return false;
        }
        if def.frames.is_empty() {
            log::warn!("Animation '{}' has no frames", def.key);
        }
        self.defs.insert(def.key.clone(), def);
        true
    }

    pub fn get(&self, key: &str) -> Option<&AnimationDef> {
        self.defs.get(key)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Playback state for one sprite.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    pub key: Option<String>,
    pub frame_index: usize,
    pub elapsed_us: u64,
    pub cycles_done: u32,
    pub finished: bool,
}

impl AnimationState {
    pub fn is_playing(&self, key: &str) -> bool {
        !self.finished && self.key.as_deref() == Some(key)
    }

    /// Start `key` from its first frame. With `ignore_if_playing`, a request
    /// for the animation already running leaves it untouched. Returns the
    /// frame to display, or `None` for an unknown key.
    pub fn play<'a>(
        &mut self,
        anims: &'a AnimationManager,
        key: &str,
        ignore_if_playing: bool,
    ) -> Option<&'a FrameRef> {
        let Some(def) = anims.get(key) else {
            log::warn!("Unknown animation '{key}'");
            return None;
        };
        if !(ignore_if_playing && self.is_playing(key)) {
            *self = AnimationState {
                key: Some(key.to_string()),
                ..AnimationState::default()
            };
        }
        def.frames.get(self.frame_index)
    }

    /// Advance by `dt_us` microseconds and return the current frame.
    pub fn tick<'a>(&mut self, anims: &'a AnimationManager, dt_us: u64) -> Option<&'a FrameRef> {
        let def = anims.get(self.key.as_deref()?)?;
        if def.frames.is_empty() {
            return None;
        }
        if self.finished {
            return def.frames.get(self.frame_index);
        }

        self.elapsed_us += dt_us;
        let step = def.frame_duration_us();
        while self.elapsed_us >= step {
            self.elapsed_us -= step;
            self.frame_index += 1;
            if self.frame_index < def.frames.len() {
                continue;
            }
            let forever = def.repeat < 0;
            if forever || (self.cycles_done as i64) < i64::from(def.repeat) {
                self.cycles_done += 1;
                self.frame_index = 0;
            } else {
                self.frame_index = def.frames.len() - 1;
                self.elapsed_us = 0;
                self.finished = true;
                break;
            }
        }
        def.frames.get(self.frame_index)
    }
}
