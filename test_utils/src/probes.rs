//! Contact probes with scripted output.

use std::collections::VecDeque;

use haulage::{Contact, ContactProbe, WorldView};

/// Reports nothing, ever.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContacts;

impl ContactProbe for NoContacts {
    fn probe(&mut self, _world: &WorldView<'_>) -> Vec<Contact> {
        Vec::new()
    }
}

/// Replays one contact list per frame, then reports nothing.
#[derive(Debug, Default, Clone)]
pub struct ScriptedProbe {
    frames: VecDeque<Vec<Contact>>,
    calls: usize,
}

impl ScriptedProbe {
    /// Script the given frames in order.
    pub fn new(frames: impl IntoIterator<Item = Vec<Contact>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            calls: 0,
        }
    }

    /// The same contacts for `count` consecutive frames.
    pub fn repeat(contacts: &[Contact], count: usize) -> Self {
        Self::new(std::iter::repeat_n(contacts.to_vec(), count))
    }

    /// Number of frames probed so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl ContactProbe for ScriptedProbe {
    fn probe(&mut self, _world: &WorldView<'_>) -> Vec<Contact> {
        self.calls += 1;
        self.frames.pop_front().unwrap_or_default()
    }
}
