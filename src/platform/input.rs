//! Input polling

/// Events the simulation loop reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Close request from the user or window manager
    Quit,
}

/// Non-blocking source of input events, drained once per frame
pub trait InputSource {
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// A source that never produces events (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        Vec::new()
    }
}

/// Emits `Quit` on the given poll (0-based) and every poll after it
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    quit_on_poll: Option<u64>,
    polls: u64,
}

impl ScriptedInput {
    pub fn quit_after(polls: u64) -> Self {
        Self {
            quit_on_poll: Some(polls),
            polls: 0,
        }
    }

    pub fn never() -> Self {
        Self {
            quit_on_poll: None,
            polls: 0,
        }
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        let current = self.polls;
        self.polls += 1;
        match self.quit_on_poll {
            Some(n) if current >= n => vec![InputEvent::Quit],
            _ => Vec::new(),
        }
    }
}
