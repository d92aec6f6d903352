use std::fmt;

use strum::{AsRefStr, EnumString};

/// A detached session running on the remote host.
#[derive(Debug, Clone, Default)]
pub struct Job {
    /// `<pid>.<name>`, usable as the target of `screen -S`.
    pub id: String,
    /// Start time exactly as the remote host printed it.
    pub start_time: String,
    pub state: JobState,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, EnumString, AsRefStr)]
pub enum JobState {
    Attached,
    Detached,
    /// Anything `screen` reports besides the two plain states.
    #[default]
    Unknown,
}

impl Job {
    pub fn new(id: impl Into<String>, start_time: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start_time: start_time.into(),
            state: JobState::Unknown,
        }
    }

    pub fn with_state(mut self, state: JobState) -> Self {
        self.state = state;
        self
    }

    pub fn as_pair(&self) -> (&str, &str) {
        (&self.id, &self.start_time)
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.start_time == other.start_time
    }
}

impl Eq for Job {}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.start_time)
    }
}
