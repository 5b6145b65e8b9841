use std::fmt;

/// Lifecycle of one catalog initialization run. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinatorState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CoordinatorState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CoordinatorState::Idle => "idle",
            CoordinatorState::Running => "running",
            CoordinatorState::Succeeded => "succeeded",
            CoordinatorState::Failed => "failed",
        }
    }

    pub const fn as_u8(&self) -> u8 {
        match self {
            CoordinatorState::Idle => 0,
            CoordinatorState::Running => 1,
            CoordinatorState::Succeeded => 2,
            CoordinatorState::Failed => 3,
        }
    }

    /// Inverse of [`as_u8`](Self::as_u8) for values read back from an atomic.
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => CoordinatorState::Idle,
            1 => CoordinatorState::Running,
            2 => CoordinatorState::Succeeded,
            _ => CoordinatorState::Failed,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, CoordinatorState::Succeeded | CoordinatorState::Failed)
    }
}
