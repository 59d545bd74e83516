#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Attempts left, the running one included
    Attempting(u32),
    Succeeded,
    Exhausted,
}

/// Attempt counter of one retried call. Never shared between calls.
#[derive(Debug)]
pub struct RetryBudget {
    attempts: u32,
    made: u32,
    state: State,
}

impl RetryBudget {
    pub fn new(attempts: u32) -> RetryBudget {
        let state = if attempts > 0 {
            State::Attempting(attempts)
        } else {
            State::Exhausted
        };
        RetryBudget {
            attempts,
            made: 0,
            state,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Number of the running attempt, starting at 1. Once finished, the
    /// number of attempts made.
    pub fn attempt(&self) -> u32 {
        match self.state {
            State::Attempting(_) => self.made + 1,
            State::Succeeded | State::Exhausted => self.made,
        }
    }

    pub fn succeed(&mut self) -> State {
        if let State::Attempting(_) = self.state {
            self.made += 1;
            self.state = State::Succeeded;
        }
        self.state
    }

    pub fn fail(&mut self) -> State {
        if let State::Attempting(remaining) = self.state {
            self.made += 1;
            self.state = if remaining > 1 {
                State::Attempting(remaining - 1)
            } else {
                State::Exhausted
            };
        }
        self.state
    }
}
