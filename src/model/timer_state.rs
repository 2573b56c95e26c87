use std::time::Duration;

use serde_with::serde_as;
use serde_with::DurationSeconds;

const TICK: Duration = Duration::from_secs(1);

/// Game clock advanced by explicit one second ticks.
///
/// The clock starts on the first move, stops counting while paused or once
/// ended, and for timed modes never runs past `limit`.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimerState {
    #[serde_as(as = "DurationSeconds<u64>")]
    pub elapsed: Duration,
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub limit: Option<Duration>,
    pub running: bool,
    pub paused: bool,
    pub ended: bool,
}

impl TimerState {
    pub fn with_limit(limit: Option<Duration>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Counting: started, not paused and not ended.
    pub fn is_active(&self) -> bool {
        self.running && !self.paused && !self.ended
    }

    pub fn is_expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.elapsed >= limit)
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.limit.map(|limit| limit.saturating_sub(self.elapsed))
    }

    pub fn started(&self) -> TimerState {
        let mut new_state = self.clone();
        if !new_state.ended {
            new_state.running = true;
        }
        new_state
    }

    pub fn ticked(&self) -> TimerState {
        let mut new_state = self.clone();
        if new_state.is_active() {
            new_state.elapsed = new_state.elapsed.saturating_add(TICK);
            if let Some(limit) = new_state.limit {
                new_state.elapsed = new_state.elapsed.min(limit);
            }
        }
        new_state
    }

    pub fn paused(&self) -> TimerState {
        let mut new_state = self.clone();
        new_state.paused = true;
        new_state
    }

    pub fn resumed(&self) -> TimerState {
        let mut new_state = self.clone();
        new_state.paused = false;
        new_state
    }

    pub fn ended(&self) -> TimerState {
        let mut new_state = self.clone();
        new_state.running = false;
        new_state.ended = true;
        new_state
    }

    /// `m:ss` for open-ended clocks, remaining seconds (`42s`) for countdowns.
    pub fn display(&self) -> String {
        match self.remaining() {
            Some(remaining) => format!("{}s", remaining.as_secs()),
            None => {
                let secs = self.elapsed.as_secs();
                format!("{}:{:02}", secs / 60, secs % 60)
            }
        }
    }
}
