use serde::{Deserialize, Serialize};

pub const TIME_MODE_LIMIT_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Classic,
    Time,
    Large,
}

impl GameMode {
    pub fn all() -> Vec<GameMode> {
        vec![GameMode::Classic, GameMode::Time, GameMode::Large]
    }

    pub fn from_name(name: &str) -> Option<GameMode> {
        match name {
            "classic" => Some(GameMode::Classic),
            "time" => Some(GameMode::Time),
            "large" => Some(GameMode::Large),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Time => "time",
            GameMode::Large => "large",
        }
    }

    pub fn grid_size(&self) -> usize {
        match self {
            GameMode::Classic => 4,
            GameMode::Time => 4,
            GameMode::Large => 5,
        }
    }

    /// Countdown length in seconds, `None` for untimed modes.
    pub fn is_timed(&self) -> bool {
        matches!(self, GameMode::Time)
    }

    pub fn time_limit(&self, configured_secs: u32) -> Option<u32> {
        match self {
            GameMode::Time => Some(configured_secs),
            GameMode::Classic | GameMode::Large => None,
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
