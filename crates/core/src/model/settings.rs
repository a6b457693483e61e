use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time-low warning must be at most {max} seconds, got {got}")]
    InvalidTimeLow { got: u32, max: u32 },
}

/// Tunables for a practice session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSettings {
    time_low_secs: u32,
    shuffle: bool,
}

impl PracticeSettings {
    pub const MAX_TIME_LOW_SECS: u32 = 600;

    /// Creates custom settings.
    ///
    /// `time_low_secs` is the remaining time at which the "time low" cue fires;
    /// zero disables the cue. `shuffle` off keeps authored order everywhere.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLow` above `MAX_TIME_LOW_SECS`.
    pub fn new(time_low_secs: u32, shuffle: bool) -> Result<Self, SettingsError> {
        if time_low_secs > Self::MAX_TIME_LOW_SECS {
            return Err(SettingsError::InvalidTimeLow {
                got: time_low_secs,
                max: Self::MAX_TIME_LOW_SECS,
            });
        }
        Ok(Self {
            time_low_secs,
            shuffle,
        })
    }

    #[must_use]
    pub fn time_low_secs(&self) -> u32 {
        self.time_low_secs
    }

    #[must_use]
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }
}

impl Default for PracticeSettings {
    fn default() -> Self {
        Self {
            time_low_secs: 5,
            shuffle: true,
        }
    }
}
