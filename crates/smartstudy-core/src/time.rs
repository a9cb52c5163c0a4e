//! Time-of-day preference and its display label.

use std::fmt;

use serde::{Deserialize, Serialize};

const MORNING_LABEL: &str = "Morning (8-11 AM)";
const AFTERNOON_LABEL: &str = "Afternoon (1-4 PM)";
const EVENING_LABEL: &str = "Evening (6-9 PM)";

/// Preferred study window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    #[default]
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Map the numeric encoding 0/1/2; anything else is `None`.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(TimeOfDay::Morning),
            1 => Some(TimeOfDay::Afternoon),
            2 => Some(TimeOfDay::Evening),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            TimeOfDay::Morning => 0,
            TimeOfDay::Afternoon => 1,
            TimeOfDay::Evening => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => MORNING_LABEL,
            TimeOfDay::Afternoon => AFTERNOON_LABEL,
            TimeOfDay::Evening => EVENING_LABEL,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display label for a numeric time preference.
///
/// Total over all inputs: unknown values fall back to the afternoon label.
pub fn label(time_pref: i64) -> &'static str {
    TimeOfDay::from_index(time_pref)
        .unwrap_or(TimeOfDay::Afternoon)
        .label()
}
