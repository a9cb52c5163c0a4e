//! Validated user preferences.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::TimeOfDay;

fn default_study_hours() -> f64 {
    4.0
}
fn default_difficulty_preference() -> f64 {
    0.7
}
fn default_time_of_day() -> i64 {
    1
}

/// A learner's preferences, validated on construction.
///
/// Values outside their domain are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserProfile {
    preferred_study_hours: f64,
    difficulty_preference: f64,
    time_of_day_preference: TimeOfDay,
}

impl UserProfile {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if hours are not a positive finite
    /// number, or difficulty is not a finite number in `[0, 1]`.
    pub fn new(
        preferred_study_hours: f64,
        difficulty_preference: f64,
        time_of_day_preference: TimeOfDay,
    ) -> Result<Self, ValidationError> {
        if !preferred_study_hours.is_finite() || preferred_study_hours <= 0.0 {
            return Err(ValidationError::invalid(
                "preferred_study_hours",
                format!("must be a positive number, got {preferred_study_hours}"),
            ));
        }
        if !difficulty_preference.is_finite() || !(0.0..=1.0).contains(&difficulty_preference) {
            return Err(ValidationError::invalid(
                "difficulty_preference",
                format!("must be within [0, 1], got {difficulty_preference}"),
            ));
        }
        Ok(Self {
            preferred_study_hours,
            difficulty_preference,
            time_of_day_preference,
        })
    }

    pub fn preferred_study_hours(&self) -> f64 {
        self.preferred_study_hours
    }

    pub fn difficulty_preference(&self) -> f64 {
        self.difficulty_preference
    }

    pub fn time_of_day_preference(&self) -> TimeOfDay {
        self.time_of_day_preference
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            preferred_study_hours: default_study_hours(),
            difficulty_preference: default_difficulty_preference(),
            time_of_day_preference: TimeOfDay::Afternoon,
        }
    }
}

/// Loosely-typed profile input where any field may be missing.
///
/// Deserializes from config files and JSON payloads; [`resolve`](Self::resolve)
/// fills in defaults and validates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_study_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_preference: Option<f64>,
    /// 0 = morning, 1 = afternoon, 2 = evening
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day_preference: Option<i64>,
}

impl ProfileOverrides {
    /// Fields set in `other` replace the ones here.
    pub fn merge(self, other: ProfileOverrides) -> Self {
        Self {
            preferred_study_hours: other.preferred_study_hours.or(self.preferred_study_hours),
            difficulty_preference: other.difficulty_preference.or(self.difficulty_preference),
            time_of_day_preference: other.time_of_day_preference.or(self.time_of_day_preference),
        }
    }

    /// Apply defaults for missing fields and validate the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for any out-of-domain value, including a
    /// time preference outside 0..=2.
    pub fn resolve(&self) -> Result<UserProfile, ValidationError> {
        let time_index = self.time_of_day_preference.unwrap_or_else(default_time_of_day);
        let time = TimeOfDay::from_index(time_index).ok_or_else(|| {
            ValidationError::invalid(
                "time_of_day_preference",
                format!("must be 0 (morning), 1 (afternoon) or 2 (evening), got {time_index}"),
            )
        })?;
        UserProfile::new(
            self.preferred_study_hours.unwrap_or_else(default_study_hours),
            self.difficulty_preference
                .unwrap_or_else(default_difficulty_preference),
            time,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overrides_resolve_to_defaults() {
        let profile = ProfileOverrides::default().resolve().unwrap();
        assert_eq!(profile, UserProfile::default());
        assert_eq!(profile.preferred_study_hours(), 4.0);
        assert_eq!(profile.difficulty_preference(), 0.7);
        assert_eq!(profile.time_of_day_preference(), TimeOfDay::Afternoon);
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let profile = ProfileOverrides {
            preferred_study_hours: Some(6.0),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(profile.preferred_study_hours(), 6.0);
        assert_eq!(profile.difficulty_preference(), 0.7);
    }

    #[test]
    fn negative_hours_are_rejected() {
        let err = UserProfile::new(-1.0, 0.5, TimeOfDay::Morning).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidValue { ref field, .. } if field == "preferred_study_hours"
        ));
        assert!(UserProfile::new(0.0, 0.5, TimeOfDay::Morning).is_err());
        assert!(UserProfile::new(f64::NAN, 0.5, TimeOfDay::Morning).is_err());
    }

    #[test]
    fn difficulty_outside_unit_interval_is_rejected() {
        assert!(UserProfile::new(4.0, 1.2, TimeOfDay::Evening).is_err());
        assert!(UserProfile::new(4.0, -0.1, TimeOfDay::Evening).is_err());
        assert!(UserProfile::new(4.0, 1.0, TimeOfDay::Evening).is_ok());
        assert!(UserProfile::new(4.0, 0.0, TimeOfDay::Evening).is_ok());
    }

    #[test]
    fn unknown_time_slot_is_rejected_not_clamped() {
        let err = ProfileOverrides {
            time_of_day_preference: Some(5),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();
        assert!(err.to_string().contains("time_of_day_preference"));
    }

    #[test]
    fn merge_prefers_the_newer_values() {
        let file = ProfileOverrides {
            preferred_study_hours: Some(3.0),
            difficulty_preference: Some(0.4),
            time_of_day_preference: None,
        };
        let flags = ProfileOverrides {
            preferred_study_hours: Some(5.0),
            ..Default::default()
        };
        let merged = file.merge(flags);
        assert_eq!(merged.preferred_study_hours, Some(5.0));
        assert_eq!(merged.difficulty_preference, Some(0.4));
        assert_eq!(merged.time_of_day_preference, None);
    }

    #[test]
    fn overrides_deserialize_from_json() {
        let parsed: ProfileOverrides =
            serde_json::from_str(r#"{"preferred_study_hours": 5, "time_of_day_preference": 0}"#)
                .unwrap();
        let profile = parsed.resolve().unwrap();
        assert_eq!(profile.preferred_study_hours(), 5.0);
        assert_eq!(profile.time_of_day_preference(), TimeOfDay::Morning);
    }
}
