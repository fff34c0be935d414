//! User-tunable durations and behaviour flags.
//!
//! The record is persisted as JSON and merged key-by-key over the defaults on
//! load: unknown keys are ignored and a key whose value has the wrong type
//! keeps its default.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, ValidationError};
use crate::storage::{self, KeyValueStore, SETTINGS_KEY};
use crate::timer::TimerMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minutes.
    pub focus_duration: u32,
    /// Minutes.
    pub short_break_duration: u32,
    /// Minutes.
    pub long_break_duration: u32,
    pub sessions_until_long_break: u32,
    pub sound_enabled: bool,
    pub auto_start_breaks: bool,
    pub auto_start_focus: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
            sessions_until_long_break: 4,
            sound_enabled: true,
            auto_start_breaks: true,
            auto_start_focus: false,
        }
    }
}

impl Settings {
    /// Duration in minutes for `mode`.
    pub fn duration_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_duration,
            TimerMode::ShortBreak => self.short_break_duration,
            TimerMode::LongBreak => self.long_break_duration,
        }
    }

    /// Reject zero durations and a zero long-break cadence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            ("focus_duration", self.focus_duration),
            ("short_break_duration", self.short_break_duration),
            ("long_break_duration", self.long_break_duration),
            ("sessions_until_long_break", self.sessions_until_long_break),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    message: "must be a positive integer".into(),
                });
            }
        }
        Ok(())
    }

    /// Overlay a persisted JSON object onto the defaults, one key at a time.
    fn merge_over_defaults(raw: &str) -> Self {
        let overlay = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!("settings record is not a JSON object, using defaults");
                return Self::default();
            }
        };

        let mut merged = match serde_json::to_value(Self::default()) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => return Self::default(),
        };
        for (key, value) in overlay {
            let Some(slot) = merged.get_mut(&key) else {
                continue;
            };
            if same_shape(slot, &value) {
                *slot = value;
            } else {
                tracing::warn!(key = %key, "ignoring settings value of the wrong type");
            }
        }

        serde_json::from_value(serde_json::Value::Object(merged)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "settings record rejected, using defaults");
            Self::default()
        })
    }
}

fn same_shape(default: &serde_json::Value, candidate: &serde_json::Value) -> bool {
    match (default, candidate) {
        (serde_json::Value::Bool(_), serde_json::Value::Bool(_)) => true,
        (serde_json::Value::Number(_), serde_json::Value::Number(n)) => n
            .as_u64()
            .is_some_and(|n| u32::try_from(n).is_ok()),
        _ => false,
    }
}

/// Owner of the current [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsStore {
    settings: Settings,
}

impl SettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Load the persisted record merged over defaults.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let settings = storage::load_raw(store, SETTINGS_KEY)
            .map(|raw| Settings::merge_over_defaults(&raw))
            .unwrap_or_default();
        Self { settings }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        storage::save_json(store, SETTINGS_KEY, &self.settings)
    }

    pub fn current(&self) -> &Settings {
        &self.settings
    }

    pub fn current_duration_for(&self, mode: TimerMode) -> u32 {
        self.settings.duration_for(mode)
    }

    /// Replace the settings wholesale.
    pub fn apply(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Get a setting as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(&self.settings).ok()?;
        json.get(key).map(|v| v.to_string())
    }

    /// Set a setting from its string form.
    ///
    /// The value is coerced to the key's type and the resulting settings
    /// must pass [`Settings::validate`]; on error nothing changes.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&self.settings)?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let trimmed = value.trim();
        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                trimmed
                    .parse::<bool>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as boolean")))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                trimmed
                    .parse::<u32>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?
                    .into(),
            ),
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        };
        obj.insert(key.to_string(), new_value);

        let updated: Settings = serde_json::from_value(json)?;
        updated.validate()?;
        self.settings = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let s = Settings::default();
        assert_eq!(s.focus_duration, 25);
        assert_eq!(s.short_break_duration, 5);
        assert_eq!(s.long_break_duration, 15);
        assert_eq!(s.sessions_until_long_break, 4);
        assert!(s.sound_enabled);
        assert!(s.auto_start_breaks);
        assert!(!s.auto_start_focus);
    }

    #[test]
    fn load_merges_over_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(SETTINGS_KEY, r#"{"focus_duration": 50, "theme": "dark"}"#)
            .unwrap();
        let loaded = SettingsStore::load(&store);
        assert_eq!(loaded.current().focus_duration, 50);
        assert_eq!(loaded.current().short_break_duration, 5);
    }

    #[test]
    fn wrong_typed_key_keeps_default() {
        let mut store = MemoryStore::new();
        store
            .set(
                SETTINGS_KEY,
                r#"{"focus_duration": null, "short_break_duration": 7, "sound_enabled": "yes"}"#,
            )
            .unwrap();
        let loaded = SettingsStore::load(&store);
        assert_eq!(loaded.current().focus_duration, 25);
        assert_eq!(loaded.current().short_break_duration, 7);
        assert!(loaded.current().sound_enabled);
    }

    #[test]
    fn garbage_record_falls_back() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, "[1,2,3]").unwrap();
        assert_eq!(SettingsStore::load(&store).current(), &Settings::default());
    }

    #[test]
    fn save_load_roundtrip() {
        let mut store = MemoryStore::new();
        let custom = Settings {
            focus_duration: 45,
            short_break_duration: 10,
            long_break_duration: 20,
            sessions_until_long_break: 3,
            sound_enabled: false,
            auto_start_breaks: false,
            auto_start_focus: true,
        };
        SettingsStore::new(custom.clone()).save(&mut store).unwrap();
        assert_eq!(SettingsStore::load(&store).current(), &custom);
    }

    #[test]
    fn set_coerces_types() {
        let mut settings = SettingsStore::default();
        settings.set("focus_duration", " 30 ").unwrap();
        settings.set("auto_start_focus", "true").unwrap();
        assert_eq!(settings.current().focus_duration, 30);
        assert!(settings.current().auto_start_focus);
        assert_eq!(settings.get("focus_duration").as_deref(), Some("30"));
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut settings = SettingsStore::default();
        assert!(matches!(
            settings.set("nope", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(matches!(
            settings.set("focus_duration", "abc"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
        assert!(matches!(
            settings.set("sessions_until_long_break", "0"),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(settings.current(), &Settings::default());
    }

    #[test]
    fn duration_for_maps_modes() {
        let store = SettingsStore::default();
        assert_eq!(store.current_duration_for(TimerMode::Focus), 25);
        assert_eq!(store.current_duration_for(TimerMode::ShortBreak), 5);
        assert_eq!(store.current_duration_for(TimerMode::LongBreak), 15);
    }
}
