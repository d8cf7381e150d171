use std::collections::BTreeSet;

use log::warn;
use rutina_domain::{Equipment, GeneratorConfig, Property, validate_recipient};

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, String>;
    async fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub beep_volume: u8,
    /// Send a summary of each saved routine to `email`.
    pub notifications: bool,
    pub email: String,
    pub min_exercises_per_day: usize,
    pub max_exercises_per_day: usize,
    pub basic_equipment: Vec<String>,
}

impl Settings {
    /// Unknown equipment names are ignored. Both bounds are at least one and the minimum never
    /// exceeds the maximum.
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        let basic_equipment = self
            .basic_equipment
            .iter()
            .filter_map(|name| match Equipment::try_from(name.as_str()) {
                Ok(equipment) => Some(equipment),
                Err(err) => {
                    warn!("ignoring basic equipment: {err}");
                    None
                }
            })
            .collect::<BTreeSet<_>>();
        let max_exercises = self.max_exercises_per_day.max(1);
        GeneratorConfig {
            min_exercises: self.min_exercises_per_day.clamp(1, max_exercises),
            max_exercises,
            basic_equipment,
        }
    }

    /// The address routine summaries are sent to, if notifications are enabled and possible.
    #[must_use]
    pub fn notification_recipient(&self) -> Option<String> {
        if !self.notifications {
            return None;
        }
        match validate_recipient(&self.email) {
            Ok(recipient) => Some(recipient),
            Err(err) => {
                warn!("notifications enabled without valid recipient: {err}");
                None
            }
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let config = GeneratorConfig::default();
        Self {
            beep_volume: 80,
            notifications: false,
            email: String::new(),
            min_exercises_per_day: config.min_exercises,
            max_exercises_per_day: config.max_exercises,
            basic_equipment: config
                .basic_equipment
                .iter()
                .map(|e| e.name().to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_settings_default_generator_config() {
        assert_eq!(
            Settings::default().generator_config(),
            GeneratorConfig::default()
        );
    }

    #[test]
    fn test_settings_generator_config() {
        let settings = Settings {
            min_exercises_per_day: 6,
            max_exercises_per_day: 4,
            basic_equipment: vec![
                "Barra".to_string(),
                "cohete".to_string(),
                "ESTERILLA".to_string(),
            ],
            ..Settings::default()
        };

        assert_eq!(
            settings.generator_config(),
            GeneratorConfig {
                min_exercises: 4,
                max_exercises: 4,
                basic_equipment: BTreeSet::from([Equipment::Barbell, Equipment::Mat]),
            }
        );
    }

    #[rstest]
    #[case(0, 0, 1, 1)]
    #[case(3, 0, 1, 1)]
    #[case(0, 5, 1, 5)]
    #[case(2, 3, 2, 3)]
    fn test_settings_generator_config_bounds(
        #[case] min: usize,
        #[case] max: usize,
        #[case] expected_min: usize,
        #[case] expected_max: usize,
    ) {
        let config = Settings {
            min_exercises_per_day: min,
            max_exercises_per_day: max,
            ..Settings::default()
        }
        .generator_config();

        assert_eq!(
            (config.min_exercises, config.max_exercises),
            (expected_min, expected_max)
        );
    }

    #[test]
    fn test_settings_generator_config_zero_maximum_keeps_days_filled() {
        let config = Settings {
            min_exercises_per_day: 0,
            max_exercises_per_day: 0,
            ..Settings::default()
        }
        .generator_config();
        let pool = vec![rutina_domain::Exercise {
            id: 1_u128.into(),
            name: rutina_domain::Name::new("Sentadillas").unwrap(),
            muscle_groups: BTreeSet::from([rutina_domain::MuscleGroup::Legs]),
            equipment: BTreeSet::from([Equipment::None]),
            difficulty: None,
            sets: 3,
            reps: 15,
            rest: chrono::Duration::seconds(60),
            calories_per_set: 5.0,
        }];
        let parameters = rutina_domain::RoutineParameters {
            day_count: 3,
            focus: rutina_domain::FocusAssignment::Rotation,
            difficulty: None,
            equipment: rutina_domain::EquipmentAvailability::Full,
        };

        let days = rutina_domain::generate_days(&pool, &parameters, &config);

        assert_eq!(
            days.iter().map(|d| d.exercises.len()).collect::<Vec<_>>(),
            vec![1, 1, 1]
        );
    }

    #[rstest]
    #[case(false, "ana@example.com", None)]
    #[case(true, "ana@example.com", Some("ana@example.com".to_string()))]
    #[case(true, " ana@example.com ", Some("ana@example.com".to_string()))]
    #[case(true, "", None)]
    #[case(true, "ana", None)]
    fn test_settings_notification_recipient(
        #[case] notifications: bool,
        #[case] email: &str,
        #[case] expected: Option<String>,
    ) {
        let settings = Settings {
            notifications,
            email: email.to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.notification_recipient(), expected);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: Settings =
            serde_json::from_str(r#"{"beep_volume": 20, "notifications": true}"#).unwrap();

        assert_eq!(
            settings,
            Settings {
                beep_volume: 20,
                notifications: true,
                ..Settings::default()
            }
        );
    }
}
