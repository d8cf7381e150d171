use std::{collections::VecDeque, fmt::Display, marker::PhantomData};

use gloo_storage::Storage as GlooStorage;
use ::log::{debug, warn};
use rutina_domain::Cache;
use rutina_web_app::{
    OngoingWorkout, OngoingWorkoutRepository, Settings, SettingsRepository, log,
};
use strum::AsRefStr;

use crate::rest;

#[derive(AsRefStr, Clone, Copy, Debug)]
pub enum Key {
    #[strum(serialize = "settings")]
    Settings,
    #[strum(serialize = "ongoing workout")]
    OngoingWorkout,
    #[strum(serialize = "log")]
    Log,
    #[strum(serialize = "exercises")]
    Exercises,
    #[strum(serialize = "routines")]
    Routines,
}

fn read<T>(key: Key, default: impl FnOnce() -> T) -> Result<T, gloo_storage::errors::StorageError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    match gloo_storage::LocalStorage::get(key.as_ref()) {
        Ok(value) => Ok(value),
        Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Ok(default()),
        Err(err) => Err(err),
    }
}

pub struct UI;

impl SettingsRepository for UI {
    async fn read_settings(&self) -> Result<Settings, String> {
        read(Key::Settings, Settings::default).map_err(|err| err.to_string())
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        gloo_storage::LocalStorage::set(Key::Settings.as_ref(), settings)
            .map_err(|err| err.to_string())
    }
}

impl OngoingWorkoutRepository for UI {
    async fn read_ongoing_workout(&self) -> Result<Option<OngoingWorkout>, String> {
        read(Key::OngoingWorkout, || None).map_err(|err| err.to_string())
    }

    async fn write_ongoing_workout(
        &self,
        ongoing_workout: Option<OngoingWorkout>,
    ) -> Result<(), String> {
        gloo_storage::LocalStorage::set(Key::OngoingWorkout.as_ref(), ongoing_workout)
            .map_err(|err| err.to_string())
    }
}

pub struct Log;

impl log::Repository for Log {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        read(Key::Log, VecDeque::new).map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::prepend(&mut entries, entry);
        gloo_storage::LocalStorage::set(Key::Log.as_ref(), entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}

/// Persists a list of domain values as their REST representation `D`.
///
/// Stored values that cannot be converted back are treated as a cache miss.
pub struct LocalStorageCache<D> {
    key: Key,
    representation: PhantomData<D>,
}

impl LocalStorageCache<rest::Exercise> {
    #[must_use]
    pub const fn exercises() -> Self {
        Self {
            key: Key::Exercises,
            representation: PhantomData,
        }
    }
}

impl LocalStorageCache<rest::Routine> {
    #[must_use]
    pub const fn routines() -> Self {
        Self {
            key: Key::Routines,
            representation: PhantomData,
        }
    }
}

impl<T, D> Cache<Vec<T>> for LocalStorageCache<D>
where
    D: serde::Serialize + for<'de> serde::Deserialize<'de> + for<'a> From<&'a T>,
    T: TryFrom<D>,
    <T as TryFrom<D>>::Error: Display,
{
    fn get(&self) -> Option<Vec<T>> {
        let stored = match gloo_storage::LocalStorage::get::<Vec<D>>(self.key.as_ref()) {
            Ok(stored) => stored,
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => return None,
            Err(err) => {
                warn!("failed to read {} from local storage: {err}", self.key.as_ref());
                return None;
            }
        };
        stored
            .into_iter()
            .map(T::try_from)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| debug!("discarding cached {}: {err}", self.key.as_ref()))
            .ok()
    }

    fn put(&self, value: Vec<T>) {
        let stored = value.iter().map(D::from).collect::<Vec<_>>();
        if let Err(err) = gloo_storage::LocalStorage::set(self.key.as_ref(), stored) {
            warn!("failed to write {} into local storage: {err}", self.key.as_ref());
        }
    }

    fn invalidate(&self) {
        gloo_storage::LocalStorage::delete(self.key.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key() {
        assert_eq!(Key::OngoingWorkout.as_ref(), "ongoing workout");
        assert_eq!(Key::Routines.as_ref(), "routines");
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    mod wasm {
        use pretty_assertions::assert_eq;
        use rutina_domain as domain;
        use rutina_web_app::log::Repository as _;
        use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

        use crate::tests::data::{EXERCISES, ROUTINES};

        use super::*;

        wasm_bindgen_test_configure!(run_in_browser);

        #[wasm_bindgen_test]
        async fn test_settings() {
            gloo_storage::LocalStorage::clear();

            assert_eq!(UI.read_settings().await.unwrap(), Settings::default());

            let settings = Settings {
                notifications: true,
                email: "ana@example.com".to_string(),
                ..Settings::default()
            };
            UI.write_settings(settings.clone()).await.unwrap();

            assert_eq!(UI.read_settings().await.unwrap(), settings);
        }

        #[wasm_bindgen_test]
        async fn test_ongoing_workout() {
            gloo_storage::LocalStorage::clear();

            assert_eq!(UI.read_ongoing_workout().await.unwrap(), None);

            let ongoing_workout = OngoingWorkout::new(1, 2);
            UI.write_ongoing_workout(Some(ongoing_workout.clone()))
                .await
                .unwrap();

            assert_eq!(
                UI.read_ongoing_workout().await.unwrap(),
                Some(ongoing_workout)
            );
        }

        #[wasm_bindgen_test]
        fn test_log() {
            gloo_storage::LocalStorage::clear();

            assert_eq!(Log.read_entries().unwrap(), VecDeque::new());

            let entry = log::Entry {
                time: "Jan 01 10:00:00".to_string(),
                level: ::log::Level::Info,
                message: "routine saved".to_string(),
            };
            Log.write_entry(entry.clone()).unwrap();

            assert_eq!(Log.read_entries().unwrap(), VecDeque::from([entry]));
        }

        #[wasm_bindgen_test]
        fn test_local_storage_cache() {
            gloo_storage::LocalStorage::clear();
            let exercises = LocalStorageCache::exercises();
            let routines = LocalStorageCache::routines();

            assert_eq!(Cache::<Vec<domain::Exercise>>::get(&exercises), None);

            exercises.put(EXERCISES.to_vec());
            routines.put(ROUTINES.to_vec());

            assert_eq!(
                Cache::<Vec<domain::Exercise>>::get(&exercises),
                Some(EXERCISES.to_vec())
            );
            assert_eq!(
                Cache::<Vec<domain::WeeklyRoutine>>::get(&routines),
                Some(ROUTINES.to_vec())
            );

            Cache::<Vec<domain::WeeklyRoutine>>::invalidate(&routines);

            assert_eq!(Cache::<Vec<domain::WeeklyRoutine>>::get(&routines), None);
            assert_eq!(
                Cache::<Vec<domain::Exercise>>::get(&exercises),
                Some(EXERCISES.to_vec())
            );
        }
    }
}
