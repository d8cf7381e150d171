//! REST
//!
//! Client for the application backend. The backend answers writes with `{success, message}`,
//! where an unsuccessful write carries a message intended for the user.

use std::collections::BTreeMap;

use futures_util::future::{self, Either};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::future::TimeoutFuture;
use log::{debug, warn};
use rutina_domain::{self as domain, Property};
use serde_json::json;
use uuid::Uuid;

const TIMEOUT_MS: u32 = 15_000;

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone, Copy, Default)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

#[derive(Clone)]
pub struct REST<S: SendRequest> {
    pub(crate) sender: S,
    timeout_ms: u32,
}

impl REST<GlooNetSendRequest> {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_sender(GlooNetSendRequest)
    }
}

impl Default for REST<GlooNetSendRequest> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SendRequest> REST<S> {
    #[must_use]
    pub const fn with_sender(sender: S) -> Self {
        Self {
            sender,
            timeout_ms: TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Requests that do not complete in time are aborted and reported as missing connection.
    async fn send(
        &self,
        request: RequestBuilder,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, domain::StorageError> {
        let controller = web_sys::AbortController::new()
            .map_err(|err| domain::StorageError::Other(format!("{err:?}").into()))?;
        let request = request.abort_signal(Some(&controller.signal()));
        let request = match body {
            Some(body) => request.json(body),
            None => request.build(),
        }
        .map_err(|err| domain::StorageError::Other(Box::new(err)))?;
        let url = request.url();

        let response = self.sender.send_request(request);
        let timeout = TimeoutFuture::new(self.timeout_ms);
        futures_util::pin_mut!(response);
        futures_util::pin_mut!(timeout);

        match future::select(response, timeout).await {
            Either::Left((Ok(response), _)) => Ok(response),
            Either::Left((Err(err), _)) => {
                debug!("request to {url} failed: {err}");
                Err(domain::StorageError::NoConnection)
            }
            Either::Right(((), _)) => {
                controller.abort();
                debug!("request to {url} timed out after {} ms", self.timeout_ms);
                Err(domain::StorageError::NoConnection)
            }
        }
    }
}

impl<S: SendRequest> domain::ExerciseRepository for REST<S> {
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        let response = self.send(Request::get("api/exercises"), None).await?;
        let exercises = json::<Vec<Exercise>>(ensure_ok(response)?).await?;
        Ok(exercises
            .into_iter()
            .filter_map(|exercise| {
                let id = exercise.id;
                domain::Exercise::try_from(exercise)
                    .inspect_err(|err| warn!("skipping exercise {id}: {err}"))
                    .ok()
            })
            .collect())
    }
}

impl<S: SendRequest> domain::RoutineRepository for REST<S> {
    async fn read_routines(&self) -> Result<Vec<domain::WeeklyRoutine>, domain::ReadError> {
        let response = self.send(Request::get("api/routines"), None).await?;
        let routines = json::<Vec<Routine>>(ensure_ok(response)?).await?;
        Ok(routines
            .into_iter()
            .filter_map(|routine| {
                let id = routine.id;
                domain::WeeklyRoutine::try_from(routine)
                    .inspect_err(|err| warn!("skipping routine {id}: {err}"))
                    .ok()
            })
            .collect())
    }

    async fn create_routine(
        &self,
        routine: domain::WeeklyRoutine,
    ) -> Result<domain::WeeklyRoutine, domain::CreateError> {
        let routine = if routine.id.is_nil() {
            domain::WeeklyRoutine {
                id: Uuid::new_v4().into(),
                ..routine
            }
        } else {
            routine
        };
        let response = self
            .send(
                Request::post("api/routines"),
                Some(&to_value(&Routine::from(&routine))?),
            )
            .await?;
        if response.status() == 409 {
            return Err(domain::CreateError::Conflict);
        }
        store_response(response).await?;
        Ok(routine)
    }

    async fn replace_routine(
        &self,
        routine: domain::WeeklyRoutine,
    ) -> Result<domain::WeeklyRoutine, domain::UpdateError> {
        let response = self
            .send(
                Request::put(&format!("api/routines/{}", *routine.id)),
                Some(&to_value(&Routine::from(&routine))?),
            )
            .await?;
        match response.status() {
            404 => return Err(domain::UpdateError::NotFound),
            409 => return Err(domain::UpdateError::Conflict),
            _ => {}
        }
        store_response(response).await?;
        Ok(routine)
    }

    async fn modify_routine(
        &self,
        id: domain::RoutineID,
        name: Option<domain::Name>,
        status: Option<domain::RoutineStatus>,
    ) -> Result<domain::WeeklyRoutine, domain::UpdateError> {
        let mut content = serde_json::Map::new();
        if let Some(name) = name {
            content.insert("name".into(), json!(name.to_string()));
        }
        if let Some(status) = status {
            content.insert("status".into(), json!(status.as_str()));
        }
        let response = self
            .send(
                Request::patch(&format!("api/routines/{}", *id)),
                Some(&serde_json::Value::Object(content)),
            )
            .await?;
        match response.status() {
            404 => return Err(domain::UpdateError::NotFound),
            409 => return Err(domain::UpdateError::Conflict),
            _ => {}
        }
        let routine = store_response(response)
            .await?
            .routine
            .ok_or_else(|| domain::StorageError::Other("missing routine in response".into()))?;
        domain::WeeklyRoutine::try_from(routine)
            .map_err(|err| domain::UpdateError::Other(Box::new(err)))
    }

    async fn delete_routine(
        &self,
        id: domain::RoutineID,
    ) -> Result<domain::RoutineID, domain::DeleteError> {
        let response = self
            .send(Request::delete(&format!("api/routines/{}", *id)), None)
            .await?;
        store_response(response).await?;
        Ok(id)
    }
}

impl<S: SendRequest> domain::NotificationRepository for REST<S> {
    async fn send_notification(
        &self,
        notification: domain::Notification,
    ) -> Result<(), domain::SendError> {
        let response = self
            .send(
                Request::post("api/send-email"),
                Some(&json!({
                    "to": notification.recipient,
                    "subject": notification.subject,
                    "body": notification.body,
                })),
            )
            .await?;
        store_response(response).await?;
        Ok(())
    }
}

fn ensure_ok(response: Response) -> Result<Response, domain::StorageError> {
    if response.ok() {
        Ok(response)
    } else {
        Err(domain::StorageError::Other(
            format!("{} {}", response.status(), response.status_text()).into(),
        ))
    }
}

async fn json<T>(response: Response) -> Result<T, domain::StorageError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    response
        .json::<T>()
        .await
        .map_err(|err| domain::StorageError::Other(format!("deserialization failed: {err}").into()))
}

/// Unsuccessful writes are rejections even if delivered with an error status.
async fn store_response(response: Response) -> Result<StoreResponse, domain::StorageError> {
    let ok = response.ok();
    let status = response.status();
    let status_text = response.status_text();
    match response.json::<StoreResponse>().await {
        Ok(StoreResponse {
            success: false,
            message,
            ..
        }) => Err(domain::StorageError::Rejected(
            message.unwrap_or_else(|| format!("{status} {status_text}")),
        )),
        Ok(store_response) if ok => Ok(store_response),
        Err(err) if ok => Err(domain::StorageError::Other(
            format!("deserialization failed: {err}").into(),
        )),
        _ => Err(domain::StorageError::Other(
            format!("{status} {status_text}").into(),
        )),
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, domain::StorageError> {
    serde_json::to_value(value).map_err(|err| domain::StorageError::Other(Box::new(err)))
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct StoreResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine: Option<Routine>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default)]
    pub equipment_tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    pub sets: u32,
    pub reps: u32,
    /// Seconds
    pub rest_duration: i64,
    pub calories_per_set: f32,
}

impl From<domain::Exercise> for Exercise {
    fn from(value: domain::Exercise) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            muscle_groups: value
                .muscle_groups
                .iter()
                .map(|m| m.name().to_string())
                .collect(),
            equipment_tags: value
                .equipment
                .iter()
                .map(|e| e.name().to_string())
                .collect(),
            difficulty: value.difficulty.map(|d| d.name().to_string()),
            sets: value.sets,
            reps: value.reps,
            rest_duration: value.rest.num_seconds(),
            calories_per_set: value.calories_per_set,
        }
    }
}

/// Unknown muscle groups are dropped and unknown equipment is kept as [`domain::Equipment::Other`],
/// as the catalog may use tags this client does not know yet.
impl TryFrom<Exercise> for domain::Exercise {
    type Error = ExerciseError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            muscle_groups: value
                .muscle_groups
                .iter()
                .filter_map(|m| {
                    domain::MuscleGroup::try_from(m.as_str())
                        .inspect_err(|err| debug!("exercise {}: {err}", value.id))
                        .ok()
                })
                .collect(),
            equipment: value
                .equipment_tags
                .iter()
                .map(|e| {
                    domain::Equipment::try_from(e.as_str()).unwrap_or_else(|err| {
                        debug!("exercise {}: {err}", value.id);
                        domain::Equipment::Other
                    })
                })
                .collect(),
            difficulty: value
                .difficulty
                .as_deref()
                .map(domain::Difficulty::try_from)
                .transpose()?,
            sets: value.sets,
            reps: value.reps,
            rest: u32::try_from(value.rest_duration)
                .ok()
                .and_then(|seconds| chrono::Duration::try_seconds(i64::from(seconds)))
                .ok_or(ExerciseError::InvalidRestDuration(value.rest_duration))?,
            calories_per_set: value.calories_per_set,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExerciseError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error(transparent)]
    InvalidDifficulty(#[from] domain::DifficultyError),
    #[error("Rest duration out of range ({0} s)")]
    InvalidRestDuration(i64),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    pub day_count: u32,
    pub day_labels: Vec<String>,
    /// Keyed by the 1-based day index.
    pub focus_by_day_index: BTreeMap<String, String>,
    pub exercises_by_day_label: BTreeMap<String, Vec<Exercise>>,
    pub status: String,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    pub equipment: String,
}

impl From<domain::WeeklyRoutine> for Routine {
    fn from(value: domain::WeeklyRoutine) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::WeeklyRoutine> for Routine {
    fn from(value: &domain::WeeklyRoutine) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            day_count: value.day_count,
            day_labels: value
                .day_labels()
                .iter()
                .map(|d| d.name().to_string())
                .collect(),
            focus_by_day_index: value
                .focus_by_day_index()
                .into_iter()
                .map(|(index, focus)| (index, focus.name().to_string()))
                .collect(),
            exercises_by_day_label: value
                .days
                .iter()
                .map(|d| {
                    (
                        d.weekday.name().to_string(),
                        d.exercises.iter().map(Exercise::from).collect(),
                    )
                })
                .collect(),
            status: value.status.as_str().to_string(),
            objective: value.objective.map(|o| o.name().to_string()),
            level: value.difficulty.map(|d| d.name().to_string()),
            equipment: value.equipment.as_str().to_string(),
        }
    }
}

impl TryFrom<Routine> for domain::WeeklyRoutine {
    type Error = RoutineError;

    fn try_from(mut value: Routine) -> Result<Self, Self::Error> {
        let days = value
            .day_labels
            .iter()
            .enumerate()
            .map(|(index, label)| -> Result<domain::DayPlan, RoutineError> {
                Ok(domain::DayPlan {
                    weekday: domain::Weekday::try_from(label.as_str())?,
                    focus: value
                        .focus_by_day_index
                        .get(&(index + 1).to_string())
                        .map_or(domain::Focus::rotation(index), |focus| {
                            domain::Focus::from_label(focus)
                        }),
                    exercises: value
                        .exercises_by_day_label
                        .remove(label)
                        .unwrap_or_default()
                        .into_iter()
                        .map(domain::Exercise::try_from)
                        .collect::<Result<Vec<_>, _>>()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            day_count: value.day_count,
            days,
            status: domain::RoutineStatus::try_from(value.status.as_str())?,
            objective: value
                .objective
                .as_deref()
                .map(domain::Objective::try_from)
                .transpose()?,
            difficulty: value
                .level
                .as_deref()
                .map(domain::Difficulty::try_from)
                .transpose()?,
            equipment: domain::EquipmentAvailability::try_from(value.equipment.as_str())?,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RoutineError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error(transparent)]
    InvalidWeekday(#[from] domain::WeekdayError),
    #[error(transparent)]
    InvalidExercise(#[from] ExerciseError),
    #[error(transparent)]
    InvalidStatus(#[from] domain::RoutineStatusError),
    #[error(transparent)]
    InvalidObjective(#[from] domain::ObjectiveError),
    #[error(transparent)]
    InvalidLevel(#[from] domain::DifficultyError),
    #[error(transparent)]
    InvalidEquipment(#[from] domain::EquipmentAvailabilityError),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::tests::data::{EXERCISE, EXERCISE_2, ROUTINE};

    use super::*;

    fn catalog_record() -> Exercise {
        Exercise {
            id: Uuid::from_u128(5),
            name: "Sentadilla con trineo".to_string(),
            muscle_groups: vec!["Piernas".to_string(), "Lumbares".to_string()],
            equipment_tags: vec!["Trineo".to_string(), "esterilla".to_string()],
            difficulty: Some("Intermedio".to_string()),
            sets: 4,
            reps: 8,
            rest_duration: 120,
            calories_per_set: 9.5,
        }
    }

    #[test]
    fn test_exercise_from_catalog_record() {
        assert_eq!(
            domain::Exercise::try_from(catalog_record()),
            Ok(domain::Exercise {
                id: 5.into(),
                name: domain::Name::new("Sentadilla con trineo").unwrap(),
                muscle_groups: [domain::MuscleGroup::Legs].into(),
                equipment: [domain::Equipment::Other, domain::Equipment::Mat].into(),
                difficulty: Some(domain::Difficulty::Intermediate),
                sets: 4,
                reps: 8,
                rest: chrono::Duration::seconds(120),
                calories_per_set: 9.5,
            })
        );
    }

    #[rstest]
    #[case(Some("Experto"), Err(ExerciseError::InvalidDifficulty(domain::DifficultyError::Invalid("Experto".to_string()))))]
    #[case(Some("advanced"), Ok(Some(domain::Difficulty::Advanced)))]
    #[case(None, Ok(None))]
    fn test_exercise_difficulty(
        #[case] difficulty: Option<&str>,
        #[case] expected: Result<Option<domain::Difficulty>, ExerciseError>,
    ) {
        let record = Exercise {
            difficulty: difficulty.map(str::to_string),
            ..catalog_record()
        };
        assert_eq!(
            domain::Exercise::try_from(record).map(|e| e.difficulty),
            expected
        );
    }

    #[rstest]
    #[case(0, Ok(chrono::Duration::zero()))]
    #[case(-1, Err(ExerciseError::InvalidRestDuration(-1)))]
    #[case(i64::MAX, Err(ExerciseError::InvalidRestDuration(i64::MAX)))]
    fn test_exercise_rest_duration(
        #[case] rest_duration: i64,
        #[case] expected: Result<chrono::Duration, ExerciseError>,
    ) {
        let record: Exercise = serde_json::from_value(serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000005",
            "name": "Sentadilla con trineo",
            "sets": 4,
            "reps": 8,
            "restDuration": rest_duration,
            "caloriesPerSet": 9.5,
        }))
        .unwrap();
        assert_eq!(domain::Exercise::try_from(record).map(|e| e.rest), expected);
    }

    #[test]
    fn test_exercise_without_name() {
        let record = Exercise {
            name: " ".to_string(),
            ..catalog_record()
        };
        assert_eq!(
            domain::Exercise::try_from(record),
            Err(ExerciseError::InvalidName(domain::NameError::Empty))
        );
    }

    #[test]
    fn test_routine_from_weekly_routine() {
        let routine = Routine::from(&*ROUTINE);

        assert_eq!(routine.id, Uuid::from_u128(1));
        assert_eq!(routine.name, "Rutina de fuerza");
        assert_eq!(routine.day_count, 2);
        assert_eq!(routine.day_labels, vec!["Lunes", "Martes"]);
        assert_eq!(
            routine.focus_by_day_index,
            BTreeMap::from([
                ("1".to_string(), "Pecho y Tríceps".to_string()),
                ("2".to_string(), "Espalda y Bíceps".to_string()),
            ])
        );
        assert_eq!(
            routine.exercises_by_day_label,
            BTreeMap::from([
                ("Lunes".to_string(), vec![Exercise::from(&*EXERCISE)]),
                (
                    "Martes".to_string(),
                    vec![Exercise::from(&*EXERCISE_2), Exercise::from(&*EXERCISE)]
                ),
            ])
        );
        assert_eq!(routine.status, "in-progress");
        assert_eq!(routine.objective, Some("Ganar masa muscular".to_string()));
        assert_eq!(routine.level, None);
        assert_eq!(routine.equipment, "basic");
        assert_eq!(
            domain::WeeklyRoutine::try_from(routine),
            Ok(ROUTINE.clone())
        );
    }

    #[test]
    fn test_routine_focus_fallback() {
        let mut routine = Routine::from(&*ROUTINE);
        routine.focus_by_day_index = BTreeMap::from([("2".to_string(), "Yoga".to_string())]);

        let routine = domain::WeeklyRoutine::try_from(routine).unwrap();

        assert_eq!(
            routine.days.iter().map(|d| d.focus).collect::<Vec<_>>(),
            vec![domain::Focus::ChestTriceps, domain::Focus::FullBody]
        );
    }

    #[test]
    fn test_routine_invalid_status() {
        let mut routine = Routine::from(&*ROUTINE);
        routine.status = "archived".to_string();

        assert_eq!(
            domain::WeeklyRoutine::try_from(routine),
            Err(RoutineError::InvalidStatus(
                domain::RoutineStatusError::Invalid("archived".to_string())
            ))
        );
    }

    #[test]
    fn test_routine_serialization() {
        let value = serde_json::to_value(Routine::from(&*ROUTINE)).unwrap();

        assert_eq!(value["dayCount"], json!(2));
        assert_eq!(value["dayLabels"], json!(["Lunes", "Martes"]));
        assert_eq!(value["focusByDayIndex"]["1"], json!("Pecho y Tríceps"));
        assert_eq!(
            value["exercisesByDayLabel"]["Lunes"][0]["equipmentTags"],
            json!(["Ninguno"])
        );
        assert_eq!(
            value["exercisesByDayLabel"]["Lunes"][0]["restDuration"],
            json!(60)
        );
    }

    #[rstest]
    #[case(json!({ "success": true }), StoreResponse { success: true, message: None, routine: None })]
    #[case(
        json!({ "success": false, "message": "Nombre duplicado" }),
        StoreResponse { success: false, message: Some("Nombre duplicado".to_string()), routine: None }
    )]
    fn test_store_response_deserialization(
        #[case] value: serde_json::Value,
        #[case] expected: StoreResponse,
    ) {
        assert_eq!(
            serde_json::from_value::<StoreResponse>(value).unwrap(),
            expected
        );
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    mod wasm {
        use std::cell::RefCell;

        use pretty_assertions::assert_eq;
        use rutina_domain::{ExerciseRepository, NotificationRepository, RoutineRepository};
        use wasm_bindgen_test::wasm_bindgen_test;

        use crate::tests::data::{EXERCISES, ROUTINE, ROUTINES};

        use super::*;

        #[wasm_bindgen_test]
        async fn test_read_exercises() {
            assert!(matches!(
                rest_with_response(None).read_exercises().await,
                Err(domain::ReadError::Storage(
                    domain::StorageError::NoConnection
                ))
            ));

            assert_eq!(
                rest_with_response(Some(
                    gloo_net::http::Response::builder().status(200).json(
                        &EXERCISES
                            .iter()
                            .map(Exercise::from)
                            .collect::<Vec<_>>()
                    )
                ))
                .read_exercises()
                .await
                .unwrap(),
                EXERCISES.to_vec()
            );
        }

        #[wasm_bindgen_test]
        async fn test_read_exercises_skips_invalid_records() {
            let mut invalid = Exercise::from(&EXERCISES[0]);
            invalid.difficulty = Some("Experto".to_string());

            assert_eq!(
                rest_with_response(Some(
                    gloo_net::http::Response::builder()
                        .status(200)
                        .json(&vec![invalid, Exercise::from(&EXERCISES[1])])
                ))
                .read_exercises()
                .await
                .unwrap(),
                vec![EXERCISES[1].clone()]
            );
        }

        #[wasm_bindgen_test]
        async fn test_read_routines() {
            assert_eq!(
                rest_with_response(Some(
                    gloo_net::http::Response::builder().status(200).json(
                        &ROUTINES
                            .iter()
                            .map(Routine::from)
                            .collect::<Vec<_>>()
                    )
                ))
                .read_routines()
                .await
                .unwrap(),
                ROUTINES.to_vec()
            );
        }

        #[wasm_bindgen_test]
        async fn test_create_routine() {
            let routine = domain::WeeklyRoutine {
                id: domain::RoutineID::nil(),
                ..ROUTINE.clone()
            };

            let created = rest_with_response(Some(
                gloo_net::http::Response::builder()
                    .status(200)
                    .json(&json!({ "success": true })),
            ))
            .create_routine(routine.clone())
            .await
            .unwrap();

            assert!(!created.id.is_nil());
            assert_eq!(
                created,
                domain::WeeklyRoutine {
                    id: created.id,
                    ..routine
                }
            );
        }

        #[wasm_bindgen_test]
        async fn test_create_routine_rejected() {
            assert!(matches!(
                rest_with_response(Some(
                    gloo_net::http::Response::builder()
                        .status(200)
                        .json(&json!({ "success": false, "message": "Límite alcanzado" })),
                ))
                .create_routine(ROUTINE.clone())
                .await,
                Err(domain::CreateError::Storage(domain::StorageError::Rejected(message)))
                    if message == "Límite alcanzado"
            ));
        }

        #[wasm_bindgen_test]
        async fn test_create_routine_conflict() {
            assert!(matches!(
                rest_with_response(Some(
                    gloo_net::http::Response::builder()
                        .status(409)
                        .json(&json!({ "success": false })),
                ))
                .create_routine(ROUTINE.clone())
                .await,
                Err(domain::CreateError::Conflict)
            ));
        }

        #[wasm_bindgen_test]
        async fn test_replace_routine_not_found() {
            assert!(matches!(
                rest_with_response(Some(
                    gloo_net::http::Response::builder()
                        .status(404)
                        .body::<Option<&str>>(None),
                ))
                .replace_routine(ROUTINE.clone())
                .await,
                Err(domain::UpdateError::NotFound)
            ));
        }

        #[wasm_bindgen_test]
        async fn test_modify_routine() {
            let mut expected = ROUTINE.clone();
            expected.set_status(domain::RoutineStatus::Completed);

            assert_eq!(
                rest_with_response(Some(
                    gloo_net::http::Response::builder().status(200).json(&StoreResponse {
                        success: true,
                        message: None,
                        routine: Some(Routine::from(&expected)),
                    })
                ))
                .modify_routine(ROUTINE.id, None, Some(domain::RoutineStatus::Completed))
                .await
                .unwrap(),
                expected
            );
        }

        #[wasm_bindgen_test]
        async fn test_delete_routine() {
            assert_eq!(
                rest_with_response(Some(
                    gloo_net::http::Response::builder()
                        .status(200)
                        .json(&json!({ "success": true })),
                ))
                .delete_routine(ROUTINE.id)
                .await
                .unwrap(),
                ROUTINE.id
            );
        }

        #[wasm_bindgen_test]
        async fn test_send_notification() {
            let rest = rest_with_response(Some(
                gloo_net::http::Response::builder()
                    .status(200)
                    .json(&json!({ "success": true, "message": "Enviado" })),
            ));

            rest.send_notification(domain::Notification {
                recipient: "ana@example.com".to_string(),
                subject: "Nueva rutina".to_string(),
                body: "Lunes".to_string(),
            })
            .await
            .unwrap();

            let request = rest.sender.request.borrow_mut().take().unwrap();
            assert_eq!(request.url(), "api/send-email");
            assert_eq!(request.method(), gloo_net::http::Method::POST);
        }

        #[wasm_bindgen_test]
        async fn test_send_notification_failed() {
            assert!(matches!(
                rest_with_response(Some(
                    gloo_net::http::Response::builder()
                        .status(500)
                        .json(&json!({ "success": false, "message": "Servidor de correo caído" })),
                ))
                .send_notification(domain::Notification {
                    recipient: "ana@example.com".to_string(),
                    subject: String::new(),
                    body: String::new(),
                })
                .await,
                Err(domain::SendError::Storage(domain::StorageError::Rejected(message)))
                    if message == "Servidor de correo caído"
            ));
        }

        fn rest_with_response(
            response: Option<Result<gloo_net::http::Response, gloo_net::Error>>,
        ) -> REST<MockSendRequest> {
            REST::with_sender(MockSendRequest {
                request: RefCell::new(None),
                response: RefCell::new(response),
            })
        }

        struct MockSendRequest {
            request: RefCell<Option<gloo_net::http::Request>>,
            response: RefCell<Option<Result<gloo_net::http::Response, gloo_net::Error>>>,
        }

        impl SendRequest for MockSendRequest {
            async fn send_request(
                &self,
                request: gloo_net::http::Request,
            ) -> Result<gloo_net::http::Response, gloo_net::Error> {
                *self.request.borrow_mut() = Some(request);
                (*self.response.borrow_mut())
                    .take()
                    .unwrap_or(Err(gloo_net::Error::GlooError("no response".to_string())))
            }
        }
    }
}
