use log::{debug, error, warn};

use crate::{
    CreateError, DeleteError, Exercise, ExerciseRepository, ExerciseService, GeneratorConfig,
    Name, Notification, NotificationRepository, NotificationService, Objective, ReadError,
    RoutineID, RoutineParameters, RoutineRepository, RoutineService, RoutineStatus, SendError,
    UpdateError, WeeklyRoutine, generate_routine,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

impl<R: ExerciseRepository> Service<R> {
    /// A catalog that cannot be read is treated as empty, so that a routine can still be produced.
    async fn exercise_pool(&self) -> Vec<Exercise> {
        match self.get_exercises().await {
            Ok(exercises) => exercises,
            Err(err) => {
                warn!("generating routine without exercises: {err}");
                vec![]
            }
        }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }
}

impl<R: ExerciseRepository + RoutineRepository> RoutineService for Service<R> {
    async fn get_routines(&self) -> Result<Vec<WeeklyRoutine>, ReadError> {
        log_on_error!(
            self.repository.read_routines(),
            ReadError,
            "get",
            "routines"
        )
    }

    async fn generate_routine(
        &self,
        name: Name,
        objective: Option<Objective>,
        parameters: RoutineParameters,
        config: &GeneratorConfig,
    ) -> Result<WeeklyRoutine, CreateError> {
        let pool = self.exercise_pool().await;
        let routine = generate_routine(name, objective, &pool, &parameters, config);
        debug!(
            "generated routine \"{}\" with {} days from {} exercises",
            routine.name,
            routine.days.len(),
            pool.len()
        );
        log_on_error!(
            self.repository.create_routine(routine),
            CreateError,
            "create",
            "routine"
        )
    }

    async fn regenerate_routine(
        &self,
        id: RoutineID,
        parameters: RoutineParameters,
        config: &GeneratorConfig,
    ) -> Result<WeeklyRoutine, UpdateError> {
        let routines = self.get_routines().await?;
        let Some(previous) = routines.into_iter().find(|r| r.id == id) else {
            error!("failed to regenerate routine: routine {} not found", *id);
            return Err(UpdateError::NotFound);
        };
        let pool = self.exercise_pool().await;
        let routine = WeeklyRoutine {
            id,
            ..generate_routine(
                previous.name,
                previous.objective,
                &pool,
                &parameters,
                config,
            )
        };
        log_on_error!(
            self.repository.replace_routine(routine),
            UpdateError,
            "replace",
            "routine"
        )
    }

    async fn rename_routine(&self, id: RoutineID, name: Name) -> Result<WeeklyRoutine, UpdateError> {
        log_on_error!(
            self.repository.modify_routine(id, Some(name), None),
            UpdateError,
            "rename",
            "routine"
        )
    }

    async fn set_routine_status(
        &self,
        id: RoutineID,
        status: RoutineStatus,
    ) -> Result<WeeklyRoutine, UpdateError> {
        log_on_error!(
            self.repository.modify_routine(id, None, Some(status)),
            UpdateError,
            "update status of",
            "routine"
        )
    }

    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError> {
        log_on_error!(
            self.repository.delete_routine(id),
            DeleteError,
            "delete",
            "routine"
        )
    }
}

impl<R: NotificationRepository> NotificationService for Service<R> {
    async fn send_notification(&self, notification: Notification) -> Result<(), SendError> {
        log_on_error!(
            self.repository.send_notification(notification),
            SendError,
            "send",
            "notification"
        )
    }
}
