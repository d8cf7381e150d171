//! Cached
//!
//! The wrapped repository stays the authoritative data source. Caches only serve reads and are
//! dropped whenever routines are modified.

use log::debug;
use rutina_domain::{self as domain, Cache};

pub struct Cached<R, E, T> {
    pub repository: R,
    exercises: E,
    routines: T,
}

impl<R, E, T> Cached<R, E, T>
where
    E: Cache<Vec<domain::Exercise>>,
    T: Cache<Vec<domain::WeeklyRoutine>>,
{
    pub const fn new(repository: R, exercises: E, routines: T) -> Self {
        Self {
            repository,
            exercises,
            routines,
        }
    }

    pub fn invalidate(&self) {
        self.exercises.invalidate();
        self.routines.invalidate();
    }
}

macro_rules! write_through {
    ($self: ident, $method: ident, $($arg:expr),*) => {{
        let result = $self.repository.$method($($arg),*).await;
        if result.is_ok() {
            $self.routines.invalidate();
        }
        result
    }};
}

impl<R, E, T> domain::ExerciseRepository for Cached<R, E, T>
where
    R: domain::ExerciseRepository,
    E: Cache<Vec<domain::Exercise>>,
{
    async fn read_exercises(&self) -> Result<Vec<domain::Exercise>, domain::ReadError> {
        if let Some(exercises) = self.exercises.get() {
            debug!("using {} cached exercises", exercises.len());
            return Ok(exercises);
        }
        let exercises = self.repository.read_exercises().await?;
        self.exercises.put(exercises.clone());
        Ok(exercises)
    }
}

impl<R, E, T> domain::RoutineRepository for Cached<R, E, T>
where
    R: domain::RoutineRepository,
    T: Cache<Vec<domain::WeeklyRoutine>>,
{
    async fn read_routines(&self) -> Result<Vec<domain::WeeklyRoutine>, domain::ReadError> {
        if let Some(routines) = self.routines.get() {
            debug!("using {} cached routines", routines.len());
            return Ok(routines);
        }
        let routines = self.repository.read_routines().await?;
        self.routines.put(routines.clone());
        Ok(routines)
    }

    async fn create_routine(
        &self,
        routine: domain::WeeklyRoutine,
    ) -> Result<domain::WeeklyRoutine, domain::CreateError> {
        write_through!(self, create_routine, routine)
    }

    async fn replace_routine(
        &self,
        routine: domain::WeeklyRoutine,
    ) -> Result<domain::WeeklyRoutine, domain::UpdateError> {
        write_through!(self, replace_routine, routine)
    }

    async fn modify_routine(
        &self,
        id: domain::RoutineID,
        name: Option<domain::Name>,
        status: Option<domain::RoutineStatus>,
    ) -> Result<domain::WeeklyRoutine, domain::UpdateError> {
        write_through!(self, modify_routine, id, name, status)
    }

    async fn delete_routine(
        &self,
        id: domain::RoutineID,
    ) -> Result<domain::RoutineID, domain::DeleteError> {
        write_through!(self, delete_routine, id)
    }
}

impl<R, E, T> domain::NotificationRepository for Cached<R, E, T>
where
    R: domain::NotificationRepository,
{
    async fn send_notification(
        &self,
        notification: domain::Notification,
    ) -> Result<(), domain::SendError> {
        self.repository.send_notification(notification).await
    }
}
