#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod cache;
mod error;
mod exercise;
mod generator;
mod name;
mod notification;
mod routine;
mod service;
mod workout;

pub use cache::{Cache, NoCache};
pub use error::{
    CreateError, DeleteError, ReadError, SendError, StorageError, UpdateError, ValidationError,
};
pub use exercise::{
    Difficulty, DifficultyError, Equipment, EquipmentError, Exercise, ExerciseFilter, ExerciseID,
    ExerciseRepository, ExerciseService, MuscleGroup, MuscleGroupError, Property,
};
pub use generator::{
    EquipmentAvailability, EquipmentAvailabilityError, FocusAssignment, GeneratorConfig,
    RoutineParameters, generate_days, generate_routine,
};
pub use name::{Name, NameError};
pub use notification::{
    Notification, NotificationRepository, NotificationService, RecipientError,
    validate_recipient,
};
pub use routine::{
    DayCount, DayCountError, DayPlan, Focus, Objective, ObjectiveError, RoutineID,
    RoutineRepository, RoutineService, RoutineStatus, RoutineStatusError, WeeklyRoutine, Weekday,
    WeekdayError,
};
pub use service::Service;
pub use workout::{Phase, Step, WorkoutTimer};
