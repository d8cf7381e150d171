#![warn(clippy::pedantic)]

pub mod log;
mod ongoing_workout;
mod service;
mod settings;

pub use ongoing_workout::{
    OngoingWorkout, OngoingWorkoutRepository, OngoingWorkoutService, TimerState,
};
pub use service::Service;
pub use settings::{Settings, SettingsRepository, SettingsService};
