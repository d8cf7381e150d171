use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    slice::Iter,
};

use chrono::{Datelike, Duration, NaiveDate};
use derive_more::Deref;
use log::debug;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, Difficulty, EquipmentAvailability, Exercise, GeneratorConfig,
    MuscleGroup, Name, Property, ReadError, RoutineParameters, UpdateError, ValidationError,
    exercise::fold,
};

#[allow(async_fn_in_trait)]
pub trait RoutineService {
    async fn get_routines(&self) -> Result<Vec<WeeklyRoutine>, ReadError>;
    async fn generate_routine(
        &self,
        name: Name,
        objective: Option<Objective>,
        parameters: RoutineParameters,
        config: &GeneratorConfig,
    ) -> Result<WeeklyRoutine, CreateError>;
    async fn regenerate_routine(
        &self,
        id: RoutineID,
        parameters: RoutineParameters,
        config: &GeneratorConfig,
    ) -> Result<WeeklyRoutine, UpdateError>;
    async fn rename_routine(&self, id: RoutineID, name: Name)
    -> Result<WeeklyRoutine, UpdateError>;
    async fn set_routine_status(
        &self,
        id: RoutineID,
        status: RoutineStatus,
    ) -> Result<WeeklyRoutine, UpdateError>;
    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError>;

    async fn validate_routine_name(
        &self,
        name: &str,
        id: RoutineID,
    ) -> Result<Name, ValidationError> {
        match Name::new(name) {
            Ok(name) => match self.get_routines().await {
                Ok(routines) => {
                    if routines.iter().all(|r| r.id == id || r.name != name) {
                        Ok(name)
                    } else {
                        Err(ValidationError::Conflict("name".to_string()))
                    }
                }
                Err(err) => Err(ValidationError::Other(err.into())),
            },
            Err(err) => Err(ValidationError::Other(err.into())),
        }
    }

    fn validate_day_count(&self, day_count: &str) -> Result<DayCount, DayCountError> {
        DayCount::try_from(day_count)
    }
}

#[allow(async_fn_in_trait)]
pub trait RoutineRepository {
    async fn read_routines(&self) -> Result<Vec<WeeklyRoutine>, ReadError>;
    async fn create_routine(&self, routine: WeeklyRoutine) -> Result<WeeklyRoutine, CreateError>;
    async fn replace_routine(&self, routine: WeeklyRoutine)
    -> Result<WeeklyRoutine, UpdateError>;
    async fn modify_routine(
        &self,
        id: RoutineID,
        name: Option<Name>,
        status: Option<RoutineStatus>,
    ) -> Result<WeeklyRoutine, UpdateError>;
    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyRoutine {
    pub id: RoutineID,
    pub name: Name,
    pub day_count: u32,
    pub days: Vec<DayPlan>,
    pub status: RoutineStatus,
    pub objective: Option<Objective>,
    pub difficulty: Option<Difficulty>,
    pub equipment: EquipmentAvailability,
}

impl WeeklyRoutine {
    #[must_use]
    pub fn day_labels(&self) -> Vec<Weekday> {
        self.days.iter().map(|d| d.weekday).collect()
    }

    /// Focus per day, keyed by the 1-based day index.
    #[must_use]
    pub fn focus_by_day_index(&self) -> BTreeMap<String, Focus> {
        self.days
            .iter()
            .enumerate()
            .map(|(index, day)| ((index + 1).to_string(), day.focus))
            .collect()
    }

    #[must_use]
    pub fn exercises_by_day_label(&self) -> BTreeMap<Weekday, &[Exercise]> {
        self.days
            .iter()
            .map(|day| (day.weekday, day.exercises.as_slice()))
            .collect()
    }

    /// The day of the routine scheduled on the weekday of the given date.
    #[must_use]
    pub fn day_on(&self, date: NaiveDate) -> Option<&DayPlan> {
        let weekday = Weekday::from(date.weekday());
        self.days.iter().find(|d| d.weekday == weekday)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.days.iter().map(DayPlan::duration).sum()
    }

    #[must_use]
    pub fn total_calories(&self) -> f32 {
        self.days.iter().map(DayPlan::total_calories).sum()
    }

    #[must_use]
    pub fn muscle_groups(&self) -> BTreeSet<MuscleGroup> {
        self.days
            .iter()
            .flat_map(|d| d.exercises.iter())
            .flat_map(|e| e.muscle_groups.iter().copied())
            .collect()
    }

    pub fn rename(&mut self, name: Name) {
        self.name = name;
    }

    pub fn set_status(&mut self, status: RoutineStatus) {
        if self.status != status {
            debug!(
                "routine \"{}\" changed from {} to {status}",
                self.name, self.status
            );
        }
        self.status = status;
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoutineID(Uuid);

impl RoutineID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for RoutineID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for RoutineID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayPlan {
    pub weekday: Weekday,
    pub focus: Focus,
    pub exercises: Vec<Exercise>,
}

impl DayPlan {
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.exercises.iter().map(Exercise::duration).sum()
    }

    #[must_use]
    pub fn total_calories(&self) -> f32 {
        self.exercises.iter().map(Exercise::total_calories).sum()
    }

    #[must_use]
    pub fn num_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// The first `count` days of the week, starting on Monday, without repeats.
    #[must_use]
    pub fn sequence(count: usize) -> Vec<Weekday> {
        Weekday::iter().take(count).copied().collect()
    }
}

impl Property for Weekday {
    fn iter() -> Iter<'static, Weekday> {
        static WEEKDAYS: [Weekday; 7] = [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ];
        WEEKDAYS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }
}

impl TryFrom<&str> for Weekday {
    type Error = WeekdayError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let folded = fold(value);
        Weekday::iter()
            .find(|w| fold(w.name()) == folded)
            .copied()
            .ok_or_else(|| WeekdayError::Invalid(value.trim().to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeekdayError {
    #[error("Unknown weekday \"{0}\"")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Focus {
    ChestTriceps,
    BackBiceps,
    LegsShoulders,
    FullBody,
    CoreCardio,
}

impl Focus {
    /// Focus used for day `i` (0-based) when no explicit focus was chosen: `ROTATION[i % 5]`.
    pub const ROTATION: [Focus; 5] = [
        Focus::ChestTriceps,
        Focus::BackBiceps,
        Focus::LegsShoulders,
        Focus::CoreCardio,
        Focus::FullBody,
    ];

    #[must_use]
    pub fn rotation(day_index: usize) -> Focus {
        Self::ROTATION[day_index % Self::ROTATION.len()]
    }

    /// Unknown labels fall back to the broadest focus.
    #[must_use]
    pub fn from_label(label: &str) -> Focus {
        let folded = fold(label);
        Focus::iter()
            .find(|f| fold(f.name()) == folded)
            .copied()
            .unwrap_or_else(|| {
                debug!("unknown focus \"{label}\", using {}", Focus::FullBody.name());
                Focus::FullBody
            })
    }

    #[must_use]
    pub fn muscle_groups(self) -> BTreeSet<MuscleGroup> {
        match self {
            Focus::ChestTriceps => BTreeSet::from([
                MuscleGroup::Chest,
                MuscleGroup::Triceps,
                MuscleGroup::Shoulders,
            ]),
            Focus::BackBiceps => BTreeSet::from([
                MuscleGroup::Back,
                MuscleGroup::Biceps,
                MuscleGroup::Forearms,
            ]),
            Focus::LegsShoulders => BTreeSet::from([
                MuscleGroup::Legs,
                MuscleGroup::Quads,
                MuscleGroup::Hamstrings,
                MuscleGroup::Glutes,
                MuscleGroup::Calves,
                MuscleGroup::Shoulders,
            ]),
            Focus::CoreCardio => {
                BTreeSet::from([MuscleGroup::Core, MuscleGroup::Abs, MuscleGroup::Cardio])
            }
            Focus::FullBody => MuscleGroup::iter().copied().collect(),
        }
    }
}

impl Property for Focus {
    fn iter() -> Iter<'static, Focus> {
        static FOCUS: [Focus; 5] = [
            Focus::ChestTriceps,
            Focus::BackBiceps,
            Focus::LegsShoulders,
            Focus::FullBody,
            Focus::CoreCardio,
        ];
        FOCUS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Focus::ChestTriceps => "Pecho y Tríceps",
            Focus::BackBiceps => "Espalda y Bíceps",
            Focus::LegsShoulders => "Piernas y Hombros",
            Focus::FullBody => "Full Body",
            Focus::CoreCardio => "Core y Cardio",
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DayCount(u32);

impl DayCount {
    pub const MIN: u32 = 2;
    pub const MAX: u32 = 6;

    pub fn new(value: u32) -> Result<Self, DayCountError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DayCountError::OutOfRange(value));
        }

        Ok(Self(value))
    }
}

impl From<DayCount> for u32 {
    fn from(value: DayCount) -> Self {
        value.0
    }
}

impl TryFrom<&str> for DayCount {
    type Error = DayCountError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => DayCount::new(parsed_value),
            Err(_) => Err(DayCountError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DayCountError {
    #[error("Days per week must be between 2 and 6 ({0})")]
    OutOfRange(u32),
    #[error("Days per week must be an integer")]
    ParseError,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RoutineStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl RoutineStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RoutineStatus::Pending => "pending",
            RoutineStatus::InProgress => "in-progress",
            RoutineStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for RoutineStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for RoutineStatus {
    type Error = RoutineStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().replace('_', "-").as_str() {
            "pending" => Ok(RoutineStatus::Pending),
            "in-progress" => Ok(RoutineStatus::InProgress),
            "completed" => Ok(RoutineStatus::Completed),
            _ => Err(RoutineStatusError::Invalid(value.trim().to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RoutineStatusError {
    #[error("Unknown routine status \"{0}\"")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Objective {
    MuscleGain,
    FatLoss,
    Endurance,
    GeneralFitness,
}

impl Property for Objective {
    fn iter() -> Iter<'static, Objective> {
        static OBJECTIVE: [Objective; 4] = [
            Objective::MuscleGain,
            Objective::FatLoss,
            Objective::Endurance,
            Objective::GeneralFitness,
        ];
        OBJECTIVE.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Objective::MuscleGain => "Ganar masa muscular",
            Objective::FatLoss => "Perder peso",
            Objective::Endurance => "Resistencia",
            Objective::GeneralFitness => "Mantenerse en forma",
        }
    }
}

impl TryFrom<&str> for Objective {
    type Error = ObjectiveError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let folded = fold(value);
        Objective::iter()
            .find(|o| fold(o.name()) == folded)
            .copied()
            .ok_or_else(|| ObjectiveError::Invalid(value.trim().to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ObjectiveError {
    #[error("Unknown objective \"{0}\"")]
    Invalid(String),
}
