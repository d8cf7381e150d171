//! Routine generation
//!
//! Every day of a weekly routine is filled independently from the same exercise pool:
//!
//! 1. the day's focus determines the target muscle groups,
//! 2. eligible exercises hitting any target muscle group are selected in pool order,
//! 3. if fewer than the configured minimum were found, the remaining eligible exercises are
//!    appended in pool order regardless of their muscle groups,
//! 4. the list is cut to the configured maximum.
//!
//! Eligibility only depends on the requested difficulty and the available equipment. The result
//! depends on nothing but the inputs, so equal inputs always produce equal routines.

use std::{
    collections::{BTreeMap, BTreeSet},
    slice::Iter,
};

use log::debug;

use crate::{
    DayPlan, Difficulty, Equipment, Exercise, Focus, Name, Objective, Property, RoutineID,
    RoutineStatus, WeeklyRoutine, Weekday, exercise::fold,
};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Days with fewer matching exercises are padded.
    pub min_exercises: usize,
    pub max_exercises: usize,
    /// Equipment a user with basic equipment is expected to own.
    pub basic_equipment: BTreeSet<Equipment>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_exercises: 5,
            max_exercises: 5,
            basic_equipment: BTreeSet::from([
                Equipment::Dumbbells,
                Equipment::ResistanceBands,
                Equipment::Bench,
                Equipment::Mat,
            ]),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum EquipmentAvailability {
    None,
    Basic,
    #[default]
    Full,
}

impl EquipmentAvailability {
    #[must_use]
    pub fn permits(self, exercise: &Exercise, basic_equipment: &BTreeSet<Equipment>) -> bool {
        match self {
            EquipmentAvailability::None => exercise.requires_no_equipment(),
            EquipmentAvailability::Basic => {
                exercise.requires_no_equipment() || exercise.uses_any(basic_equipment)
            }
            EquipmentAvailability::Full => true,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EquipmentAvailability::None => "none",
            EquipmentAvailability::Basic => "basic",
            EquipmentAvailability::Full => "full",
        }
    }
}

impl Property for EquipmentAvailability {
    fn iter() -> Iter<'static, EquipmentAvailability> {
        static EQUIPMENT_AVAILABILITY: [EquipmentAvailability; 3] = [
            EquipmentAvailability::None,
            EquipmentAvailability::Basic,
            EquipmentAvailability::Full,
        ];
        EQUIPMENT_AVAILABILITY.iter()
    }

    fn name(self) -> &'static str {
        match self {
            EquipmentAvailability::None => "Sin equipo",
            EquipmentAvailability::Basic => "Equipo básico",
            EquipmentAvailability::Full => "Gimnasio completo",
        }
    }
}

impl TryFrom<&str> for EquipmentAvailability {
    type Error = EquipmentAvailabilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match fold(value).as_str() {
            "none" | "ninguno" | "sin equipo" => Ok(EquipmentAvailability::None),
            "basic" | "basico" | "equipo basico" => Ok(EquipmentAvailability::Basic),
            "full" | "completo" | "gimnasio completo" => Ok(EquipmentAvailability::Full),
            _ => Err(EquipmentAvailabilityError::Invalid(value.trim().to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EquipmentAvailabilityError {
    #[error("Unknown equipment availability \"{0}\"")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FocusAssignment {
    /// Focus per 1-based day index. Days without an entry use the rotation.
    Explicit(BTreeMap<usize, Focus>),
    #[default]
    Rotation,
}

impl FocusAssignment {
    #[must_use]
    pub fn focus(&self, day_index: usize) -> Focus {
        match self {
            FocusAssignment::Explicit(focus) => focus
                .get(&(day_index + 1))
                .copied()
                .unwrap_or_else(|| Focus::rotation(day_index)),
            FocusAssignment::Rotation => Focus::rotation(day_index),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutineParameters {
    pub day_count: u32,
    pub focus: FocusAssignment,
    pub difficulty: Option<Difficulty>,
    pub equipment: EquipmentAvailability,
}

impl RoutineParameters {
    fn is_eligible(&self, exercise: &Exercise, config: &GeneratorConfig) -> bool {
        exercise.suits(self.difficulty) && self.equipment.permits(exercise, &config.basic_equipment)
    }
}

#[must_use]
pub fn generate_days(
    pool: &[Exercise],
    parameters: &RoutineParameters,
    config: &GeneratorConfig,
) -> Vec<DayPlan> {
    let day_count = usize::try_from(parameters.day_count).unwrap_or(usize::MAX);
    Weekday::sequence(day_count)
        .into_iter()
        .enumerate()
        .map(|(day_index, weekday)| {
            let focus = parameters.focus.focus(day_index);
            DayPlan {
                weekday,
                focus,
                exercises: select_exercises(pool, weekday, focus, parameters, config),
            }
        })
        .collect()
}

#[must_use]
pub fn generate_routine(
    name: Name,
    objective: Option<Objective>,
    pool: &[Exercise],
    parameters: &RoutineParameters,
    config: &GeneratorConfig,
) -> WeeklyRoutine {
    WeeklyRoutine {
        id: RoutineID::nil(),
        name,
        day_count: parameters.day_count,
        days: generate_days(pool, parameters, config),
        status: RoutineStatus::Pending,
        objective,
        difficulty: parameters.difficulty,
        equipment: parameters.equipment,
    }
}

fn select_exercises(
    pool: &[Exercise],
    weekday: Weekday,
    focus: Focus,
    parameters: &RoutineParameters,
    config: &GeneratorConfig,
) -> Vec<Exercise> {
    let targets = focus.muscle_groups();

    let mut selected = pool
        .iter()
        .enumerate()
        .filter(|(_, e)| parameters.is_eligible(e, config) && e.targets_any(&targets))
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    let matching = selected.len();

    if selected.len() < config.min_exercises {
        let padding = pool
            .iter()
            .enumerate()
            .filter(|(i, e)| !selected.contains(i) && parameters.is_eligible(e, config))
            .map(|(i, _)| i)
            .take(config.min_exercises - selected.len())
            .collect::<Vec<_>>();
        selected.extend(padding);
    }

    let padded = selected.len() - matching;
    selected.truncate(config.max_exercises);

    debug!(
        "{weekday} ({focus}): {matching} matching, {padded} padded, {} assigned",
        selected.len()
    );

    selected.into_iter().map(|i| pool[i].clone()).collect()
}
