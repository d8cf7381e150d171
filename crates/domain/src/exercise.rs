use std::{
    collections::{BTreeSet, HashSet},
    slice::Iter,
};

use chrono::Duration;
use derive_more::Deref;
use uuid::Uuid;

use crate::{Name, ReadError};

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
}

/// Estimated time under tension per repetition.
const SECONDS_PER_REP: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub muscle_groups: BTreeSet<MuscleGroup>,
    pub equipment: BTreeSet<Equipment>,
    pub difficulty: Option<Difficulty>,
    pub sets: u32,
    pub reps: u32,
    pub rest: Duration,
    pub calories_per_set: f32,
}

impl Exercise {
    #[must_use]
    pub fn targets_any(&self, muscle_groups: &BTreeSet<MuscleGroup>) -> bool {
        !self.muscle_groups.is_disjoint(muscle_groups)
    }

    /// An exercise without equipment tags, or tagged only with the sentinel, needs no equipment.
    #[must_use]
    pub fn requires_no_equipment(&self) -> bool {
        self.equipment.iter().all(|e| *e == Equipment::None)
    }

    #[must_use]
    pub fn uses_any(&self, equipment: &BTreeSet<Equipment>) -> bool {
        !self.equipment.is_disjoint(equipment)
    }

    /// Exercises without a difficulty suit every level.
    #[must_use]
    pub fn suits(&self, difficulty: Option<Difficulty>) -> bool {
        match (difficulty, self.difficulty) {
            (Some(requested), Some(own)) => requested == own,
            _ => true,
        }
    }

    #[must_use]
    pub fn total_calories(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let sets = self.sets as f32;
        sets * self.calories_per_set
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        let work = self
            .sets
            .saturating_mul(self.reps)
            .saturating_mul(SECONDS_PER_REP);
        let breaks = i32::try_from(self.sets.saturating_sub(1)).unwrap_or(i32::MAX);
        self.rest
            .checked_mul(breaks)
            .and_then(|rest| Duration::seconds(i64::from(work)).checked_add(&rest))
            .unwrap_or(Duration::MAX)
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Core,
    Abs,
    Legs,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Cardio,
}

impl Property for MuscleGroup {
    fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLE_GROUPS: [MuscleGroup; 14] = [
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Shoulders,
            MuscleGroup::Biceps,
            MuscleGroup::Triceps,
            MuscleGroup::Forearms,
            MuscleGroup::Core,
            MuscleGroup::Abs,
            MuscleGroup::Legs,
            MuscleGroup::Quads,
            MuscleGroup::Hamstrings,
            MuscleGroup::Glutes,
            MuscleGroup::Calves,
            MuscleGroup::Cardio,
        ];
        MUSCLE_GROUPS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Pecho",
            MuscleGroup::Back => "Espalda",
            MuscleGroup::Shoulders => "Hombros",
            MuscleGroup::Biceps => "Bíceps",
            MuscleGroup::Triceps => "Tríceps",
            MuscleGroup::Forearms => "Antebrazos",
            MuscleGroup::Core => "Core",
            MuscleGroup::Abs => "Abdominales",
            MuscleGroup::Legs => "Piernas",
            MuscleGroup::Quads => "Cuádriceps",
            MuscleGroup::Hamstrings => "Isquiotibiales",
            MuscleGroup::Glutes => "Glúteos",
            MuscleGroup::Calves => "Pantorrillas",
            MuscleGroup::Cardio => "Cardio",
        }
    }
}

impl TryFrom<&str> for MuscleGroup {
    type Error = MuscleGroupError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse(value).ok_or_else(|| MuscleGroupError::Invalid(value.trim().to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MuscleGroupError {
    #[error("Unknown muscle group \"{0}\"")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Equipment {
    /// No equipment required.
    None,
    Dumbbells,
    Barbell,
    Kettlebell,
    ResistanceBands,
    Bench,
    PullUpBar,
    Mat,
    Machine,
    Cable,
    /// Equipment the application does not know by name.
    Other,
}

impl Property for Equipment {
    fn iter() -> Iter<'static, Equipment> {
        static EQUIPMENT: [Equipment; 10] = [
            Equipment::Dumbbells,
            Equipment::Barbell,
            Equipment::Kettlebell,
            Equipment::ResistanceBands,
            Equipment::Bench,
            Equipment::PullUpBar,
            Equipment::Mat,
            Equipment::Machine,
            Equipment::Cable,
            Equipment::Other,
        ];
        EQUIPMENT.iter()
    }

    fn iter_filter() -> Iter<'static, Equipment> {
        static EQUIPMENT: [Equipment; 11] = [
            Equipment::Dumbbells,
            Equipment::Barbell,
            Equipment::Kettlebell,
            Equipment::ResistanceBands,
            Equipment::Bench,
            Equipment::PullUpBar,
            Equipment::Mat,
            Equipment::Machine,
            Equipment::Cable,
            Equipment::Other,
            Equipment::None,
        ];
        EQUIPMENT.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Equipment::None => "Ninguno",
            Equipment::Dumbbells => "Mancuernas",
            Equipment::Barbell => "Barra",
            Equipment::Kettlebell => "Kettlebell",
            Equipment::ResistanceBands => "Bandas elásticas",
            Equipment::Bench => "Banco",
            Equipment::PullUpBar => "Barra de dominadas",
            Equipment::Mat => "Esterilla",
            Equipment::Machine => "Máquina",
            Equipment::Cable => "Polea",
            Equipment::Other => "Otro",
        }
    }
}

impl TryFrom<&str> for Equipment {
    type Error = EquipmentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if ["sin equipo", "peso corporal"].contains(&fold(value).as_str()) {
            return Ok(Equipment::None);
        }
        parse(value).ok_or_else(|| EquipmentError::Invalid(value.trim().to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EquipmentError {
    #[error("Unknown equipment \"{0}\"")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Property for Difficulty {
    fn iter() -> Iter<'static, Difficulty> {
        static DIFFICULTY: [Difficulty; 3] = [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ];
        DIFFICULTY.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Principiante",
            Difficulty::Intermediate => "Intermedio",
            Difficulty::Advanced => "Avanzado",
        }
    }
}

impl TryFrom<&str> for Difficulty {
    type Error = DifficultyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match fold(value).as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => parse(value).ok_or_else(|| DifficultyError::Invalid(value.trim().to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DifficultyError {
    #[error("Unknown difficulty \"{0}\"")]
    Invalid(String),
}

#[derive(Default, PartialEq)]
pub struct ExerciseFilter {
    pub name: String,
    pub muscle_groups: HashSet<MuscleGroup>,
    pub equipment: HashSet<Equipment>,
    pub difficulty: HashSet<Difficulty>,
}

impl ExerciseFilter {
    #[must_use]
    pub fn exercises<'a>(
        &self,
        exercises: impl Iterator<Item = &'a Exercise>,
    ) -> Vec<&'a Exercise> {
        exercises
            .filter(|e| {
                e.name
                    .as_ref()
                    .to_lowercase()
                    .contains(self.name.to_lowercase().trim())
                    && self
                        .muscle_groups
                        .iter()
                        .all(|m| e.muscle_groups.contains(m))
                    && (self.equipment.is_empty()
                        || self.equipment.iter().any(|equipment| {
                            if *equipment == Equipment::None {
                                e.requires_no_equipment()
                            } else {
                                e.equipment.contains(equipment)
                            }
                        }))
                    && (self.difficulty.is_empty()
                        || e.difficulty.is_none_or(|d| self.difficulty.contains(&d)))
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.muscle_groups.is_empty()
            && self.equipment.is_empty()
            && self.difficulty.is_empty()
    }

    #[must_use]
    pub fn muscle_group_list(&self) -> Vec<(MuscleGroup, bool)> {
        MuscleGroup::iter_filter()
            .map(|m| (*m, self.muscle_groups.contains(m)))
            .collect::<Vec<_>>()
    }

    #[must_use]
    pub fn equipment_list(&self) -> Vec<(Equipment, bool)> {
        Equipment::iter_filter()
            .map(|e| (*e, self.equipment.contains(e)))
            .collect::<Vec<_>>()
    }

    #[must_use]
    pub fn difficulty_list(&self) -> Vec<(Difficulty, bool)> {
        Difficulty::iter_filter()
            .map(|d| (*d, self.difficulty.contains(d)))
            .collect::<Vec<_>>()
    }

    pub fn toggle_muscle_group(&mut self, muscle_group: MuscleGroup) {
        if !self.muscle_groups.remove(&muscle_group) {
            self.muscle_groups.insert(muscle_group);
        }
    }

    pub fn toggle_equipment(&mut self, equipment: Equipment) {
        if !self.equipment.remove(&equipment) {
            self.equipment.insert(equipment);
        }
    }

    pub fn toggle_difficulty(&mut self, difficulty: Difficulty) {
        if !self.difficulty.remove(&difficulty) {
            self.difficulty.insert(difficulty);
        }
    }
}

pub trait Property: Clone + Copy + Sized + 'static {
    fn iter() -> Iter<'static, Self>;
    fn iter_filter() -> Iter<'static, Self> {
        Self::iter()
    }
    fn name(self) -> &'static str;
}

fn parse<P: Property>(value: &str) -> Option<P> {
    let folded = fold(value);
    P::iter_filter().find(|p| fold(p.name()) == folded).copied()
}

/// Lowercases and strips Spanish diacritics so that "Biceps" and "bíceps" compare equal.
pub(crate) fn fold(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            c => c,
        })
        .collect()
}
