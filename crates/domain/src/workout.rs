use chrono::Duration;
use log::debug;

use crate::DayPlan;

/// Sequences the sets and rest periods of a single training day.
///
/// Sets are advanced by the user, rest periods count down and advance on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutTimer {
    steps: Vec<Step>,
    phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Set {
        exercise_idx: usize,
        set: u32,
        reps: u32,
    },
    Rest {
        duration: Duration,
    },
}

impl Step {
    fn countdown(self) -> Option<Duration> {
        match self {
            Step::Set { .. } => None,
            Step::Rest { duration } => Some(duration),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Ready,
    Running {
        step: usize,
        remaining: Option<Duration>,
    },
    Paused {
        step: usize,
        remaining: Option<Duration>,
    },
    Completed,
}

impl WorkoutTimer {
    #[must_use]
    pub fn new(day: &DayPlan) -> Self {
        let mut steps = vec![];
        for (exercise_idx, exercise) in day.exercises.iter().enumerate() {
            for set in 1..=exercise.sets {
                steps.push(Step::Set {
                    exercise_idx,
                    set,
                    reps: exercise.reps,
                });
                steps.push(Step::Rest {
                    duration: exercise.rest,
                });
            }
        }
        if matches!(steps.last(), Some(Step::Rest { .. })) {
            steps.pop();
        }
        Self {
            steps,
            phase: Phase::Ready,
        }
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        match self.phase {
            Phase::Running { step, .. } | Phase::Paused { step, .. } => self.steps.get(step),
            Phase::Ready | Phase::Completed => None,
        }
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Ready {
            self.enter(0);
        }
    }

    /// Counts down the current rest. Sets are untimed and only end by `complete_set` or `skip`.
    ///
    /// Returns true if the timer moved on to another step.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let Phase::Running {
            step,
            remaining: Some(remaining),
        } = self.phase
        else {
            return false;
        };
        match remaining
            .checked_sub(&elapsed)
            .filter(|remaining| *remaining > Duration::zero())
        {
            Some(remaining) => {
                self.phase = Phase::Running {
                    step,
                    remaining: Some(remaining),
                };
                false
            }
            None => {
                self.enter(step + 1);
                true
            }
        }
    }

    pub fn complete_set(&mut self) {
        if let Phase::Running { step, .. } = self.phase {
            if matches!(self.steps.get(step), Some(Step::Set { .. })) {
                self.enter(step + 1);
            }
        }
    }

    pub fn skip(&mut self) {
        if let Phase::Running { step, .. } | Phase::Paused { step, .. } = self.phase {
            self.enter(step + 1);
        }
    }

    pub fn pause(&mut self) {
        if let Phase::Running { step, remaining } = self.phase {
            self.phase = Phase::Paused { step, remaining };
        }
    }

    pub fn resume(&mut self) {
        if let Phase::Paused { step, remaining } = self.phase {
            self.phase = Phase::Running { step, remaining };
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Share of completed steps, between 0 and 1.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f32 {
        match self.phase {
            Phase::Ready => 0.0,
            Phase::Running { step, .. } | Phase::Paused { step, .. } => {
                step as f32 / self.steps.len() as f32
            }
            Phase::Completed => 1.0,
        }
    }

    fn enter(&mut self, step: usize) {
        self.phase = match self.steps.get(step) {
            Some(s) => Phase::Running {
                step,
                remaining: s.countdown(),
            },
            None => {
                debug!("workout completed after {} steps", self.steps.len());
                Phase::Completed
            }
        };
    }
}
