use chrono::{DateTime, Duration, Utc};

#[allow(async_fn_in_trait)]
pub trait OngoingWorkoutService {
    async fn get_ongoing_workout(&self) -> Result<Option<OngoingWorkout>, String>;
    async fn set_ongoing_workout(&self, ongoing_workout: Option<OngoingWorkout>)
    -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait OngoingWorkoutRepository {
    async fn read_ongoing_workout(&self) -> Result<Option<OngoingWorkout>, String>;
    async fn write_ongoing_workout(
        &self,
        ongoing_workout: Option<OngoingWorkout>,
    ) -> Result<(), String>;
}

/// The workout currently performed, kept across page reloads.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct OngoingWorkout {
    pub routine_id: u128,
    pub day_idx: usize,
    pub start_time: DateTime<Utc>,
    pub step_idx: usize,
    pub step_start_time: DateTime<Utc>,
    pub timer_state: TimerState,
}

impl OngoingWorkout {
    #[must_use]
    pub fn new(routine_id: u128, day_idx: usize) -> Self {
        let now = Utc::now();
        Self {
            routine_id,
            day_idx,
            start_time: now,
            step_idx: 0,
            step_start_time: now,
            timer_state: TimerState::Unset,
        }
    }

    pub fn next_step(&mut self, rest: Option<Duration>, now: DateTime<Utc>) {
        self.step_idx += 1;
        self.step_start_time = now;
        self.timer_state = match rest {
            Some(rest) => TimerState::Active {
                target_time: now + rest,
            },
            None => TimerState::Unset,
        };
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum TimerState {
    Unset,
    Active { target_time: DateTime<Utc> },
    /// Remaining milliseconds at the time of pausing.
    Paused { time: i64 },
}

impl TimerState {
    #[must_use]
    pub fn remaining(self, now: DateTime<Utc>) -> Option<Duration> {
        match self {
            TimerState::Unset => None,
            TimerState::Active { target_time } => Some((target_time - now).max(Duration::zero())),
            TimerState::Paused { time } => Some(Duration::milliseconds(time)),
        }
    }

    #[must_use]
    pub fn pause(self, now: DateTime<Utc>) -> TimerState {
        match self {
            TimerState::Active { .. } => TimerState::Paused {
                time: self
                    .remaining(now)
                    .map_or(0, |remaining| remaining.num_milliseconds()),
            },
            TimerState::Unset | TimerState::Paused { .. } => self,
        }
    }

    #[must_use]
    pub fn resume(self, now: DateTime<Utc>) -> TimerState {
        match self {
            TimerState::Paused { time } => TimerState::Active {
                target_time: now + Duration::milliseconds(time),
            },
            TimerState::Unset | TimerState::Active { .. } => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn test_ongoing_workout_next_step() {
        let mut workout = OngoingWorkout::new(7, 2);
        assert_eq!(workout.step_idx, 0);
        assert_eq!(workout.timer_state, TimerState::Unset);

        workout.next_step(Some(Duration::seconds(60)), at(0));
        assert_eq!(workout.step_idx, 1);
        assert_eq!(workout.step_start_time, at(0));
        assert_eq!(
            workout.timer_state,
            TimerState::Active {
                target_time: at(60)
            }
        );

        workout.next_step(None, at(70));
        assert_eq!(workout.step_idx, 2);
        assert_eq!(workout.timer_state, TimerState::Unset);
    }

    #[test]
    fn test_timer_state_pause_resume() {
        let active = TimerState::Active {
            target_time: at(60),
        };
        assert_eq!(active.remaining(at(15)), Some(Duration::seconds(45)));
        assert_eq!(active.remaining(at(90)), Some(Duration::zero()));

        let paused = active.pause(at(15));
        assert_eq!(paused, TimerState::Paused { time: 45_000 });
        assert_eq!(paused.remaining(at(1000)), Some(Duration::seconds(45)));
        assert_eq!(paused.pause(at(20)), paused);

        assert_eq!(
            paused.resume(at(100)),
            TimerState::Active {
                target_time: at(145)
            }
        );
        assert_eq!(TimerState::Unset.resume(at(100)), TimerState::Unset);
        assert_eq!(TimerState::Unset.remaining(at(100)), None);
    }
}
