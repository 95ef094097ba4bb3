use super::{WaveOrchestrator, WaveOutcome};
use crate::game_logic::errors::GrowthResult;
use crate::resources::ScheduleSettings;
use crate::spatial::SpatialQueryPort;
use bevy::log::debug;
use bevy::math::Vec2;
use bevy::time::{Timer, TimerMode};
use std::time::Duration;

/// Fires waves on a fixed interval, driven by whoever owns the game loop
#[derive(Debug, Clone)]
pub struct WaveScheduler {
    timer: Timer,
    paused: bool,
}

impl WaveScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            timer: Timer::new(interval, TimerMode::Repeating),
            paused: false,
        }
    }

    pub fn from_seconds(seconds: f32) -> Self {
        Self::new(Duration::from_secs_f32(seconds))
    }

    pub fn from_settings(settings: &ScheduleSettings) -> Self {
        Self::from_seconds(settings.interval.get())
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn remaining(&self) -> Duration {
        self.timer.remaining()
    }

    /// Advance the clock and return how many waves came due
    pub fn tick(&mut self, delta: Duration) -> u32 {
        if self.paused {
            return 0;
        }
        self.timer.tick(delta);
        self.timer.times_finished_this_tick()
    }

    /// Tick, then run every due wave in order. Stops at the first exhausted wave.
    pub fn drive(
        &mut self,
        delta: Duration,
        orchestrator: &mut WaveOrchestrator,
        spatial: &dyn SpatialQueryPort,
        player: Vec2,
    ) -> GrowthResult<Vec<WaveOutcome>> {
        let due = self.tick(delta);
        let mut outcomes = Vec::with_capacity(due as usize);
        for _ in 0..due {
            let outcome = orchestrator.run_wave(spatial, player)?;
            let exhausted = outcome.is_exhausted();
            outcomes.push(outcome);
            if exhausted {
                debug!("Growth exhausted, dropping remaining due waves");
                break;
            }
        }
        Ok(outcomes)
    }
}
