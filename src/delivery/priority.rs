// ABOUTME: One alert decision per delivered batch

use std::time::{Duration, Instant};

use crate::models::{Notification, Priority};

/// Highest priority in the batch, `None` when it is empty.
pub fn highest_priority<'a, I>(batch: I) -> Option<Priority>
where
    I: IntoIterator<Item = &'a Notification>,
{
    batch.into_iter().map(Notification::priority).max()
}

/// Sound and vibration parameters for one alert.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertPlan {
    pub priority: Priority,
    pub volume: f32,
    pub vibration: &'static [u64],
}

impl AlertPlan {
    pub fn for_priority(priority: Priority) -> Self {
        Self {
            priority,
            volume: priority.volume(),
            vibration: priority.vibration_pattern(),
        }
    }
}

/// Enforces the minimum gap between two sounds.
#[derive(Debug, Clone)]
pub struct AlertGate {
    cooldown: Duration,
    last_sound: Option<Instant>,
}

impl AlertGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_sound: None,
        }
    }

    /// Claim the sound slot at `now`; false while still cooling down.
    pub fn try_trigger(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_sound {
            if now.saturating_duration_since(last) < self.cooldown {
                return false;
            }
        }
        self.last_sound = Some(now);
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arbitration {
    /// Nothing was accepted
    Silent,
    /// Batch had alerts but the cooldown was active
    Suppressed(Priority),
    Alert(AlertPlan),
}

#[derive(Debug, Clone)]
pub struct PriorityArbitrator {
    gate: AlertGate,
}

impl PriorityArbitrator {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            gate: AlertGate::new(cooldown),
        }
    }

    pub fn arbitrate(&mut self, batch: &[Notification], now: Instant) -> Arbitration {
        let Some(priority) = highest_priority(batch) else {
            return Arbitration::Silent;
        };

        if self.gate.try_trigger(now) {
            Arbitration::Alert(AlertPlan::for_priority(priority))
        } else {
            Arbitration::Suppressed(priority)
        }
    }
}
