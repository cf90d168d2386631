// ABOUTME: Audible and haptic alert outputs

use std::io::{self, Write};
use tracing::{debug, info};

use crate::delivery::priority::AlertPlan;
use crate::error::AlertError;

/// Receives at most one alert per delivered batch.
#[cfg_attr(test, mockall::automock)]
pub trait AlertSink: Send {
    fn play(&mut self, plan: &AlertPlan) -> Result<(), AlertError>;
}

/// Rings the terminal bell; louder tiers ring more times.
///
/// Terminals have no haptics, so the vibration pattern is only logged.
pub struct TerminalBell<W: Write + Send = io::Stdout> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rings(plan: &AlertPlan) -> usize {
        // 0.3 -> 1 ring, 1.0 -> 3 rings
        ((plan.volume * 3.0).round() as usize).clamp(1, 3)
    }
}

impl<W: Write + Send> AlertSink for TerminalBell<W> {
    fn play(&mut self, plan: &AlertPlan) -> Result<(), AlertError> {
        let rings = Self::rings(plan);
        let bells = "\x07".repeat(rings);
        self.out
            .write_all(bells.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| AlertError::Playback(e.to_string()))?;

        debug!(
            priority = plan.priority.as_str(),
            volume = plan.volume,
            vibration = ?plan.vibration,
            "Played alert"
        );
        Ok(())
    }
}

/// Used when sound is disabled.
#[derive(Debug, Default)]
pub struct SilentSink;

impl AlertSink for SilentSink {
    fn play(&mut self, plan: &AlertPlan) -> Result<(), AlertError> {
        info!(priority = plan.priority.as_str(), "Alert muted");
        Ok(())
    }
}
