//! Fixed-rate stepping decoupled from the display refresh rate.

use std::time::Duration;

/// Upper bound on simulation steps run for a single rendered frame.
///
/// Time beyond the bound is discarded so a stalled window does not replay a
/// burst of held-key movement once it resumes.
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// Accumulates rendered frame time and releases whole simulation steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedTimestep {
    step: Duration,
    accumulated: Duration,
}

impl FixedTimestep {
    /// Creates a timestep that releases `frame_rate` steps per second.
    ///
    /// Returns `None` when `frame_rate` is zero.
    #[must_use]
    pub fn from_frame_rate(frame_rate: u32) -> Option<Self> {
        if frame_rate == 0 {
            return None;
        }

        Some(Self {
            step: Duration::from_secs(1) / frame_rate,
            accumulated: Duration::ZERO,
        })
    }

    /// Adds the elapsed frame time and returns how many steps are now due.
    pub fn advance(&mut self, frame_dt: Duration) -> u32 {
        self.accumulated += frame_dt;

        let mut due = 0;
        while self.accumulated >= self.step && due < MAX_STEPS_PER_FRAME {
            self.accumulated -= self.step;
            due += 1;
        }

        if due == MAX_STEPS_PER_FRAME {
            self.accumulated = self.accumulated.min(self.step);
        }

        due
    }
}
