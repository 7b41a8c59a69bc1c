use std::time::{Duration, Instant};

/// Charge strength a fresh build starts with; nodes begin packed together.
pub const INITIAL_CHARGE: f64 = -35.0;

const STAGES: [(Duration, f64); 2] = [
    (Duration::from_millis(200), -90.0),
    (Duration::from_millis(620), -150.0),
];

/// Staged charge changes after a rebuild: start tight, expand, then settle.
/// A rebuild replaces the schedule, which drops any stage still waiting.
#[derive(Clone, Debug)]
pub struct StrengthSchedule {
    started: Instant,
    next: usize,
}

impl StrengthSchedule {
    pub fn new(now: Instant) -> Self {
        Self {
            started: now,
            next: 0,
        }
    }

    pub fn initial_charge(&self) -> f64 {
        INITIAL_CHARGE
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        STAGES
            .get(self.next)
            .map(|(after, _)| self.started + *after)
    }

    pub fn is_finished(&self) -> bool {
        self.next >= STAGES.len()
    }

    /// Charge of the latest stage that became due since the last poll.
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        let mut charge = None;
        while let Some((after, strength)) = STAGES.get(self.next) {
            if now < self.started + *after {
                break;
            }
            charge = Some(*strength);
            self.next += 1;
        }
        charge
    }
}
