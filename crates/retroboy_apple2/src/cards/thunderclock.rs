use crate::card::Card;

/// Thunderware Thunderclock Plus real-time clock.
#[derive(Debug, Default)]
pub struct Thunderclock;

impl Thunderclock {
    pub fn new() -> Self {
        Self
    }
}

impl Card for Thunderclock {
    fn name(&self) -> &'static str {
        "Thunderclock"
    }
}
