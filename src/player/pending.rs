use std::time::Instant;

/// A delayed, cancellable play attempt.
///
/// Every schedule or cancel bumps the generation, so an attempt scheduled
/// before a later track switch can never fire.
#[derive(Debug, Default)]
pub struct PendingPlay {
    generation: u64,
    due: Option<(u64, Instant)>,
}

impl PendingPlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a play at `at`, superseding any earlier one. Returns its ticket.
    pub fn schedule(&mut self, at: Instant) -> u64 {
        self.generation += 1;
        self.due = Some((self.generation, at));
        self.generation
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.due = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.due
            .filter(|(ticket, _)| *ticket == self.generation)
            .map(|(_, at)| at)
    }

    pub fn is_pending(&self) -> bool {
        self.deadline().is_some()
    }

    /// Consume the pending attempt if it is current and due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(at) if now >= at => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
