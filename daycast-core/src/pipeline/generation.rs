/// Identifies one issued request. Only the latest ticket of a [`Generation`] is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonic request counter used for last-writer-wins arbitration.
#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh ticket, making every earlier one stale.
    pub fn issue(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.current
    }

    /// Make every issued ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut generation = Generation::new();
        let first = generation.issue();
        let second = generation.issue();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(first < second);
    }

    #[test]
    fn invalidate_stales_everything() {
        let mut generation = Generation::new();
        let ticket = generation.issue();
        generation.invalidate();

        assert!(!generation.is_current(ticket));
        let fresh = generation.issue();
        assert!(generation.is_current(fresh));
    }
}
