use rand::Rng;

/// What the (simulated) auction backend answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidOutcome {
    /// Bid accepted; the listing price moves up to it.
    Success,
    /// Bid recorded, awaiting seller review.
    Pending,
    /// Bid rejected.
    Failed,
}

impl BidOutcome {
    pub const ALL: [BidOutcome; 3] = [Self::Success, Self::Pending, Self::Failed];
}

/// Decides the outcome of a submitted bid.
pub trait OutcomeSource: Send + Sync {
    fn pick(&self) -> BidOutcome;
}

/// Uniform pick across the three outcomes.
///
/// Placeholder until the auction service defines an acceptance rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOutcome;

impl OutcomeSource for RandomOutcome {
    fn pick(&self) -> BidOutcome {
        let idx = rand::thread_rng().gen_range(0..BidOutcome::ALL.len());
        BidOutcome::ALL[idx]
    }
}

/// Always answers the same thing.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcome(pub BidOutcome);

impl OutcomeSource for FixedOutcome {
    fn pick(&self) -> BidOutcome {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_picks_known_outcome() {
        let source = RandomOutcome;
        for _ in 0..50 {
            assert!(BidOutcome::ALL.contains(&source.pick()));
        }
    }

    #[test]
    fn test_fixed() {
        assert_eq!(FixedOutcome(BidOutcome::Pending).pick(), BidOutcome::Pending);
    }
}
