use crate::bid::{BidOutcome, SessionId};

/// Everything that reaches the main loop from timers and background tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Browser navigation (href = path + query string)
    Navigated { href: String },

    // Type-ahead debounce elapsed for this query
    SearchDue { query: String },

    // Simulated bid call finished
    BidSettled {
        session: SessionId,
        outcome: BidOutcome,
    },

    // Ctrl+C or end of demo
    Shutdown,
}
