//! Place-a-bid dialog.
//!
//! Flow: `Idle` → `Submitting` → one of `Success` / `Pending` / `Failed`, and `close()`
//! from anywhere back to a closed, idle dialog. The backend call is simulated: a task
//! waits `settle_delay`, asks the [`OutcomeSource`], and reports back on the event
//! channel as [`Event::BidSettled`]. Each open dialog gets a fresh [`SessionId`]; a
//! settlement carrying any other session is dropped.

mod outcome;

pub use outcome::{BidOutcome, FixedOutcome, OutcomeSource, RandomOutcome};

use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::BidSettings;
use crate::events::Event;
use crate::format::format_vnd;

/// Identifies one open/close cycle of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidState {
    Idle,
    Submitting,
    /// Accepted at this amount.
    Success(Decimal),
    Pending,
    Failed,
}

impl BidState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Pending | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidError {
    #[error("bid dialog is not open")]
    NotOpen,

    #[error("a bid is already being submitted")]
    AlreadySubmitting,

    #[error("this bid has already been answered")]
    AlreadySettled,

    #[error("please enter a valid amount")]
    InvalidAmount,

    #[error("bid must be higher than {}", format_vnd(*current))]
    BelowCurrentPrice { current: Decimal },
}

#[derive(Debug, Clone)]
pub struct BidConfig {
    /// Added to price + minimum step for the opening suggestion
    pub seed_offset: Decimal,
    pub settle_delay: Duration,
}

impl Default for BidConfig {
    fn default() -> Self {
        Self::from(&BidSettings::default())
    }
}

impl From<&BidSettings> for BidConfig {
    fn from(settings: &BidSettings) -> Self {
        Self {
            seed_offset: Decimal::from(settings.seed_offset),
            settle_delay: Duration::from_millis(settings.settle_delay_ms),
        }
    }
}

pub struct BidDialog {
    current_price: Decimal,
    minimum_bid_step: Decimal,
    config: BidConfig,
    amount_input: String,
    state: BidState,
    open: bool,
    session: SessionId,
    source: Arc<dyn OutcomeSource>,
    in_flight: Option<JoinHandle<()>>,
}

impl fmt::Debug for BidDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BidDialog")
            .field("current_price", &self.current_price)
            .field("minimum_bid_step", &self.minimum_bid_step)
            .field("amount_input", &self.amount_input)
            .field("state", &self.state)
            .field("open", &self.open)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl BidDialog {
    pub fn new(current_price: Decimal, minimum_bid_step: Decimal, config: BidConfig) -> Self {
        Self::with_source(current_price, minimum_bid_step, config, Arc::new(RandomOutcome))
    }

    pub fn with_source(
        current_price: Decimal,
        minimum_bid_step: Decimal,
        config: BidConfig,
        source: Arc<dyn OutcomeSource>,
    ) -> Self {
        Self {
            current_price,
            minimum_bid_step,
            config,
            amount_input: String::new(),
            state: BidState::Idle,
            open: false,
            session: SessionId(0),
            source,
            in_flight: None,
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn state(&self) -> BidState {
        self.state
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn current_price(&self) -> Decimal {
        self.current_price
    }

    pub fn minimum_bid_step(&self) -> Decimal {
        self.minimum_bid_step
    }

    pub fn amount_input(&self) -> &str {
        &self.amount_input
    }

    /// Opening suggestion: price + minimum step + seed offset.
    pub fn seed_amount(&self) -> Decimal {
        self.current_price + self.minimum_bid_step + self.config.seed_offset
    }

    /// Candidate amount, if the input parses.
    pub fn amount(&self) -> Option<Decimal> {
        self.amount_input.trim().parse::<Decimal>().ok()
    }

    /// Candidate must parse and beat the current price.
    pub fn check_amount(&self) -> Result<Decimal, BidError> {
        let amount = self.amount().ok_or(BidError::InvalidAmount)?;
        if amount <= self.current_price {
            return Err(BidError::BelowCurrentPrice {
                current: self.current_price,
            });
        }
        Ok(amount)
    }

    /// Whether the confirm button is enabled.
    pub fn can_confirm(&self) -> bool {
        self.open && self.state == BidState::Idle && self.check_amount().is_ok()
    }

    /// Inline hint under the amount field, when the amount is not acceptable.
    pub fn validation_hint(&self) -> Option<String> {
        self.check_amount().err().map(|e| e.to_string())
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Open the dialog with a seeded amount and no prior outcome.
    pub fn open(&mut self) {
        self.abort_in_flight();
        self.session = self.session.next();
        self.amount_input = self.seed_amount().to_string();
        self.state = BidState::Idle;
        self.open = true;
        debug!(session = ?self.session, seed = %self.amount_input, "bid dialog opened");
    }

    /// Amount field edit. The field is read-only once a bid has been submitted.
    pub fn set_amount(&mut self, text: impl Into<String>) {
        if self.state != BidState::Idle {
            return;
        }
        self.amount_input = text.into();
    }

    /// Listing price changed elsewhere (another bidder, refresh).
    pub fn set_current_price(&mut self, price: Decimal) {
        self.current_price = price;
    }

    /// Confirm the bid. Starts the simulated call; the answer arrives as
    /// `Event::BidSettled` and must be fed back through [`BidDialog::settle`].
    pub fn submit(&mut self, tx: mpsc::Sender<Event>) -> Result<SessionId, BidError> {
        if !self.open {
            return Err(BidError::NotOpen);
        }
        match self.state {
            BidState::Idle => {}
            BidState::Submitting => return Err(BidError::AlreadySubmitting),
            _ => return Err(BidError::AlreadySettled),
        }
        let amount = self.check_amount()?;

        self.state = BidState::Submitting;
        info!(session = ?self.session, amount = %amount, "submitting bid");

        let session = self.session;
        let delay = self.config.settle_delay;
        let source = Arc::clone(&self.source);
        self.in_flight = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let outcome = source.pick();
            let _ = tx.send(Event::BidSettled { session, outcome }).await;
        }));

        Ok(session)
    }

    /// Apply a settlement. Returns the new price when it must be propagated upward.
    ///
    /// Settlements for another session, a closed dialog, or a dialog that is not
    /// submitting are ignored.
    pub fn settle(&mut self, session: SessionId, outcome: BidOutcome) -> Option<Decimal> {
        if !self.open || session != self.session || self.state != BidState::Submitting {
            debug!(?session, current = ?self.session, ?outcome, "dropping stale bid settlement");
            return None;
        }
        self.in_flight = None;

        match outcome {
            BidOutcome::Success => {
                let amount = self.amount()?;
                // Price moved past the bid while it was in flight
                if amount <= self.current_price {
                    self.state = BidState::Failed;
                    info!(amount = %amount, current = %self.current_price, "bid outbid before acceptance");
                    return None;
                }
                self.state = BidState::Success(amount);
                self.current_price = amount;
                info!(amount = %amount, "bid accepted");
                Some(amount)
            }
            BidOutcome::Pending => {
                self.state = BidState::Pending;
                info!("bid pending review");
                None
            }
            BidOutcome::Failed => {
                self.state = BidState::Failed;
                info!("bid rejected");
                None
            }
        }
    }

    /// Close from any state. Anything still in flight is cancelled.
    pub fn close(&mut self) {
        self.abort_in_flight();
        self.amount_input.clear();
        self.state = BidState::Idle;
        self.open = false;
        self.session = self.session.next();
        debug!("bid dialog closed");
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl Drop for BidDialog {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
