//! Card payment form: masked input, validation, submission.

pub mod mask;
mod storage;
mod validate;

pub use storage::{
    clear_completed_order, BrowserStorage, MemoryStorage, ORDER_LOCAL_KEYS, SHIPPING_SESSION_KEY,
};
pub use validate::{validate, FieldError, FieldErrors, PaymentField};

use chrono::{Local, NaiveDate};
use std::future::Future;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFormData {
    /// Space-grouped digits, e.g. "4111 1111 1111 1111"
    pub card_number: String,
    pub cardholder_name: String,
    /// MM/YY
    pub expiry_date: String,
    pub cvv: String,
    pub save_card: bool,
}

/// Raw value coming from an input element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput<'a> {
    Text(&'a str),
    Checked(bool),
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error("a payment is already in progress")]
    Busy,

    #[error("payment failed: {0}")]
    Handler(anyhow::Error),
}

/// Clears the busy flag when dropped, including when the submit future is cancelled.
struct BusyGuard<'a>(&'a mut bool);

impl<'a> BusyGuard<'a> {
    fn hold(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[derive(Debug, Default)]
pub struct PaymentForm {
    data: PaymentFormData,
    errors: FieldErrors,
    busy: bool,
}

impl PaymentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &PaymentFormData {
        &self.data
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: PaymentField) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    /// True while the payment handler runs.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Input handler: masks are applied here, not at validation time.
    ///
    /// Checkbox values only land on `SaveCard`; text for `SaveCard` is ignored.
    pub fn handle_input(&mut self, field: PaymentField, input: FieldInput<'_>) {
        match (field, input) {
            (PaymentField::CardNumber, FieldInput::Text(raw)) => {
                self.data.card_number = mask::card_number(raw);
            }
            (PaymentField::ExpiryDate, FieldInput::Text(raw)) => {
                self.data.expiry_date = mask::expiry_date(raw);
            }
            (PaymentField::Cvv, FieldInput::Text(raw)) => {
                self.data.cvv = mask::cvv(raw);
            }
            (PaymentField::CardholderName, FieldInput::Text(raw)) => {
                self.data.cardholder_name = raw.to_string();
            }
            (PaymentField::SaveCard, FieldInput::Checked(checked)) => {
                self.data.save_card = checked;
            }
            _ => {}
        }
    }

    /// Validate against today's local date. Returns true when the form is clean.
    pub fn validate(&mut self) -> bool {
        self.validate_on(Local::now().date_naive())
    }

    pub fn validate_on(&mut self, today: NaiveDate) -> bool {
        self.errors = validate(&self.data, today);
        self.errors.is_empty()
    }

    pub fn reset(&mut self) {
        self.data = PaymentFormData::default();
        self.errors.clear();
    }

    pub async fn submit<F, Fut>(&mut self, handler: F) -> Result<(), PaymentError>
    where
        F: FnOnce(PaymentFormData) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        self.submit_on(Local::now().date_naive(), handler).await
    }

    /// Validate, then hand the data to `handler` while the form is busy.
    ///
    /// Handler failures are logged and returned, never swallowed.
    pub async fn submit_on<F, Fut>(&mut self, today: NaiveDate, handler: F) -> Result<(), PaymentError>
    where
        F: FnOnce(PaymentFormData) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        if self.busy {
            return Err(PaymentError::Busy);
        }
        if !self.validate_on(today) {
            return Err(PaymentError::Invalid(self.errors.clone()));
        }

        let data = self.data.clone();
        let result = {
            let _busy = BusyGuard::hold(&mut self.busy);
            handler(data).await
        };

        match result {
            Ok(()) => {
                info!("payment submitted");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "payment handler failed");
                Err(PaymentError::Handler(e))
            }
        }
    }
}
