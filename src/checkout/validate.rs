use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use thiserror::Error;

use super::PaymentFormData;

const CARD_DIGITS: usize = 16;
const CVV_MIN_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PaymentField {
    CardNumber,
    CardholderName,
    ExpiryDate,
    Cvv,
    SaveCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("this field is required")]
    Required,

    #[error("card number must be 16 digits")]
    CardNumberLength,

    #[error("use the MM/YY format")]
    ExpiryFormat,

    #[error("month must be between 01 and 12")]
    InvalidMonth,

    #[error("card has expired")]
    Expired,

    #[error("CVV must be at least 3 digits")]
    CvvTooShort,
}

/// Field-keyed errors; empty means the form may be submitted.
pub type FieldErrors = BTreeMap<PaymentField, FieldError>;

/// Validate the whole form against `today`.
pub fn validate(data: &PaymentFormData, today: NaiveDate) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Err(e) = check_card_number(&data.card_number) {
        errors.insert(PaymentField::CardNumber, e);
    }
    if data.cardholder_name.trim().is_empty() {
        errors.insert(PaymentField::CardholderName, FieldError::Required);
    }
    if let Err(e) = check_expiry(&data.expiry_date, today) {
        errors.insert(PaymentField::ExpiryDate, e);
    }
    if let Err(e) = check_cvv(&data.cvv) {
        errors.insert(PaymentField::Cvv, e);
    }

    errors
}

fn check_card_number(value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required);
    }
    let digits = value.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    if digits.len() != CARD_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(FieldError::CardNumberLength);
    }
    Ok(())
}

/// `MM/YY`, month 1-12, not before the current month.
fn check_expiry(value: &str, today: NaiveDate) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required);
    }

    let (mm, yy) = value.split_once('/').ok_or(FieldError::ExpiryFormat)?;
    let two_digits = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_digit());
    if !two_digits(mm) || !two_digits(yy) {
        return Err(FieldError::ExpiryFormat);
    }

    let month: u32 = mm.parse().map_err(|_| FieldError::ExpiryFormat)?;
    let year: i32 = yy.parse().map_err(|_| FieldError::ExpiryFormat)?;
    if !(1..=12).contains(&month) {
        return Err(FieldError::InvalidMonth);
    }

    let current_year = today.year() % 100;
    let current_month = today.month();
    if year < current_year || (year == current_year && month < current_month) {
        return Err(FieldError::Expired);
    }
    Ok(())
}

fn check_cvv(value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required);
    }
    if value.len() < CVV_MIN_DIGITS {
        return Err(FieldError::CvvTooShort);
    }
    Ok(())
}
