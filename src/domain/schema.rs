//! Field-level constraints checked when the user submits the form.
//!
//! Every field is checked and every failure is reported, one message per
//! field, in display order. A passing run yields a [`PaymentRequest`].

use super::account::AccountId;
use super::form::{Field, FormValues, PaymentRequest};
use super::ports::AccountLookup;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub const MIN_AMOUNT: Decimal = dec!(0.01);
pub const MAX_AMOUNT: Decimal = dec!(1000000);
pub const PURPOSE_MIN_LEN: usize = 3;
pub const PURPOSE_MAX_LEN: usize = 135;
pub const PAYEE_MAX_LEN: usize = 70;

/// A single inline error attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All field errors of one failed schema run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("{}", render(.0))]
#[serde(transparent)]
pub struct SchemaErrors(Vec<FieldError>);

fn render(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SchemaErrors {
    pub fn push(&mut self, error: FieldError) {
        // one message per field; the first failing rule wins
        if self.get(error.field).is_none() {
            self.0.push(error);
            self.0.sort_by_key(|e| e.field);
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Declarative rule set of the payment form.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentSchema;

impl PaymentSchema {
    pub fn validate(
        &self,
        values: &FormValues,
        accounts: &dyn AccountLookup,
    ) -> Result<PaymentRequest, SchemaErrors> {
        let mut errors = SchemaErrors::default();

        let amount = check_amount(values.amount, &mut errors);

        if values.payee_account.is_empty() {
            errors.push(FieldError::new(
                Field::PayeeAccount,
                "Payee account is required",
            ));
        }

        let purpose_len = values.purpose.chars().count();
        if purpose_len < PURPOSE_MIN_LEN {
            errors.push(FieldError::new(
                Field::Purpose,
                format!("Purpose must be at least {PURPOSE_MIN_LEN} characters"),
            ));
        } else if purpose_len > PURPOSE_MAX_LEN {
            errors.push(FieldError::new(
                Field::Purpose,
                format!("Purpose cannot exceed {PURPOSE_MAX_LEN} characters"),
            ));
        }

        let payer_account = check_payer_account(&values.payer_account, accounts, &mut errors);

        let payee_len = values.payee.chars().count();
        if payee_len == 0 {
            errors.push(FieldError::new(Field::Payee, "Payee is required"));
        } else if payee_len > PAYEE_MAX_LEN {
            errors.push(FieldError::new(
                Field::Payee,
                format!("Payee name cannot exceed {PAYEE_MAX_LEN} characters"),
            ));
        }

        match (amount, payer_account) {
            (Some(amount), Some(payer_account)) if errors.is_empty() => Ok(PaymentRequest {
                amount,
                payee_account: values.payee_account.clone(),
                purpose: values.purpose.clone(),
                payer_account,
                payee: values.payee.clone(),
            }),
            _ => Err(errors),
        }
    }
}

fn check_amount(amount: Option<Decimal>, errors: &mut SchemaErrors) -> Option<Decimal> {
    let Some(amount) = amount else {
        errors.push(FieldError::new(Field::Amount, "Amount must be a number"));
        return None;
    };
    if amount < MIN_AMOUNT {
        errors.push(FieldError::new(
            Field::Amount,
            format!("Amount must be at least {MIN_AMOUNT}"),
        ));
        None
    } else if amount > MAX_AMOUNT {
        errors.push(FieldError::new(
            Field::Amount,
            "Amount exceeds maximum limit",
        ));
        None
    } else {
        Some(amount)
    }
}

fn check_payer_account(
    id: &str,
    accounts: &dyn AccountLookup,
    errors: &mut SchemaErrors,
) -> Option<AccountId> {
    if id.is_empty() {
        errors.push(FieldError::new(
            Field::PayerAccount,
            "Payer account is required",
        ));
        return None;
    }
    match accounts.resolve(id) {
        Some(account) => Some(account.id),
        None => {
            errors.push(FieldError::new(
                Field::PayerAccount,
                "Payer account does not exist",
            ));
            None
        }
    }
}
