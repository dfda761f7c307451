use super::account::Account;
use super::form::PaymentRequest;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only table of payer accounts.
pub trait AccountLookup: Send + Sync {
    fn resolve(&self, id: &str) -> Option<Account>;
    /// Every account, in the order the payer select lists them.
    fn accounts(&self) -> Vec<Account>;
}

/// Remote check of a candidate IBAN.
///
/// `Ok(true)` only when the service explicitly confirms validity.
#[async_trait]
pub trait IbanService: Send + Sync {
    async fn check(&self, iban: &str) -> Result<bool>;
}

/// Receives validated payments once the form accepts them.
#[async_trait]
pub trait PaymentSink: Send + Sync {
    async fn submit(&self, payment: &PaymentRequest) -> Result<()>;
}

pub type AccountLookupRef = Arc<dyn AccountLookup>;
pub type IbanServiceRef = Arc<dyn IbanService>;
pub type PaymentSinkRef = Arc<dyn PaymentSink>;
