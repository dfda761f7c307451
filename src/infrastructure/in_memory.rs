use crate::domain::account::{Account, AccountId, Balance};
use crate::domain::form::PaymentRequest;
use crate::domain::ports::{AccountLookup, PaymentSink};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// A fixed, in-memory table of payer accounts.
///
/// Accounts keep the order they were supplied in, which is the order the
/// payer account select lists them.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccountLookup {
    accounts: Vec<Account>,
}

impl InMemoryAccountLookup {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    /// The three demo accounts the form ships with.
    pub fn with_defaults() -> Self {
        let account = |id: &str, iban: &str, balance| {
            Account::new(AccountId::new(id), iban, Balance::new(balance))
        };
        Self::new(vec![
            account("1", "LT307300010172619160", dec!(1000.12)),
            account("2", "LT307300010172619161", dec!(2.43)),
            account("3", "LT307300010172619162", dec!(-5.87)),
        ])
    }
}

impl AccountLookup for InMemoryAccountLookup {
    fn resolve(&self, id: &str) -> Option<Account> {
        self.accounts.iter().find(|a| a.id.as_str() == id).cloned()
    }

    fn accounts(&self) -> Vec<Account> {
        self.accounts.clone()
    }
}

/// Collects every accepted payment in memory.
///
/// Clones share the same buffer, so a handle kept by the caller sees what the
/// session submitted.
#[derive(Default, Clone)]
pub struct InMemoryPaymentSink {
    payments: Arc<RwLock<Vec<PaymentRequest>>>,
}

impl InMemoryPaymentSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn payments(&self) -> Vec<PaymentRequest> {
        self.payments.read().await.clone()
    }
}

#[async_trait]
impl PaymentSink for InMemoryPaymentSink {
    async fn submit(&self, payment: &PaymentRequest) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.push(payment.clone());
        Ok(())
    }
}

/// Hands payments to the log and nowhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPaymentSink;

#[async_trait]
impl PaymentSink for LoggingPaymentSink {
    async fn submit(&self, payment: &PaymentRequest) -> Result<()> {
        let payload = serde_json::to_string(payment)?;
        info!(%payload, "Form submitted");
        Ok(())
    }
}
