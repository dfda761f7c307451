use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed monetary balance of a payer account.
///
/// Wraps `rust_decimal::Decimal` so balances cannot be confused with
/// user-entered amounts. Balances may be negative (overdrawn accounts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// True when nothing can be paid from this balance.
    pub fn is_exhausted(&self) -> bool {
        self.0 <= Decimal::ZERO
    }
}

impl From<Balance> for Decimal {
    fn from(balance: Balance) -> Self {
        balance.0
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Stable key of a payer account, as carried by the payer account select.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A payer account the user can pay from.
///
/// Loaded once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub iban: String,
    pub balance: Balance,
}

impl Account {
    pub fn new(id: AccountId, iban: impl Into<String>, balance: Balance) -> Self {
        Self {
            id,
            iban: iban.into(),
            balance,
        }
    }

    /// Caps `amount` at this account's balance. Never raises it.
    pub fn clamp(&self, amount: Decimal) -> Decimal {
        amount.min(self.balance.0)
    }
}
