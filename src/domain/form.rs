use super::account::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five inputs of the payment form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Amount,
    PayeeAccount,
    Purpose,
    PayerAccount,
    Payee,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Amount,
        Field::PayeeAccount,
        Field::Purpose,
        Field::PayerAccount,
        Field::Payee,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Amount => "amount",
            Field::PayeeAccount => "payeeAccount",
            Field::Purpose => "purpose",
            Field::PayerAccount => "payerAccount",
            Field::Payee => "payee",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Amount => "Amount *",
            Field::PayeeAccount => "Payee Account (IBAN) *",
            Field::Purpose => "Purpose *",
            Field::PayerAccount => "Payer Account *",
            Field::Payee => "Payee *",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = String;

    /// Accepts both `payee_account` and `payeeAccount` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amount" => Ok(Field::Amount),
            "payee_account" | "payeeAccount" => Ok(Field::PayeeAccount),
            "purpose" => Ok(Field::Purpose),
            "payer_account" | "payerAccount" => Ok(Field::PayerAccount),
            "payee" => Ok(Field::Payee),
            other => Err(format!("unknown field '{other}'")),
        }
    }
}

/// Raw values currently entered in the form.
///
/// `amount` is `None` when the numeric input holds something that is not a
/// number (an empty input, for instance).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub amount: Option<Decimal>,
    pub payee_account: String,
    pub purpose: String,
    pub payer_account: String,
    pub payee: String,
}

impl FormValues {
    /// Starting values of a fresh form session.
    pub fn initial(default_payee_account: impl Into<String>) -> Self {
        Self {
            amount: Some(Decimal::ZERO),
            payee_account: default_payee_account.into(),
            purpose: String::new(),
            payer_account: String::new(),
            payee: String::new(),
        }
    }

    /// Text shown in the input for `field`.
    pub fn display(&self, field: Field) -> String {
        match field {
            Field::Amount => self.amount.map(|a| a.to_string()).unwrap_or_default(),
            Field::PayeeAccount => self.payee_account.clone(),
            Field::Purpose => self.purpose.clone(),
            Field::PayerAccount => self.payer_account.clone(),
            Field::Payee => self.payee.clone(),
        }
    }
}

/// A payment that passed every field rule, ready to hand off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub payee_account: String,
    pub purpose: String,
    pub payer_account: AccountId,
    pub payee: String,
}
