use crate::domain::account::{Account, AccountId, Balance};
use crate::error::{FormError, Result};
use crate::infrastructure::in_memory::InMemoryAccountLookup;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;

/// Balance is kept as text so its scale survives; csv would hand it over as `f64`.
#[derive(Debug, Deserialize)]
struct AccountRecord {
    id: String,
    iban: String,
    balance: String,
}

impl TryFrom<AccountRecord> for Account {
    type Error = FormError;

    fn try_from(record: AccountRecord) -> Result<Self> {
        if record.id.is_empty() {
            return Err(FormError::AccountError("missing account id".to_string()));
        }
        if record.iban.is_empty() {
            return Err(FormError::AccountError(format!(
                "account {} has no IBAN",
                record.id
            )));
        }
        let balance = Decimal::from_str(&record.balance).map_err(|e| {
            FormError::AccountError(format!(
                "account {} has invalid balance {:?}: {}",
                record.id, record.balance, e
            ))
        })?;
        Ok(Account::new(
            AccountId::new(record.id),
            record.iban,
            Balance::new(balance),
        ))
    }
}

/// Reads a payer account table from CSV with an `id,iban,balance` header.
pub struct AccountReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> AccountReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily yields one account per record.
    pub fn accounts(self) -> impl Iterator<Item = Result<Account>> {
        self.reader.into_deserialize().map(|result| {
            let record: AccountRecord = result?;
            Account::try_from(record)
        })
    }

    /// Reads the whole table. Any bad record or duplicate id fails the load.
    pub fn into_lookup(self) -> Result<InMemoryAccountLookup> {
        let mut seen = HashSet::new();
        let mut accounts = Vec::new();
        for account in self.accounts() {
            let account = account?;
            if !seen.insert(account.id.clone()) {
                return Err(FormError::AccountError(format!(
                    "duplicate account id {}",
                    account.id
                )));
            }
            accounts.push(account);
        }
        Ok(InMemoryAccountLookup::new(accounts))
    }
}
