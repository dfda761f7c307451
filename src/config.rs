use std::time::Duration;

pub const DEFAULT_IBAN_ENDPOINT: &str = "https://matavi.eu/validate/";
pub const DEFAULT_PAYEE_ACCOUNT: &str = "LT307300010172619164";
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings of one payment form session.
#[derive(Debug, Clone, PartialEq)]
pub struct FormConfig {
    /// Remote IBAN validation endpoint, queried as `GET <endpoint>?iban=...`.
    pub iban_endpoint: String,
    /// Upper bound on a single remote IBAN check.
    pub validation_timeout: Duration,
    /// Currency label shown next to balances.
    pub currency: String,
    /// Payee account pre-filled when the form opens.
    pub default_payee_account: String,
    /// Block submission unless the payee IBAN was confirmed valid.
    pub require_valid_iban: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            iban_endpoint: DEFAULT_IBAN_ENDPOINT.to_string(),
            validation_timeout: DEFAULT_VALIDATION_TIMEOUT,
            currency: "EUR".to_string(),
            default_payee_account: DEFAULT_PAYEE_ACCOUNT.to_string(),
            require_valid_iban: false,
        }
    }
}
