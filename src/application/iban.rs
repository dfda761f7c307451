use crate::domain::ports::IbanServiceRef;
use crate::error::FormError;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Runs one remote IBAN check and folds every failure into `false`.
///
/// Transport errors, bad statuses, unparsable bodies and timeouts are logged
/// and never reach the caller.
#[derive(Clone)]
pub struct IbanValidator {
    service: IbanServiceRef,
    timeout: Duration,
}

impl IbanValidator {
    pub fn new(service: IbanServiceRef, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub async fn validate(&self, iban: &str) -> bool {
        if iban.is_empty() {
            debug!("Skipping IBAN check for empty input");
            return false;
        }

        let outcome = match timeout(self.timeout, self.service.check(iban)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FormError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(valid) => valid,
            Err(e) => {
                warn!(iban, error = %e, "IBAN validation error");
                false
            }
        }
    }
}
