use crate::domain::ports::IbanService;
use crate::error::{FormError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// IBAN check backed by a remote HTTP endpoint.
///
/// Issues `GET <endpoint>?iban=<candidate>` and expects a JSON body with a
/// boolean `valid` field.
#[derive(Debug, Clone)]
pub struct HttpIbanService {
    client: Client,
    endpoint: String,
}

impl HttpIbanService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

/// Only an explicit JSON `true` under `valid` counts as valid.
pub fn is_confirmed_valid(body: &Value) -> bool {
    matches!(body.get("valid"), Some(Value::Bool(true)))
}

#[async_trait]
impl IbanService for HttpIbanService {
    async fn check(&self, iban: &str) -> Result<bool> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("iban", iban)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FormError::UnexpectedStatus(status.as_u16()));
        }

        let body: Value = response.json().await?;
        let valid = is_confirmed_valid(&body);
        debug!(iban, valid, "IBAN service responded");
        Ok(valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_true_is_valid() {
        assert!(is_confirmed_valid(&json!({ "valid": true })));
        assert!(is_confirmed_valid(
            &json!({ "valid": true, "bank": "Swedbank" })
        ));
    }

    #[test]
    fn test_ambiguous_bodies_are_invalid() {
        assert!(!is_confirmed_valid(&json!({ "valid": false })));
        assert!(!is_confirmed_valid(&json!({ "valid": "true" })));
        assert!(!is_confirmed_valid(&json!({ "valid": 1 })));
        assert!(!is_confirmed_valid(&json!({ "isValid": true })));
        assert!(!is_confirmed_valid(&json!([true])));
        assert!(!is_confirmed_valid(&Value::Null));
    }
}
