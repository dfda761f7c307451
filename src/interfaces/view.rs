use crate::application::controller::{FormPhase, FormState};
use crate::domain::form::Field;
use crate::domain::iban::IbanVerdict;
use crate::domain::ports::AccountLookup;
use crate::domain::schema::{PAYEE_MAX_LEN, PURPOSE_MAX_LEN};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub field: Field,
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

/// What the user sees of the form: values, inline errors and hints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub status: FormPhase,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
}

impl FormView {
    pub fn render(state: &FormState, accounts: &dyn AccountLookup, currency: &str) -> Self {
        let fields = Field::ALL
            .iter()
            .map(|&field| FieldView {
                field,
                label: field.label(),
                value: state.values.display(field),
                error: state.errors.get(field).map(str::to_string),
                hints: hints(state, field, currency),
                options: match field {
                    Field::PayerAccount => accounts
                        .accounts()
                        .into_iter()
                        .map(|account| SelectOption {
                            value: account.id.to_string(),
                            label: format!("{} - {} {currency}", account.iban, account.balance),
                        })
                        .collect(),
                    _ => Vec::new(),
                },
            })
            .collect();

        let submitting = state.is_submitting();
        Self {
            fields,
            status: state.phase.clone(),
            submit_label: if submitting {
                "Processing..."
            } else {
                "Submit Payment"
            },
            submit_enabled: !submitting,
        }
    }

    pub fn field(&self, field: Field) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.field == field)
    }
}

fn hints(state: &FormState, field: Field, currency: &str) -> Vec<String> {
    let mut hints = Vec::new();
    match field {
        Field::Amount => {
            if let Some(account) = &state.selected_account {
                hints.push(format!("Available balance: {} {currency}", account.balance));
            }
            if state.funds_exhausted() {
                hints.push("No funds available on the selected account".to_string());
            }
        }
        Field::PayeeAccount => {
            let hint = if state.iban.is_validating {
                Some("Validating IBAN...")
            } else {
                match state.iban.result {
                    IbanVerdict::Valid => Some("Valid IBAN"),
                    IbanVerdict::Invalid => Some("Invalid IBAN"),
                    IbanVerdict::Unknown => None,
                }
            };
            hints.extend(hint.map(str::to_string));
        }
        Field::Purpose => {
            let len = state.values.purpose.chars().count();
            hints.push(format!("{len}/{PURPOSE_MAX_LEN} characters"));
        }
        Field::Payee => {
            let len = state.values.payee.chars().count();
            hints.push(format!("{len}/{PAYEE_MAX_LEN} characters"));
        }
        Field::PayerAccount => {}
    }
    hints
}
