use crate::config::FormConfig;
use crate::domain::account::Account;
use crate::domain::form::{Field, FormValues, PaymentRequest};
use crate::domain::iban::{IbanVerdict, ValidationState};
use crate::domain::ports::{AccountLookup, AccountLookupRef};
use crate::domain::schema::{FieldError, PaymentSchema, SchemaErrors};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

/// How the last hand-off of a payment ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum SubmissionOutcome {
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", content = "outcome", rename_all = "lowercase")]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Settled(SubmissionOutcome),
}

/// Everything the form knows during one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub values: FormValues,
    pub selected_account: Option<Account>,
    pub iban: ValidationState,
    pub phase: FormPhase,
    /// Inline errors from the last schema run the user has seen.
    pub errors: SchemaErrors,
    submit_attempted: bool,
}

impl FormState {
    fn new(values: FormValues) -> Self {
        Self {
            values,
            selected_account: None,
            iban: ValidationState::default(),
            phase: FormPhase::Editing,
            errors: SchemaErrors::default(),
            submit_attempted: false,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// The selected account cannot cover any schema-valid amount.
    pub fn funds_exhausted(&self) -> bool {
        self.selected_account
            .as_ref()
            .is_some_and(|a| a.balance.is_exhausted())
    }
}

/// Inputs to the reducer: user edits and settlements of async work.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    AmountChanged(Option<Decimal>),
    PayeeAccountChanged(String),
    PurposeChanged(String),
    PayerAccountChanged(String),
    PayeeChanged(String),
    IbanChecked { seq: u64, valid: bool },
    SubmitRequested,
    SubmissionSettled(Result<(), String>),
}

impl FormEvent {
    /// Builds the edit event for `field` from raw input text.
    ///
    /// Amount text that is not a decimal number becomes `None`, the same as an
    /// empty numeric input. Exponent notation such as `1e3` is accepted.
    pub fn edit(field: Field, raw: &str) -> Self {
        match field {
            Field::Amount => FormEvent::AmountChanged(parse_amount(raw.trim())),
            Field::PayeeAccount => FormEvent::PayeeAccountChanged(raw.to_string()),
            Field::Purpose => FormEvent::PurposeChanged(raw.to_string()),
            Field::PayerAccount => FormEvent::PayerAccountChanged(raw.to_string()),
            Field::Payee => FormEvent::PayeeChanged(raw.to_string()),
        }
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Side effects requested by the reducer, executed by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ValidateIban { seq: u64, iban: String },
    CancelIbanCheck { seq: u64 },
    Submit(PaymentRequest),
}

/// Pure reducer over `(FormState, FormEvent)`.
///
/// Derived state (selected account, amount clamp, IBAN check) is recomputed
/// synchronously after every edit.
pub struct FormController {
    accounts: AccountLookupRef,
    schema: PaymentSchema,
    default_payee_account: String,
    require_valid_iban: bool,
}

impl FormController {
    pub fn new(accounts: AccountLookupRef, config: &FormConfig) -> Self {
        Self {
            accounts,
            schema: PaymentSchema,
            default_payee_account: config.default_payee_account.clone(),
            require_valid_iban: config.require_valid_iban,
        }
    }

    pub fn accounts(&self) -> &dyn AccountLookup {
        self.accounts.as_ref()
    }

    /// Opens a fresh form and checks the pre-filled payee account.
    pub fn start(&self) -> (FormState, Vec<Command>) {
        let mut state = FormState::new(FormValues::initial(&self.default_payee_account));
        let mut commands = Vec::new();
        if !state.values.payee_account.is_empty() {
            let seq = state.iban.begin();
            commands.push(Command::ValidateIban {
                seq,
                iban: state.values.payee_account.clone(),
            });
        }
        (state, commands)
    }

    pub fn reduce(&self, mut state: FormState, event: FormEvent) -> (FormState, Vec<Command>) {
        let mut commands = Vec::new();

        match event {
            FormEvent::AmountChanged(amount) => {
                state.values.amount = amount;
                clamp_amount(&mut state);
                self.after_edit(&mut state);
            }
            FormEvent::PayeeAccountChanged(iban) => {
                if state.values.payee_account != iban {
                    state.values.payee_account = iban;
                    refresh_iban_check(&mut state, &mut commands);
                }
                self.after_edit(&mut state);
            }
            FormEvent::PurposeChanged(purpose) => {
                state.values.purpose = purpose;
                self.after_edit(&mut state);
            }
            FormEvent::PayerAccountChanged(id) => {
                state.selected_account = self.accounts.resolve(&id);
                state.values.payer_account = id;
                clamp_amount(&mut state);
                self.after_edit(&mut state);
            }
            FormEvent::PayeeChanged(payee) => {
                state.values.payee = payee;
                self.after_edit(&mut state);
            }
            FormEvent::IbanChecked { seq, valid } => {
                if state.iban.settle(seq, valid) {
                    if self.require_valid_iban && state.submit_attempted {
                        state.errors = self.check(&state).err().unwrap_or_default();
                    }
                } else {
                    debug!(seq, "Discarding stale IBAN result");
                }
            }
            FormEvent::SubmitRequested => {
                if state.is_submitting() {
                    debug!("Submission already in flight, ignoring submit");
                } else {
                    match self.check(&state) {
                        Ok(request) => {
                            state.errors.clear();
                            state.phase = FormPhase::Submitting;
                            commands.push(Command::Submit(request));
                        }
                        Err(errors) => {
                            state.errors = errors;
                            state.submit_attempted = true;
                            state.phase = FormPhase::Editing;
                        }
                    }
                }
            }
            FormEvent::SubmissionSettled(outcome) => {
                if state.is_submitting() {
                    state.phase = FormPhase::Settled(match outcome {
                        Ok(()) => SubmissionOutcome::Succeeded,
                        Err(reason) => SubmissionOutcome::Failed(reason),
                    });
                }
            }
        }

        (state, commands)
    }

    /// Schema run plus the optional hard gate on the IBAN verdict.
    fn check(&self, state: &FormState) -> Result<PaymentRequest, SchemaErrors> {
        let result = self.schema.validate(&state.values, self.accounts.as_ref());
        let confirmed = state.iban.result == IbanVerdict::Valid && !state.iban.is_validating;
        if !self.require_valid_iban || confirmed {
            return result;
        }

        let message = if state.iban.is_validating {
            "Payee account IBAN is still being validated"
        } else {
            "Payee account IBAN has not been confirmed valid"
        };
        let mut errors = result.err().unwrap_or_default();
        errors.push(FieldError::new(Field::PayeeAccount, message));
        Err(errors)
    }

    fn after_edit(&self, state: &mut FormState) {
        if matches!(state.phase, FormPhase::Settled(_)) {
            state.phase = FormPhase::Editing;
        }
        if state.submit_attempted {
            state.errors = self.check(state).err().unwrap_or_default();
        }
    }
}

fn clamp_amount(state: &mut FormState) {
    if let (Some(account), Some(amount)) = (&state.selected_account, state.values.amount) {
        let clamped = account.clamp(amount);
        if clamped != amount {
            debug!(%amount, %clamped, account = %account.id, "Clamping amount to balance");
            state.values.amount = Some(clamped);
        }
    }
}

fn refresh_iban_check(state: &mut FormState, commands: &mut Vec<Command>) {
    if let Some(seq) = state.iban.pending() {
        commands.push(Command::CancelIbanCheck { seq });
    }
    if state.values.payee_account.is_empty() {
        state.iban.reset();
    } else {
        let seq = state.iban.begin();
        commands.push(Command::ValidateIban {
            seq,
            iban: state.values.payee_account.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountId;
    use crate::infrastructure::in_memory::InMemoryAccountLookup;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn controller() -> FormController {
        controller_with(FormConfig::default())
    }

    fn controller_with(config: FormConfig) -> FormController {
        FormController::new(Arc::new(InMemoryAccountLookup::with_defaults()), &config)
    }

    fn apply(
        controller: &FormController,
        state: FormState,
        events: Vec<FormEvent>,
    ) -> (FormState, Vec<Command>) {
        let mut all = Vec::new();
        let state = events.into_iter().fold(state, |state, event| {
            let (state, commands) = controller.reduce(state, event);
            all.extend(commands);
            state
        });
        (state, all)
    }

    fn filled(controller: &FormController) -> FormState {
        let (state, _) = controller.start();
        let (state, _) = apply(
            controller,
            state,
            vec![
                FormEvent::PayerAccountChanged("1".to_string()),
                FormEvent::AmountChanged(Some(dec!(100.50))),
                FormEvent::PurposeChanged("Test payment".to_string()),
                FormEvent::PayeeChanged("John Doe".to_string()),
            ],
        );
        state
    }

    #[test]
    fn test_start_checks_default_payee_account() {
        let (state, commands) = controller().start();
        assert_eq!(state.values.payee_account, "LT307300010172619164");
        assert!(state.iban.is_validating);
        assert_eq!(
            commands,
            vec![Command::ValidateIban {
                seq: 1,
                iban: "LT307300010172619164".to_string()
            }]
        );
    }

    #[test]
    fn test_selecting_account_clamps_amount_to_balance() {
        let controller = controller();
        for account in controller.accounts().accounts() {
            let (state, _) = controller.start();
            let (state, _) = apply(
                &controller,
                state,
                vec![
                    FormEvent::AmountChanged(Some(dec!(5000))),
                    FormEvent::PayerAccountChanged(account.id.to_string()),
                ],
            );
            assert_eq!(state.values.amount, Some(account.balance.value()));
            assert_eq!(state.selected_account, Some(account));
        }
    }

    #[test]
    fn test_amount_entered_after_selection_is_clamped() {
        let controller = controller();
        let (state, _) = controller.start();
        let (state, _) = apply(
            &controller,
            state,
            vec![
                FormEvent::PayerAccountChanged("2".to_string()),
                FormEvent::AmountChanged(Some(dec!(10))),
            ],
        );
        assert_eq!(state.values.amount, Some(dec!(2.43)));
    }

    #[test]
    fn test_clamp_never_raises_amount() {
        let controller = controller();
        let (state, _) = controller.start();
        let (state, _) = apply(
            &controller,
            state,
            vec![
                FormEvent::AmountChanged(Some(dec!(1))),
                FormEvent::PayerAccountChanged("1".to_string()),
            ],
        );
        assert_eq!(state.values.amount, Some(dec!(1)));
    }

    #[test]
    fn test_negative_balance_yields_negative_amount() {
        let controller = controller();
        let (state, _) = controller.start();
        let (state, _) = apply(
            &controller,
            state,
            vec![
                FormEvent::AmountChanged(Some(dec!(3))),
                FormEvent::PayerAccountChanged("3".to_string()),
            ],
        );
        assert_eq!(state.values.amount, Some(dec!(-5.87)));
        assert!(state.funds_exhausted());
    }

    #[test]
    fn test_unknown_account_clears_selection() {
        let controller = controller();
        let (state, _) = controller.start();
        let (state, _) = apply(
            &controller,
            state,
            vec![
                FormEvent::PayerAccountChanged("1".to_string()),
                FormEvent::PayerAccountChanged("9".to_string()),
                FormEvent::AmountChanged(Some(dec!(5000))),
            ],
        );
        assert!(state.selected_account.is_none());
        assert_eq!(state.values.amount, Some(dec!(5000)));
    }

    #[test]
    fn test_payee_account_change_supersedes_pending_check() {
        let controller = controller();
        let (state, _) = controller.start();
        let (state, commands) = controller.reduce(
            state,
            FormEvent::PayeeAccountChanged("LT30730001017261916".to_string()),
        );
        assert_eq!(
            commands,
            vec![
                Command::CancelIbanCheck { seq: 1 },
                Command::ValidateIban {
                    seq: 2,
                    iban: "LT30730001017261916".to_string()
                },
            ]
        );
        assert!(state.iban.is_validating);
    }

    #[test]
    fn test_unchanged_payee_account_issues_no_check() {
        let controller = controller();
        let (state, _) = controller.start();
        let (_, commands) = controller.reduce(
            state,
            FormEvent::PayeeAccountChanged("LT307300010172619164".to_string()),
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn test_emptied_payee_account_resets_verdict() {
        let controller = controller();
        let (state, _) = controller.start();
        let (state, _) = controller.reduce(state, FormEvent::IbanChecked { seq: 1, valid: true });
        assert_eq!(state.iban.result, IbanVerdict::Valid);

        let (state, commands) =
            controller.reduce(state, FormEvent::PayeeAccountChanged(String::new()));
        assert!(commands.is_empty());
        assert_eq!(state.iban.result, IbanVerdict::Unknown);
        assert!(!state.iban.is_validating);
    }

    #[test]
    fn test_stale_iban_result_is_discarded() {
        let controller = controller();
        let (state, _) = controller.start();
        let (state, _) = apply(
            &controller,
            state,
            vec![
                FormEvent::PayeeAccountChanged("INVALID_IBAN".to_string()),
                FormEvent::IbanChecked { seq: 2, valid: false },
                // the first check settles late
                FormEvent::IbanChecked { seq: 1, valid: true },
            ],
        );
        assert_eq!(state.iban.result, IbanVerdict::Invalid);
        assert!(!state.iban.is_validating);
    }

    #[test]
    fn test_valid_submit_hands_off_request() {
        let controller = controller();
        let state = filled(&controller);
        let (state, commands) = controller.reduce(state, FormEvent::SubmitRequested);

        assert!(state.is_submitting());
        assert!(state.errors.is_empty());
        assert_eq!(
            commands,
            vec![Command::Submit(PaymentRequest {
                amount: dec!(100.50),
                payee_account: "LT307300010172619164".to_string(),
                purpose: "Test payment".to_string(),
                payer_account: AccountId::new("1"),
                payee: "John Doe".to_string(),
            })]
        );
    }

    #[test]
    fn test_invalid_submit_is_a_no_op_with_errors() {
        let controller = controller();
        let mut state = filled(&controller);
        state.values.payee = String::new();
        let values = state.values.clone();

        let (state, commands) = controller.reduce(state, FormEvent::SubmitRequested);

        assert!(commands.is_empty());
        assert_eq!(state.phase, FormPhase::Editing);
        assert_eq!(state.values, values);
        assert_eq!(state.errors.len(), 1);
        assert_eq!(state.errors.get(Field::Payee), Some("Payee is required"));
    }

    #[test]
    fn test_errors_refresh_on_edit_after_failed_submit() {
        let controller = controller();
        let (state, _) = controller.start();
        let (state, _) = controller.reduce(state, FormEvent::SubmitRequested);
        assert!(state.errors.get(Field::Payee).is_some());

        let (state, _) = controller.reduce(state, FormEvent::PayeeChanged("John Doe".to_string()));
        assert!(state.errors.get(Field::Payee).is_none());
        assert!(state.errors.get(Field::Purpose).is_some());
    }

    #[test]
    fn test_errors_hidden_before_first_submit() {
        let controller = controller();
        let (state, _) = controller.start();
        let (state, _) = controller.reduce(state, FormEvent::PurposeChanged("ab".to_string()));
        assert!(state.errors.is_empty());
    }

    #[test]
    fn test_second_submit_while_submitting_is_ignored() {
        let controller = controller();
        let state = filled(&controller);
        let (state, first) = controller.reduce(state, FormEvent::SubmitRequested);
        let (state, second) = controller.reduce(state, FormEvent::SubmitRequested);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert!(state.is_submitting());
    }

    #[test]
    fn test_failed_submission_keeps_values() {
        let controller = controller();
        let state = filled(&controller);
        let values = state.values.clone();
        let (state, _) = apply(
            &controller,
            state,
            vec![
                FormEvent::SubmitRequested,
                FormEvent::SubmissionSettled(Err("gateway down".to_string())),
            ],
        );

        assert_eq!(
            state.phase,
            FormPhase::Settled(SubmissionOutcome::Failed("gateway down".to_string()))
        );
        assert_eq!(state.values, values);
    }

    #[test]
    fn test_settled_form_returns_to_editing_on_edit() {
        let controller = controller();
        let state = filled(&controller);
        let (state, _) = apply(
            &controller,
            state,
            vec![
                FormEvent::SubmitRequested,
                FormEvent::SubmissionSettled(Ok(())),
            ],
        );
        assert_eq!(state.phase, FormPhase::Settled(SubmissionOutcome::Succeeded));

        let (state, _) = controller.reduce(state, FormEvent::PurposeChanged("Rent".to_string()));
        assert_eq!(state.phase, FormPhase::Editing);
    }

    #[test]
    fn test_settlement_without_submission_is_ignored() {
        let controller = controller();
        let (state, _) = controller.start();
        let (state, _) = controller.reduce(state, FormEvent::SubmissionSettled(Ok(())));
        assert_eq!(state.phase, FormPhase::Editing);
    }

    #[test]
    fn test_iban_verdict_is_advisory_by_default() {
        let controller = controller();
        let state = filled(&controller);
        let (state, _) = controller.reduce(state, FormEvent::IbanChecked { seq: 1, valid: false });
        let (_, commands) = controller.reduce(state, FormEvent::SubmitRequested);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_strict_mode_requires_confirmed_iban() {
        let controller = controller_with(FormConfig {
            require_valid_iban: true,
            ..FormConfig::default()
        });
        let state = filled(&controller);

        let (state, commands) = controller.reduce(state, FormEvent::SubmitRequested);
        assert!(commands.is_empty());
        assert_eq!(
            state.errors.get(Field::PayeeAccount),
            Some("Payee account IBAN is still being validated")
        );

        let (state, _) = controller.reduce(state, FormEvent::IbanChecked { seq: 1, valid: false });
        assert_eq!(
            state.errors.get(Field::PayeeAccount),
            Some("Payee account IBAN has not been confirmed valid")
        );

        let (state, _) = apply(
            &controller,
            state,
            vec![
                FormEvent::PayeeAccountChanged("LT307300010172619160".to_string()),
                FormEvent::IbanChecked { seq: 2, valid: true },
            ],
        );
        assert!(state.errors.is_empty());
        let (_, commands) = controller.reduce(state, FormEvent::SubmitRequested);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_edit_parses_amount_text() {
        assert_eq!(
            FormEvent::edit(Field::Amount, " 100.50 "),
            FormEvent::AmountChanged(Some(dec!(100.50)))
        );
        assert_eq!(
            FormEvent::edit(Field::Amount, "abc"),
            FormEvent::AmountChanged(None)
        );
        assert_eq!(
            FormEvent::edit(Field::Amount, "1e3"),
            FormEvent::AmountChanged(Some(dec!(1000)))
        );
        assert_eq!(
            FormEvent::edit(Field::Amount, "2.5e-1"),
            FormEvent::AmountChanged(Some(dec!(0.25)))
        );
        assert_eq!(
            FormEvent::edit(Field::Payee, "John Doe"),
            FormEvent::PayeeChanged("John Doe".to_string())
        );
    }
}
