use super::controller::{Command, FormController, FormEvent, FormState};
use super::iban::IbanValidator;
use crate::config::FormConfig;
use crate::domain::ports::{AccountLookupRef, IbanServiceRef, PaymentSinkRef};
use std::collections::HashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{error, info, warn};

/// One open payment form.
///
/// Owns the form state and applies every event on the caller's task. Remote
/// IBAN checks and payment hand-offs run as spawned tasks whose settlements
/// come back through a channel and are applied by [`FormSession::settle`].
/// Each task is watched, so a panic still settles as a failed check or a
/// failed hand-off.
///
/// Must be created and driven inside a tokio runtime.
pub struct FormSession {
    controller: FormController,
    state: FormState,
    validator: IbanValidator,
    sink: PaymentSinkRef,
    checks: HashMap<u64, AbortHandle>,
    submission: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<FormEvent>,
    events_rx: UnboundedReceiver<FormEvent>,
}

impl FormSession {
    pub fn new(controller: FormController, validator: IbanValidator, sink: PaymentSinkRef) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (state, commands) = controller.start();
        let mut session = Self {
            controller,
            state,
            validator,
            sink,
            checks: HashMap::new(),
            submission: None,
            events_tx,
            events_rx,
        };
        session.execute(commands);
        session
    }

    /// Wires a session from its collaborators and settings.
    pub fn open(
        accounts: AccountLookupRef,
        iban_service: IbanServiceRef,
        sink: PaymentSinkRef,
        config: &FormConfig,
    ) -> Self {
        let controller = FormController::new(accounts, config);
        let validator = IbanValidator::new(iban_service, config.validation_timeout);
        Self::new(controller, validator, sink)
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    /// True while an IBAN check or a hand-off has not reported back.
    pub fn has_pending_work(&self) -> bool {
        !self.checks.is_empty() || self.submission.is_some()
    }

    /// Applies one event and starts whatever work it asks for.
    pub fn dispatch(&mut self, event: FormEvent) {
        match &event {
            FormEvent::IbanChecked { seq, .. } => {
                self.checks.remove(seq);
            }
            FormEvent::SubmissionSettled(_) => {
                self.submission = None;
            }
            _ => {}
        }

        let state = std::mem::take(&mut self.state);
        let (state, commands) = self.controller.reduce(state, event);
        self.state = state;
        self.execute(commands);
    }

    /// Waits for one settlement and applies it. Returns `false` when nothing
    /// is in flight.
    pub async fn settle_next(&mut self) -> bool {
        if !self.has_pending_work() {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Waits until every in-flight check and hand-off has settled.
    pub async fn settle(&mut self) {
        while self.settle_next().await {}
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::ValidateIban { seq, iban } => {
                    let validator = self.validator.clone();
                    let check = tokio::spawn(async move { validator.validate(&iban).await });
                    self.checks.insert(seq, check.abort_handle());

                    let tx = self.events_tx.clone();
                    tokio::spawn(async move {
                        let valid = match check.await {
                            Ok(valid) => valid,
                            Err(e) if e.is_cancelled() => return,
                            Err(e) => {
                                warn!(seq, error = %e, "IBAN check task failed");
                                false
                            }
                        };
                        let _ = tx.send(FormEvent::IbanChecked { seq, valid });
                    });
                }
                Command::CancelIbanCheck { seq } => {
                    if let Some(handle) = self.checks.remove(&seq) {
                        handle.abort();
                    }
                }
                Command::Submit(payment) => {
                    let sink = self.sink.clone();
                    let hand_off = tokio::spawn(async move {
                        match sink.submit(&payment).await {
                            Ok(()) => {
                                info!(
                                    amount = %payment.amount,
                                    payer_account = %payment.payer_account,
                                    "Payment handed off"
                                );
                                Ok(())
                            }
                            Err(e) => {
                                error!(error = %e, "Form submission error");
                                Err(e.to_string())
                            }
                        }
                    });

                    let tx = self.events_tx.clone();
                    self.submission = Some(tokio::spawn(async move {
                        let outcome = match hand_off.await {
                            Ok(outcome) => outcome,
                            Err(e) => {
                                error!(error = %e, "Form submission error");
                                Err("Submission did not complete".to_string())
                            }
                        };
                        let _ = tx.send(FormEvent::SubmissionSettled(outcome));
                    }));
                }
            }
        }
    }
}

impl Drop for FormSession {
    fn drop(&mut self) {
        for handle in self.checks.values() {
            handle.abort();
        }
    }
}
