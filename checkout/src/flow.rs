//! Checkout submission as an explicit state machine.
//!
//! [`SubmissionFlow::handle`] is the only place state changes. It never touches
//! timers or the page: it returns [`Effect`]s and the caller decides how to
//! perform them, so the simulated delays can become a real payment call
//! without changing the transitions.

use std::time::Duration;
use thiserror::Error;

use crate::field::FieldId;
use crate::payment::PaymentMethod;
use crate::ParseError;

pub const CONFIRMATION_PATH: &str = "/sucesso";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Success,
}

/// Reasons a submit click is refused before anything is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("Por favor, selecione um método de pagamento")]
    NoPaymentMethod,
    #[error("Por favor, preencha todos os campos corretamente")]
    InvalidFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub plan_name: String,
    pub total_label: String,
}

/// Outcome of validating the whole form at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionCheck {
    pub method: Option<PaymentMethod>,
    pub invalid_fields: Vec<FieldId>,
    pub order: OrderSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    ProcessingFinished,
    RedirectDue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    SubmitRequested,
    ValidationCompleted(SubmissionCheck),
    ProcessingFinished,
    RedirectDue { timestamp_ms: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ValidateAll,
    Blocked(SubmitBlocked),
    DisableSubmit,
    ShowLoading,
    HideLoading,
    EnableSubmit,
    RevealConfirmation,
    Schedule { event: TimerEvent, after: Duration },
    Navigate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTiming {
    pub processing: Duration,
    pub redirect: Duration,
}

impl Default for FlowTiming {
    fn default() -> Self {
        Self {
            processing: Duration::from_millis(2_000),
            redirect: Duration::from_millis(3_000),
        }
    }
}

/// Data handed to the confirmation page through the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationHandoff {
    pub plan: String,
    pub total: String,
    pub method: String,
    pub timestamp_ms: i64,
}

impl Default for ConfirmationHandoff {
    fn default() -> Self {
        Self {
            plan: "Plano".to_string(),
            total: String::new(),
            method: "indefinido".to_string(),
            timestamp_ms: 0,
        }
    }
}

impl ConfirmationHandoff {
    pub fn to_url(&self) -> String {
        format!(
            "{CONFIRMATION_PATH}?plano={}&valor={}&metodo={}&ts={}",
            urlencoding::encode(&self.plan),
            urlencoding::encode(&self.total),
            urlencoding::encode(&self.method),
            self.timestamp_ms
        )
    }

    /// Reads the handoff back from a query string, with or without the
    /// leading `?`. Missing text values fall back to the page defaults.
    pub fn parse(query: &str) -> Result<Self, ParseError> {
        let mut handoff = ConfirmationHandoff::default();

        for pair in query.trim_start_matches('?').split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let value = urlencoding::decode(raw)
                .map_err(|_| ParseError::InvalidQuery(pair.to_string()))?
                .into_owned();
            match key {
                "plano" => handoff.plan = value,
                "valor" => handoff.total = value,
                "metodo" => handoff.method = value,
                "ts" => {
                    handoff.timestamp_ms = value
                        .parse()
                        .map_err(|_| ParseError::InvalidQuery(pair.to_string()))?
                }
                _ => {}
            }
        }
        Ok(handoff)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingOrder {
    method: PaymentMethod,
    order: OrderSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFlow {
    state: SubmissionState,
    timing: FlowTiming,
    pending: Option<PendingOrder>,
}

impl Default for SubmissionFlow {
    fn default() -> Self {
        Self::new(FlowTiming::default())
    }
}

impl SubmissionFlow {
    pub fn new(timing: FlowTiming) -> Self {
        Self {
            state: SubmissionState::Idle,
            timing,
            pending: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// The single transition function. Events that do not apply to the current
    /// state are ignored and produce no effects.
    pub fn handle(&mut self, event: SubmissionEvent) -> Vec<Effect> {
        let from = self.state;
        let effects = match (self.state, event) {
            (SubmissionState::Idle, SubmissionEvent::SubmitRequested) => {
                self.state = SubmissionState::Validating;
                vec![Effect::ValidateAll]
            }
            (SubmissionState::Validating, SubmissionEvent::ValidationCompleted(check)) => {
                self.complete_validation(check)
            }
            (SubmissionState::Submitting, SubmissionEvent::ProcessingFinished) => {
                self.state = SubmissionState::Success;
                vec![
                    Effect::HideLoading,
                    Effect::EnableSubmit,
                    Effect::RevealConfirmation,
                    Effect::Schedule {
                        event: TimerEvent::RedirectDue,
                        after: self.timing.redirect,
                    },
                ]
            }
            (SubmissionState::Success, SubmissionEvent::RedirectDue { timestamp_ms }) => {
                match self.pending.take() {
                    Some(pending) => {
                        let handoff = ConfirmationHandoff {
                            plan: pending.order.plan_name,
                            total: pending.order.total_label,
                            method: pending.method.key().to_string(),
                            timestamp_ms,
                        };
                        vec![Effect::Navigate(handoff.to_url())]
                    }
                    None => Vec::new(),
                }
            }
            (state, event) => {
                tracing::debug!(?state, ?event, "ignoring submission event");
                Vec::new()
            }
        };

        if from != self.state {
            tracing::debug!(?from, to = ?self.state, "submission transition");
        }
        effects
    }

    fn complete_validation(&mut self, check: SubmissionCheck) -> Vec<Effect> {
        let Some(method) = check.method else {
            self.state = SubmissionState::Idle;
            return vec![Effect::Blocked(SubmitBlocked::NoPaymentMethod)];
        };
        if !check.invalid_fields.is_empty() {
            tracing::debug!(invalid = ?check.invalid_fields, "submission blocked");
            self.state = SubmissionState::Idle;
            return vec![Effect::Blocked(SubmitBlocked::InvalidFields)];
        }

        self.state = SubmissionState::Submitting;
        self.pending = Some(PendingOrder {
            method,
            order: check.order,
        });
        vec![
            Effect::DisableSubmit,
            Effect::ShowLoading,
            Effect::Schedule {
                event: TimerEvent::ProcessingFinished,
                after: self.timing.processing,
            },
        ]
    }
}
