//! Checkout core for the MovAccess site: field validation, input masks,
//! checksums, payment codes and the submission state machine. Nothing in here
//! touches the DOM or the network, so the same rules run in the browser and on
//! the server.

pub mod address;
pub mod checksum;
pub mod field;
pub mod flow;
pub mod form;
pub mod mask;
pub mod news;
pub mod payment;
pub mod plans;
pub mod validator;

use thiserror::Error;

pub use field::{FieldError, FieldId, FieldKind, FormField, ValidationResult};
pub use flow::{
    ConfirmationHandoff, Effect, FlowTiming, OrderSummary, SubmissionCheck, SubmissionEvent,
    SubmissionFlow, SubmissionState, SubmitBlocked, TimerEvent,
};
pub use form::CheckoutForm;
pub use payment::{PaymentCodes, PaymentMethod, PaymentSelection};
pub use plans::Plan;
pub use validator::{is_valid_email, FieldState, FieldValidator, Marker, YearMonth};

/// Keys coming from markup attributes or query strings that do not map to a
/// known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown field id: {0}")]
    UnknownField(String),
    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),
    #[error("unknown plan: {0}")]
    UnknownPlan(String),
    #[error("malformed query parameter: {0}")]
    InvalidQuery(String),
}
