use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::ParseError;

/// The validation rule applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Name,
    Email,
    Cpf,
    Phone,
    PostalCode,
    CardNumber,
    CardExpiry,
    CardCvv,
    Required,
}

/// Inputs of the checkout form, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    Name,
    Email,
    Cpf,
    Phone,
    Cep,
    Street,
    Number,
    Complement,
    City,
    State,
    CardNumber,
    CardName,
    CardExpiry,
    CardCvv,
}

impl FieldId {
    pub const ALL: [FieldId; 14] = [
        FieldId::Name,
        FieldId::Email,
        FieldId::Cpf,
        FieldId::Phone,
        FieldId::Cep,
        FieldId::Street,
        FieldId::Number,
        FieldId::Complement,
        FieldId::City,
        FieldId::State,
        FieldId::CardNumber,
        FieldId::CardName,
        FieldId::CardExpiry,
        FieldId::CardCvv,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The element id the page markup uses for this input.
    pub fn dom_id(self) -> &'static str {
        match self {
            FieldId::Name => "nome",
            FieldId::Email => "email",
            FieldId::Cpf => "cpf",
            FieldId::Phone => "telefone",
            FieldId::Cep => "cep",
            FieldId::Street => "endereco",
            FieldId::Number => "numero",
            FieldId::Complement => "complemento",
            FieldId::City => "cidade",
            FieldId::State => "estado",
            FieldId::CardNumber => "card-number",
            FieldId::CardName => "card-name",
            FieldId::CardExpiry => "card-expiry",
            FieldId::CardCvv => "card-cvv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::Name => "Nome completo",
            FieldId::Email => "E-mail",
            FieldId::Cpf => "CPF",
            FieldId::Phone => "Telefone",
            FieldId::Cep => "CEP",
            FieldId::Street => "Endereço",
            FieldId::Number => "Número",
            FieldId::Complement => "Complemento",
            FieldId::City => "Cidade",
            FieldId::State => "Estado",
            FieldId::CardNumber => "Número do cartão",
            FieldId::CardName => "Nome impresso no cartão",
            FieldId::CardExpiry => "Validade (MM/AA)",
            FieldId::CardCvv => "CVV",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FieldId::Name | FieldId::CardName => FieldKind::Name,
            FieldId::Email => FieldKind::Email,
            FieldId::Cpf => FieldKind::Cpf,
            FieldId::Phone => FieldKind::Phone,
            FieldId::Cep => FieldKind::PostalCode,
            FieldId::CardNumber => FieldKind::CardNumber,
            FieldId::CardExpiry => FieldKind::CardExpiry,
            FieldId::CardCvv => FieldKind::CardCvv,
            FieldId::Street
            | FieldId::Number
            | FieldId::Complement
            | FieldId::City
            | FieldId::State => FieldKind::Required,
        }
    }

    /// Card inputs only matter while credit card is the active payment method.
    pub fn is_card_field(self) -> bool {
        matches!(
            self,
            FieldId::CardNumber | FieldId::CardName | FieldId::CardExpiry | FieldId::CardCvv
        )
    }

    pub fn is_optional(self) -> bool {
        self == FieldId::Complement
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

impl FromStr for FieldId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::ALL
            .into_iter()
            .find(|id| id.dom_id() == s)
            .ok_or_else(|| ParseError::UnknownField(s.to_string()))
    }
}

/// Why a value was rejected. Several kinds collapse into the same message on
/// the page, see [`FieldError::user_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("value is required")]
    Required,
    #[error("value does not have the expected format")]
    Malformed,
    #[error("expected {expected} digits, got {actual}")]
    WrongLength { expected: &'static str, actual: usize },
    #[error("all digits are identical")]
    RepeatedDigits,
    #[error("check digits do not match")]
    ChecksumMismatch,
    #[error("month {0} is out of range")]
    InvalidMonth(u32),
    #[error("card has expired")]
    Expired,
}

impl FieldError {
    pub fn user_message(self, kind: FieldKind) -> &'static str {
        if self == FieldError::Required {
            return "Este campo é obrigatório";
        }
        match kind {
            FieldKind::Email => "E-mail inválido",
            FieldKind::Cpf => "CPF inválido",
            FieldKind::Phone => "Telefone inválido",
            FieldKind::PostalCode => "CEP inválido",
            FieldKind::CardNumber => "Número de cartão inválido",
            FieldKind::CardExpiry => match self {
                FieldError::InvalidMonth(_) | FieldError::Expired => "Data inválida ou expirada",
                _ => "Data inválida",
            },
            FieldKind::CardCvv => "CVV inválido",
            FieldKind::Name | FieldKind::Required => "Este campo é obrigatório",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: message.into(),
        }
    }

    pub fn from_check(kind: FieldKind, check: Result<(), FieldError>) -> Self {
        match check {
            Ok(()) => Self::valid(),
            Err(e) => Self::invalid(e.user_message(kind)),
        }
    }
}

/// A field as the validator sees it: its rule, its current value and whether
/// the form marks it as required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField<'a> {
    pub kind: FieldKind,
    pub value: &'a str,
    pub required: bool,
}

impl<'a> FormField<'a> {
    pub fn required(kind: FieldKind, value: &'a str) -> Self {
        Self {
            kind,
            value,
            required: true,
        }
    }

    pub fn optional(kind: FieldKind, value: &'a str) -> Self {
        Self {
            kind,
            value,
            required: false,
        }
    }
}
