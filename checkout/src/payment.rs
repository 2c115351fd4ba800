use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "pix")]
    Pix,
    #[serde(rename = "boleto")]
    Boleto,
    #[serde(rename = "cartao")]
    CreditCard,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Pix,
        PaymentMethod::Boleto,
        PaymentMethod::CreditCard,
    ];

    /// Value of the `data-method` attribute on the selector buttons.
    pub fn key(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "pix",
            PaymentMethod::Boleto => "boleto",
            PaymentMethod::CreditCard => "cartao",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Boleto => "Boleto bancário",
            PaymentMethod::CreditCard => "Cartão de crédito",
        }
    }

    /// Id of the details panel shown while this method is active.
    pub fn panel_id(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "pix-payment",
            PaymentMethod::Boleto => "boleto-payment",
            PaymentMethod::CreditCard => "cartao-payment",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pix" => Ok(PaymentMethod::Pix),
            "boleto" => Ok(PaymentMethod::Boleto),
            "cartao" | "cartao-credito" | "credit-card" => Ok(PaymentMethod::CreditCard),
            other => Err(ParseError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// At most one payment method is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentSelection {
    active: Option<PaymentMethod>,
}

impl PaymentSelection {
    /// Activates `method` and returns the method it replaced, if any.
    pub fn select(&mut self, method: PaymentMethod) -> Option<PaymentMethod> {
        self.active.replace(method).filter(|previous| *previous != method)
    }

    pub fn active(&self) -> Option<PaymentMethod> {
        self.active
    }

    pub fn is_active(&self, method: PaymentMethod) -> bool {
        self.active == Some(method)
    }
}

/// Static PIX "copia e cola" payload in the EMV merchant-presented layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixPayload {
    pub key: String,
    pub merchant_name: String,
    pub merchant_city: String,
    pub amount_cents: Option<u64>,
    pub txid: String,
}

impl Default for PixPayload {
    fn default() -> Self {
        Self {
            key: "+5511999999999".to_string(),
            merchant_name: "MOVACCESS LTDA".to_string(),
            merchant_city: "SAO PAULO".to_string(),
            amount_cents: None,
            txid: "***".to_string(),
        }
    }
}

// lengths count characters, matching the limits applied by `truncated`
fn tlv(id: &str, value: &str) -> String {
    format!("{id}{:02}{value}", value.chars().count())
}

fn truncated(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// CRC-16/CCITT-FALSE, the checksum closing every PIX payload.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for byte in data {
        crc ^= (*byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

impl PixPayload {
    pub fn encode(&self) -> String {
        let account = format!("{}{}", tlv("00", "BR.GOV.BCB.PIX"), tlv("01", &self.key));

        let mut payload = String::new();
        payload.push_str(&tlv("00", "01"));
        payload.push_str(&tlv("26", &account));
        payload.push_str(&tlv("52", "0000"));
        payload.push_str(&tlv("53", "986"));
        if let Some(cents) = self.amount_cents {
            payload.push_str(&tlv("54", &format!("{}.{:02}", cents / 100, cents % 100)));
        }
        payload.push_str(&tlv("58", "BR"));
        payload.push_str(&tlv("59", &truncated(&self.merchant_name, 25)));
        payload.push_str(&tlv("60", &truncated(&self.merchant_city, 15)));
        payload.push_str(&tlv("62", &tlv("05", &self.txid)));

        // the CRC covers its own id and length
        payload.push_str("6304");
        let crc = crc16_ccitt(payload.as_bytes());
        payload.push_str(&format!("{crc:04X}"));
        payload
    }
}

const BOLETO_BANK_PREFIX: &str = "34191";

// Due-date factors count days from 1997-10-07 and wrap back to 1000 after 9999.
fn due_factor(due: NaiveDate) -> u32 {
    let Some(base) = NaiveDate::from_ymd_opt(1997, 10, 7) else {
        return 1000;
    };
    let days = (due - base).num_days().max(1000) as u32;
    if days > 9999 {
        (days - 1000) % 9000 + 1000
    } else {
        days
    }
}

/// Builds a 47-digit "linha digitável" shaped like a real bank slip. Only the
/// bank prefix, due factor and amount carry meaning; the rest is filler.
pub fn boleto_line<R: Rng>(amount_cents: u64, due: NaiveDate, rng: &mut R) -> String {
    let mut filler = |count: usize| -> String {
        (0..count)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    };

    let field1 = format!("{BOLETO_BANK_PREFIX}{}", filler(5));
    let field2 = filler(11);
    let field3 = filler(11);
    let check = filler(1);
    let tail = format!("{:04}{:010}", due_factor(due), amount_cents % 10_000_000_000);

    format!(
        "{}.{} {}.{} {}.{} {} {}",
        &field1[..5],
        &field1[5..],
        &field2[..5],
        &field2[5..],
        &field3[..5],
        &field3[5..],
        check,
        tail
    )
}

pub const BOLETO_DUE_DAYS: i64 = 3;

/// Payment codes generated at most once per page load per method.
#[derive(Debug, Clone)]
pub struct PaymentCodes {
    amount_cents: u64,
    issued_on: NaiveDate,
    codes: HashMap<PaymentMethod, String>,
}

impl PaymentCodes {
    pub fn new(amount_cents: u64, issued_on: NaiveDate) -> Self {
        Self {
            amount_cents,
            issued_on,
            codes: HashMap::new(),
        }
    }

    /// The cached code for `method`, generating it on first use. Credit card
    /// payments have no code.
    pub fn code_for(&mut self, method: PaymentMethod) -> Option<&str> {
        if method == PaymentMethod::CreditCard {
            return None;
        }
        let amount_cents = self.amount_cents;
        let due = self.issued_on + Duration::days(BOLETO_DUE_DAYS);
        let code = self.codes.entry(method).or_insert_with(|| match method {
            PaymentMethod::Pix => PixPayload {
                amount_cents: Some(amount_cents),
                ..PixPayload::default()
            }
            .encode(),
            _ => boleto_line(amount_cents, due, &mut rand::thread_rng()),
        });
        Some(code.as_str())
    }

    pub fn cached(&self, method: PaymentMethod) -> Option<&str> {
        self.codes.get(&method).map(String::as_str)
    }
}
