//! Input masks applied on every keystroke.
//!
//! Every mask starts from the digits of the raw input, so feeding an already
//! formatted value back in yields the same string.

use crate::field::FieldKind;
use crate::validator::digits_only;

const CPF_MAX_DIGITS: usize = 11;
const PHONE_MAX_DIGITS: usize = 11;
const CEP_MAX_DIGITS: usize = 8;
const EXPIRY_DIGITS: usize = 4;

pub fn normalize(kind: FieldKind, raw: &str) -> String {
    match kind {
        FieldKind::Cpf => cpf(raw),
        FieldKind::Phone => phone(raw),
        FieldKind::PostalCode => postal_code(raw),
        FieldKind::CardNumber => card_number(raw),
        FieldKind::CardExpiry => expiry(raw),
        FieldKind::CardCvv => digits_only(raw),
        FieldKind::Name | FieldKind::Email | FieldKind::Required => raw.to_string(),
    }
}

// Splits `digits` into consecutive groups, emitting a separator only when more
// digits follow it. The last group takes whatever is left.
fn group(digits: &str, sizes: &[usize], separators: &[&str]) -> String {
    let mut out = String::with_capacity(digits.len() + separators.len() * 2);
    let mut rest = digits;
    for (idx, size) in sizes.iter().enumerate() {
        let take = if idx + 1 == sizes.len() {
            rest.len()
        } else {
            (*size).min(rest.len())
        };
        out.push_str(&rest[..take]);
        rest = &rest[take..];
        if rest.is_empty() {
            break;
        }
        if let Some(separator) = separators.get(idx) {
            out.push_str(separator);
        }
    }
    out
}

/// `XXX.XXX.XXX-XX`, filled in progressively. Longer input is left untouched.
pub fn cpf(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() > CPF_MAX_DIGITS {
        return raw.to_string();
    }
    group(&digits, &[3, 3, 3, 2], &[".", ".", "-"])
}

/// `(DD) XXXX-XXXX` for landlines, `(DD) XXXXX-XXXX` for mobiles.
pub fn phone(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() > PHONE_MAX_DIGITS {
        return raw.to_string();
    }
    if digits.len() <= 2 {
        return digits;
    }

    let (area, number) = digits.split_at(2);
    let prefix_len = if digits.len() <= 10 { 4 } else { 5 };
    if number.len() > prefix_len {
        let (prefix, suffix) = number.split_at(prefix_len);
        format!("({area}) {prefix}-{suffix}")
    } else {
        format!("({area}) {number}")
    }
}

/// `XXXXX-XXX`.
pub fn postal_code(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() > CEP_MAX_DIGITS {
        return raw.to_string();
    }
    group(&digits, &[5, 3], &["-"])
}

/// Groups of four separated by a space, no length limit.
pub fn card_number(raw: &str) -> String {
    let digits = digits_only(raw);
    digits
        .as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `MM/YY`; the slash appears as soon as the month is complete.
pub fn expiry(raw: &str) -> String {
    let mut digits = digits_only(raw);
    digits.truncate(EXPIRY_DIGITS);
    if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cpf_progressive_groups() {
        assert_eq!(cpf("529"), "529");
        assert_eq!(cpf("5299"), "529.9");
        assert_eq!(cpf("5299822"), "529.982.2");
        assert_eq!(cpf("529982247"), "529.982.247");
        assert_eq!(cpf("5299822472"), "529.982.247-2");
        assert_eq!(cpf("52998224725"), "529.982.247-25");
    }

    #[test]
    fn cpf_too_long_is_left_alone() {
        assert_eq!(cpf("529982247251"), "529982247251");
    }

    #[test]
    fn phone_landline_and_mobile() {
        assert_eq!(phone("11"), "11");
        assert_eq!(phone("113"), "(11) 3");
        assert_eq!(phone("113456"), "(11) 3456");
        assert_eq!(phone("1134567"), "(11) 3456-7");
        assert_eq!(phone("1134567890"), "(11) 3456-7890");
        assert_eq!(phone("11934567890"), "(11) 93456-7890");
    }

    #[test]
    fn postal_code_dash() {
        assert_eq!(postal_code("01310"), "01310");
        assert_eq!(postal_code("013101"), "01310-1");
        assert_eq!(postal_code("01310100"), "01310-100");
        assert_eq!(postal_code("013101000"), "013101000");
    }

    #[test]
    fn card_number_groups_of_four() {
        assert_eq!(card_number("4532"), "4532");
        assert_eq!(card_number("45320"), "4532 0");
        assert_eq!(card_number("4532015112830366"), "4532 0151 1283 0366");
        assert_eq!(card_number("4532 0151-1283x0366 123"), "4532 0151 1283 0366 123");
    }

    #[test]
    fn expiry_slash_after_month() {
        assert_eq!(expiry("1"), "1");
        assert_eq!(expiry("12"), "12/");
        assert_eq!(expiry("123"), "12/3");
        assert_eq!(expiry("12345"), "12/34");
    }

    #[test]
    fn cvv_digits_only() {
        assert_eq!(normalize(FieldKind::CardCvv, "1a2 3"), "123");
    }

    #[test]
    fn masks_are_idempotent() {
        let cases = [
            (FieldKind::Cpf, "52998224725"),
            (FieldKind::Cpf, "5299822"),
            (FieldKind::Phone, "1134567890"),
            (FieldKind::Phone, "11934567890"),
            (FieldKind::PostalCode, "01310100"),
            (FieldKind::CardNumber, "4532015112830366"),
            (FieldKind::CardExpiry, "1230"),
            (FieldKind::CardExpiry, "12"),
        ];
        for (kind, raw) in cases {
            let once = normalize(kind, raw);
            let twice = normalize(kind, &once);
            assert_eq!(once, twice, "{kind:?} mask on {raw}");
        }
    }

    #[test]
    fn free_text_passes_through() {
        assert_eq!(normalize(FieldKind::Name, "Ana Souza"), "Ana Souza");
        assert_eq!(normalize(FieldKind::Email, " a@b.co"), " a@b.co");
    }
}
