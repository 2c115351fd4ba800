pub const CPF_DIGIT_COUNT: usize = 11;

fn digits_of(input: &str) -> Vec<u32> {
    input.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Luhn checksum over the digits of `input`. Non-digit characters are skipped,
/// an input without any digit is never valid.
pub fn luhn_is_valid(input: &str) -> bool {
    let mut sum: u32 = 0;
    let mut doubled = false;
    let mut seen_digit = false;

    for digit in input.chars().rev().filter_map(|c| c.to_digit(10)) {
        seen_digit = true;
        if doubled {
            let twice = digit * 2;
            sum += if twice > 9 { twice - 9 } else { twice };
        } else {
            sum += digit;
        }
        doubled = !doubled;
    }

    seen_digit && sum % 10 == 0
}

// Weighted sum mod 11 where the weights run from len+1 down to 2.
fn cpf_check_digit(digits: &[u32]) -> u32 {
    let top_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(idx, digit)| digit * (top_weight - idx as u32))
        .sum();
    let digit = 11 - sum % 11;
    if digit >= 10 {
        0
    } else {
        digit
    }
}

/// Computes both CPF check digits for the nine base digits of `base`.
/// Returns `None` unless `base` holds exactly nine digits.
pub fn cpf_check_digits(base: &str) -> Option<(u32, u32)> {
    let mut digits = digits_of(base);
    if digits.len() != CPF_DIGIT_COUNT - 2 {
        return None;
    }
    let first = cpf_check_digit(&digits);
    digits.push(first);
    let second = cpf_check_digit(&digits);
    Some((first, second))
}

/// True when the digits of `input` form a CPF whose two trailing check digits
/// match. Sequences of a single repeated digit are rejected even though some of
/// them satisfy the checksum.
pub fn cpf_is_valid(input: &str) -> bool {
    let digits = digits_of(input);
    if digits.len() != CPF_DIGIT_COUNT || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let first = cpf_check_digit(&digits[..9]);
    if first != digits[9] {
        return false;
    }
    cpf_check_digit(&digits[..10]) == digits[10]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luhn_accepts_known_card_numbers() {
        let cards = [
            "4532015112830366",
            "4111111111111111",
            "5555555555554444",
            "378282246310005",
            "6011111111111117",
            "4222222222222",
        ];
        for card in cards {
            assert!(luhn_is_valid(card), "{card} should pass");
        }
    }

    #[test]
    fn luhn_rejects_altered_last_digit() {
        assert!(!luhn_is_valid("4532015112830367"));
        assert!(!luhn_is_valid("4532015112830360"));
    }

    #[test]
    fn luhn_rejects_single_transposition() {
        // 45 -> 54 at the front changes the weighted sum
        assert!(!luhn_is_valid("5432015112830366"));
    }

    #[test]
    fn luhn_skips_separators() {
        assert!(luhn_is_valid("4532 0151 1283 0366"));
    }

    #[test]
    fn luhn_rejects_empty_input() {
        assert!(!luhn_is_valid(""));
        assert!(!luhn_is_valid("  "));
    }

    #[test]
    fn cpf_accepts_canonical_vector() {
        assert!(cpf_is_valid("52998224725"));
        assert!(cpf_is_valid("529.982.247-25"));
    }

    #[test]
    fn cpf_rejects_repeated_digits() {
        for digit in 0..10 {
            let repeated = digit.to_string().repeat(11);
            assert!(!cpf_is_valid(&repeated), "{repeated} should be rejected");
        }
    }

    #[test]
    fn cpf_rejects_wrong_check_digits() {
        assert!(!cpf_is_valid("52998224724"));
        assert!(!cpf_is_valid("52998224735"));
        assert!(!cpf_is_valid("345.675.677-78"));
    }

    #[test]
    fn cpf_rejects_wrong_length() {
        assert!(!cpf_is_valid("5299822472"));
        assert!(!cpf_is_valid("529982247250"));
        assert!(!cpf_is_valid(""));
    }

    #[test]
    fn cpf_check_digits_match_validator() {
        for base in ["529982247", "012345678", "083358948", "123456789", "987654321"] {
            let (first, second) = cpf_check_digits(base).unwrap();
            let full = format!("{base}{first}{second}");
            assert!(cpf_is_valid(&full), "{full} built from {base} should validate");

            let wrong = format!("{base}{}{second}", (first + 1) % 10);
            assert!(!cpf_is_valid(&wrong), "{wrong} should fail");
        }
    }

    #[test]
    fn cpf_check_digits_need_nine_digits() {
        assert_eq!(cpf_check_digits("12345678"), None);
        assert_eq!(cpf_check_digits("1234567890"), None);
        assert_eq!(cpf_check_digits("529982247"), Some((2, 5)));
    }
}
