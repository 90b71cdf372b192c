//! National identity / resident permit number validation.
//!
//! Numbers are 10 ASCII digits. The leading digit selects the document
//! type (`1` national, `2`/`7`/`8` resident permit) and the 10th digit is
//! a Luhn-style check digit over the first nine. Validation is a pure
//! function: no side effects, deterministic for identical input.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::GatewayError;

/// Document type encoded in the leading digit of an identity number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// National identity number (leading digit `1`).
    National,
    /// Resident permit / Iqama number (leading digit `2`, `7`, or `8`).
    ResidentPermit,
}

/// Validates an identity number and returns its document type.
///
/// Checks, in order: exact length of 10 ASCII digits, a recognized
/// leading digit, and the Luhn-style check digit.
///
/// # Errors
///
/// - [`GatewayError::IdentityFormat`] when the input is not 10 digits or
///   the leading digit is unrecognized.
/// - [`GatewayError::IdentityChecksum`] when the 10th digit does not
///   match the recomputed check digit.
pub fn validate_identity(input: &str) -> Result<DocumentType, GatewayError> {
    let bytes = input.as_bytes();
    if bytes.len() != 10 {
        return Err(GatewayError::IdentityFormat(format!(
            "expected 10 digits, got {} characters",
            input.chars().count()
        )));
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return Err(GatewayError::IdentityFormat(
            "contains non-digit characters".to_string(),
        ));
    }

    let digits: Vec<u8> = bytes.iter().map(|b| b - b'0').collect();

    let document_type = match digits.first() {
        Some(1) => DocumentType::National,
        Some(2) | Some(7) | Some(8) => DocumentType::ResidentPermit,
        _ => {
            return Err(GatewayError::IdentityFormat(
                "unrecognized leading digit".to_string(),
            ));
        }
    };

    let expected = check_digit(digits.iter().take(9).copied());
    let actual = digits.last().copied().unwrap_or(0);
    if expected != actual {
        return Err(GatewayError::IdentityChecksum { expected, actual });
    }

    Ok(document_type)
}

/// Computes the Luhn-style check digit over the first nine digits.
///
/// Digits at even 0-indexed positions are doubled, with 9 subtracted
/// when the doubled value exceeds 9; the check digit is
/// `(10 - sum % 10) % 10`.
fn check_digit(first_nine: impl Iterator<Item = u8>) -> u8 {
    let mut sum: u32 = 0;
    for (i, d) in first_nine.enumerate() {
        let mut value = u32::from(d);
        if i % 2 == 0 {
            value *= 2;
            if value > 9 {
                value -= 9;
            }
        }
        sum += value;
    }
    u8::try_from((10 - (sum % 10)) % 10).unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn valid_national_number() {
        let result = validate_identity("1000000008");
        let Ok(doc) = result else {
            panic!("expected valid national number");
        };
        assert_eq!(doc, DocumentType::National);
    }

    #[test]
    fn valid_resident_permit_leading_digits() {
        // Same digit body, check digit recomputed for each leading digit.
        for number in ["2000000006", "7000000005", "8000000003"] {
            let result = validate_identity(number);
            let Ok(doc) = result else {
                panic!("expected {number} to be valid");
            };
            assert_eq!(doc, DocumentType::ResidentPermit);
        }
    }

    #[test]
    fn checksum_mismatch_reports_expected_digit() {
        let result = validate_identity("1000000000");
        let Err(GatewayError::IdentityChecksum { expected, actual }) = result else {
            panic!("expected checksum error");
        };
        assert_eq!(expected, 8);
        assert_eq!(actual, 0);
    }

    #[test]
    fn bad_leading_digit_is_format_error() {
        let result = validate_identity("3000000008");
        assert!(matches!(result, Err(GatewayError::IdentityFormat(_))));
    }

    #[test]
    fn wrong_length_is_format_error() {
        assert!(matches!(
            validate_identity("12345"),
            Err(GatewayError::IdentityFormat(_))
        ));
        assert!(matches!(
            validate_identity("10000000081"),
            Err(GatewayError::IdentityFormat(_))
        ));
        assert!(matches!(
            validate_identity(""),
            Err(GatewayError::IdentityFormat(_))
        ));
    }

    #[test]
    fn non_digit_characters_are_format_errors() {
        assert!(matches!(
            validate_identity("10000000a8"),
            Err(GatewayError::IdentityFormat(_))
        ));
        assert!(matches!(
            validate_identity("١٠٠٠٠٠٠٠٠٨"),
            Err(GatewayError::IdentityFormat(_))
        ));
    }

    #[test]
    fn recomputed_check_digit_agrees_with_validator() {
        // Deterministic pseudo-random bodies: the validator accepts a
        // number iff its 10th digit equals the recomputed check digit.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..500 {
            let mut digits = vec![1u8];
            for _ in 0..8 {
                seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                digits.push(u8::try_from((seed >> 33) % 10).unwrap_or(0));
            }
            let check = check_digit(digits.iter().copied());
            let mut number: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
            number.push(char::from(b'0' + check));
            assert!(validate_identity(&number).is_ok(), "expected {number} valid");

            // Perturbing the check digit must flip the verdict.
            let wrong = (check + 1) % 10;
            let mut bad: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
            bad.push(char::from(b'0' + wrong));
            assert!(
                matches!(
                    validate_identity(&bad),
                    Err(GatewayError::IdentityChecksum { .. })
                ),
                "expected {bad} invalid"
            );
        }
    }

    #[test]
    fn validation_is_deterministic() {
        let a = validate_identity("1000000008").is_ok();
        let b = validate_identity("1000000008").is_ok();
        assert_eq!(a, b);
    }
}
