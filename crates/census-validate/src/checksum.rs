//! Check-digit validation for Ecuadorian identity documents.
//!
//! Both the national id (cedula, 10 digits) and the natural-person tax id
//! (RUC, 13 digits) carry a weighted modulus-10 check digit computed over
//! their first nine digits. The tax id additionally fixes the trailing
//! establishment code to `001` and restricts the third digit to natural
//! persons (0-5).

use thiserror::Error;

/// Alternating weights applied to the first nine digits.
const COEFFICIENTS: [u32; 9] = [2, 1, 2, 1, 2, 1, 2, 1, 2];

const PROVINCE_MIN: u32 = 1;
const PROVINCE_MAX: u32 = 24;

const NATIONAL_ID_LEN: usize = 10;
const TAX_ID_LEN: usize = 13;

/// Why an id value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdCheckError {
    #[error("must be exactly {expected} digits")]
    Format { expected: usize },
    #[error("province code must be between 01 and 24")]
    Province,
    #[error("is only issued to natural persons (third digit 0-5)")]
    NaturalPerson,
    #[error("establishment code must be 001")]
    Establishment,
    #[error("check digit does not match")]
    CheckDigit,
}

impl IdCheckError {
    /// True for shape-level rejections (length, non-digit characters).
    pub fn is_format(&self) -> bool {
        matches!(self, IdCheckError::Format { .. })
    }
}

/// Validate a national id (cedula).
pub fn check_national_id(id: &str) -> Result<(), IdCheckError> {
    let digits = digits_of(id, NATIONAL_ID_LEN)?;
    check_province(&digits)?;
    if weighted_check_digit(&digits) != digits[9] {
        return Err(IdCheckError::CheckDigit);
    }
    Ok(())
}

/// Validate a natural-person tax id (RUC).
pub fn check_tax_id(id: &str) -> Result<(), IdCheckError> {
    let digits = digits_of(id, TAX_ID_LEN)?;
    check_province(&digits)?;
    if digits[2] > 5 {
        return Err(IdCheckError::NaturalPerson);
    }
    if digits[10..13] != [0, 0, 1] {
        return Err(IdCheckError::Establishment);
    }
    if weighted_check_digit(&digits) != digits[9] {
        return Err(IdCheckError::CheckDigit);
    }
    Ok(())
}

pub fn national_id_is_valid(id: &str) -> bool {
    check_national_id(id).is_ok()
}

pub fn tax_id_is_valid(id: &str) -> bool {
    check_tax_id(id).is_ok()
}

/// Weighted modulus-10 check digit over the first nine digits.
///
/// Products of 10 or more are reduced by 9 (the digit sum of a two-digit
/// product); an expected value of 10 wraps to 0.
fn weighted_check_digit(digits: &[u32]) -> u32 {
    let mut total = 0;
    for (digit, coefficient) in digits.iter().take(9).zip(COEFFICIENTS) {
        let mut product = digit * coefficient;
        if product >= 10 {
            product -= 9;
        }
        total += product;
    }
    match 10 - (total % 10) {
        10 => 0,
        value => value,
    }
}

fn check_province(digits: &[u32]) -> Result<(), IdCheckError> {
    let province = digits[0] * 10 + digits[1];
    if !(PROVINCE_MIN..=PROVINCE_MAX).contains(&province) {
        return Err(IdCheckError::Province);
    }
    Ok(())
}

fn digits_of(id: &str, expected: usize) -> Result<Vec<u32>, IdCheckError> {
    if id.len() != expected || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdCheckError::Format { expected });
    }
    Ok(id
        .bytes()
        .map(|b| u32::from(b - b'0'))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_national_ids() {
        assert!(national_id_is_valid("1710034065"));
        assert!(national_id_is_valid("0101234565"));
    }

    #[test]
    fn check_digit_of_ten_wraps_to_zero() {
        assert!(national_id_is_valid("1710034040"));
    }

    #[test]
    fn rejects_flipped_check_digit() {
        // single-digit mutation of a known-valid id
        assert_eq!(
            check_national_id("1710034066"),
            Err(IdCheckError::CheckDigit)
        );
        assert_eq!(
            check_national_id("1710034064"),
            Err(IdCheckError::CheckDigit)
        );
    }

    #[test]
    fn rejects_out_of_range_province() {
        assert_eq!(check_national_id("2510034065"), Err(IdCheckError::Province));
        assert_eq!(check_national_id("0010034065"), Err(IdCheckError::Province));
    }

    #[test]
    fn rejects_malformed_national_ids() {
        assert_eq!(
            check_national_id("171003406"),
            Err(IdCheckError::Format { expected: 10 })
        );
        assert_eq!(
            check_national_id("17100340651"),
            Err(IdCheckError::Format { expected: 10 })
        );
        assert_eq!(
            check_national_id("17100340a5"),
            Err(IdCheckError::Format { expected: 10 })
        );
    }

    #[test]
    fn accepts_valid_tax_id() {
        assert!(tax_id_is_valid("1710034065001"));
    }

    #[test]
    fn rejects_tax_id_without_001_establishment() {
        assert_eq!(
            check_tax_id("1710034065002"),
            Err(IdCheckError::Establishment)
        );
        assert_eq!(
            check_tax_id("1710034065000"),
            Err(IdCheckError::Establishment)
        );
    }

    #[test]
    fn rejects_entity_tax_ids() {
        // third digit 9 marks a juridical entity
        assert_eq!(check_tax_id("1790034065001"), Err(IdCheckError::NaturalPerson));
    }

    #[test]
    fn rejects_tax_id_with_bad_check_digit() {
        assert_eq!(check_tax_id("1710034066001"), Err(IdCheckError::CheckDigit));
    }

    #[test]
    fn rejects_malformed_tax_ids() {
        assert_eq!(
            check_tax_id("1710034065"),
            Err(IdCheckError::Format { expected: 13 })
        );
        assert_eq!(
            check_tax_id("171003406500x"),
            Err(IdCheckError::Format { expected: 13 })
        );
    }
}
